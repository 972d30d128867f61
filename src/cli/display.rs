// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the simstr CLI.
//!
//! Box drawing and a handful of OneDark colors for `inspect`. Colors switch
//! off for pipes and when `NO_COLOR` is set, so the output stays greppable.

use std::io::IsTerminal;

use simstr::DatabaseInfo;

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 64;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

// OneDark: https://github.com/joshdick/onedark.vim
pub const CYAN: &str = "\x1b[38;2;86;182;194m";
pub const GREEN: &str = "\x1b[38;2;152;195;121m";
pub const GRAY: &str = "\x1b[38;2;92;99;112m";
pub const YELLOW: &str = "\x1b[38;2;229;192;123m";

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Apply styles if TTY, otherwise return plain text
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length, skipping ANSI escapes
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

fn border(s: &str) -> String {
    styled(&[GRAY], s)
}

/// │ content          │
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}{}{}{}", border("│"), content, " ".repeat(pad), border("│"));
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}{}{}",
        border("┌"),
        border(&label_part),
        border(&format!("{}┐", "─".repeat(remaining)))
    );
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}{}{}",
        border("├"),
        border(&label_part),
        border(&format!("{}┤", "─".repeat(remaining)))
    );
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}", border(&format!("└{}┘", "─".repeat(BOX_WIDTH))));
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// `  key          value`
fn field(key: &str, value: &str) {
    row(&format!("  {:<16}{}", key, value));
}

/// Box view of a database summary.
pub fn print_info(info: &DatabaseInfo, verified: bool) {
    section_top("DATABASE");
    field("Path", &info.path);
    field("Version", &info.version.to_string());
    field("Size", &format_size(info.file_size));
    if verified {
        field("Checksum", &styled(&[GREEN], "ok"));
    }
    section_mid("CONFIG");
    field("Char type", &info.char_type.to_string());
    field("N-gram size", &info.ngram_size.to_string());
    field("Marks", if info.boundary_marks { "on" } else { "off" });
    section_mid("CONTENTS");
    field("Strings", &styled(&[YELLOW], &info.string_count.to_string()));
    field("Groups", &info.groups.len().to_string());
    if !info.groups.is_empty() {
        row(&styled(&[GRAY], "  size            n-grams"));
        for group in &info.groups {
            row(&format!("  {:<16}{}", group.size, group.ngrams));
        }
    }
    section_bot();
}
