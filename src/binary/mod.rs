// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for simstr databases.
//!
//! One file per database. It is written front to back in a single pass by the
//! writer, except for the header, which is rewritten at the very end when the
//! build is finalized. A reader maps the file and touches only what a query
//! needs: the directory (one record per length-group), the slot table of each
//! group in range, and the posting lists of the query's n-grams. Nothing is
//! loaded up front, so databases far larger than memory stay cheap to open.
//!
//! # Security Considerations
//!
//! The parser must survive arbitrary bytes:
//! - Every offset and length is checked against the section it points into
//! - The file size must match what the header claims, to the byte
//! - CRC32 footer detects corruption/truncation (checked by `verify`)
//! - Varint decoder has maximum iteration limits
//!
//! # Format Overview (v1)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (48 bytes)                                          │
//! │   magic: [u8; 4] = "SMST"                                  │
//! │   version: u8, state: u8, char_type: u8, flags: u8         │
//! │   ngram_size: u32, string_count: u32, group_count: u32     │
//! │   reserved: u32                                            │
//! │   strings_len: u64, postings_len: u64, tables_len: u64     │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. STRINGS (varint length + UTF-8, in id order)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. STRING_OFFSETS (u64 per string)                         │
//! ├────────────────────────────────────────────────────────────┤
//! │ 3. POSTINGS (delta+varint, largest section)                │
//! ├────────────────────────────────────────────────────────────┤
//! │ 4. GROUP_TABLES (per group: sorted 20-byte slots + keys)   │
//! ├────────────────────────────────────────────────────────────┤
//! │ 5. DIRECTORY (24 bytes per group, sorted by size)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "TSMS"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod encoding;
mod header;
mod postings;

pub use encoding::{decode_string, decode_varint, encode_string, encode_varint};
pub(crate) use encoding::read_u64;
pub use header::{
    DbFooter, DbHeader, DbState, FormatFlags, GroupEntry, SectionOffsets, TableSlot,
    FOOTER_MAGIC, MAGIC, MAX_POSTING_SIZE, MAX_VARINT_BYTES, VERSION,
};
pub use postings::{decode_postings, encode_postings};

use std::io;

// ============================================================================
// LAYOUT
// ============================================================================

/// Validated skeleton of a database file: header, section offsets, directory.
///
/// Parsing is pure over a byte slice, so the same code serves memory-mapped
/// files, tests, and fuzzing.
#[derive(Debug, Clone)]
pub struct Layout {
    pub header: DbHeader,
    pub offsets: SectionOffsets,
    /// Length-groups sorted by size
    pub directory: Vec<GroupEntry>,
}

impl Layout {
    /// Parse and cross-check everything except the checksum.
    pub fn parse(bytes: &[u8]) -> io::Result<Self> {
        let header = DbHeader::read(bytes)?;
        let offsets = header.section_offsets();

        if offsets.total_size() != bytes.len() {
            return Err(invalid(format!(
                "File size mismatch: header describes {} bytes, file has {}",
                offsets.total_size(),
                bytes.len()
            )));
        }
        DbFooter::read(bytes)?;

        let dir_bytes = offsets
            .slice(bytes, offsets.directory)
            .ok_or_else(|| invalid("Directory out of bounds".to_string()))?;
        let mut directory: Vec<GroupEntry> = Vec::with_capacity(header.group_count as usize);
        for i in 0..header.group_count as usize {
            let entry = GroupEntry::decode(dir_bytes, i * GroupEntry::SIZE)?;
            if let Some(prev) = directory.last() {
                if prev.size >= entry.size {
                    return Err(invalid(format!(
                        "Directory not sorted at entry {} (size {} after {})",
                        i, entry.size, prev.size
                    )));
                }
            }
            check_group(&offsets, &entry)?;
            directory.push(entry);
        }

        Ok(Self {
            header,
            offsets,
            directory,
        })
    }

    /// Directory entry for length-group `size`
    pub fn group(&self, size: u32) -> Option<&GroupEntry> {
        self.directory
            .binary_search_by_key(&size, |g| g.size)
            .ok()
            .map(|i| &self.directory[i])
    }
}

/// A group table must sit inside GROUP_TABLES and be large enough for its slots.
fn check_group(offsets: &SectionOffsets, entry: &GroupEntry) -> io::Result<()> {
    let (start, end) = offsets.group_tables;
    let table_end = entry.offset.checked_add(entry.len);
    let inside = entry.offset >= start as u64 && table_end.is_some_and(|e| e <= end as u64);
    if !inside {
        return Err(invalid(format!(
            "Group {} table [{}, +{}) outside GROUP_TABLES [{}, {})",
            entry.size, entry.offset, entry.len, start, end
        )));
    }
    let slots = u64::from(entry.entry_count) * TableSlot::SIZE as u64;
    if slots > entry.len {
        return Err(invalid(format!(
            "Group {} claims {} slots in {} bytes",
            entry.size, entry.entry_count, entry.len
        )));
    }
    Ok(())
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
