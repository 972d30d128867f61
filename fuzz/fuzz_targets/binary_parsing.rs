// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Database layout parsing under adversarial input.
//!
//! A damaged or hostile database file should produce an error, not a crash
//! and not an allocation the size of whatever a length field claims.

#![no_main]

use libfuzzer_sys::fuzz_target;
use simstr::binary::{GroupEntry, Layout, TableSlot};

fuzz_target!(|data: &[u8]| {
    let Ok(layout) = Layout::parse(data) else {
        return;
    };

    // A layout that parses must describe the input exactly
    assert_eq!(layout.offsets.total_size(), data.len());

    let (start, end) = layout.offsets.group_tables;
    let mut prev = None;
    for group in &layout.directory {
        // Directory is strictly ascending
        if let Some(p) = prev {
            assert!(p < group.size);
        }
        prev = Some(group.size);

        // Every table lies inside GROUP_TABLES and holds its slots
        assert!(group.offset as usize >= start);
        assert!((group.offset + group.len) as usize <= end);
        assert!(u64::from(group.entry_count) * TableSlot::SIZE as u64 <= group.len);
        assert_eq!(layout.group(group.size).map(|g| g.offset), Some(group.offset));
    }
    assert!(layout.directory.len() * GroupEntry::SIZE <= data.len());
});
