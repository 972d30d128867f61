// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only view of a finalized database.
//!
//! The file is memory-mapped and never copied. Opening parses the header and
//! the directory; everything else is resolved on demand: a string by id is one
//! fixed-width offset read plus one record decode, an n-gram key is a binary
//! search over its group's slot table, and a posting list is decoded only when
//! the search engine asks for it.
//!
//! A `Store` has no interior mutability, so any number of threads can query it
//! through a shared reference.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use serde::Serialize;

use crate::binary::{
    decode_postings, decode_string, read_u64, DbFooter, DbHeader, DbState, GroupEntry, Layout,
    TableSlot, VERSION,
};
use crate::error::QueryError;
use crate::ngram::CharType;

/// Location of one posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRef {
    pub offset: u64,
    pub doc_freq: u32,
}

/// Memory-mapped database.
pub struct Store {
    path: PathBuf,
    mmap: Mmap,
    layout: Layout,
}

impl Store {
    /// Map `path` and validate its structure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(QueryError::NotFound(path));
        }

        let file = File::open(&path).map_err(|e| QueryError::io(&path, e))?;
        let file_len = file.metadata().map_err(|e| QueryError::io(&path, e))?.len();
        if file_len < DbHeader::SIZE as u64 {
            return Err(QueryError::corrupt(format!(
                "{}: file too short for header ({} bytes)",
                path.display(),
                file_len
            )));
        }

        // SAFETY: finalized databases are never written again; the writer
        // refuses to reopen them. Truncation by another process is outside
        // what this engine can guard against.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| QueryError::io(&path, e))?;

        let layout = parse_finalized(&mmap, &path)?;
        tracing::debug!(
            path = %path.display(),
            strings = layout.header.string_count,
            groups = layout.header.group_count,
            "mapped database"
        );

        Ok(Self { path, mmap, layout })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &DbHeader {
        &self.layout.header
    }

    /// Number of strings in the database.
    pub fn len(&self) -> usize {
        self.layout.header.string_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All length-groups, ascending by size.
    pub fn groups(&self) -> &[GroupEntry] {
        &self.layout.directory
    }

    /// Length-groups whose size lies in `[lo, hi]`.
    pub fn groups_in(&self, lo: usize, hi: usize) -> &[GroupEntry] {
        let dir = &self.layout.directory;
        let start = dir.partition_point(|g| (g.size as usize) < lo);
        let end = dir.partition_point(|g| (g.size as usize) <= hi);
        &dir[start..end.max(start)]
    }

    pub fn group(&self, size: u32) -> Option<&GroupEntry> {
        self.layout.group(size)
    }

    /// Resolve a string id to its text.
    pub fn string(&self, id: u32) -> Result<&str, QueryError> {
        if id as usize >= self.len() {
            return Err(QueryError::corrupt(format!(
                "string id {} out of range ({} strings)",
                id,
                self.len()
            )));
        }
        let offsets = self.layout.offsets;
        let slot = offsets.string_offsets.0 + id as usize * 8;
        let rel = read_u64(&self.mmap, slot).map_err(corrupt)?;

        let strings = self.section(offsets.strings)?;
        let record = usize::try_from(rel)
            .ok()
            .and_then(|rel| strings.get(rel..))
            .ok_or_else(|| {
                QueryError::corrupt(format!("string {} offset {} out of bounds", id, rel))
            })?;
        let (s, _) = decode_string(record).map_err(corrupt)?;
        Ok(s)
    }

    /// Find the posting list of `key` within `group`.
    pub fn lookup(&self, group: &GroupEntry, key: &[u8]) -> Result<Option<ListRef>, QueryError> {
        let table = self.table(group)?;
        let count = group.entry_count as usize;
        let blob = &table[count * TableSlot::SIZE..];

        let (mut lo, mut hi) = (0usize, count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let slot = TableSlot::decode(table, mid * TableSlot::SIZE).map_err(corrupt)?;
            let start = slot.key_offset as usize;
            let slot_key = blob
                .get(start..start.saturating_add(slot.key_len as usize))
                .ok_or_else(|| {
                    QueryError::corrupt(format!(
                        "group {} slot {} key out of bounds",
                        group.size, mid
                    ))
                })?;
            match slot_key.cmp(key) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    return Ok(Some(ListRef {
                        offset: slot.postings_offset,
                        doc_freq: slot.doc_freq,
                    }))
                }
            }
        }
        Ok(None)
    }

    /// Decode one posting list.
    pub fn postings(&self, list: ListRef) -> Result<Vec<u32>, QueryError> {
        let (start, end) = self.layout.offsets.postings;
        let offset = usize::try_from(list.offset)
            .ok()
            .filter(|&o| o >= start && o < end)
            .ok_or_else(|| {
                QueryError::corrupt(format!(
                    "posting list offset {} outside POSTINGS [{}, {})",
                    list.offset, start, end
                ))
            })?;

        let (ids, _) = decode_postings(&self.mmap[offset..end]).map_err(corrupt)?;
        if ids.len() != list.doc_freq as usize {
            return Err(QueryError::corrupt(format!(
                "posting list at {} has {} ids, slot says {}",
                offset,
                ids.len(),
                list.doc_freq
            )));
        }
        if ids.last().is_some_and(|&id| id as usize >= self.len()) {
            return Err(QueryError::corrupt(format!(
                "posting list at {} references a missing string",
                offset
            )));
        }
        Ok(ids)
    }

    /// Recompute the checksum over every section.
    pub fn verify(&self) -> Result<(), QueryError> {
        let footer = DbFooter::read(&self.mmap).map_err(corrupt)?;
        let body = self.section(self.layout.offsets.body())?;
        let actual = DbFooter::compute_crc32(body);
        if actual != footer.crc32 {
            return Err(QueryError::corrupt(format!(
                "{}: checksum mismatch (stored {:08x}, computed {:08x})",
                self.path.display(),
                footer.crc32,
                actual
            )));
        }
        Ok(())
    }

    /// Summary of the database for display.
    pub fn info(&self) -> DatabaseInfo {
        let header = self.header();
        DatabaseInfo {
            path: self.path.display().to_string(),
            version: header.version,
            char_type: header.char_type,
            ngram_size: header.ngram_size,
            boundary_marks: header.flags.boundary_marks(),
            string_count: header.string_count,
            file_size: self.mmap.len() as u64,
            groups: self
                .groups()
                .iter()
                .map(|g| GroupInfo {
                    size: g.size,
                    ngrams: g.entry_count,
                })
                .collect(),
        }
    }

    fn section(&self, (start, end): (usize, usize)) -> Result<&[u8], QueryError> {
        self.mmap
            .get(start..end)
            .ok_or_else(|| QueryError::corrupt(format!("section [{}, {}) out of bounds", start, end)))
    }

    fn table(&self, group: &GroupEntry) -> Result<&[u8], QueryError> {
        // Layout::parse already bounded every table by GROUP_TABLES
        let start = group.offset as usize;
        self.section((start, start + group.len as usize))
    }
}

/// Header checks that come before structural parsing: version, then state.
fn parse_finalized(bytes: &[u8], path: &Path) -> Result<Layout, QueryError> {
    if let Some(found) = DbHeader::peek_version(bytes) {
        if found != VERSION {
            return Err(QueryError::UnsupportedVersion {
                found,
                expected: VERSION,
            });
        }
    }
    let header = DbHeader::read(bytes).map_err(corrupt)?;
    if header.state != DbState::Finalized {
        return Err(QueryError::NotFinalized(path.to_path_buf()));
    }
    Layout::parse(bytes).map_err(corrupt)
}

fn corrupt(e: std::io::Error) -> QueryError {
    QueryError::Corrupt(e.to_string())
}

// ============================================================================
// INSPECTION
// ============================================================================

/// What a database contains, independent of its code unit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    pub path: String,
    pub version: u8,
    pub char_type: CharType,
    pub ngram_size: u32,
    pub boundary_marks: bool,
    pub string_count: u32,
    pub file_size: u64,
    pub groups: Vec<GroupInfo>,
}

/// One length-group: its n-gram count and how many distinct keys it indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupInfo {
    pub size: u32,
    pub ngrams: u32,
}

/// Open any finalized database, whatever its granularity, and describe it.
pub fn inspect(path: impl AsRef<Path>, verify: bool) -> Result<DatabaseInfo, QueryError> {
    let store = Store::open(path)?;
    if verify {
        store.verify()?;
    }
    Ok(store.info())
}
