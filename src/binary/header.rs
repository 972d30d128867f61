// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Database header, footer, and fixed-size records.
//!
//! The header is 48 bytes of fixed-size fields, parsed in one read before
//! anything else. It says how the database was built (granularity, n, boundary
//! marks), whether the build finished, and how long each section is.
//!
//! The footer is 8 bytes: a CRC32 over every section between header and
//! footer, plus a magic number ("TSMS", the header magic reversed). The header
//! is left out of the checksum because it is rewritten last, when the build is
//! finalized.
//!
//! `SectionOffsets` is the single source of truth for the file layout. Every
//! piece of code that reads or writes sections MUST use it.

use std::io::{self, Write};

use crc32fast::Hasher as Crc32Hasher;

use super::encoding::{read_u32, read_u64};
use crate::ngram::CharType;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "SMST" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x53, 0x4D, 0x53, 0x54];

/// Footer magic: "TSMS" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x54, 0x53, 0x4D, 0x53];

/// Current format version
pub const VERSION: u8 = 1;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum posting list length (ids are u32)
pub const MAX_POSTING_SIZE: usize = u32::MAX as usize;

// ============================================================================
// STATE AND FLAGS
// ============================================================================

/// Build state recorded in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    /// Written by `Writer::create`; the build has not been closed.
    Building,
    /// Written by `Writer::close`; the file is complete and immutable.
    Finalized,
}

impl DbState {
    const fn tag(self) -> u8 {
        match self {
            Self::Building => 0,
            Self::Finalized => 1,
        }
    }
}

/// Format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const BOUNDARY_MARKS: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_boundary_marks(mut self, yes: bool) -> Self {
        if yes {
            self.0 |= Self::BOUNDARY_MARKS;
        } else {
            self.0 &= !Self::BOUNDARY_MARKS;
        }
        self
    }

    pub fn boundary_marks(self) -> bool {
        self.0 & Self::BOUNDARY_MARKS != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Database header (48 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbHeader {
    pub version: u8,
    pub state: DbState,
    pub char_type: CharType,
    pub flags: FormatFlags,
    pub ngram_size: u32,
    pub string_count: u32,
    pub group_count: u32,
    pub strings_len: u64,
    pub postings_len: u64,
    pub tables_len: u64,
}

impl DbHeader {
    // 4 (magic) + 4 (version, state, char_type, flags) + 4*4 (u32s, one reserved) + 3*8 (u64s) = 48
    pub const SIZE: usize = 48;

    /// Header for a build that has just started.
    pub fn building(char_type: CharType, ngram_size: u32, flags: FormatFlags) -> Self {
        Self {
            version: VERSION,
            state: DbState::Building,
            char_type,
            flags,
            ngram_size,
            string_count: 0,
            group_count: 0,
            strings_len: 0,
            postings_len: 0,
            tables_len: 0,
        }
    }

    /// Compute section byte offsets for this header.
    pub fn section_offsets(&self) -> SectionOffsets {
        SectionOffsets::from_header(self)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[
            self.version,
            self.state.tag(),
            self.char_type.tag(),
            self.flags.0,
        ])?;
        w.write_all(&self.ngram_size.to_le_bytes())?;
        w.write_all(&self.string_count.to_le_bytes())?;
        w.write_all(&self.group_count.to_le_bytes())?;
        w.write_all(&[0u8; 4])?; // reserved
        w.write_all(&self.strings_len.to_le_bytes())?;
        w.write_all(&self.postings_len.to_le_bytes())?;
        w.write_all(&self.tables_len.to_le_bytes())?;
        Ok(())
    }

    /// Format version of a file, if it starts with our magic.
    pub fn peek_version(bytes: &[u8]) -> Option<u8> {
        match bytes.get(0..5) {
            Some(prefix) if prefix[0..4] == MAGIC => Some(prefix[4]),
            _ => None,
        }
    }

    /// Parse the header at the start of `bytes`.
    ///
    /// Checks magic, version and tags. Callers decide what to do with a
    /// `Building` state.
    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("File too short for header: {} bytes", bytes.len()),
            ));
        }
        if bytes[0..4] != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected SMST, got {:?}", &bytes[0..4]),
            ));
        }

        let version = bytes[4];
        if version != VERSION {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("Unsupported version {} (expected {})", version, VERSION),
            ));
        }
        let state = match bytes[5] {
            0 => DbState::Building,
            1 => DbState::Finalized,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid build state tag {}", other),
                ))
            }
        };
        let char_type = CharType::from_tag(bytes[6]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid character type tag {}", bytes[6]),
            )
        })?;

        Ok(Self {
            version,
            state,
            char_type,
            flags: FormatFlags(bytes[7]),
            ngram_size: read_u32(bytes, 8)?,
            string_count: read_u32(bytes, 12)?,
            group_count: read_u32(bytes, 16)?,
            // bytes[20..24] is reserved
            strings_len: read_u64(bytes, 24)?,
            postings_len: read_u64(bytes, 32)?,
            tables_len: read_u64(bytes, 40)?,
        })
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbFooter {
    /// CRC32 of all sections (everything between header and footer)
    pub crc32: u32,
}

impl DbFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    /// Parse the footer from the last 8 bytes of `bytes`.
    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;
        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected TSMS, got {:?}", magic),
            ));
        }

        Ok(Self {
            crc32: read_u32(bytes, footer_start)?,
        })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// DIRECTORY AND TABLE RECORDS
// ============================================================================

/// One length-group in the directory (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupEntry {
    /// n-gram count shared by every string in the group
    pub size: u32,
    /// Number of distinct keys in the group's table
    pub entry_count: u32,
    /// Absolute offset of the group table
    pub offset: u64,
    /// Byte length of the group table
    pub len: u64,
}

impl GroupEntry {
    pub const SIZE: usize = 24;

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.size.to_le_bytes());
        buf.extend_from_slice(&self.entry_count.to_le_bytes());
        buf.extend_from_slice(&self.offset.to_le_bytes());
        buf.extend_from_slice(&self.len.to_le_bytes());
    }

    pub fn decode(bytes: &[u8], pos: usize) -> io::Result<Self> {
        Ok(Self {
            size: read_u32(bytes, pos)?,
            entry_count: read_u32(bytes, pos + 4)?,
            offset: read_u64(bytes, pos + 8)?,
            len: read_u64(bytes, pos + 16)?,
        })
    }
}

/// One key in a group table (20 bytes). Slots are sorted by key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSlot {
    /// Offset of the key inside the table's key blob
    pub key_offset: u32,
    pub key_len: u32,
    /// Absolute offset of the encoded posting list
    pub postings_offset: u64,
    /// Number of ids in the posting list
    pub doc_freq: u32,
}

impl TableSlot {
    pub const SIZE: usize = 20;

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.key_offset.to_le_bytes());
        buf.extend_from_slice(&self.key_len.to_le_bytes());
        buf.extend_from_slice(&self.postings_offset.to_le_bytes());
        buf.extend_from_slice(&self.doc_freq.to_le_bytes());
    }

    pub fn decode(bytes: &[u8], pos: usize) -> io::Result<Self> {
        Ok(Self {
            key_offset: read_u32(bytes, pos)?,
            key_len: read_u32(bytes, pos + 4)?,
            postings_offset: read_u64(bytes, pos + 8)?,
            doc_freq: read_u32(bytes, pos + 16)?,
        })
    }
}

// ============================================================================
// SECTION OFFSETS (SINGLE SOURCE OF TRUTH for the layout)
// ============================================================================

/// Section byte offsets, `(start, end)` pairs.
///
/// Layout order:
/// 1. HEADER          [48B]
/// 2. STRINGS         [strings_len]       - string records in id order
/// 3. STRING_OFFSETS  [string_count * 8]  - u64 offset of each record
/// 4. POSTINGS        [postings_len]      - delta+varint lists
/// 5. GROUP_TABLES    [tables_len]        - per-group slot arrays + key blobs
/// 6. DIRECTORY       [group_count * 24]  - sorted by group size
/// 7. FOOTER          [8B]                - CRC32 validation
///
/// Arithmetic saturates: a corrupt header yields offsets past the end of the
/// file, which the size check then rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOffsets {
    pub strings: (usize, usize),
    pub string_offsets: (usize, usize),
    pub postings: (usize, usize),
    pub group_tables: (usize, usize),
    pub directory: (usize, usize),
    pub footer: (usize, usize),
}

impl SectionOffsets {
    pub fn from_header(h: &DbHeader) -> Self {
        let len = |v: u64| usize::try_from(v).unwrap_or(usize::MAX);
        let mut pos = DbHeader::SIZE;
        let mut next = |n: usize| {
            let start = pos;
            pos = pos.saturating_add(n);
            (start, pos)
        };

        let strings = next(len(h.strings_len));
        let string_offsets = next((h.string_count as usize).saturating_mul(8));
        let postings = next(len(h.postings_len));
        let group_tables = next(len(h.tables_len));
        let directory = next((h.group_count as usize).saturating_mul(GroupEntry::SIZE));
        let footer = next(DbFooter::SIZE);

        Self {
            strings,
            string_offsets,
            postings,
            group_tables,
            directory,
            footer,
        }
    }

    /// Sections covered by the checksum
    pub fn body(&self) -> (usize, usize) {
        (DbHeader::SIZE, self.footer.0)
    }

    /// Total file size including footer
    pub fn total_size(&self) -> usize {
        self.footer.1
    }

    /// Get a slice for a section from the bytes
    #[inline]
    pub fn slice<'a>(&self, bytes: &'a [u8], section: (usize, usize)) -> Option<&'a [u8]> {
        bytes.get(section.0..section.1)
    }
}
