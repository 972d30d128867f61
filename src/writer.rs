// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Database construction.
//!
//! A `Writer` owns the only handle to a database under construction. Strings
//! go to disk as they arrive; posting lists accumulate in memory, one map per
//! length-group, and are laid out by `close()`, which also flips the header to
//! `Finalized`. Until then a reader refuses the file.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **IDS_ASCENDING**: ids are handed out in insertion order, so every
//!    posting list is strictly ascending without a sort.
//! 2. **ONE_ENTRY_PER_KEY**: a string's n-gram keys are distinct (occurrence
//!    tagging), so an id appears at most once per posting list.
//! 3. **CLOSE_ONCE**: after `close()` the writer accepts nothing, including a
//!    second `close()`.

use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crc32fast::Hasher as Crc32Hasher;

use crate::binary::{
    encode_postings, encode_string, DbFooter, DbHeader, DbState, FormatFlags, GroupEntry,
    TableSlot, MAGIC,
};
use crate::config::IndexConfig;
use crate::error::{BuildError, ConfigError};
use crate::ngram::{CodeUnit, NgramGenerator};

/// Posting lists of one length-group, keyed by n-gram key.
type GroupPostings = HashMap<Vec<u8>, Vec<u32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Open,
    Closed,
}

/// Exclusive build handle for one database file.
pub struct Writer<C: CodeUnit> {
    path: PathBuf,
    out: CountingWriter,
    generator: NgramGenerator,
    header: DbHeader,
    /// Offset of each string record relative to the STRINGS section
    string_offsets: Vec<u64>,
    groups: BTreeMap<u32, GroupPostings>,
    state: WriterState,
    _unit: PhantomData<C>,
}

impl<C: CodeUnit> Writer<C> {
    /// Start a new database at `path`.
    ///
    /// An existing finalized database is never overwritten, nor is a non-empty
    /// file that is not a database at all. Leftovers of an unfinished build
    /// are.
    pub fn create(path: impl AsRef<Path>, config: &IndexConfig) -> Result<Self, BuildError> {
        let path = path.as_ref().to_path_buf();
        let generator = config.generator()?;
        if config.char_type != C::CHAR_TYPE {
            return Err(ConfigError::CharTypeMismatch {
                configured: config.char_type,
                engine: C::CHAR_TYPE,
            }
            .into());
        }
        check_replaceable(&path)?;

        let flags = FormatFlags::new().with_boundary_marks(config.boundary_marks);
        let header = DbHeader::building(C::CHAR_TYPE, generator.n() as u32, flags);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| BuildError::io(&path, e))?;
        let mut out = CountingWriter::new(file);
        header
            .write(&mut out.inner)
            .and_then(|()| out.inner.flush())
            .map_err(|e| BuildError::io(&path, e))?;

        tracing::debug!(
            path = %path.display(),
            n = config.ngram_size,
            char_type = %C::CHAR_TYPE,
            boundary_marks = config.boundary_marks,
            "created database"
        );

        Ok(Self {
            path,
            out,
            generator,
            header,
            string_offsets: Vec::new(),
            groups: BTreeMap::new(),
            state: WriterState::Open,
            _unit: PhantomData,
        })
    }

    /// Add one string. Duplicates are kept as separate entries.
    pub fn insert(&mut self, s: &str) -> Result<(), BuildError> {
        self.ensure_open()?;
        let id = u32::try_from(self.string_offsets.len())
            .ok()
            .filter(|&id| id < u32::MAX)
            .ok_or(BuildError::TooManyStrings)?;

        let keys = self.generator.keys::<C>(s);
        let size = u32::try_from(keys.len()).map_err(|_| BuildError::SectionTooLarge {
            section: "n-grams of one string",
            len: keys.len() as u64,
        })?;

        let mut record = Vec::with_capacity(s.len() + 2);
        encode_string(s, &mut record);
        let offset = self.out.written;
        self.out
            .write_all(&record)
            .map_err(|e| BuildError::io(&self.path, e))?;
        self.string_offsets.push(offset);

        let group = self.groups.entry(size).or_default();
        for key in keys {
            group.entry(key).or_default().push(id);
        }
        Ok(())
    }

    /// Write the index, finalize the header, and sync to disk.
    ///
    /// Everything inserted before this call is durable when it returns `Ok`.
    pub fn close(&mut self) -> Result<(), BuildError> {
        self.ensure_open()?;
        self.state = WriterState::Closed;
        let path = self.path.clone();
        let io_err = |e| BuildError::io(&path, e);

        let strings_len = self.out.written;

        // STRING_OFFSETS
        let mut buf = Vec::with_capacity(self.string_offsets.len() * 8);
        for &offset in &self.string_offsets {
            buf.extend_from_slice(&offset.to_le_bytes());
        }
        self.out.write_all(&buf).map_err(io_err)?;

        // POSTINGS, collecting one slot table per group
        let postings_start = DbHeader::SIZE as u64 + self.out.written;
        let groups = std::mem::take(&mut self.groups);
        let mut tables = Vec::with_capacity(groups.len());
        for (size, postings) in groups {
            let mut entries: Vec<(Vec<u8>, Vec<u32>)> = postings.into_iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

            let mut slots = Vec::with_capacity(entries.len());
            let mut keys = Vec::new();
            for (key, ids) in entries {
                buf.clear();
                encode_postings(&ids, &mut buf);
                slots.push(TableSlot {
                    key_offset: section_u32("group key blob", keys.len())?,
                    key_len: section_u32("n-gram key", key.len())?,
                    postings_offset: DbHeader::SIZE as u64 + self.out.written,
                    doc_freq: ids.len() as u32,
                });
                keys.extend_from_slice(&key);
                self.out.write_all(&buf).map_err(io_err)?;
            }
            tables.push((size, slots, keys));
        }
        let postings_len = DbHeader::SIZE as u64 + self.out.written - postings_start;

        // GROUP_TABLES
        let tables_start = DbHeader::SIZE as u64 + self.out.written;
        let mut directory = Vec::with_capacity(tables.len());
        for (size, slots, keys) in &tables {
            buf.clear();
            for slot in slots {
                slot.encode(&mut buf);
            }
            buf.extend_from_slice(keys);
            directory.push(GroupEntry {
                size: *size,
                entry_count: slots.len() as u32,
                offset: DbHeader::SIZE as u64 + self.out.written,
                len: buf.len() as u64,
            });
            self.out.write_all(&buf).map_err(io_err)?;
        }
        let tables_len = DbHeader::SIZE as u64 + self.out.written - tables_start;

        // DIRECTORY
        buf.clear();
        for entry in &directory {
            entry.encode(&mut buf);
        }
        self.out.write_all(&buf).map_err(io_err)?;

        // FOOTER
        let crc32 = self.out.crc.clone().finalize();
        DbFooter { crc32 }
            .write(&mut self.out.inner)
            .map_err(io_err)?;

        // HEADER, last: this is what makes the database visible to readers
        self.header.state = DbState::Finalized;
        self.header.string_count = self.string_offsets.len() as u32;
        self.header.group_count = directory.len() as u32;
        self.header.strings_len = strings_len;
        self.header.postings_len = postings_len;
        self.header.tables_len = tables_len;

        self.out.inner.flush().map_err(io_err)?;
        let file = self.out.inner.get_mut();
        file.seek(SeekFrom::Start(0)).map_err(io_err)?;
        self.header.write(file).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        tracing::info!(
            path = %self.path.display(),
            strings = self.header.string_count,
            groups = self.header.group_count,
            bytes = DbHeader::SIZE as u64 + self.out.written + DbFooter::SIZE as u64,
            "finalized database"
        );
        Ok(())
    }

    /// Number of strings inserted so far.
    pub fn len(&self) -> usize {
        self.string_offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.string_offsets.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    fn ensure_open(&self) -> Result<(), BuildError> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Closed => Err(BuildError::Closed(self.path.clone())),
        }
    }
}

impl<C: CodeUnit> Drop for Writer<C> {
    fn drop(&mut self) {
        if self.state == WriterState::Open {
            tracing::warn!(
                path = %self.path.display(),
                strings = self.string_offsets.len(),
                "writer dropped without close(); database left unfinalized"
            );
        }
    }
}

fn section_u32(section: &'static str, len: usize) -> Result<u32, BuildError> {
    u32::try_from(len).map_err(|_| BuildError::SectionTooLarge {
        section,
        len: len as u64,
    })
}

/// Fails unless `path` is absent, empty, or an unfinished build.
fn check_replaceable(path: &Path) -> Result<(), BuildError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(BuildError::io(path, e)),
    };
    let mut prefix = Vec::with_capacity(DbHeader::SIZE);
    Read::by_ref(&mut file)
        .take(DbHeader::SIZE as u64)
        .read_to_end(&mut prefix)
        .map_err(|e| BuildError::io(path, e))?;

    if prefix.is_empty() {
        return Ok(());
    }
    if !prefix.starts_with(&MAGIC) {
        return Err(BuildError::NotADatabase(path.to_path_buf()));
    }
    match DbHeader::read(&prefix) {
        Ok(header) if header.state == DbState::Finalized => {
            Err(BuildError::AlreadyFinalized(path.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// Buffered body writer that tracks the byte count and running checksum.
struct CountingWriter {
    inner: BufWriter<File>,
    crc: Crc32Hasher,
    /// Bytes written after the header
    written: u64,
}

impl CountingWriter {
    fn new(file: File) -> Self {
        Self {
            inner: BufWriter::new(file),
            crc: Crc32Hasher::new(),
            written: 0,
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(bytes)?;
        self.crc.update(bytes);
        self.written += bytes.len() as u64;
        Ok(())
    }
}
