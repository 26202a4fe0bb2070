// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Carlos López <carlos.lopez@suse.com>
//
// vim: ts=4 sw=4 et

//! The file-backed byte buffer underneath an [`crate::Elf`] instance.
//!
//! The buffer carries the file's byte order and applies it inside the
//! primitive scalar reads; the typed record views built on top never see
//! endianness. A read-write buffer maps the file private copy-on-write,
//! so in-place edits are visible through the mapping but the backing file
//! itself stays untouched until [`MappedBuffer::persist_to`] writes the
//! current contents somewhere new.

use super::{ElfError, ElfResult};

use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Byte order of the mapped file's multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub(crate) fn read_u16(self, buf: &[u8], off: usize) -> u16 {
        let b = buf[off..off + 2].try_into().unwrap();
        match self {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        }
    }

    pub(crate) fn read_u32(self, buf: &[u8], off: usize) -> u32 {
        let b = buf[off..off + 4].try_into().unwrap();
        match self {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        }
    }

    pub(crate) fn read_u64(self, buf: &[u8], off: usize) -> u64 {
        let b = buf[off..off + 8].try_into().unwrap();
        match self {
            Endian::Little => u64::from_le_bytes(b),
            Endian::Big => u64::from_be_bytes(b),
        }
    }

    pub(crate) fn read_i32(self, buf: &[u8], off: usize) -> i32 {
        self.read_u32(buf, off) as i32
    }

    pub(crate) fn read_i64(self, buf: &[u8], off: usize) -> i64 {
        self.read_u64(buf, off) as i64
    }
}

/// Mapping mode requested when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// A fixed-layout on-disk record that can be decoded from a byte buffer
/// of at least [`FileRecord::SIZE`] bytes in a given byte order.
pub trait FileRecord: Sized {
    /// On-disk size of the record layout in bytes.
    const SIZE: usize;

    /// Decodes one record from the start of `buf`, which must hold at
    /// least [`FileRecord::SIZE`] bytes.
    fn read(buf: &[u8], endian: Endian) -> Self;
}

#[derive(Debug)]
enum Mapping {
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

/// A memory-mapped file plus the byte order its contents are encoded in.
#[derive(Debug)]
pub struct MappedBuffer {
    mapping: Mapping,
    endian: Endian,
}

impl MappedBuffer {
    /// Maps the entire file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OpenFailed`] if the file cannot be opened and
    /// [`ElfError::MapFailed`] if the mapping cannot be established.
    pub fn open<P: AsRef<Path>>(path: P, endian: Endian, access: Access) -> ElfResult<Self> {
        let file = File::open(path).map_err(ElfError::OpenFailed)?;
        Self::from_file(&file, endian, access)
    }

    /// Maps an already-open file. Read-write access maps the file private
    /// copy-on-write: modifications hit the mapping only, never the
    /// backing file.
    pub fn from_file(file: &File, endian: Endian, access: Access) -> ElfResult<Self> {
        let mapping = match access {
            // SAFETY: the mapping is kept private to this process and the
            // process does not truncate the backing file while it is
            // mapped.
            Access::ReadOnly => {
                Mapping::ReadOnly(unsafe { Mmap::map(file) }.map_err(ElfError::MapFailed)?)
            }
            Access::ReadWrite => Mapping::ReadWrite(
                unsafe { MmapOptions::new().map_copy(file) }.map_err(ElfError::MapFailed)?,
            ),
        };
        Ok(Self { mapping, endian })
    }

    /// Length of the mapped region in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// The byte order the buffer was opened with.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Whether the buffer was opened read-write.
    pub fn is_mutable(&self) -> bool {
        matches!(self.mapping, Mapping::ReadWrite(_))
    }

    /// The full mapped region.
    pub fn as_slice(&self) -> &[u8] {
        match &self.mapping {
            Mapping::ReadOnly(map) => map,
            Mapping::ReadWrite(map) => map,
        }
    }

    /// Returns the `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::InvalidOffset`] when `[offset, offset + len)`
    /// does not lie within the mapping.
    pub fn bytes(&self, offset: usize, len: usize) -> ElfResult<&[u8]> {
        let end = offset.checked_add(len).ok_or(ElfError::InvalidOffset)?;
        if end > self.len() {
            return Err(ElfError::InvalidOffset);
        }
        Ok(&self.as_slice()[offset..end])
    }

    /// Decodes one fixed-layout record at `offset`, honoring the buffer's
    /// byte order.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::InvalidOffset`] when the record does not fit
    /// within the mapping.
    pub fn read_record<T: FileRecord>(&self, offset: usize) -> ElfResult<T> {
        let buf = self.bytes(offset, T::SIZE)?;
        Ok(T::read(buf, self.endian))
    }

    /// Overwrites `bytes.len()` bytes of the mapping at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NotMutable`] on a read-only buffer and
    /// [`ElfError::InvalidOffset`] when the write would run past the end
    /// of the mapping.
    pub fn write_bytes(&mut self, bytes: &[u8], offset: usize) -> ElfResult<()> {
        let end = offset
            .checked_add(bytes.len())
            .ok_or(ElfError::InvalidOffset)?;
        if end > self.len() {
            return Err(ElfError::InvalidOffset);
        }
        match &mut self.mapping {
            Mapping::ReadOnly(_) => Err(ElfError::NotMutable),
            Mapping::ReadWrite(map) => {
                map[offset..end].copy_from_slice(bytes);
                Ok(())
            }
        }
    }

    /// Creates a new file at `path` holding the buffer's current
    /// contents. The backing file of the mapping is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoMutableBuffer`] on a read-only buffer,
    /// [`ElfError::OpenFailed`] when the destination cannot be created
    /// and [`ElfError::WriteFailed`] when writing to it fails.
    pub fn persist_to<P: AsRef<Path>>(&self, path: P) -> ElfResult<()> {
        if !self.is_mutable() {
            return Err(ElfError::NoMutableBuffer);
        }
        let mut file = File::create(path).map_err(ElfError::OpenFailed)?;
        file.write_all(self.as_slice()).map_err(ElfError::WriteFailed)
    }
}
