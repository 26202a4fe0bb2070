// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::buffer::{Endian, FileRecord};
use super::types::*;
use bitflags::bitflags;

bitflags! {
    /// Attributes of a program header, to specify whether the segment is
    /// readable, writable, and/or executable
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PhdrFlags : Elf64Word {
        const EXECUTE = 0x01;
        const WRITE   = 0x02;
        const READ    = 0x04;
    }
}

/// Segment type, from a program header's `p_type` member. Unrecognized
/// values fold to [`SegmentType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    Null,
    Load,
    Dynamic,
    Interp,
    Note,
    Shlib,
    Phdr,
    Tls,
    GnuEhFrame,
    GnuStack,
    GnuRelro,
    GnuProperty,
    Unknown,
}

impl From<u32> for SegmentType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Null,
            1 => Self::Load,
            2 => Self::Dynamic,
            3 => Self::Interp,
            4 => Self::Note,
            5 => Self::Shlib,
            6 => Self::Phdr,
            7 => Self::Tls,
            0x6474e550 => Self::GnuEhFrame,
            0x6474e551 => Self::GnuStack,
            0x6474e552 => Self::GnuRelro,
            0x6474e553 => Self::GnuProperty,
            _ => Self::Unknown,
        }
    }
}

/// 32-bit program header as laid out on disk. Note that the flags member
/// sits at offset 24 here, not at offset 4 as in the 64-bit layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Phdr {
    pub p_type: Elf32Word,
    pub p_offset: Elf32Off,
    pub p_vaddr: Elf32Addr,
    pub p_paddr: Elf32Addr,
    pub p_filesz: Elf32Word,
    pub p_memsz: Elf32Word,
    pub p_flags: Elf32Word,
    pub p_align: Elf32Word,
}

impl FileRecord for Elf32Phdr {
    const SIZE: usize = 32;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            p_type: e.read_u32(buf, 0),
            p_offset: e.read_u32(buf, 4),
            p_vaddr: e.read_u32(buf, 8),
            p_paddr: e.read_u32(buf, 12),
            p_filesz: e.read_u32(buf, 16),
            p_memsz: e.read_u32(buf, 20),
            p_flags: e.read_u32(buf, 24),
            p_align: e.read_u32(buf, 28),
        }
    }
}

/// 64-bit program header as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Phdr {
    pub p_type: Elf64Word,
    pub p_flags: Elf64Word,
    pub p_offset: Elf64Off,
    pub p_vaddr: Elf64Addr,
    pub p_paddr: Elf64Addr,
    pub p_filesz: Elf64Xword,
    pub p_memsz: Elf64Xword,
    pub p_align: Elf64Xword,
}

impl FileRecord for Elf64Phdr {
    const SIZE: usize = 56;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            p_type: e.read_u32(buf, 0),
            p_flags: e.read_u32(buf, 4),
            p_offset: e.read_u64(buf, 8),
            p_vaddr: e.read_u64(buf, 16),
            p_paddr: e.read_u64(buf, 24),
            p_filesz: e.read_u64(buf, 32),
            p_memsz: e.read_u64(buf, 40),
            p_align: e.read_u64(buf, 48),
        }
    }
}

/// Class-tagged view over a program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfPhdr {
    Elf32(Elf32Phdr),
    Elf64(Elf64Phdr),
}

impl ElfPhdr {
    pub fn segment_type(&self) -> SegmentType {
        SegmentType::from(self.segment_type_raw())
    }

    pub fn segment_type_raw(&self) -> u32 {
        match self {
            Self::Elf32(phdr) => phdr.p_type,
            Self::Elf64(phdr) => phdr.p_type,
        }
    }

    pub fn flags(&self) -> PhdrFlags {
        let raw = match self {
            Self::Elf32(phdr) => phdr.p_flags,
            Self::Elf64(phdr) => phdr.p_flags,
        };
        PhdrFlags::from_bits_truncate(raw)
    }

    pub fn offset(&self) -> Elf64Off {
        match self {
            Self::Elf32(phdr) => Elf64Off::from(phdr.p_offset),
            Self::Elf64(phdr) => phdr.p_offset,
        }
    }

    pub fn vaddr(&self) -> Elf64Addr {
        match self {
            Self::Elf32(phdr) => Elf64Addr::from(phdr.p_vaddr),
            Self::Elf64(phdr) => phdr.p_vaddr,
        }
    }

    pub fn paddr(&self) -> Elf64Addr {
        match self {
            Self::Elf32(phdr) => Elf64Addr::from(phdr.p_paddr),
            Self::Elf64(phdr) => phdr.p_paddr,
        }
    }

    pub fn file_size(&self) -> Elf64Xword {
        match self {
            Self::Elf32(phdr) => Elf64Xword::from(phdr.p_filesz),
            Self::Elf64(phdr) => phdr.p_filesz,
        }
    }

    pub fn mem_size(&self) -> Elf64Xword {
        match self {
            Self::Elf32(phdr) => Elf64Xword::from(phdr.p_memsz),
            Self::Elf64(phdr) => phdr.p_memsz,
        }
    }

    pub fn align(&self) -> Elf64Xword {
        match self {
            Self::Elf32(phdr) => Elf64Xword::from(phdr.p_align),
            Self::Elf64(phdr) => phdr.p_align,
        }
    }

    /// The file range backing the segment.
    pub fn file_range(&self) -> Result<FileRange, super::ElfError> {
        FileRange::try_from((self.offset(), self.file_size()))
    }
}
