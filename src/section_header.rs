// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::buffer::{Endian, FileRecord};
use super::types::*;
use super::{ElfError, ElfResult};
use bitflags::bitflags;

bitflags! {
    /// Flags associated with a section header (e.g., writable, contains
    /// null-terminated strings, etc.)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShdrFlags : Elf64Xword {
        const WRITE            = 0x001;
        const ALLOC            = 0x002;
        const EXECINSTR        = 0x004;
        const MERGE            = 0x010;
        const STRINGS          = 0x020;
        const INFO_LINK        = 0x040;
        const LINK_ORDER       = 0x080;
        const OS_NONCONFORMING = 0x100;
        const GROUP            = 0x200;
        const TLS              = 0x400;
        const COMPRESSED       = 0x800;
    }
}

/// Section type, from a section header's `sh_type` member. Unrecognized
/// values fold to [`SectionType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Null,
    Progbits,
    Symtab,
    Strtab,
    Rela,
    Hash,
    Dynamic,
    Note,
    Nobits,
    Rel,
    Shlib,
    Dynsym,
    InitArray,
    FiniArray,
    PreinitArray,
    Group,
    SymtabShndx,
    GnuAttributes,
    GnuHash,
    GnuLiblist,
    GnuVerdef,
    GnuVerneed,
    GnuVersym,
    Unknown,
}

impl From<u32> for SectionType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Null,
            1 => Self::Progbits,
            2 => Self::Symtab,
            3 => Self::Strtab,
            4 => Self::Rela,
            5 => Self::Hash,
            6 => Self::Dynamic,
            7 => Self::Note,
            8 => Self::Nobits,
            9 => Self::Rel,
            10 => Self::Shlib,
            11 => Self::Dynsym,
            14 => Self::InitArray,
            15 => Self::FiniArray,
            16 => Self::PreinitArray,
            17 => Self::Group,
            18 => Self::SymtabShndx,
            0x6ffffff5 => Self::GnuAttributes,
            0x6ffffff6 => Self::GnuHash,
            0x6ffffff7 => Self::GnuLiblist,
            0x6ffffffd => Self::GnuVerdef,
            0x6ffffffe => Self::GnuVerneed,
            0x6fffffff => Self::GnuVersym,
            _ => Self::Unknown,
        }
    }
}

/// 32-bit section header as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Shdr {
    pub sh_name: Elf32Word,
    pub sh_type: Elf32Word,
    pub sh_flags: Elf32Word,
    pub sh_addr: Elf32Addr,
    pub sh_offset: Elf32Off,
    pub sh_size: Elf32Word,
    pub sh_link: Elf32Word,
    pub sh_info: Elf32Word,
    pub sh_addralign: Elf32Word,
    pub sh_entsize: Elf32Word,
}

impl FileRecord for Elf32Shdr {
    const SIZE: usize = 40;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            sh_name: e.read_u32(buf, 0),
            sh_type: e.read_u32(buf, 4),
            sh_flags: e.read_u32(buf, 8),
            sh_addr: e.read_u32(buf, 12),
            sh_offset: e.read_u32(buf, 16),
            sh_size: e.read_u32(buf, 20),
            sh_link: e.read_u32(buf, 24),
            sh_info: e.read_u32(buf, 28),
            sh_addralign: e.read_u32(buf, 32),
            sh_entsize: e.read_u32(buf, 36),
        }
    }
}

/// 64-bit section header as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Shdr {
    pub sh_name: Elf64Word,
    pub sh_type: Elf64Word,
    pub sh_flags: Elf64Xword,
    pub sh_addr: Elf64Addr,
    pub sh_offset: Elf64Off,
    pub sh_size: Elf64Xword,
    pub sh_link: Elf64Word,
    pub sh_info: Elf64Word,
    pub sh_addralign: Elf64Xword,
    pub sh_entsize: Elf64Xword,
}

impl FileRecord for Elf64Shdr {
    const SIZE: usize = 64;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            sh_name: e.read_u32(buf, 0),
            sh_type: e.read_u32(buf, 4),
            sh_flags: e.read_u64(buf, 8),
            sh_addr: e.read_u64(buf, 16),
            sh_offset: e.read_u64(buf, 24),
            sh_size: e.read_u64(buf, 32),
            sh_link: e.read_u32(buf, 40),
            sh_info: e.read_u32(buf, 44),
            sh_addralign: e.read_u64(buf, 48),
            sh_entsize: e.read_u64(buf, 56),
        }
    }
}

/// Class-tagged view over a section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfShdr {
    Elf32(Elf32Shdr),
    Elf64(Elf64Shdr),
}

impl ElfShdr {
    /// Undefined section index.
    pub const SHN_UNDEF: u32 = 0;

    /// Extended section index escape in `e_shstrndx`.
    pub const SHN_XINDEX: u32 = 0xffff;

    /// Offset of the section's name within the section name string table.
    pub fn name_offset(&self) -> u32 {
        match self {
            Self::Elf32(shdr) => shdr.sh_name,
            Self::Elf64(shdr) => shdr.sh_name,
        }
    }

    pub fn section_type(&self) -> SectionType {
        SectionType::from(self.section_type_raw())
    }

    pub fn section_type_raw(&self) -> u32 {
        match self {
            Self::Elf32(shdr) => shdr.sh_type,
            Self::Elf64(shdr) => shdr.sh_type,
        }
    }

    pub fn flags(&self) -> ShdrFlags {
        let raw = match self {
            Self::Elf32(shdr) => Elf64Xword::from(shdr.sh_flags),
            Self::Elf64(shdr) => shdr.sh_flags,
        };
        ShdrFlags::from_bits_truncate(raw)
    }

    pub fn addr(&self) -> Elf64Addr {
        match self {
            Self::Elf32(shdr) => Elf64Addr::from(shdr.sh_addr),
            Self::Elf64(shdr) => shdr.sh_addr,
        }
    }

    pub fn offset(&self) -> Elf64Off {
        match self {
            Self::Elf32(shdr) => Elf64Off::from(shdr.sh_offset),
            Self::Elf64(shdr) => shdr.sh_offset,
        }
    }

    pub fn size(&self) -> Elf64Xword {
        match self {
            Self::Elf32(shdr) => Elf64Xword::from(shdr.sh_size),
            Self::Elf64(shdr) => shdr.sh_size,
        }
    }

    /// Index of a related section; for symbol tables the associated
    /// string table, for relocation tables the associated symbol table.
    pub fn link(&self) -> u32 {
        match self {
            Self::Elf32(shdr) => shdr.sh_link,
            Self::Elf64(shdr) => shdr.sh_link,
        }
    }

    pub fn info(&self) -> u32 {
        match self {
            Self::Elf32(shdr) => shdr.sh_info,
            Self::Elf64(shdr) => shdr.sh_info,
        }
    }

    pub fn addralign(&self) -> Elf64Xword {
        match self {
            Self::Elf32(shdr) => Elf64Xword::from(shdr.sh_addralign),
            Self::Elf64(shdr) => shdr.sh_addralign,
        }
    }

    /// Fixed stride of records within the section; zero means the section
    /// is not an array of entries.
    pub fn entry_size(&self) -> Elf64Xword {
        match self {
            Self::Elf32(shdr) => Elf64Xword::from(shdr.sh_entsize),
            Self::Elf64(shdr) => shdr.sh_entsize,
        }
    }

    /// The file range holding the section's content. `SHT_NOBITS`
    /// sections occupy no space in the file and yield an empty range.
    pub fn file_range(&self) -> ElfResult<FileRange> {
        if self.section_type() != SectionType::Nobits {
            FileRange::try_from((self.offset(), self.size()))
        } else {
            FileRange::try_from((self.offset(), 0))
        }
    }

    /// Number of fixed-stride entries held by the section, or an error if
    /// the section is not an entry array.
    pub fn entry_count(&self) -> ElfResult<u64> {
        let entsize = self.entry_size();
        if entsize == 0 {
            return Err(ElfError::CannotGetEntries);
        }
        Ok(self.size() / entsize)
    }
}
