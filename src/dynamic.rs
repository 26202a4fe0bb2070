// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::buffer::{Endian, FileRecord};
use super::types::*;

/// Dynamic-section entry tag. The value member's interpretation (virtual
/// address, size, or `.dynstr` offset) depends on the tag. Unrecognized
/// tags fold to [`DynamicTag::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicTag {
    Null,
    Needed,
    PltRelSz,
    PltGot,
    Hash,
    Strtab,
    Symtab,
    Rela,
    RelaSz,
    RelaEnt,
    StrSz,
    SymEnt,
    Init,
    Fini,
    Soname,
    Rpath,
    Symbolic,
    Rel,
    RelSz,
    RelEnt,
    PltRel,
    Debug,
    TextRel,
    JmpRel,
    BindNow,
    InitArray,
    FiniArray,
    InitArraySz,
    FiniArraySz,
    Runpath,
    Flags,
    PreinitArray,
    PreinitArraySz,
    SymtabShndx,
    RelrSz,
    Relr,
    RelrEnt,
    GnuHash,
    Config,
    DepAudit,
    Audit,
    VerSym,
    RelaCount,
    RelCount,
    Flags1,
    VerDef,
    VerDefNum,
    VerNeed,
    VerNeedNum,
    Auxiliary,
    Filter,
    Unknown,
}

impl From<i64> for DynamicTag {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Null,
            1 => Self::Needed,
            2 => Self::PltRelSz,
            3 => Self::PltGot,
            4 => Self::Hash,
            5 => Self::Strtab,
            6 => Self::Symtab,
            7 => Self::Rela,
            8 => Self::RelaSz,
            9 => Self::RelaEnt,
            10 => Self::StrSz,
            11 => Self::SymEnt,
            12 => Self::Init,
            13 => Self::Fini,
            14 => Self::Soname,
            15 => Self::Rpath,
            16 => Self::Symbolic,
            17 => Self::Rel,
            18 => Self::RelSz,
            19 => Self::RelEnt,
            20 => Self::PltRel,
            21 => Self::Debug,
            22 => Self::TextRel,
            23 => Self::JmpRel,
            24 => Self::BindNow,
            25 => Self::InitArray,
            26 => Self::FiniArray,
            27 => Self::InitArraySz,
            28 => Self::FiniArraySz,
            29 => Self::Runpath,
            30 => Self::Flags,
            32 => Self::PreinitArray,
            33 => Self::PreinitArraySz,
            34 => Self::SymtabShndx,
            35 => Self::RelrSz,
            36 => Self::Relr,
            37 => Self::RelrEnt,
            0x6ffffef5 => Self::GnuHash,
            0x6ffffefa => Self::Config,
            0x6ffffefb => Self::DepAudit,
            0x6ffffefc => Self::Audit,
            0x6ffffff0 => Self::VerSym,
            0x6ffffff9 => Self::RelaCount,
            0x6ffffffa => Self::RelCount,
            0x6ffffffb => Self::Flags1,
            0x6ffffffc => Self::VerDef,
            0x6ffffffd => Self::VerDefNum,
            0x6ffffffe => Self::VerNeed,
            0x6fffffff => Self::VerNeedNum,
            0x7ffffffd => Self::Auxiliary,
            0x7fffffff => Self::Filter,
            _ => Self::Unknown,
        }
    }
}

impl DynamicTag {
    /// Whether this tag's value member is an offset into `.dynstr`.
    pub fn is_string_offset(self) -> bool {
        matches!(
            self,
            Self::Needed
                | Self::Soname
                | Self::Rpath
                | Self::Runpath
                | Self::Auxiliary
                | Self::Filter
                | Self::Config
                | Self::DepAudit
                | Self::Audit
        )
    }
}

/// 32-bit dynamic-section entry as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Dyn {
    pub d_tag: Elf32Sword,
    pub d_val: Elf32Word,
}

impl FileRecord for Elf32Dyn {
    const SIZE: usize = 8;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            d_tag: e.read_i32(buf, 0),
            d_val: e.read_u32(buf, 4),
        }
    }
}

/// 64-bit dynamic-section entry as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Dyn {
    pub d_tag: Elf64Sxword,
    pub d_val: Elf64Xword,
}

impl FileRecord for Elf64Dyn {
    const SIZE: usize = 16;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            d_tag: e.read_i64(buf, 0),
            d_val: e.read_u64(buf, 8),
        }
    }
}

/// Class-tagged view over a dynamic-section entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfDyn {
    Elf32(Elf32Dyn),
    Elf64(Elf64Dyn),
}

impl ElfDyn {
    pub fn tag(&self) -> DynamicTag {
        DynamicTag::from(self.tag_raw())
    }

    /// The raw tag, sign-extended to 64 bits.
    pub fn tag_raw(&self) -> Elf64Sxword {
        match self {
            Self::Elf32(dynent) => Elf64Sxword::from(dynent.d_tag),
            Self::Elf64(dynent) => dynent.d_tag,
        }
    }

    /// The value member; a virtual address, a size, or a `.dynstr`
    /// offset depending on the tag.
    pub fn value(&self) -> Elf64Xword {
        match self {
            Self::Elf32(dynent) => Elf64Xword::from(dynent.d_val),
            Self::Elf64(dynent) => dynent.d_val,
        }
    }
}
