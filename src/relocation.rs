// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

//! Relocation records and the per-architecture relocation-type catalogs.
//!
//! A relocation entry is polymorphic along two axes at once: the ELF
//! class picks the record width and the `r_info` packing, while the
//! containing section's type (`SHT_REL` vs `SHT_RELA`) decides whether an
//! explicit addend is present. [`ElfRelocation`] covers the full cross
//! product. The numeric relocation type is processor-specific;
//! [`ElfRelocation::reloc_type`] maps it through the catalog selected by
//! the machine architecture.

use super::buffer::{Endian, FileRecord};
use super::header::Machine;
use super::types::*;
use super::{ElfError, ElfResult};

/// 32-bit relocation entry without addend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Rel {
    pub r_offset: Elf32Addr,
    pub r_info: Elf32Word,
}

impl FileRecord for Elf32Rel {
    const SIZE: usize = 8;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            r_offset: e.read_u32(buf, 0),
            r_info: e.read_u32(buf, 4),
        }
    }
}

/// 32-bit relocation entry with addend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Rela {
    pub r_offset: Elf32Addr,
    pub r_info: Elf32Word,
    pub r_addend: Elf32Sword,
}

impl FileRecord for Elf32Rela {
    const SIZE: usize = 12;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            r_offset: e.read_u32(buf, 0),
            r_info: e.read_u32(buf, 4),
            r_addend: e.read_i32(buf, 8),
        }
    }
}

/// 64-bit relocation entry without addend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Rel {
    pub r_offset: Elf64Addr,
    pub r_info: Elf64Xword,
}

impl FileRecord for Elf64Rel {
    const SIZE: usize = 16;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            r_offset: e.read_u64(buf, 0),
            r_info: e.read_u64(buf, 8),
        }
    }
}

/// 64-bit relocation entry with addend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Rela {
    pub r_offset: Elf64Addr,
    pub r_info: Elf64Xword,
    pub r_addend: Elf64Sxword,
}

impl FileRecord for Elf64Rela {
    const SIZE: usize = 24;

    fn read(buf: &[u8], e: Endian) -> Self {
        Self {
            r_offset: e.read_u64(buf, 0),
            r_info: e.read_u64(buf, 8),
            r_addend: e.read_i64(buf, 16),
        }
    }
}

// Generates one per-architecture relocation-type catalog: the enum and
// the fallible numeric lookup stay in lockstep.
macro_rules! reloc_catalog {
    ($(#[$attr:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u32)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn from_raw(raw: u32) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

reloc_catalog! {
    /// x86_64 relocation types (`R_X86_64_*`).
    X86_64Reloc {
        None = 0,
        Abs64 = 1,
        Pc32 = 2,
        Got32 = 3,
        Plt32 = 4,
        Copy = 5,
        GlobDat = 6,
        JumpSlot = 7,
        Relative = 8,
        GotPcRel = 9,
        Abs32 = 10,
        Abs32S = 11,
        Abs16 = 12,
        Pc16 = 13,
        Abs8 = 14,
        Pc8 = 15,
        DtpMod64 = 16,
        DtpOff64 = 17,
        TpOff64 = 18,
        TlsGd = 19,
        TlsLd = 20,
        DtpOff32 = 21,
        GotTpOff = 22,
        TpOff32 = 23,
        Pc64 = 24,
        GotOff64 = 25,
        GotPc32 = 26,
        Got64 = 27,
        GotPcRel64 = 28,
        GotPc64 = 29,
        Size32 = 32,
        Size64 = 33,
        GotPc32TlsDesc = 34,
        TlsDescCall = 35,
        TlsDesc = 36,
        Irelative = 37,
        GotPcRelX = 41,
        RexGotPcRelX = 42,
    }
}

reloc_catalog! {
    /// i386 relocation types (`R_386_*`).
    I386Reloc {
        None = 0,
        Abs32 = 1,
        Pc32 = 2,
        Got32 = 3,
        Plt32 = 4,
        Copy = 5,
        GlobDat = 6,
        JmpSlot = 7,
        Relative = 8,
        GotOff = 9,
        GotPc = 10,
        Plt32Abs = 11,
        TlsTpOff = 14,
        TlsIe = 15,
        TlsGotIe = 16,
        TlsLe = 17,
        TlsGd = 18,
        TlsLdm = 19,
        Abs16 = 20,
        Pc16 = 21,
        Abs8 = 22,
        Pc8 = 23,
        Irelative = 42,
    }
}

reloc_catalog! {
    /// ARM (AArch32) relocation types (`R_ARM_*`).
    ArmReloc {
        None = 0,
        Pc24 = 1,
        Abs32 = 2,
        Rel32 = 3,
        Abs16 = 5,
        Abs12 = 6,
        Abs8 = 8,
        ThmCall = 10,
        Copy = 20,
        GlobDat = 21,
        JumpSlot = 22,
        Relative = 23,
        GotOff32 = 24,
        BasePrel = 25,
        GotBrel = 26,
        Plt32 = 27,
        Call = 28,
        Jump24 = 29,
        ThmJump24 = 30,
        Target1 = 38,
        V4Bx = 40,
        Target2 = 41,
        Prel31 = 42,
        MovwAbsNc = 43,
        MovtAbs = 44,
        TlsGd32 = 104,
        TlsLdm32 = 105,
        TlsLdo32 = 106,
        TlsIe32 = 107,
        TlsLe32 = 108,
        Irelative = 160,
    }
}

reloc_catalog! {
    /// AArch64 relocation types (`R_AARCH64_*`).
    Aarch64Reloc {
        None = 0,
        Abs64 = 257,
        Abs32 = 258,
        Abs16 = 259,
        Prel64 = 260,
        Prel32 = 261,
        Prel16 = 262,
        MovwUabsG0 = 263,
        AdrPrelLo21 = 274,
        AdrPrelPgHi21 = 275,
        AddAbsLo12Nc = 277,
        Ldst8AbsLo12Nc = 278,
        Jump26 = 282,
        Call26 = 283,
        Ldst64AbsLo12Nc = 286,
        Copy = 1024,
        GlobDat = 1025,
        JumpSlot = 1026,
        Relative = 1027,
        TlsDtpMod = 1028,
        TlsDtpRel = 1029,
        TlsTpRel = 1030,
        TlsDesc = 1031,
        Irelative = 1032,
    }
}

reloc_catalog! {
    /// RISC-V relocation types (`R_RISCV_*`).
    RiscVReloc {
        None = 0,
        Abs32 = 1,
        Abs64 = 2,
        Relative = 3,
        Copy = 4,
        JumpSlot = 5,
        TlsDtpMod32 = 6,
        TlsDtpMod64 = 7,
        TlsDtpRel32 = 8,
        TlsDtpRel64 = 9,
        TlsTpRel32 = 10,
        TlsTpRel64 = 11,
        TlsDesc = 12,
        Branch = 16,
        Jal = 17,
        Call = 18,
        CallPlt = 19,
        GotHi20 = 20,
        TlsGotHi20 = 21,
        TlsGdHi20 = 22,
        PcrelHi20 = 23,
        PcrelLo12I = 24,
        PcrelLo12S = 25,
        Hi20 = 26,
        Lo12I = 27,
        Lo12S = 28,
        Add32 = 35,
        Sub32 = 39,
        Irelative = 58,
    }
}

reloc_catalog! {
    /// MIPS relocation types (`R_MIPS_*`).
    MipsReloc {
        None = 0,
        Abs16 = 1,
        Abs32 = 2,
        Rel32 = 3,
        Jump26 = 4,
        Hi16 = 5,
        Lo16 = 6,
        GpRel16 = 7,
        Literal = 8,
        Got16 = 9,
        Pc16 = 10,
        Call16 = 11,
        GpRel32 = 12,
        Abs64 = 18,
        GotDisp = 19,
        GotPage = 20,
        GotOfst = 21,
        GotHi16 = 22,
        GotLo16 = 23,
        TlsDtpMod32 = 38,
        TlsDtpRel32 = 39,
        TlsDtpMod64 = 40,
        TlsDtpRel64 = 41,
        TlsGd = 42,
        TlsLdm = 43,
        TlsTpRel32 = 47,
        TlsTpRel64 = 48,
        Copy = 126,
        JumpSlot = 127,
    }
}

reloc_catalog! {
    /// SPARC relocation types (`R_SPARC_*`), shared by the 32-bit,
    /// 32-plus and V9 machine codes.
    SparcReloc {
        None = 0,
        Abs8 = 1,
        Abs16 = 2,
        Abs32 = 3,
        Disp8 = 4,
        Disp16 = 5,
        Disp32 = 6,
        WDisp30 = 7,
        WDisp22 = 8,
        Hi22 = 9,
        Abs22 = 10,
        Abs13 = 11,
        Lo10 = 12,
        Got10 = 13,
        Got13 = 14,
        Got22 = 15,
        Pc10 = 16,
        Pc22 = 17,
        WPlt30 = 18,
        Copy = 19,
        GlobDat = 20,
        JmpSlot = 21,
        Relative = 22,
        UA32 = 23,
        Plt32 = 24,
        Abs64 = 32,
        Olo10 = 33,
        Hh22 = 34,
        Hm10 = 35,
        Lm22 = 36,
        PcHh22 = 37,
        PcHm10 = 38,
        PcLm22 = 39,
        WDisp16 = 40,
        WDisp19 = 41,
        UA64 = 54,
        UA16 = 55,
        Irelative = 249,
    }
}

reloc_catalog! {
    /// 32-bit PowerPC relocation types (`R_PPC_*`).
    PpcReloc {
        None = 0,
        Addr32 = 1,
        Addr24 = 2,
        Addr16 = 3,
        Addr16Lo = 4,
        Addr16Hi = 5,
        Addr16Ha = 6,
        Addr14 = 7,
        Addr14BrTaken = 8,
        Addr14BrNTaken = 9,
        Rel24 = 10,
        Rel14 = 11,
        Rel14BrTaken = 12,
        Rel14BrNTaken = 13,
        Got16 = 14,
        Got16Lo = 15,
        Got16Hi = 16,
        Got16Ha = 17,
        PltRel24 = 18,
        Copy = 19,
        GlobDat = 20,
        JmpSlot = 21,
        Relative = 22,
        Local24Pc = 23,
        UAddr32 = 24,
        UAddr16 = 25,
        Rel32 = 26,
        Plt32 = 27,
        PltRel32 = 28,
    }
}

reloc_catalog! {
    /// 64-bit PowerPC relocation types (`R_PPC64_*`).
    Ppc64Reloc {
        None = 0,
        Addr32 = 1,
        Addr24 = 2,
        Addr16 = 3,
        Addr16Lo = 4,
        Addr16Hi = 5,
        Addr16Ha = 6,
        Addr14 = 7,
        Rel24 = 10,
        Rel14 = 11,
        Got16 = 14,
        Got16Lo = 15,
        Got16Hi = 16,
        Got16Ha = 17,
        Copy = 19,
        GlobDat = 20,
        JmpSlot = 21,
        Relative = 22,
        UAddr32 = 24,
        UAddr16 = 25,
        Rel32 = 26,
        Addr64 = 38,
        Addr16Higher = 39,
        Addr16Highera = 40,
        Addr16Highest = 41,
        Addr16Highesta = 42,
        UAddr64 = 43,
        Rel64 = 44,
        Toc16 = 47,
        Toc16Lo = 48,
        Toc16Hi = 49,
        Toc16Ha = 50,
        Toc = 51,
        Irelative = 248,
    }
}

reloc_catalog! {
    /// s390/s390x relocation types (`R_390_*`).
    S390Reloc {
        None = 0,
        Abs8 = 1,
        Abs12 = 2,
        Abs16 = 3,
        Abs32 = 4,
        Pc32 = 5,
        Got12 = 6,
        Got32 = 7,
        Plt32 = 8,
        Copy = 9,
        GlobDat = 10,
        JmpSlot = 11,
        Relative = 12,
        GotOff32 = 13,
        GotPc = 14,
        Got16 = 15,
        Pc16 = 16,
        Pc16Dbl = 17,
        Plt16Dbl = 18,
        Pc32Dbl = 19,
        Plt32Dbl = 20,
        GotPcDbl = 21,
        Abs64 = 22,
        Pc64 = 23,
        Got64 = 24,
        Plt64 = 25,
        GotEnt = 26,
        Irelative = 61,
    }
}

reloc_catalog! {
    /// Alpha relocation types (`R_ALPHA_*`).
    AlphaReloc {
        None = 0,
        RefLong = 1,
        RefQuad = 2,
        GpRel32 = 3,
        Literal = 4,
        Lituse = 5,
        GpDisp = 6,
        BrAddr = 7,
        Hint = 8,
        SRel16 = 9,
        SRel32 = 10,
        SRel64 = 11,
        GpRelHigh = 17,
        GpRelLow = 18,
        GpRel16 = 19,
        Copy = 24,
        GlobDat = 25,
        JmpSlot = 26,
        Relative = 27,
    }
}

reloc_catalog! {
    /// LoongArch relocation types (`R_LARCH_*`).
    LoongArchReloc {
        None = 0,
        Abs32 = 1,
        Abs64 = 2,
        Relative = 3,
        Copy = 4,
        JumpSlot = 5,
        TlsDtpMod32 = 6,
        TlsDtpMod64 = 7,
        TlsDtpRel32 = 8,
        TlsDtpRel64 = 9,
        TlsTpRel32 = 10,
        TlsTpRel64 = 11,
        Irelative = 12,
        TlsDesc32 = 13,
        TlsDesc64 = 14,
        B16 = 64,
        B21 = 65,
        B26 = 66,
        AbsHi20 = 67,
        AbsLo12 = 68,
        Abs64Lo20 = 69,
        Abs64Hi12 = 70,
        PcalaHi20 = 71,
        PcalaLo12 = 72,
        GotPcHi20 = 75,
        GotPcLo12 = 76,
    }
}

/// Relocation type keyed by machine architecture. Each arm carries the
/// decoded value from the corresponding per-architecture catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationType {
    X86_64(X86_64Reloc),
    I386(I386Reloc),
    Arm(ArmReloc),
    Aarch64(Aarch64Reloc),
    RiscV(RiscVReloc),
    Mips(MipsReloc),
    Sparc(SparcReloc),
    Ppc(PpcReloc),
    Ppc64(Ppc64Reloc),
    S390(S390Reloc),
    Alpha(AlphaReloc),
    LoongArch(LoongArchReloc),
}

/// View over a relocation entry, covering the
/// `{rel, rela} x {class32, class64}` cross product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfRelocation {
    Rel32(Elf32Rel),
    Rela32(Elf32Rela),
    Rel64(Elf64Rel),
    Rela64(Elf64Rela),
}

impl ElfRelocation {
    /// Whether the entry carries an explicit addend.
    pub fn is_rela(&self) -> bool {
        matches!(self, Self::Rela32(_) | Self::Rela64(_))
    }

    /// Location the relocation applies to; a section offset in
    /// relocatable files, a virtual address otherwise.
    pub fn offset(&self) -> Elf64Addr {
        match self {
            Self::Rel32(rel) => Elf64Addr::from(rel.r_offset),
            Self::Rela32(rela) => Elf64Addr::from(rela.r_offset),
            Self::Rel64(rel) => rel.r_offset,
            Self::Rela64(rela) => rela.r_offset,
        }
    }

    /// The raw packed symbol-index/type member, zero-extended.
    pub fn info(&self) -> Elf64Xword {
        match self {
            Self::Rel32(rel) => Elf64Xword::from(rel.r_info),
            Self::Rela32(rela) => Elf64Xword::from(rela.r_info),
            Self::Rel64(rel) => rel.r_info,
            Self::Rela64(rela) => rela.r_info,
        }
    }

    /// The explicit addend, or [`None`] for addend-less entries.
    pub fn addend(&self) -> Option<Elf64Sxword> {
        match self {
            Self::Rel32(_) | Self::Rel64(_) => None,
            Self::Rela32(rela) => Some(Elf64Sxword::from(rela.r_addend)),
            Self::Rela64(rela) => Some(rela.r_addend),
        }
    }

    /// Extracts the symbol index from the `r_info` member. Class 32
    /// packs it into the upper 24 bits, class 64 into the upper 32.
    pub fn symbol_index(&self) -> u32 {
        match self {
            Self::Rel32(rel) => rel.r_info >> 8,
            Self::Rela32(rela) => rela.r_info >> 8,
            Self::Rel64(rel) => (rel.r_info >> 32) as u32,
            Self::Rela64(rela) => (rela.r_info >> 32) as u32,
        }
    }

    /// Extracts the raw relocation type from the `r_info` member. Class
    /// 32 keeps it in the low byte, class 64 in the low 32 bits.
    pub fn type_raw(&self) -> u32 {
        match self {
            Self::Rel32(rel) => rel.r_info & 0xff,
            Self::Rela32(rela) => rela.r_info & 0xff,
            Self::Rel64(rel) => (rel.r_info & 0xffffffff) as u32,
            Self::Rela64(rela) => (rela.r_info & 0xffffffff) as u32,
        }
    }

    /// Decodes the relocation type through the catalog of the given
    /// machine architecture.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::UnknownRelocationArch`] if no catalog exists
    /// for `machine` and [`ElfError::UnknownRelocationCode`] if the raw
    /// type value is not part of that machine's catalog.
    pub fn reloc_type(&self, machine: Machine) -> ElfResult<RelocationType> {
        let raw = self.type_raw();
        match machine {
            Machine::X86_64 => X86_64Reloc::from_raw(raw)
                .map(RelocationType::X86_64)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::I386 => I386Reloc::from_raw(raw)
                .map(RelocationType::I386)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Arm => ArmReloc::from_raw(raw)
                .map(RelocationType::Arm)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Aarch64 => Aarch64Reloc::from_raw(raw)
                .map(RelocationType::Aarch64)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::RiscV => RiscVReloc::from_raw(raw)
                .map(RelocationType::RiscV)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Mips | Machine::MipsRs3Le => MipsReloc::from_raw(raw)
                .map(RelocationType::Mips)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Sparc | Machine::Sparc32Plus | Machine::SparcV9 => SparcReloc::from_raw(raw)
                .map(RelocationType::Sparc)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Ppc => PpcReloc::from_raw(raw)
                .map(RelocationType::Ppc)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Ppc64 => Ppc64Reloc::from_raw(raw)
                .map(RelocationType::Ppc64)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::S390 => S390Reloc::from_raw(raw)
                .map(RelocationType::S390)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::Alpha => AlphaReloc::from_raw(raw)
                .map(RelocationType::Alpha)
                .ok_or(ElfError::UnknownRelocationCode),
            Machine::LoongArch => LoongArchReloc::from_raw(raw)
                .map(RelocationType::LoongArch)
                .ok_or(ElfError::UnknownRelocationCode),
            _ => Err(ElfError::UnknownRelocationArch),
        }
    }
}
