// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::buffer::{Endian, FileRecord};
use super::types::*;

/// ELF class, selecting the on-disk record widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

/// Object file type, from the file header's `e_type` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    None,
    Rel,
    Exec,
    Dyn,
    Core,
    Unknown,
}

impl From<u16> for ObjectType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Rel,
            2 => Self::Exec,
            3 => Self::Dyn,
            4 => Self::Core,
            _ => Self::Unknown,
        }
    }
}

/// Target machine architecture, from the file header's `e_machine` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    None,
    M32,
    Sparc,
    I386,
    M68K,
    M88K,
    I860,
    Mips,
    S370,
    MipsRs3Le,
    PaRisc,
    Sparc32Plus,
    I960,
    Ppc,
    Ppc64,
    S390,
    Arm,
    SuperH,
    SparcV9,
    Ia64,
    X86_64,
    Aarch64,
    RiscV,
    Bpf,
    LoongArch,
    Alpha,
    Unknown,
}

impl From<u16> for Machine {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::M32,
            2 => Self::Sparc,
            3 => Self::I386,
            4 => Self::M68K,
            5 => Self::M88K,
            7 => Self::I860,
            8 => Self::Mips,
            9 => Self::S370,
            10 => Self::MipsRs3Le,
            15 => Self::PaRisc,
            18 => Self::Sparc32Plus,
            19 => Self::I960,
            20 => Self::Ppc,
            21 => Self::Ppc64,
            22 => Self::S390,
            40 => Self::Arm,
            42 => Self::SuperH,
            43 => Self::SparcV9,
            50 => Self::Ia64,
            62 => Self::X86_64,
            183 => Self::Aarch64,
            243 => Self::RiscV,
            247 => Self::Bpf,
            258 => Self::LoongArch,
            0x9026 => Self::Alpha,
            _ => Self::Unknown,
        }
    }
}

/// OS/ABI identification, from `e_ident[EI_OSABI]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsAbi {
    SysV,
    HpUx,
    NetBsd,
    Gnu,
    Solaris,
    Aix,
    Irix,
    FreeBsd,
    Tru64,
    Modesto,
    OpenBsd,
    ArmAeabi,
    Arm,
    Standalone,
    Unknown,
}

impl From<u8> for OsAbi {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::SysV,
            1 => Self::HpUx,
            2 => Self::NetBsd,
            3 => Self::Gnu,
            6 => Self::Solaris,
            7 => Self::Aix,
            8 => Self::Irix,
            9 => Self::FreeBsd,
            10 => Self::Tru64,
            11 => Self::Modesto,
            12 => Self::OpenBsd,
            64 => Self::ArmAeabi,
            97 => Self::Arm,
            255 => Self::Standalone,
            _ => Self::Unknown,
        }
    }
}

/// 32-bit ELF file header as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Ehdr {
    pub e_ident: [Elf64char; 16],
    pub e_type: Elf32Half,
    pub e_machine: Elf32Half,
    pub e_version: Elf32Word,
    pub e_entry: Elf32Addr,
    pub e_phoff: Elf32Off,
    pub e_shoff: Elf32Off,
    pub e_flags: Elf32Word,
    pub e_ehsize: Elf32Half,
    pub e_phentsize: Elf32Half,
    pub e_phnum: Elf32Half,
    pub e_shentsize: Elf32Half,
    pub e_shnum: Elf32Half,
    pub e_shstrndx: Elf32Half,
}

impl FileRecord for Elf32Ehdr {
    const SIZE: usize = 52;

    fn read(buf: &[u8], e: Endian) -> Self {
        let e_ident: [Elf64char; 16] = buf[..16].try_into().unwrap();
        Self {
            e_ident,
            e_type: e.read_u16(buf, 16),
            e_machine: e.read_u16(buf, 18),
            e_version: e.read_u32(buf, 20),
            e_entry: e.read_u32(buf, 24),
            e_phoff: e.read_u32(buf, 28),
            e_shoff: e.read_u32(buf, 32),
            e_flags: e.read_u32(buf, 36),
            e_ehsize: e.read_u16(buf, 40),
            e_phentsize: e.read_u16(buf, 42),
            e_phnum: e.read_u16(buf, 44),
            e_shentsize: e.read_u16(buf, 46),
            e_shnum: e.read_u16(buf, 48),
            e_shstrndx: e.read_u16(buf, 50),
        }
    }
}

/// 64-bit ELF file header as laid out on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Ehdr {
    pub e_ident: [Elf64char; 16],
    pub e_type: Elf64Half,
    pub e_machine: Elf64Half,
    pub e_version: Elf64Word,
    pub e_entry: Elf64Addr,
    pub e_phoff: Elf64Off,
    pub e_shoff: Elf64Off,
    pub e_flags: Elf64Word,
    pub e_ehsize: Elf64Half,
    pub e_phentsize: Elf64Half,
    pub e_phnum: Elf64Half,
    pub e_shentsize: Elf64Half,
    pub e_shnum: Elf64Half,
    pub e_shstrndx: Elf64Half,
}

impl FileRecord for Elf64Ehdr {
    const SIZE: usize = 64;

    fn read(buf: &[u8], e: Endian) -> Self {
        let e_ident: [Elf64char; 16] = buf[..16].try_into().unwrap();
        Self {
            e_ident,
            e_type: e.read_u16(buf, 16),
            e_machine: e.read_u16(buf, 18),
            e_version: e.read_u32(buf, 20),
            e_entry: e.read_u64(buf, 24),
            e_phoff: e.read_u64(buf, 32),
            e_shoff: e.read_u64(buf, 40),
            e_flags: e.read_u32(buf, 48),
            e_ehsize: e.read_u16(buf, 52),
            e_phentsize: e.read_u16(buf, 54),
            e_phnum: e.read_u16(buf, 56),
            e_shentsize: e.read_u16(buf, 58),
            e_shnum: e.read_u16(buf, 60),
            e_shstrndx: e.read_u16(buf, 62),
        }
    }
}

/// Class-tagged view over the ELF file header. All accessors hide the
/// class distinction; 32-bit address and offset fields are zero-extended
/// to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfHdr {
    Elf32(Elf32Ehdr),
    Elf64(Elf64Ehdr),
}

impl ElfHdr {
    pub const EI_CLASS: usize = 4;
    pub const EI_DATA: usize = 5;
    pub const EI_VERSION: usize = 6;
    pub const EI_OSABI: usize = 7;
    pub const EI_ABIVERSION: usize = 8;
    pub const EI_NIDENT: usize = 16;

    pub const ELFMAG: [Elf64char; 4] = [0x7f, b'E', b'L', b'F'];

    pub const ELFCLASS32: Elf64char = 1;
    pub const ELFCLASS64: Elf64char = 2;

    pub const ELFDATA2LSB: Elf64char = 1;
    pub const ELFDATA2MSB: Elf64char = 2;

    pub fn class(&self) -> Class {
        match self {
            Self::Elf32(_) => Class::Elf32,
            Self::Elf64(_) => Class::Elf64,
        }
    }

    fn ident(&self) -> &[Elf64char; 16] {
        match self {
            Self::Elf32(hdr) => &hdr.e_ident,
            Self::Elf64(hdr) => &hdr.e_ident,
        }
    }

    pub fn osabi(&self) -> OsAbi {
        OsAbi::from(self.osabi_raw())
    }

    pub fn osabi_raw(&self) -> u8 {
        self.ident()[Self::EI_OSABI]
    }

    pub fn abi_version(&self) -> u8 {
        self.ident()[Self::EI_ABIVERSION]
    }

    pub fn object_type(&self) -> ObjectType {
        ObjectType::from(self.object_type_raw())
    }

    pub fn object_type_raw(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_type,
            Self::Elf64(hdr) => hdr.e_type,
        }
    }

    pub fn machine(&self) -> Machine {
        Machine::from(self.machine_raw())
    }

    pub fn machine_raw(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_machine,
            Self::Elf64(hdr) => hdr.e_machine,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::Elf32(hdr) => hdr.e_version,
            Self::Elf64(hdr) => hdr.e_version,
        }
    }

    pub fn entry(&self) -> Elf64Addr {
        match self {
            Self::Elf32(hdr) => Elf64Addr::from(hdr.e_entry),
            Self::Elf64(hdr) => hdr.e_entry,
        }
    }

    pub fn phoff(&self) -> Elf64Off {
        match self {
            Self::Elf32(hdr) => Elf64Off::from(hdr.e_phoff),
            Self::Elf64(hdr) => hdr.e_phoff,
        }
    }

    pub fn shoff(&self) -> Elf64Off {
        match self {
            Self::Elf32(hdr) => Elf64Off::from(hdr.e_shoff),
            Self::Elf64(hdr) => hdr.e_shoff,
        }
    }

    pub fn flags(&self) -> u32 {
        match self {
            Self::Elf32(hdr) => hdr.e_flags,
            Self::Elf64(hdr) => hdr.e_flags,
        }
    }

    pub fn ehsize(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_ehsize,
            Self::Elf64(hdr) => hdr.e_ehsize,
        }
    }

    pub fn phentsize(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_phentsize,
            Self::Elf64(hdr) => hdr.e_phentsize,
        }
    }

    pub fn phnum(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_phnum,
            Self::Elf64(hdr) => hdr.e_phnum,
        }
    }

    pub fn shentsize(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_shentsize,
            Self::Elf64(hdr) => hdr.e_shentsize,
        }
    }

    /// Raw `e_shnum` member. When zero with a nonzero `e_shoff`, the real
    /// count lives in section header 0's `sh_size`; [`crate::Elf`] applies
    /// that extension and exposes the effective count.
    pub fn shnum(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_shnum,
            Self::Elf64(hdr) => hdr.e_shnum,
        }
    }

    /// Raw `e_shstrndx` member. `SHN_XINDEX` redirects to section header
    /// 0's `sh_link`; [`crate::Elf`] applies that extension.
    pub fn shstrndx(&self) -> u16 {
        match self {
            Self::Elf32(hdr) => hdr.e_shstrndx,
            Self::Elf64(hdr) => hdr.e_shstrndx,
        }
    }
}
