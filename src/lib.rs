// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

//! Reading and light in-place editing of ELF object files.
//!
//! The crate memory-maps an ELF file and builds typed, class-agnostic
//! views on top of it: one [`MappedBuffer`] carrying the file's byte
//! order, record views dispatching on the ELF class (32 vs 64 bit), and
//! an [`Elf`] container owning the buffer together with an eagerly built
//! section cache and symbol-name cache. Symbols, dynamic entries and
//! relocations are decoded lazily while iterating.
//!
//! ```no_run
//! use elfmap::{Access, Elf};
//!
//! let elf = Elf::open("/usr/bin/cat", Access::ReadOnly)?;
//! for shdr in elf.shdrs_iter() {
//!     println!(
//!         "{:?} {:?}",
//!         elf.section_name(&shdr)?,
//!         shdr.section_type()
//!     );
//! }
//! # Ok::<(), elfmap::ElfError>(())
//! ```
//!
//! Opening a file with [`Access::ReadWrite`] maps it copy-on-write;
//! [`Elf::modify_section_data`] then overwrites section content in the
//! mapping, bounded to the section's window, and [`Elf::persist`] writes
//! the edited image to a new file. The original file is never modified.

mod buffer;
mod dynamic;
mod error;
mod file;
mod header;
mod iter;
mod program_header;
mod relocation;
mod section_header;
mod syms;
mod types;

#[cfg(test)]
mod tests;

pub use buffer::{Access, Endian, FileRecord, MappedBuffer};
pub use dynamic::{DynamicTag, Elf32Dyn, Elf64Dyn, ElfDyn};
pub use error::{ElfError, ElfResult};
pub use file::{Elf, PhdrIterator, ShdrIterator};
pub use header::{Class, Elf32Ehdr, Elf64Ehdr, ElfHdr, Machine, ObjectType, OsAbi};
pub use iter::{DynIterator, RelocsIterator, SectionEntry, SectionEntryIter, SymsIterator};
pub use program_header::{Elf32Phdr, Elf64Phdr, ElfPhdr, PhdrFlags, SegmentType};
pub use relocation::{
    Aarch64Reloc, AlphaReloc, ArmReloc, Elf32Rel, Elf32Rela, Elf64Rel, Elf64Rela, ElfRelocation,
    I386Reloc, LoongArchReloc, MipsReloc, Ppc64Reloc, PpcReloc, RelocationType, RiscVReloc,
    S390Reloc, SparcReloc, X86_64Reloc,
};
pub use section_header::{Elf32Shdr, Elf64Shdr, ElfShdr, SectionType, ShdrFlags};
pub use syms::{
    Elf32Sym, Elf64Sym, ElfSym, Strtab, SymbolBind, SymbolType, SymbolVisibility,
};
pub use types::*;
