// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

//! Iterators over entry arrays stored in sections.
//!
//! A [`SectionEntryIter`] walks every section whose type belongs to the
//! entry kind's filter set, in section-header-table order, and yields one
//! decoded entry at a time in ascending file-offset order. Sections whose
//! `sh_entsize` is zero or too small to hold the class's record layout
//! are skipped.

use super::buffer::FileRecord;
use super::dynamic::{Elf32Dyn, Elf64Dyn, ElfDyn};
use super::file::Elf;
use super::header::Class;
use super::relocation::{Elf32Rel, Elf32Rela, Elf64Rel, Elf64Rela, ElfRelocation};
use super::section_header::{ElfShdr, SectionType};
use super::syms::{Elf32Sym, Elf64Sym, ElfSym};

use core::marker::PhantomData;

/// An entry kind that lives in fixed-stride arrays inside sections of
/// particular types.
pub trait SectionEntry: Sized {
    /// Whether entries of this kind are stored in sections of the given
    /// type.
    fn matches(section_type: SectionType) -> bool;

    /// The smallest stride an entry of this kind can be decoded from.
    fn min_entry_size(class: Class, section_type: SectionType) -> u64;

    /// Decodes the entry at the given file offset. The caller guarantees
    /// that at least [`SectionEntry::min_entry_size`] bytes follow.
    fn decode(elf: &Elf, shdr: &ElfShdr, offset: usize) -> Self;
}

impl SectionEntry for ElfSym {
    fn matches(section_type: SectionType) -> bool {
        matches!(section_type, SectionType::Symtab | SectionType::Dynsym)
    }

    fn min_entry_size(class: Class, _section_type: SectionType) -> u64 {
        match class {
            Class::Elf32 => Elf32Sym::SIZE as u64,
            Class::Elf64 => Elf64Sym::SIZE as u64,
        }
    }

    fn decode(elf: &Elf, _shdr: &ElfShdr, offset: usize) -> Self {
        let buf = &elf.buffer().as_slice()[offset..];
        match elf.class() {
            Class::Elf32 => Self::Elf32(Elf32Sym::read(buf, elf.endian())),
            Class::Elf64 => Self::Elf64(Elf64Sym::read(buf, elf.endian())),
        }
    }
}

impl SectionEntry for ElfDyn {
    fn matches(section_type: SectionType) -> bool {
        section_type == SectionType::Dynamic
    }

    fn min_entry_size(class: Class, _section_type: SectionType) -> u64 {
        match class {
            Class::Elf32 => Elf32Dyn::SIZE as u64,
            Class::Elf64 => Elf64Dyn::SIZE as u64,
        }
    }

    fn decode(elf: &Elf, _shdr: &ElfShdr, offset: usize) -> Self {
        let buf = &elf.buffer().as_slice()[offset..];
        match elf.class() {
            Class::Elf32 => Self::Elf32(Elf32Dyn::read(buf, elf.endian())),
            Class::Elf64 => Self::Elf64(Elf64Dyn::read(buf, elf.endian())),
        }
    }
}

impl SectionEntry for ElfRelocation {
    fn matches(section_type: SectionType) -> bool {
        matches!(section_type, SectionType::Rel | SectionType::Rela)
    }

    fn min_entry_size(class: Class, section_type: SectionType) -> u64 {
        match (class, section_type) {
            (Class::Elf32, SectionType::Rel) => Elf32Rel::SIZE as u64,
            (Class::Elf32, SectionType::Rela) => Elf32Rela::SIZE as u64,
            (Class::Elf64, SectionType::Rel) => Elf64Rel::SIZE as u64,
            (Class::Elf64, SectionType::Rela) => Elf64Rela::SIZE as u64,
            _ => u64::MAX,
        }
    }

    fn decode(elf: &Elf, shdr: &ElfShdr, offset: usize) -> Self {
        let buf = &elf.buffer().as_slice()[offset..];
        let endian = elf.endian();
        match (elf.class(), shdr.section_type()) {
            (Class::Elf32, SectionType::Rela) => Self::Rela32(Elf32Rela::read(buf, endian)),
            (Class::Elf32, _) => Self::Rel32(Elf32Rel::read(buf, endian)),
            (Class::Elf64, SectionType::Rela) => Self::Rela64(Elf64Rela::read(buf, endian)),
            (Class::Elf64, _) => Self::Rel64(Elf64Rel::read(buf, endian)),
        }
    }
}

/// Forward cursor over all entries of kind `T` in the file, visiting
/// matching sections in section-cache order and entries within a section
/// in ascending offset order.
#[derive(Debug)]
pub struct SectionEntryIter<'a, T> {
    elf: &'a Elf,
    section_index: u32,
    entry_index: u64,
    remaining: u64,
    _entries: PhantomData<T>,
}

pub type SymsIterator<'a> = SectionEntryIter<'a, ElfSym>;
pub type DynIterator<'a> = SectionEntryIter<'a, ElfDyn>;
pub type RelocsIterator<'a> = SectionEntryIter<'a, ElfRelocation>;

impl<'a, T: SectionEntry> SectionEntryIter<'a, T> {
    pub(crate) fn new(elf: &'a Elf) -> Self {
        let remaining = Self::total_entries(elf);
        Self {
            elf,
            section_index: 0,
            entry_index: 0,
            remaining,
            _entries: PhantomData,
        }
    }

    fn entry_count(elf: &Elf, shdr: &ElfShdr) -> Option<u64> {
        let entsize = shdr.entry_size();
        if entsize < T::min_entry_size(elf.class(), shdr.section_type()) {
            return None;
        }
        Some(shdr.size() / entsize)
    }

    fn total_entries(elf: &Elf) -> u64 {
        elf.cached_shdrs()
            .iter()
            .filter(|shdr| T::matches(shdr.section_type()))
            .filter_map(|shdr| Self::entry_count(elf, shdr))
            .sum()
    }

    /// Index of the section entries are currently being yielded from.
    /// After a [`Iterator::next`] call returned an entry, this is the
    /// index of the section that entry came from.
    pub fn section_index(&self) -> u32 {
        self.section_index
    }

    /// Number of entries left to yield.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Rewinds the cursor; a subsequent drain yields the same sequence
    /// again. The precomputed total is recomputed here, the counted-down
    /// `remaining` would not do.
    pub fn reset(&mut self) {
        self.section_index = 0;
        self.entry_index = 0;
        self.remaining = Self::total_entries(self.elf);
    }
}

impl<T: SectionEntry> Iterator for SectionEntryIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let shdr = *self.elf.cached_shdrs().get(self.section_index as usize)?;
            if !T::matches(shdr.section_type()) {
                self.section_index += 1;
                self.entry_index = 0;
                continue;
            }
            let count = Self::entry_count(self.elf, &shdr).unwrap_or(0);
            if self.entry_index >= count {
                self.section_index += 1;
                self.entry_index = 0;
                continue;
            }

            // Section content ranges were verified when the file was
            // opened, so the offset arithmetic cannot leave the buffer.
            let offset = shdr.offset() + self.entry_index * shdr.entry_size();
            let offset = usize::try_from(offset).unwrap();
            self.entry_index += 1;
            self.remaining -= 1;
            return Some(T::decode(self.elf, &shdr, offset));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
