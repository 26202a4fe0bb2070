// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::buffer::{Access, Endian, FileRecord, MappedBuffer};
use super::dynamic::ElfDyn;
use super::header::{Class, Elf32Ehdr, Elf64Ehdr, ElfHdr, Machine};
use super::iter::{DynIterator, RelocsIterator, SymsIterator};
use super::program_header::{Elf32Phdr, Elf64Phdr, ElfPhdr};
use super::relocation::ElfRelocation;
use super::section_header::{Elf32Shdr, Elf64Shdr, ElfShdr, SectionType};
use super::syms::{Elf32Sym, Elf64Sym, ElfSym, Strtab};
use super::types::*;
use super::{ElfError, ElfResult};

use core::ffi;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A parsed ELF file backed by a memory mapping.
///
/// Construction verifies the ident, decodes class and byte order, reads
/// the file header, materializes the section-header table into an ordered
/// index-to-view cache, resolves the three string tables (`.shstrtab`,
/// `.strtab`, `.dynstr`) and pre-populates the symbol-name cache. All
/// headers are bounds-verified once at load time, so that no error
/// checking is needed at each and every subsequent access.
///
/// String and data slices returned from the query surface borrow from the
/// mapped buffer and stay valid until the [`Elf`] instance is dropped.
#[derive(Debug)]
pub struct Elf {
    /// Buffer containing the mapped ELF file data
    buffer: MappedBuffer,
    /// The ELF file header
    hdr: ElfHdr,
    /// Effective section count, after the zero-`e_shnum` extension
    shnum: u32,
    /// Effective section name string table index, after `SHN_XINDEX`
    shstrndx: u32,
    /// The section header cache, in section-header-table order
    shdrs: Vec<ElfShdr>,
    /// Content range of the section name string table, if present
    sh_strtab: Option<FileRange>,
    /// Content range of `.strtab`, if present
    strtab: Option<FileRange>,
    /// Content range of `.dynstr`, if present
    dynstr: Option<FileRange>,
    /// Maps symbol name offsets to the string table they resolve in
    sym_names: BTreeMap<u32, FileRange>,
}

impl Elf {
    /// Opens and parses the ELF file at `path`.
    ///
    /// `Access::ReadWrite` enables [`Elf::modify_section_data`] and
    /// [`Elf::persist`]; the file on disk is never modified either way.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OpenFailed`] / [`ElfError::MapFailed`] for OS
    /// failures, [`ElfError::UnexpectedEOF`] when the file cannot hold
    /// the ident bytes, [`ElfError::BadMagic`],
    /// [`ElfError::InvalidEndian`] and [`ElfError::InvalidClass`] for a
    /// malformed ident, and [`ElfError::EndOfStream`] when a header table
    /// or section content extends past the end of the file.
    pub fn open<P: AsRef<Path>>(path: P, access: Access) -> ElfResult<Self> {
        let mut file = File::open(path).map_err(ElfError::OpenFailed)?;

        // Examine the e_ident[] bytes before mapping anything; they
        // decide the byte order the mapping is created with.
        let mut e_ident = [0u8; ElfHdr::EI_NIDENT];
        file.read_exact(&mut e_ident)
            .map_err(|_| ElfError::UnexpectedEOF)?;
        if e_ident[..4] != ElfHdr::ELFMAG {
            return Err(ElfError::BadMagic);
        }
        let endian = match e_ident[ElfHdr::EI_DATA] {
            ElfHdr::ELFDATA2LSB => Endian::Little,
            ElfHdr::ELFDATA2MSB => Endian::Big,
            _ => return Err(ElfError::InvalidEndian),
        };
        let class = match e_ident[ElfHdr::EI_CLASS] {
            ElfHdr::ELFCLASS32 => Class::Elf32,
            ElfHdr::ELFCLASS64 => Class::Elf64,
            _ => return Err(ElfError::InvalidClass),
        };

        let buffer = MappedBuffer::from_file(&file, endian, access)?;
        Self::parse(buffer, class)
    }

    fn parse(buffer: MappedBuffer, class: Class) -> ElfResult<Self> {
        let hdr = match class {
            Class::Elf32 => ElfHdr::Elf32(
                buffer
                    .read_record::<Elf32Ehdr>(0)
                    .map_err(|_| ElfError::EndOfStream)?,
            ),
            Class::Elf64 => ElfHdr::Elf64(
                buffer
                    .read_record::<Elf64Ehdr>(0)
                    .map_err(|_| ElfError::EndOfStream)?,
            ),
        };
        log::debug!(
            "ELF header: {:?}, {:?}, machine {:?}, type {:?}",
            hdr.class(),
            buffer.endian(),
            hdr.machine(),
            hdr.object_type()
        );

        let (min_phentsize, min_shentsize) = match class {
            Class::Elf32 => (Elf32Phdr::SIZE, Elf32Shdr::SIZE),
            Class::Elf64 => (Elf64Phdr::SIZE, Elf64Shdr::SIZE),
        };

        // Verify that the program header table is within the file bounds
        // and the stride can hold the class's record layout.
        if hdr.phnum() != 0 {
            if usize::from(hdr.phentsize()) < min_phentsize {
                return Err(ElfError::EndOfStream);
            }
            let size = u64::from(hdr.phentsize()) * u64::from(hdr.phnum());
            let table =
                FileRange::try_from((hdr.phoff(), size)).map_err(|_| ElfError::EndOfStream)?;
            if table.offset_end > buffer.len() {
                return Err(ElfError::EndOfStream);
            }
        }

        if hdr.shoff() != 0 && usize::from(hdr.shentsize()) < min_shentsize {
            return Err(ElfError::EndOfStream);
        }

        // If e_shnum is zero while a section header table exists, the
        // real count is stored in section header 0's sh_size member.
        let mut shnum = u32::from(hdr.shnum());
        if shnum == 0 && hdr.shoff() != 0 {
            Self::check_shdr_table_bounds(&buffer, &hdr, 1)?;
            let shdr0 = Self::read_shdr_from(&buffer, &hdr, 0);
            shnum = u32::try_from(shdr0.size()).map_err(|_| ElfError::InvalidSectionIndex)?;
        }
        Self::check_shdr_table_bounds(&buffer, &hdr, shnum)?;

        // Materialize the section cache and verify every section's
        // content range once.
        let mut shdrs = Vec::with_capacity(shnum as usize);
        for i in 0..shnum {
            let shdr = Self::read_shdr_from(&buffer, &hdr, i);
            if !matches!(
                shdr.section_type(),
                SectionType::Null | SectionType::Nobits
            ) {
                let range = shdr.file_range().map_err(|_| ElfError::EndOfStream)?;
                if range.offset_end > buffer.len() {
                    return Err(ElfError::EndOfStream);
                }
            }
            shdrs.push(shdr);
        }
        log::debug!("cached {} section headers", shdrs.len());

        // If e_shstrndx is SHN_XINDEX, the actual index is stored in
        // section header 0's sh_link member.
        let mut shstrndx = u32::from(hdr.shstrndx());
        if shstrndx == ElfShdr::SHN_XINDEX {
            if shnum == 0 {
                return Err(ElfError::InvalidSectionIndex);
            }
            shstrndx = shdrs[0].link();
        }
        if shstrndx != ElfShdr::SHN_UNDEF && shstrndx >= shnum {
            return Err(ElfError::InvalidSectionIndex);
        }
        let sh_strtab = if shstrndx != ElfShdr::SHN_UNDEF {
            Some(shdrs[shstrndx as usize].file_range()?)
        } else {
            None
        };

        let mut elf = Self {
            buffer,
            hdr,
            shnum,
            shstrndx,
            shdrs,
            sh_strtab,
            strtab: None,
            dynstr: None,
            sym_names: BTreeMap::new(),
        };
        elf.strtab = elf.find_strtab(b".strtab");
        elf.dynstr = elf.find_strtab(b".dynstr");
        log::debug!(
            ".strtab {}, .dynstr {}",
            if elf.strtab.is_some() { "present" } else { "absent" },
            if elf.dynstr.is_some() { "present" } else { "absent" },
        );
        elf.sym_names = elf.build_sym_name_cache();

        Ok(elf)
    }

    fn check_shdr_table_bounds(
        buffer: &MappedBuffer,
        hdr: &ElfHdr,
        shnum: u32,
    ) -> ElfResult<()> {
        let size = u64::from(hdr.shentsize()) * u64::from(shnum);
        let table = FileRange::try_from((hdr.shoff(), size)).map_err(|_| ElfError::EndOfStream)?;
        if table.offset_end > buffer.len() {
            return Err(ElfError::EndOfStream);
        }
        Ok(())
    }

    fn read_shdr_from(buffer: &MappedBuffer, hdr: &ElfHdr, i: u32) -> ElfShdr {
        let shdrs_off = usize::try_from(hdr.shoff()).unwrap();
        let shdr_size = usize::from(hdr.shentsize());
        let shdr_off = shdrs_off + usize::try_from(i).unwrap() * shdr_size;
        let shdr_buf = &buffer.as_slice()[shdr_off..(shdr_off + shdr_size)];
        match hdr.class() {
            Class::Elf32 => ElfShdr::Elf32(Elf32Shdr::read(shdr_buf, buffer.endian())),
            Class::Elf64 => ElfShdr::Elf64(Elf64Shdr::read(shdr_buf, buffer.endian())),
        }
    }

    pub(crate) fn read_phdr(&self, i: u16) -> ElfPhdr {
        let phdrs_off = usize::try_from(self.hdr.phoff()).unwrap();
        let phdr_size = usize::from(self.hdr.phentsize());
        let phdr_off = phdrs_off + usize::from(i) * phdr_size;
        let phdr_buf = &self.buffer.as_slice()[phdr_off..(phdr_off + phdr_size)];
        match self.hdr.class() {
            Class::Elf32 => ElfPhdr::Elf32(Elf32Phdr::read(phdr_buf, self.buffer.endian())),
            Class::Elf64 => ElfPhdr::Elf64(Elf64Phdr::read(phdr_buf, self.buffer.endian())),
        }
    }

    fn find_strtab(&self, name: &[u8]) -> Option<FileRange> {
        let shdr = self.shdrs.iter().find(|shdr| {
            shdr.section_type() == SectionType::Strtab
                && self
                    .section_name(shdr)
                    .map(|n| n.to_bytes() == name)
                    .unwrap_or(false)
        })?;
        shdr.file_range().ok()
    }

    // For each symbol in every symbol table, record which string table
    // its name offset resolves in: the table matching the section type
    // first (.strtab for SYMTAB, .dynstr for DYNSYM), the other one as a
    // fallback. On colliding offsets the last insertion wins; the name is
    // a pure function of (table, offset) either way.
    fn build_sym_name_cache(&self) -> BTreeMap<u32, FileRange> {
        let mut sym_names = BTreeMap::new();
        for shdr in self.shdrs.iter() {
            let tables = match shdr.section_type() {
                SectionType::Symtab => [self.strtab, self.dynstr],
                SectionType::Dynsym => [self.dynstr, self.strtab],
                _ => continue,
            };
            let min_entsize = match self.hdr.class() {
                Class::Elf32 => Elf32Sym::SIZE as u64,
                Class::Elf64 => Elf64Sym::SIZE as u64,
            };
            let entsize = shdr.entry_size();
            if entsize < min_entsize {
                continue;
            }
            for i in 0..shdr.size() / entsize {
                let offset = usize::try_from(shdr.offset() + i * entsize).unwrap();
                let buf = &self.buffer.as_slice()[offset..];
                let sym = match self.hdr.class() {
                    Class::Elf32 => ElfSym::Elf32(Elf32Sym::read(buf, self.buffer.endian())),
                    Class::Elf64 => ElfSym::Elf64(Elf64Sym::read(buf, self.buffer.endian())),
                };
                let name_offset = sym.name_offset();
                for table in tables.into_iter().flatten() {
                    if Strtab::new(self.table_bytes(table)).get_str(name_offset).is_ok() {
                        sym_names.insert(name_offset, table);
                        break;
                    }
                }
            }
        }
        log::debug!("cached {} symbol name offsets", sym_names.len());
        sym_names
    }

    fn table_bytes(&self, range: FileRange) -> &[u8] {
        &self.buffer.as_slice()[range.offset_begin..range.offset_end]
    }

    /// The parsed file header.
    pub fn header(&self) -> ElfHdr {
        self.hdr
    }

    pub fn class(&self) -> Class {
        self.hdr.class()
    }

    pub fn endian(&self) -> Endian {
        self.buffer.endian()
    }

    pub fn machine(&self) -> Machine {
        self.hdr.machine()
    }

    /// Effective number of sections, including the zero-`e_shnum`
    /// extension.
    pub fn section_count(&self) -> u32 {
        self.shnum
    }

    /// Effective index of the section name string table, including the
    /// `SHN_XINDEX` extension.
    pub fn shstrndx(&self) -> u32 {
        self.shstrndx
    }

    pub(crate) fn buffer(&self) -> &MappedBuffer {
        &self.buffer
    }

    pub(crate) fn cached_shdrs(&self) -> &[ElfShdr] {
        &self.shdrs
    }

    /// Creates an iterator over the program headers.
    pub fn phdrs_iter(&self) -> PhdrIterator<'_> {
        PhdrIterator { elf: self, next: 0 }
    }

    /// Creates an iterator over the cached section headers, in
    /// section-header-table order.
    pub fn shdrs_iter(&self) -> ShdrIterator<'_> {
        ShdrIterator { elf: self, next: 0 }
    }

    /// Creates an iterator over all symbols in all `SHT_SYMTAB` and
    /// `SHT_DYNSYM` sections.
    pub fn syms_iter(&self) -> SymsIterator<'_> {
        SymsIterator::new(self)
    }

    /// Creates an iterator over all entries of all `SHT_DYNAMIC`
    /// sections.
    pub fn dyn_iter(&self) -> DynIterator<'_> {
        DynIterator::new(self)
    }

    /// Creates an iterator over all relocations in all `SHT_REL` and
    /// `SHT_RELA` sections. The rel/rela distinction is decided per
    /// section and reflected in the yielded [`ElfRelocation`] arms.
    pub fn relocs_iter(&self) -> RelocsIterator<'_> {
        RelocsIterator::new(self)
    }

    /// Looks up a section header by its zero-based index.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::InvalidSectionIndex`] when `index` is out of
    /// bounds.
    pub fn section_by_index(&self, index: u32) -> ElfResult<ElfShdr> {
        self.shdrs
            .get(usize::try_from(index).unwrap())
            .copied()
            .ok_or(ElfError::InvalidSectionIndex)
    }

    /// Returns the first section, in section-header-table order, whose
    /// name equals `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSectionStringTable`] when the file has no
    /// section name string table and [`ElfError::SectionNotFound`] when
    /// no section matches.
    pub fn section_by_name(&self, name: &str) -> ElfResult<ElfShdr> {
        if self.sh_strtab.is_none() {
            return Err(ElfError::NoSectionStringTable);
        }
        for shdr in self.shdrs.iter() {
            // Sections whose name offset does not resolve cannot match.
            match self.section_name(shdr) {
                Ok(n) if n.to_bytes() == name.as_bytes() => return Ok(*shdr),
                _ => {}
            }
        }
        Err(ElfError::SectionNotFound)
    }

    /// Returns the first section, in section-header-table order, of the
    /// given type.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::SectionNotFound`] when no section matches.
    pub fn section_by_type(&self, section_type: SectionType) -> ElfResult<ElfShdr> {
        self.shdrs
            .iter()
            .find(|shdr| shdr.section_type() == section_type)
            .copied()
            .ok_or(ElfError::SectionNotFound)
    }

    /// Reads the section's name from the section name string table.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoSectionStringTable`] when the file has no
    /// section name string table and [`ElfError::InvalidNameOffset`] when
    /// the section's name offset does not resolve in it.
    pub fn section_name(&self, shdr: &ElfShdr) -> ElfResult<&ffi::CStr> {
        let range = self.sh_strtab.ok_or(ElfError::NoSectionStringTable)?;
        Strtab::new(self.table_bytes(range)).get_str(shdr.name_offset())
    }

    /// Returns the section's content bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::EmptySection`] when the section's size is zero
    /// and [`ElfError::InvalidOffset`] when its content range does not
    /// lie within the file (e.g. `SHT_NOBITS` sections).
    pub fn section_data(&self, shdr: &ElfShdr) -> ElfResult<&[u8]> {
        if shdr.size() == 0 {
            return Err(ElfError::EmptySection);
        }
        let offset = usize::try_from(shdr.offset()).map_err(|_| ElfError::InvalidOffset)?;
        let size = usize::try_from(shdr.size()).map_err(|_| ElfError::InvalidOffset)?;
        self.buffer.bytes(offset, size)
    }

    /// Returns the content bytes of the first section named `name`.
    pub fn section_data_by_name(&self, name: &str) -> ElfResult<&[u8]> {
        let shdr = self.section_by_name(name)?;
        self.section_data(&shdr)
    }

    /// Overwrites the leading `data.len()` bytes of the section's content
    /// in the mapped buffer. The write is bounded: `data` must be
    /// strictly smaller than the section, bytes past `data.len()` keep
    /// their previous values and no other section moves. The backing file
    /// stays untouched until [`Elf::persist`].
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NotMutable`] when the file was opened
    /// read-only, [`ElfError::EmptySection`] when the section's size is
    /// zero and [`ElfError::InvalidOffset`] when `data` does not fit the
    /// section's window.
    pub fn modify_section_data(&mut self, shdr: &ElfShdr, data: &[u8]) -> ElfResult<()> {
        if !self.buffer.is_mutable() {
            return Err(ElfError::NotMutable);
        }
        if shdr.size() == 0 {
            return Err(ElfError::EmptySection);
        }
        if (data.len() as u64) >= shdr.size() {
            return Err(ElfError::InvalidOffset);
        }
        let offset = usize::try_from(shdr.offset()).map_err(|_| ElfError::InvalidOffset)?;
        self.buffer.write_bytes(data, offset)
    }

    /// Writes the buffer's current contents to a new file at `path`. The
    /// original file is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::NoMutableBuffer`] when the file was opened
    /// read-only, and [`ElfError::OpenFailed`] / [`ElfError::WriteFailed`]
    /// for OS failures on the destination.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> ElfResult<()> {
        self.buffer.persist_to(path)
    }

    /// Returns the symbol's name from the symbol-name cache.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::SymbolNameNotFound`] when the symbol's name
    /// offset did not resolve in `.strtab` or `.dynstr` at load time.
    pub fn symbol_name(&self, sym: &ElfSym) -> ElfResult<&ffi::CStr> {
        let table = self
            .sym_names
            .get(&sym.name_offset())
            .copied()
            .ok_or(ElfError::SymbolNameNotFound)?;
        Strtab::new(self.table_bytes(table)).get_str(sym.name_offset())
    }

    /// For dynamic entries whose value is a `.dynstr` offset (`DT_NEEDED`,
    /// `DT_SONAME`, `DT_RPATH`, `DT_RUNPATH`, `DT_AUXILIARY`, `DT_FILTER`,
    /// `DT_CONFIG`, `DT_DEPAUDIT`, `DT_AUDIT`), returns the referenced
    /// string; for all other tags returns [`None`].
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::DynStringTableNotFound`] when the tag is
    /// name-bearing but the file has no `.dynstr`, and
    /// [`ElfError::InvalidNameOffset`] when the value does not resolve in
    /// it.
    pub fn dyn_name(&self, dynent: &ElfDyn) -> ElfResult<Option<&ffi::CStr>> {
        if !dynent.tag().is_string_offset() {
            return Ok(None);
        }
        let range = self.dynstr.ok_or(ElfError::DynStringTableNotFound)?;
        let offset = u32::try_from(dynent.value()).map_err(|_| ElfError::InvalidNameOffset)?;
        Strtab::new(self.table_bytes(range)).get_str(offset).map(Some)
    }

    /// Reads the symbol at `index` from a symbol table section.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::CannotGetUnion`] when the section is not a
    /// symbol table, [`ElfError::CannotGetEntries`] when its entry size
    /// is zero and [`ElfError::InvalidOffset`] when `index` lies outside
    /// the table.
    pub fn section_symbol(&self, shdr: &ElfShdr, index: u32) -> ElfResult<ElfSym> {
        if !matches!(
            shdr.section_type(),
            SectionType::Symtab | SectionType::Dynsym
        ) {
            return Err(ElfError::CannotGetUnion);
        }
        let entsize = shdr.entry_size();
        if entsize == 0 {
            return Err(ElfError::CannotGetEntries);
        }
        if u64::from(index) >= shdr.size() / entsize {
            return Err(ElfError::InvalidOffset);
        }
        let offset = shdr.offset() + u64::from(index) * entsize;
        let offset = usize::try_from(offset).map_err(|_| ElfError::InvalidOffset)?;
        match self.hdr.class() {
            Class::Elf32 => Ok(ElfSym::Elf32(self.buffer.read_record(offset)?)),
            Class::Elf64 => Ok(ElfSym::Elf64(self.buffer.read_record(offset)?)),
        }
    }

    /// Reads the relocation at `index` from a relocation section, picking
    /// the rel/rela arm from the section's type.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::CannotGetRelocationUnion`] when the section is
    /// neither `SHT_REL` nor `SHT_RELA`, [`ElfError::CannotGetEntries`]
    /// when its entry size is zero and [`ElfError::InvalidOffset`] when
    /// `index` lies outside the table.
    pub fn section_relocation(&self, shdr: &ElfShdr, index: u64) -> ElfResult<ElfRelocation> {
        let rela = match shdr.section_type() {
            SectionType::Rel => false,
            SectionType::Rela => true,
            _ => return Err(ElfError::CannotGetRelocationUnion),
        };
        let entsize = shdr.entry_size();
        if entsize == 0 {
            return Err(ElfError::CannotGetEntries);
        }
        if index >= shdr.size() / entsize {
            return Err(ElfError::InvalidOffset);
        }
        let offset = shdr.offset() + index * entsize;
        let offset = usize::try_from(offset).map_err(|_| ElfError::InvalidOffset)?;
        match (self.hdr.class(), rela) {
            (Class::Elf32, false) => Ok(ElfRelocation::Rel32(self.buffer.read_record(offset)?)),
            (Class::Elf32, true) => Ok(ElfRelocation::Rela32(self.buffer.read_record(offset)?)),
            (Class::Elf64, false) => Ok(ElfRelocation::Rel64(self.buffer.read_record(offset)?)),
            (Class::Elf64, true) => Ok(ElfRelocation::Rela64(self.buffer.read_record(offset)?)),
        }
    }

    /// Resolves the symbol a relocation refers to, through the `sh_link`
    /// member of the relocation section the entry came from
    /// (`reloc_section_index`, as reported by the relocation iterator's
    /// `section_index`).
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::InvalidSectionIndex`] for a bad containing
    /// section index, [`ElfError::InvalidLinkIndex`] when its `sh_link`
    /// lies outside the section table and
    /// [`ElfError::InvalidLinkedSection`] when the linked section is not
    /// a symbol table.
    pub fn relocation_linked_symbol(
        &self,
        reloc: &ElfRelocation,
        reloc_section_index: u32,
    ) -> ElfResult<ElfSym> {
        let reloc_shdr = self.section_by_index(reloc_section_index)?;
        let link = reloc_shdr.link();
        if link >= self.shnum {
            return Err(ElfError::InvalidLinkIndex);
        }
        let linked = self.shdrs[usize::try_from(link).unwrap()];
        if !matches!(
            linked.section_type(),
            SectionType::Symtab | SectionType::Dynsym
        ) {
            return Err(ElfError::InvalidLinkedSection);
        }
        self.section_symbol(&linked, reloc.symbol_index())
    }
}

/// Iterator over the program headers of an [`Elf`] file.
#[derive(Debug)]
pub struct PhdrIterator<'a> {
    elf: &'a Elf,
    /// Next index to be retrieved
    next: u16,
}

impl PhdrIterator<'_> {
    /// Rewinds the cursor to the first program header.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for PhdrIterator<'_> {
    type Item = ElfPhdr;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next;
        if cur == self.elf.hdr.phnum() {
            return None;
        }
        self.next += 1;
        Some(self.elf.read_phdr(cur))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.elf.hdr.phnum() - self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PhdrIterator<'_> {}

/// Iterator over the cached section headers of an [`Elf`] file.
#[derive(Debug)]
pub struct ShdrIterator<'a> {
    elf: &'a Elf,
    /// Next index to be retrieved
    next: u32,
}

impl ShdrIterator<'_> {
    /// Rewinds the cursor to the first section header.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for ShdrIterator<'_> {
    type Item = ElfShdr;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next;
        if cur == self.elf.shnum {
            return None;
        }
        self.next += 1;
        Some(self.elf.shdrs[usize::try_from(cur).unwrap()])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.elf.shnum - self.next).unwrap();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ShdrIterator<'_> {}
