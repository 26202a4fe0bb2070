// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

use super::*;

use std::path::{Path, PathBuf};

const EM_X86_64: u16 = 62;
const EM_SPARC: u16 = 2;

const ET_EXEC: u16 = 2;
const ET_DYN: u16 = 3;

const TEXT_VADDR: u64 = 0x401000;
const TEXT_SIZE: usize = 32;

// Layout of the generated fixture image. All content is laid out back to
// back; offsets follow from the record sizes of the class.
struct Layout {
    ehsize: usize,
    phentsize: usize,
    shentsize: usize,
    symsize: usize,
    dynsize: usize,
    relsize: usize,
    relasize: usize,
    phoff: usize,
    text_off: usize,
    strtab_off: usize,
    symtab_off: usize,
    dynstr_off: usize,
    dynsym_off: usize,
    rela_off: usize,
    rel_off: usize,
    dynamic_off: usize,
    shstrtab_off: usize,
    shoff: usize,
}

const STRTAB: &[u8] = b"\0main\0helper\0";
const DYNSTR: &[u8] = b"\0libc.so.6\0_start\0";
const SHSTRTAB: &[u8] =
    b"\0.text\0.strtab\0.symtab\0.dynstr\0.dynsym\0.rela.text\0.rel.text\0.dynamic\0.shstrtab\0";

impl Layout {
    fn new(class: Class) -> Self {
        let (ehsize, phentsize, shentsize, symsize, dynsize, relsize, relasize) = match class {
            Class::Elf32 => (
                Elf32Ehdr::SIZE,
                Elf32Phdr::SIZE,
                Elf32Shdr::SIZE,
                Elf32Sym::SIZE,
                Elf32Dyn::SIZE,
                Elf32Rel::SIZE,
                Elf32Rela::SIZE,
            ),
            Class::Elf64 => (
                Elf64Ehdr::SIZE,
                Elf64Phdr::SIZE,
                Elf64Shdr::SIZE,
                Elf64Sym::SIZE,
                Elf64Dyn::SIZE,
                Elf64Rel::SIZE,
                Elf64Rela::SIZE,
            ),
        };
        let phoff = ehsize;
        let text_off = phoff + 2 * phentsize;
        let strtab_off = text_off + TEXT_SIZE;
        let symtab_off = strtab_off + STRTAB.len();
        let dynstr_off = symtab_off + 3 * symsize;
        let dynsym_off = dynstr_off + DYNSTR.len();
        let rela_off = dynsym_off + 2 * symsize;
        let rel_off = rela_off + 2 * relasize;
        let dynamic_off = rel_off + relsize;
        let shstrtab_off = dynamic_off + 2 * dynsize;
        let shoff = shstrtab_off + SHSTRTAB.len();
        Self {
            ehsize,
            phentsize,
            shentsize,
            symsize,
            dynsize,
            relsize,
            relasize,
            phoff,
            text_off,
            strtab_off,
            symtab_off,
            dynstr_off,
            dynsym_off,
            rela_off,
            rel_off,
            dynamic_off,
            shstrtab_off,
            shoff,
        }
    }
}

struct Emit {
    buf: Vec<u8>,
    class: Class,
    endian: Endian,
}

impl Emit {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u16(&mut self, v: u16) {
        match self.endian {
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn u32(&mut self, v: u32) {
        match self.endian {
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn u64(&mut self, v: u64) {
        match self.endian {
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    // Address-, offset- and size-typed fields take the class's width.
    fn addr(&mut self, v: u64) {
        match self.class {
            Class::Elf32 => self.u32(u32::try_from(v).unwrap()),
            Class::Elf64 => self.u64(v),
        }
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    fn phdr(&mut self, p_type: u32, flags: u32, off: u64, vaddr: u64, filesz: u64, align: u64) {
        match self.class {
            Class::Elf32 => {
                self.u32(p_type);
                self.addr(off);
                self.addr(vaddr);
                self.addr(vaddr);
                self.addr(filesz);
                self.addr(filesz);
                self.u32(flags);
                self.addr(align);
            }
            Class::Elf64 => {
                self.u32(p_type);
                self.u32(flags);
                self.addr(off);
                self.addr(vaddr);
                self.addr(vaddr);
                self.addr(filesz);
                self.addr(filesz);
                self.addr(align);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn shdr(
        &mut self,
        name: u32,
        sh_type: u32,
        flags: u64,
        addr: u64,
        off: u64,
        size: u64,
        link: u32,
        info: u32,
        align: u64,
        entsize: u64,
    ) {
        self.u32(name);
        self.u32(sh_type);
        self.addr(flags);
        self.addr(addr);
        self.addr(off);
        self.addr(size);
        self.u32(link);
        self.u32(info);
        self.addr(align);
        self.addr(entsize);
    }

    fn sym(&mut self, name: u32, value: u64, size: u64, info: u8, shndx: u16) {
        match self.class {
            Class::Elf32 => {
                self.u32(name);
                self.addr(value);
                self.addr(size);
                self.u8(info);
                self.u8(0);
                self.u16(shndx);
            }
            Class::Elf64 => {
                self.u32(name);
                self.u8(info);
                self.u8(0);
                self.u16(shndx);
                self.addr(value);
                self.addr(size);
            }
        }
    }

    fn dynent(&mut self, tag: i64, val: u64) {
        match self.class {
            Class::Elf32 => {
                self.u32(i32::try_from(tag).unwrap() as u32);
                self.u32(u32::try_from(val).unwrap());
            }
            Class::Elf64 => {
                self.u64(tag as u64);
                self.u64(val);
            }
        }
    }

    fn r_info(&self, sym: u32, r_type: u32) -> u64 {
        match self.class {
            Class::Elf32 => u64::from((sym << 8) | (r_type & 0xff)),
            Class::Elf64 => (u64::from(sym) << 32) | u64::from(r_type),
        }
    }

    fn rel(&mut self, off: u64, sym: u32, r_type: u32) {
        let info = self.r_info(sym, r_type);
        self.addr(off);
        self.addr(info);
    }

    fn rela(&mut self, off: u64, sym: u32, r_type: u32, addend: i64) {
        self.rel(off, sym, r_type);
        match self.class {
            Class::Elf32 => self.u32(i32::try_from(addend).unwrap() as u32),
            Class::Elf64 => self.u64(addend as u64),
        }
    }
}

// Assembles a complete ELF image with .text, static and dynamic symbol
// tables, one rela and one rel section, a dynamic section and the three
// string tables.
fn fixture(class: Class, endian: Endian, machine: u16, object_type: u16) -> (Vec<u8>, Layout) {
    let layout = Layout::new(class);
    let mut e = Emit {
        buf: Vec::new(),
        class,
        endian,
    };

    // e_ident
    e.bytes(&ElfHdr::ELFMAG);
    e.u8(match class {
        Class::Elf32 => ElfHdr::ELFCLASS32,
        Class::Elf64 => ElfHdr::ELFCLASS64,
    });
    e.u8(match endian {
        Endian::Little => ElfHdr::ELFDATA2LSB,
        Endian::Big => ElfHdr::ELFDATA2MSB,
    });
    e.u8(1); // EI_VERSION
    e.u8(0); // EI_OSABI
    e.bytes(&[0; 8]);

    e.u16(object_type);
    e.u16(machine);
    e.u32(1);
    e.addr(TEXT_VADDR); // e_entry
    e.addr(layout.phoff as u64);
    e.addr(layout.shoff as u64);
    e.u32(0); // e_flags
    e.u16(layout.ehsize as u16);
    e.u16(layout.phentsize as u16);
    e.u16(2); // e_phnum
    e.u16(layout.shentsize as u16);
    e.u16(10); // e_shnum
    e.u16(9); // e_shstrndx
    assert_eq!(e.buf.len(), layout.phoff);

    // Program headers: one LOAD covering the file head, one DYNAMIC.
    e.phdr(
        1,
        0x5,
        0,
        TEXT_VADDR - layout.text_off as u64,
        (layout.text_off + TEXT_SIZE) as u64,
        0x1000,
    );
    e.phdr(
        2,
        0x6,
        layout.dynamic_off as u64,
        0x402000,
        (2 * layout.dynsize) as u64,
        8,
    );
    assert_eq!(e.buf.len(), layout.text_off);

    for i in 0..TEXT_SIZE {
        e.u8(0x10 + i as u8);
    }
    e.bytes(STRTAB);
    assert_eq!(e.buf.len(), layout.symtab_off);

    // .symtab: null, "main", "helper"
    e.sym(0, 0, 0, 0, 0);
    e.sym(1, TEXT_VADDR, 16, 0x12, 1);
    e.sym(6, TEXT_VADDR + 0x10, 8, 0x12, 1);

    e.bytes(DYNSTR);
    assert_eq!(e.buf.len(), layout.dynsym_off);

    // .dynsym: null, "_start"
    e.sym(0, 0, 0, 0, 0);
    e.sym(11, TEXT_VADDR, 16, 0x12, 1);
    assert_eq!(e.buf.len(), layout.rela_off);

    // .rela.text
    e.rela(TEXT_VADDR, 1, 2, -4);
    e.rela(TEXT_VADDR + 8, 2, 1, 8);
    // .rel.text
    e.rel(TEXT_VADDR + 12, 1, 8);
    assert_eq!(e.buf.len(), layout.dynamic_off);

    // .dynamic: DT_NEEDED -> "libc.so.6", DT_NULL
    e.dynent(1, 1);
    e.dynent(0, 0);

    e.bytes(SHSTRTAB);
    assert_eq!(e.buf.len(), layout.shoff);

    // Section header table.
    e.shdr(0, 0, 0, 0, 0, 0, 0, 0, 0, 0);
    e.shdr(
        1,
        1,
        0x6,
        TEXT_VADDR,
        layout.text_off as u64,
        TEXT_SIZE as u64,
        0,
        0,
        16,
        0,
    );
    e.shdr(
        7,
        3,
        0,
        0,
        layout.strtab_off as u64,
        STRTAB.len() as u64,
        0,
        0,
        1,
        0,
    );
    e.shdr(
        15,
        2,
        0,
        0,
        layout.symtab_off as u64,
        (3 * layout.symsize) as u64,
        2,
        1,
        8,
        layout.symsize as u64,
    );
    e.shdr(
        23,
        3,
        0,
        0,
        layout.dynstr_off as u64,
        DYNSTR.len() as u64,
        0,
        0,
        1,
        0,
    );
    e.shdr(
        31,
        11,
        0,
        0,
        layout.dynsym_off as u64,
        (2 * layout.symsize) as u64,
        4,
        1,
        8,
        layout.symsize as u64,
    );
    e.shdr(
        39,
        4,
        0,
        0,
        layout.rela_off as u64,
        (2 * layout.relasize) as u64,
        3,
        1,
        8,
        layout.relasize as u64,
    );
    e.shdr(
        50,
        9,
        0,
        0,
        layout.rel_off as u64,
        layout.relsize as u64,
        3,
        1,
        8,
        layout.relsize as u64,
    );
    e.shdr(
        60,
        6,
        0,
        0x402000,
        layout.dynamic_off as u64,
        (2 * layout.dynsize) as u64,
        4,
        0,
        8,
        layout.dynsize as u64,
    );
    e.shdr(
        69,
        3,
        0,
        0,
        layout.shstrtab_off as u64,
        SHSTRTAB.len() as u64,
        0,
        0,
        1,
        0,
    );
    assert_eq!(e.buf.len(), layout.shoff + 10 * layout.shentsize);

    (e.buf, layout)
}

// A fixture written to a temp file, removed again on drop.
struct TestFile {
    path: PathBuf,
}

impl TestFile {
    fn new(name: &str, bytes: &[u8]) -> Self {
        let path =
            std::env::temp_dir().join(format!("elfmap-test-{}-{}", std::process::id(), name));
        std::fs::write(&path, bytes).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[test]
fn file_range_overflow() {
    let range = FileRange::try_from((0u64, 100u64)).unwrap();
    assert_eq!(range.offset_begin, 0);
    assert_eq!(range.offset_end, 100);
    assert_eq!(range.len(), 100);
    assert!(FileRange::try_from((u64::MAX, 100u64)).is_err());
}

#[test]
fn parses_class64_little_endian() {
    let (image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("le64", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let hdr = elf.header();
    assert_eq!(hdr.class(), Class::Elf64);
    assert_eq!(elf.endian(), Endian::Little);
    assert_eq!(hdr.object_type(), ObjectType::Dyn);
    assert_eq!(hdr.machine(), Machine::X86_64);
    assert_eq!(hdr.machine_raw(), EM_X86_64);
    assert_eq!(hdr.version(), 1);
    assert_eq!(hdr.osabi(), OsAbi::SysV);
    assert_eq!(hdr.entry(), TEXT_VADDR);
    assert_eq!(hdr.phoff(), layout.phoff as u64);
    assert_eq!(hdr.shoff(), layout.shoff as u64);
    assert_eq!(hdr.ehsize(), 64);
    assert_eq!(hdr.phentsize(), 56);
    assert_eq!(hdr.phnum(), 2);
    assert_eq!(hdr.shentsize(), 64);
    assert_eq!(elf.section_count(), 10);
    assert_eq!(elf.shstrndx(), 9);

    let segment_types: Vec<_> = elf.phdrs_iter().map(|p| p.segment_type()).collect();
    assert_eq!(segment_types, [SegmentType::Load, SegmentType::Dynamic]);
}

#[test]
fn parses_class32_big_endian() {
    let (image, layout) = fixture(Class::Elf32, Endian::Big, EM_SPARC, ET_EXEC);
    let file = TestFile::new("be32", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let hdr = elf.header();
    assert_eq!(hdr.class(), Class::Elf32);
    assert_eq!(elf.endian(), Endian::Big);
    assert_eq!(hdr.object_type(), ObjectType::Exec);
    assert_eq!(hdr.machine(), Machine::Sparc);
    assert_eq!(hdr.entry(), TEXT_VADDR);
    assert_eq!(hdr.phoff(), 52);
    assert_eq!(hdr.shoff(), layout.shoff as u64);
    assert_eq!(hdr.ehsize(), 52);
    assert_eq!(hdr.phentsize(), 32);
    assert_eq!(hdr.shentsize(), 40);
    assert_eq!(elf.section_count(), 10);

    let first = elf.phdrs_iter().next().unwrap();
    assert_eq!(first.segment_type(), SegmentType::Load);
    assert!(first.flags().contains(PhdrFlags::READ | PhdrFlags::EXECUTE));
}

// Same semantic content in all four class/endian combinations must come
// out numerically equal through the class-agnostic accessors.
#[test]
fn class_and_endian_invariance() {
    let mut snapshots = Vec::new();
    for (class, endian, tag) in [
        (Class::Elf32, Endian::Little, "inv-le32"),
        (Class::Elf32, Endian::Big, "inv-be32"),
        (Class::Elf64, Endian::Little, "inv-le64"),
        (Class::Elf64, Endian::Big, "inv-be64"),
    ] {
        let (image, _) = fixture(class, endian, EM_X86_64, ET_DYN);
        let file = TestFile::new(tag, &image);
        let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

        let section_names: Vec<_> = elf
            .shdrs_iter()
            .map(|s| elf.section_name(&s).unwrap().to_owned())
            .collect();
        let section_types: Vec<_> = elf.shdrs_iter().map(|s| s.section_type()).collect();
        let sym_names: Vec<_> = elf
            .syms_iter()
            .map(|s| elf.symbol_name(&s).unwrap().to_owned())
            .collect();
        let sym_values: Vec<_> = elf.syms_iter().map(|s| s.value()).collect();
        let dyn_tags: Vec<_> = elf.dyn_iter().map(|d| (d.tag(), d.value())).collect();
        let relocs: Vec<_> = elf
            .relocs_iter()
            .map(|r| (r.offset(), r.symbol_index(), r.type_raw(), r.addend()))
            .collect();

        snapshots.push((
            elf.header().entry(),
            section_names,
            section_types,
            sym_names,
            sym_values,
            dyn_tags,
            relocs,
        ));
    }
    for snapshot in &snapshots[1..] {
        assert_eq!(snapshot, &snapshots[0]);
    }
}

#[test]
fn rejects_malformed_idents() {
    let (mut image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);

    let file = TestFile::new("short", &image[..8]);
    assert!(matches!(
        Elf::open(file.path(), Access::ReadOnly),
        Err(ElfError::UnexpectedEOF)
    ));

    let mut bad_magic = image.clone();
    bad_magic[0] = 0x7e;
    let file = TestFile::new("badmagic", &bad_magic);
    assert!(matches!(
        Elf::open(file.path(), Access::ReadOnly),
        Err(ElfError::BadMagic)
    ));

    let mut bad_endian = image.clone();
    bad_endian[ElfHdr::EI_DATA] = 5;
    let file = TestFile::new("badendian", &bad_endian);
    assert!(matches!(
        Elf::open(file.path(), Access::ReadOnly),
        Err(ElfError::InvalidEndian)
    ));

    image[ElfHdr::EI_CLASS] = 3;
    let file = TestFile::new("badclass", &image);
    assert!(matches!(
        Elf::open(file.path(), Access::ReadOnly),
        Err(ElfError::InvalidClass)
    ));
}

#[test]
fn rejects_truncated_section_table() {
    let (image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("truncated", &image[..layout.shoff + 20]);
    assert!(matches!(
        Elf::open(file.path(), Access::ReadOnly),
        Err(ElfError::EndOfStream)
    ));
}

#[test]
fn section_lookups() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("lookups", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let text = elf.section_by_index(1).unwrap();
    assert_eq!(elf.section_name(&text).unwrap(), c".text");
    assert_eq!(text.section_type(), SectionType::Progbits);
    assert!(text.flags().contains(ShdrFlags::ALLOC | ShdrFlags::EXECINSTR));
    assert!(matches!(
        elf.section_by_index(10),
        Err(ElfError::InvalidSectionIndex)
    ));

    let symtab = elf.section_by_name(".symtab").unwrap();
    assert_eq!(symtab.section_type(), SectionType::Symtab);
    assert_eq!(symtab.link(), 2);
    assert_eq!(symtab.entry_count().unwrap(), 3);
    assert!(matches!(
        text.entry_count(),
        Err(ElfError::CannotGetEntries)
    ));
    assert!(matches!(
        elf.section_by_name(".does-not-exist"),
        Err(ElfError::SectionNotFound)
    ));

    let dynamic = elf.section_by_type(SectionType::Dynamic).unwrap();
    assert_eq!(elf.section_name(&dynamic).unwrap(), c".dynamic");
    assert!(matches!(
        elf.section_by_type(SectionType::Note),
        Err(ElfError::SectionNotFound)
    ));

    // The shstrndx entry names itself.
    let shstrtab = elf.section_by_index(elf.shstrndx()).unwrap();
    assert_eq!(elf.section_name(&shstrtab).unwrap(), c".shstrtab");

    // Every cached section's name offset resolves within shstrtab.
    for shdr in elf.shdrs_iter() {
        assert!((shdr.name_offset() as usize) < SHSTRTAB.len());
        elf.section_name(&shdr).unwrap();
    }

    // Accessors are idempotent.
    assert_eq!(
        elf.section_name(&text).unwrap(),
        elf.section_name(&text).unwrap()
    );
    assert_eq!(elf.section_by_index(1).unwrap(), text);
}

#[test]
fn section_data_access() {
    let (image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("data", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let text = elf.section_by_name(".text").unwrap();
    let data = elf.section_data(&text).unwrap();
    assert_eq!(data.len(), TEXT_SIZE);
    assert_eq!(data, &image[layout.text_off..layout.text_off + TEXT_SIZE]);
    assert_eq!(elf.section_data_by_name(".text").unwrap(), data);

    let null = elf.section_by_index(0).unwrap();
    assert!(matches!(
        elf.section_data(&null),
        Err(ElfError::EmptySection)
    ));
}

#[test]
fn symbol_iteration_and_names() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("syms", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let syms: Vec<_> = elf.syms_iter().collect();
    assert_eq!(syms.len(), 5);

    let names: Vec<_> = syms
        .iter()
        .map(|s| elf.symbol_name(s).unwrap())
        .collect();
    assert_eq!(names, [c"", c"main", c"helper", c"", c"_start"]);

    // A zero name offset yields the empty string.
    assert_eq!(syms[0].name_offset(), 0);
    assert_eq!(elf.symbol_name(&syms[0]).unwrap(), c"");

    let main = &syms[1];
    assert_eq!(main.value(), TEXT_VADDR);
    assert_eq!(main.size(), 16);
    assert_eq!(main.bind(), SymbolBind::Global);
    assert_eq!(main.sym_type(), SymbolType::Func);
    assert_eq!(main.visibility(), SymbolVisibility::Default);
    assert_eq!(main.shndx(), 1);

    // A symbol whose name offset was never cached.
    let orphan = ElfSym::Elf64(Elf64Sym {
        st_name: 9999,
        ..Default::default()
    });
    assert!(matches!(
        elf.symbol_name(&orphan),
        Err(ElfError::SymbolNameNotFound)
    ));
}

#[test]
fn dynamic_entries_and_names() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("dyn", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let entries: Vec<_> = elf.dyn_iter().collect();
    assert_eq!(entries.len(), 2);

    let needed = &entries[0];
    assert_eq!(needed.tag(), DynamicTag::Needed);
    assert_eq!(needed.value(), 1);
    assert_eq!(elf.dyn_name(needed).unwrap(), Some(c"libc.so.6".as_ref()));

    let null = &entries[1];
    assert_eq!(null.tag(), DynamicTag::Null);
    assert_eq!(elf.dyn_name(null).unwrap(), None);
}

#[test]
fn relocation_iteration() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("relocs", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let mut iter = elf.relocs_iter();
    assert_eq!(iter.remaining(), 3);

    // .rela.text comes first in section order.
    let rela0 = iter.next().unwrap();
    assert_eq!(iter.section_index(), 6);
    assert!(rela0.is_rela());
    assert_eq!(rela0.offset(), TEXT_VADDR);
    assert_eq!(rela0.symbol_index(), 1);
    assert_eq!(rela0.type_raw(), 2);
    assert_eq!(rela0.addend(), Some(-4));
    assert_eq!(
        rela0.reloc_type(Machine::X86_64).unwrap(),
        RelocationType::X86_64(X86_64Reloc::Pc32)
    );

    let rela1 = iter.next().unwrap();
    assert_eq!(rela1.symbol_index(), 2);
    assert_eq!(rela1.addend(), Some(8));
    assert_eq!(
        rela1.reloc_type(Machine::X86_64).unwrap(),
        RelocationType::X86_64(X86_64Reloc::Abs64)
    );

    let rel = iter.next().unwrap();
    assert_eq!(iter.section_index(), 7);
    assert!(!rel.is_rela());
    assert_eq!(rel.addend(), None);
    assert_eq!(rel.type_raw(), 8);
    assert_eq!(
        rel.reloc_type(Machine::X86_64).unwrap(),
        RelocationType::X86_64(X86_64Reloc::Relative)
    );

    assert!(iter.next().is_none());
    assert_eq!(iter.remaining(), 0);

    // No catalog for the queried machine.
    assert!(matches!(
        rela0.reloc_type(Machine::M68K),
        Err(ElfError::UnknownRelocationArch)
    ));

    // A type code outside the machine's catalog.
    let exotic = ElfRelocation::Rela64(Elf64Rela {
        r_offset: 0,
        r_info: 200,
        r_addend: 0,
    });
    assert!(matches!(
        exotic.reloc_type(Machine::X86_64),
        Err(ElfError::UnknownRelocationCode)
    ));
}

#[test]
fn relocation_linked_symbols() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("reloc-link", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let mut iter = elf.relocs_iter();
    while let Some(reloc) = iter.next() {
        let sym = elf
            .relocation_linked_symbol(&reloc, iter.section_index())
            .unwrap();
        let direct = elf
            .section_symbol(
                &elf.section_by_index(elf.section_by_index(iter.section_index()).unwrap().link())
                    .unwrap(),
                reloc.symbol_index(),
            )
            .unwrap();
        assert_eq!(sym, direct);
    }

    let first = elf.relocs_iter().next().unwrap();
    let linked = elf.relocation_linked_symbol(&first, 6).unwrap();
    assert_eq!(elf.symbol_name(&linked).unwrap(), c"main");

    assert!(matches!(
        elf.relocation_linked_symbol(&first, 99),
        Err(ElfError::InvalidSectionIndex)
    ));
    // .text's link member points at the NULL section.
    assert!(matches!(
        elf.relocation_linked_symbol(&first, 1),
        Err(ElfError::InvalidLinkedSection)
    ));
}

#[test]
fn relocation_linked_symbol_bad_link() {
    let (mut image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    // Point .rel.text's sh_link member outside the section table.
    let link_off = layout.shoff + 7 * layout.shentsize + 40;
    image[link_off..link_off + 4].copy_from_slice(&99u32.to_le_bytes());
    let file = TestFile::new("bad-link", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let mut iter = elf.relocs_iter();
    let mut rel = iter.next().unwrap();
    while iter.section_index() != 7 {
        rel = iter.next().unwrap();
    }
    assert!(matches!(
        elf.relocation_linked_symbol(&rel, 7),
        Err(ElfError::InvalidLinkIndex)
    ));
}

#[test]
fn section_entry_accessors() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("entry-access", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let symtab = elf.section_by_name(".symtab").unwrap();
    let sym = elf.section_symbol(&symtab, 1).unwrap();
    assert_eq!(elf.symbol_name(&sym).unwrap(), c"main");
    assert!(matches!(
        elf.section_symbol(&symtab, 3),
        Err(ElfError::InvalidOffset)
    ));

    let text = elf.section_by_name(".text").unwrap();
    assert!(matches!(
        elf.section_symbol(&text, 0),
        Err(ElfError::CannotGetUnion)
    ));
    assert!(matches!(
        elf.section_relocation(&text, 0),
        Err(ElfError::CannotGetRelocationUnion)
    ));

    let rela = elf.section_by_name(".rela.text").unwrap();
    let reloc = elf.section_relocation(&rela, 1).unwrap();
    assert!(reloc.is_rela());
    assert_eq!(reloc.symbol_index(), 2);
    assert!(matches!(
        elf.section_relocation(&rela, 2),
        Err(ElfError::InvalidOffset)
    ));
}

#[test]
fn iterators_reset() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("reset", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let mut syms = elf.syms_iter();
    let first_pass: Vec<_> = syms.by_ref().collect();
    syms.reset();
    assert_eq!(syms.remaining(), first_pass.len() as u64);
    let second_pass: Vec<_> = syms.collect();
    assert_eq!(first_pass, second_pass);

    // Resetting mid-drain starts over as well.
    let mut relocs = elf.relocs_iter();
    relocs.next().unwrap();
    relocs.next().unwrap();
    relocs.reset();
    assert_eq!(relocs.remaining(), 3);
    assert_eq!(relocs.count(), 3);

    let mut phdrs = elf.phdrs_iter();
    let first_pass: Vec<_> = phdrs.by_ref().collect();
    phdrs.reset();
    assert_eq!(first_pass, phdrs.collect::<Vec<_>>());

    let mut shdrs = elf.shdrs_iter();
    let first_pass: Vec<_> = shdrs.by_ref().collect();
    shdrs.reset();
    assert_eq!(first_pass, shdrs.collect::<Vec<_>>());
}

#[test]
fn readonly_mutation_rejected() {
    let (image, _) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("ro-write", &image);
    let mut elf = Elf::open(file.path(), Access::ReadOnly).unwrap();

    let text = elf.section_by_name(".text").unwrap();
    let before = elf.section_data(&text).unwrap().to_vec();
    assert!(matches!(
        elf.modify_section_data(&text, &[0u8; 8]),
        Err(ElfError::NotMutable)
    ));
    assert_eq!(elf.section_data(&text).unwrap(), &before[..]);
    assert!(matches!(
        elf.persist(file.path().with_extension("copy")),
        Err(ElfError::NoMutableBuffer)
    ));
}

#[test]
fn bounded_write_and_persist() {
    let (image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);
    let file = TestFile::new("rw-write", &image);
    let mut elf = Elf::open(file.path(), Access::ReadWrite).unwrap();

    let text = elf.section_by_name(".text").unwrap();
    let payload: Vec<u8> = (0..20u8).map(|i| 0xa0 + i).collect();
    elf.modify_section_data(&text, &payload).unwrap();

    // A payload filling or exceeding the section is refused.
    assert!(matches!(
        elf.modify_section_data(&text, &[0u8; TEXT_SIZE]),
        Err(ElfError::InvalidOffset)
    ));

    let out = TestFile::new("rw-write-out", b"");
    elf.persist(out.path()).unwrap();

    // The source file stays byte-identical.
    assert_eq!(std::fs::read(file.path()).unwrap(), image);

    // The persisted image differs from the original exactly in the
    // payload bytes.
    let persisted = std::fs::read(out.path()).unwrap();
    assert_eq!(persisted.len(), image.len());
    assert_eq!(
        &persisted[layout.text_off..layout.text_off + payload.len()],
        &payload[..]
    );
    for (i, (new, old)) in persisted.iter().zip(image.iter()).enumerate() {
        if !(layout.text_off..layout.text_off + payload.len()).contains(&i) {
            assert_eq!(new, old, "byte {} changed unexpectedly", i);
        }
    }

    // Round trip: reopening the persisted file yields an equal view.
    let reopened = Elf::open(out.path(), Access::ReadOnly).unwrap();
    assert_eq!(reopened.header(), elf.header());
    assert_eq!(reopened.section_count(), elf.section_count());
    assert_eq!(
        reopened.shdrs_iter().collect::<Vec<_>>(),
        elf.shdrs_iter().collect::<Vec<_>>()
    );
    assert_eq!(
        reopened.section_data_by_name(".shstrtab").unwrap(),
        elf.section_data_by_name(".shstrtab").unwrap()
    );
    assert_eq!(
        reopened.section_data_by_name(".text").unwrap()[..payload.len()],
        payload[..]
    );
}

#[test]
fn shnum_and_shstrndx_extensions() {
    let (mut image, layout) = fixture(Class::Elf64, Endian::Little, EM_X86_64, ET_DYN);

    // Zero e_shnum; the real count moves into section header 0's
    // sh_size.
    image[60..62].copy_from_slice(&0u16.to_le_bytes());
    let size_off = layout.shoff + 32;
    image[size_off..size_off + 8].copy_from_slice(&10u64.to_le_bytes());

    // e_shstrndx = SHN_XINDEX; the real index moves into section header
    // 0's sh_link.
    image[62..64].copy_from_slice(&0xffffu16.to_le_bytes());
    let link_off = layout.shoff + 40;
    image[link_off..link_off + 4].copy_from_slice(&9u32.to_le_bytes());

    let file = TestFile::new("extensions", &image);
    let elf = Elf::open(file.path(), Access::ReadOnly).unwrap();
    assert_eq!(elf.section_count(), 10);
    assert_eq!(elf.shstrndx(), 9);
    assert_eq!(
        elf.section_name(&elf.section_by_index(1).unwrap()).unwrap(),
        c".text"
    );
}

#[test]
fn catalog_unknown_sentinels() {
    assert_eq!(SectionType::from(0xdeadbeef), SectionType::Unknown);
    assert_eq!(SectionType::from(11), SectionType::Dynsym);
    assert_eq!(SegmentType::from(0x12345678), SegmentType::Unknown);
    assert_eq!(SegmentType::from(0x6474e551), SegmentType::GnuStack);
    assert_eq!(Machine::from(9999), Machine::Unknown);
    assert_eq!(Machine::from(0x9026), Machine::Alpha);
    assert_eq!(ObjectType::from(77), ObjectType::Unknown);
    assert_eq!(OsAbi::from(200), OsAbi::Unknown);
    assert_eq!(DynamicTag::from(0x12345), DynamicTag::Unknown);
    assert_eq!(DynamicTag::from(29), DynamicTag::Runpath);
    assert!(DynamicTag::Needed.is_string_offset());
    assert!(!DynamicTag::Hash.is_string_offset());
    assert_eq!(SymbolBind::from(7), SymbolBind::Unknown);
    assert_eq!(SymbolType::from(9), SymbolType::Unknown);
}

#[test]
fn strtab_lookup() {
    let strtab = Strtab::new(b"\0alpha\0beta\0");
    assert_eq!(strtab.get_str(0).unwrap(), c"");
    assert_eq!(strtab.get_str(1).unwrap(), c"alpha");
    assert_eq!(strtab.get_str(7).unwrap(), c"beta");
    // Mid-string offsets address the string's tail.
    assert_eq!(strtab.get_str(3).unwrap(), c"pha");
    assert!(matches!(
        strtab.get_str(12),
        Err(ElfError::InvalidNameOffset)
    ));

    // Unterminated table tail.
    let unterminated = Strtab::new(b"\0name");
    assert!(matches!(
        unterminated.get_str(1),
        Err(ElfError::InvalidNameOffset)
    ));
}
