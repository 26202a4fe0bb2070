// SPDX-License-Identifier: (GPL-2.0-or-later OR MIT)
//
// Copyright (c) 2024 SUSE LLC
//
// Author: Nicolai Stange <nstange@suse.de>
//
// vim: ts=4 sw=4 et

//! Errors while working with ELF files: failed mappings, malformed idents,
//! unresolvable string tables, broken cross-section links and relocation
//! decoding failures. The [`fmt::Display`] trait is implemented to allow
//! formatting error instances.

use core::fmt;
use std::io;

/// A convenience alias for `Result<T, ElfError>`.
pub type ElfResult<T> = Result<T, ElfError>;

#[derive(Debug)]
pub enum ElfError {
    OpenFailed(io::Error),
    MapFailed(io::Error),
    InvalidOffset,
    NotMutable,
    NoMutableBuffer,
    WriteFailed(io::Error),
    UnexpectedEOF,

    BadMagic,
    InvalidClass,
    InvalidEndian,
    EndOfStream,

    NoSectionStringTable,
    DynStringTableNotFound,
    InvalidNameOffset,
    SectionNotFound,
    InvalidSectionIndex,
    EmptySection,

    InvalidLinkIndex,
    InvalidLinkedSection,

    CannotGetEntries,
    CannotGetUnion,
    CannotGetRelocationUnion,
    SymbolNameNotFound,
    UnknownRelocationArch,
    UnknownRelocationCode,
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed(e) => {
                write!(f, "failed to open ELF file: {}", e)
            }
            Self::MapFailed(e) => {
                write!(f, "failed to map ELF file: {}", e)
            }
            Self::InvalidOffset => {
                write!(f, "access beyond mapped ELF buffer bounds")
            }
            Self::NotMutable => {
                write!(f, "write access to read-only ELF buffer")
            }
            Self::NoMutableBuffer => {
                write!(f, "no mutable ELF buffer available")
            }
            Self::WriteFailed(e) => {
                write!(f, "failed to write ELF buffer contents: {}", e)
            }
            Self::UnexpectedEOF => {
                write!(f, "unexpected end of ELF file")
            }

            Self::BadMagic => {
                write!(f, "unrecognized ELF magic")
            }
            Self::InvalidClass => {
                write!(f, "invalid ELF class")
            }
            Self::InvalidEndian => {
                write!(f, "invalid ELF data encoding")
            }
            Self::EndOfStream => {
                write!(f, "ELF table extends beyond end of file")
            }

            Self::NoSectionStringTable => {
                write!(f, "no section name string table present")
            }
            Self::DynStringTableNotFound => {
                write!(f, "no .dynstr string table present")
            }
            Self::InvalidNameOffset => {
                write!(f, "invalid ELF string table offset")
            }
            Self::SectionNotFound => {
                write!(f, "ELF section not found")
            }
            Self::InvalidSectionIndex => {
                write!(f, "invalid ELF section index")
            }
            Self::EmptySection => {
                write!(f, "ELF section has no content")
            }

            Self::InvalidLinkIndex => {
                write!(f, "ELF section link out of bounds")
            }
            Self::InvalidLinkedSection => {
                write!(f, "linked ELF section has unexpected type")
            }

            Self::CannotGetEntries => {
                write!(f, "ELF section is not an entry array")
            }
            Self::CannotGetUnion => {
                write!(f, "ELF section entries have unexpected kind")
            }
            Self::CannotGetRelocationUnion => {
                write!(f, "ELF section is not a relocation table")
            }
            Self::SymbolNameNotFound => {
                write!(f, "ELF symbol name not found")
            }
            Self::UnknownRelocationArch => {
                write!(f, "no relocation catalog for ELF machine")
            }
            Self::UnknownRelocationCode => {
                write!(f, "unrecognized ELF relocation type")
            }
        }
    }
}

impl std::error::Error for ElfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OpenFailed(e) | Self::MapFailed(e) | Self::WriteFailed(e) => Some(e),
            _ => None,
        }
    }
}
