//! Cross-reference table builder.
//!
//! The xref table maps object numbers to byte offsets in the PDF file,
//! enabling random access to PDF objects. This module builds the writer-side
//! table from the offsets the serializer recorded and emits it together with
//! the trailer and the restated `startxref` offset.
//!
//! Entry lines are byte-exact: readers seek by multiplying the object number
//! by the entry width, so every line must be exactly [`ENTRY_WIDTH`] bytes.

use crate::error::Result;
use crate::object::ObjectRef;
use crate::serializer::{ObjectSerializer, OffsetRecord};
use std::io::Write;

/// Exact byte width of one xref entry line, terminator included.
pub const ENTRY_WIDTH: usize = 20;

/// Generation number marking the head of the free list (object 0).
pub const FREE_HEAD_GENERATION: u16 = 65535;

/// Cross-reference table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    /// Byte offset of the object's encoding (0 for free entries)
    pub offset: u64,
    /// Generation number
    pub generation: u16,
    /// Whether the object is in use
    pub in_use: bool,
}

impl XRefEntry {
    /// Create an in-use entry.
    pub fn in_use(offset: u64, generation: u16) -> Self {
        Self {
            offset,
            generation,
            in_use: true,
        }
    }

    /// Create a free entry.
    pub fn free(generation: u16) -> Self {
        Self {
            offset: 0,
            generation,
            in_use: false,
        }
    }

    /// Format this entry as its exact 20-byte line.
    ///
    /// Layout: 10-digit zero-padded offset, space, 5-digit zero-padded
    /// generation, space, `n`/`f` flag, space, newline. Any deviation from
    /// this width breaks byte-exact readers.
    pub fn format_line(&self) -> [u8; ENTRY_WIDTH] {
        debug_assert!(self.offset <= 9_999_999_999, "offset exceeds 10 digits");
        let flag = if self.in_use { 'n' } else { 'f' };
        let line = format!("{:010} {:05} {} \n", self.offset, self.generation, flag);
        let mut buf = [0u8; ENTRY_WIDTH];
        buf.copy_from_slice(line.as_bytes());
        buf
    }
}

/// Writer-side cross-reference table: one entry per object number from 0
/// through the highest allocated number.
#[derive(Debug, Clone)]
pub struct XRefTable {
    entries: Vec<XRefEntry>,
}

impl XRefTable {
    /// Build a table from the serializer's offset record.
    ///
    /// Entry 0 is always the free-list head (`offset 0, generation 65535`,
    /// free) — a format convention, not a choice this crate controls. Object
    /// numbers in `[1, size)` absent from the record are marked free with
    /// offset 0; the rest are in-use with the recorded offset and the
    /// object's declared generation.
    pub fn build(offsets: &OffsetRecord, size: u32) -> Self {
        let mut entries = Vec::with_capacity(size as usize);
        entries.push(XRefEntry::free(FREE_HEAD_GENERATION));
        for id in 1..size {
            match offsets.offset_of(id) {
                Some(offset) => {
                    let generation = offsets.generation_of(id).unwrap_or(0);
                    entries.push(XRefEntry::in_use(offset, generation));
                },
                None => entries.push(XRefEntry::free(0)),
            }
        }
        Self { entries }
    }

    /// Number of entries, free-list head included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in object-number order.
    pub fn entries(&self) -> &[XRefEntry] {
        &self.entries
    }
}

/// Trailer naming the entry count and the catalog object.
#[derive(Debug, Clone, Copy)]
pub struct Trailer {
    /// Count of xref entries (highest object number + 1)
    pub size: u32,
    /// Reference to the catalog object
    pub root: ObjectRef,
}

/// Append the xref table, trailer, and end-of-file marker to `out`.
///
/// The table begins at the current end of `out`; that position is restated
/// after `startxref` so a reader can seek straight to the table. A poisoned
/// `startxref_override` replaces the restated offset while leaving the table
/// itself where it truly is — this is the one place exact two-way
/// consistency is mandatory for a valid fixture, and deliberately broken
/// for an invalid one.
pub fn write_xref_section(
    out: &mut Vec<u8>,
    table: &XRefTable,
    trailer: &Trailer,
    startxref_override: Option<u64>,
) -> Result<()> {
    let table_offset = out.len() as u64;

    writeln!(out, "xref")?;
    writeln!(out, "0 {}", table.len())?;
    for entry in table.entries() {
        out.extend_from_slice(&entry.format_line());
    }

    let trailer_dict = ObjectSerializer::dict(vec![
        ("Size", ObjectSerializer::integer(trailer.size as i64)),
        ("Root", ObjectSerializer::reference(trailer.root)),
    ]);
    writeln!(out, "trailer")?;
    out.extend_from_slice(&ObjectSerializer::new().serialize(&trailer_dict));
    writeln!(out)?;

    let startxref = startxref_override.unwrap_or(table_offset);
    writeln!(out, "startxref")?;
    writeln!(out, "{}", startxref)?;
    writeln!(out, "%%EOF")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_free_list_head_line() {
        let entry = XRefEntry::free(FREE_HEAD_GENERATION);
        assert_eq!(&entry.format_line(), b"0000000000 65535 f \n");
    }

    #[test]
    fn test_in_use_entry_line() {
        let entry = XRefEntry::in_use(317, 0);
        assert_eq!(&entry.format_line(), b"0000000317 00000 n \n");
    }

    #[test]
    fn test_build_fills_gaps_with_free_entries() {
        let mut offsets = OffsetRecord::new();
        offsets.record(ObjectRef::new(1, 0), 9);
        offsets.record(ObjectRef::new(3, 0), 120);

        let table = XRefTable::build(&offsets, 4);
        assert_eq!(table.len(), 4);
        assert_eq!(table.entries()[0], XRefEntry::free(FREE_HEAD_GENERATION));
        assert_eq!(table.entries()[1], XRefEntry::in_use(9, 0));
        assert_eq!(table.entries()[2], XRefEntry::free(0));
        assert_eq!(table.entries()[3], XRefEntry::in_use(120, 0));
    }

    #[test]
    fn test_write_xref_section_layout() {
        let mut offsets = OffsetRecord::new();
        offsets.record(ObjectRef::new(1, 0), 9);

        let table = XRefTable::build(&offsets, 2);
        let mut out = b"%PDF-1.7\nbody".to_vec();
        let table_offset = out.len();
        write_xref_section(
            &mut out,
            &table,
            &Trailer {
                size: 2,
                root: ObjectRef::new(1, 0),
            },
            None,
        )
        .unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("xref\n0 2\n"));
        assert!(text.contains("/Size 2"));
        assert!(text.contains("/Root 1 0 R"));
        assert!(text.contains(&format!("startxref\n{}\n%%EOF\n", table_offset)));
        // The restated offset points at the literal "xref" token
        assert_eq!(&out[table_offset..table_offset + 4], b"xref");
    }

    #[test]
    fn test_write_xref_section_with_override() {
        let table = XRefTable::build(&OffsetRecord::new(), 1);
        let mut out = Vec::new();
        write_xref_section(
            &mut out,
            &table,
            &Trailer {
                size: 1,
                root: ObjectRef::new(1, 0),
            },
            Some(999_999),
        )
        .unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("startxref\n999999\n%%EOF\n"));
    }

    proptest! {
        // The full width and padding contract: every representable entry
        // formats to exactly 20 bytes with fixed field positions.
        #[test]
        fn prop_entry_line_is_always_20_bytes(
            offset in 0u64..=9_999_999_999,
            generation in 0u16..=65535,
            in_use in any::<bool>(),
        ) {
            let entry = XRefEntry { offset, generation, in_use };
            let line = entry.format_line();
            prop_assert_eq!(line.len(), ENTRY_WIDTH);
            prop_assert_eq!(line[10], b' ');
            prop_assert_eq!(line[16], b' ');
            prop_assert_eq!(line[17], if in_use { b'n' } else { b'f' });
            prop_assert_eq!(line[18], b' ');
            prop_assert_eq!(line[19], b'\n');
            // Both numeric fields are zero-padded digits
            prop_assert!(line[..10].iter().all(u8::is_ascii_digit));
            prop_assert!(line[11..16].iter().all(u8::is_ascii_digit));
        }
    }
}
