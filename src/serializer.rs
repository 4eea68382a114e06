//! PDF object and document serialization.
//!
//! Serializes the object model to its byte representation according to
//! PDF specification ISO 32000-1:2008, and performs the single pass in
//! which byte offsets are computed: [`DocumentSerializer`] records the
//! start of every object into an [`OffsetRecord`] as it is emitted, so no
//! offset arithmetic lives anywhere else.

use crate::document::Document;
use crate::error::Result;
use crate::object::{Dict, Object, ObjectRef};
use std::collections::BTreeMap;
use std::io::Write;

/// Serializer for individual PDF objects.
///
/// Converts object model values to their byte representation following
/// the PDF specification syntax rules. Dictionary entries are written in
/// insertion order, which the composer relies on for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct ObjectSerializer {
    /// Whether to use compact formatting (minimal whitespace)
    compact: bool,
}

impl ObjectSerializer {
    /// Create a new object serializer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact serializer (minimal whitespace).
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)
            .expect("writing to Vec cannot fail");
        buf
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, reference: ObjectRef, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", reference.id, reference.gen).unwrap();
        self.write_object(&mut buf, obj).unwrap();
        write!(buf, "\nendobj\n").unwrap();
        buf
    }

    /// Write an object to a buffer.
    fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> std::io::Result<()> {
        match obj {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => self.write_real(w, *r),
            Object::String(s) => self.write_string(w, s),
            Object::Name(n) => self.write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream { dict, data } => self.write_stream(w, dict, data),
            // A dangling reference serializes verbatim; resolution is a
            // reader concern, not a writer concern.
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen),
        }
    }

    /// Write a real number with appropriate precision.
    fn write_real<W: Write>(&self, w: &mut W, value: f64) -> std::io::Result<()> {
        if value.fract() == 0.0 {
            write!(w, "{}", value as i64)
        } else {
            let formatted = format!("{:.5}", value);
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            write!(w, "{}", trimmed)
        }
    }

    /// Write a PDF string.
    ///
    /// Uses literal string syntax `(...)` with proper escaping,
    /// or hex string syntax `<...>` for binary data.
    fn write_string<W: Write>(&self, w: &mut W, data: &[u8]) -> std::io::Result<()> {
        let is_printable = data
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if is_printable {
            write!(w, "(")?;
            for &byte in data {
                match byte {
                    b'(' => write!(w, "\\(")?,
                    b')' => write!(w, "\\)")?,
                    b'\\' => write!(w, "\\\\")?,
                    b'\n' => write!(w, "\\n")?,
                    b'\r' => write!(w, "\\r")?,
                    b'\t' => write!(w, "\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            write!(w, ")")
        } else {
            write!(w, "<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            write!(w, ">")
        }
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape special characters with `#xx`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> std::io::Result<()> {
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'..=b'&'
                | b'\''..=b'.'
                | b'0'..=b'9'
                | b';'
                | b'<'
                | b'>'
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'^'..=b'z'
                | b'|'
                | b'~' => {
                    w.write_all(&[byte])?;
                },
                _ => {
                    write!(w, "#{:02X}", byte)?;
                },
            }
        }
        Ok(())
    }

    /// Write a PDF array.
    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> std::io::Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")
    }

    /// Write a PDF dictionary in insertion order.
    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dict) -> std::io::Result<()> {
        write!(w, "<<")?;
        for (key, value) in dict {
            if !self.compact {
                write!(w, "\n  ")?;
            } else {
                write!(w, " ")?;
            }
            self.write_name(w, key)?;
            write!(w, " ")?;
            self.write_object(w, value)?;
        }
        if !self.compact && !dict.is_empty() {
            writeln!(w)?;
        } else if self.compact {
            write!(w, " ")?;
        }
        write!(w, ">>")
    }

    /// Write a PDF stream.
    ///
    /// An explicit `/Length` entry is honored verbatim even when it lies
    /// about the payload, so negative fixtures can declare a wrong length.
    /// When absent, the payload's true length is filled in.
    fn write_stream<W: Write>(&self, w: &mut W, dict: &Dict, data: &[u8]) -> std::io::Result<()> {
        let mut dict_with_length = dict.clone();
        if !dict_with_length.contains_key("Length") {
            dict_with_length.insert("Length".to_string(), Object::Integer(data.len() as i64));
        }

        self.write_dictionary(w, &dict_with_length)?;
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }
}

/// Helper functions for building PDF objects.
impl ObjectSerializer {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create a String object from a Rust string.
    pub fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec())
    }

    /// Create an Integer object.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Create a Boolean object.
    pub fn boolean(b: bool) -> Object {
        Object::Boolean(b)
    }

    /// Create an Array object.
    pub fn array(items: Vec<Object>) -> Object {
        Object::Array(items)
    }

    /// Create a Dictionary object with entries in the given order.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        let map: Dict = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Object::Dictionary(map)
    }

    /// Create a Reference object.
    pub fn reference(r: ObjectRef) -> Object {
        Object::Reference(r)
    }

    /// Create a rectangle array `[llx lly urx ury]`.
    pub fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Object {
        Object::Array(vec![
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(urx),
            Object::Real(ury),
        ])
    }
}

/// Byte offsets recorded while a document is serialized.
///
/// Maps each object number to the position of the first byte of its
/// encoding, measured from the start of the output (the header counts).
/// Read-only once serialization completes, except for deliberate poisoning
/// by the corruption injector.
#[derive(Debug, Clone, Default)]
pub struct OffsetRecord {
    entries: BTreeMap<u32, (u64, u16)>,
}

impl OffsetRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the offset at which an object's encoding begins.
    pub fn record(&mut self, reference: ObjectRef, offset: u64) {
        self.entries.insert(reference.id, (offset, reference.gen));
    }

    /// The recorded offset for an object number, if any.
    pub fn offset_of(&self, id: u32) -> Option<u64> {
        self.entries.get(&id).map(|&(offset, _)| offset)
    }

    /// The declared generation for an object number, if recorded.
    pub fn generation_of(&self, id: u32) -> Option<u16> {
        self.entries.get(&id).map(|&(_, gen)| gen)
    }

    /// Iterate over `(id, offset, generation)` in ascending object number.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64, u16)> + '_ {
        self.entries.iter().map(|(&id, &(offset, gen))| (id, offset, gen))
    }

    /// Number of recorded objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no offsets have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every recorded offset with a fixed sentinel value.
    ///
    /// Used by the offset-poisoning corruption strategy; the object bytes
    /// already emitted stay untouched.
    pub fn poison(&mut self, sentinel: u64) {
        for (offset, _) in self.entries.values_mut() {
            *offset = sentinel;
        }
    }
}

/// File header written before the first object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// PDF version, e.g. "1.7"
    pub version: &'static str,
    /// Whether to emit the binary-marker comment line after the version
    pub binary_marker: bool,
}

/// Binary marker comment recommended for files carrying binary content.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Output of the document serialization pass.
#[derive(Debug, Clone)]
pub struct SerializedBody {
    /// Header plus every object encoding, in document order
    pub bytes: Vec<u8>,
    /// Start offset of each object within `bytes`
    pub offsets: OffsetRecord,
}

/// Serializes a whole document body, recording object offsets.
///
/// This is the only place offsets are computed; the xref builder consumes
/// the resulting [`OffsetRecord`] without re-deriving anything.
#[derive(Debug, Clone, Default)]
pub struct DocumentSerializer {
    serializer: ObjectSerializer,
}

impl DocumentSerializer {
    /// Create a document serializer with the default object formatting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the header and every object in document order.
    ///
    /// Dangling references are encoded verbatim; consistency checking
    /// happens earlier in the pipeline, if at all.
    pub fn serialize(&self, doc: &Document, header: FileHeader) -> Result<SerializedBody> {
        let mut bytes = Vec::new();
        let mut offsets = OffsetRecord::new();

        writeln!(bytes, "%PDF-{}", header.version)?;
        if header.binary_marker {
            bytes.extend_from_slice(BINARY_MARKER);
        }

        for obj in doc.objects() {
            let offset = bytes.len() as u64;
            offsets.record(obj.reference, offset);
            log::debug!("object {} at offset {}", obj.reference, offset);
            bytes.extend_from_slice(&self.serializer.serialize_indirect(obj.reference, &obj.body));
        }

        Ok(SerializedBody { bytes, offsets })
    }
}
