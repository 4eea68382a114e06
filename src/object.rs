//! PDF object types.
//!
//! A typed representation of the PDF object model subset this crate writes:
//! primitives, arrays, dictionaries, streams, and indirect references.
//! Dictionaries preserve insertion order so serialization is deterministic
//! and entries appear in the order the composer added them.

use indexmap::IndexMap;

/// Dictionary type used throughout the object model.
///
/// Insertion order is emission order, which keeps regenerated fixtures
/// byte-identical.
pub type Dict = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs, insertion-ordered)
    Dictionary(Dict),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// A numbered object owned by a [`Document`](crate::document::Document).
///
/// Immutable once handed to the serializer; the document's insertion order
/// determines the emission order and therefore every byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    /// The object's number and generation
    pub reference: ObjectRef,
    /// The object's body
    pub body: Object,
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Visit every [`ObjectRef`] reachable from this object's body.
    ///
    /// Walks arrays, dictionaries, and stream dictionaries recursively.
    /// Used by the document's consistency check before serializing a
    /// fixture that is supposed to be valid.
    pub fn visit_references(&self, visit: &mut dyn FnMut(ObjectRef)) {
        match self {
            Object::Reference(r) => visit(*r),
            Object::Array(arr) => {
                for item in arr {
                    item.visit_references(visit);
                }
            },
            Object::Dictionary(dict) | Object::Stream { dict, .. } => {
                for value in dict.values() {
                    value.visit_references(visit);
                }
            },
            _ => {},
        }
    }
}
