//! In-memory PDF document model.
//!
//! A [`Document`] is an ordered collection of indirect objects plus a root
//! reference. Insertion order is emission order, so the sequence the composer
//! builds determines every byte offset in the serialized file. This layer is
//! a pure container: forward references are legal and nothing is validated
//! until [`Document::verify_references`] runs.

use crate::error::{Error, Result};
use crate::object::{IndirectObject, Object, ObjectRef};

/// An ordered collection of indirect objects forming one PDF document.
///
/// Constructed fresh per fixture, consumed exactly once by the serializer.
#[derive(Debug, Clone)]
pub struct Document {
    /// Objects in emission order
    objects: Vec<IndirectObject>,
    /// Next object number to allocate
    next_id: u32,
    /// Reference to the catalog object
    root: Option<ObjectRef>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            root: None,
        }
    }

    /// Allocate an object number without adding a body yet.
    ///
    /// Lets the composer hand out references before the referenced objects
    /// exist, e.g. a catalog pointing at a pages object added later.
    pub fn alloc(&mut self) -> ObjectRef {
        let id = self.next_id;
        self.next_id += 1;
        ObjectRef::new(id, 0)
    }

    /// Add a body for a previously allocated reference.
    ///
    /// The object is appended to the emission sequence at this point, so
    /// call order (not allocation order) decides its byte offset.
    pub fn insert(&mut self, reference: ObjectRef, body: Object) {
        self.objects.push(IndirectObject { reference, body });
    }

    /// Allocate a number and add a body in one step.
    pub fn push(&mut self, body: Object) -> ObjectRef {
        let reference = self.alloc();
        self.insert(reference, body);
        reference
    }

    /// Declare the catalog (root) object.
    pub fn set_root(&mut self, reference: ObjectRef) {
        self.root = Some(reference);
    }

    /// The catalog reference, if declared.
    pub fn root(&self) -> Option<ObjectRef> {
        self.root
    }

    /// Objects in emission order.
    pub fn objects(&self) -> &[IndirectObject] {
        &self.objects
    }

    /// Whether an object with the given number is present.
    pub fn contains(&self, id: u32) -> bool {
        self.objects.iter().any(|obj| obj.reference.id == id)
    }

    /// Declared size: highest allocated object number + 1.
    ///
    /// This counts allocated numbers, not present objects, so a document
    /// that omitted an allocated object still declares the full range and
    /// the xref builder marks the gap free.
    pub fn size(&self) -> u32 {
        self.next_id
    }

    /// Check that the root and every embedded reference resolve to an
    /// object present in the document.
    ///
    /// Run by the pipeline for fixtures that are supposed to be valid; a
    /// failure here is a composer bug, and aborting beats silently writing
    /// a different kind of corruption than was requested. Fixtures invalid
    /// by omission skip this check.
    pub fn verify_references(&self) -> Result<()> {
        let root = self.root.ok_or(Error::NoRoot)?;
        if !self.contains(root.id) {
            return Err(Error::MissingRoot(root));
        }

        for obj in &self.objects {
            let mut dangling = None;
            obj.body.visit_references(&mut |r| {
                if dangling.is_none() && !self.contains(r.id) {
                    dangling = Some(r);
                }
            });
            if let Some(to) = dangling {
                return Err(Error::DanglingReference {
                    from: obj.reference,
                    to,
                });
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dict;

    fn dict_with_ref(key: &str, target: ObjectRef) -> Object {
        let mut dict = Dict::new();
        dict.insert(key.to_string(), Object::Reference(target));
        Object::Dictionary(dict)
    }

    #[test]
    fn test_push_assigns_sequential_numbers() {
        let mut doc = Document::new();
        let a = doc.push(Object::Integer(1));
        let b = doc.push(Object::Integer(2));
        assert_eq!(a, ObjectRef::new(1, 0));
        assert_eq!(b, ObjectRef::new(2, 0));
        assert_eq!(doc.size(), 3);
    }

    #[test]
    fn test_forward_references_are_legal() {
        let mut doc = Document::new();
        let catalog = doc.alloc();
        let pages = doc.alloc();
        doc.insert(catalog, dict_with_ref("Pages", pages));
        doc.insert(pages, Object::Dictionary(Dict::new()));
        doc.set_root(catalog);

        assert!(doc.verify_references().is_ok());
        // Emission order follows insert order
        assert_eq!(doc.objects()[0].reference, catalog);
        assert_eq!(doc.objects()[1].reference, pages);
    }

    #[test]
    fn test_verify_rejects_missing_root() {
        let mut doc = Document::new();
        let phantom = doc.alloc();
        doc.set_root(phantom);
        match doc.verify_references() {
            Err(Error::MissingRoot(r)) => assert_eq!(r.id, 1),
            other => panic!("expected MissingRoot, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_rejects_no_root() {
        let mut doc = Document::new();
        doc.push(Object::Integer(1));
        assert!(matches!(doc.verify_references(), Err(Error::NoRoot)));
    }

    #[test]
    fn test_verify_rejects_dangling_reference() {
        let mut doc = Document::new();
        let catalog = doc.push(dict_with_ref("Pages", ObjectRef::new(9, 0)));
        doc.set_root(catalog);
        match doc.verify_references() {
            Err(Error::DanglingReference { from, to }) => {
                assert_eq!(from.id, 1);
                assert_eq!(to.id, 9);
            },
            other => panic!("expected DanglingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_size_counts_allocated_but_omitted_objects() {
        let mut doc = Document::new();
        doc.push(Object::Integer(1));
        let _omitted = doc.alloc();
        assert_eq!(doc.size(), 3);
        assert!(!doc.contains(2));
    }
}
