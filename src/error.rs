//! Error types for fixture generation.
//!
//! Deliberate corruption (poisoned offsets, omitted output intents) is a
//! successful outcome of the negative-fixture code paths and never surfaces
//! here; these errors cover misconfiguration and composer bugs only.

use crate::object::ObjectRef;

/// Result type alias for fixture generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling a fixture.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested profile/corruption combination is incoherent.
    ///
    /// Raised before any bytes are produced; nothing partial is written.
    #[error("Invalid fixture configuration: {0}")]
    Configuration(String),

    /// The document names a root object that was never added.
    ///
    /// Indicates a composer bug, not an expected negative case.
    #[error("Root object {0} is not present in the document")]
    MissingRoot(ObjectRef),

    /// The document has no root object at all.
    #[error("Document has no root object")]
    NoRoot,

    /// An object references another object that does not exist.
    ///
    /// Only raised for fixtures that were not requested to be invalid by
    /// omission; a dangling reference in a valid fixture is a composer bug.
    #[error("Object {from} references missing object {to}")]
    DanglingReference {
        /// The object holding the reference
        from: ObjectRef,
        /// The missing target
        to: ObjectRef,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
