//! # PDF Fixtures
//!
//! Builds small, byte-exact PDF files for exercising downstream parsers and
//! conformance validators. Fixtures come in two flavors:
//!
//! - **Valid**: minimal documents at several conformance profiles
//!   (plain PDF 1.7, PDF/A-1b, PDF/A-2u) with an internally consistent
//!   cross-reference table.
//! - **Invalid by construction**: the same documents with precise,
//!   reproducible corruption — either every xref offset poisoned with a
//!   sentinel, or a PDF/A claim whose required output intent is missing.
//!
//! ## Architecture
//!
//! ```text
//! ConformanceProfile × Corruption
//!     ↓
//! [Composer] (conformance.rs — builds the object graph)
//!     ↓
//! [DocumentSerializer] (serializer.rs — emits bytes, records offsets)
//!     ↓
//! [XRefTable] (xref.rs — fixed-width table + trailer from recorded offsets)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pdf_fixtures::{ConformanceProfile, Corruption, FixtureBuilder};
//!
//! # fn main() -> pdf_fixtures::Result<()> {
//! // A minimal valid PDF 1.7 document.
//! let bytes = FixtureBuilder::new(ConformanceProfile::Pdf17).build()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//!
//! // A PDF/A-1b document that claims conformance but omits its output intent.
//! let bytes = FixtureBuilder::new(ConformanceProfile::PdfA1b)
//!     .corruption(Corruption::OmitOutputIntent)
//!     .build()?;
//! assert!(!bytes.windows(13).any(|w| w == b"/OutputIntent"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model
pub mod document;
pub mod object;

// Assembly pipeline
pub mod conformance;
pub mod corruption;
pub mod fixture;
pub mod serializer;
pub mod xref;

pub use conformance::ConformanceProfile;
pub use corruption::Corruption;
pub use document::Document;
pub use error::{Error, Result};
pub use fixture::FixtureBuilder;
pub use object::{Object, ObjectRef};
