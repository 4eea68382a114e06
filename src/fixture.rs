//! Fixture assembly pipeline.
//!
//! Ties the composer, serializer, corruption injector, and xref builder
//! into one strict sequential pass per fixture: compose the object graph,
//! check it (unless it is meant to be broken), serialize recording offsets,
//! optionally poison the record, then append the table and trailer.

use crate::conformance::{compose, ConformanceProfile, Omissions};
use crate::corruption::{Corruption, OFFSET_SENTINEL};
use crate::error::{Error, Result};
use crate::serializer::DocumentSerializer;
use crate::xref::{write_xref_section, Trailer, XRefTable};

/// Builds one fixture from a profile and an optional corruption strategy.
///
/// # Example
///
/// ```
/// use pdf_fixtures::{ConformanceProfile, Corruption, FixtureBuilder};
///
/// # fn main() -> pdf_fixtures::Result<()> {
/// let bytes = FixtureBuilder::new(ConformanceProfile::Pdf17)
///     .corruption(Corruption::PoisonOffsets)
///     .build()?;
/// assert!(bytes.ends_with(b"startxref\n999999\n%%EOF\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixtureBuilder {
    profile: ConformanceProfile,
    corruption: Corruption,
}

impl FixtureBuilder {
    /// Create a builder for a valid fixture of the given profile.
    pub fn new(profile: ConformanceProfile) -> Self {
        Self {
            profile,
            corruption: Corruption::None,
        }
    }

    /// Select a corruption strategy.
    pub fn corruption(mut self, corruption: Corruption) -> Self {
        self.corruption = corruption;
        self
    }

    /// Assemble the complete byte buffer for this fixture.
    ///
    /// Configuration and consistency failures abort before any bytes are
    /// returned; deliberate corruption flows through as a successful,
    /// complete buffer that merely fails downstream checks.
    pub fn build(&self) -> Result<Vec<u8>> {
        self.corruption.validate_for(self.profile)?;

        let doc = compose(
            self.profile,
            &self.banner(),
            Omissions {
                output_intent: self.corruption.omits_output_intent(),
            },
        );

        // A dangling reference in a fixture not requested to be invalid by
        // omission is a composer bug; abort rather than write a different
        // corruption than was asked for.
        if !self.corruption.omits_output_intent() {
            doc.verify_references()?;
        }
        let root = doc.root().ok_or(Error::NoRoot)?;

        let mut body = DocumentSerializer::new().serialize(&doc, self.profile.header())?;

        let startxref_override = if self.corruption.poisons_offsets() {
            body.offsets.poison(OFFSET_SENTINEL);
            Some(OFFSET_SENTINEL)
        } else {
            None
        };

        let table = XRefTable::build(&body.offsets, doc.size());
        let trailer = Trailer {
            size: doc.size(),
            root,
        };
        write_xref_section(&mut body.bytes, &table, &trailer, startxref_override)?;

        log::info!(
            "assembled {} fixture ({:?}): {} objects, {} bytes",
            self.profile,
            self.corruption,
            doc.objects().len(),
            body.bytes.len()
        );
        Ok(body.bytes)
    }

    /// Assemble the fixture and write it to a file.
    ///
    /// The whole buffer is built first; nothing partial lands on disk when
    /// assembly fails.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.build()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Text the content stream paints, derived from the profile and
    /// corruption selection so regeneration is deterministic.
    fn banner(&self) -> String {
        match self.corruption {
            Corruption::None => format!("Valid {}", self.profile.label()),
            Corruption::PoisonOffsets => "Invalid Structure".to_string(),
            Corruption::OmitOutputIntent => "Invalid PDF/A".to_string(),
        }
    }
}
