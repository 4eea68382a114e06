//! Corruption strategies for negative fixtures.
//!
//! Each strategy turns an otherwise-valid assembly into a precisely,
//! reproducibly broken file. The two strategies target different classes of
//! downstream failure — structural parsing versus conformance checking —
//! and never combine in one fixture.

use crate::conformance::ConformanceProfile;
use crate::error::{Error, Result};

/// Sentinel offset written by [`Corruption::PoisonOffsets`].
///
/// A round number far beyond any real fixture's length, carried over from
/// the source fixtures rather than computed as one-past-EOF.
pub const OFFSET_SENTINEL: u64 = 999_999;

/// Corruption strategy applied to a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Corruption {
    /// No corruption; the fixture is valid for its profile
    #[default]
    None,
    /// Replace every in-use xref offset and the restated startxref offset
    /// with [`OFFSET_SENTINEL`], leaving the object bytes untouched and
    /// independently parseable
    PoisonOffsets,
    /// Keep the metadata stream's conformance claim but omit the
    /// output-intent object the claimed profile requires
    OmitOutputIntent,
}

impl Corruption {
    /// Whether this strategy rewrites recorded offsets after serialization.
    pub fn poisons_offsets(&self) -> bool {
        matches!(self, Corruption::PoisonOffsets)
    }

    /// Whether this strategy drops a structural object before serialization.
    pub fn omits_output_intent(&self) -> bool {
        matches!(self, Corruption::OmitOutputIntent)
    }

    /// Check that this strategy makes sense for the given profile.
    ///
    /// Omitting an output intent only falsifies a claim that requires one,
    /// so requesting it for the baseline profile fails fast instead of
    /// silently producing a valid file.
    pub fn validate_for(&self, profile: ConformanceProfile) -> Result<()> {
        if self.omits_output_intent() && !profile.requires_output_intent() {
            return Err(Error::Configuration(format!(
                "omit-output-intent requires a profile with an output intent, got {}",
                profile
            )));
        }
        Ok(())
    }
}
