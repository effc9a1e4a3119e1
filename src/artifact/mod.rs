//! Artifact emission: footprint files and the shared symbol library.

pub mod files;
pub mod symbol_lib;
pub mod templates;

use std::path::Path;

pub use symbol_lib::{preamble, SymbolLibrary};
pub use templates::{TemplateId, Templates};

use crate::units::round_to;

/// Clearance between the drill and the pad edge, in millimetres.
pub const ANNULAR_RING: f64 = 0.6;

/// Settings shared by every artifact of a run.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactContext<'a> {
    /// Directory footprint files are written to.
    pub footprint_dir: &'a Path,
    /// Template renderer.
    pub templates: &'a Templates,
    /// Through-hole pad diameter.
    pub pad_size: f64,
    /// Library nickname used when a symbol references its footprint.
    pub footprint_nickname: &'a str,
}

impl ArtifactContext<'_> {
    /// Drill diameter for the configured pad.
    #[must_use]
    pub fn drill(&self) -> f64 {
        round_to((self.pad_size - ANNULAR_RING).max(0.1), 2)
    }

    /// `"<nickname>:<footprint name without extension>"`.
    #[must_use]
    pub fn footprint_reference(&self, footprint_name: &str) -> String {
        format!(
            "{}:{}",
            self.footprint_nickname,
            footprint_name.trim_end_matches(".kicad_mod")
        )
    }
}

/// What happened when a footprint was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FootprintOutcome {
    /// No geometry; nothing attempted.
    Skipped,
    /// A file with this name already exists and was left untouched.
    Exists(String),
    /// File written.
    Written(String),
    /// Template rendered to nothing; no file written.
    Empty(String),
    /// File could not be written.
    Failed(String),
}

impl FootprintOutcome {
    /// Footprint file name, unless skipped.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Skipped => None,
            Self::Exists(name) | Self::Written(name) | Self::Empty(name) | Self::Failed(name) => {
                Some(name)
            }
        }
    }
}

/// Artifact generation for a descriptor.
pub trait Artifacts {
    /// Writes the footprint file for this part unless it is skipped or already exists.
    fn make_footprint(&self, ctx: &ArtifactContext<'_>) -> FootprintOutcome;

    /// Appends this part's symbol to `library`.
    ///
    /// Returns `true` if a block was written.
    fn make_symbol(&self, library: &mut SymbolLibrary, ctx: &ArtifactContext<'_>) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_helpers() {
        let templates = Templates::empty();
        let ctx = ArtifactContext {
            footprint_dir: Path::new("."),
            templates: &templates,
            pad_size: 1.4,
            footprint_nickname: "DigikeyResistors",
        };
        assert!((ctx.drill() - 0.8).abs() < 1e-9);
        assert_eq!(
            ctx.footprint_reference("R_Axial_L6.3mm_D2.4mm_P7.62mm_Horizontal.kicad_mod"),
            "DigikeyResistors:R_Axial_L6.3mm_D2.4mm_P7.62mm_Horizontal"
        );
    }

    #[test]
    fn outcome_name() {
        assert_eq!(FootprintOutcome::Skipped.name(), None);
        assert_eq!(FootprintOutcome::Exists("a".into()).name(), Some("a"));
    }
}
