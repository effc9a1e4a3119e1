//! Embedded artifact templates.
//!
//! Templates are Jinja files compiled into the binary and rendered with minijinja.
//! Rendering never fails from the caller's point of view: errors are logged and an
//! empty string is returned, which callers treat as "nothing to write".

use minijinja::Environment;
use serde::Serialize;
use tracing::error;

const AXIAL_RESISTOR_FOOTPRINT: &str =
    include_str!("../../templates/footprints/th_resistor_axial.kicad_mod.jinja");
const RADIAL_CAPACITOR_FOOTPRINT: &str =
    include_str!("../../templates/footprints/cp_radial.kicad_mod.jinja");
const RESISTOR_SYMBOL: &str = include_str!("../../templates/symbols/resistor.kicad_sym.jinja");
const POLARIZED_CAPACITOR_SYMBOL: &str =
    include_str!("../../templates/symbols/capacitor_polarized.kicad_sym.jinja");

/// Identifies one embedded template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// Horizontal axial resistor footprint.
    AxialResistorFootprint,
    /// Radial electrolytic capacitor footprint.
    RadialCapacitorFootprint,
    /// Resistor symbol block.
    ResistorSymbol,
    /// Polarised capacitor symbol block.
    PolarizedCapacitorSymbol,
}

impl TemplateId {
    /// Every template, in registration order.
    pub const ALL: [Self; 4] = [
        Self::AxialResistorFootprint,
        Self::RadialCapacitorFootprint,
        Self::ResistorSymbol,
        Self::PolarizedCapacitorSymbol,
    ];

    /// Template name inside the environment.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AxialResistorFootprint => "footprints/th_resistor_axial.kicad_mod",
            Self::RadialCapacitorFootprint => "footprints/cp_radial.kicad_mod",
            Self::ResistorSymbol => "symbols/resistor.kicad_sym",
            Self::PolarizedCapacitorSymbol => "symbols/capacitor_polarized.kicad_sym",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::AxialResistorFootprint => AXIAL_RESISTOR_FOOTPRINT,
            Self::RadialCapacitorFootprint => RADIAL_CAPACITOR_FOOTPRINT,
            Self::ResistorSymbol => RESISTOR_SYMBOL,
            Self::PolarizedCapacitorSymbol => POLARIZED_CAPACITOR_SYMBOL,
        }
    }
}

/// Template renderer.
pub struct Templates {
    env: Environment<'static>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    /// Loads every embedded template.
    ///
    /// A template that fails to compile is logged and left out; rendering it later
    /// returns an empty string.
    #[must_use]
    pub fn new() -> Self {
        let mut templates = Self::empty();
        for id in TemplateId::ALL {
            if let Err(e) = templates.add(id, id.source()) {
                error!(template = id.name(), error = %e, "Failed to load template");
            }
        }
        templates
    }

    /// Creates a renderer with no templates.
    #[must_use]
    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Registers (or replaces) the source for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not compile.
    pub fn add(&mut self, id: TemplateId, source: &'static str) -> Result<(), minijinja::Error> {
        self.env.add_template(id.name(), source)
    }

    /// Renders `id` with `context`, returning an empty string on failure.
    pub fn render<S: Serialize>(&self, id: TemplateId, context: &S) -> String {
        let result = self
            .env
            .get_template(id.name())
            .and_then(|template| template.render(context));

        match result {
            Ok(text) => text,
            Err(e) => {
                error!(template = id.name(), error = %e, "Error rendering template");
                String::new()
            }
        }
    }
}

/// Escapes text for a quoted KiCad s-expression string.
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
