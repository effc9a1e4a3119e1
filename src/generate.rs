//! End-to-end generation run.
//!
//! A run fetches every matching product, keeps the cheapest part per value and emits
//! one footprint file per distinct geometry plus one symbol per kept part. A single
//! part that cannot be rendered or written is logged and skipped. A symbol library that
//! cannot be started only disables symbol output. Transport failures and an unusable
//! output directory abort the run.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::artifact::{preamble, ArtifactContext, Artifacts, FootprintOutcome, SymbolLibrary, Templates};
use crate::component::{ComponentKind, Descriptor, Radial, Resistor};
use crate::config::Config;
use crate::digikey::{fetch_all, SearchFilter, Transport};
use crate::error::GenerateError;
use crate::select::{capacitance_of, resistance_of, select_cheapest_with_precision};
use crate::RawRecord;

/// Generator name written to the symbol library header.
pub const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Everything a run needs besides the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Component family to generate.
    pub kind: ComponentKind,
    /// Power rating (resistors) or voltage rating (capacitors) used to filter the search.
    pub rating: String,
    /// Records per search page.
    pub page_size: u32,
    /// Directory footprint files are written to.
    pub footprint_dir: PathBuf,
    /// Symbol library file.
    pub symbol_library: PathBuf,
    /// Through-hole pad diameter in mm.
    pub pad_size: f64,
    /// Footprint library nickname referenced by the symbols.
    pub footprint_nickname: String,
    /// Decimal places used to group equal values.
    pub group_decimals: u32,
}

impl Job {
    /// Builds a job for `kind` from configuration defaults.
    #[must_use]
    pub fn from_config(kind: ComponentKind, config: &Config) -> Self {
        let (rating, footprint_nickname) = match kind {
            ComponentKind::CapacitorRadial => (
                config.fetch.voltage.clone(),
                config.output.capacitor_nickname.clone(),
            ),
            ComponentKind::Resistor | ComponentKind::Diode => (
                config.fetch.power.clone(),
                config.output.resistor_nickname.clone(),
            ),
        };

        Self {
            kind,
            rating,
            page_size: config.fetch.page_size,
            footprint_dir: config.output.footprint_dir.clone(),
            symbol_library: config.output.symbol_library.clone(),
            pad_size: config.footprint.pad_size,
            footprint_nickname,
            group_decimals: config.selection.group_decimals,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records returned by the search.
    pub fetched: usize,
    /// Records kept after cheapest-per-value selection.
    pub selected: usize,
    /// Footprint files written.
    pub footprints_written: usize,
    /// Footprints left alone because the file already existed.
    pub footprints_existing: usize,
    /// Parts without usable geometry.
    pub footprints_skipped: usize,
    /// Footprints that rendered empty or could not be written.
    pub footprints_failed: usize,
    /// Symbols appended to the library.
    pub symbols_written: usize,
    /// The symbol library could not be started or closed.
    pub library_failed: bool,
}

impl RunSummary {
    fn record_footprint(&mut self, outcome: &FootprintOutcome) {
        match outcome {
            FootprintOutcome::Written(_) => self.footprints_written += 1,
            FootprintOutcome::Exists(_) => self.footprints_existing += 1,
            FootprintOutcome::Skipped => self.footprints_skipped += 1,
            FootprintOutcome::Empty(_) | FootprintOutcome::Failed(_) => {
                self.footprints_failed += 1;
            }
        }
    }
}

/// Runs `job` against `transport`.
///
/// # Errors
///
/// Returns an error if the kind is not supported, the footprint directory cannot be
/// created, or the search fails.
pub fn run<T: Transport + ?Sized>(
    transport: &T,
    job: &Job,
    templates: &Templates,
) -> Result<RunSummary, GenerateError> {
    match job.kind {
        ComponentKind::Resistor => run_for::<Resistor, T>(
            transport,
            job,
            templates,
            &SearchFilter::through_hole_resistors(&job.rating),
            resistance_of,
        ),
        ComponentKind::CapacitorRadial => run_for::<Radial, T>(
            transport,
            job,
            templates,
            &SearchFilter::radial_electrolytic_capacitors(&job.rating),
            capacitance_of,
        ),
        ComponentKind::Diode => Err(GenerateError::Unsupported { kind: job.kind }),
    }
}

fn run_for<D, T>(
    transport: &T,
    job: &Job,
    templates: &Templates,
    filter: &SearchFilter,
    value_of: fn(&RawRecord) -> f64,
) -> Result<RunSummary, GenerateError>
where
    D: Descriptor + Artifacts,
    T: Transport + ?Sized,
{
    std::fs::create_dir_all(&job.footprint_dir).map_err(|e| GenerateError::OutputDir {
        path: job.footprint_dir.clone(),
        source: e,
    })?;

    let records = fetch_all(transport, filter, job.page_size)?;
    let fetched = records.len();
    let selected = select_cheapest_with_precision(records, value_of, job.group_decimals);

    info!(
        kind = %job.kind,
        fetched,
        selected = selected.len(),
        "Reduced to cheapest part per value"
    );

    let mut summary = RunSummary {
        fetched,
        selected: selected.len(),
        ..RunSummary::default()
    };

    if selected.is_empty() {
        warn!(kind = %job.kind, "No products found, nothing to generate");
        return Ok(summary);
    }

    let ctx = ArtifactContext {
        footprint_dir: &job.footprint_dir,
        templates,
        pad_size: job.pad_size,
        footprint_nickname: &job.footprint_nickname,
    };

    let mut library = SymbolLibrary::begin(&job.symbol_library, &preamble(GENERATOR));
    if library.is_none() {
        warn!(
            path = %job.symbol_library.display(),
            "Symbol library unavailable, generating footprints only"
        );
        summary.library_failed = true;
    }

    for record in &selected {
        let descriptor = D::parse(record);
        let component = descriptor.component();
        let outcome = descriptor.make_footprint(&ctx);
        debug!(
            part = component.distributor_part(),
            priced = component.has_price(),
            footprint = outcome.name().unwrap_or("-"),
            outcome = ?outcome,
            "Footprint"
        );
        summary.record_footprint(&outcome);

        if let Some(library) = library.as_mut() {
            if descriptor.make_symbol(library, &ctx) {
                summary.symbols_written += 1;
            }
        }
    }

    if let Some(library) = library {
        let path = library.path().to_path_buf();
        let symbols = library.entries();
        if library.finish().is_none() {
            warn!(path = %path.display(), symbols, "Symbol library left unterminated");
            summary.library_failed = true;
        }
    }

    info!(
        footprints = summary.footprints_written,
        existing = summary.footprints_existing,
        symbols = summary.symbols_written,
        "Generation complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digikey::{Credential, FetchResult, SearchResponse};
    use serde_json::Value;
    use tempfile::tempdir;

    struct NoProducts;

    impl Transport for NoProducts {
        fn get_credential(&self) -> FetchResult<Credential> {
            Ok(Credential::new("t"))
        }

        fn search(&self, _payload: &Value, _credential: &Credential) -> FetchResult<SearchResponse> {
            Ok(SearchResponse::new(200, r#"{"Products": [], "ProductsCount": 0}"#))
        }
    }

    fn job(kind: ComponentKind, root: &std::path::Path) -> Job {
        Job {
            footprint_dir: root.join("fp"),
            symbol_library: root.join("lib.kicad_sym"),
            ..Job::from_config(kind, &Config::default())
        }
    }

    #[test]
    fn job_from_config_picks_rating_and_nickname() {
        let config = Config::default();
        let resistor = Job::from_config(ComponentKind::Resistor, &config);
        assert_eq!(resistor.rating, "0.25W");
        assert_eq!(resistor.footprint_nickname, "DigikeyResistors");

        let capacitor = Job::from_config(ComponentKind::CapacitorRadial, &config);
        assert_eq!(capacitor.rating, "6.3v");
        assert_eq!(capacitor.footprint_nickname, "DigikeyCapacitors");
        assert_eq!(capacitor.page_size, 50);
    }

    #[test]
    fn diode_is_unsupported() {
        let dir = tempdir().unwrap();
        let result = run(
            &NoProducts,
            &job(ComponentKind::Diode, dir.path()),
            &Templates::new(),
        );
        assert!(matches!(result, Err(GenerateError::Unsupported { .. })));
    }

    #[test]
    fn no_products_writes_no_library() {
        let dir = tempdir().unwrap();
        let job = job(ComponentKind::Resistor, dir.path());
        let summary = run(&NoProducts, &job, &Templates::new()).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(job.footprint_dir.is_dir());
        assert!(!job.symbol_library.exists());
    }

    #[test]
    fn summary_counts_footprint_outcomes() {
        let mut summary = RunSummary::default();
        for outcome in [
            FootprintOutcome::Written("a".into()),
            FootprintOutcome::Exists("a".into()),
            FootprintOutcome::Skipped,
            FootprintOutcome::Empty("b".into()),
            FootprintOutcome::Failed("c".into()),
        ] {
            summary.record_footprint(&outcome);
        }
        assert_eq!(summary.footprints_written, 1);
        assert_eq!(summary.footprints_existing, 1);
        assert_eq!(summary.footprints_skipped, 1);
        assert_eq!(summary.footprints_failed, 2);
        assert!(!summary.library_failed);
    }
}
