//! digikey-kicad-gen: KiCad library generation from Digi-Key search results
//!
//! This library queries the Digi-Key Product Search API for a component family,
//! keeps the cheapest part for every distinct electrical value and writes KiCad
//! footprint files plus a shared symbol library for the survivors.
//!
//! # Pipeline
//!
//! 1. **Fetch**: paginated keyword search with parametric filters, one credential
//!    refresh on expiry ([`digikey`])
//! 2. **Select**: group by normalised value, keep the cheapest record ([`select`], [`units`])
//! 3. **Describe**: parse each record into a typed descriptor ([`component`])
//! 4. **Emit**: render footprints and symbols from embedded templates ([`artifact`])
//!
//! [`generate::run`] drives the whole pipeline.
//!
//! # Modules
//!
//! - [`artifact`] — Templates, file writes, symbol library
//! - [`component`] — Component descriptors
//! - [`config`] — Configuration loading and validation
//! - [`digikey`] — API transport, filters, pagination
//! - [`error`] — Error types
//! - [`generate`] — Run driver
//! - [`select`] — Cheapest-per-value selection
//! - [`units`] — Electrical value normalisation

pub mod artifact;
pub mod component;
pub mod config;
pub mod digikey;
pub mod error;
pub mod generate;
pub mod select;
pub mod units;

/// One product record as returned by the search API.
///
/// Records are read-only once received; descriptors copy out what they need.
pub type RawRecord = serde_json::Value;
