//! Executive-summary generation.
//!
//! This module produces the natural-language narrative for a report,
//! preferring the external model and falling back to a deterministic
//! template.

pub mod generator;

pub use generator::SummaryGenerator;
