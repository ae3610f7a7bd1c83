//! Tooling for preparing rental offer data sets.
//!
//! Two independent pipelines live here: [`pipeline::import_tsv`] streams a TSV
//! file to a console, and [`pipeline::generate_tsv`] synthesizes offers from
//! base offers served by an [`sources::OfferSource`] and writes them as TSV.

pub mod error;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod tsv;

pub use error::{OfferError, Result};
