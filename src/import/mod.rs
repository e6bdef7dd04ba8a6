//! One-shot loader for the JSON recipe dump.

pub mod normalize;
pub mod services;

pub use normalize::{normalize_batch, normalize_nutrients, NewRecipe, NormalizedBatch, RecordError};
pub use services::{load_batch, parse_document, run_import, ImportError, ImportReport};
