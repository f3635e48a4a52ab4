//! LeadGrid engine: the pure part of the enrichment pipeline.
//!
//! Everything here is synchronous and side-effect free apart from the
//! subscriber callbacks registered on [`state::EnrichmentState`]. HTTP,
//! credentials and files live in the CLI and config crates.

pub mod events;
pub mod header;
pub mod merge;
pub mod preview;
pub mod recipients;
pub mod render;
pub mod rows;
pub mod state;

pub use header::{column_index, ensure_column, find_column_containing};
pub use merge::{apply_results, apply_values, MergeStrategy};
pub use rows::{parse, CsvInput, RowSequence};
pub use state::{EnrichmentState, NoCsvLoaded};
