//! Working-table state owned by the front end.
//!
//! One `EnrichmentState` replaces the loose `csvRows` / `enrichedCsvData`
//! pair: it keeps the table as loaded, the working (enriched) table, the
//! merge strategy, and the subscribers that want to hear about changes.

use crate::events::{EventBus, TableEvent, UpdateOrigin};
use crate::merge::{apply_values, MergeStrategy};
use crate::rows::{parse, CsvInput, RowSequence};

/// An enrichment action ran before any CSV was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCsvLoaded;

impl std::fmt::Display for NoCsvLoaded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "load a CSV first")
    }
}

impl std::error::Error for NoCsvLoaded {}

#[derive(Debug, Default)]
pub struct EnrichmentState {
    original: RowSequence,
    working: RowSequence,
    strategy: MergeStrategy,
    events: EventBus,
}

impl EnrichmentState {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&TableEvent) + 'static) {
        self.events.subscribe(callback);
    }

    /// Parse and install a new table. Returns false (and changes nothing,
    /// publishes nothing) when the input has no non-blank rows.
    pub fn load<'a>(&mut self, input: impl Into<CsvInput<'a>>) -> bool {
        let rows = parse(input);
        if rows.is_empty() {
            log::debug!("ignoring empty CSV input");
            return false;
        }
        log::debug!("loaded {} rows", rows.len());
        self.original = rows.clone();
        self.working = rows;
        self.publish(UpdateOrigin::Loaded);
        true
    }

    pub fn is_loaded(&self) -> bool {
        !self.original.is_empty()
    }

    /// The table as loaded, before any merge.
    pub fn original(&self) -> &RowSequence {
        &self.original
    }

    /// The current (possibly enriched) table.
    pub fn working(&self) -> &RowSequence {
        &self.working
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Gate for enrichment actions.
    pub fn require_loaded(&self) -> Result<&RowSequence, NoCsvLoaded> {
        if self.is_loaded() {
            Ok(&self.working)
        } else {
            Err(NoCsvLoaded)
        }
    }

    /// Merge `values` (data-row order) under `column` and replace the working
    /// table with the result.
    pub fn apply(&mut self, column: &str, values: &[Option<String>]) -> Result<&RowSequence, NoCsvLoaded> {
        let merged = apply_values(self.require_loaded()?, column, self.strategy, values);
        self.working = merged;
        self.publish(UpdateOrigin::Merged {
            column: column.to_string(),
        });
        Ok(&self.working)
    }

    fn publish(&mut self, origin: UpdateOrigin) {
        let event = TableEvent::RowsUpdated {
            rows: self.working.clone(),
            origin,
        };
        self.events.publish(&event);
    }
}
