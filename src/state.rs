use std::path::Path;
use std::sync::Arc;

use co2_explorer::data::aggregate::{
    Aggregate, AggregateSpec, FrequencyTable, Histogram, aggregate,
};
use co2_explorer::data::filter::{self, FilterSelection, apply_filter};
use co2_explorer::data::loader::DatasetCache;
use co2_explorer::data::model::{Column, Dataset, FilterColumn};
use co2_explorer::settings::Settings;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Derived figures for the current selection
// ---------------------------------------------------------------------------

/// Headline numbers for the metrics row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub vehicles: usize,
    pub mean_co2: Option<f64>,
    pub mean_combined: Option<f64>,
}

/// Everything the central panel draws, recomputed on each interaction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub summary: Summary,
    pub histogram: Histogram,
    pub pie: FrequencyTable,
}

impl Snapshot {
    /// Store the result of `spec` in its slot.
    fn record(&mut self, spec: AggregateSpec, figure: Aggregate) {
        match (spec, figure) {
            (_, Aggregate::Count(n)) => self.summary.vehicles = n,
            (AggregateSpec::Mean(Column::Co2Emissions), Aggregate::Mean(m)) => {
                self.summary.mean_co2 = m
            }
            (_, Aggregate::Mean(m)) => self.summary.mean_combined = m,
            (_, Aggregate::Histogram(h)) => self.histogram = h,
            (_, Aggregate::Frequency(t)) => self.pie = t,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Datasets read so far, one per path.
    pub cache: DatasetCache,

    pub settings: Settings,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Numeric column shown in the histogram.
    pub histogram_column: Column,

    /// Categorical column shown in the pie chart.
    pub pie_column: Column,

    /// Slice colours for `pie_column`.
    pub pie_colors: Option<ColorMap>,

    /// Figures for the current selection.
    pub snapshot: Snapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            cache: DatasetCache::new(),
            histogram_column: settings.histogram_column,
            pie_column: settings.pie_column,
            settings,
            dataset: None,
            selection: FilterSelection::none(),
            pie_colors: None,
            snapshot: Snapshot::default(),
            status_message: None,
        }
    }

    /// Load `path` through the cache and make it the active dataset.
    pub fn open(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, select everything and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        if !dataset.ignored_columns().is_empty() {
            self.status_message = Some(format!(
                "Ignored columns: {}",
                dataset.ignored_columns().join(", ")
            ));
        } else {
            self.status_message = None;
        }
        self.dataset = Some(dataset);
        self.rebuild_pie_colors();
        self.refilter();
    }

    fn rebuild_pie_colors(&mut self) {
        self.pie_colors = self
            .dataset
            .as_deref()
            .map(|ds| ColorMap::new(&filter::distinct_values(ds, self.pie_column)));
    }

    /// Recompute the filtered view and every figure derived from it.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.as_deref() else {
            self.snapshot = Snapshot::default();
            return;
        };
        let view = apply_filter(ds, &self.selection);
        log::debug!("{} of {} vehicles match the selection", view.len(), ds.len());

        let specs = [
            AggregateSpec::Count,
            AggregateSpec::Mean(Column::Co2Emissions),
            AggregateSpec::Mean(Column::FuelCombined),
            AggregateSpec::Histogram {
                column: self.histogram_column,
                bins: self.settings.histogram_bins,
            },
            AggregateSpec::Frequency(self.pie_column),
        ];
        let mut snapshot = Snapshot::default();
        for spec in specs {
            match aggregate(&view, spec) {
                Ok(figure) => snapshot.record(spec, figure),
                Err(e) => log::warn!("{e}"),
            }
        }
        self.snapshot = snapshot;
    }

    pub fn set_histogram_column(&mut self, column: Column) {
        self.histogram_column = column;
        self.refilter();
    }

    pub fn set_pie_column(&mut self, column: Column) {
        self.pie_column = column;
        self.rebuild_pie_colors();
        self.refilter();
    }

    /// Toggle a single label in a column's filter.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &str) {
        self.selection.toggle(column, value);
        self.refilter();
    }

    /// Select all labels in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(ds, column);
            self.refilter();
        }
    }

    /// Deselect all labels in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selection.select_none(column);
        self.refilter();
    }
}
