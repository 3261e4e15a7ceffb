use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use csv::StringRecord;

use super::error::DashboardError;
use super::model::{Column, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an emissions dataset from a CSV file.
///
/// The header must contain every source column of the schema (see
/// [`Column::source_name`]); each is renamed to its canonical name before rows
/// are decoded. Extra columns are skipped and reported on the returned
/// [`Dataset`]. Any unreadable file, ragged row, unparsable cell or `NaN`/`inf`
/// measure fails the whole load.
pub fn load_file(path: &Path) -> Result<Dataset, DashboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DashboardError::unavailable(path, e))?;

    let source_headers = reader
        .headers()
        .map_err(|e| DashboardError::unavailable(path, format!("reading header: {e}")))?
        .clone();
    let header =
        rename_headers(&source_headers).map_err(|reason| DashboardError::unavailable(path, reason))?;

    for name in &header.ignored {
        log::warn!("{}: ignoring column '{name}' (not in schema)", path.display());
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let line = row_no + 2;
        let row =
            result.map_err(|e| DashboardError::unavailable(path, format!("line {line}: {e}")))?;
        let record: Record = row
            .deserialize(Some(&header.canonical))
            .map_err(|e| DashboardError::unavailable(path, format!("line {line}: {e}")))?;
        if let Some(col) = record.non_finite_measure() {
            return Err(DashboardError::unavailable(
                path,
                format!("line {line}: '{}' is not a finite number", col.source_name()),
            ));
        }
        records.push(record);
    }

    Ok(Dataset::new(path, records, header.ignored))
}

// ---------------------------------------------------------------------------
// Header renaming
// ---------------------------------------------------------------------------

struct RenamedHeader {
    /// Header row rewritten to canonical names, one entry per source column.
    canonical: StringRecord,
    ignored: Vec<String>,
}

/// Map source headers onto canonical names.
///
/// Unknown headers become blank entries so they can never collide with a
/// canonical field during deserialization.
fn rename_headers(source: &StringRecord) -> Result<RenamedHeader, String> {
    let mut seen = BTreeSet::new();
    let mut canonical = StringRecord::with_capacity(source.as_slice().len(), source.len());
    let mut ignored = Vec::new();

    for header in source.iter() {
        match Column::from_source_name(header) {
            Some(col) => {
                if !seen.insert(col) {
                    return Err(format!("duplicate column '{}'", col.source_name()));
                }
                canonical.push_field(col.name());
            }
            None => {
                ignored.push(header.to_string());
                canonical.push_field("");
            }
        }
    }

    let missing: Vec<&str> = Column::ALL
        .iter()
        .filter(|col| !seen.contains(*col))
        .map(|col| col.source_name())
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing columns: {}", missing.join(", ")));
    }

    Ok(RenamedHeader { canonical, ignored })
}

// ---------------------------------------------------------------------------
// DatasetCache – load each file at most once
// ---------------------------------------------------------------------------

/// Process-lifetime cache of loaded datasets, keyed by the path as given.
///
/// The lock is held while a file is read, so concurrent first loads of the same
/// path read it once and every caller gets the same `Arc`. Failed loads are not
/// cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    loaded: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, reading the file on first use.
    pub fn load(&self, path: &Path) -> Result<Arc<Dataset>, DashboardError> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = loaded.get(path) {
            log::debug!("dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(path)?);
        log::info!("Loaded {} vehicles from {}", dataset.len(), path.display());
        loaded.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }
}
