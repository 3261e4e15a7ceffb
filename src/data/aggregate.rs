use std::collections::BTreeMap;

use super::error::DashboardError;
use super::filter::FilteredView;
use super::model::Column;

// ---------------------------------------------------------------------------
// Aggregate requests and results
// ---------------------------------------------------------------------------

/// What to compute over a [`FilteredView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateSpec {
    Count,
    Mean(Column),
    Frequency(Column),
    Histogram { column: Column, bins: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Count(usize),
    /// `None` when the view is empty ("no data").
    Mean(Option<f64>),
    Frequency(FrequencyTable),
    Histogram(Histogram),
}

/// Compute one aggregate over `view`.
///
/// An empty view is never an error: it yields a zero count, a `None` mean, an
/// empty frequency table and a histogram without buckets. Asking for the mean
/// or histogram of a categorical column fails with
/// [`DashboardError::NotNumeric`].
pub fn aggregate(
    view: &FilteredView<'_>,
    spec: AggregateSpec,
) -> Result<Aggregate, DashboardError> {
    Ok(match spec {
        AggregateSpec::Count => Aggregate::Count(count(view)),
        AggregateSpec::Mean(column) => Aggregate::Mean(mean(view, column)?),
        AggregateSpec::Frequency(column) => Aggregate::Frequency(frequency(view, column)),
        AggregateSpec::Histogram { column, bins } => {
            Aggregate::Histogram(histogram(view, column, bins)?)
        }
    })
}

pub fn count(view: &FilteredView<'_>) -> usize {
    view.len()
}

/// Arithmetic mean of the finite values of a numeric column.
///
/// `None` when there are no such values, e.g. for an empty view.
pub fn mean(view: &FilteredView<'_>, column: Column) -> Result<Option<f64>, DashboardError> {
    let values = finite_values(view, column)?;
    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
}

/// Values of a numeric column, without `NaN` and infinities.
///
/// The loader rejects such cells, so this only matters for records built
/// in memory; `mean` and `histogram` then agree on what they skip.
fn finite_values(view: &FilteredView<'_>, column: Column) -> Result<Vec<f64>, DashboardError> {
    ensure_numeric(column)?;
    Ok(view
        .records()
        .filter_map(|r| r.number(column))
        .filter(|v| v.is_finite())
        .collect())
}

fn ensure_numeric(column: Column) -> Result<(), DashboardError> {
    if column.is_numeric() {
        Ok(())
    } else {
        Err(DashboardError::NotNumeric(column))
    }
}

// ---------------------------------------------------------------------------
// Frequency tables
// ---------------------------------------------------------------------------

/// Value counts of one column, most frequent first.
///
/// Equal counts are ordered by ascending value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, count)| *count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Partition `view` by the value of `column` and count each part.
pub fn frequency(view: &FilteredView<'_>, column: Column) -> FrequencyTable {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in view.records() {
        *counts.entry(record.value(column).to_string()).or_insert(0) += 1;
    }
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps the ascending key order among equal counts.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    FrequencyTable { entries }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width buckets over the observed range of a column.
///
/// Each bucket is half-open except the last, which also holds the maximum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Bucket the finite values of a numeric column into `bins` equal-width bins.
///
/// No values → no buckets. A constant column → one bucket `[v, v]`.
/// `bins == 0` is treated as 1.
pub fn histogram(
    view: &FilteredView<'_>,
    column: Column,
    bins: usize,
) -> Result<Histogram, DashboardError> {
    let values = finite_values(view, column)?;

    let Some((min, max)) = bounds(&values) else {
        return Ok(Histogram::default());
    };
    if min == max {
        return Ok(Histogram {
            bins: vec![Bin {
                lower: min,
                upper: max,
                count: values.len(),
            }],
        });
    }

    let n = bins.max(1);
    let width = (max - min) / n as f64;
    let mut counts = vec![0usize; n];
    for v in &values {
        let idx = (((v - min) / width) as usize).min(n - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: min + i as f64 * width,
            upper: if i + 1 == n { max } else { min + (i + 1) as f64 * width },
            count,
        })
        .collect();
    Ok(Histogram { bins })
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
