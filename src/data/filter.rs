use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, Dataset, FilterColumn, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which labels are allowed per filter column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps each [`FilterColumn`] → allowed labels.
///
/// Always covers all three filter columns. An empty allowed set means nothing
/// is selected for that column, so nothing passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    allowed: BTreeMap<FilterColumn, BTreeSet<String>>,
}

impl FilterSelection {
    /// Every label of every filter column selected (show everything).
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            allowed: FilterColumn::ALL
                .into_iter()
                .map(|col| (col, dataset.unique_values(col).clone()))
                .collect(),
        }
    }

    /// Nothing selected in any column.
    pub fn none() -> Self {
        FilterSelection {
            allowed: FilterColumn::ALL
                .into_iter()
                .map(|col| (col, BTreeSet::new()))
                .collect(),
        }
    }

    pub fn allowed(&self, column: FilterColumn) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.allowed.get(&column).unwrap_or(&EMPTY)
    }

    /// Replace the allowed labels of one column.
    pub fn set(&mut self, column: FilterColumn, values: BTreeSet<String>) {
        self.allowed.insert(column, values);
    }

    /// Toggle a single label in a column's selection.
    pub fn toggle(&mut self, column: FilterColumn, value: &str) {
        let selected = self.allowed.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select all labels the dataset has for `column`.
    pub fn select_all(&mut self, dataset: &Dataset, column: FilterColumn) {
        self.set(column, dataset.unique_values(column).clone());
    }

    /// Deselect every label of `column`.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.set(column, BTreeSet::new());
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the records passing a selection
// ---------------------------------------------------------------------------

/// Ordered subset of a [`Dataset`], held as ascending row indices.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Row indices into the dataset, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Apply `selection` on top of this view.
    pub fn refine(&self, selection: &FilterSelection) -> FilteredView<'a> {
        let active = active_columns(self.dataset, selection);
        let records = self.dataset.records();
        FilteredView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| passes(&records[i], &active))
                .collect(),
        }
    }
}

/// Return the records of `dataset` that pass `selection`, in dataset order.
pub fn apply_filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView::all(dataset).refine(selection)
}

/// Columns whose selection actually constrains `dataset`.
///
/// A column whose allowed set covers every label in the dataset cannot reject
/// a record, so it is skipped.
fn active_columns<'s>(
    dataset: &Dataset,
    selection: &'s FilterSelection,
) -> Vec<(FilterColumn, &'s BTreeSet<String>)> {
    FilterColumn::ALL
        .into_iter()
        .map(|col| (col, selection.allowed(col)))
        .filter(|(col, allowed)| !dataset.unique_values(*col).is_subset(allowed))
        .collect()
}

fn passes(record: &Record, active: &[(FilterColumn, &BTreeSet<String>)]) -> bool {
    active
        .iter()
        .all(|(col, allowed)| allowed.contains(record.category(*col)))
}

/// Every distinct value of `column`, sorted ascending.
///
/// Numeric columns are listed by their display form.
pub fn distinct_values(dataset: &Dataset, column: Column) -> BTreeSet<String> {
    dataset
        .records()
        .iter()
        .map(|r| r.value(column).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MAKES: [&str; 3] = ["ACURA", "BMW", "FORD"];
    const CLASSES: [&str; 3] = ["COMPACT", "SUV - SMALL", "PICKUP TRUCK - STANDARD"];
    const FUELS: [&str; 3] = ["D", "X", "Z"];

    fn small_dataset() -> Dataset {
        Dataset::new(
            "mem.csv",
            vec![
                Record::sample("ACURA", "COMPACT", "Z", 196.0),
                Record::sample("FORD", "SUV - SMALL", "X", 250.0),
                Record::sample("BMW", "COMPACT", "Z", 210.0),
                Record::sample("FORD", "PICKUP TRUCK - STANDARD", "D", 290.0),
                Record::sample("ACURA", "SUV - SMALL", "X", 230.0),
            ],
            Vec::new(),
        )
    }

    fn labels(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn default_selection_passes_everything() {
        let ds = small_dataset();
        let view = apply_filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn columns_combine_with_and() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::Make, labels(&["ACURA", "FORD"]));
        sel.set(FilterColumn::FuelType, labels(&["X"]));
        let view = apply_filter(&ds, &sel);
        assert_eq!(view.indices(), &[1, 4]);
        assert!(view.records().all(|r| r.tipo_combustivel == "X"));
    }

    #[test]
    fn cleared_column_empties_the_view() {
        let ds = small_dataset();
        for col in FilterColumn::ALL {
            let mut sel = FilterSelection::all(&ds);
            sel.select_none(col);
            assert!(apply_filter(&ds, &sel).is_empty(), "{col:?}");
        }
        assert!(apply_filter(&ds, &FilterSelection::none()).is_empty());
    }

    #[test]
    fn labels_absent_from_the_dataset_match_nothing() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::VehicleClass, labels(&["MINIVAN"]));
        assert!(apply_filter(&ds, &sel).is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle(FilterColumn::Make, "FORD");
        assert!(!sel.allowed(FilterColumn::Make).contains("FORD"));
        assert_eq!(apply_filter(&ds, &sel).indices(), &[0, 2, 4]);

        sel.toggle(FilterColumn::Make, "FORD");
        assert_eq!(sel, FilterSelection::all(&ds));
    }

    #[test]
    fn select_all_restores_a_cleared_column() {
        let ds = small_dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.select_none(FilterColumn::FuelType);
        sel.select_all(&ds, FilterColumn::FuelType);
        assert_eq!(apply_filter(&ds, &sel).len(), ds.len());
    }

    #[test]
    fn distinct_values_are_sorted_for_any_column() {
        let ds = small_dataset();
        let fuels: Vec<_> = distinct_values(&ds, Column::FuelType).into_iter().collect();
        assert_eq!(fuels, vec!["D", "X", "Z"]);
        let co2: Vec<_> = distinct_values(&ds, Column::Co2Emissions).into_iter().collect();
        assert_eq!(co2, vec!["196", "210", "230", "250", "290"]);
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        (0..3usize, 0..3usize, 0..3usize, 100.0..400.0f64)
            .prop_map(|(m, c, f, co2)| Record::sample(MAKES[m], CLASSES[c], FUELS[f], co2))
    }

    fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
        (
            proptest::sample::subsequence(MAKES.to_vec(), 0..=3),
            proptest::sample::subsequence(CLASSES.to_vec(), 0..=3),
            proptest::sample::subsequence(FUELS.to_vec(), 0..=3),
        )
            .prop_map(|(makes, classes, fuels)| {
                let mut sel = FilterSelection::none();
                sel.set(FilterColumn::Make, labels(&makes));
                sel.set(FilterColumn::VehicleClass, labels(&classes));
                sel.set(FilterColumn::FuelType, labels(&fuels));
                sel
            })
    }

    fn intersect(a: &FilterSelection, b: &FilterSelection) -> FilterSelection {
        let mut out = FilterSelection::none();
        for col in FilterColumn::ALL {
            out.set(col, a.allowed(col).intersection(b.allowed(col)).cloned().collect());
        }
        out
    }

    proptest! {
        #[test]
        fn filtering_twice_equals_filtering_once(
            records in proptest::collection::vec(record_strategy(), 0..40),
            sel in selection_strategy(),
        ) {
            let ds = Dataset::new("mem.csv", records, Vec::new());
            let once = apply_filter(&ds, &sel);
            let twice = once.refine(&sel);
            prop_assert_eq!(once.indices(), twice.indices());
        }

        #[test]
        fn narrower_selection_never_grows_the_view(
            records in proptest::collection::vec(record_strategy(), 0..40),
            wide in selection_strategy(),
            other in selection_strategy(),
        ) {
            let ds = Dataset::new("mem.csv", records, Vec::new());
            let narrow = intersect(&wide, &other);
            let wide_view: BTreeSet<usize> = apply_filter(&ds, &wide).indices().iter().copied().collect();
            let narrow_view = apply_filter(&ds, &narrow);
            prop_assert!(narrow_view.indices().iter().all(|i| wide_view.contains(i)));
        }

        #[test]
        fn view_matches_the_record_predicate(
            records in proptest::collection::vec(record_strategy(), 0..40),
            sel in selection_strategy(),
        ) {
            let ds = Dataset::new("mem.csv", records, Vec::new());
            let expected: Vec<usize> = ds
                .records()
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    FilterColumn::ALL
                        .into_iter()
                        .all(|col| sel.allowed(col).contains(r.category(col)))
                })
                .map(|(i, _)| i)
                .collect();
            let view = apply_filter(&ds, &sel);
            prop_assert_eq!(view.indices(), expected.as_slice());
        }
    }
}
