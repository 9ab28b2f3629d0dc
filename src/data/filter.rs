use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoricalColumn, DeliveryTable, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per categorical column
// ---------------------------------------------------------------------------

/// Accepted values for one categorical column.
///
/// Every column supports `All`, so callers never have to enumerate the
/// full category list to lift a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Only these values pass. An empty set passes nothing.
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// Per-column selections, ANDed together. Absent columns are unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    selections: BTreeMap<CategoricalColumn, Selection>,
}

impl FilterSpec {
    /// A spec that accepts every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, column: CategoricalColumn, selection: Selection) -> Self {
        self.set(column, selection);
        self
    }

    pub fn set(&mut self, column: CategoricalColumn, selection: Selection) {
        if selection.is_all() {
            self.selections.remove(&column);
        } else {
            self.selections.insert(column, selection);
        }
    }

    pub fn selection(&self, column: CategoricalColumn) -> &Selection {
        const ALL: &Selection = &Selection::All;
        self.selections.get(&column).unwrap_or(ALL)
    }

    /// Flip one value of `column`. Starting from `All`, the universe of
    /// values comes from `table` so unticking one value keeps the others.
    pub fn toggle(&mut self, table: &DeliveryTable, column: CategoricalColumn, value: &str) {
        let mut selected: BTreeSet<String> = match self.selection(column) {
            Selection::All => table.unique_values(column).map(str::to_string).collect(),
            Selection::Only(values) => values.clone(),
        };
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }

        let everything = selected.len() == table.unique_count(column)
            && table.unique_values(column).all(|v| selected.contains(v));
        if everything {
            self.set(column, Selection::All);
        } else {
            self.set(column, Selection::Only(selected));
        }
    }

    /// Whether `record` passes every constrained column.
    pub fn matches(&self, record: &Record) -> bool {
        self.selections
            .iter()
            .all(|(col, selection)| selection.accepts(record.categorical(*col)))
    }

    /// Constrained columns only.
    pub fn constraints(&self) -> impl Iterator<Item = (CategoricalColumn, &Selection)> {
        self.selections.iter().map(|(col, sel)| (*col, sel))
    }
}

/// Indices of rows that pass `spec`, ascending.
pub fn matching_indices(table: &DeliveryTable, spec: &FilterSpec) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(i, _)| i)
        .collect()
}

/// Subset of `table` passing `spec`, in original order.
pub fn apply(table: &DeliveryTable, spec: &FilterSpec) -> DeliveryTable {
    let records = matching_indices(table, spec)
        .into_iter()
        .filter_map(|i| table.get(i).cloned())
        .collect();
    DeliveryTable::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::delivery;
    use proptest::prelude::*;

    fn example_table() -> DeliveryTable {
        DeliveryTable::from_records(vec![
            delivery("Urban", "motorcycle", 30.0),
            delivery("Urban", "scooter", 45.0),
            delivery("Rural", "motorcycle", 60.0),
        ])
    }

    #[test]
    fn area_only_urban_with_all_vehicles() {
        let spec = FilterSpec::new()
            .with(CategoricalColumn::Area, Selection::only(["Urban"]))
            .with(CategoricalColumn::Vehicle, Selection::All);

        let out = apply(&example_table(), &spec);
        let times: Vec<f64> = out.records().iter().map(|r| r.delivery_time).collect();
        assert_eq!(times, vec![30.0, 45.0]);
    }

    #[test]
    fn constraints_are_anded() {
        let spec = FilterSpec::new()
            .with(CategoricalColumn::Area, Selection::only(["Urban"]))
            .with(CategoricalColumn::Vehicle, Selection::only(["motorcycle"]));

        assert_eq!(matching_indices(&example_table(), &spec), vec![0]);
    }

    #[test]
    fn empty_selection_yields_no_rows() {
        let spec = FilterSpec::new().with(CategoricalColumn::Vehicle, Selection::none());
        let out = apply(&example_table(), &spec);
        assert!(out.is_empty());
        assert_eq!(out.unique_count(CategoricalColumn::Area), 0);
    }

    #[test]
    fn default_spec_keeps_everything() {
        let table = example_table();
        assert_eq!(apply(&table, &FilterSpec::new()), table);
    }

    #[test]
    fn unknown_values_simply_match_nothing() {
        let spec = FilterSpec::new().with(CategoricalColumn::Area, Selection::only(["Lunar"]));
        assert!(matching_indices(&example_table(), &spec).is_empty());
    }

    #[test]
    fn setting_all_removes_the_constraint() {
        let mut spec = FilterSpec::new().with(CategoricalColumn::Area, Selection::only(["Urban"]));
        assert_eq!(spec.constraints().count(), 1);
        spec.set(CategoricalColumn::Area, Selection::All);
        assert_eq!(spec.constraints().count(), 0);
        assert!(spec.selection(CategoricalColumn::Area).is_all());
    }

    #[test]
    fn toggle_from_all_then_back() {
        let table = example_table();
        let mut spec = FilterSpec::new();

        spec.toggle(&table, CategoricalColumn::Vehicle, "scooter");
        assert_eq!(
            spec.selection(CategoricalColumn::Vehicle),
            &Selection::only(["motorcycle"])
        );
        assert_eq!(matching_indices(&table, &spec), vec![0, 2]);

        spec.toggle(&table, CategoricalColumn::Vehicle, "scooter");
        assert!(spec.selection(CategoricalColumn::Vehicle).is_all());
    }

    const AREAS: [&str; 3] = ["Urban", "Rural", "Semi-Urban"];
    const VEHICLES: [&str; 3] = ["motorcycle", "scooter", "van"];

    fn arb_table() -> impl Strategy<Value = DeliveryTable> {
        prop::collection::vec((0usize..3, 0usize..3, 1.0f64..200.0), 0..30).prop_map(|rows| {
            DeliveryTable::from_records(
                rows.into_iter()
                    .map(|(a, v, t)| delivery(AREAS[a], VEHICLES[v], t))
                    .collect(),
            )
        })
    }

    fn arb_selection(universe: &'static [&'static str]) -> impl Strategy<Value = Selection> {
        prop_oneof![
            Just(Selection::All),
            prop::sample::subsequence(universe, 0..=universe.len())
                .prop_map(|vals| Selection::only(vals)),
        ]
    }

    fn arb_spec() -> impl Strategy<Value = FilterSpec> {
        (arb_selection(&AREAS), arb_selection(&VEHICLES)).prop_map(|(area, vehicle)| {
            FilterSpec::new()
                .with(CategoricalColumn::Area, area)
                .with(CategoricalColumn::Vehicle, vehicle)
        })
    }

    proptest! {
        #[test]
        fn output_is_exactly_the_matching_rows_in_order(table in arb_table(), spec in arb_spec()) {
            let out = apply(&table, &spec);
            let expected: Vec<&Record> = table.records().iter().filter(|r| spec.matches(r)).collect();

            prop_assert!(out.records().iter().all(|r| spec.matches(r)));
            prop_assert_eq!(out.records().iter().collect::<Vec<_>>(), expected);

            let indices = matching_indices(&table, &spec);
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(indices.len(), out.len());
        }

        #[test]
        fn empty_selection_on_any_column_yields_nothing(table in arb_table(), spec in arb_spec()) {
            let spec = spec.with(CategoricalColumn::Area, Selection::none());
            prop_assert!(apply(&table, &spec).is_empty());
        }
    }
}
