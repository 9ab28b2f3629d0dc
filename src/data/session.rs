use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::clean::clean;
use super::error::DataSourceError;
use super::filter::{self, FilterSpec};
use super::loader::{load_file, LoadOptions};
use super::model::DeliveryTable;

/// A cleaned, typed dataset opened from one file.
///
/// Immutable once built; clones share the same table.
#[derive(Debug, Clone)]
pub struct Session {
    source: PathBuf,
    table: Arc<DeliveryTable>,
}

impl Session {
    /// Load, clean and type-check `path`.
    pub fn open(path: &Path, options: &LoadOptions) -> Result<Self, DataSourceError> {
        let raw = load_file(path, options)?;
        let table = DeliveryTable::try_from(clean(raw))?;
        Ok(Self {
            source: path.to_path_buf(),
            table: Arc::new(table),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &DeliveryTable {
        &self.table
    }

    /// Rows of the session table passing `spec`.
    pub fn filter(&self, spec: &FilterSpec) -> DeliveryTable {
        filter::apply(&self.table, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Selection;
    use crate::data::model::{CategoricalColumn, NumericColumn};
    use crate::data::stats::{describe, group_mean};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
Order_ID,Agent_Age,Agent_Rating,Store_Latitude,Store_Longitude,Drop_Latitude,Drop_Longitude,Order_Date,Order_Time,Pickup_Time,Weather ,Traffic ,Vehicle,Area,Delivery_Time,Category
a1,37,4.9,22.74,75.89,22.76,75.91,2022-03-19,11:30:00,11:45:00,Sunny,High ,motorcycle ,Urban ,30,Clothing
a2,34,4.5,12.91,77.68,13.04,77.81,2022-03-25,19:45:00,19:50:00,Stormy,Jam ,scooter ,Urban ,45,Electronics
a3,23,,12.91,77.67,12.92,77.68,2022-03-19,08:30:00,08:45:00,Sandstorms,Low ,motorcycle ,Rural ,110,Sports
a4,38,4.7,11.00,76.97,11.05,77.02,2022-04-05,18:00:00,18:10:00,NaN,Medium ,van,Rural ,60,Toys
a5,32,4.6,12.97,80.24,13.05,80.32,2022-03-26,13:25:00,13:30:00,Cloudy,High ,motorcycle ,Rural ,60,Toys
";

    fn session() -> (NamedTempFile, Session) {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{CSV}").unwrap();
        let session = Session::open(file.path(), &LoadOptions::default()).unwrap();
        (file, session)
    }

    #[test]
    fn open_cleans_and_types_the_file() {
        let (_file, session) = session();
        let table = session.table();

        // a3 has no rating, a4 has NaN weather.
        assert_eq!(table.len(), 3);
        let ids: Vec<&str> = table.records().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a5"]);
        assert_eq!(table.records()[0].weather, "Sunny");
    }

    #[test]
    fn filter_then_describe() {
        let (_file, session) = session();
        let spec = FilterSpec::new()
            .with(CategoricalColumn::Area, Selection::only(["Urban "]))
            .with(CategoricalColumn::Vehicle, Selection::All);

        let summary = describe(&session.filter(&spec), NumericColumn::DeliveryTime).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 37.5);
    }

    #[test]
    fn no_vehicles_selected_is_a_neutral_empty_state() {
        let (_file, session) = session();
        let spec = FilterSpec::new().with(CategoricalColumn::Vehicle, Selection::none());

        let filtered = session.filter(&spec);
        assert!(filtered.is_empty());
        assert!(describe(&filtered, NumericColumn::DeliveryTime).is_err());
        assert!(group_mean(&filtered, CategoricalColumn::Area, NumericColumn::DeliveryTime).is_empty());
    }

    #[test]
    fn group_mean_over_unfiltered_session() {
        let (_file, session) = session();
        let ranked = group_mean(
            &session.filter(&FilterSpec::new()),
            CategoricalColumn::Area,
            NumericColumn::DeliveryTime,
        );
        assert_eq!(
            ranked,
            vec![("Urban ".to_string(), 37.5), ("Rural ".to_string(), 60.0)]
        );
    }

    #[test]
    fn clones_share_the_table() {
        let (_file, session) = session();
        let other = session.clone();
        assert!(std::ptr::eq(session.table(), other.table()));
        assert_eq!(other.source(), session.source());
    }

    #[test]
    fn nan_delivery_time_is_rejected_not_averaged() {
        let csv = CSV.replacen(",45,Electronics", ",NAN,Electronics", 1);
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{csv}").unwrap();

        let err = Session::open(file.path(), &LoadOptions::default()).unwrap_err();
        match err {
            DataSourceError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Delivery_Time");
                assert_eq!(value, "NAN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Session::open(Path::new("./data/missing.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }
}
