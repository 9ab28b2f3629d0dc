use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{DataSourceError, UnknownColumnError};
use super::table::RawTable;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Categorical fields a delivery can be filtered and grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    Area,
    Vehicle,
    Traffic,
    Weather,
    Category,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 5] = [
        CategoricalColumn::Area,
        CategoricalColumn::Vehicle,
        CategoricalColumn::Traffic,
        CategoricalColumn::Weather,
        CategoricalColumn::Category,
    ];

    /// Header name in the source file.
    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Area => "Area",
            CategoricalColumn::Vehicle => "Vehicle",
            CategoricalColumn::Traffic => "Traffic",
            CategoricalColumn::Weather => "Weather",
            CategoricalColumn::Category => "Category",
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategoricalColumn {
    type Err = UnknownColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| UnknownColumnError(s.to_string()))
    }
}

/// Numeric fields that statistics can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    #[serde(rename = "Delivery_Time")]
    DeliveryTime,
    #[serde(rename = "Agent_Age")]
    AgentAge,
    #[serde(rename = "Agent_Rating")]
    AgentRating,
    #[serde(rename = "Store_Latitude")]
    StoreLatitude,
    #[serde(rename = "Store_Longitude")]
    StoreLongitude,
    #[serde(rename = "Drop_Latitude")]
    DropLatitude,
    #[serde(rename = "Drop_Longitude")]
    DropLongitude,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::DeliveryTime,
        NumericColumn::AgentAge,
        NumericColumn::AgentRating,
        NumericColumn::StoreLatitude,
        NumericColumn::StoreLongitude,
        NumericColumn::DropLatitude,
        NumericColumn::DropLongitude,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::DeliveryTime => "Delivery_Time",
            NumericColumn::AgentAge => "Agent_Age",
            NumericColumn::AgentRating => "Agent_Rating",
            NumericColumn::StoreLatitude => "Store_Latitude",
            NumericColumn::StoreLongitude => "Store_Longitude",
            NumericColumn::DropLatitude => "Drop_Latitude",
            NumericColumn::DropLongitude => "Drop_Longitude",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = UnknownColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| UnknownColumnError(s.to_string()))
    }
}

const ORDER_ID: &str = "Order_ID";
const ORDER_DATE: &str = "Order_Date";
const ORDER_TIME: &str = "Order_Time";
const PICKUP_TIME: &str = "Pickup_Time";

// ---------------------------------------------------------------------------
// Record – one delivery event
// ---------------------------------------------------------------------------

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One delivery (one row of the cleaned source file).
///
/// Categorical values are kept exactly as they appear in the file,
/// including any padding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub order_id: String,
    pub agent_age: u32,
    pub agent_rating: f64,
    pub store_location: Location,
    pub drop_location: Location,
    /// Date and time columns are optional in the source and kept as text.
    pub order_date: Option<String>,
    pub order_time: Option<String>,
    pub pickup_time: Option<String>,
    pub weather: String,
    pub traffic: String,
    pub vehicle: String,
    pub area: String,
    pub category: String,
    /// Minutes.
    pub delivery_time: f64,
}

impl Record {
    pub fn categorical(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Area => &self.area,
            CategoricalColumn::Vehicle => &self.vehicle,
            CategoricalColumn::Traffic => &self.traffic,
            CategoricalColumn::Weather => &self.weather,
            CategoricalColumn::Category => &self.category,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::DeliveryTime => self.delivery_time,
            NumericColumn::AgentAge => f64::from(self.agent_age),
            NumericColumn::AgentRating => self.agent_rating,
            NumericColumn::StoreLatitude => self.store_location.latitude,
            NumericColumn::StoreLongitude => self.store_location.longitude,
            NumericColumn::DropLatitude => self.drop_location.latitude,
            NumericColumn::DropLongitude => self.drop_location.longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// DeliveryTable – the typed, cleaned dataset
// ---------------------------------------------------------------------------

/// Typed records plus the sorted distinct values of each categorical column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryTable {
    records: Vec<Record>,
    unique_values: BTreeMap<CategoricalColumn, BTreeSet<String>>,
}

impl DeliveryTable {
    /// Build the categorical index from the given records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<CategoricalColumn, BTreeSet<String>> = CategoricalColumn::ALL
            .into_iter()
            .map(|col| (col, BTreeSet::new()))
            .collect();

        for record in &records {
            for col in CategoricalColumn::ALL {
                unique_values
                    .entry(col)
                    .or_default()
                    .insert(record.categorical(col).to_string());
            }
        }

        DeliveryTable {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of `column`.
    pub fn unique_values(&self, column: CategoricalColumn) -> impl Iterator<Item = &str> {
        self.unique_values
            .get(&column)
            .into_iter()
            .flat_map(|vals| vals.iter().map(String::as_str))
    }

    pub fn unique_count(&self, column: CategoricalColumn) -> usize {
        self.unique_values.get(&column).map_or(0, BTreeSet::len)
    }

    /// Numeric column as a plain vector, in row order.
    pub fn values(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| r.numeric(column)).collect()
    }
}

// ---------------------------------------------------------------------------
// RawTable → DeliveryTable
// ---------------------------------------------------------------------------

/// Column positions resolved once against the raw header.
struct ColumnMap {
    order_id: usize,
    agent_age: usize,
    agent_rating: usize,
    store_latitude: usize,
    store_longitude: usize,
    drop_latitude: usize,
    drop_longitude: usize,
    order_date: Option<usize>,
    order_time: Option<usize>,
    pickup_time: Option<usize>,
    weather: usize,
    traffic: usize,
    vehicle: usize,
    area: usize,
    category: usize,
    delivery_time: usize,
}

impl ColumnMap {
    fn resolve(raw: &RawTable) -> Result<Self, DataSourceError> {
        let required = |name: &str| {
            raw.column_index(name)
                .ok_or_else(|| DataSourceError::MissingColumn(name.to_string()))
        };
        let numeric = |col: NumericColumn| required(col.name());
        let categorical = |col: CategoricalColumn| required(col.name());

        Ok(ColumnMap {
            order_id: required(ORDER_ID)?,
            agent_age: numeric(NumericColumn::AgentAge)?,
            agent_rating: numeric(NumericColumn::AgentRating)?,
            store_latitude: numeric(NumericColumn::StoreLatitude)?,
            store_longitude: numeric(NumericColumn::StoreLongitude)?,
            drop_latitude: numeric(NumericColumn::DropLatitude)?,
            drop_longitude: numeric(NumericColumn::DropLongitude)?,
            order_date: raw.column_index(ORDER_DATE),
            order_time: raw.column_index(ORDER_TIME),
            pickup_time: raw.column_index(PICKUP_TIME),
            weather: categorical(CategoricalColumn::Weather)?,
            traffic: categorical(CategoricalColumn::Traffic)?,
            vehicle: categorical(CategoricalColumn::Vehicle)?,
            area: categorical(CategoricalColumn::Area)?,
            category: categorical(CategoricalColumn::Category)?,
            delivery_time: numeric(NumericColumn::DeliveryTime)?,
        })
    }
}

/// Cursor over one raw row that turns cells into typed values.
struct RowReader<'a> {
    columns: &'a [String],
    cells: &'a [Option<String>],
    row: usize,
}

impl RowReader<'_> {
    fn invalid(&self, idx: usize, value: &str) -> DataSourceError {
        DataSourceError::InvalidValue {
            row: self.row,
            column: self.columns.get(idx).cloned().unwrap_or_default(),
            value: value.to_string(),
        }
    }

    fn text(&self, idx: usize) -> Result<String, DataSourceError> {
        match self.cells.get(idx) {
            Some(Some(v)) => Ok(v.clone()),
            _ => Err(self.invalid(idx, "")),
        }
    }

    fn optional_text(&self, idx: Option<usize>) -> Option<String> {
        idx.and_then(|i| self.cells.get(i).cloned().flatten())
    }

    /// Finite values only: `NaN` and `inf` spellings are rejected.
    fn float(&self, idx: usize) -> Result<f64, DataSourceError> {
        let raw = self.text(idx)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid(idx, &raw)),
        }
    }

    /// Accepts `"37"` as well as `"37.0"` (what float-typed sources write).
    fn integer(&self, idx: usize) -> Result<u32, DataSourceError> {
        let raw = self.text(idx)?;
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<u32>() {
            return Ok(v);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) => {
                Ok(v as u32)
            }
            _ => Err(self.invalid(idx, &raw)),
        }
    }
}

impl TryFrom<RawTable> for DeliveryTable {
    type Error = DataSourceError;

    /// Convert a cleaned raw table into typed records.
    ///
    /// Fails on the first missing required column or unparseable cell.
    /// Columns outside the delivery schema are ignored.
    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let cols = ColumnMap::resolve(&raw)?;
        let mut records = Vec::with_capacity(raw.rows.len());

        for (row, cells) in raw.rows.iter().enumerate() {
            let r = RowReader {
                columns: &raw.columns,
                cells,
                row,
            };
            records.push(Record {
                order_id: r.text(cols.order_id)?,
                agent_age: r.integer(cols.agent_age)?,
                agent_rating: r.float(cols.agent_rating)?,
                store_location: Location {
                    latitude: r.float(cols.store_latitude)?,
                    longitude: r.float(cols.store_longitude)?,
                },
                drop_location: Location {
                    latitude: r.float(cols.drop_latitude)?,
                    longitude: r.float(cols.drop_longitude)?,
                },
                order_date: r.optional_text(cols.order_date),
                order_time: r.optional_text(cols.order_time),
                pickup_time: r.optional_text(cols.pickup_time),
                weather: r.text(cols.weather)?,
                traffic: r.text(cols.traffic)?,
                vehicle: r.text(cols.vehicle)?,
                area: r.text(cols.area)?,
                category: r.text(cols.category)?,
                delivery_time: r.float(cols.delivery_time)?,
            });
        }

        Ok(DeliveryTable::from_records(records))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal record for tests that only care about a few fields.
    pub(crate) fn delivery(area: &str, vehicle: &str, delivery_time: f64) -> Record {
        Record {
            order_id: format!("{area}-{vehicle}-{delivery_time}"),
            area: area.to_string(),
            vehicle: vehicle.to_string(),
            traffic: "Low ".to_string(),
            weather: "Sunny".to_string(),
            category: "Grocery".to_string(),
            delivery_time,
            ..Record::default()
        }
    }

    const HEADER: [&str; 16] = [
        "Order_ID",
        "Agent_Age",
        "Agent_Rating",
        "Store_Latitude",
        "Store_Longitude",
        "Drop_Latitude",
        "Drop_Longitude",
        "Order_Date",
        "Order_Time",
        "Pickup_Time",
        "Weather",
        "Traffic",
        "Vehicle",
        "Area",
        "Delivery_Time",
        "Category",
    ];

    fn raw_row(values: [&str; 16]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn raw_table(rows: Vec<Vec<Option<String>>>) -> RawTable {
        RawTable::new(HEADER.iter().map(|h| h.to_string()).collect(), rows)
    }

    #[test]
    fn column_names_round_trip_through_from_str() {
        for col in CategoricalColumn::ALL {
            assert_eq!(col.name().parse::<CategoricalColumn>(), Ok(col));
        }
        for col in NumericColumn::ALL {
            assert_eq!(col.to_string().parse::<NumericColumn>(), Ok(col));
        }
        assert!("Colour".parse::<CategoricalColumn>().is_err());
    }

    #[test]
    fn converts_raw_rows_into_records() {
        let raw = raw_table(vec![raw_row([
            "ialx566343618",
            "37",
            "4.9",
            "22.745049",
            "75.892471",
            "22.765049",
            "75.912471",
            "2022-03-19",
            "11:30:00",
            "11:45:00",
            "Sunny",
            "High ",
            "motorcycle ",
            "Urban ",
            "120",
            "Clothing",
        ])]);

        let table = DeliveryTable::try_from(raw).unwrap();
        assert_eq!(table.len(), 1);
        let r = &table.records()[0];
        assert_eq!(r.agent_age, 37);
        assert_eq!(r.vehicle, "motorcycle ");
        assert_eq!(r.area, "Urban ");
        assert_eq!(r.delivery_time, 120.0);
        assert_eq!(r.order_time.as_deref(), Some("11:30:00"));
        assert_eq!(r.numeric(NumericColumn::StoreLongitude), 75.892471);
        assert_eq!(
            table.unique_values(CategoricalColumn::Traffic).collect::<Vec<_>>(),
            vec!["High "]
        );
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let header: Vec<String> = HEADER
            .iter()
            .filter(|h| !matches!(**h, "Order_Date" | "Order_Time" | "Pickup_Time"))
            .map(|h| h.to_string())
            .collect();
        let row = vec![
            "a1", "30", "4.5", "1.0", "2.0", "1.5", "2.5", "Cloudy", "Jam ", "van", "Metropolitian ",
            "95.0", "Toys",
        ]
        .into_iter()
        .map(|v| Some(v.to_string()))
        .collect();

        let table = DeliveryTable::try_from(RawTable::new(header, vec![row])).unwrap();
        assert_eq!(table.records()[0].order_date, None);
        assert_eq!(table.records()[0].agent_age, 30);
    }

    #[test]
    fn missing_required_column_is_a_data_source_error() {
        let header: Vec<String> = HEADER
            .iter()
            .filter(|h| **h != "Delivery_Time")
            .map(|h| h.to_string())
            .collect();
        let err = DeliveryTable::try_from(RawTable::new(header, Vec::new())).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn(ref c) if c == "Delivery_Time"));
    }

    #[test]
    fn unparseable_number_reports_row_and_column() {
        let mut bad = raw_row(["x"; 16]);
        bad[1] = Some("40".into());
        bad[2] = Some("4".into());
        for idx in 3..7 {
            bad[idx] = Some("0.0".into());
        }
        bad[14] = Some("quick".into());

        let err = DeliveryTable::try_from(raw_table(vec![bad])).unwrap_err();
        match err {
            DataSourceError::InvalidValue { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, "Delivery_Time");
                assert_eq!(value, "quick");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_numbers_are_invalid_values() {
        let mut row = raw_row(["0"; 16]);
        for spelling in ["NAN", "nan", "inf", "-Infinity"] {
            row[14] = Some(spelling.into());
            let err = DeliveryTable::try_from(raw_table(vec![row.clone()])).unwrap_err();
            assert!(
                matches!(err, DataSourceError::InvalidValue { ref column, ref value, .. }
                    if column == "Delivery_Time" && value == spelling),
                "{spelling}: got {err}"
            );
        }

        row[14] = Some("30".into());
        row[1] = Some("NaN".into());
        let err = DeliveryTable::try_from(raw_table(vec![row])).unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidValue { ref column, .. } if column == "Agent_Age"));
    }

    #[test]
    fn agent_age_accepts_integral_floats_only() {
        let mut row = raw_row(["0"; 16]);
        row[1] = Some("29.0".into());
        let table = DeliveryTable::try_from(raw_table(vec![row.clone()])).unwrap();
        assert_eq!(table.records()[0].agent_age, 29);

        row[1] = Some("29.5".into());
        assert!(DeliveryTable::try_from(raw_table(vec![row])).is_err());
    }

    #[test]
    fn unique_values_are_sorted_and_deduplicated() {
        let table = DeliveryTable::from_records(vec![
            delivery("Urban", "scooter", 10.0),
            delivery("Rural", "motorcycle", 20.0),
            delivery("Urban", "motorcycle", 30.0),
        ]);
        assert_eq!(
            table.unique_values(CategoricalColumn::Area).collect::<Vec<_>>(),
            vec!["Rural", "Urban"]
        );
        assert_eq!(table.unique_count(CategoricalColumn::Vehicle), 2);
        assert_eq!(table.values(NumericColumn::DeliveryTime), vec![10.0, 20.0, 30.0]);
    }
}
