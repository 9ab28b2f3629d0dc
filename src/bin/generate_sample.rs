//! Writes a synthetic delivery dataset for trying the dashboard.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]`
//! (defaults: `data/amazon_delivery.csv`, 2000 rows). An output ending in
//! `.parquet` is written as Parquet, anything else as CSV.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Header as found in the public dataset, including its stray padding.
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
    " Traffic ",
    "Vehicle",
    "Area ",
    "Delivery_Time",
    "Category",
];

const WEATHER: [&str; 6] = ["Sunny", "Stormy", "Sandstorms", "Cloudy", "Fog", "Windy"];
const TRAFFIC: [(&str, f64); 4] = [("Low ", 0.0), ("Medium ", 15.0), ("High ", 25.0), ("Jam ", 45.0)];
const VEHICLE: [(&str, f64); 3] = [("motorcycle ", 0.0), ("scooter ", 8.0), ("van", 12.0)];
const AREA: [(&str, f64); 4] = [
    ("Urban ", 10.0),
    ("Metropolitian ", 25.0),
    ("Semi-Urban ", 40.0),
    ("Other", 30.0),
];
const CATEGORY: [&str; 8] = [
    "Clothing",
    "Electronics",
    "Sports",
    "Cosmetics",
    "Toys",
    "Snacks",
    "Grocery",
    "Books",
];

/// Share of rows that get one blank cell.
const MISSING_RATE: f64 = 0.03;

/// Seeded splitmix64 stream; the same seed always writes the same file.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.index(items.len())]
    }

    /// Bell-shaped noise in `[-spread, spread]` (sum of three uniforms).
    fn jitter(&mut self, spread: f64) -> f64 {
        let sum = self.unit() + self.unit() + self.unit();
        (sum / 1.5 - 1.0) * spread
    }
}

/// One generated delivery; `None` cells end up blank in the output.
struct SampleRow {
    order_id: String,
    agent_age: Option<i64>,
    agent_rating: Option<f64>,
    store: (f64, f64),
    drop: (f64, f64),
    order_date: String,
    order_time: Option<String>,
    pickup_time: String,
    weather: Option<&'static str>,
    traffic: &'static str,
    vehicle: &'static str,
    area: &'static str,
    delivery_time: i64,
    category: &'static str,
}

fn generate_row(i: usize, rng: &mut SampleRng) -> SampleRow {
    let weather = rng.pick(&WEATHER);
    let (traffic, traffic_delay) = rng.pick(&TRAFFIC);
    let (vehicle, vehicle_delay) = rng.pick(&VEHICLE);
    let (area, area_delay) = rng.pick(&AREA);
    let weather_delay = if matches!(weather, "Stormy" | "Sandstorms" | "Fog") { 20.0 } else { 0.0 };

    let store = (rng.range(10.0, 30.0), rng.range(72.0, 88.0));
    let drop = (store.0 + rng.range(-0.2, 0.2), store.1 + rng.range(-0.2, 0.2));

    let minutes = 60.0 + area_delay + traffic_delay + vehicle_delay + weather_delay + rng.jitter(30.0);
    let hour = 8 + rng.index(14);
    let minute = 5 * rng.index(12);

    let mut row = SampleRow {
        order_id: format!("ord{:09}", 100_000_000 + i * 7919 % 900_000_000),
        agent_age: Some(20 + rng.index(20) as i64),
        agent_rating: Some((rng.range(3.5, 5.0) * 10.0).round() / 10.0),
        store,
        drop,
        order_date: format!("2022-03-{:02}", 11 + rng.index(20)),
        order_time: Some(format!("{hour:02}:{minute:02}:00")),
        pickup_time: format!("{hour:02}:{:02}:00", (minute + 10) % 60),
        weather: Some(weather),
        traffic,
        vehicle,
        area,
        delivery_time: minutes.max(10.0).round() as i64,
        category: rng.pick(&CATEGORY),
    };

    if rng.unit() < MISSING_RATE {
        match rng.index(4) {
            0 => row.agent_age = None,
            1 => row.agent_rating = None,
            2 => row.order_time = None,
            _ => row.weather = None,
        }
    }
    row
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER)?;
    for r in rows {
        writer.write_record([
            r.order_id.clone(),
            r.agent_age.map(|v| v.to_string()).unwrap_or_default(),
            r.agent_rating.map(|v| v.to_string()).unwrap_or_default(),
            format!("{:.6}", r.store.0),
            format!("{:.6}", r.store.1),
            format!("{:.6}", r.drop.0),
            format!("{:.6}", r.drop.1),
            r.order_date.clone(),
            r.order_time.clone().unwrap_or_default(),
            r.pickup_time.clone(),
            // The public dataset spells missing weather as "NaN".
            r.weather.unwrap_or("NaN").to_string(),
            r.traffic.to_string(),
            r.vehicle.to_string(),
            r.area.to_string(),
            r.delivery_time.to_string(),
            r.category.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let text = |f: fn(&SampleRow) -> String| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&SampleRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.order_id.clone()),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.agent_age).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.agent_rating).collect::<Vec<_>>())),
        float(|r| r.store.0),
        float(|r| r.store.1),
        float(|r| r.drop.0),
        float(|r| r.drop.1),
        text(|r| r.order_date.clone()),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.order_time.clone()).collect::<Vec<_>>(),
        )),
        text(|r| r.pickup_time.clone()),
        Arc::new(StringArray::from(rows.iter().map(|r| r.weather).collect::<Vec<_>>())),
        text(|r| r.traffic.to_string()),
        text(|r| r.vehicle.to_string()),
        text(|r| r.area.to_string()),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.delivery_time).collect::<Vec<_>>())),
        text(|r| r.category.to_string()),
    ];

    let fields: Vec<Field> = HEADER
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "data/amazon_delivery.csv".to_string());
    let n_rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2000,
    };

    let output = Path::new(&output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut rng = SampleRng(42);
    let rows: Vec<SampleRow> = (0..n_rows).map(|i| generate_row(i, &mut rng)).collect();

    let is_parquet = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(output, &rows)?;
    } else {
        write_csv(output, &rows)?;
    }

    println!("Wrote {n_rows} deliveries to {}", output.display());
    Ok(())
}
