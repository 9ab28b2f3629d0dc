/// Data layer: loading, cleaning, typing, filtering and statistics.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → RawTable (text cells, None = missing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean   │  trim headers, drop rows with missing cells
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ DeliveryTable │  typed Records, categorical index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  FilterSpec → matching rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  describe / group_mean
///   └──────────┘
/// ```
///
/// [`session::Session`] runs the first three stages once and shares the
/// resulting table read-only.

pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod session;
pub mod stats;
pub mod table;
