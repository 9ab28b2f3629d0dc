use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::error::EmptyColumnError;
use crate::data::filter::{FilterSpec, Selection};
use crate::data::loader::LoadOptions;
use crate::data::model::{CategoricalColumn, DeliveryTable, NumericColumn};
use crate::data::session::Session;
use crate::data::stats::{describe, group_mean, Summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything derived from the current filter selection.
///
/// Rebuilt from scratch after every interaction.
#[derive(Debug, Clone)]
pub struct View {
    pub rows: DeliveryTable,
    pub summary: Result<Summary, EmptyColumnError>,
    /// Mean delivery time per area, fastest first.
    pub area_ranking: Vec<(String, f64)>,
    /// Mean delivery time per traffic level, fastest first.
    pub traffic_ranking: Vec<(String, f64)>,
}

impl View {
    fn compute(session: &Session, filters: &FilterSpec, stats_column: NumericColumn) -> Self {
        let rows = session.filter(filters);
        let summary = describe(&rows, stats_column);
        let area_ranking = group_mean(&rows, CategoricalColumn::Area, NumericColumn::DeliveryTime);
        let traffic_ranking =
            group_mean(&rows, CategoricalColumn::Traffic, NumericColumn::DeliveryTime);
        View {
            rows,
            summary,
            area_ranking,
            traffic_ranking,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub session: Option<Session>,

    /// Per-column filter selections.
    pub filters: FilterSpec,

    /// Filtered rows and their statistics.
    pub view: Option<View>,

    /// Numeric column described in the summary panel.
    pub stats_column: NumericColumn,

    /// One colour per area, shared by the charts.
    pub area_colors: Option<ColorMap>,

    /// One colour per traffic level.
    pub traffic_colors: Option<ColorMap>,

    /// Upper bound on rows drawn in the table.
    pub preview_rows: usize,

    /// How files are parsed when opened from the UI.
    pub load_options: LoadOptions,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            session: None,
            filters: FilterSpec::new(),
            view: None,
            stats_column: config.stats_column,
            area_colors: None,
            traffic_colors: None,
            preview_rows: config.preview_rows,
            load_options: config.load_options(),
            status_message: None,
        }
    }

    /// Open `path` and make it the current session. On failure the
    /// previous session is kept and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match Session::open(path, &self.load_options) {
            Ok(session) => {
                log::info!(
                    "Loaded {} deliveries from {}",
                    session.table().len(),
                    path.display()
                );
                self.set_session(session);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly opened session, reset filters and colours.
    pub fn set_session(&mut self, session: Session) {
        let table = session.table();
        self.area_colors = Some(ColorMap::new(table.unique_values(CategoricalColumn::Area)));
        self.traffic_colors = Some(ColorMap::new(table.unique_values(CategoricalColumn::Traffic)));
        self.filters = FilterSpec::new();
        self.session = Some(session);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view after a filter or column change.
    pub fn refilter(&mut self) {
        self.view = self
            .session
            .as_ref()
            .map(|s| View::compute(s, &self.filters, self.stats_column));
    }

    pub fn set_stats_column(&mut self, column: NumericColumn) {
        if self.stats_column != column {
            self.stats_column = column;
            self.refilter();
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: CategoricalColumn, value: &str) {
        if let Some(session) = &self.session {
            self.filters.toggle(session.table(), column, value);
            self.refilter();
        }
    }

    /// Lift the constraint on a column.
    pub fn select_all(&mut self, column: CategoricalColumn) {
        self.filters.set(column, Selection::All);
        self.refilter();
    }

    /// Deselect every value of a column.
    pub fn select_none(&mut self, column: CategoricalColumn) {
        self.filters.set(column, Selection::none());
        self.refilter();
    }

    pub fn visible_rows(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
Order_ID,Agent_Age,Agent_Rating,Store_Latitude,Store_Longitude,Drop_Latitude,Drop_Longitude,Weather,Traffic,Vehicle,Area,Delivery_Time,Category
a1,37,4.9,22.74,75.89,22.76,75.91,Sunny,High,motorcycle,Urban,30,Clothing
a2,34,4.5,12.91,77.68,13.04,77.81,Stormy,Jam,scooter,Urban,45,Electronics
a3,32,4.6,12.97,80.24,13.05,80.32,Cloudy,High,motorcycle,Rural,60,Toys
";

    fn loaded_state() -> (NamedTempFile, AppState) {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{CSV}").unwrap();
        let mut state = AppState::new(&DashboardConfig::default());
        state.open(file.path());
        (file, state)
    }

    #[test]
    fn opening_a_file_builds_the_first_view() {
        let (_file, state) = loaded_state();
        let view = state.view.as_ref().unwrap();

        assert_eq!(state.visible_rows(), 3);
        assert_eq!(view.summary.unwrap().count, 3);
        assert_eq!(
            view.area_ranking,
            vec![("Urban".to_string(), 37.5), ("Rural".to_string(), 60.0)]
        );
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggling_and_none_update_the_view() {
        let (_file, mut state) = loaded_state();

        state.toggle_filter_value(CategoricalColumn::Area, "Rural");
        assert_eq!(state.visible_rows(), 2);
        assert_eq!(state.view.as_ref().unwrap().summary.unwrap().mean, 37.5);

        state.select_none(CategoricalColumn::Vehicle);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.rows.len(), 0);
        assert!(view.summary.is_err());
        assert!(view.traffic_ranking.is_empty());

        state.select_all(CategoricalColumn::Vehicle);
        assert_eq!(state.visible_rows(), 2);
    }

    #[test]
    fn stats_column_switch_recomputes_summary() {
        let (_file, mut state) = loaded_state();
        state.set_stats_column(NumericColumn::AgentAge);
        let summary = state.view.as_ref().unwrap().summary.unwrap();
        assert_eq!(summary.column, NumericColumn::AgentAge);
        assert_eq!(summary.max, 37.0);
    }

    #[test]
    fn failed_open_keeps_previous_session() {
        let (_file, mut state) = loaded_state();
        state.open(Path::new("./does/not/exist.csv"));

        assert!(state.session.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("not found")));
    }
}
