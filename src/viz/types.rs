//! Public types and constants for the dashboard renderer.

use crate::models::Metric;

/// What a grid cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// World map of every record with coordinates.
    Map,
    /// Single number: the global total of a metric.
    Indicator(Metric),
    /// Top-N bar chart of a metric.
    Bar(Metric),
}

/// One panel anchored in the grid. Rows and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u8,
    pub col: u8,
    pub row_span: u8,
    pub col_span: u8,
    pub kind: PanelKind,
}

pub const GRID_ROWS: u8 = 4;
pub const GRID_COLS: u8 = 6;

/// The fixed 4×6 dashboard grid:
/// map on the left half, three indicators on the first row of the right
/// half and one bar chart per remaining row.
pub const DASHBOARD_LAYOUT: [GridCell; 7] = [
    GridCell { row: 1, col: 1, row_span: 4, col_span: 3, kind: PanelKind::Map },
    GridCell { row: 1, col: 4, row_span: 1, col_span: 1, kind: PanelKind::Indicator(Metric::Confirmed) },
    GridCell { row: 1, col: 5, row_span: 1, col_span: 1, kind: PanelKind::Indicator(Metric::Recovered) },
    GridCell { row: 1, col: 6, row_span: 1, col_span: 1, kind: PanelKind::Indicator(Metric::Deaths) },
    GridCell { row: 2, col: 4, row_span: 1, col_span: 3, kind: PanelKind::Bar(Metric::Confirmed) },
    GridCell { row: 3, col: 4, row_span: 1, col_span: 3, kind: PanelKind::Bar(Metric::Recovered) },
    GridCell { row: 4, col: 4, row_span: 1, col_span: 3, kind: PanelKind::Bar(Metric::Deaths) },
];

/// Map projection for the geo panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Projection {
    /// Plate carrée: the whole world, longitude → x, latitude → y.
    #[default]
    Equirectangular,
    /// Globe seen from above `(lon0, lat0)`; the far hemisphere is hidden.
    Orthographic { lon0: f64, lat0: f64 },
}

/// Rendering knobs. `Default` reproduces the stock dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// Locale tag for indicator thousands separators (`en`, `de`, ...).
    pub locale: String,
    pub projection: Projection,
    /// Pixel size of the map panel.
    pub map_size: (u32, u32),
    /// Pixel size of each bar chart panel.
    pub bar_size: (u32, u32),
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            locale: "en".into(),
            projection: Projection::default(),
            map_size: (900, 620),
            bar_size: (620, 200),
        }
    }
}
