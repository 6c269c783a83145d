//! Comparison chart requests and the renderer interface.
//!
//! A [`ChartRequest`] carries the fetched series plus the layout contract:
//! countries are grouped three to a panel, panels fill a grid at most three
//! columns wide, and each panel draws one line per (country, status) pair.

use serde::Serialize;

use crate::intent::CaseStatus;
use crate::stats::CountrySeries;

pub mod svg;

pub use svg::SvgRenderer;

/// Countries drawn in one panel.
pub const COUNTRIES_PER_PANEL: usize = 3;

/// Widest the panel grid gets.
pub const MAX_GRID_COLUMNS: usize = 3;

/// Everything a renderer needs to draw a comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    /// Countries in panel order.
    pub countries: Vec<String>,
    /// Statuses drawn for every country.
    pub statuses: Vec<CaseStatus>,
    /// Fetched series. Pairs whose fetch failed are absent.
    pub series: Vec<CountrySeries>,
    /// Draw the y-axis on a base-10 log scale.
    pub log_scale: bool,
}

/// Panel grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    /// Number of panels.
    pub panels: usize,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub columns: usize,
}

impl ChartLayout {
    /// Layout for `countries` countries.
    pub fn for_countries(countries: usize) -> Self {
        let panels = countries.div_ceil(COUNTRIES_PER_PANEL);
        Self {
            panels,
            rows: panels.div_ceil(MAX_GRID_COLUMNS),
            columns: panels.min(MAX_GRID_COLUMNS),
        }
    }
}

/// One cell of the panel grid.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    /// Grid row, from the top.
    pub row: usize,
    /// Grid column, from the left.
    pub column: usize,
    /// Countries assigned to this panel.
    pub countries: &'a [String],
}

impl ChartRequest {
    /// Grid dimensions for this request.
    pub fn layout(&self) -> ChartLayout {
        ChartLayout::for_countries(self.countries.len())
    }

    /// Panels in grid order, each holding up to [`COUNTRIES_PER_PANEL`] countries.
    pub fn panels(&self) -> Vec<Panel<'_>> {
        self.countries
            .chunks(COUNTRIES_PER_PANEL)
            .enumerate()
            .map(|(index, countries)| Panel {
                row: index / MAX_GRID_COLUMNS,
                column: index % MAX_GRID_COLUMNS,
                countries,
            })
            .collect()
    }

    /// Series for one country, in status order, with their legend labels.
    pub fn lines_for(&self, country: &str) -> Vec<(String, &CountrySeries)> {
        self.statuses
            .iter()
            .filter_map(|status| {
                self.series
                    .iter()
                    .find(|s| s.country == country && s.status == *status)
                    .map(|s| (series_label(country, *status), s))
            })
            .collect()
    }
}

/// Legend label for a line: `<COUNTRY> (<status>)`.
pub fn series_label(country: &str, status: CaseStatus) -> String {
    format!("{} ({status})", country.to_uppercase())
}

/// A rendered chart ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    /// File name to upload under.
    pub filename: String,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

/// Errors returned by chart renderers.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The request has no series to draw.
    #[error("chart request has no data to draw")]
    Empty,
}

/// Turns a [`ChartRequest`] into an image.
pub trait PlotRenderer: Send + Sync {
    /// Render the chart.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the request cannot be drawn.
    fn render(&self, request: &ChartRequest) -> Result<RenderedChart, RenderError>;
}
