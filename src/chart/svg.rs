//! SVG line-chart renderer.
//!
//! Draws each panel as a framed plot area with one polyline per series and
//! a legend in its upper-left corner. Dates map linearly onto the x-axis;
//! counts map onto the y-axis either linearly or as `log10`.

use std::fmt::Write as _;

use chrono::NaiveDate;

use super::{ChartRequest, PlotRenderer, RenderError, RenderedChart};
use crate::stats::CountrySeries;

const TITLE: &str = "Number of COVID-19 cases";
const TITLE_HEIGHT: f64 = 60.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;
const LEGEND_LINE_HEIGHT: f64 = 18.0;

const PALETTE: &[&str] = &[
    "#008fd5", "#fc4f30", "#e5ae38", "#6d904f", "#8b8b8b", "#810f7c", "#2ca02c", "#9467bd",
    "#17becf",
];

/// Renders charts as standalone SVG documents.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
}

impl SvgRenderer {
    /// Create a renderer producing images of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(1400, 1200)
    }
}

impl PlotRenderer for SvgRenderer {
    fn render(&self, request: &ChartRequest) -> Result<RenderedChart, RenderError> {
        if request.series.iter().all(|s| s.points.is_empty()) {
            return Err(RenderError::Empty);
        }

        let layout = request.layout();
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let cell_width = width / to_f64(layout.columns.max(1));
        let cell_height = (height - TITLE_HEIGHT) / to_f64(layout.rows.max(1));

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="#f0f0f0"/>"##);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="38" font-size="24" text-anchor="middle">{TITLE}</text>"#,
            width / 2.0
        );

        for panel in request.panels() {
            let cell = Frame {
                left: to_f64(panel.column) * cell_width,
                top: TITLE_HEIGHT + to_f64(panel.row) * cell_height,
                width: cell_width,
                height: cell_height,
            };
            let lines: Vec<(String, &CountrySeries)> = panel
                .countries
                .iter()
                .flat_map(|country| request.lines_for(country))
                .collect();
            draw_panel(&mut svg, cell, &lines, request.log_scale);
        }

        svg.push_str("</svg>\n");

        Ok(RenderedChart {
            filename: "plot.svg".to_owned(),
            bytes: svg.into_bytes(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

fn draw_panel(svg: &mut String, cell: Frame, lines: &[(String, &CountrySeries)], log_scale: bool) {
    let plot = Frame {
        left: cell.left + MARGIN_LEFT,
        top: cell.top + MARGIN_TOP,
        width: (cell.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        height: (cell.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    };

    let _ = writeln!(
        svg,
        r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#ffffff" stroke="#cbcbcb"/>"##,
        plot.left, plot.top, plot.width, plot.height
    );

    let all_points = || lines.iter().flat_map(|(_, series)| series.points.iter());
    let (Some(first), Some(last)) = (
        all_points().map(|p| p.date).min(),
        all_points().map(|p| p.date).max(),
    ) else {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">no data</text>"#,
            plot.left + plot.width / 2.0,
            plot.top + plot.height / 2.0
        );
        return;
    };
    let max_count = all_points().map(|p| p.count).max().unwrap_or(0);

    let span_days = days_between(first, last).max(1.0);
    let y_max = scale(max_count, log_scale).max(1.0);

    for (index, (label, series)) in lines.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];

        let coords: Vec<String> = series
            .points
            .iter()
            .map(|p| {
                let x = plot.left + days_between(first, p.date) / span_days * plot.width;
                let y = plot.top + plot.height - scale(p.count, log_scale) / y_max * plot.height;
                format!("{x:.1},{y:.1}")
            })
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="2" points="{}"/>"#,
            coords.join(" ")
        );

        let legend_y = plot.top + LEGEND_LINE_HEIGHT * (to_f64(index) + 1.0);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="10" height="10" fill="{color}"/>"#,
            plot.left + 8.0,
            legend_y - 10.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{legend_y:.1}" font-size="12">{}</text>"#,
            plot.left + 22.0,
            escape_xml(label)
        );
    }

    let axis_y = plot.top + plot.height + 18.0;
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{axis_y:.1}" font-size="11">{first}</text>"#,
        plot.left
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{axis_y:.1}" font-size="11" text-anchor="end">{last}</text>"#,
        plot.left + plot.width
    );
    let top_label = if log_scale {
        format!("1e{y_max:.1}")
    } else {
        max_count.to_string()
    };
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{top_label}</text>"#,
        plot.left - 6.0,
        plot.top + 10.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
        plot.left - 6.0,
        plot.top + plot.height,
        if log_scale { "1" } else { "0" }
    );
}

fn scale(count: u64, log_scale: bool) -> f64 {
    let value = count_to_f64(count);
    if log_scale {
        value.max(1.0).log10()
    } else {
        value
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_to_f64(count: u64) -> f64 {
    count as f64
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

#[allow(clippy::cast_precision_loss)]
fn days_between(from: NaiveDate, to: NaiveDate) -> f64 {
    to.signed_duration_since(from).num_days() as f64
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
