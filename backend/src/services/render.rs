//! Presentations of the point set.
//!
//! A snapshot is turned either into a [`PointsDocument`] (served as JSON) or
//! into a two-series [`ScatterPlot`] that is handed to a [`PlotRenderer`].

use plotters::prelude::{RGBColor, BLUE, RED};

use super::plot::{PlotRenderer, RenderError, ScatterPlot, Series, SeriesStyle, Viewport};
use crate::models::{Point, PointsDocument};

/// Half-width of the points viewport; a little past ±1.0 so edge points keep a margin.
pub const POINTS_EXTENT: f64 = 1.2;

const MARKER_RADIUS: u32 = 4;
const FALSE_COLOR: RGBColor = BLUE;
const TRUE_COLOR: RGBColor = RED;

/// Rendering options that stay fixed for the life of the server.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub title: String,
    /// Side of the square output image, in pixels.
    pub size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: "Points".to_string(),
            size: 600,
        }
    }
}

/// Structured document for `points`, order preserved.
pub fn to_document(points: Vec<Point>) -> PointsDocument {
    PointsDocument::from(points)
}

/// Split `points` by label into the `false` series followed by the `true` series.
///
/// The series order is fixed so the rendered output is byte-stable.
pub fn to_plot(points: &[Point], settings: &RenderSettings) -> ScatterPlot {
    let (positive, negative): (Vec<&Point>, Vec<&Point>) = points.iter().partition(|p| p.label);

    let series = |label: bool, members: Vec<&Point>, color: RGBColor| Series {
        name: format!("label={}", label),
        points: members.into_iter().map(|p| (p.x, p.y)).collect(),
        color,
        style: SeriesStyle::Points {
            radius: MARKER_RADIUS,
        },
    };

    ScatterPlot {
        title: settings.title.clone(),
        viewport: Viewport::square(POINTS_EXTENT, settings.size),
        legend: true,
        grid: true,
        series: vec![
            series(false, negative, FALSE_COLOR),
            series(true, positive, TRUE_COLOR),
        ],
    }
}

/// Render `points` with `renderer`, returning the document verbatim.
pub fn render_image(
    points: &[Point],
    settings: &RenderSettings,
    renderer: &dyn PlotRenderer,
) -> Result<String, RenderError> {
    renderer.render(&to_plot(points, settings))
}
