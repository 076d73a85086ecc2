//! Plot description and the SVG renderer behind it.
//!
//! Callers describe what to draw with a [`ScatterPlot`] and hand it to a
//! [`PlotRenderer`]. The only renderer shipped is [`SvgRenderer`], which draws
//! with plotters' SVG backend into an in-memory string, so identical input
//! always produces identical bytes.

use plotters::prelude::*;
use std::ops::Range;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Errors raised while drawing a plot.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Render error: {0}")]
    Backend(String),
    #[error("Invalid plot: {0}")]
    InvalidPlot(String),
}

fn backend_err<E: std::fmt::Display>(stage: &'static str) -> impl FnOnce(E) -> RenderError {
    move |e| RenderError::Backend(format!("{}: {}", stage, e))
}

/// How one series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Discrete markers, no connecting line.
    Points { radius: u32 },
    /// Polyline through the points in order.
    Line { width: u32 },
}

/// One named, styled list of `(x, y)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub style: SeriesStyle,
}

/// Data ranges plus the pixel size of the output image.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Square viewport covering `[-extent, extent]` on both axes.
    pub fn square(extent: f64, size: u32) -> Self {
        Self {
            x_range: -extent..extent,
            y_range: -extent..extent,
            width: size,
            height: size,
        }
    }
}

/// Everything a renderer needs to draw one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub title: String,
    pub viewport: Viewport,
    pub legend: bool,
    pub grid: bool,
    /// Drawn in order; later series paint over earlier ones.
    pub series: Vec<Series>,
}

/// Turns a plot description into an encoded image document.
pub trait PlotRenderer: Send + Sync {
    /// Content type of the documents this renderer produces.
    fn content_type(&self) -> &'static str;

    fn render(&self, plot: &ScatterPlot) -> Result<String, RenderError>;
}

/// Renders plots as SVG documents using plotters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PlotRenderer for SvgRenderer {
    fn content_type(&self) -> &'static str {
        SVG_CONTENT_TYPE
    }

    fn render(&self, plot: &ScatterPlot) -> Result<String, RenderError> {
        let viewport = &plot.viewport;
        if viewport.width == 0 || viewport.height == 0 {
            return Err(RenderError::InvalidPlot(format!(
                "image size must be positive, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        if !(viewport.x_range.start < viewport.x_range.end
            && viewport.y_range.start < viewport.y_range.end)
        {
            return Err(RenderError::InvalidPlot(format!(
                "empty viewport {:?} x {:?}",
                viewport.x_range, viewport.y_range
            )));
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (viewport.width, viewport.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(backend_err("fill canvas"))?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&plot.title, ("sans-serif", 24).into_font())
                .margin(15)
                .x_label_area_size(30)
                .y_label_area_size(40)
                .build_cartesian_2d(viewport.x_range.clone(), viewport.y_range.clone())
                .map_err(backend_err("build chart"))?;

            let mut mesh = chart.configure_mesh();
            if !plot.grid {
                mesh.disable_mesh();
            }
            mesh.draw().map_err(backend_err("draw mesh"))?;

            for series in &plot.series {
                let color = series.color;
                match series.style {
                    SeriesStyle::Points { radius } => {
                        let style = color.filled();
                        let markers = series
                            .points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), radius, style));
                        chart
                            .draw_series(markers)
                            .map_err(backend_err("draw points"))?
                            .label(series.name.as_str())
                            .legend(move |(x, y)| Circle::new((x, y), radius, style));
                    }
                    SeriesStyle::Line { width } => {
                        let style = color.stroke_width(width);
                        chart
                            .draw_series(LineSeries::new(series.points.iter().copied(), style))
                            .map_err(backend_err("draw line"))?
                            .label(series.name.as_str())
                            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                    }
                }
            }

            if plot.legend {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()
                    .map_err(backend_err("draw legend"))?;
            }

            root.present().map_err(backend_err("render chart"))?;
        }

        Ok(svg)
    }
}
