//! The static "class boundaries" picture served at the root path.
//!
//! A unit circle split by an S-shaped curve made of two half circles of
//! radius 0.5. The picture never changes, so it is rendered once at startup.

use plotters::prelude::BLACK;
use std::f64::consts::PI;

use super::plot::{PlotRenderer, RenderError, ScatterPlot, Series, SeriesStyle, Viewport};

const SAMPLES: usize = 60;
const LINE_WIDTH: u32 = 5;

fn boundary(name: &str, points: Vec<(f64, f64)>) -> Series {
    Series {
        name: name.to_string(),
        points,
        color: BLACK,
        style: SeriesStyle::Line { width: LINE_WIDTH },
    }
}

/// Plot description of the class boundaries.
pub fn class_boundaries(size: u32) -> ScatterPlot {
    let half = SAMPLES / 2;

    let circle = (0..SAMPLES)
        .map(|i| {
            let t = PI * 2.0 * i as f64 / (SAMPLES - 1) as f64;
            (t.sin(), t.cos())
        })
        .collect();
    let upper = (0..half)
        .map(|i| {
            let t = PI * i as f64 / (half - 1) as f64;
            (t.sin() * 0.5, t.cos() * 0.5 + 0.5)
        })
        .collect();
    let lower = (0..half)
        .map(|i| {
            let t = PI * i as f64 / (half - 1) as f64;
            (-t.sin() * 0.5, t.cos() * 0.5 - 0.5)
        })
        .collect();

    ScatterPlot {
        title: "Class boundaries".to_string(),
        viewport: Viewport::square(1.2, size),
        legend: false,
        grid: true,
        series: vec![
            boundary("circle", circle),
            boundary("upper", upper),
            boundary("lower", lower),
        ],
    }
}

/// Render the class boundaries picture.
pub fn render_class_boundaries(
    renderer: &dyn PlotRenderer,
    size: u32,
) -> Result<String, RenderError> {
    renderer.render(&class_boundaries(size))
}
