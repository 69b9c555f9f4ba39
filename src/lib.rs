//! chartkit renders tabular data to PNG charts.
//!
//! A [`Dataset`] holds named columns, a [`Chart`] describes what to draw,
//! and a [`Figure`] ties the two together:
//!
//! ```no_run
//! use chartkit::{Chart, Figure};
//! use serde_json::json;
//!
//! let mut figure = Figure::from_json(&json!({
//!     "Category": ["A", "B", "C"],
//!     "Sales": [10, 25, 15],
//! }))?
//! .with_title("Quarterly Sales");
//!
//! figure.draw(&Chart::bar("Category", ["Sales"]))?;
//! figure.save("sales.png")?;
//! # Ok::<(), chartkit::ChartError>(())
//! ```

pub mod chart;
pub mod data;
pub mod error;
pub mod figure;
pub mod graph;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use chart::{Bins, Chart};
pub use data::{Column, Dataset};
pub use error::{ChartError, Result};
pub use figure::Figure;
pub use graph::{
    parse_color, BarStyle, Colormap, HeatmapStyle, HistogramStyle, LineStyle, PointStyle, PALETTE,
};

/// Output surface dimensions in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

impl Default for FigureOptions {
    fn default() -> Self {
        FigureOptions {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl FigureOptions {
    pub fn new(width: u32, height: u32) -> Self {
        FigureOptions { width, height }
    }
}
