use crate::graph::{BarStyle, HeatmapStyle, HistogramStyle, LineStyle, PointStyle};

/// Histogram bin specification: a bin count over the sample range, or
/// explicit ascending edges.
#[derive(Debug, Clone, PartialEq)]
pub enum Bins {
    Count(usize),
    Edges(Vec<f64>),
}

impl Default for Bins {
    fn default() -> Self {
        Bins::Count(10)
    }
}

/// The closed set of chart kinds and their parameters.
///
/// A chart is a description only; drawing it against a dataset happens in
/// [`Figure::draw`](crate::Figure::draw).
#[derive(Debug, Clone)]
pub enum Chart {
    /// One line series per y column, plotted against the x column.
    Line {
        x: String,
        y: Vec<String>,
        style: LineStyle,
    },
    /// Grouped bars: one series per y column, categories from the x column.
    Bar {
        x: String,
        y: Vec<String>,
        style: BarStyle,
    },
    /// A single point cloud.
    Scatter {
        x: String,
        y: String,
        style: PointStyle,
    },
    /// Frequency distribution of one column.
    Histogram {
        column: String,
        bins: Bins,
        style: HistogramStyle,
    },
    /// Correlation grid over the dataset's numeric columns.
    Heatmap { style: HeatmapStyle },
}

impl Chart {
    pub fn line<S, I, T>(x: S, y: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Chart::Line {
            x: x.into(),
            y: y.into_iter().map(Into::into).collect(),
            style: LineStyle::default(),
        }
    }

    pub fn bar<S, I, T>(x: S, y: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Chart::Bar {
            x: x.into(),
            y: y.into_iter().map(Into::into).collect(),
            style: BarStyle::default(),
        }
    }

    pub fn scatter(x: impl Into<String>, y: impl Into<String>) -> Self {
        Chart::Scatter {
            x: x.into(),
            y: y.into(),
            style: PointStyle::default(),
        }
    }

    pub fn histogram(column: impl Into<String>) -> Self {
        Chart::Histogram {
            column: column.into(),
            bins: Bins::default(),
            style: HistogramStyle::default(),
        }
    }

    pub fn heatmap() -> Self {
        Chart::Heatmap {
            style: HeatmapStyle::default(),
        }
    }

    /// Title used when the figure never had one set.
    pub(crate) fn default_title(&self) -> &'static str {
        match self {
            Chart::Line { .. } => "Line Plot",
            Chart::Bar { .. } => "Bar Plot",
            Chart::Scatter { .. } => "Scatter Plot",
            Chart::Histogram { .. } => "Histogram",
            Chart::Heatmap { .. } => "Heatmap",
        }
    }

    /// X-axis label used when the figure never had one set. The heatmap has
    /// none: axis labels carry no meaning on a correlation grid.
    pub(crate) fn default_x_label(&self) -> Option<&str> {
        match self {
            Chart::Line { x, .. } | Chart::Bar { x, .. } | Chart::Scatter { x, .. } => Some(x),
            Chart::Histogram { column, .. } => Some(column),
            Chart::Heatmap { .. } => None,
        }
    }

    /// Y-axis label used when the figure never had one set.
    pub(crate) fn default_y_label(&self) -> Option<&str> {
        match self {
            Chart::Line { .. } | Chart::Bar { .. } => Some("Values"),
            Chart::Scatter { y, .. } => Some(y),
            Chart::Histogram { .. } => Some("Frequency"),
            Chart::Heatmap { .. } => None,
        }
    }
}
