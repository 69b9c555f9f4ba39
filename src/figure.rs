use crate::chart::Chart;
use crate::data::{Column, Dataset};
use crate::error::{ChartError, Result};
use crate::graph::{parse_color, AxisLabels, Canvas, Colormap, DrawOp, SeriesData, PALETTE};
use crate::stats;
use crate::FigureOptions;
use plotters::style::RGBColor;
use std::collections::HashMap;
use std::path::Path;
use tempfile::NamedTempFile;

/// A figure binds a dataset to a drawing surface.
///
/// Drawing is lazy: [`draw`](Figure::draw) validates a chart against the
/// dataset and queues a resolved operation; [`save`](Figure::save) and
/// [`show`](Figure::show) replay the queue onto a fresh canvas. Because
/// labels are resolved at replay time, setting them after a draw still
/// affects the output, and repeated draws accumulate on one surface.
pub struct Figure {
    dataset: Dataset,
    options: FigureOptions,
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    color_scheme: HashMap<String, String>,
    ops: Vec<(DrawOp, AxisLabels)>,
    // Temp files behind show() stay alive as long as the figure does.
    shown: Vec<NamedTempFile>,
}

impl Figure {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_options(dataset, FigureOptions::default())
    }

    pub fn with_options(dataset: Dataset, options: FigureOptions) -> Self {
        Figure {
            dataset,
            options,
            title: None,
            x_label: None,
            y_label: None,
            color_scheme: HashMap::new(),
            ops: Vec::new(),
            shown: Vec::new(),
        }
    }

    /// Convenience constructor from a JSON mapping of columns.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(Self::new(Dataset::from_json(value)?))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    /// Fixed colors for specific columns, applied when a chart style does
    /// not name a color of its own.
    pub fn with_color_scheme(mut self, scheme: HashMap<String, String>) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Update any subset of the label texts. `None` and the empty string
    /// both leave the current value untouched.
    pub fn set_labels(
        &mut self,
        title: Option<&str>,
        x_label: Option<&str>,
        y_label: Option<&str>,
    ) -> &mut Self {
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            self.title = Some(title.to_string());
        }
        if let Some(x) = x_label.filter(|x| !x.is_empty()) {
            self.x_label = Some(x.to_string());
        }
        if let Some(y) = y_label.filter(|y| !y.is_empty()) {
            self.y_label = Some(y.to_string());
        }
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref()
    }

    pub fn y_label(&self) -> Option<&str> {
        self.y_label.as_deref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Validate a chart against the dataset and queue it for rendering.
    ///
    /// All column lookups and data checks happen here, so a failed draw
    /// leaves the figure exactly as it was.
    pub fn draw(&mut self, chart: &Chart) -> Result<&mut Self> {
        let op = self.resolve(chart)?;
        let defaults = AxisLabels {
            title: chart.default_title().to_string(),
            x: chart.default_x_label().map(str::to_string),
            y: chart.default_y_label().map(str::to_string),
        };
        self.ops.push((op, defaults));
        Ok(self)
    }

    fn resolve(&self, chart: &Chart) -> Result<DrawOp> {
        match chart {
            Chart::Line { x, y, style } => {
                // A text x column behaves like the bar axis: series are
                // plotted at positions 0..n and the values become ticks.
                let (x_values, ticks) = match self.dataset.column(x)? {
                    Column::Number(values) => (values.clone(), None),
                    Column::Text(values) => (
                        (0..values.len()).map(|i| i as f64).collect(),
                        Some(values.clone()),
                    ),
                };
                let series = self.resolve_series(y, style.color.as_deref())?;
                Ok(DrawOp::Line {
                    x: x_values,
                    ticks,
                    series,
                    width: style.width.unwrap_or(2.0).max(1.0).round() as u32,
                    alpha: style.alpha.unwrap_or(1.0),
                })
            }
            Chart::Bar { x, y, style } => {
                let categories = self.dataset.categories(x)?;
                let series = self.resolve_series(y, style.color.as_deref())?;
                Ok(DrawOp::Bar {
                    categories,
                    series,
                    bar_width: style.width,
                    alpha: style.alpha.unwrap_or(1.0),
                })
            }
            Chart::Scatter { x, y, style } => {
                let x_values = self.dataset.numeric(x)?;
                let y_values = self.dataset.numeric(y)?;
                let points = x_values
                    .iter()
                    .copied()
                    .zip(y_values.iter().copied())
                    .collect();
                Ok(DrawOp::Scatter {
                    points,
                    color: self.resolve_color(style.color.as_deref(), y, 0)?,
                    size: style.size.unwrap_or(4.0).max(1.0).round() as i32,
                    alpha: style.alpha.unwrap_or(1.0),
                })
            }
            Chart::Histogram {
                column,
                bins,
                style,
            } => {
                let values = self.dataset.numeric(column)?;
                let (edges, counts) = stats::histogram(values, bins)?;
                Ok(DrawOp::Histogram {
                    edges,
                    counts,
                    color: self.resolve_color(style.color.as_deref(), column, 0)?,
                    alpha: style.alpha.unwrap_or(1.0),
                })
            }
            Chart::Heatmap { style } => {
                let columns = self.dataset.numeric_columns();
                if columns.is_empty() {
                    return Err(ChartError::NoNumericData);
                }
                let names = columns.iter().map(|(n, _)| n.to_string()).collect();
                let matrix = stats::correlation_matrix(&columns);
                let colormap = style
                    .colormap
                    .as_deref()
                    .map(Colormap::from_name)
                    .unwrap_or(Colormap::Coolwarm);
                Ok(DrawOp::Heatmap {
                    names,
                    matrix,
                    colormap,
                })
            }
        }
    }

    fn resolve_series(&self, columns: &[String], style_color: Option<&str>) -> Result<Vec<SeriesData>> {
        if columns.is_empty() {
            return Err(ChartError::InvalidData(
                "at least one y column is required".to_string(),
            ));
        }
        columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                Ok(SeriesData {
                    name: name.clone(),
                    values: self.dataset.numeric(name)?.to_vec(),
                    color: self.resolve_color(style_color, name, idx)?,
                })
            })
            .collect()
    }

    /// Color precedence: explicit style color, then the figure's color
    /// scheme keyed by column name, then the palette rotation.
    fn resolve_color(
        &self,
        style_color: Option<&str>,
        column: &str,
        index: usize,
    ) -> Result<RGBColor> {
        if let Some(spec) = style_color {
            return parse_color(spec)
                .ok_or_else(|| ChartError::InvalidData(format!("unknown color '{}'", spec)));
        }
        if let Some(spec) = self.color_scheme.get(column) {
            return parse_color(spec)
                .ok_or_else(|| ChartError::InvalidData(format!("unknown color '{}'", spec)));
        }
        Ok(PALETTE[index % PALETTE.len()])
    }

    fn effective_labels(&self, defaults: &AxisLabels) -> AxisLabels {
        AxisLabels {
            title: self.title.clone().unwrap_or_else(|| defaults.title.clone()),
            x: self.x_label.clone().or_else(|| defaults.x.clone()),
            y: self.y_label.clone().or_else(|| defaults.y.clone()),
        }
    }

    fn render(&self) -> Result<Canvas> {
        let mut canvas = Canvas::new(self.options.width, self.options.height);
        for (op, defaults) in &self.ops {
            let labels = self.effective_labels(defaults);
            canvas.execute(op, &labels)?;
        }
        Ok(canvas)
    }

    /// Render the queued operations and write the result to `path`. The
    /// image format follows the file extension; PNG is the usual choice.
    ///
    /// Rendering happens in memory before the file is touched, so a failed
    /// write leaves no partial output and the figure stays usable.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.render()?.save(path.as_ref())?;
        Ok(self)
    }

    /// Render to PNG bytes without touching the filesystem.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.render()?.to_png()
    }

    /// Render to a temporary PNG and hand it to the platform's opener.
    ///
    /// Rendering and writing the file are fallible; failure to launch a
    /// viewer is ignored so headless environments behave.
    pub fn show(&mut self) -> Result<&mut Self> {
        let canvas = self.render()?;
        let file = tempfile::Builder::new()
            .prefix("chartkit-")
            .suffix(".png")
            .tempfile()?;
        canvas.save(file.path())?;
        let _ = open::that(file.path());
        self.shown.push(file);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Bins;
    use crate::data::Column;
    use serde_json::json;

    fn sample_figure() -> Figure {
        Figure::from_json(&json!({
            "Category": ["A", "B", "C", "D"],
            "Values1": [10, 15, 20, 25],
            "Values2": [20, 25, 30, 35],
        }))
        .unwrap()
    }

    #[test]
    fn test_set_labels_ignores_none_and_empty() {
        let mut figure = sample_figure().with_title("Before");
        figure.set_labels(None, Some("X"), None);
        assert_eq!(figure.title(), Some("Before"));
        assert_eq!(figure.x_label(), Some("X"));
        assert_eq!(figure.y_label(), None);

        figure.set_labels(Some(""), Some(""), Some("Y"));
        assert_eq!(figure.title(), Some("Before"));
        assert_eq!(figure.x_label(), Some("X"));
        assert_eq!(figure.y_label(), Some("Y"));
    }

    #[test]
    fn test_draw_queues_all_kinds() {
        let mut figure = sample_figure();
        figure.draw(&Chart::bar("Category", ["Values1", "Values2"])).unwrap();
        figure.draw(&Chart::scatter("Values1", "Values2")).unwrap();
        figure.draw(&Chart::histogram("Values1")).unwrap();
        figure.draw(&Chart::heatmap()).unwrap();
        assert_eq!(figure.ops.len(), 4);
    }

    #[test]
    fn test_draw_missing_column_leaves_figure_unchanged() {
        let mut figure = sample_figure();
        let result = figure.draw(&Chart::scatter("Values1", "Missing"));
        assert!(matches!(result, Err(ChartError::ColumnNotFound(name)) if name == "Missing"));
        assert!(figure.ops.is_empty());
        assert_eq!(figure.title(), None);
    }

    #[test]
    fn test_draw_line_with_categorical_x() {
        let mut figure = sample_figure();
        figure
            .draw(&Chart::line("Category", ["Values1", "Values2"]))
            .unwrap();

        match &figure.ops[0].0 {
            DrawOp::Line { x, ticks, series, .. } => {
                assert_eq!(x, &[0.0, 1.0, 2.0, 3.0]);
                assert_eq!(
                    ticks.as_deref(),
                    Some(&["A".to_string(), "B".into(), "C".into(), "D".into()][..])
                );
                assert_eq!(series.len(), 2);
            }
            other => panic!("expected a line op, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_line_numeric_x_has_no_ticks() {
        let mut figure = sample_figure();
        figure.draw(&Chart::line("Values1", ["Values2"])).unwrap();
        match &figure.ops[0].0 {
            DrawOp::Line { x, ticks, .. } => {
                assert_eq!(x, &[10.0, 15.0, 20.0, 25.0]);
                assert!(ticks.is_none());
            }
            other => panic!("expected a line op, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_line_rejects_text_y_column() {
        let mut figure = sample_figure();
        let result = figure.draw(&Chart::line("Values1", ["Category"]));
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn test_draw_line_rejects_empty_series_list() {
        let mut figure = sample_figure();
        let result = figure.draw(&Chart::line("Values1", Vec::<String>::new()));
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn test_heatmap_requires_numeric_columns() {
        let dataset = Dataset::new(vec![(
            "label".to_string(),
            Column::Text(vec!["a".into(), "b".into()]),
        )])
        .unwrap();
        let mut figure = Figure::new(dataset);
        let result = figure.draw(&Chart::heatmap());
        assert!(matches!(result, Err(ChartError::NoNumericData)));
    }

    #[test]
    fn test_histogram_bad_bins_rejected_at_draw() {
        let mut figure = sample_figure();
        let chart = Chart::Histogram {
            column: "Values1".to_string(),
            bins: Bins::Count(0),
            style: Default::default(),
        };
        assert!(matches!(
            figure.draw(&chart),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn test_color_scheme_beats_palette() {
        let scheme = HashMap::from([("Values1".to_string(), "#112233".to_string())]);
        let mut figure = sample_figure().with_color_scheme(scheme);
        figure.draw(&Chart::bar("Category", ["Values1", "Values2"])).unwrap();

        match &figure.ops[0].0 {
            DrawOp::Bar { series, .. } => {
                assert_eq!(series[0].color, RGBColor(0x11, 0x22, 0x33));
                // Second series has no scheme entry and rotates the palette.
                assert_eq!(series[1].color, PALETTE[1]);
            }
            other => panic!("expected a bar op, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_color_is_invalid_data() {
        let mut figure = sample_figure();
        let chart = Chart::Scatter {
            x: "Values1".to_string(),
            y: "Values2".to_string(),
            style: crate::graph::PointStyle {
                color: Some("not-a-color".to_string()),
                ..Default::default()
            },
        };
        assert!(matches!(
            figure.draw(&chart),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn test_labels_set_after_draw_apply_at_render() {
        let mut figure = sample_figure();
        figure.draw(&Chart::histogram("Values1")).unwrap();
        figure.set_labels(Some("Distribution"), None, None);

        let labels = figure.effective_labels(&figure.ops[0].1);
        assert_eq!(labels.title, "Distribution");
        // Unset labels fall back to the chart kind's defaults.
        assert_eq!(labels.x.as_deref(), Some("Values1"));
        assert_eq!(labels.y.as_deref(), Some("Frequency"));
    }

    #[test]
    fn test_render_accumulates_ops() {
        let mut figure = sample_figure();
        figure.draw(&Chart::bar("Category", ["Values1"])).unwrap();
        figure.draw(&Chart::line("Values1", ["Values2"])).unwrap();
        let png = figure.to_png().unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
