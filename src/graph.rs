use crate::error::{ChartError, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::ops::Range;
use std::path::Path;

/// Style configuration for line charts
#[derive(Debug, Clone, Default)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for scatter charts
#[derive(Debug, Clone, Default)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for bar charts. `width` is in category units and
/// overrides the computed group width.
#[derive(Debug, Clone, Default)]
pub struct BarStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
    pub width: Option<f64>,
}

/// Style configuration for histograms
#[derive(Debug, Clone, Default)]
pub struct HistogramStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

/// Style configuration for heatmaps
#[derive(Debug, Clone, Default)]
pub struct HeatmapStyle {
    pub colormap: Option<String>,
}

/// Series colors used when neither an explicit style color nor a
/// color-scheme entry applies.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // blue
    RGBColor(231, 76, 60),   // red
    RGBColor(46, 204, 113),  // green
    RGBColor(155, 89, 182),  // purple
    RGBColor(243, 156, 18),  // orange
    RGBColor(26, 188, 156),  // teal
    RGBColor(233, 30, 99),   // pink
    RGBColor(0, 188, 212),   // cyan
    RGBColor(121, 85, 72),   // brown
    RGBColor(96, 125, 139),  // blue grey
];

/// Parse a color name or `#rrggbb` hex string.
pub fn parse_color(color: &str) -> Option<RGBColor> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(RGBColor(r, g, b));
        }
        return None;
    }
    match color {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "black" => Some(BLACK),
        "yellow" => Some(YELLOW),
        "cyan" => Some(CYAN),
        "magenta" => Some(MAGENTA),
        "white" => Some(WHITE),
        "orange" => Some(RGBColor(255, 165, 0)),
        "purple" => Some(RGBColor(128, 0, 128)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        _ => None,
    }
}

/// Colormap for heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Coolwarm,
    Viridis,
    Grayscale,
}

impl Colormap {
    /// Look up a colormap by name; unknown names fall back to coolwarm.
    pub fn from_name(name: &str) -> Self {
        match name {
            "viridis" => Colormap::Viridis,
            "gray" | "grey" | "grayscale" => Colormap::Grayscale,
            _ => Colormap::Coolwarm,
        }
    }

    /// Map a normalized value in [0, 1] to a color. NaN maps to a neutral
    /// gray so degenerate correlation cells stay visible but unjudged.
    pub fn color(&self, t: f64) -> RGBColor {
        if t.is_nan() {
            return RGBColor(160, 160, 160);
        }
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Coolwarm => {
                // Blue through near-white to red, two linear segments.
                let (lo, mid, hi) = ((59, 76, 192), (221, 221, 221), (180, 4, 38));
                if t < 0.5 {
                    lerp_rgb(lo, mid, t * 2.0)
                } else {
                    lerp_rgb(mid, hi, (t - 0.5) * 2.0)
                }
            }
            Colormap::Viridis => {
                const STOPS: [(u8, u8, u8); 5] = [
                    (68, 1, 84),
                    (59, 82, 139),
                    (33, 145, 140),
                    (94, 201, 98),
                    (253, 231, 37),
                ];
                let scaled = t * (STOPS.len() - 1) as f64;
                let idx = (scaled.floor() as usize).min(STOPS.len() - 2);
                lerp_rgb(STOPS[idx], STOPS[idx + 1], scaled - idx as f64)
            }
            Colormap::Grayscale => {
                let v = (t * 255.0) as u8;
                RGBColor(v, v, v)
            }
        }
    }
}

fn lerp_rgb(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

/// Axis text resolved for one draw operation.
#[derive(Debug, Clone)]
pub(crate) struct AxisLabels {
    pub title: String,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// One named series with its resolved color.
#[derive(Debug, Clone)]
pub(crate) struct SeriesData {
    pub name: String,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

/// A draw operation with all data and colors already resolved against the
/// dataset. The canvas executes these blindly.
#[derive(Debug, Clone)]
pub(crate) enum DrawOp {
    Line {
        x: Vec<f64>,
        // Present when the x column was categorical: x holds positions
        // 0..n and these are the tick texts.
        ticks: Option<Vec<String>>,
        series: Vec<SeriesData>,
        width: u32,
        alpha: f64,
    },
    Bar {
        categories: Vec<String>,
        series: Vec<SeriesData>,
        bar_width: Option<f64>,
        alpha: f64,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        size: i32,
        alpha: f64,
    },
    Histogram {
        edges: Vec<f64>,
        counts: Vec<usize>,
        color: RGBColor,
        alpha: f64,
    },
    Heatmap {
        names: Vec<String>,
        matrix: Vec<Vec<f64>>,
        colormap: Colormap,
    },
}

/// Tick text for a mesh position on a categorical axis. Categories sit at
/// integer positions; anything else gets no label.
pub(crate) fn index_tick_label(ticks: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < ticks.len() {
        ticks[idx as usize].clone()
    } else {
        String::new()
    }
}

/// Grouped-bar geometry: the effective bar width and the symmetric
/// per-series offsets around each category tick.
pub(crate) fn dodge_layout(n_series: usize, width_override: Option<f64>) -> (f64, Vec<f64>) {
    let width = width_override.unwrap_or(0.8 / n_series.max(1) as f64);
    let offsets = (0..n_series)
        .map(|i| (i as f64 - (n_series as f64 - 1.0) / 2.0) * width)
        .collect();
    (width, offsets)
}

/// All bar rectangles for a grouped bar chart, as (top-left, bottom-right)
/// pairs in data coordinates. Category ticks sit at integer positions and
/// each group straddles its tick.
pub(crate) fn bar_rectangles(
    series: &[&[f64]],
    width_override: Option<f64>,
) -> Vec<((f64, f64), (f64, f64))> {
    let (width, offsets) = dodge_layout(series.len(), width_override);
    let mut rects = Vec::new();
    for (series_idx, values) in series.iter().enumerate() {
        for (cat_idx, &value) in values.iter().enumerate() {
            let center = cat_idx as f64 + offsets[series_idx];
            rects.push(((center - width / 2.0, value), (center + width / 2.0, 0.0)));
        }
    }
    rects
}

/// Data range with 5% padding on each side, widened to a unit span when the
/// data is a single point.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = f64::min(min, v);
        max = f64::max(max, v);
    }
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Value range for bar-like charts: anchored at zero, padded at the top.
fn value_range_from_zero(values: impl Iterator<Item = f64>) -> Range<f64> {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min == 0.0 && max == 0.0 {
        return 0.0..1.0;
    }
    let padding = (max - min) * 0.05;
    (if min < 0.0 { min - padding } else { 0.0 })..(max + padding)
}

/// Rendering surface: an RGB pixel buffer the draw operations compose onto.
pub(crate) struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        // White background; draw operations layer on top without clearing.
        let buffer = vec![255u8; (width * height * 3) as usize];
        Canvas {
            buffer,
            width,
            height,
        }
    }

    pub fn execute(&mut self, op: &DrawOp, labels: &AxisLabels) -> Result<()> {
        match op {
            DrawOp::Line {
                x,
                ticks,
                series,
                width,
                alpha,
            } => self.draw_line(labels, x, ticks.as_deref(), series, *width, *alpha),
            DrawOp::Bar {
                categories,
                series,
                bar_width,
                alpha,
            } => self.draw_bars(labels, categories, series, *bar_width, *alpha),
            DrawOp::Scatter {
                points,
                color,
                size,
                alpha,
            } => self.draw_scatter(labels, points, *color, *size, *alpha),
            DrawOp::Histogram {
                edges,
                counts,
                color,
                alpha,
            } => self.draw_histogram(labels, edges, counts, *color, *alpha),
            DrawOp::Heatmap {
                names,
                matrix,
                colormap,
            } => self.draw_heatmap(labels, names, matrix, *colormap),
        }
    }

    fn draw_line(
        &mut self,
        labels: &AxisLabels,
        x: &[f64],
        ticks: Option<&[String]>,
        series: &[SeriesData],
        width: u32,
        alpha: f64,
    ) -> Result<()> {
        let x_range = padded_range(x.iter().copied());
        let y_range = padded_range(series.iter().flat_map(|s| s.values.iter().copied()));

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&labels.title, ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(ChartError::render)?;

        let tick_formatter = |x: &f64| match ticks {
            Some(ticks) => index_tick_label(ticks, *x),
            None => String::new(),
        };
        let mut mesh = chart.configure_mesh();
        if let Some(ticks) = ticks {
            mesh.x_labels(ticks.len())
                .x_label_formatter(&tick_formatter);
        }
        if let Some(x_label) = &labels.x {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &labels.y {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(ChartError::render)?;

        for s in series {
            let color = s.color;
            let points: Vec<(f64, f64)> =
                x.iter().copied().zip(s.values.iter().copied()).collect();
            chart
                .draw_series(LineSeries::new(points, color.mix(alpha).stroke_width(width)))
                .map_err(ChartError::render)?
                .label(s.name.clone())
                .legend(move |(lx, ly)| {
                    PathElement::new(vec![(lx, ly), (lx + 12, ly)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(ChartError::render)?;

        root.present().map_err(ChartError::render)?;
        Ok(())
    }

    fn draw_bars(
        &mut self,
        labels: &AxisLabels,
        categories: &[String],
        series: &[SeriesData],
        bar_width: Option<f64>,
        alpha: f64,
    ) -> Result<()> {
        // Category i is centered at position i so its tick label sits under
        // the middle of the group.
        let x_range = -0.5..(categories.len() as f64 - 0.5);
        let y_range = value_range_from_zero(series.iter().flat_map(|s| s.values.iter().copied()));
        let (width, offsets) = dodge_layout(series.len(), bar_width);

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&labels.title, ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(ChartError::render)?;

        let ticks = categories.to_vec();
        let tick_formatter = |x: &f64| index_tick_label(&ticks, *x);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(categories.len())
            .x_label_formatter(&tick_formatter);
        if let Some(x_label) = &labels.x {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &labels.y {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(ChartError::render)?;

        for (series_idx, s) in series.iter().enumerate() {
            let color = s.color;
            let offset = offsets[series_idx];
            chart
                .draw_series(s.values.iter().enumerate().map(|(cat_idx, &value)| {
                    let center = cat_idx as f64 + offset;
                    Rectangle::new(
                        [(center - width / 2.0, 0.0), (center + width / 2.0, value)],
                        color.mix(alpha).filled(),
                    )
                }))
                .map_err(ChartError::render)?
                .label(s.name.clone())
                .legend(move |(lx, ly)| {
                    Rectangle::new([(lx, ly - 5), (lx + 10, ly + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(ChartError::render)?;

        root.present().map_err(ChartError::render)?;
        Ok(())
    }

    fn draw_scatter(
        &mut self,
        labels: &AxisLabels,
        points: &[(f64, f64)],
        color: RGBColor,
        size: i32,
        alpha: f64,
    ) -> Result<()> {
        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1));

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&labels.title, ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(ChartError::render)?;

        let mut mesh = chart.configure_mesh();
        if let Some(x_label) = &labels.x {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &labels.y {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(ChartError::render)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), size, color.mix(alpha).filled())),
            )
            .map_err(ChartError::render)?;

        root.present().map_err(ChartError::render)?;
        Ok(())
    }

    fn draw_histogram(
        &mut self,
        labels: &AxisLabels,
        edges: &[f64],
        counts: &[usize],
        color: RGBColor,
        alpha: f64,
    ) -> Result<()> {
        let x_range = edges[0]..edges[edges.len() - 1];
        let max_count = counts.iter().copied().max().unwrap_or(0) as f64;
        let y_range = 0.0..(max_count * 1.1).max(1.0);

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&labels.title, ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(ChartError::render)?;

        let mut mesh = chart.configure_mesh();
        if let Some(x_label) = &labels.x {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &labels.y {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(ChartError::render)?;

        chart
            .draw_series(counts.iter().enumerate().map(|(bin, &count)| {
                Rectangle::new(
                    [(edges[bin], 0.0), (edges[bin + 1], count as f64)],
                    color.mix(alpha).filled(),
                )
            }))
            .map_err(ChartError::render)?;

        root.present().map_err(ChartError::render)?;
        Ok(())
    }

    fn draw_heatmap(
        &mut self,
        labels: &AxisLabels,
        names: &[String],
        matrix: &[Vec<f64>],
        colormap: Colormap,
    ) -> Result<()> {
        let n = names.len();
        let colorbar_width = 90;

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        let (main, side) = root.split_horizontally(self.width as i32 - colorbar_width);

        // Cell (row, col) is centered at integer coordinates so the tick
        // labels line up with cell centers.
        let mut chart = ChartBuilder::on(&main)
            .margin(10)
            .caption(&labels.title, ("sans-serif", 24))
            .x_label_area_size(70)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), -0.5..(n as f64 - 0.5))
            .map_err(ChartError::render)?;

        let x_ticks = names.to_vec();
        // Row 0 is drawn at the top, so the y axis reads downward.
        let y_ticks: Vec<String> = names.iter().rev().cloned().collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|v| index_tick_label(&x_ticks, *v))
            .y_label_formatter(&|v| index_tick_label(&y_ticks, *v))
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_style(("sans-serif", 12))
            .draw()
            .map_err(ChartError::render)?;

        chart
            .draw_series((0..n).flat_map(|row| {
                let matrix_row = &matrix[row];
                (0..n).map(move |col| {
                    let value = matrix_row[col];
                    // Correlation lives in [-1, 1]; normalize for the colormap.
                    let t = (value + 1.0) / 2.0;
                    let y_center = (n - 1 - row) as f64;
                    Rectangle::new(
                        [
                            (col as f64 - 0.5, y_center - 0.5),
                            (col as f64 + 0.5, y_center + 0.5),
                        ],
                        colormap.color(t).filled(),
                    )
                })
            }))
            .map_err(ChartError::render)?;

        // Side colorbar: vertical gradient from -1 at the bottom to +1 at
        // the top, with its own value axis.
        let mut bar = ChartBuilder::on(&side)
            .margin(10)
            .y_label_area_size(36)
            .x_label_area_size(70)
            .build_cartesian_2d(0.0..1.0, -1.0..1.0)
            .map_err(ChartError::render)?;

        bar.configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .disable_x_axis()
            .y_labels(5)
            .draw()
            .map_err(ChartError::render)?;

        let steps = 64;
        bar.draw_series((0..steps).map(|i| {
            let lo = -1.0 + 2.0 * i as f64 / steps as f64;
            let hi = -1.0 + 2.0 * (i + 1) as f64 / steps as f64;
            let t = (lo + 1.0) / 2.0;
            Rectangle::new([(0.0, lo), (1.0, hi)], colormap.color(t).filled())
        }))
        .map_err(ChartError::render)?;

        root.present().map_err(ChartError::render)?;
        Ok(())
    }

    /// Encode the current surface as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&self.buffer, self.width, self.height, image::ColorType::Rgb8)
                .map_err(image_error)?;
        }
        Ok(png_bytes)
    }

    /// Write the surface to a file; the format follows the path extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        image::save_buffer(
            path,
            &self.buffer,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
        .map_err(image_error)
    }
}

fn image_error(err: image::ImageError) -> ChartError {
    match err {
        image::ImageError::IoError(io) => ChartError::Io(io),
        other => ChartError::Render(other.to_string()),
    }
}
