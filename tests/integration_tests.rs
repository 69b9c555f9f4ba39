use chartkit::{Bins, Chart, ChartError, Dataset, Figure, FigureOptions, HeatmapStyle, LineStyle};
use serde_json::json;
use tempfile::TempDir;

fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn sample_figure() -> Figure {
    Figure::from_json(&json!({
        "Category": ["A", "B", "C", "D"],
        "Values1": [10, 15, 20, 25],
        "Values2": [20, 25, 30, 35],
    }))
    .unwrap()
}

#[test]
fn test_save_line_chart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.png");

    let mut figure = sample_figure().with_title("Trend");
    figure
        .draw(&Chart::line("Values1", ["Values2"]))
        .unwrap()
        .save(&path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(is_valid_png(&bytes));
}

#[test]
fn test_save_line_chart_with_categorical_x() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line_categories.png");

    let mut figure = sample_figure();
    figure
        .draw(&Chart::line("Category", ["Values1", "Values2"]))
        .unwrap()
        .save(&path)
        .unwrap();

    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_show_twice_keeps_figure_usable() {
    let mut figure = sample_figure();
    figure.draw(&Chart::scatter("Values1", "Values2")).unwrap();

    // Viewer launch is best-effort, so show never fails on a headless
    // host; only render or file errors would surface here.
    figure.show().unwrap();
    figure.show().unwrap();

    assert!(is_valid_png(&figure.to_png().unwrap()));
}

#[test]
fn test_save_grouped_bar_chart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bars.png");

    let mut figure = sample_figure();
    figure
        .draw(&Chart::bar("Category", ["Values1", "Values2"]))
        .unwrap()
        .save(&path)
        .unwrap();

    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_save_scatter_chart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scatter.png");

    let mut figure = sample_figure();
    figure
        .draw(&Chart::scatter("Values1", "Values2"))
        .unwrap()
        .save(&path)
        .unwrap();

    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_save_histogram_with_explicit_bins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hist.png");

    let mut figure = sample_figure();
    let chart = Chart::Histogram {
        column: "Values1".to_string(),
        bins: Bins::Edges(vec![0.0, 10.0, 20.0, 30.0]),
        style: Default::default(),
    };
    figure.draw(&chart).unwrap().save(&path).unwrap();

    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_save_heatmap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("heatmap.png");

    let mut figure = sample_figure();
    let chart = Chart::Heatmap {
        style: HeatmapStyle {
            colormap: Some("viridis".to_string()),
        },
    };
    figure.draw(&chart).unwrap().save(&path).unwrap();

    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_repeated_saves_of_one_figure() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    let mut figure = sample_figure();
    figure.draw(&Chart::histogram("Values2")).unwrap();
    figure.save(&first).unwrap();
    figure.save(&second).unwrap();

    assert!(is_valid_png(&std::fs::read(&first).unwrap()));
    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_labels_set_after_draw_are_honored() {
    let dir = TempDir::new().unwrap();
    let defaults = dir.path().join("defaults.png");
    let labeled = dir.path().join("labeled.png");

    let mut figure = sample_figure();
    figure.draw(&Chart::bar("Category", ["Values1"])).unwrap();
    figure.save(&defaults).unwrap();

    figure.set_labels(Some("Quarterly Totals"), Some("Quarter"), Some("Units"));
    figure.save(&labeled).unwrap();

    let default_bytes = std::fs::read(&defaults).unwrap();
    let labeled_bytes = std::fs::read(&labeled).unwrap();
    assert!(is_valid_png(&labeled_bytes));
    assert_ne!(default_bytes, labeled_bytes);
}

#[test]
fn test_draws_accumulate_on_one_surface() {
    let mut line_only = sample_figure();
    line_only.draw(&Chart::line("Values1", ["Values2"])).unwrap();
    let single = line_only.to_png().unwrap();

    let mut stacked = sample_figure();
    stacked.draw(&Chart::line("Values1", ["Values2"])).unwrap();
    stacked
        .draw(&Chart::scatter("Values1", "Values2"))
        .unwrap();
    let double = stacked.to_png().unwrap();

    assert!(is_valid_png(&single));
    assert!(is_valid_png(&double));
    assert_ne!(single, double);
}

#[test]
fn test_custom_dimensions() {
    let dataset = Dataset::from_json(&json!({ "v": [1, 2, 3] })).unwrap();
    let mut figure = Figure::with_options(dataset, FigureOptions::new(320, 200));
    figure.draw(&Chart::histogram("v")).unwrap();
    assert!(is_valid_png(&figure.to_png().unwrap()));
}

#[test]
fn test_styled_line_chart() {
    let mut figure = sample_figure();
    let chart = Chart::Line {
        x: "Values1".to_string(),
        y: vec!["Values2".to_string()],
        style: LineStyle {
            color: Some("#663399".to_string()),
            width: Some(3.0),
            alpha: Some(0.8),
        },
    };
    figure.draw(&chart).unwrap();
    assert!(is_valid_png(&figure.to_png().unwrap()));
}

#[test]
fn test_missing_column_error() {
    let mut figure = sample_figure();
    let result = figure.draw(&Chart::line("Values1", ["Nope"]));
    assert!(matches!(result, Err(ChartError::ColumnNotFound(name)) if name == "Nope"));
}

#[test]
fn test_heatmap_without_numeric_columns() {
    let mut figure = Figure::from_json(&json!({ "label": ["a", "b"] })).unwrap();
    let result = figure.draw(&Chart::heatmap());
    assert!(matches!(result, Err(ChartError::NoNumericData)));
}

#[test]
fn test_invalid_json_input() {
    let result = Figure::from_json(&json!([1, 2, 3]));
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn test_save_to_bad_directory_is_io_error() {
    let mut figure = sample_figure();
    figure.draw(&Chart::histogram("Values1")).unwrap();
    let result = figure.save("/nonexistent-dir/plot.png");
    assert!(matches!(result, Err(ChartError::Io(_))));
}

#[test]
fn test_csv_round_trip_to_chart() {
    let csv = "Month,Revenue\nJan,120\nFeb,95\nMar,140\n";
    let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
    let mut figure = Figure::new(dataset).with_y_label("kUSD");
    figure.draw(&Chart::bar("Month", ["Revenue"])).unwrap();
    assert!(is_valid_png(&figure.to_png().unwrap()));
}
