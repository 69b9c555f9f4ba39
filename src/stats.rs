//! Numeric summaries backing the histogram and heatmap operations.

use crate::chart::Bins;
use crate::error::{ChartError, Result};

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns NaN when either sample has zero variance or fewer than two
/// observations, matching how tabular libraries report degenerate pairs.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Pairwise correlation matrix over the given columns. Cell (i, j) holds
/// the Pearson coefficient of columns i and j; the diagonal is 1.
pub fn correlation_matrix(columns: &[(&str, &[f64])]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            matrix[i][j] = if i == j {
                1.0
            } else if j < i {
                matrix[j][i]
            } else {
                pearson(columns[i].1, columns[j].1)
            };
        }
    }
    matrix
}

/// Bin a sample into a frequency distribution.
///
/// Returns the bin edges (one more edge than bins) and the per-bin counts.
/// With `Bins::Count`, edges are equally spaced over the sample range; the
/// top edge is inclusive so the maximum lands in the last bin. Explicit
/// edges must be strictly increasing; values outside them are dropped.
pub fn histogram(values: &[f64], bins: &Bins) -> Result<(Vec<f64>, Vec<usize>)> {
    if values.is_empty() {
        return Err(ChartError::InvalidData(
            "cannot build a histogram from an empty column".to_string(),
        ));
    }

    let edges = match bins {
        Bins::Count(count) => {
            if *count == 0 {
                return Err(ChartError::InvalidData(
                    "histogram bin count must be positive".to_string(),
                ));
            }
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            // Degenerate range: pad so every value falls in a real bin.
            let (min, max) = if min == max {
                (min - 0.5, max + 0.5)
            } else {
                (min, max)
            };
            let step = (max - min) / *count as f64;
            (0..=*count).map(|i| min + step * i as f64).collect()
        }
        Bins::Edges(edges) => {
            if edges.len() < 2 {
                return Err(ChartError::InvalidData(
                    "histogram needs at least two bin edges".to_string(),
                ));
            }
            if edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(ChartError::InvalidData(
                    "histogram bin edges must be strictly increasing".to_string(),
                ));
            }
            edges.clone()
        }
    };

    let n_bins = edges.len() - 1;
    let last = edges[n_bins];
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        if v < edges[0] || v > last {
            continue;
        }
        let bin = if v == last {
            n_bins - 1
        } else {
            match edges.windows(2).position(|w| v >= w[0] && v < w[1]) {
                Some(bin) => bin,
                None => continue,
            }
        };
        counts[bin] += 1;
    }

    Ok((edges, counts))
}
