use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Everything that can go wrong while building or rendering a chart.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Input could not be coerced into a tabular dataset, or a value was
    /// used in a role its column type does not support.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A draw operation referenced a column the dataset does not have.
    #[error("column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A heatmap was requested on a dataset with no numeric columns.
    #[error("no numeric data available to plot a heatmap")]
    NoNumericData,

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Failure inside the plotters backend. Backend errors borrow the
    /// drawing surface, so they are carried here as messages.
    #[error("render error: {0}")]
    Render(String),
}

impl ChartError {
    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        ChartError::Render(err.to_string())
    }
}
