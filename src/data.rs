use crate::error::{ChartError, Result};
use serde_json::Value;
use std::io::Read;

/// A single named column of homogeneous values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Number(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Number(_))
    }
}

/// An ordered collection of named, equal-length columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
}

impl Dataset {
    /// Build a dataset from pre-structured columns. All columns must have
    /// the same length.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        if let Some((first_name, first)) = columns.first() {
            for (name, column) in &columns {
                if column.len() != first.len() {
                    return Err(ChartError::InvalidData(format!(
                        "columns must have equal length ('{}' has {}, '{}' has {})",
                        first_name,
                        first.len(),
                        name,
                        column.len()
                    )));
                }
            }
        }
        Ok(Self { columns })
    }

    /// Build a dataset from a JSON mapping of column name to value array.
    ///
    /// Every array must be homogeneous: all numbers or all strings.
    /// Columns keep the mapping's order, which is what the heatmap uses
    /// for its axes.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ChartError::InvalidData(
                "data must be a mapping from column names to value arrays".to_string(),
            )
        })?;

        let mut columns = Vec::with_capacity(object.len());
        for (name, entry) in object {
            let array = entry.as_array().ok_or_else(|| {
                ChartError::InvalidData(format!("column '{}' must be an array of values", name))
            })?;

            if array.iter().all(|v| v.is_number()) {
                let numbers = array
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(f64::NAN))
                    .collect();
                columns.push((name.clone(), Column::Number(numbers)));
            } else if array.iter().all(|v| v.is_string()) {
                let texts = array
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect();
                columns.push((name.clone(), Column::Text(texts)));
            } else {
                return Err(ChartError::InvalidData(format!(
                    "column '{}' must contain only numbers or only strings",
                    name
                )));
            }
        }

        Self::new(columns)
    }

    /// Build a dataset from CSV text with a header row. Columns whose cells
    /// all parse as numbers become numeric; everything else stays text.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| ChartError::InvalidData(format!("failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record
                .map_err(|e| ChartError::InvalidData(format!("failed to read CSV row: {}", e)))?;
            if record.len() != headers.len() {
                return Err(ChartError::InvalidData(format!(
                    "CSV row has {} fields, expected {}",
                    record.len(),
                    headers.len()
                )));
            }
            for (idx, field) in record.iter().enumerate() {
                cells[idx].push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| {
                let parsed: Option<Vec<f64>> =
                    values.iter().map(|v| v.trim().parse::<f64>().ok()).collect();
                let column = match parsed {
                    Some(numbers) if !values.is_empty() => Column::Number(numbers),
                    _ => Column::Text(values),
                };
                (name, column)
            })
            .collect();

        Self::new(columns)
    }

    /// Number of rows shared by every column.
    pub fn len(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| ChartError::ColumnNotFound(name.to_string()))
    }

    /// Values of a column used in a numeric role.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Number(values) => Ok(values),
            Column::Text(_) => Err(ChartError::InvalidData(format!(
                "column '{}' is not numeric",
                name
            ))),
        }
    }

    /// Values of a column used as category labels. Numbers are formatted.
    pub fn categories(&self, name: &str) -> Result<Vec<String>> {
        match self.column(name)? {
            Column::Text(values) => Ok(values.clone()),
            Column::Number(values) => Ok(values.iter().map(|v| format!("{}", v)).collect()),
        }
    }

    /// All numeric columns, in dataset order.
    pub fn numeric_columns(&self) -> Vec<(&str, &[f64])> {
        self.columns
            .iter()
            .filter_map(|(name, column)| match column {
                Column::Number(values) => Some((name.as_str(), values.as_slice())),
                Column::Text(_) => None,
            })
            .collect()
    }
}
