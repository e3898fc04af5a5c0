//! In-memory dataset with per-column semantic type tags

use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;

use super::column_stats::cell_to_json;

/// Number of rows returned as a preview alongside reports
pub const PREVIEW_ROWS: usize = 10;

/// Ordered mapping column name -> value for a single row
pub type Record = serde_json::Map<String, Value>;

/// Semantic type of a column, assigned once when the dataset is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    Temporal,
    /// Column with the null dtype (no values at all)
    Null,
    /// Nested, binary and other dtypes no stage operates on
    Other,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            ColumnKind::Numeric
        } else if dtype.is_bool() {
            ColumnKind::Boolean
        } else if dtype.is_temporal() {
            ColumnKind::Temporal
        } else if matches!(dtype, DataType::Null) {
            ColumnKind::Null
        } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
            ColumnKind::Text
        } else {
            ColumnKind::Other
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Null => "null",
            ColumnKind::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// A tabular dataset: a `DataFrame` plus one `ColumnKind` per column.
///
/// Transformations never mutate a `Dataset`; they build a new one. Cloning
/// is cheap because the underlying column buffers are reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Dataset {
    /// Wrap a decoded frame, tagging each column from its dtype.
    ///
    /// Float NaN is stored as null, so every count, quantile and moment
    /// treats it as a missing value.
    pub fn new(frame: DataFrame) -> Self {
        let frame = nan_as_null(frame);
        let kinds = frame
            .get_columns()
            .iter()
            .map(|c| ColumnKind::from_dtype(c.dtype()))
            .collect();
        Self { frame, kinds }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn columns(&self) -> &[Column] {
        self.frame.get_columns()
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Names of the numeric columns, in column order
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns()
            .iter()
            .zip(&self.kinds)
            .filter(|(_, kind)| kind.is_numeric())
            .map(|(col, _)| col.name().to_string())
            .collect()
    }

    pub fn column(&self, name: &str) -> PolarsResult<&Column> {
        self.frame.column(name)
    }

    /// Keep the rows whose mask entry is `true`; column tags carry over.
    pub fn filter_rows(&self, keep: &[bool]) -> PolarsResult<Dataset> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        let frame = self.frame.filter(&mask)?;
        Ok(Dataset {
            frame,
            kinds: self.kinds.clone(),
        })
    }

    /// Build a dataset from replacement columns of the same names and order.
    ///
    /// Tags carry over so that a numeric integer column rewritten as floats
    /// stays numeric.
    pub fn with_columns(&self, columns: Vec<Column>) -> PolarsResult<Dataset> {
        let frame = DataFrame::new(columns)?;
        Ok(Dataset {
            frame,
            kinds: self.kinds.clone(),
        })
    }

    /// First `limit` rows as ordered records
    pub fn records(&self, limit: usize) -> Vec<Record> {
        let take = limit.min(self.height());
        let mut records: Vec<Record> = (0..take).map(|_| Record::new()).collect();

        for column in self.columns() {
            let name = column.name().to_string();
            let values = column.as_materialized_series().iter().take(take);
            for (record, value) in records.iter_mut().zip(values) {
                record.insert(name.clone(), cell_to_json(&value));
            }
        }

        records
    }

    /// Preview of the first [`PREVIEW_ROWS`] rows
    pub fn preview(&self) -> Vec<Record> {
        self.records(PREVIEW_ROWS)
    }

    /// Advisory estimate of the in-memory size in bytes
    pub fn estimated_size(&self) -> usize {
        self.frame.estimated_size()
    }
}

fn has_nan(column: &Column) -> bool {
    match column.dtype() {
        DataType::Float64 => column
            .f64()
            .map(|ca| ca.into_iter().any(|v| v.is_some_and(f64::is_nan)))
            .unwrap_or(false),
        DataType::Float32 => column
            .f32()
            .map(|ca| ca.into_iter().any(|v| v.is_some_and(f32::is_nan)))
            .unwrap_or(false),
        _ => false,
    }
}

fn nan_column_as_null(column: &Column) -> Column {
    let name = column.name().clone();
    if let Ok(ca) = column.f64() {
        let values: Vec<Option<f64>> = ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Column::new(name, values)
    } else if let Ok(ca) = column.f32() {
        let values: Vec<Option<f32>> = ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Column::new(name, values)
    } else {
        column.clone()
    }
}

fn nan_as_null(frame: DataFrame) -> DataFrame {
    if !frame.get_columns().iter().any(has_nan) {
        return frame;
    }

    let columns: Vec<Column> = frame
        .get_columns()
        .iter()
        .map(|c| {
            if has_nan(c) {
                nan_column_as_null(c)
            } else {
                c.clone()
            }
        })
        .collect();

    // Same names and heights as the source frame
    DataFrame::new(columns).unwrap_or(frame)
}

impl From<DataFrame> for Dataset {
    fn from(frame: DataFrame) -> Self {
        Dataset::new(frame)
    }
}
