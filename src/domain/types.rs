//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - printed in reports and drawn in charts

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single CSV cell.
///
/// Cells that parse as finite `f64` are numbers; everything else (including
/// empty cells) is kept verbatim as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Number(v),
            _ => Value::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    /// Equality used by row predicates.
    ///
    /// Two numbers compare numerically (so `2` matches `2.0`); any other pairing
    /// compares the rendered text.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::parse(value)
    }
}

/// Row filter used when extracting a series.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `row[column] == value`
    Equals { column: String, value: Value },
    /// `row[left] == row[right]`
    ColumnsEqual { left: String, right: String },
}

impl Predicate {
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn columns_equal(left: impl Into<String>, right: impl Into<String>) -> Self {
        Predicate::ColumnsEqual {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Columns this predicate reads (for schema validation).
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::Equals { column, .. } => vec![column.as_str()],
            Predicate::ColumnsEqual { left, right } => vec![left.as_str(), right.as_str()],
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { column, value } => write!(f, "{column}={value}"),
            Predicate::ColumnsEqual { left, right } => write!(f, "{left}=={right}"),
        }
    }
}

/// Parses the CLI forms `COL=VALUE` and `COL==OTHER_COL`.
impl FromStr for Predicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((left, right)) = s.split_once("==") {
            let (left, right) = (left.trim(), right.trim());
            if left.is_empty() || right.is_empty() {
                return Err(format!("Invalid predicate '{s}': expected COL==OTHER_COL"));
            }
            return Ok(Predicate::columns_equal(left, right));
        }
        let Some((column, value)) = s.split_once('=') else {
            return Err(format!("Invalid predicate '{s}': expected COL=VALUE"));
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(format!("Invalid predicate '{s}': empty column name"));
        }
        Ok(Predicate::equals(column, Value::parse(value)))
    }
}

/// Which coordinate a value belongs to (used in error messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Paired `(x, y)` observations for one plotted group.
///
/// Both sequences always have the same length and index `i` of each refers to
/// the same source row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Series {
    pub fn from_points(label: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Space in which the least-squares fit is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitSpace {
    /// Fit `y` against `x`.
    Linear,
    /// Fit `ln y` against `ln x` (power laws).
    LogLog,
    /// Fit `y` against `ln x` (logarithmic growth).
    SemiLogX,
}

impl FitSpace {
    pub fn display_name(self) -> &'static str {
        match self {
            FitSpace::Linear => "linear",
            FitSpace::LogLog => "log-log",
            FitSpace::SemiLogX => "semi-log-x",
        }
    }

    pub fn logs_x(self) -> bool {
        matches!(self, FitSpace::LogLog | FitSpace::SemiLogX)
    }

    pub fn logs_y(self) -> bool {
        matches!(self, FitSpace::LogLog)
    }
}

/// Fit quality diagnostics (computed in the fit space).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Least-squares polynomial fit.
///
/// `coefficients[k]` multiplies `u^k`, where `u` is `x` or `ln x` depending on
/// the fit space. For the degree-1 fits used everywhere in the figures,
/// `coefficients = [intercept, slope]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub space: FitSpace,
    pub degree: usize,
    pub coefficients: Vec<f64>,
    pub quality: FitQuality,
}

impl FitResult {
    pub fn intercept(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    pub fn slope(&self) -> f64 {
        self.coefficients.get(1).copied().unwrap_or(0.0)
    }
}

/// The benchmark figures this tool knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FigureKind {
    RecordAggregation,
    RecordSizes,
    HistoryTree,
    QueryProof,
    QueryProofUnsorted,
}

impl FigureKind {
    pub const ALL: [FigureKind; 5] = [
        FigureKind::RecordAggregation,
        FigureKind::RecordSizes,
        FigureKind::HistoryTree,
        FigureKind::QueryProof,
        FigureKind::QueryProofUnsorted,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            FigureKind::RecordAggregation => "Record Aggregation Size",
            FigureKind::RecordSizes => "Record vs Aggregation Size",
            FigureKind::HistoryTree => "History Tree Size",
            FigureKind::QueryProof => "Query Proof Size",
            FigureKind::QueryProofUnsorted => "Query Proof Size (unsorted)",
        }
    }

    /// Short name used for default output file names.
    pub fn slug(self) -> &'static str {
        match self {
            FigureKind::RecordAggregation => "record_aggregation",
            FigureKind::RecordSizes => "record_sizes",
            FigureKind::HistoryTree => "history_tree",
            FigureKind::QueryProof => "query_proof",
            FigureKind::QueryProofUnsorted => "query_proof_unsorted",
        }
    }
}

/// Default `NumberAttributes` groups overlaid on the history tree figure.
pub const DEFAULT_HISTORY_TREE_GROUPS: [f64; 3] = [2.0, 128.0, 512.0];

/// Configuration shared by every figure builder.
#[derive(Debug, Clone)]
pub struct FigureConfig {
    /// Directory holding the benchmark CSVs.
    pub data_dir: PathBuf,
    /// Group values overlaid on grouped figures (history tree).
    pub groups: Vec<Value>,
    /// Optional sorting-window filter (`w`) for the query proof figures.
    pub window: Option<Value>,
}

impl FigureConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            groups: DEFAULT_HISTORY_TREE_GROUPS.iter().map(|&g| Value::Number(g)).collect(),
            window: None,
        }
    }
}

/// A single ad-hoc fit as requested by `sizes fit`.
#[derive(Debug, Clone)]
pub struct FitRequest {
    pub file: PathBuf,
    pub x_column: String,
    pub y_column: String,
    pub predicates: Vec<Predicate>,
    pub group_by: Option<String>,
    pub groups: Vec<Value>,
    pub space: FitSpace,
    pub degree: usize,
}

/// Settings for the synthetic benchmark generator.
///
/// The generator sweeps the same grids as the benchmark harness: attribute
/// and record counts double from 1 up to their maximum.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    /// Largest `NumberRecords` value in the history tree tables.
    pub max_records: usize,
    /// Largest attribute count in the record and history tree tables.
    pub max_attributes: usize,
    /// Number of records behind every query proof row.
    pub query_records: usize,
    /// Relative Gaussian noise applied to every generated size.
    pub noise_rel: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed: 42,
            max_records: 32_768,
            max_attributes: 512,
            query_records: 100_000,
            noise_rel: 0.01,
        }
    }
}

/// Where the benchmark harness writes its CSVs (relative to the repo root).
pub const DEFAULT_DATA_DIR: &str = "analysis/benchmarking";
