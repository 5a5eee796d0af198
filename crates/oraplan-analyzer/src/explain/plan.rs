//! Plan row model - typed view of the projected `PLAN_TABLE` columns

use oraplan_core::{OraplanError, QueryResult, Result, Value};
use serde::{Deserialize, Serialize};

/// Columns read from `PLAN_TABLE`, in projection order
pub const PLAN_COLUMNS: [&str; 5] = ["OPERATION", "OPTIONS", "OBJECT_NAME", "COST", "CARDINALITY"];

/// One step of an execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Operation kind (e.g. `TABLE ACCESS`, `INDEX`, `MERGE JOIN`)
    pub operation: String,
    /// Options modifier (e.g. `FULL`, `RANGE SCAN`, `CARTESIAN`)
    pub options: Option<String>,
    /// Referenced object
    pub object_name: Option<String>,
    /// Optimizer cost estimate
    pub cost: Option<i64>,
    /// Estimated rows
    pub cardinality: Option<i64>,
}

impl PlanRow {
    /// Creates a plan row with only an operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            options: None,
            object_name: None,
            cost: None,
            cardinality: None,
        }
    }

    /// Sets the options modifier
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Sets the referenced object
    pub fn with_object(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    /// Sets the cost estimate
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Sets the cardinality estimate
    pub fn with_cardinality(mut self, cardinality: i64) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    /// Options modifier, or the empty string
    pub fn options_str(&self) -> &str {
        self.options.as_deref().unwrap_or("")
    }
}

/// Column positions of the plan projection, resolved once per result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlanColumnMap {
    operation: usize,
    options: usize,
    object_name: usize,
    cost: usize,
    cardinality: usize,
}

impl PlanColumnMap {
    fn resolve(result: &QueryResult) -> Result<Self> {
        let find = |name: &str| {
            result.column_index(name).ok_or_else(|| {
                OraplanError::PlanFormat(format!("plan result is missing column {}", name))
            })
        };
        Ok(Self {
            operation: find("OPERATION")?,
            options: find("OPTIONS")?,
            object_name: find("OBJECT_NAME")?,
            cost: find("COST")?,
            cardinality: find("CARDINALITY")?,
        })
    }
}

fn text_at(values: &[Value], idx: usize) -> Option<String> {
    match values.get(idx) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn number_at(values: &[Value], idx: usize) -> Result<Option<i64>> {
    match values.get(idx) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.round() as i64))
            .map(Some)
            .ok_or_else(|| OraplanError::PlanFormat(format!("expected a number, got '{}'", value))),
    }
}

/// Maps the rows of a plan query into typed plan rows, preserving order
pub fn plan_rows_from_result(result: &QueryResult) -> Result<Vec<PlanRow>> {
    let map = PlanColumnMap::resolve(result)?;

    result
        .rows
        .iter()
        .map(|row| {
            let values = &row.values;
            Ok(PlanRow {
                operation: text_at(values, map.operation).unwrap_or_default(),
                options: text_at(values, map.options),
                object_name: text_at(values, map.object_name),
                cost: number_at(values, map.cost)?,
                cardinality: number_at(values, map.cardinality)?,
            })
        })
        .collect()
}
