//! EXPLAIN PLAN support
//!
//! - `plan` - typed plan rows and their mapping from a `PLAN_TABLE` select
//! - `plan_table` - the explain / fetch / cleanup statements and their execution

pub mod plan;
pub mod plan_table;

pub use plan::{PLAN_COLUMNS, PlanRow, plan_rows_from_result};
pub use plan_table::{
    STATEMENT_ID_MAX_LEN, cleanup, cleanup_sql, explain, explain_sql, explainable_text,
    fetch_plan, fetch_plan_sql, new_statement_id,
};

#[cfg(test)]
mod tests;
