//! Rule sets
//!
//! Two fixed checklists: lexical rules over the query text and per-row
//! rules over the retrieved execution plan.

mod plan_rules;
mod static_rules;

pub use plan_rules::{NO_TABLE, UNKNOWN_TABLE, check_plan_row, check_plan_rules};
pub use static_rules::check_static_rules;
