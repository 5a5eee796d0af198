//! Oracle driver for oraplan
//!
//! Opens sessions through ODPI-C (the `oracle` crate). The Oracle Client
//! libraries must be installed on the machine at runtime.

mod driver;

pub use driver::*;
