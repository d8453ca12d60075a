pub mod error;
pub mod units;
pub mod variable_catalog;
