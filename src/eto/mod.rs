pub mod calculator;
pub mod error;
pub mod hargreaves;
pub mod penman_monteith;
pub mod psychrometrics;
pub mod solar;
