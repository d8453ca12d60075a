pub mod bitflags;
pub mod climate_day;
pub mod eto_result;
pub mod fused_day;
pub mod location;
pub mod quality;
pub mod raw_record;
pub mod variable;
