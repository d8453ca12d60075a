pub mod fusion_engine;
pub mod gap_fill;
pub mod reliability;
