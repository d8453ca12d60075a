pub mod harmonizer;
