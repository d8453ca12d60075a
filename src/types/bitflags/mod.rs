pub mod eto;
