//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod discharge;

pub use discharge::{save_discharge, DischargeTable, StationColumn};
