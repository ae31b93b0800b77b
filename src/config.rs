//! Validated settings for a conversion batch.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{cli::ConvertArgs, pipeline::Period};

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub data_folder: PathBuf,
    pub output_folder: PathBuf,
    pub period: Period,
    pub header_lines: usize,
}

impl ConvertConfig {
    pub fn from_args(args: &ConvertArgs) -> Result<Self> {
        let period = Period::new(args.start_date, args.end_date).context("invalid period")?;

        Ok(ConvertConfig {
            data_folder: args.data_folder.clone(),
            output_folder: args.output_folder.clone(),
            period,
            header_lines: args.header_lines,
        })
    }
}

// -- Tests -------------------------------------------------------------------
