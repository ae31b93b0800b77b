//! Station identity derived from a raw file name.

use std::path::{Path, PathBuf};

use crate::error::StationError;

// `vazoes_T_10100000.txt`: the gage code sits at a fixed offset.
const ID_START: usize = 9;
const ID_END: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
/// A raw discharge file and the station it belongs to.
pub struct StationFile {
    pub id: String,
    pub path: PathBuf,
}

impl StationFile {
    pub fn from_path(path: &Path) -> Result<Self, StationError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let id = station_id(&file_name)
            .ok_or_else(|| StationError::BadFileName(file_name.clone()))?
            .to_string();

        Ok(StationFile {
            id,
            path: path.to_path_buf(),
        })
    }
}

fn station_id(file_name: &str) -> Option<&str> {
    file_name
        .get(ID_START..ID_END)
        .filter(|id| id.bytes().all(|b| b.is_ascii_digit()))
}

// -- Tests ----------------------------------------------------------------------------
