//! Dataset file storage.
//!
//! The dataset is a single JSON array of course records. Every scrape run
//! replaces the file wholesale; search commands load it once into an owned
//! `Vec<Course>` and pass it around by reference.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::Course;

/// Default dataset filename.
pub const DEFAULT_DATASET_FILENAME: &str = "golf_courses.json";

/// Errors reading or writing the dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to access dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset {path} is not a valid course list: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load the dataset from disk.
pub fn load_courses(path: &Path) -> Result<Vec<Course>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    let courses: Vec<Course> =
        serde_json::from_str(&contents).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Loaded {} courses from {}", courses.len(), path.display());
    Ok(courses)
}

/// Serialize courses as indented UTF-8 JSON, keeping non-ASCII text literal.
pub fn courses_to_json(courses: &[Course]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(courses)
}

/// Write the dataset, replacing any existing file.
///
/// The JSON is written to a temporary file next to the target and then
/// renamed over it, so an interrupted save never leaves a truncated file.
pub fn save_courses(path: &Path, courses: &[Course]) -> Result<(), DatasetError> {
    let json = courses_to_json(courses).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| DatasetError::io(&dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| DatasetError::io(&dir, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.write_all(b"\n"))
        .and_then(|_| tmp.flush())
        .map_err(|e| DatasetError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| DatasetError::io(path, e.error))?;

    info!("Saved {} courses to {}", courses.len(), path.display());
    Ok(())
}
