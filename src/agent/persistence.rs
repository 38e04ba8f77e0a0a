//! Flat-text storage of the weight vector.
//!
//! One weight per line, exactly [`NUM_FEATURES`] lines. Files are always
//! overwritten, never appended to.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::features::NUM_FEATURES;
use super::q_function::WeightVector;
use crate::error::PersistenceError;

/// Renders weights in the on-disk format.
///
/// Uses the shortest representation that parses back to the same `f64`.
pub fn format_weights(weights: &WeightVector) -> String {
    let mut out = String::new();
    for w in weights.as_slice() {
        out.push_str(&format!("{}\n", w));
    }
    out
}

/// Parses the on-disk format. Blank lines are ignored.
pub fn parse_weights(text: &str) -> Result<WeightVector, PersistenceError> {
    let mut values = Vec::with_capacity(NUM_FEATURES);
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line.parse::<f64>().map_err(|source| PersistenceError::Parse {
            line: idx + 1,
            value: line.to_string(),
            source,
        })?;
        values.push(value);
    }

    let weights: [f64; NUM_FEATURES] =
        values
            .as_slice()
            .try_into()
            .map_err(|_| PersistenceError::WrongLength {
                expected: NUM_FEATURES,
                found: values.len(),
            })?;
    Ok(WeightVector::new(weights))
}

/// Writes `weights` to `path`, creating parent directories as needed.
pub fn save_weights(path: &Path, weights: &WeightVector) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, format_weights(weights)).map_err(io_err)
}

/// Reads weights from `path`.
///
/// Returns `Ok(None)` if the file does not exist: there are no saved weights
/// and the caller should initialize fresh ones.
pub fn load_weights(path: &Path) -> Result<Option<WeightVector>, PersistenceError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_weights(&text).map(Some)
}
