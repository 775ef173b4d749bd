//! Shared RON loading helpers.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::DataLoadError;

/// Read and parse a single RON file.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    parse_ron(&contents, &path.display().to_string())
}

/// Parse RON text, tagging errors with `origin` (usually the file path).
pub fn parse_ron<T: DeserializeOwned>(contents: &str, origin: &str) -> Result<T, DataLoadError> {
    ron::from_str::<T>(contents).map_err(|e| DataLoadError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })
}

/// List all `.ron` files in a directory, sorted by name.
pub fn ron_files_in(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn parses_valid_ron() {
        let sample: Sample = parse_ron(r#"(name: "wall", count: 3)"#, "inline").unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "wall".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn parse_error_names_origin() {
        let err = parse_ron::<Sample>("(name: 12)", "enemies/zombie.ron").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "enemies/zombie.ron"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_ron_file::<Sample>(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }
}
