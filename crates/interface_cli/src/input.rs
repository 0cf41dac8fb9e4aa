//! Survey extract loading
//!
//! An extract is JSON: either one `SurveyBatch` per file, or JSON Lines
//! (`.jsonl`, `.ndjson`) with one batch per line. Blank lines are skipped.

use std::path::Path;

use domain_ingest::SurveyBatch;
use tracing::debug;

use crate::error::CliError;

fn is_json_lines(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jsonl") | Some("ndjson")
    )
}

/// Parses the batches of one extract
///
/// # Arguments
///
/// * `path` - File name, used for format detection and error messages
/// * `content` - The file's text
pub fn parse_batches(path: &Path, content: &str) -> Result<Vec<SurveyBatch>, CliError> {
    if !is_json_lines(path) {
        let batch = serde_json::from_str(content).map_err(|e| CliError::Parse {
            path: path.to_path_buf(),
            line: e.line(),
            message: e.to_string(),
        })?;
        return Ok(vec![batch]);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| CliError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Reads and parses one extract file
pub fn load_batches(path: &Path) -> Result<Vec<SurveyBatch>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let batches = parse_batches(path, &content)?;
    debug!(path = %path.display(), batches = batches.len(), "Loaded extract");
    Ok(batches)
}

/// Reads every extract and splits the records into one batch per household
///
/// Households are the unit of atomicity: one bad household does not hold
/// back the others.
pub fn load_household_batches<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SurveyBatch>, CliError> {
    let mut combined = SurveyBatch::new();
    for path in paths {
        for batch in load_batches(path.as_ref())? {
            combined.extend(batch);
        }
    }
    Ok(combined.partition_by_household())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_batch_file() {
        let batches = parse_batches(Path::new("extract.json"), "{}").unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
    }

    #[test]
    fn test_json_lines_skip_blank_lines() {
        let batches = parse_batches(Path::new("extract.jsonl"), "{}\n\n{}\n").unwrap();
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_parse_error_names_the_line() {
        let err = parse_batches(Path::new("extract.ndjson"), "{}\n{\"households\": 3}\n").unwrap_err();
        match err {
            CliError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected a parse error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_an_input_error() {
        let err = load_batches(Path::new("/nonexistent/extract.json")).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
    }
}
