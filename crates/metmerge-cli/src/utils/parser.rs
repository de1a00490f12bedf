use metmerge::engine::config::ObjectiveMode;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid objective '{0}'. Expected 'merge' or the 1-based position of a model (e.g., '1')."
    )]
    InvalidObjective(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Output path '{0}' must have a .json extension.")]
    OutputExtension(String),

    #[error("Parent directory of output path '{0}' does not exist.")]
    OutputParentMissing(String),
}

/// Parses `merge`/`all`, or a 1-based model position.
pub fn parse_objective(value: &str) -> Result<ObjectiveMode, ParseError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("merge") || trimmed.eq_ignore_ascii_case("all") {
        return Ok(ObjectiveMode::MergeAll);
    }
    match trimmed.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(ObjectiveMode::SelectOne(position - 1)),
        _ => Err(ParseError::InvalidObjective(value.to_string())),
    }
}

pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

/// Checks that a model can be written to `path` before any work starts.
pub fn validate_output_path(path: &Path) -> Result<(), ParseError> {
    let display = path.display().to_string();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(ParseError::OutputExtension(display));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(ParseError::OutputParentMissing(display))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_objective_accepts_merge_and_positions() {
        assert_eq!(parse_objective("merge"), Ok(ObjectiveMode::MergeAll));
        assert_eq!(parse_objective("ALL"), Ok(ObjectiveMode::MergeAll));
        assert_eq!(parse_objective("1"), Ok(ObjectiveMode::SelectOne(0)));
        assert_eq!(parse_objective(" 3 "), Ok(ObjectiveMode::SelectOne(2)));
    }

    #[test]
    fn parse_objective_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_objective("0"),
            Err(ParseError::InvalidObjective(_))
        ));
        assert!(matches!(
            parse_objective("first"),
            Err(ParseError::InvalidObjective(_))
        ));
    }

    #[test]
    fn parse_key_value_splits_on_first_equals_sign() {
        assert_eq!(
            parse_key_value("merge.proton-identifier=a=b"),
            Ok(("merge.proton-identifier", "a=b"))
        );
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn validate_output_path_checks_extension_and_parent() {
        let dir = tempdir().unwrap();
        assert!(validate_output_path(&dir.path().join("merged.json")).is_ok());
        assert!(validate_output_path(Path::new("merged.JSON")).is_ok());
        assert_eq!(
            validate_output_path(&dir.path().join("merged.xml")),
            Err(ParseError::OutputExtension(
                dir.path().join("merged.xml").display().to_string()
            ))
        );
        assert!(matches!(
            validate_output_path(&dir.path().join("missing").join("merged.json")),
            Err(ParseError::OutputParentMissing(_))
        ));
    }
}
