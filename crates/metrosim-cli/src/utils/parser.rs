use metrosim::engine::evaluator::Backend;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid box for {key}: '{value}'. Expected three comma-separated lengths (e.g., '20,20,20').")]
    InvalidTriple { key: String, value: String },

    #[error("Unknown backend '{0}'. Expected 'sequential' or 'parallel'.")]
    UnknownBackend(String),
}

#[derive(Debug, PartialEq, Eq)]
pub struct KeyValue<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

pub fn split_assignment(input: &str) -> Result<KeyValue<'_>, ParseError> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(KeyValue {
            key: key.trim(),
            value: value.trim(),
        }),
        _ => Err(ParseError::InvalidAssignment(input.to_string())),
    }
}

pub fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parses `x,y,z`, optionally wrapped in brackets.
pub fn parse_triple(key: &str, value: &str) -> Result<[f64; 3], ParseError> {
    let invalid = || ParseError::InvalidTriple {
        key: key.to_string(),
        value: value.to_string(),
    };
    let inner = value.trim().trim_start_matches('[').trim_end_matches(']');
    let parts = inner
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    <[f64; 3]>::try_from(parts).map_err(|_| invalid())
}

pub fn parse_backend(value: &str) -> Result<Backend, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "sequential" | "serial" | "cpu" => Ok(Backend::Sequential),
        "parallel" => Ok(Backend::Parallel),
        _ => Err(ParseError::UnknownBackend(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_assignment_keeps_equals_in_value() {
        assert_eq!(
            split_assignment("name=a=b").unwrap(),
            KeyValue {
                key: "name",
                value: "a=b"
            }
        );
        assert!(matches!(
            split_assignment("=5"),
            Err(ParseError::InvalidAssignment(_))
        ));
        assert!(split_assignment("steps").is_err());
    }

    #[test]
    fn parse_triple_accepts_plain_and_bracketed_lists() {
        assert_eq!(parse_triple("k", "1,2,3").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_triple("k", "[1.5, 2, 3]").unwrap(), [1.5, 2.0, 3.0]);
        assert!(parse_triple("k", "1,2").is_err());
        assert!(parse_triple("k", "1,x,3").is_err());
    }

    #[test]
    fn parse_backend_recognizes_aliases() {
        assert_eq!(parse_backend("Parallel").unwrap(), Backend::Parallel);
        assert_eq!(parse_backend("serial").unwrap(), Backend::Sequential);
        assert_eq!(
            parse_backend("gpu"),
            Err(ParseError::UnknownBackend("gpu".to_string()))
        );
    }

    #[test]
    fn parse_value_reports_key() {
        let err = parse_value::<usize>("simulation.steps", "-3").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for simulation.steps: '-3'");
    }
}
