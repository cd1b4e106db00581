use std::{io::BufRead, num::ParseFloatError};

use thiserror::Error;
use tracing::debug;

use crate::Real;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid Sample {value:?} on line {line}: {source}")]
    InvalidSample {
        line: usize,
        value: String,
        source: ParseFloatError,
    },
    #[error("Non-finite Sample {value} on line {line}")]
    NonFiniteSample { line: usize, value: Real },
}

/// Reads sample streams from plain text.
///
/// Each non-empty line holds one sample. Blank lines end the current stream,
/// and lines starting with `#` are skipped.
pub fn load_streams<R: BufRead>(reader: R) -> Result<Vec<Vec<Real>>, LoadError> {
    let mut streams = Vec::new();
    let mut current = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            if !current.is_empty() {
                streams.push(std::mem::take(&mut current));
            }
        } else if !text.starts_with('#') {
            current.push(parse_sample(index + 1, text)?);
        }
    }
    if !current.is_empty() {
        streams.push(current);
    }

    debug!(num_streams = streams.len(), "Loaded sample streams");
    Ok(streams)
}

fn parse_sample(line: usize, text: &str) -> Result<Real, LoadError> {
    let value = text
        .parse::<Real>()
        .map_err(|source| LoadError::InvalidSample {
            line,
            value: text.to_owned(),
            source,
        })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::NonFiniteSample { line, value })
    }
}
