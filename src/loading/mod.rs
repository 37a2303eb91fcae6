//! Reading a source unit from disk or standard input
//!
//! The engine itself is total; obtaining the text to format is the one
//! place a real error can happen, and it surfaces here.

use std::fmt;
use std::io::Read;
use std::path::Path;

use owo_colors::OwoColorize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            "error".bright_red(),
            self.filename
                .display(),
            self.problem
        )?;
        if !self
            .details
            .is_empty()
        {
            write!(f, " ({})", self.details)?;
        }
        Ok(())
    }
}

/// Read a whole source unit and return it as an owned String, handing
/// ownership back to the caller so everything borrowed from it shares one
/// lifetime. A filename of "-" reads standard input instead.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    if filename.to_str() == Some("-") {
        let mut content = String::new();
        return match std::io::stdin().read_to_string(&mut content) {
            Ok(bytes) => {
                debug!("read {} bytes from standard input", bytes);
                Ok(content)
            }
            Err(error) => Err(LoadingError {
                problem: "Failed reading standard input".to_string(),
                details: error
                    .kind()
                    .to_string(),
                filename,
            }),
        };
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}
