use regex::Regex;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(TRACE|DEBUG|INFO|WARN|WARNING|ERROR|FATAL)\b").expect("valid level regex")
});

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read log file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the last `tail` lines of a log file; `tail == 0` reads the whole file
pub fn read_log_file(path: &Path, tail: usize) -> Result<Vec<String>, ReadError> {
    let read_err = |source| ReadError::Read {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut window: VecDeque<String> = VecDeque::new();

    for line in BufReader::new(file).lines() {
        let line = line.map_err(read_err)?;
        if tail > 0 && window.len() == tail {
            window.pop_front();
        }
        window.push_back(line);
    }

    Ok(window.into_iter().collect())
}

/// First recognized severity token on the line, if any
pub fn detect_level(line: &str) -> Option<&str> {
    LEVEL_RE.find(line).map(|m| m.as_str())
}
