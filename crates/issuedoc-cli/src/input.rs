//! Reading raw documents from files or stdin.

use anyhow::{Context as _, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// One raw document and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// `path`, `path:line`, `<stdin>` or `<stdin>:line`.
    pub source: String,
    pub bytes: Vec<u8>,
}

/// Read documents from `files`, or from stdin when `files` is empty or a
/// path is `-`.
///
/// With `lines`, every non-blank line is its own document; otherwise each
/// input is one document.
///
/// # Errors
///
/// Returns an error if a file or stdin cannot be read.
pub fn read_documents(files: &[PathBuf], lines: bool) -> Result<Vec<InputDocument>> {
    let stdin_only = [PathBuf::from("-")];
    let files = if files.is_empty() { &stdin_only[..] } else { files };

    let mut docs = Vec::new();
    for path in files {
        let (source, bytes) = read_source(path)?;
        if lines {
            docs.extend(split_lines(&source, &bytes));
        } else {
            docs.push(InputDocument { source, bytes });
        }
    }
    Ok(docs)
}

fn read_source(path: &Path) -> Result<(String, Vec<u8>)> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("read document from stdin")?;
        return Ok(("<stdin>".to_string(), bytes));
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("read document {}", path.display()))?;
    Ok((path.display().to_string(), bytes))
}

fn split_lines(source: &str, bytes: &[u8]) -> Vec<InputDocument> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .map(|(n, line)| InputDocument {
            source: format!("{source}:{}", n + 1),
            bytes: line.trim_ascii().to_vec(),
        })
        .collect()
}
