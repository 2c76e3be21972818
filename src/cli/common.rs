//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::markup::{self, Document};
use crate::normalize::strip_cosmetic_namespaces;

/// Serialize `doc`, optionally dropping the two default namespace declarations.
pub fn render(doc: &Document, strip_namespaces: bool) -> Result<String> {
    let text = markup::write(doc).context("Failed to serialize markup")?;
    Ok(if strip_namespaces {
        strip_cosmetic_namespaces(&text)
    } else {
        text
    })
}

/// Write `text` to `output`, or to stdout when no path is given.
///
/// Parent directories of `output` are created as needed.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_file(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Write `text` to `path`, creating parent directories.
pub fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// File name without its last extension.
pub fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("No usable file name in {}", path.display()))
}
