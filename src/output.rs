use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Publishes a named output value by appending `name=value` to the file
/// GitHub Actions designates via `GITHUB_OUTPUT`.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    let path = std::env::var("GITHUB_OUTPUT")
        .context("GITHUB_OUTPUT is not set; cannot publish the output value")?;
    append_output(Path::new(&path), name, value)
}

fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    writeln!(file, "{name}={value}")
        .with_context(|| format!("Failed to write output {name}"))?;
    Ok(())
}

/// Marks the step as failed in the workflow log. The caller still exits
/// non-zero; this only makes the message show up as an error annotation.
pub fn set_failed(message: &str) {
    println!("::error::{message}");
}
