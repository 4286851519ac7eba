use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Run `<binary> -version` and return the first line of its output
pub fn ffmpeg_version(binary: &Path) -> Result<String> {
    let output = Command::new(binary)
        .arg("-version")
        .output()
        .with_context(|| {
            format!(
                "Failed to execute {}. Is ffmpeg installed and in PATH?",
                binary.display()
            )
        })?;

    if !output.status.success() {
        anyhow::bail!(
            "{} -version failed with status: {}",
            binary.display(),
            output.status
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("Unknown version");
    Ok(first_line.to_string())
}
