use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Result, SubrelayError};

/// One timed caption. Sequence and time range are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub sequence: String,
    pub time_range: String,
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(
        sequence: impl Into<String>,
        time_range: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sequence: sequence.into(),
            time_range: time_range.into(),
            text: text.into(),
        }
    }

    /// Same sequence and time range, new caption text
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self
        }
    }
}

/// Parse SRT content into ordered entries.
///
/// Blocks are separated by blank lines. A block needs a sequence line, a
/// time range line and at least one text line; shorter blocks are dropped.
pub fn parse_srt(content: &str) -> Vec<SubtitleEntry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut entries = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }

        if block.is_empty() {
            continue;
        }

        if block.len() >= 3 {
            entries.push(SubtitleEntry {
                sequence: block[0].to_string(),
                time_range: block[1].to_string(),
                text: block[2..].join("\n"),
            });
        } else {
            debug!("Dropping subtitle block with {} line(s): {:?}", block.len(), block);
        }
        block.clear();
    }

    entries
}

/// Reassemble entries into SRT text
pub fn render_srt(entries: &[SubtitleEntry]) -> String {
    let mut srt_content = String::new();

    for entry in entries {
        srt_content.push_str(&format!(
            "{}\n{}\n{}\n\n",
            entry.sequence, entry.time_range, entry.text
        ));
    }

    srt_content
}

/// Write entries to an SRT file
pub async fn write_srt<P: AsRef<Path>>(entries: &[SubtitleEntry], output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Writing SRT file: {}", output_path.display());

    fs::write(output_path, render_srt(entries))
        .await
        .map_err(SubrelayError::Io)?;

    debug!("Wrote {} subtitle entries", entries.len());
    Ok(())
}

/// Case-insensitive `.srt` suffix check
pub fn is_srt_file_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
}
