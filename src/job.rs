use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use crate::batch::{BatchOutcome, BatchTranslator};
use crate::error::{Result, SubrelayError};
use crate::language::Language;
use crate::progress::ProgressReporter;
use crate::subtitle::{is_srt_file_name, parse_srt, write_srt};

/// A file received from a user
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SubrelayError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SubrelayError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = fs::read(path).await?;

        Ok(Self { file_name, bytes })
    }
}

/// The reassembled subtitle file handed back to the user
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    pub file_name: String,
    pub content: Vec<u8>,
    pub outcome: BatchOutcome,
}

impl TranslatedDocument {
    pub async fn save_to<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).await?;

        let path = output_dir.join(&self.file_name);
        fs::write(&path, &self.content).await?;
        info!("Saved translated subtitle: {}", path.display());
        Ok(path)
    }
}

/// `movie.srt` -> `movie_fr.srt`
pub fn output_file_name(file_name: &str, language: &Language) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "subtitle".to_string());
    format!("{}_{}.srt", stem, language.command)
}

/// Runs one uploaded subtitle file through parse, translate and reassemble.
///
/// Uploads are staged in a scratch directory that is removed when the job
/// returns, whatever the outcome.
pub struct SubtitleJob {
    batch: Arc<BatchTranslator>,
}

impl SubtitleJob {
    pub fn new(batch: Arc<BatchTranslator>) -> Self {
        Self { batch }
    }

    pub async fn run(
        &self,
        upload: &Upload,
        language: &Language,
        reporter: &dyn ProgressReporter,
    ) -> Result<TranslatedDocument> {
        info!("Processing subtitle upload: {}", upload.file_name);

        if !is_srt_file_name(&upload.file_name) {
            return Err(SubrelayError::UnsupportedFormat(upload.file_name.clone()));
        }

        let scratch = tempfile::Builder::new()
            .prefix("subrelay-")
            .tempdir()?;
        debug!("Scratch directory: {}", scratch.path().display());

        // Only the final path component, never a caller-supplied directory
        let staged_name = Path::new(&upload.file_name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "upload.srt".into());
        let input_path = scratch.path().join(staged_name);
        fs::write(&input_path, &upload.bytes).await?;

        let raw = fs::read(&input_path).await?;
        let content = String::from_utf8_lossy(&raw);
        let entries = parse_srt(&content);
        if entries.is_empty() {
            return Err(SubrelayError::UnreadableSubtitle(upload.file_name.clone()));
        }
        info!("Parsed {} subtitle entries", entries.len());

        let outcome = self
            .batch
            .translate_entries(entries, language, reporter)
            .await?;

        let file_name = output_file_name(&upload.file_name, language);
        let output_path = scratch.path().join(&file_name);
        write_srt(&outcome.entries, &output_path).await?;
        let content = fs::read(&output_path).await?;

        Ok(TranslatedDocument {
            file_name,
            content,
            outcome,
        })
    }
}
