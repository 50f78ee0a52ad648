use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::services::export::{suggested_file_name, EXPORT_MIME};

const FALLBACK_STEM: &str = "phrases";

/// What the host needs to offer a staged payload to the user.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub file_name: String,
    pub mime: String,
    pub size: usize,
    pub sha256: String,
    pub path: String,
}

/// A payload staged on disk. Dropping it revokes the link.
#[derive(Debug)]
pub struct StagedBlob {
    link: DownloadLink,
    path: PathBuf,
}

impl StagedBlob {
    pub fn link(&self) -> &DownloadLink {
        &self.link
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedBlob {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(url = %self.link.url, "revoked download link"),
            Err(e) => tracing::warn!(url = %self.link.url, "failed to remove staged blob: {e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stage(&self, payload: &str, category: &str) -> Result<StagedBlob> {
        fs::create_dir_all(&self.dir)?;

        let id = hex::encode(rand::random::<[u8; 16]>());
        let path = self
            .dir
            .join(format!("{id}-{}", suggested_file_name(&safe_file_stem(category))));

        fs::write(&path, payload.as_bytes())?;

        let link = DownloadLink {
            url: format!("blob:movapp/{id}"),
            file_name: suggested_file_name(category),
            mime: EXPORT_MIME.to_string(),
            size: payload.len(),
            sha256: sha256_hex(payload),
            path: path.to_string_lossy().to_string(),
        };

        tracing::info!(url = %link.url, size = link.size, "staged download");

        Ok(StagedBlob { link, path })
    }
}

/// Writes `<category>.txt` into `dir`, replacing any existing file.
pub fn save(payload: &str, dir: &Path, category: &str) -> Result<PathBuf> {
    let path = dir.join(suggested_file_name(&safe_file_stem(category)));
    write_atomic(&path, payload.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = payload.len(), "saved export");
    Ok(path)
}

/// Category reduced to something usable as a file name on any platform.
pub fn safe_file_stem(category: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("static pattern is valid")
    });

    let cleaned = re.replace_all(category.trim(), "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned.to_string()
    }
}

fn sha256_hex(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    // rename replaces the target atomically on Unix; Windows refuses an
    // existing destination.
    #[cfg(windows)]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "export".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
