//! Validation and storage for uploaded badge images.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::config::UploadConfig;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to store badge: {0}")]
    Io(#[from] std::io::Error),
}

pub struct BadgeService {
    badges_dir: PathBuf,
    uploads: UploadConfig,
}

impl BadgeService {
    #[must_use]
    pub fn new(badges_dir: &str, uploads: UploadConfig) -> Self {
        Self {
            badges_dir: PathBuf::from(badges_dir),
            uploads,
        }
    }

    /// Validates an uploaded badge and writes it to the badges directory.
    ///
    /// Returns the public path (`/badges/<file>`) to record on the team.
    /// The stored name keeps a sanitized stem of the original plus a random
    /// suffix so concurrent uploads of `badge.png` cannot clobber each
    /// other.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, BadgeError> {
        if bytes.is_empty() {
            return Err(BadgeError::Rejected("Badge file is empty".to_string()));
        }

        if bytes.len() > self.uploads.max_badge_bytes {
            return Err(BadgeError::Rejected(format!(
                "Badge exceeds the {} byte limit",
                self.uploads.max_badge_bytes
            )));
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| BadgeError::Rejected("Badge file has no extension".to_string()))?;

        if !self
            .uploads
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(BadgeError::Rejected(format!(
                "Badge extension '{extension}' is not allowed"
            )));
        }

        // The allow-list only holds image extensions; this guards against
        // an operator putting something odd in the config.
        let mime = mime_guess::from_ext(&extension).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(BadgeError::Rejected(format!(
                "Badge extension '{extension}' is not an image type"
            )));
        }

        let filename = format!(
            "{}-{}.{}",
            sanitize_stem(original_name),
            &uuid::Uuid::new_v4().simple().to_string()[..8],
            extension
        );

        if !self.badges_dir.exists() {
            fs::create_dir_all(&self.badges_dir).await?;
        }

        let file_path = self.badges_dir.join(&filename);
        fs::write(&file_path, bytes).await?;

        info!(path = %file_path.display(), "Stored badge upload");
        Ok(format!("/badges/{filename}"))
    }
}

/// Reduces the original file stem to a safe slug.
fn sanitize_stem(original_name: &str) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("badge");

    let slug: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "badge".to_string()
    } else {
        trimmed.chars().take(40).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(max_bytes: usize) -> BadgeService {
        BadgeService::new(
            std::env::temp_dir()
                .join(format!("ultimatecup-badges-{}", uuid::Uuid::new_v4()))
                .to_str()
                .unwrap(),
            UploadConfig {
                max_badge_bytes: max_bytes,
                ..UploadConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn stores_an_allowed_image() {
        let svc = service(1024);
        let path = svc.store("Lafia Stars.png", b"png-bytes").await.unwrap();
        assert!(path.starts_with("/badges/lafia-stars-"));
        assert!(path.ends_with(".png"));
    }

    #[tokio::test]
    async fn rejects_disallowed_extensions() {
        let svc = service(1024);
        let err = svc.store("payload.exe", b"MZ").await.unwrap_err();
        assert!(matches!(err, BadgeError::Rejected(_)));
    }

    #[tokio::test]
    async fn rejects_oversized_uploads() {
        let svc = service(4);
        let err = svc.store("badge.png", b"way too big").await.unwrap_err();
        assert!(matches!(err, BadgeError::Rejected(_)));
    }

    #[test]
    fn stems_are_slugified() {
        assert_eq!(sanitize_stem("My Team Badge!.png"), "my-team-badge");
        assert_eq!(sanitize_stem("???.png"), "badge");
    }
}
