//! Filesystem image storage.
//!
//! Uploads land under `<root>/user_images/` with a fresh UUID filename; the
//! returned relative path is what activity records store. Deletes are
//! fire-and-forget: a stale file on disk is preferable to failing a request
//! over cleanup.

use std::path::{Path, PathBuf};

use uuid::Uuid;

const USER_IMAGES_DIR: &str = "user_images";

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Extract and validate the extension of an uploaded image filename.
pub fn image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist image bytes, returning the stable relative path to store on
    /// the record.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<String> {
        let dir = self.root.join(USER_IMAGES_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let rel_path = format!("{}/{}.{}", USER_IMAGES_DIR, Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&rel_path), bytes).await?;
        Ok(rel_path)
    }

    /// Fire-and-forget delete. No retry; failures are logged and dropped.
    pub fn delete_detached(&self, rel_path: &str) {
        let path = self.root.join(rel_path);
        tokio::spawn(async move {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::debug!(path = %path.display(), error = %e, "Image delete failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_validation() {
        assert_eq!(image_extension("selfie.JPG"), Some("jpg".into()));
        assert_eq!(image_extension("a.b.png"), Some("png".into()));
        assert_eq!(image_extension("malware.exe"), None);
        assert_eq!(image_extension("noextension"), None);
    }

    #[tokio::test]
    async fn save_writes_under_user_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let rel = store.save("png", b"not-really-a-png").await.unwrap();
        assert!(rel.starts_with("user_images/"));
        assert!(rel.ends_with(".png"));

        let bytes = tokio::fs::read(dir.path().join(&rel)).await.unwrap();
        assert_eq!(bytes, b"not-really-a-png");
    }

    #[tokio::test]
    async fn saves_get_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let a = store.save("jpg", b"a").await.unwrap();
        let b = store.save("jpg", b"b").await.unwrap();
        assert_ne!(a, b);
    }
}
