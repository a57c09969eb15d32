//! Latest-batch cache
//!
//! Keeps the most recent successful batch in a single JSON file, the
//! server-side equivalent of one fixed browser storage key. A new batch
//! replaces the old one wholesale; entries can be removed one by one. A failed
//! batch never touches the cache.
//!
//! Writes go through a temp file + rename so a crash mid-write leaves the
//! previous file intact. A tokio Mutex serializes writers.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::GenerationResult;

/// Suggested file name when downloading an image.
pub fn download_filename(id: &str) -> String {
    format!("luminary-ai-{id}.png")
}

pub struct Gallery {
    path: PathBuf,
    state: Mutex<Vec<GenerationResult>>,
}

impl Gallery {
    /// Load the cached batch, or start empty if the file does not exist yet.
    pub async fn load(path: PathBuf) -> Result<Self> {
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| Error::Gallery(format!("checking {}: {e}", path.display())))?;
        let state = if exists {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Gallery(format!("reading {}: {e}", path.display())))?;
            let batch: Vec<GenerationResult> = serde_json::from_str(&contents)
                .map_err(|e| Error::Gallery(format!("parsing {}: {e}", path.display())))?;
            info!(path = %path.display(), images = batch.len(), "loaded cached batch");
            batch
        } else {
            info!(path = %path.display(), "no cached batch, starting empty");
            Vec::new()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub async fn list(&self) -> Vec<GenerationResult> {
        self.state.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<GenerationResult> {
        self.state
            .lock()
            .await
            .iter()
            .find(|image| image.id == id)
            .cloned()
    }

    /// Swap in a new batch and persist it.
    pub async fn replace(&self, batch: Vec<GenerationResult>) -> Result<()> {
        let mut state = self.state.lock().await;
        write_atomic(&self.path, &batch).await?;
        debug!(images = batch.len(), "replaced cached batch");
        *state = batch;
        Ok(())
    }

    /// Remove one image. Returns whether it was present.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(position) = state.iter().position(|image| image.id == id) else {
            return Ok(false);
        };
        let mut next = state.clone();
        next.remove(position);
        write_atomic(&self.path, &next).await?;
        *state = next;
        debug!(id, "removed image from cached batch");
        Ok(true)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Write the batch to `path` atomically, creating the parent directory if needed.
async fn write_atomic(path: &Path, batch: &[GenerationResult]) -> Result<()> {
    let json = serde_json::to_string(batch)
        .map_err(|e| Error::Gallery(format!("serializing batch: {e}")))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::Gallery(format!("creating {}: {e}", dir.display())))?;

    let tmp_path = dir.join(format!(".gallery.tmp.{}", std::process::id()));
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Gallery(format!("writing temp gallery file: {e}")))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Gallery(format!("renaming temp gallery file: {e}")))?;

    debug!(path = %path.display(), "persisted cached batch");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LATEST_BATCH_KEY;
    use crate::types::{AspectRatio, GenerationRequest, ImageReference, ImageStyle};

    fn result(prompt: &str) -> GenerationResult {
        let request =
            GenerationRequest::new(prompt, AspectRatio::Square, ImageStyle::NoStyle, 1).unwrap();
        GenerationResult::new(ImageReference::from_inline("image/png", "QUJD"), &request)
    }

    fn cache_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join(format!("{LATEST_BATCH_KEY}.json"))
    }

    #[tokio::test]
    async fn missing_file_starts_empty_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::load(cache_path(&dir)).await.unwrap();
        assert!(gallery.is_empty().await);
        assert!(!cache_path(&dir).exists());
    }

    #[tokio::test]
    async fn replace_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::load(cache_path(&dir)).await.unwrap();
        let batch = vec![result("fox"), result("owl")];
        gallery.replace(batch.clone()).await.unwrap();

        let reloaded = Gallery::load(cache_path(&dir)).await.unwrap();
        assert_eq!(reloaded.list().await, batch);
    }

    #[tokio::test]
    async fn replace_discards_previous_batch() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::load(cache_path(&dir)).await.unwrap();
        gallery.replace(vec![result("fox"), result("owl")]).await.unwrap();
        let newer = vec![result("bear")];
        gallery.replace(newer.clone()).await.unwrap();

        assert_eq!(gallery.list().await, newer);
    }

    #[tokio::test]
    async fn remove_drops_one_image_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::load(cache_path(&dir)).await.unwrap();
        let fox = result("fox");
        let owl = result("owl");
        gallery.replace(vec![fox.clone(), owl.clone()]).await.unwrap();

        assert!(gallery.remove(&fox.id).await.unwrap());
        assert!(!gallery.remove(&fox.id).await.unwrap());

        let reloaded = Gallery::load(cache_path(&dir)).await.unwrap();
        assert_eq!(reloaded.list().await, vec![owl]);
    }

    #[tokio::test]
    async fn get_finds_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::load(cache_path(&dir)).await.unwrap();
        let fox = result("fox");
        gallery.replace(vec![fox.clone()]).await.unwrap();

        assert_eq!(gallery.get(&fox.id).await, Some(fox));
        assert!(gallery.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn reads_cache_written_by_web_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_path(&dir);
        std::fs::write(
            &path,
            r#"[{"id":"k3j9x0l2a01735500000000","url":"data:image/png;base64,QUJD","prompt":"fox","timestamp":1735500000000,"params":{"aspectRatio":"9:16","style":"3D Pixar"}}]"#,
        )
        .unwrap();

        let gallery = Gallery::load(path).await.unwrap();
        let image = gallery.get("k3j9x0l2a01735500000000").await.unwrap();
        assert_eq!(image.params.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(image.params.style, ImageStyle::Pixar);
        assert_eq!(image.timestamp, 1735500000000);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_path(&dir);
        std::fs::write(&path, "not json").unwrap();

        let err = Gallery::load(path).await.err().unwrap();
        assert!(matches!(err, Error::Gallery(_)));
    }

    #[tokio::test]
    async fn unreadable_location_is_an_error_not_an_empty_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let err = Gallery::load(blocker.join("cache.json")).await.err().unwrap();
        assert!(matches!(err, Error::Gallery(_)));
    }

    #[tokio::test]
    async fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let gallery = Gallery::load(path.clone()).await.unwrap();
        gallery.replace(vec![result("fox")]).await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn download_filename_uses_id() {
        assert_eq!(download_filename("abc123"), "luminary-ai-abc123.png");
    }
}
