use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// URL prefix under which stored images are served and recorded
pub const PUBLIC_PREFIX: &str = "uploads";

/// Local-disk store for uploaded product images.
///
/// Files are named `<uuid>.<original extension>` inside the upload directory.
/// Products record them as `uploads/<file name>`, the same path `/uploads/*`
/// serves, so the server's directory layout never leaks to clients.
pub struct ImageStore {
    upload_dir: PathBuf,
}

impl ImageStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Writes an uploaded file and returns its public path
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let file_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::write(self.upload_dir.join(&file_name), bytes).await?;

        let stored = format!("{}/{}", PUBLIC_PREFIX, file_name);
        debug!(path = %stored, "Stored uploaded image");
        Ok(stored)
    }

    /// Maps a public path back to the file inside the upload directory.
    /// Anything that is not a single file name under the prefix is refused.
    pub fn resolve(&self, stored_path: &str) -> Option<PathBuf> {
        let file_name = stored_path
            .strip_prefix(PUBLIC_PREFIX)?
            .strip_prefix('/')?;

        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.upload_dir.join(name)),
            _ => None,
        }
    }

    /// Removes a previously stored image. A file that is already gone counts
    /// as deleted, as does a path this store never handed out.
    #[instrument(skip(self))]
    pub async fn delete(&self, stored_path: &str) -> std::io::Result<()> {
        let Some(path) = self.resolve(stored_path) else {
            warn!("Refusing to delete a path outside the upload directory");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted stored image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Stored image was already missing");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Extension of the client-supplied name, restricted to alphanumerics so the
/// stored name cannot escape the upload directory
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}
