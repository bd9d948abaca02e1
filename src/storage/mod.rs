use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::export::{ExportArtifact, DEFAULT_FILE_STEM};
use crate::surface::SurfaceError;

const PICTURES_SUBDIR: &str = "Pictures";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("export artifact could not be decoded: {0}")]
    Artifact(#[from] SurfaceError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Local stand-in for a browser download: artifacts become files on disk.
#[derive(Debug, Clone)]
pub struct ExportStorage {
    pictures_dir: PathBuf,
}

impl ExportStorage {
    pub const fn with_paths(pictures_dir: PathBuf) -> Self {
        Self { pictures_dir }
    }

    pub fn with_default_paths() -> StorageResult<Self> {
        let home = std::env::var("HOME").map_err(|_| StorageError::MissingHomeDirectory)?;
        let mut pictures_dir = PathBuf::from(home);
        pictures_dir.push(PICTURES_SUBDIR);
        Ok(Self::with_paths(pictures_dir))
    }

    /// Uses the configured directory when present, `$HOME/Pictures` otherwise.
    pub fn from_output_dir(output_dir: Option<&Path>) -> StorageResult<Self> {
        match output_dir {
            Some(dir) => Ok(Self::with_paths(dir.to_path_buf())),
            None => Self::with_default_paths(),
        }
    }

    pub fn pictures_dir(&self) -> &Path {
        &self.pictures_dir
    }

    pub fn target_path_for(&self, artifact: &ExportArtifact, timestamp: u64) -> PathBuf {
        self.pictures_dir
            .join(artifact.file_name(&format!("{DEFAULT_FILE_STEM}-{timestamp}")))
    }

    /// Saves under a timestamped `wallpaper-<ts>.<ext>` name.
    pub fn save_artifact(&self, artifact: &ExportArtifact) -> StorageResult<PathBuf> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        let path = self.target_path_for(artifact, timestamp);
        write_artifact(artifact, &path)?;
        Ok(path)
    }
}

/// Decodes the artifact's data URL and writes the raw image bytes to `path`.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> StorageResult<()> {
    let bytes = artifact.bytes()?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        width = artifact.width,
        height = artifact.height,
        "saved export"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::export::{render_export, ExportRequest, ExportSettings};
    use crate::gradient::GradientSpan;
    use crate::surface::{load_image, ImageKind, Surface};

    fn artifact(kind: ImageKind) -> ExportArtifact {
        let mut surface = Surface::new(4, 4).expect("surface should allocate");
        render_export(
            &mut surface,
            &[Color::opaque(10, 20, 30); 4],
            GradientSpan::Inclusive,
            &ExportRequest {
                id: 1,
                width: 6,
                height: 3,
                settings: ExportSettings {
                    kind,
                    ..ExportSettings::default()
                },
            },
        )
        .expect("export should succeed")
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cornerglow-storage-{name}-{}", std::process::id()))
    }

    #[test]
    fn target_path_uses_timestamped_wallpaper_name() {
        let storage = ExportStorage::with_paths(PathBuf::from("/home/test/Pictures"));
        let path = storage.target_path_for(&artifact(ImageKind::Jpeg), 1234);
        assert_eq!(
            path,
            PathBuf::from("/home/test/Pictures/wallpaper-1234.jpg")
        );
    }

    #[test]
    fn configured_output_dir_wins_over_home() {
        let storage = ExportStorage::from_output_dir(Some(Path::new("/srv/walls")))
            .expect("explicit dir should not need HOME");
        assert_eq!(storage.pictures_dir(), Path::new("/srv/walls"));
    }

    #[test]
    fn save_artifact_creates_directory_and_writes_decodable_image() {
        let dir = scratch_dir("save");
        let storage = ExportStorage::with_paths(dir.clone());

        let path = storage
            .save_artifact(&artifact(ImageKind::Png))
            .expect("save should succeed");
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("png"));

        let bytes = std::fs::read(&path).expect("saved file should exist");
        let image = load_image(&bytes).expect("saved file should decode");
        assert_eq!(image.dimensions(), (6, 3));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn write_artifact_rejects_corrupt_data_url() {
        let mut broken = artifact(ImageKind::Jpeg);
        broken.data_url = "data:image/jpeg;base64,@@@".to_string();
        let err = write_artifact(&broken, &scratch_dir("corrupt").join("out.jpg"))
            .expect_err("corrupt payload should fail");
        assert!(matches!(err, StorageError::Artifact(_)));
    }
}
