//! Directory scanning for audio files

use crate::{LibraryError, Result, Track};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

/// Cover image extensions, in probe order. The first existing file wins.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "jpeg", "webp"];

/// Scanner for a flat music directory
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    music_dir: PathBuf,
    image_dir: PathBuf,

    /// URL prefix audio files are served under (e.g. `/music`)
    music_route: Option<String>,

    /// URL prefix cover images are served under (e.g. `/image`)
    image_route: Option<String>,
}

impl LibraryScanner {
    /// Create a scanner for `music_dir`, probing covers in `image_dir`
    pub fn new(music_dir: impl Into<PathBuf>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            music_dir: music_dir.into(),
            image_dir: image_dir.into(),
            music_route: None,
            image_route: None,
        }
    }

    /// Fill `Track::relative_path` with `{route}/{file name}`
    pub fn with_music_route(mut self, route: impl Into<String>) -> Self {
        self.music_route = Some(route.into());
        self
    }

    /// Report covers as `{route}/{image file name}` instead of a filesystem path
    pub fn with_image_route(mut self, route: impl Into<String>) -> Self {
        self.image_route = Some(route.into());
        self
    }

    pub fn music_dir(&self) -> &Path {
        &self.music_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Scan the music directory
    ///
    /// Only regular files directly inside the directory are considered
    /// (symlinks are followed, subdirectories are not descended into).
    /// Entries are visited in file-name order and numbered from 0.
    ///
    /// # Errors
    ///
    /// Fails if the music directory is missing, is not a directory, or
    /// cannot be listed. Unreadable individual entries are skipped.
    pub fn scan(&self) -> Result<Vec<Track>> {
        let root = absolute(&self.music_dir)?;

        let metadata = std::fs::metadata(&root).map_err(|source| LibraryError::Io {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(LibraryError::NotADirectory(root));
        }

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut tracks = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
                continue;
            }

            tracks.push(self.build_track(tracks.len(), entry.path()));
        }

        tracing::debug!(
            dir = %root.display(),
            count = tracks.len(),
            "Scanned music directory"
        );

        Ok(tracks)
    }

    fn build_track(&self, id: usize, path: &Path) -> Track {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let relative_path = self
            .music_route
            .as_deref()
            .map(|route| join_route(route, &name));

        let image = find_cover(&self.image_dir, &title).map(|cover| match &self.image_route {
            Some(route) => {
                let file = cover
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                join_route(route, &file)
            }
            None => cover.display().to_string(),
        });

        Track {
            id,
            name,
            path: path.to_path_buf(),
            relative_path,
            title,
            image,
        }
    }
}

/// Check if a file has a supported audio extension (case-insensitive)
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Look for `{title}.{ext}` in `image_dir` for each of [`IMAGE_EXTENSIONS`]
pub fn find_cover(image_dir: &Path, title: &str) -> Option<PathBuf> {
    if title.is_empty() {
        return None;
    }

    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| image_dir.join(format!("{}.{}", title, ext)))
        .find(|candidate| candidate.is_file())
}

fn join_route(route: &str, file: &str) -> String {
    format!("{}/{}", route.trim_end_matches('/'), file)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })
}
