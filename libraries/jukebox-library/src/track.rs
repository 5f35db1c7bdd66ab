/// Track type produced by a library scan
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One audio file found during a scan.
///
/// Tracks are rebuilt on every scan and never mutated afterwards. The `id`
/// is the 0-based position in listing order, so it is only stable for as
/// long as the directory contents are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: usize,

    /// File name including extension (e.g. `song.mp3`)
    pub name: String,

    /// Absolute path on disk
    pub path: PathBuf,

    /// URL path the audio file is served under, if a route is configured
    pub relative_path: Option<String>,

    /// File name without its extension
    pub title: String,

    /// Cover image reference, if one was found
    pub image: Option<String>,
}
