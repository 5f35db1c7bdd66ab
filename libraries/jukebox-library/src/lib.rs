//! Jukebox Library
//!
//! Turns a flat directory of audio files into an ordered list of [`Track`]s,
//! attaching a cover image when one with the same base name exists in a
//! separate image directory.
//!
//! Nothing is cached: every call to [`LibraryScanner::scan`] re-reads the
//! directory, so files added on disk show up on the next scan.
//!
//! # Example
//!
//! ```no_run
//! use jukebox_library::LibraryScanner;
//!
//! let scanner = LibraryScanner::new("./music", "./image")
//!     .with_music_route("/music")
//!     .with_image_route("/image");
//!
//! for track in scanner.scan()? {
//!     println!("{} - {}", track.id, track.title);
//! }
//! # Ok::<(), jukebox_library::LibraryError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod scanner;
mod track;

pub use error::{LibraryError, Result};
pub use scanner::{
    find_cover, is_audio_file, LibraryScanner, AUDIO_EXTENSIONS, IMAGE_EXTENSIONS,
};
pub use track::Track;
