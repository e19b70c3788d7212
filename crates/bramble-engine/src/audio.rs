//! Narration audio storage.
//!
//! Audio files live under `{root}/{book_id}/{filename}` and are addressed
//! publicly as `{public_base}/{book_id}/{filename}`. Writing the same
//! filename twice overwrites the previous bytes and yields the same address,
//! which makes re-uploads idempotent per filename.

use std::fs;
use std::path::{Path, PathBuf};

use bramble_types::BookId;

use crate::error::{EngineError, EngineResult};

/// Audio container formats accepted for narration uploads.
pub const ALLOWED_AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "ogg", "wav"];

/// Reduce an uploaded filename to a single safe path component.
///
/// Directory components are stripped (only the final component survives),
/// characters outside `[A-Za-z0-9._-]` become `_`, and leading dots are
/// removed so the result can never traverse out of the audio root or hide
/// itself. Fails if nothing usable remains.
pub fn sanitize_filename(raw: &str) -> EngineResult<String> {
    let last = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw);
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return Err(EngineError::InvalidFilename(raw.to_string()));
    }
    Ok(cleaned)
}

/// File-backed store for narration audio.
pub struct MediaStore {
    root: PathBuf,
    public_base: String,
}

impl MediaStore {
    /// A media store rooted at `root`, addressed publicly under `/audio`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_public_base(root, "/audio")
    }

    /// A media store with an explicit public address prefix.
    pub fn with_public_base(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    /// Filesystem root the audio files live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` for `book` under a sanitized `filename` and return the
    /// stored file's location. The extension is lowercased so re-uploads of
    /// `Intro.MP3` and `intro.mp3` land on the same address.
    pub fn store_audio(
        &self,
        book: BookId,
        filename: &str,
        bytes: &[u8],
    ) -> EngineResult<StoredAudio> {
        let name = sanitize_filename(filename)?;
        let name = normalize_extension(&name)?;

        let dir = self.root.join(book.value().to_string());
        fs::create_dir_all(&dir)?;
        let path = dir.join(&name);
        fs::write(&path, bytes)?;

        Ok(StoredAudio {
            path,
            url: format!("{}/{}/{}", self.public_base, book.value(), name),
        })
    }
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("root", &self.root)
            .field("public_base", &self.public_base)
            .finish()
    }
}

/// Where a stored audio file ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredAudio {
    /// Location on disk.
    pub path: PathBuf,
    /// Public address recorded on the waypoint's content row.
    pub url: String,
}

fn normalize_extension(name: &str) -> EngineResult<String> {
    let Some((stem, extension)) = name.rsplit_once('.') else {
        return Err(EngineError::UnsupportedAudioFormat(name.to_string()));
    };
    let extension = extension.to_ascii_lowercase();
    if stem.is_empty() || !ALLOWED_AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(EngineError::UnsupportedAudioFormat(name.to_string()));
    }
    Ok(format!("{stem}.{extension}"))
}
