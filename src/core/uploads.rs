//! Image upload naming and storage.

use crate::config::UPLOADS_SUBDIR;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::io;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

const MAX_STEM_CHARS: usize = 50;
const MAX_NAME_COLLISIONS: u32 = 100;

/// Lower-cased extension of `file_name` if it names an accepted image type.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Reduces a client-supplied name to a safe stem: no path components, only
/// ASCII letters, digits, `-`, `_` and `.`, whitespace folded to `_`.
pub fn sanitize_stem(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);

    let cleaned: String = stem
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_owned()
}

/// Name the upload is stored under: `<stem>_<YYYYMMDD-HHMMSS>.<ext>`.
pub fn stored_file_name(file_name: &str, extension: &str, now: NaiveDateTime) -> String {
    let stem = sanitize_stem(file_name);
    let stem: String = if stem.is_empty() {
        "upload".to_owned()
    } else {
        stem.chars().take(MAX_STEM_CHARS).collect()
    };

    format!("{stem}_{}.{extension}", now.format("%Y%m%d-%H%M%S"))
}

/// Name tried on the `attempt`-th collision: `<stem>_<ts>_<n>.<ext>`.
fn candidate_name(name: &str, extension: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_owned();
    }
    let head = name
        .strip_suffix(&format!(".{extension}"))
        .unwrap_or(name);
    format!("{head}_{attempt}.{extension}")
}

/// Writes the image into `upload_dir` and returns its path relative to the
/// static root.
///
/// Existing files are never replaced: two uploads with the same stem in the
/// same second get a numeric suffix.
pub async fn save_image(
    upload_dir: &Path,
    file_name: &str,
    extension: &str,
    bytes: &[u8],
    now: NaiveDateTime,
) -> io::Result<String> {
    let stored = stored_file_name(file_name, extension, now);
    tokio::fs::create_dir_all(upload_dir).await?;

    for attempt in 0..MAX_NAME_COLLISIONS {
        let name = candidate_name(&stored, extension, attempt);
        let path = upload_dir.join(&name);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        if let Err(e) = file.write_all(bytes).await {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                warn!("failed to remove partial upload {name}: {cleanup}");
            }
            return Err(e);
        }
        file.flush().await?;
        info!("saved upload {name} ({} bytes)", bytes.len());

        return Ok(format!("{UPLOADS_SUBDIR}/{name}"));
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {stored} after {MAX_NAME_COLLISIONS} attempts"),
    ))
}
