//! Index document parsing and cursor truncation. Pure, no I/O.

use crate::error::DownloadError;
use url::Url;

/// Split an index body into filenames: whitespace-delimited, empty tokens
/// dropped, order kept.
pub fn parse_index(body: &str) -> Vec<&str> {
    body.split_whitespace().collect()
}

/// Append `filename` to `base` as a relative path: each `/`-separated piece
/// becomes one escaped segment, empty pieces are dropped. A trailing `/` on
/// the base is not doubled.
pub fn file_uri(base: &Url, filename: &str) -> Result<Url, DownloadError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| DownloadError::InvalidUrl {
            url: base.to_string(),
            reason: "base URI cannot take path segments".to_string(),
        })?
        .pop_if_empty()
        .extend(filename.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

/// Keep only files strictly after `cursor`. A cursor that is absent, or not
/// present in `files`, keeps the whole list.
pub fn files_after_cursor(mut files: Vec<Url>, cursor: Option<&Url>) -> Vec<Url> {
    if let Some(pos) = cursor.and_then(|c| files.iter().position(|f| f == c)) {
        files.drain(..=pos);
    }
    files
}
