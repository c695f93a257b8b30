//! Media-reference resolution.
//!
//! The configured locator is opaque to the rest of the core except for the
//! canonical 11-character video id extracted here. Extraction understands
//! the common URL shapes (`watch?v=`, `youtu.be/`, `/embed/`, and `v` as a
//! later query parameter); anything else yields no id and the trigger fails
//! upstream instead of entering playback.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Canonical 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap a token, accepting only the canonical 11-character alphabet.
    pub fn new(token: &str) -> Option<Self> {
        let ok = token.len() == 11
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        ok.then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Embed URL handed to the media collaborator.
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}?autoplay=1", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the canonical video id from a locator, if any.
///
/// Scheme-less input is retried as https before giving up, since pasted
/// links frequently arrive as `www.youtube.com/watch?v=...`.
pub fn extract_video_id(reference: &str) -> Option<VideoId> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let parsed = Url::parse(reference)
        .ok()
        .or_else(|| {
            if reference.contains("://") {
                None
            } else {
                Url::parse(&format!("https://{reference}")).ok()
            }
        })?;

    // watch?v= and &v= are both "the v query parameter".
    if let Some((_, value)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        if let Some(id) = VideoId::new(&value) {
            return Some(id);
        }
    }

    let mut segments = parsed.path_segments()?;
    let host = parsed.host_str().unwrap_or_default();

    // youtu.be/<id> short links carry the id as the first path segment.
    if host.eq_ignore_ascii_case("youtu.be") {
        return VideoId::new(segments.next()?);
    }

    // .../embed/<id> player URLs.
    while let Some(segment) = segments.next() {
        if segment == "embed" {
            return VideoId::new(segments.next()?);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn extracts_watch_urls() {
        let id = extract_video_id(&format!("https://www.youtube.com/watch?v={ID}")).unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn extracts_v_as_later_query_parameter() {
        let id =
            extract_video_id(&format!("https://www.youtube.com/watch?list=PL123&v={ID}")).unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn extracts_short_links() {
        let id = extract_video_id(&format!("https://youtu.be/{ID}")).unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn extracts_embed_urls() {
        let id = extract_video_id(&format!("https://www.youtube.com/embed/{ID}")).unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn accepts_schemeless_input() {
        let id = extract_video_id(&format!("www.youtube.com/watch?v={ID}")).unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(extract_video_id("").is_none());
        assert!(extract_video_id("   ").is_none());
        assert!(extract_video_id("not a url at all").is_none());
        assert!(extract_video_id("https://example.com/other").is_none());
    }

    #[test]
    fn rejects_wrong_length_tokens() {
        assert!(extract_video_id("https://youtu.be/short").is_none());
        assert!(extract_video_id("https://www.youtube.com/watch?v=waytoolongtoken").is_none());
    }

    #[test]
    fn rejects_tokens_outside_alphabet() {
        assert!(extract_video_id("https://youtu.be/dQw4w9WgXc!").is_none());
    }

    #[test]
    fn rebuilds_canonical_urls() {
        let id = VideoId::new(ID).unwrap();
        assert_eq!(id.watch_url(), format!("https://www.youtube.com/watch?v={ID}"));
        assert_eq!(
            id.embed_url(),
            format!("https://www.youtube.com/embed/{ID}?autoplay=1")
        );
    }
}
