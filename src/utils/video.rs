//! Player URLs for the two video hosts lessons link to.
//!
//! - YouTube: any of `youtu.be/ID`, `v/ID`, `u/x/ID`, `embed/ID`, `watch?v=ID`,
//!   `&v=ID` where the id is exactly 11 characters. The last marker in the
//!   URL wins.
//! - Google Drive: `/file/d/ID`, `id=ID`, `/d/ID`, tried in that order.

const YOUTUBE_ID_LEN: usize = 11;

/// Returns the embeddable player URL for `url`, if the host is recognised.
pub fn embed_url(url: &str) -> Option<String> {
    if let Some(id) = youtube_id(url) {
        return Some(format!("https://www.youtube.com/embed/{}", id));
    }

    google_drive_id(url).map(|id| format!("https://drive.google.com/file/d/{}/preview", id))
}

pub fn youtube_id(url: &str) -> Option<&str> {
    let bytes = url.as_bytes();

    // Scan right to left so the rightmost marker is the one used.
    let id_start = (0..bytes.len())
        .rev()
        .find_map(|start| youtube_marker_len(&bytes[start..]).map(|len| start + len))?;

    let rest = &url[id_start..];
    let id_end = rest.find(['#', '&', '?']).unwrap_or(rest.len());
    let id = &rest[..id_end];

    (id.len() == YOUTUBE_ID_LEN).then_some(id)
}

/// Length of the YouTube marker at the start of `s`, if there is one.
fn youtube_marker_len(s: &[u8]) -> Option<usize> {
    // `youtu.be/` where the dot matches any single character.
    if s.len() >= 9 && s.starts_with(b"youtu") && &s[6..9] == b"be/" {
        return Some(9);
    }
    if s.starts_with(b"v/") {
        return Some(2);
    }
    if s.len() >= 4 && s.starts_with(b"u/") && is_word_byte(s[2]) && s[3] == b'/' {
        return Some(4);
    }
    if s.starts_with(b"embed/") {
        return Some(6);
    }
    if s.starts_with(b"watch?v=") {
        return Some(8);
    }
    if s.starts_with(b"&v=") {
        return Some(3);
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub fn google_drive_id(url: &str) -> Option<&str> {
    ["/file/d/", "id=", "/d/"]
        .into_iter()
        .find_map(|marker| drive_id_after(url, marker))
}

fn drive_id_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    // Leftmost occurrence followed by at least one id character.
    url.match_indices(marker).find_map(|(pos, _)| {
        let rest = &url[pos + marker.len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_watch_url() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_youtube_short_and_embed_urls() {
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/user/channel#p/u/1/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_youtube_rejects_wrong_length() {
        assert_eq!(youtube_id("https://youtu.be/short"), None);
        assert_eq!(youtube_id("https://example.com/video.mp4"), None);
    }

    #[test]
    fn test_drive_patterns() {
        assert_eq!(
            google_drive_id("https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing"),
            Some("1AbC_d-9")
        );
        assert_eq!(
            google_drive_id("https://drive.google.com/open?id=XYZ123"),
            Some("XYZ123")
        );
        assert_eq!(google_drive_id("https://docs.google.com/d/abc"), Some("abc"));
        assert_eq!(google_drive_id("https://vimeo.com/123"), None);
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://drive.google.com/file/d/1AbC/view").as_deref(),
            Some("https://drive.google.com/file/d/1AbC/preview")
        );
        assert_eq!(embed_url("https://vimeo.com/123"), None);
    }
}
