use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/)([A-Za-z0-9_-]+)")
        .expect("youtube pattern is valid")
});

static VIMEO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("vimeo pattern is valid"));

/// Rewrite a video page URL into its embeddable player URL.
///
/// YouTube `watch?v=` and `youtu.be` links become `/embed/{id}`, numeric
/// Vimeo links become player URLs. Anything already containing "embed", or
/// not recognised, is returned unchanged.
pub fn embed_url(url: &str) -> String {
    if url.contains("embed") {
        return url.to_string();
    }
    if let Some(caps) = YOUTUBE.captures(url) {
        return format!("https://www.youtube.com/embed/{}", &caps[1]);
    }
    if let Some(caps) = VIMEO.captures(url) {
        return format!("https://player.vimeo.com/video/{}", &caps[1]);
    }
    url.to_string()
}
