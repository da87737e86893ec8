//! Paths and wire types for the demo backend.
//!
//! Every sample-scoped path is rooted at `/api/sample/{name}`, where the name
//! is percent-encoded the same way a browser's `encodeURIComponent` does it.
//! The page and the CLI client both build their URLs from here.

use serde::{Deserialize, Serialize};
use crate::zoom::ZoomWindow;

pub const HEALTH_PATH: &str = "/health";
pub const CACHE_BUST_PARAM: &str = "_t";

const SAMPLE_PREFIX: &str = "/api/sample/";

/// Which rendition of the sample a spectrogram shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Noisy,
    Denoised,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Noisy => "noisy",
            Variant::Denoised => "denoised",
        }
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// Percent-encode a single path component.
/// Keeps the `encodeURIComponent` unreserved set and encodes every other
/// UTF-8 byte as `%XX` with uppercase hex.
pub fn encode_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
    }
    out
}

/// URL builder for one sample's endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleEndpoints {
    root: String,
}

impl SampleEndpoints {
    pub fn new(sample_name: &str) -> Self {
        Self {
            root: format!("{SAMPLE_PREFIX}{}", encode_component(sample_name)),
        }
    }

    pub fn meta(&self) -> String {
        format!("{}/meta", self.root)
    }

    pub fn audio(&self) -> String {
        format!("{}/audio", self.root)
    }

    /// Full-length spectrogram image.
    pub fn spectrogram(&self, variant: Variant) -> String {
        format!("{}/spectrogram/{}.png", self.root, variant.as_str())
    }

    /// Spectrogram cropped to the zoom window.
    pub fn zoom_spectrogram(&self, variant: Variant, window: &ZoomWindow) -> String {
        format!(
            "{}/spectrogram/zoom/{}.png?zoom_start_s={}&zoom_len_s={}",
            self.root,
            variant.as_str(),
            window.start_s,
            window.len_s,
        )
    }

    pub fn denoise(&self) -> String {
        format!("{}/denoise", self.root)
    }

    pub fn reset_zoom(&self) -> String {
        format!("{}/reset_zoom", self.root)
    }

    pub fn erase_edits(&self) -> String {
        format!("{}/erase_edits", self.root)
    }
}

fn param_key(pair: &str) -> &str {
    pair.split_once('=').map(|(k, _)| k).unwrap_or(pair)
}

/// Set the `_t` query parameter to `now_ms`, replacing any earlier value,
/// so the browser refetches an image whose URL is otherwise unchanged.
pub fn cache_bust(url: &str, now_ms: u64) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (url, None),
    };
    let (path, query) = match base.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (base, None),
    };

    let stamp = format!("{CACHE_BUST_PARAM}={now_ms}");
    let mut pairs: Vec<&str> = query
        .map(|q| {
            q.split('&')
                .filter(|p| !p.is_empty() && param_key(p) != CACHE_BUST_PARAM)
                .collect()
        })
        .unwrap_or_default();
    pairs.push(&stamp);

    let mut out = format!("{path}?{}", pairs.join("&"));
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}

/// Body of `POST /api/sample/{name}/denoise`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenoiseRequest {
    pub model: String,
    pub zoom_start_s: f64,
    pub zoom_len_s: f64,
}

impl DenoiseRequest {
    pub fn new(model: &str, window: &ZoomWindow) -> Self {
        Self {
            model: model.to_string(),
            zoom_start_s: window.start_s,
            zoom_len_s: window.len_s,
        }
    }
}

/// `{"ok": true}` reply shared by health and the POST endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)Z9"), "a-b_c.d!e~f*g'h(i)Z9");
    }

    #[test]
    fn test_encode_escapes_reserved_and_spaces() {
        assert_eq!(encode_component("noisy sample #1.wav"), "noisy%20sample%20%231.wav");
        assert_eq!(encode_component("a/b?c&d"), "a%2Fb%3Fc%26d");
    }

    #[test]
    fn test_encode_utf8_multibyte() {
        assert_eq!(encode_component("é.wav"), "%C3%A9.wav");
    }

    #[test]
    fn test_sample_paths() {
        let ep = SampleEndpoints::new("bird call.wav");
        assert_eq!(ep.meta(), "/api/sample/bird%20call.wav/meta");
        assert_eq!(ep.audio(), "/api/sample/bird%20call.wav/audio");
        assert_eq!(ep.denoise(), "/api/sample/bird%20call.wav/denoise");
        assert_eq!(ep.reset_zoom(), "/api/sample/bird%20call.wav/reset_zoom");
        assert_eq!(ep.erase_edits(), "/api/sample/bird%20call.wav/erase_edits");
        assert_eq!(
            ep.spectrogram(Variant::Denoised),
            "/api/sample/bird%20call.wav/spectrogram/denoised.png"
        );
    }

    #[test]
    fn test_zoom_path_formats_numbers_compactly() {
        let ep = SampleEndpoints::new("x.wav");
        let w = ZoomWindow { start_s: 3.5, len_s: 1.0 };
        assert_eq!(
            ep.zoom_spectrogram(Variant::Noisy, &w),
            "/api/sample/x.wav/spectrogram/zoom/noisy.png?zoom_start_s=3.5&zoom_len_s=1"
        );
        let w = ZoomWindow::default();
        assert!(ep
            .zoom_spectrogram(Variant::Denoised, &w)
            .ends_with("denoised.png?zoom_start_s=0&zoom_len_s=1"));
    }

    #[test]
    fn test_cache_bust_appends() {
        assert_eq!(cache_bust("/a/noisy.png", 42), "/a/noisy.png?_t=42");
        assert_eq!(
            cache_bust("/a/z.png?zoom_start_s=0&zoom_len_s=1", 7),
            "/a/z.png?zoom_start_s=0&zoom_len_s=1&_t=7"
        );
    }

    #[test]
    fn test_cache_bust_replaces_previous_stamp() {
        let once = cache_bust("/a.png?x=1", 1);
        let twice = cache_bust(&once, 2);
        assert_eq!(twice, "/a.png?x=1&_t=2");
    }

    #[test]
    fn test_cache_bust_keeps_fragment() {
        assert_eq!(cache_bust("/a.png#top", 5), "/a.png?_t=5#top");
    }

    #[test]
    fn test_denoise_request_wire_names() {
        let req = DenoiseRequest::new("unet-small.onnx", &ZoomWindow { start_s: 2.25, len_s: 1.0 });
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "unet-small.onnx");
        assert_eq!(v["zoom_start_s"], 2.25);
        assert_eq!(v["zoom_len_s"], 1.0);
    }

    #[test]
    fn test_ack_tolerates_missing_ok() {
        let ack: Ack = serde_json::from_str("{}").unwrap();
        assert!(!ack.ok);
        let ack: Ack = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(ack.ok);
    }
}
