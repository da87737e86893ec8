use serde::{Deserialize, Serialize};

/// Reply of `GET /api/sample/{name}/meta`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleMeta {
    pub sample: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub rate_hz: u32,
}

impl SampleMeta {
    /// Reported duration in seconds, `None` when the backend doesn't know it.
    pub fn duration_s(&self) -> Option<f64> {
        (self.duration_ms > 0).then(|| self.duration_ms as f64 / 1000.0)
    }
}

/// Text shown in the metadata box. The model name sits on its own line
/// because model file names can be long.
pub fn meta_text(meta: &SampleMeta, model: &str, zoom_start_s: f64) -> String {
    format!(
        "Sample: {}\nDuration: {} ms\nRate: {} Hz\nModel:\n{}\nZoom start: {:.3} s",
        meta.sample, meta.duration_ms, meta.rate_hz, model, zoom_start_s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_text_layout() {
        let meta = SampleMeta {
            sample: "hum.wav".into(),
            duration_ms: 12_500,
            rate_hz: 4000,
        };
        assert_eq!(
            meta_text(&meta, "rnnoise-v2.eim", 3.25),
            "Sample: hum.wav\nDuration: 12500 ms\nRate: 4000 Hz\nModel:\nrnnoise-v2.eim\nZoom start: 3.250 s"
        );
    }

    #[test]
    fn test_meta_text_empty_model() {
        let meta = SampleMeta { sample: "a.wav".into(), duration_ms: 0, rate_hz: 4000 };
        let text = meta_text(&meta, "", 0.0);
        assert!(text.contains("Model:\n\nZoom start: 0.000 s"));
    }

    #[test]
    fn test_parse_and_duration() {
        let meta: SampleMeta =
            serde_json::from_str(r#"{"sample":"a.wav","rate_hz":4000,"duration_ms":0}"#).unwrap();
        assert_eq!(meta.duration_s(), None);
        let meta: SampleMeta =
            serde_json::from_str(r#"{"sample":"a.wav","rate_hz":4000,"duration_ms":1500}"#).unwrap();
        assert_eq!(meta.duration_s(), Some(1.5));
    }
}
