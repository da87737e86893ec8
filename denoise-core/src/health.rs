/// Interval between `/health` probes.
pub const HEALTH_POLL_INTERVAL_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl Connectivity {
    /// A probe counts as connected only when it got a 2xx reply.
    pub fn from_probe(reply_ok: bool) -> Self {
        if reply_ok { Connectivity::Connected } else { Connectivity::Disconnected }
    }

    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Unknown => "Checking\u{2026}",
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Disconnected",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Connectivity::Unknown => "badge",
            Connectivity::Connected => "badge badge-ok",
            Connectivity::Disconnected => "badge badge-bad",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_mapping() {
        assert_eq!(Connectivity::from_probe(true), Connectivity::Connected);
        assert_eq!(Connectivity::from_probe(false), Connectivity::Disconnected);
    }

    #[test]
    fn test_badge_classes_are_exclusive() {
        let ok = Connectivity::Connected.badge_class();
        let bad = Connectivity::Disconnected.badge_class();
        assert!(ok.contains("badge-ok") && !ok.contains("badge-bad"));
        assert!(bad.contains("badge-bad") && !bad.contains("badge-ok"));
        assert_eq!(Connectivity::default().label(), "Checking\u{2026}");
    }
}
