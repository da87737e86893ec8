//! One-shot notices remembered in browser-local storage.

pub const TAP_TO_ZOOM_KEY: &str = "tap_to_zoom_toast";
pub const TAP_TO_ZOOM_TIP: &str = "Tip: tap the long spectrogram to select a 1s window.";
pub const TOAST_DURATION_MS: u32 = 2600;

/// Minimal key/value flag storage. Implemented over `localStorage` in the
/// page; errors are plain strings because storage can be disabled by the
/// browser at any time.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Decide whether a once-only notice should be shown, marking it as seen.
/// Storage failures never suppress the notice.
pub fn should_show_once(store: Option<&dyn FlagStore>, key: &str) -> bool {
    let Some(store) = store else { return true };
    match store.get(key) {
        Ok(Some(_)) => false,
        Ok(None) => {
            if let Err(e) = store.set(key, "1") {
                log::warn!("Could not remember notice {key}: {e}");
            }
            true
        }
        Err(e) => {
            log::warn!("Could not read notice flag {key}: {e}");
            true
        }
    }
}
