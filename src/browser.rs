//! Thin wrappers over the browser globals the page touches.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use denoise_core::notice::FlagStore;
use denoise_core::page::{ConfigError, PageConfig};

pub fn js_err(v: &JsValue) -> String {
    v.as_string().unwrap_or_else(|| format!("{:?}", v))
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Resolve after `ms` milliseconds via setTimeout.
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let Some(win) = web_sys::window() else {
            let _ = resolve.call0(&JsValue::NULL);
            return;
        };
        let cb = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            ms as i32,
        );
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Read the `window.DEMO` object the server renders into the page.
pub fn read_page_config() -> Result<PageConfig, String> {
    let window = web_sys::window().ok_or_else(|| "No window object".to_string())?;
    let demo = js_sys::Reflect::get(&window, &JsValue::from_str("DEMO"))
        .map_err(|e| js_err(&e))?;
    if demo.is_undefined() || demo.is_null() {
        return Err(ConfigError::Missing.to_string());
    }
    let json: String = js_sys::JSON::stringify(&demo)
        .map_err(|e| js_err(&e))?
        .into();
    PageConfig::from_json(&json).map_err(|e| e.to_string())
}

/// `localStorage`-backed flags. `open` returns `None` when storage is
/// disabled (private browsing, sandboxed iframes).
pub struct LocalFlags(web_sys::Storage);

impl LocalFlags {
    pub fn open() -> Option<Self> {
        web_sys::window()?.local_storage().ok().flatten().map(LocalFlags)
    }
}

impl FlagStore for LocalFlags {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.0.get_item(key).map_err(|e| js_err(&e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.0.set_item(key, value).map_err(|e| js_err(&e))
    }
}
