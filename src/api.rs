//! fetch() calls against the demo backend.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCache, RequestInit, Response};
use denoise_core::api::{DenoiseRequest, SampleEndpoints, HEALTH_PATH};
use denoise_core::meta::SampleMeta;
use crate::browser::js_err;

async fn send(method: &str, url: &str, json_body: Option<&str>, no_store: bool) -> Result<Response, String> {
    let window = web_sys::window().ok_or_else(|| "No window object".to_string())?;

    let init = RequestInit::new();
    init.set_method(method);
    if no_store {
        init.set_cache(RequestCache::NoStore);
    }
    if let Some(body) = json_body {
        let headers = Headers::new().map_err(|e| js_err(&e))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| js_err(&e))?;
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &init).map_err(|e| js_err(&e))?;
    let resp = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{method} {url}: {}", js_err(&e)))?;
    resp.dyn_into::<Response>()
        .map_err(|_| format!("{method} {url}: fetch did not return a Response"))
}

fn check_status(method: &str, url: &str, resp: &Response) -> Result<(), String> {
    if resp.ok() {
        Ok(())
    } else {
        Err(format!("{method} {url} returned HTTP {}", resp.status()))
    }
}

async fn body_text(resp: &Response) -> Result<String, String> {
    let promise = resp.text().map_err(|e| js_err(&e))?;
    let value = JsFuture::from(promise).await.map_err(|e| js_err(&e))?;
    value.as_string().ok_or_else(|| "response body is not text".to_string())
}

/// Probe `/health`. Any 2xx reply counts as healthy.
pub async fn health() -> Result<(), String> {
    let resp = send("GET", HEALTH_PATH, None, true).await?;
    check_status("GET", HEALTH_PATH, &resp)
}

pub async fn fetch_meta(endpoints: &SampleEndpoints) -> Result<SampleMeta, String> {
    let url = endpoints.meta();
    let resp = send("GET", &url, None, true).await?;
    check_status("GET", &url, &resp)?;
    let text = body_text(&resp).await?;
    serde_json::from_str(&text).map_err(|e| format!("bad meta reply: {e}"))
}

pub async fn request_denoise(endpoints: &SampleEndpoints, req: &DenoiseRequest) -> Result<(), String> {
    let url = endpoints.denoise();
    let body = serde_json::to_string(req).map_err(|e| e.to_string())?;
    let resp = send("POST", &url, Some(&body), false).await?;
    check_status("POST", &url, &resp)
}

/// POST without a body (reset_zoom, erase_edits).
pub async fn post_empty(url: &str) -> Result<(), String> {
    let resp = send("POST", url, None, false).await?;
    check_status("POST", url, &resp)
}
