//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map center and zoom in the URL query string so reloading
//! restores the view and URLs can be shared.

/// Parsed URL parameters.
pub struct UrlParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f32>,
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let mut params = UrlParams {
        lat: None,
        lon: None,
        zoom: None,
    };

    let Ok(search) = web_sys::window()
        .expect("no window")
        .location()
        .search()
    else {
        return params;
    };

    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        match key {
            "lat" => params.lat = value.parse().ok(),
            "lon" => params.lon = value.parse().ok(),
            "z" => params.zoom = value.parse().ok(),
            _ => {}
        }
    }

    params
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams {
        lat: None,
        lon: None,
        zoom: None,
    }
}

/// Push current view to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(lat: f64, lon: f64, zoom: f32) {
    let query = format!("?lat={:.5}&lon={:.5}&z={:.2}", lat, lon, zoom);

    let window = web_sys::window().expect("no window");
    let history = window.history().expect("no history");
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&query));
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_lat: f64, _lon: f64, _zoom: f32) {}
