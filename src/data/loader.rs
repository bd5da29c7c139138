//! Async dataset fetching.
//!
//! Uses channel-based communication to bridge async fetches with egui's
//! synchronous update loop. On wasm32 the datasets are fetched over HTTP
//! with the browser fetch API; on native they are read from the `assets/`
//! directory. Either way the result arrives as a `FetchResult` on the
//! next frame.

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// The two static datasets the viewer loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Pharmacies,
    Areas,
}

impl DatasetKind {
    /// Source name, used for layer lookup and log messages.
    pub fn source_name(&self) -> &'static str {
        match self {
            DatasetKind::Pharmacies => "pharmacies",
            DatasetKind::Areas => "areas",
        }
    }

    /// Asset location, relative to the page URL (wasm) or the working
    /// directory (native).
    pub fn asset_path(&self) -> &'static str {
        match self {
            DatasetKind::Pharmacies => "assets/pharmacies.geojson",
            DatasetKind::Areas => "assets/areas.geojson",
        }
    }
}

/// Result of a dataset fetch.
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Raw document body, ready for GeoJSON parsing.
    Success { kind: DatasetKind, body: String },
    /// The fetch failed; the corresponding layer is simply not rendered.
    Error { kind: DatasetKind, message: String },
}

/// Channel-based fetcher for async dataset retrieval.
///
/// Fetches are async but egui's update() is synchronous. This struct
/// provides a channel to pass results from the async fetch task back to
/// the UI thread.
pub struct FetchChannel {
    sender: Sender<FetchResult>,
    receiver: Receiver<FetchResult>,
}

impl Default for FetchChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns an async fetch for the given dataset.
    ///
    /// When the fetch completes (or fails), the result is sent through
    /// the channel and ctx.request_repaint() is called to trigger a UI
    /// update.
    #[cfg(target_arch = "wasm32")]
    pub fn fetch(&self, ctx: egui::Context, kind: DatasetKind) {
        let sender = self.sender.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_asset(kind).await;
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Native fetch: reads the asset file on a background thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn fetch(&self, ctx: egui::Context, kind: DatasetKind) {
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            let result = match std::fs::read_to_string(kind.asset_path()) {
                Ok(body) => FetchResult::Success { kind, body },
                Err(e) => FetchResult::Error {
                    kind,
                    message: format!("Failed to read {}: {}", kind.asset_path(), e),
                },
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed fetch.
    ///
    /// Returns Some(result) if a fetch completed, None if no result is
    /// ready yet.
    pub fn try_recv(&self) -> Option<FetchResult> {
        self.receiver.try_recv().ok()
    }
}

/// Browser fetch of a static asset, resolved to its text body.
#[cfg(target_arch = "wasm32")]
async fn fetch_asset(kind: DatasetKind) -> FetchResult {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let error = |message: String| FetchResult::Error { kind, message };

    let Some(window) = web_sys::window() else {
        return error("No window object available".to_string());
    };

    let response_value = match JsFuture::from(window.fetch_with_str(kind.asset_path())).await {
        Ok(value) => value,
        Err(e) => return error(format!("Fetch failed for {}: {:?}", kind.asset_path(), e)),
    };

    let response: web_sys::Response = match response_value.dyn_into() {
        Ok(response) => response,
        Err(_) => return error("Fetch did not return a Response".to_string()),
    };

    if !response.ok() {
        return error(format!(
            "Failed to load {}: HTTP {}",
            kind.asset_path(),
            response.status()
        ));
    }

    let text_promise = match response.text() {
        Ok(promise) => promise,
        Err(e) => return error(format!("Failed to read response body: {:?}", e)),
    };

    match JsFuture::from(text_promise).await {
        Ok(text) => FetchResult::Success {
            kind,
            body: text.as_string().unwrap_or_default(),
        },
        Err(e) => error(format!("Failed to read response body: {:?}", e)),
    }
}
