#![warn(clippy::all)]

//! PharmaMap - a web-based pharmacy map viewer.
//!
//! Overlays pharmacy locations and named neighborhood areas on a map
//! canvas, keeps a sortable table in sync with the point data, and links
//! table rows to map navigation.

mod data;
mod geo;
mod state;
mod ui;

use data::{AreaCollection, DatasetKind, FetchChannel, FetchResult, PharmacyCollection};
use eframe::egui;
use geo::MapLayerSet;
use state::AppState;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "PharmaMap",
        native_options,
        Box::new(|cc| Ok(Box::new(PharmaMapApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(PharmaMapApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct PharmaMapApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Map layer set (named sources + styles)
    layers: MapLayerSet,

    /// Channel for async dataset fetches
    fetch_channel: FetchChannel,

    /// The points fetch fires once, at startup
    pharmacies_requested: bool,

    /// The polygons fetch fires once, after the first canvas frame
    areas_requested: bool,

    /// Whether to fit the view to the point bounds once they arrive
    /// (skipped when the URL restored a shared view)
    fit_on_load: bool,

    /// Monotonic instant of last URL push (for throttling to ~1/sec)
    last_url_push: web_time::Instant,
}

impl PharmaMapApp {
    /// Creates a new PharmaMapApp instance.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut state = AppState::new();

        // Apply URL parameters (lat/lon/zoom)
        let url_params = state::url_state::parse_from_url();
        if let Some(lat) = url_params.lat {
            state.view_state.center.y = lat;
        }
        if let Some(lon) = url_params.lon {
            state.view_state.center.x = lon;
        }
        if let Some(zoom) = url_params.zoom {
            state.view_state.zoom = zoom.clamp(state::MIN_ZOOM, state::MAX_ZOOM);
        }
        let view_restored = url_params.lat.is_some() || url_params.lon.is_some();

        Self {
            state,
            layers: MapLayerSet::new(),
            fetch_channel: FetchChannel::new(),
            pharmacies_requested: false,
            areas_requested: false,
            fit_on_load: !view_restored,
            last_url_push: web_time::Instant::now(),
        }
    }

    /// Apply a completed dataset fetch to the table and layer set.
    fn handle_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Success {
                kind: DatasetKind::Pharmacies,
                body,
            } => match PharmacyCollection::from_geojson(&body) {
                Ok(collection) => {
                    let count = collection.features.len();
                    log::info!("Pharmacies loaded: {} feature(s)", count);

                    self.state.table_state.populate(&collection);

                    if self.fit_on_load {
                        self.fit_on_load = false;
                        if let Some(bounds) = collection.bounds() {
                            self.state.view_state.fit_bounds(&bounds);
                        }
                    }

                    self.layers.set_pharmacies(collection);
                    self.state.status_message = format!("Loaded {} pharmacies", count);
                }
                Err(e) => {
                    log::error!("Failed to parse pharmacies dataset: {}", e);
                    self.state.status_message = "Failed to parse pharmacies".to_string();
                }
            },
            FetchResult::Success {
                kind: DatasetKind::Areas,
                body,
            } => match AreaCollection::from_geojson(&body) {
                Ok(collection) => {
                    log::info!("Areas loaded: {} feature(s)", collection.features.len());
                    self.layers.set_areas(collection);
                }
                Err(e) => {
                    log::error!("Failed to parse areas dataset: {}", e);
                }
            },
            FetchResult::Error { kind, message } => {
                log::error!("{} load error: {}", kind.source_name(), message);
                self.state.status_message = format!("Failed to load {}", kind.source_name());
            }
        }
    }
}

impl eframe::App for PharmaMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Point data is requested first, at startup
        if !self.pharmacies_requested {
            self.pharmacies_requested = true;
            log::info!("Requesting pharmacies dataset");
            self.fetch_channel.fetch(ctx.clone(), DatasetKind::Pharmacies);
        }

        // Polygon data waits until the canvas has produced a frame
        if self.state.map_ready && !self.areas_requested {
            self.areas_requested = true;
            log::info!("Requesting areas dataset");
            self.fetch_channel.fetch(ctx.clone(), DatasetKind::Areas);
        }

        // Check for completed fetches
        while let Some(result) = self.fetch_channel.try_recv() {
            self.handle_fetch_result(result);
        }

        // Push current view to the URL (throttled to once per second)
        {
            let now = web_time::Instant::now();
            if now.duration_since(self.last_url_push).as_secs_f64() >= 1.0 {
                self.last_url_push = now;
                state::url_state::push_to_url(
                    self.state.view_state.center.y,
                    self.state.view_state.center.x,
                    self.state.view_state.zoom,
                );
            }
        }

        // Render UI panels in the correct order for egui layout
        // Side and top/bottom panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &mut self.state);
        ui::render_table_panel(ctx, &mut self.state);
        ui::render_canvas(ctx, &mut self.state, &self.layers);
    }
}
