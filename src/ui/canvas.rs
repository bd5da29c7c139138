//! Central canvas UI: the map view.
//!
//! Draws the basemap background and graticule, the area and pharmacy
//! layers, and the open popup; handles pan/zoom and pointer interaction
//! including click hit-testing into popups.

use crate::geo::{self, HitTarget, MapLayerSet, MapProjection};
use crate::state::{AppState, LayerVisibility, Popup, MAX_ZOOM, MIN_ZOOM};
use eframe::egui::{self, Color32, CursorIcon, Painter, Rect, RichText, Sense, Stroke, Vec2};

/// Stand-in for the satellite basemap: a muted ground tone.
const BACKGROUND: Color32 = Color32::from_rgb(24, 30, 28);

/// Render the map canvas with all layers.
pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, layers: &MapLayerSet) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();

        // Allocate the full available space for the canvas
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        // Advance the fly-to animation before building this frame's projection
        if state.view_state.tick() {
            ctx.request_repaint();
        }

        painter.rect_filled(rect, 0.0, BACKGROUND);

        let projection = MapProjection::new(
            state.view_state.center,
            state.view_state.zoom,
            state.view_state.pan_offset,
            rect,
        );

        draw_graticule(&painter, &projection);

        let filtered = filter_layers(layers, &state.layer_state);
        geo::render_map_layers(&painter, &filtered, &projection, state.layer_state.labels);

        handle_canvas_interaction(ctx, &response, &rect, state, &filtered, &projection);

        render_popup(ui, state, &projection, &rect);

        // The surface has produced a frame; the deferred areas fetch may start
        state.map_ready = true;
    });
}

/// Apply visibility toggles to a copy of the layer set.
fn filter_layers(layers: &MapLayerSet, visibility: &LayerVisibility) -> MapLayerSet {
    let mut filtered = layers.clone();

    if let Some(ref mut layer) = filtered.pharmacies {
        layer.visible = visibility.pharmacies;
    }
    if let Some(ref mut layer) = filtered.areas {
        layer.visible = visibility.areas;
    }

    filtered
}

fn handle_canvas_interaction(
    ctx: &egui::Context,
    response: &egui::Response,
    rect: &Rect,
    state: &mut AppState,
    layers: &MapLayerSet,
    projection: &MapProjection,
) {
    // Handle dragging for panning; grabbing the map cancels a fly-to
    if response.dragged() {
        state.view_state.interrupt_fly();
        state.view_state.pan_offset += response.drag_delta();
        ctx.set_cursor_icon(CursorIcon::Grabbing);
    }

    // Handle scroll for zooming relative to cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            state.view_state.interrupt_fly();
            let zoom_factor = 1.0 + scroll_delta.y * 0.001;
            let old_zoom = state.view_state.zoom;
            let new_zoom = (old_zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

            // Adjust pan offset to keep the point under cursor stationary
            if let Some(cursor_pos) = response.hover_pos() {
                let cursor_rel = cursor_pos - rect.center();
                let ratio = new_zoom / old_zoom;
                state.view_state.pan_offset =
                    cursor_rel * (1.0 - ratio) + state.view_state.pan_offset * ratio;
            }

            state.view_state.zoom = new_zoom;
        }
    }

    // Pointer cursor over interactive features
    if !response.dragged() {
        if let Some(hover_pos) = response.hover_pos() {
            if geo::hit_test(layers, projection, hover_pos).is_some() {
                ctx.set_cursor_icon(CursorIcon::PointingHand);
            }
        }
    }

    // Click: open a popup for the feature under the pointer, or close
    // the open one when the click lands on bare map
    if response.clicked() {
        if let Some(click_pos) = response.interact_pointer_pos() {
            state.popup = match geo::hit_test(layers, projection, click_pos) {
                Some(HitTarget::Pharmacy(idx)) => layers
                    .pharmacies
                    .as_ref()
                    .and_then(|l| l.source.features.get(idx))
                    .map(Popup::for_pharmacy),
                Some(HitTarget::Area(idx)) => layers
                    .areas
                    .as_ref()
                    .and_then(|l| l.source.features.get(idx))
                    .map(|area| Popup::for_area(area, projection.screen_to_geo(click_pos))),
                None => None,
            };
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.view_state.interrupt_fly();
        state.view_state.zoom = 1.0;
        state.view_state.pan_offset = Vec2::ZERO;
    }
}

/// Faint lon/lat grid so the bare background still reads as a map.
fn draw_graticule(painter: &Painter, projection: &MapProjection) {
    let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
    let span = (max_lon - min_lon).max(max_lat - min_lat);
    if span <= 0.0 {
        return;
    }

    let step = graticule_step(span);
    let stroke = Stroke::new(0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 14));

    let mut lon = (min_lon / step).floor() * step;
    let mut guard = 0;
    while lon <= max_lon && guard < 64 {
        let top = projection.geo_to_screen(geo_types::Coord { x: lon, y: max_lat });
        let bottom = projection.geo_to_screen(geo_types::Coord { x: lon, y: min_lat });
        painter.line_segment([top, bottom], stroke);
        lon += step;
        guard += 1;
    }

    let mut lat = (min_lat / step).floor() * step;
    let mut guard = 0;
    while lat <= max_lat && guard < 64 {
        let left = projection.geo_to_screen(geo_types::Coord { x: min_lon, y: lat });
        let right = projection.geo_to_screen(geo_types::Coord { x: max_lon, y: lat });
        painter.line_segment([left, right], stroke);
        lat += step;
        guard += 1;
    }
}

/// Power-of-ten step giving a handful of grid lines across the view.
fn graticule_step(span: f64) -> f64 {
    10f64.powf((span / 4.0).log10().floor())
}

/// Render the open popup anchored at its projected position.
fn render_popup(ui: &mut egui::Ui, state: &mut AppState, projection: &MapProjection, rect: &Rect) {
    let Some(popup) = state.popup.as_ref() else {
        return;
    };

    let anchor = projection.geo_to_screen(popup.anchor);
    if !rect.contains(anchor) {
        // Anchor scrolled off-screen; keep the popup but skip drawing
        return;
    }

    let mut close = false;

    egui::Area::new(egui::Id::new("map_popup"))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor + Vec2::new(12.0, -12.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(220.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&popup.title).strong());
                    if ui.small_button("\u{2715}").clicked() {
                        close = true;
                    }
                });
                for line in &popup.lines {
                    ui.label(RichText::new(line).size(12.0));
                }
            });
        });

    // Leader line from the anchor to the popup box
    ui.painter().line_segment(
        [anchor, anchor + Vec2::new(10.0, -10.0)],
        Stroke::new(1.0, Color32::from_gray(180)),
    );

    if close {
        state.popup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_step_is_sane() {
        // ~0.1 degree view span: lines every 0.01 degrees
        assert!((graticule_step(0.1) - 0.01).abs() < 1e-12);
        // Wider views use coarser steps
        assert!(graticule_step(10.0) > graticule_step(0.1));
        // Step never exceeds the span itself
        for span in [0.01, 0.5, 2.0, 45.0] {
            assert!(graticule_step(span) < span);
        }
    }
}
