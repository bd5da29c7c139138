//! Side panel UI: the pharmacy table and sort control.
//!
//! One row per point feature, four text cells each. Clicking a row
//! flies the map to that pharmacy and opens its popup; the button sorts
//! the rows by rating, descending.

use crate::state::{AppState, Popup, POI_ZOOM, TABLE_HEADERS};
use eframe::egui::{self, CursorIcon, RichText, Sense};

const COLUMN_WIDTHS: [f32; 4] = [32.0, 120.0, 150.0, 48.0];

pub fn render_table_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("table_panel")
        .resizable(true)
        .default_width(390.0)
        .min_width(320.0)
        .max_width(520.0)
        .show(ctx, |ui| {
            ui.heading("Pharmacies");
            ui.separator();

            if ui.button("Sort by rating").clicked() {
                state.table_state.sort_by_rating();
                state.status_message =
                    format!("Sorted {} rows by rating", state.table_state.rows.len());
            }

            ui.add_space(6.0);

            // Header row, excluded from sorting
            ui.horizontal(|ui| {
                for (label, width) in TABLE_HEADERS.iter().zip(COLUMN_WIDTHS) {
                    cell(ui, width, RichText::new(*label).strong());
                }
            });
            ui.separator();

            if state.table_state.rows.is_empty() {
                ui.label(RichText::new("No pharmacies loaded").weak());
                return;
            }

            let mut clicked_row = None;

            egui::ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for (idx, row) in state.table_state.rows.iter().enumerate() {
                        let response = ui
                            .push_id(idx, |ui| {
                                ui.horizontal(|ui| {
                                    cell(ui, COLUMN_WIDTHS[0], RichText::new(&row.id));
                                    cell(ui, COLUMN_WIDTHS[1], RichText::new(&row.name));
                                    cell(ui, COLUMN_WIDTHS[2], RichText::new(&row.address));
                                    cell(ui, COLUMN_WIDTHS[3], RichText::new(&row.rating));
                                })
                            })
                            .response
                            .interact(Sense::click());

                        if response.hovered() {
                            ctx.set_cursor_icon(CursorIcon::PointingHand);
                        }
                        if response.clicked() {
                            clicked_row = Some(idx);
                        }
                    }
                });

            if let Some(idx) = clicked_row {
                let row = &state.table_state.rows[idx];
                state.view_state.fly_to(row.coord, POI_ZOOM);
                state.popup = Some(Popup::for_row(row));
                state.status_message = if row.name.is_empty() {
                    "Flying to pharmacy".to_string()
                } else {
                    format!("Flying to {}", row.name)
                };
            }
        });
}

fn cell(ui: &mut egui::Ui, width: f32, text: RichText) {
    ui.add_sized(
        [width, ui.spacing().interact_size.y],
        egui::Label::new(text.size(12.0)).truncate(),
    );
}
