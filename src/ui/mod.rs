//! UI modules for the PharmaMap application.
//!
//! The UI is split into distinct panels:
//! - Top bar: title and status
//! - Table panel: the pharmacy table and sort control
//! - Central canvas: the map view

mod canvas;
mod table_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use table_panel::render_table_panel;
pub use top_bar::render_top_bar;
