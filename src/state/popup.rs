//! Popup state for map feature details.
//!
//! At most one popup is open at a time. The canvas renders it anchored
//! at the projected geographic position.

use crate::data::{Area, Pharmacy};
use crate::state::TableRow;
use geo_types::Coord;

/// An open popup: a geographic anchor plus its text content.
#[derive(Debug, Clone)]
pub struct Popup {
    /// Anchor as (lon, lat)
    pub anchor: Coord<f64>,
    pub title: String,
    pub lines: Vec<String>,
}

impl Popup {
    /// Popup for a pharmacy: name, address, rating.
    pub fn for_pharmacy(pharmacy: &Pharmacy) -> Self {
        point_popup(
            &pharmacy.name,
            &pharmacy.address,
            &pharmacy.rating,
            pharmacy.coord,
        )
    }

    /// Popup for a table row; rows carry the same fields and anchor.
    pub fn for_row(row: &TableRow) -> Self {
        point_popup(&row.name, &row.address, &row.rating, row.coord)
    }

    /// Popup for an area, anchored where the user clicked.
    pub fn for_area(area: &Area, anchor: Coord<f64>) -> Self {
        Self {
            anchor,
            title: area.display_label().to_string(),
            lines: Vec::new(),
        }
    }
}

fn point_popup(name: &str, address: &str, rating: &str, coord: Coord<f64>) -> Popup {
    let title = if name.is_empty() {
        "Pharmacy".to_string()
    } else {
        name.to_string()
    };

    let mut lines = Vec::new();
    if !address.is_empty() {
        lines.push(address.to_string());
    }
    let rating = if rating.is_empty() { "n/a" } else { rating };
    lines.push(format!("Rating: {}", rating));

    Popup {
        anchor: coord,
        title,
        lines,
    }
}
