//! Layer visibility state.

/// Toggles for the map overlay layers.
#[derive(Clone)]
pub struct LayerVisibility {
    /// Show pharmacy circles
    pub pharmacies: bool,
    /// Show area fills and outlines
    pub areas: bool,
    /// Show area name labels
    pub labels: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            pharmacies: true,
            areas: true,
            labels: true,
        }
    }
}
