//! Map layer rendering and pointer hit-testing.
//!
//! Renders the area and pharmacy layers to the egui canvas (areas first
//! so pharmacy circles draw on top) and resolves pointer positions back
//! to the feature under the cursor.

use super::{LabelStyle, LineStyle, MapLayerSet, MapProjection};
use crate::data::{Area, AreaPolygon};
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Stroke};
use geo_types::Coord;

/// Renders all visible map layers to the canvas.
pub fn render_map_layers(
    painter: &Painter,
    layers: &MapLayerSet,
    projection: &MapProjection,
    labels: bool,
) {
    if let Some(areas) = layers.areas.as_ref().filter(|l| l.visible) {
        for area in &areas.source.features {
            for polygon in &area.polygons {
                render_area_polygon(painter, polygon, projection, areas.fill.color, areas.outline);
            }
            if labels {
                render_area_label(painter, area, projection, areas.labels);
            }
        }
    }

    if let Some(points) = layers.pharmacies.as_ref().filter(|l| l.visible) {
        for pharmacy in &points.source.features {
            if !projection.is_visible(pharmacy.coord, 0.01) {
                continue;
            }
            let pos = projection.geo_to_screen(pharmacy.coord);
            painter.circle_filled(pos, points.style.radius, points.style.color);
            painter.circle_stroke(
                pos,
                points.style.radius,
                Stroke::new(points.style.stroke_width, points.style.stroke_color),
            );
        }
    }
}

fn render_area_polygon(
    painter: &Painter,
    polygon: &AreaPolygon,
    projection: &MapProjection,
    fill: Color32,
    outline: LineStyle,
) {
    let (min_lon, min_lat, max_lon, max_lat) = ring_bbox(&polygon.exterior);
    if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
        return;
    }

    let screen_points: Vec<Pos2> = polygon
        .exterior
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();

    if screen_points.len() < 3 {
        return;
    }

    painter.add(egui::Shape::convex_polygon(
        screen_points.clone(),
        fill,
        Stroke::NONE,
    ));

    let stroke = Stroke::new(outline.width, outline.color);
    render_closed_ring(painter, &screen_points, stroke);

    // Holes get an outline only; the fill above does not cut them out
    for hole in &polygon.holes {
        let hole_points: Vec<Pos2> = hole.iter().map(|c| projection.geo_to_screen(*c)).collect();
        if hole_points.len() >= 3 {
            render_closed_ring(painter, &hole_points, stroke);
        }
    }
}

fn render_closed_ring(painter: &Painter, points: &[Pos2], stroke: Stroke) {
    for window in points.windows(2) {
        if let [p1, p2] = window {
            painter.line_segment([*p1, *p2], stroke);
        }
    }
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            painter.line_segment([*last, *first], stroke);
        }
    }
}

fn render_area_label(
    painter: &Painter,
    area: &Area,
    projection: &MapProjection,
    style: LabelStyle,
) {
    let Some(label) = area.label.as_deref() else {
        return;
    };

    // Label the largest polygon of a MultiPolygon
    let Some(polygon) = area
        .polygons
        .iter()
        .max_by(|a, b| ring_area(&a.exterior).total_cmp(&ring_area(&b.exterior)))
    else {
        return;
    };

    let Some(centroid) = ring_centroid(&polygon.exterior) else {
        return;
    };

    if !projection.is_visible(centroid, 0.01) {
        return;
    }

    painter.text(
        projection.geo_to_screen(centroid),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(style.size),
        style.color,
    );
}

/// The feature under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Index into the pharmacies source.
    Pharmacy(usize),
    /// Index into the areas source.
    Area(usize),
}

/// Resolves a screen position to the topmost feature under it.
///
/// Pharmacy circles draw above area fills, so they are tested first.
pub fn hit_test(layers: &MapLayerSet, projection: &MapProjection, pos: Pos2) -> Option<HitTarget> {
    if let Some(points) = layers.pharmacies.as_ref().filter(|l| l.visible) {
        let hit_radius = points.style.radius + points.style.stroke_width;
        for (idx, pharmacy) in points.source.features.iter().enumerate() {
            let screen = projection.geo_to_screen(pharmacy.coord);
            if (screen - pos).length_sq() <= hit_radius * hit_radius {
                return Some(HitTarget::Pharmacy(idx));
            }
        }
    }

    if let Some(areas) = layers.areas.as_ref().filter(|l| l.visible) {
        let geo = projection.screen_to_geo(pos);
        for (idx, area) in areas.source.features.iter().enumerate() {
            if area.polygons.iter().any(|p| polygon_contains(p, geo)) {
                return Some(HitTarget::Area(idx));
            }
        }
    }

    None
}

/// Point-in-polygon test: inside the exterior ring and outside all holes.
pub fn polygon_contains(polygon: &AreaPolygon, point: Coord<f64>) -> bool {
    if !ring_contains(&polygon.exterior, point) {
        return false;
    }
    !polygon.holes.iter().any(|hole| ring_contains(hole, point))
}

/// Even-odd ray casting against a ring. The ring may be open or closed;
/// the closing edge is implied.
fn ring_contains(ring: &[Coord<f64>], point: Coord<f64>) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn ring_bbox(ring: &[Coord<f64>]) -> (f64, f64, f64, f64) {
    ring.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), c| {
            (
                min_x.min(c.x),
                min_y.min(c.y),
                max_x.max(c.x),
                max_y.max(c.y),
            )
        },
    )
}

/// Unsigned area via the shoelace formula.
fn ring_area(ring: &[Coord<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        sum += (ring[j].x + ring[i].x) * (ring[j].y - ring[i].y);
        j = i;
    }
    (sum / 2.0).abs()
}

/// Vertex-average centroid, good enough for label placement.
fn ring_centroid(ring: &[Coord<f64>]) -> Option<Coord<f64>> {
    // A closed ring repeats its first vertex; drop the duplicate
    let open = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if first == last && ring.len() > 1 => &ring[..ring.len() - 1],
        _ => ring,
    };
    if open.is_empty() {
        return None;
    }

    let (sx, sy) = open
        .iter()
        .fold((0.0f64, 0.0f64), |(sx, sy), c| (sx + c.x, sy + c.y));
    Some(Coord {
        x: sx / open.len() as f64,
        y: sy / open.len() as f64,
    })
}
