//! Braille world map widget
//!
//! Holds two kinds of drawable state: named GeoJSON sources that are
//! replaced wholesale, and transient path/marker elements addressed by id
//! that the animated mode adds and removes itself.

pub mod canvas;
pub mod land;
pub mod projection;

use crate::geo::GeoPoint;
use crate::render::features::{FeatureCollection, Geometry};
use crate::terminal::Terminal;
use canvas::{BrailleCanvas, Ink};
use crossterm::style::Color;
use projection::Viewport;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Fixed map initialization parameters
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: f64,
    pub style_url: String,
    pub attribution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(20.0, 0.0),
            zoom: 1.0,
            style_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            access_token: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Path { points: Vec<GeoPoint>, rgb: (u8, u8, u8) },
    Marker { point: GeoPoint, rgb: (u8, u8, u8) },
}

pub struct MapWidget {
    view: MapView,
    center: GeoPoint,
    zoom: f64,
    sources: HashMap<String, FeatureCollection>,
    elements: BTreeMap<ElementId, Element>,
    next_id: u64,
}

impl MapWidget {
    pub fn new(view: MapView) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            view,
            sources: HashMap::new(),
            elements: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    // ------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------

    /// Replace the named source, creating it on first use
    pub fn set_source(&mut self, name: &str, data: FeatureCollection) {
        self.sources.insert(name.to_string(), data);
    }

    pub fn source(&self, name: &str) -> Option<&FeatureCollection> {
        self.sources.get(name)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    // ------------------------------------------------------------------
    // Transient elements
    // ------------------------------------------------------------------

    fn insert(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    pub fn add_path(&mut self, points: Vec<GeoPoint>, rgb: (u8, u8, u8)) -> ElementId {
        self.insert(Element::Path { points, rgb })
    }

    pub fn add_marker(&mut self, point: GeoPoint, rgb: (u8, u8, u8)) -> ElementId {
        self.insert(Element::Marker { point, rgb })
    }

    /// Returns false if `id` is not a live path
    pub fn update_path(&mut self, id: ElementId, new_points: Vec<GeoPoint>) -> bool {
        match self.elements.get_mut(&id) {
            Some(Element::Path { points, .. }) => {
                *points = new_points;
                true
            }
            _ => false,
        }
    }

    /// Returns false if `id` is not a live marker
    pub fn move_marker(&mut self, id: ElementId, to: GeoPoint) -> bool {
        match self.elements.get_mut(&id) {
            Some(Element::Marker { point, .. }) => {
                *point = to;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    pub fn pan(&mut self, dlat: f64, dlon: f64) {
        let step = 1.0 / self.zoom.max(0.1);
        self.center.lat = (self.center.lat + dlat * step).clamp(-80.0, 80.0);
        self.center.lon = crate::geo::normalize_longitude(self.center.lon + dlon * step);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(0.5, 8.0);
    }

    pub fn reset_camera(&mut self) {
        self.center = self.view.center;
        self.zoom = self.view.zoom;
    }

    pub fn viewport(&self, canvas: &BrailleCanvas) -> Viewport {
        Viewport::new(self.center, self.zoom, canvas.width(), canvas.height())
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Paint land, every source and every element onto `canvas`
    pub fn paint(&self, canvas: &mut BrailleCanvas) {
        let vp = self.viewport(canvas);

        paint_graticule(canvas, &vp);
        for ring in land::rings() {
            let ring: Vec<GeoPoint> = ring.collect();
            paint_polyline(canvas, &vp, &ring, 1, Ink::Land, None);
        }

        let mut names: Vec<&String> = self.sources.keys().collect();
        names.sort();
        for name in names {
            let data = &self.sources[name];
            if !data.is_empty() {
                paint_source(canvas, &vp, data);
            }
        }

        for element in self.elements.values() {
            match element {
                Element::Path { points, rgb } => {
                    paint_polyline(canvas, &vp, points, 1, Ink::Flow, Some(rgb_color(*rgb)));
                }
                Element::Marker { point, rgb } => {
                    canvas.disc(vp.project(*point), 2, Ink::Marker, Some(rgb_color(*rgb)));
                }
            }
        }
    }

    /// Paint and copy to the terminal, with the attribution in the corner
    pub fn draw(&self, canvas: &mut BrailleCanvas, term: &mut Terminal, scheme: u8) {
        canvas.clear();
        self.paint(canvas);
        canvas.blit(term, scheme);

        let (w, h) = term.size();
        let text = &self.view.attribution;
        let x = w as i32 - text.chars().count() as i32 - 1;
        term.set_str(x.max(0), h as i32 - 1, text, Some(Color::DarkGrey), false);
    }
}

fn rgb_color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

fn paint_graticule(canvas: &mut BrailleCanvas, vp: &Viewport) {
    for lat in (-60..=60).step_by(30) {
        for lon in -180..180 {
            if (lon % 3) != 0 {
                continue;
            }
            let (x, y) = vp.project(GeoPoint::new(lat as f64, lon as f64));
            if vp.is_visible(x, y) {
                canvas.set(x, y, Ink::Grid, None);
            }
        }
    }
    for lon in (-180..180).step_by(30) {
        for lat in -90..=90 {
            if (lat % 3) != 0 {
                continue;
            }
            let (x, y) = vp.project(GeoPoint::new(lat as f64, lon as f64));
            if vp.is_visible(x, y) {
                canvas.set(x, y, Ink::Grid, None);
            }
        }
    }
}

fn paint_polyline(canvas: &mut BrailleCanvas, vp: &Viewport, points: &[GeoPoint], thickness: i32, ink: Ink, color: Option<Color>) {
    for pair in points.windows(2) {
        let a = vp.project(pair[0]);
        let b = vp.project(pair[1]);
        if !vp.wraps(a, b) {
            canvas.line(a, b, thickness, ink, color);
        }
    }
}

fn paint_source(canvas: &mut BrailleCanvas, vp: &Viewport, data: &FeatureCollection) {
    for feature in &data.features {
        match &feature.geometry {
            Geometry::LineString(coords) => {
                let points: Vec<GeoPoint> = coords.iter().map(|&[lon, lat]| GeoPoint::new(lat, lon)).collect();
                let width = feature.properties.width.unwrap_or(1.0).round().max(1.0) as i32;
                paint_great_line(canvas, vp, &points, width);
            }
            Geometry::Point([lon, lat]) => {
                // radius is in screen pixels; a braille dot is about two of them
                let radius = feature.properties.radius.unwrap_or(2.0) / 2.0;
                canvas.disc(vp.project(GeoPoint::new(*lat, *lon)), radius.round() as i32, Ink::Marker, None);
            }
        }
    }
}

/// Lines are densified first so a long flow wraps cleanly at the map edge
fn paint_great_line(canvas: &mut BrailleCanvas, vp: &Viewport, points: &[GeoPoint], width: i32) {
    const STEPS: usize = 32;
    let mut dense = Vec::with_capacity(points.len() * STEPS);
    for pair in points.windows(2) {
        for i in 0..=STEPS {
            dense.push(pair[0].lerp(pair[1], i as f64 / STEPS as f64));
        }
    }
    paint_polyline(canvas, vp, &dense, width, Ink::Flow, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{resolve_flows, CoordinateTable};
    use crate::flow::FlowRecord;
    use crate::render::build_feature_collection;

    fn widget() -> MapWidget {
        MapWidget::new(MapView::default())
    }

    #[test]
    fn set_source_replaces_wholesale() {
        let table = CoordinateTable::builtin();
        let fc = build_feature_collection(&resolve_flows(vec![FlowRecord::new("US", "DE", 5.0)], &table).drawable);

        let mut map = widget();
        map.set_source("flows", fc.clone());
        map.set_source("flows", fc.clone());

        assert_eq!(map.source_count(), 1);
        assert_eq!(map.source("flows"), Some(&fc));
        assert_eq!(map.source("flows").unwrap().features.len(), 2);
    }

    #[test]
    fn elements_come_and_go() {
        let mut map = widget();
        let path = map.add_path(vec![GeoPoint::new(0.0, 0.0)], (255, 0, 0));
        let marker = map.add_marker(GeoPoint::new(0.0, 0.0), (255, 0, 0));
        assert_ne!(path, marker);
        assert_eq!(map.element_count(), 2);

        assert!(map.move_marker(marker, GeoPoint::new(1.0, 1.0)));
        assert!(!map.move_marker(path, GeoPoint::new(1.0, 1.0)));
        assert!(map.update_path(path, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(2.0, 2.0)]));

        assert!(map.remove(path).is_some());
        assert!(map.remove(path).is_none());
        assert!(map.remove(marker).is_some());
        assert_eq!(map.element_count(), 0);
    }

    #[test]
    fn camera_reset_restores_view() {
        let mut map = widget();
        map.pan(10.0, 10.0);
        map.zoom_by(2.0);
        map.reset_camera();
        let canvas = BrailleCanvas::new(80, 24);
        let vp = map.viewport(&canvas);
        assert_eq!(vp.center, MapView::default().center);
        assert_eq!(vp.zoom, 1.0);
    }

    #[test]
    fn paint_draws_flow_and_marker() {
        let table = CoordinateTable::builtin();
        let fc = build_feature_collection(&resolve_flows(vec![FlowRecord::new("US", "DE", 10.0)], &table).drawable);
        let mut map = widget();
        map.set_source("flows", fc);

        let mut canvas = BrailleCanvas::new(120, 40);
        map.paint(&mut canvas);

        let vp = map.viewport(&canvas);
        let (x, y) = vp.project(table.resolve("DE").unwrap());
        assert_eq!(canvas.get(x, y), Ink::Marker);
    }
}
