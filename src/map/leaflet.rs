// src/map/leaflet.rs
use maud::Markup;

use crate::map::script::{js_value, Library, ScriptBuffer};
use crate::map::{MapAdapter, MapError, MapProvider, MapView, MarkerSpec};

pub const LEAFLET: Library = Library {
    js: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
    js_integrity: Some("sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="),
    css: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    css_integrity: Some("sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="),
    global: "L",
};

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Tile-based adapter. Coordinates go to Leaflet as `[lat, lng]`.
pub struct LeafletAdapter {
    attempts: u32,
    loaded: bool,
    viewport: bool,
    script: ScriptBuffer,
}

impl LeafletAdapter {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            loaded: false,
            viewport: false,
            script: ScriptBuffer::default(),
        }
    }
}

impl MapAdapter for LeafletAdapter {
    fn provider(&self) -> MapProvider {
        MapProvider::Leaflet
    }

    fn load_library(&mut self) -> Result<(), MapError> {
        self.loaded = true;
        Ok(())
    }

    fn create_viewport(&mut self, view: MapView) -> Result<(), MapError> {
        if !self.loaded {
            return Err(MapError::Viewport("leaflet not loaded".into()));
        }
        self.script.push(format!(
            "var map = L.map('map', {{ zoomControl: false }}).setView([{}, {}], {});",
            view.center.lat, view.center.lng, view.zoom
        ));
        self.script
            .push("L.control.zoom({ position: 'topright' }).addTo(map);");
        self.script.push(format!(
            "L.tileLayer({}, {{ attribution: {}, maxZoom: 19 }}).addTo(map);",
            js_value(TILE_URL),
            js_value(ATTRIBUTION)
        ));
        self.script.push("window.obraMaps.map = map;");
        self.script
            .push("window.addEventListener('resize', function () { map.invalidateSize(); });");
        self.script.push(ADD_MARKER_FN);
        self.viewport = true;
        Ok(())
    }

    fn set_view(&mut self, view: MapView) {
        if !self.viewport {
            return;
        }
        self.script.push(format!(
            "window.obraMaps.map.setView([{}, {}], {});",
            view.center.lat, view.center.lng, view.zoom
        ));
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.script
            .push(format!("window.obraMaps.addMarker({});", js_value(marker)));
    }

    fn remove_marker(&mut self, key: &str) {
        self.script
            .push(format!("window.obraMaps.removeMarker({});", js_value(key)));
    }

    fn destroy(&mut self) {
        self.viewport = false;
    }

    fn render(&self) -> Markup {
        self.script
            .render(&LEAFLET, MapProvider::Leaflet.as_str(), self.attempts)
    }
}

const ADD_MARKER_FN: &str = r#"window.obraMaps.addMarker = function (m) {
        var pin = document.createElement('span');
        pin.className = 'status-pin';
        pin.style.background = m.color;
        pin.setAttribute('data-key', m.key);
        var icon = L.divIcon({ className: 'status-pin-wrap', html: pin.outerHTML, iconSize: [18, 18], iconAnchor: [9, 9] });
        var card = document.createElement('div');
        [['strong', m.title], ['span', m.status], ['span', m.city], ['span', m.address]].forEach(function (p) {
          var el = document.createElement(p[0]);
          el.textContent = p[1];
          card.appendChild(el);
        });
        var marker = L.marker([m.lat, m.lng], { icon: icon, title: m.title })
          .bindTooltip(card, { direction: 'top' })
          .addTo(map);
        marker.on('click', function () { window.onMarkerClick(m.key); });
        window.obraMaps.markers[m.key] = marker;
      };"#;
