// src/map/mapbox.rs
use maud::Markup;
use tracing::warn;

use crate::map::script::{js_value, Library, ScriptBuffer};
use crate::map::{MapAdapter, MapError, MapProvider, MapView, MarkerSpec};

pub const MAPBOX_GL: Library = Library {
    js: "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.js",
    js_integrity: None,
    css: "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.css",
    css_integrity: None,
    global: "mapboxgl",
};

const STYLE: &str = "mapbox://styles/mapbox/light-v11";

/// Vector adapter. Needs a public access token; coordinates go to
/// Mapbox GL as `[lng, lat]`.
pub struct MapboxAdapter {
    token: Option<String>,
    attempts: u32,
    loaded: bool,
    script: ScriptBuffer,
}

impl MapboxAdapter {
    pub fn new(token: Option<String>, attempts: u32) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            attempts,
            loaded: false,
            script: ScriptBuffer::default(),
        }
    }
}

impl MapAdapter for MapboxAdapter {
    fn provider(&self) -> MapProvider {
        MapProvider::Mapbox
    }

    fn load_library(&mut self) -> Result<(), MapError> {
        if self.token.is_none() {
            warn!("MAPBOX_TOKEN is not set; mapbox adapter cannot load");
            return Err(MapError::MissingToken);
        }
        self.loaded = true;
        Ok(())
    }

    fn create_viewport(&mut self, view: MapView) -> Result<(), MapError> {
        let Some(token) = self.token.as_deref().filter(|_| self.loaded) else {
            return Err(MapError::Viewport("mapbox-gl not loaded".into()));
        };
        self.script
            .push(format!("mapboxgl.accessToken = {};", js_value(token)));
        self.script.push(format!(
            "var map = new mapboxgl.Map({{ container: 'map', style: {}, center: [{}, {}], zoom: {} }});",
            js_value(STYLE),
            view.center.lng,
            view.center.lat,
            view.zoom
        ));
        self.script.push(
            "map.addControl(new mapboxgl.NavigationControl({ showCompass: false }), 'top-right');",
        );
        self.script.push("window.obraMaps.map = map;");
        self.script.push(ADD_MARKER_FN);
        Ok(())
    }

    fn set_view(&mut self, view: MapView) {
        self.script.push(format!(
            "window.obraMaps.map.jumpTo({{ center: [{}, {}], zoom: {} }});",
            view.center.lng, view.center.lat, view.zoom
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
        self.loaded = false;
    }

    fn render(&self) -> Markup {
        self.script
            .render(&MAPBOX_GL, MapProvider::Mapbox.as_str(), self.attempts)
    }
}

const ADD_MARKER_FN: &str = r#"window.obraMaps.addMarker = function (m) {
        var el = document.createElement('div');
        el.className = 'status-dot';
        el.style.cssText = 'width:14px;height:14px;border-radius:50%;border:2px solid #fff;cursor:pointer;background:' + m.color;
        el.title = m.title + ' (' + m.status + ')';
        el.addEventListener('click', function () { window.onMarkerClick(m.key); });
        window.obraMaps.markers[m.key] = new mapboxgl.Marker({ element: el }).setLngLat([m.lng, m.lat]).addTo(map);
      };"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LatLng;

    fn view() -> MapView {
        MapView {
            center: LatLng {
                lat: -27.2423,
                lng: -49.6401,
            },
            zoom: 9.0,
        }
    }

    #[test]
    fn missing_token_is_a_load_failure() {
        let mut adapter = MapboxAdapter::new(None, 3);
        assert_eq!(adapter.load_library(), Err(MapError::MissingToken));

        let mut blank = MapboxAdapter::new(Some("  ".into()), 3);
        assert_eq!(blank.load_library(), Err(MapError::MissingToken));
    }

    #[test]
    fn uses_lng_lat_order_and_light_style() {
        let mut adapter = MapboxAdapter::new(Some("pk.test".into()), 3);
        adapter.load_library().unwrap();
        adapter.create_viewport(view()).unwrap();

        let html = adapter.render().into_string();

        assert!(html.contains("center: [-49.6401, -27.2423]"));
        assert!(html.contains("light-v11"));
        assert!(html.contains("showCompass: false"));
        assert!(html.contains(r#"mapboxgl.accessToken = "pk.test""#));
    }
}
