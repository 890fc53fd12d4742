// src/map/mod.rs
use std::fmt;
use std::str::FromStr;

use maud::Markup;
use serde::Serialize;

use crate::config::MapConfig;
use crate::domain::Construction;

pub mod controller;
pub mod leaflet;
pub mod mapbox;
pub mod script;

pub use controller::{MapController, MapState, RetryPolicy};
pub use leaflet::LeafletAdapter;
pub use mapbox::MapboxAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapProvider {
    Leaflet,
    Mapbox,
}

impl MapProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            MapProvider::Leaflet => "leaflet",
            MapProvider::Mapbox => "mapbox",
        }
    }
}

impl fmt::Display for MapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leaflet" => Ok(MapProvider::Leaflet),
            "mapbox" => Ok(MapProvider::Mapbox),
            other => Err(format!("unknown map provider `{other}` (expected leaflet or mapbox)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
}

/// What one marker needs on the page. Built only from records that
/// carry both coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub key: String,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub title: String,
    pub status: String,
    pub city: String,
    pub address: String,
}

impl MarkerSpec {
    pub fn from_record(record: &Construction) -> Option<Self> {
        if !record.has_coordinates() {
            return None;
        }
        Some(Self {
            key: record.id.clone(),
            lat: record.latitude,
            lng: record.longitude,
            color: record.status.color(),
            title: record.display_name(),
            status: record.status.as_str().to_string(),
            city: record.city.clone(),
            address: record.address.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map library failed to load: {0}")]
    LibraryLoad(String),

    #[error("mapbox access token is not configured")]
    MissingToken,

    #[error("viewport could not be created: {0}")]
    Viewport(String),

    #[error("map is not ready")]
    NotReady,

    #[error("map was already torn down")]
    Destroyed,
}

impl MapError {
    /// Only transient load failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MapError::LibraryLoad(_))
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            MapError::MissingToken => "O mapa não está configurado. A lista continua disponível.",
            _ => "Não foi possível carregar o mapa. A lista continua disponível.",
        }
    }
}

/// Capabilities a mapping library has to offer the controller.
pub trait MapAdapter {
    fn provider(&self) -> MapProvider;
    fn load_library(&mut self) -> Result<(), MapError>;
    fn create_viewport(&mut self, view: MapView) -> Result<(), MapError>;
    fn set_view(&mut self, view: MapView);
    fn add_marker(&mut self, marker: &MarkerSpec);
    fn remove_marker(&mut self, key: &str);
    fn destroy(&mut self);
    /// Page markup that runs everything recorded so far in the browser.
    fn render(&self) -> Markup;
}

pub fn adapter_for(cfg: &MapConfig) -> Box<dyn MapAdapter> {
    match cfg.provider {
        MapProvider::Leaflet => Box::new(LeafletAdapter::new(cfg.load_attempts)),
        MapProvider::Mapbox => Box::new(MapboxAdapter::new(
            cfg.mapbox_token.clone(),
            cfg.load_attempts,
        )),
    }
}

pub fn default_view(cfg: &MapConfig) -> MapView {
    MapView {
        center: cfg.center.into(),
        zoom: cfg.zoom,
    }
}
