// src/map/controller.rs
use std::thread;
use std::time::Duration;

use maud::{html, Markup};
use tracing::{debug, error, warn};

use crate::config::MapConfig;
use crate::domain::Construction;
use crate::map::script::{error_banner, BACKOFF_MS};
use crate::map::{MapAdapter, MapError, MapProvider, MapView, MarkerSpec};

/// Lifecycle of one map instance.
///
/// `Unloaded -> LibraryLoading -> LibraryReady -> MapInitializing -> MapReady -> Destroyed`,
/// with `Error` reachable from the two in-progress states. `Error` only leaves
/// through an explicit teardown, which always ends in `Destroyed`.
#[derive(Debug, Clone, PartialEq)]
pub enum MapState {
    Unloaded,
    LibraryLoading,
    LibraryReady,
    MapInitializing,
    MapReady,
    Error(MapError),
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &MapConfig) -> Self {
        Self {
            max_attempts: cfg.load_attempts.max(1),
            ..Self::default()
        }
    }
}

type ClickHandler = Box<dyn FnMut(&Construction)>;

/// Owns the map viewport and its marker set for one page.
pub struct MapController {
    adapter: Box<dyn MapAdapter>,
    policy: RetryPolicy,
    state: MapState,
    view: Option<MapView>,
    records: Option<Vec<Construction>>,
    markers: Vec<String>,
    on_click: Option<ClickHandler>,
}

impl MapController {
    pub fn new(adapter: Box<dyn MapAdapter>, policy: RetryPolicy) -> Self {
        Self {
            adapter,
            policy,
            state: MapState::Unloaded,
            view: None,
            records: None,
            markers: Vec::new(),
            on_click: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn provider(&self) -> MapProvider {
        self.adapter.provider()
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        self.state == MapState::MapReady
    }

    #[cfg(test)]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Idempotent. Retries transient failures up to the policy ceiling.
    pub fn load_library(&mut self) -> Result<(), MapError> {
        match &self.state {
            MapState::LibraryReady | MapState::MapInitializing | MapState::MapReady => return Ok(()),
            MapState::Error(e) => return Err(e.clone()),
            MapState::Destroyed => return Err(MapError::Destroyed),
            MapState::Unloaded | MapState::LibraryLoading => {}
        }

        self.state = MapState::LibraryLoading;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.adapter.load_library() {
                Ok(()) => {
                    debug!(attempt, provider = %self.adapter.provider(), "map library ready");
                    self.state = MapState::LibraryReady;
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    warn!(attempt, error = %e, "map library load failed, retrying");
                    if !self.policy.backoff.is_zero() {
                        thread::sleep(self.policy.backoff);
                    }
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
    }

    /// Create the viewport on first call; afterwards only move it.
    pub fn show(&mut self, view: MapView) -> Result<(), MapError> {
        self.load_library()?;

        if self.state == MapState::MapReady {
            if self.view != Some(view) {
                self.adapter.set_view(view);
                self.view = Some(view);
            }
            return Ok(());
        }

        self.state = MapState::MapInitializing;
        match self.adapter.create_viewport(view) {
            Ok(()) => {
                self.view = Some(view);
                self.state = MapState::MapReady;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Replace every marker when the collection changed by value.
    /// Returns whether anything was redrawn.
    pub fn sync_markers(&mut self, records: &[Construction]) -> Result<bool, MapError> {
        match &self.state {
            MapState::MapReady => {}
            MapState::Error(e) => return Err(e.clone()),
            MapState::Destroyed => return Err(MapError::Destroyed),
            _ => return Err(MapError::NotReady),
        }

        if self.records.as_deref() == Some(records) {
            return Ok(false);
        }

        self.clear_markers();
        for spec in records.iter().filter_map(MarkerSpec::from_record) {
            self.adapter.add_marker(&spec);
            self.markers.push(spec.key);
        }
        self.records = Some(records.to_vec());

        debug!(
            markers = self.markers.len(),
            records = records.len(),
            "markers synced"
        );
        Ok(true)
    }

    pub fn on_marker_click(&mut self, handler: impl FnMut(&Construction) + 'static) {
        self.on_click = Some(Box::new(handler));
    }

    /// Deliver a marker click. False when no marker has that key.
    pub fn click(&mut self, key: &str) -> bool {
        if !self.markers.iter().any(|k| k == key) {
            return false;
        }
        let Some(record) = self
            .records
            .as_ref()
            .and_then(|rs| rs.iter().find(|r| r.id == key))
        else {
            return false;
        };
        match self.on_click.as_mut() {
            Some(handler) => {
                handler(record);
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> Markup {
        match &self.state {
            MapState::MapReady => self.adapter.render(),
            MapState::Error(e) => error_banner(e.user_message(), true),
            _ => html! {},
        }
    }

    /// Remove markers, then the viewport, and end in `Destroyed`.
    /// Safe to call more than once, from any state.
    pub fn teardown(&mut self) {
        self.release();
        if self.state != MapState::Destroyed {
            debug!(provider = %self.adapter.provider(), "map destroyed");
            self.state = MapState::Destroyed;
        }
    }

    fn release(&mut self) {
        self.clear_markers();
        if self.view.take().is_some() {
            self.adapter.destroy();
        }
        self.records = None;
    }

    fn clear_markers(&mut self) {
        for key in self.markers.drain(..) {
            self.adapter.remove_marker(&key);
        }
    }

    fn fail(&mut self, e: MapError) -> MapError {
        error!(provider = %self.adapter.provider(), error = %e, "map unavailable");
        self.release();
        self.state = MapState::Error(e.clone());
        e
    }
}

impl Drop for MapController {
    fn drop(&mut self) {
        self.teardown();
    }
}
