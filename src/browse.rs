// src/browse.rs
//
// Record state for one page request. The unconditional load always runs
// first and a filter query only follows once it has settled. Nothing is
// kept between requests; every page sees the backend as it is now.
use tracing::{info, warn};

use crate::backend::BackendError;
use crate::domain::{Construction, ConstructionFilter};
use crate::repository::ConstructionRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loaded(Vec<Construction>),
    Failed(String),
}

impl LoadState {
    pub fn from_result(result: Result<Vec<Construction>, BackendError>) -> Self {
        match result {
            Ok(records) => LoadState::Loaded(records),
            Err(e) => LoadState::Failed(e.user_message().to_string()),
        }
    }

    pub fn records(&self) -> &[Construction] {
        match self {
            LoadState::Loaded(records) => records,
            LoadState::Failed(_) => &[],
        }
    }
}

/// Dropdown sources for the filter bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub cities: Vec<String>,
    pub license_types: Vec<String>,
}

impl Catalog {
    /// Each list settles on its own; a failed one is left empty.
    pub fn load(repo: &ConstructionRepository) -> Self {
        Self {
            cities: settled(repo.fetch_cities(), "cities"),
            license_types: settled(repo.fetch_license_types(), "license types"),
        }
    }
}

fn settled(result: Result<Vec<String>, BackendError>, source: &'static str) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!(source, error = %e, "filter options unavailable");
        Vec::new()
    })
}

/// What the index page shows for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowsePage {
    pub catalog: Catalog,
    pub state: LoadState,
}

impl BrowsePage {
    /// Initial load, then the filter query when the criteria narrow anything.
    /// A failed initial load stops here and never issues the filter query.
    pub fn load(repo: &ConstructionRepository, filter: &ConstructionFilter) -> Self {
        let all = match repo.fetch_all() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "initial load failed");
                return Self {
                    catalog: Catalog::default(),
                    state: LoadState::Failed(e.user_message().to_string()),
                };
            }
        };
        let catalog = Catalog::load(repo);
        info!(
            records = all.len(),
            cities = catalog.cities.len(),
            "initial load complete"
        );

        let state = if filter.is_unconstrained() {
            LoadState::Loaded(all)
        } else {
            LoadState::from_result(repo.filter(filter))
        };
        Self { catalog, state }
    }
}
