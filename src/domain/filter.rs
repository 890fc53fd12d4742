// src/domain/filter.rs
use crate::backend::Query;
use crate::domain::construction::{
    COL_ADDRESS, COL_CITY, COL_COMPANY, COL_DATE, COL_LICENSE_TYPE, COL_STATUS,
};
use crate::domain::status::Status;

/// Sentinel the UI uses for "no status constraint".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            StatusFilter::All
        } else {
            StatusFilter::Only(Status::from_raw(raw))
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            StatusFilter::All => ALL,
            StatusFilter::Only(s) => s.as_str(),
        }
    }
}

/// Inclusive bounds on the date column. Compared as strings by the backend;
/// start <= end is not checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn year(year: &str) -> Self {
        Self {
            start: Some(format!("{year}-01-01")),
            end: Some(format!("{year}-12-31")),
        }
    }
}

/// Constraints narrowing the displayed record collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionFilter {
    pub status: StatusFilter,
    pub date_range: Option<DateRange>,
    pub city: Option<String>,
    /// Matches any of these cities (OR), merged with `city`.
    pub cities: Vec<String>,
    pub license_type: Option<String>,
    pub search: Option<String>,
}

impl ConstructionFilter {
    /// Single city and multi-city selections merged, blanks dropped,
    /// first occurrence wins.
    pub fn city_set(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for c in self.city.iter().chain(self.cities.iter()) {
            let c = c.trim();
            if !c.is_empty() && !out.iter().any(|o| o == c) {
                out.push(c.to_string());
            }
        }
        out
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.status == StatusFilter::All
            && self.date_range.is_none()
            && self.city_set().is_empty()
            && self.license_type.as_deref().map_or(true, |l| l.trim().is_empty())
            && self.search_term().is_none()
    }

    /// Translate into backend query parameters. Every clause is ANDed.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();

        if let StatusFilter::Only(status) = &self.status {
            query = query.eq(COL_STATUS, status.as_str());
        }

        if let Some(range) = &self.date_range {
            if let Some(start) = range.start.as_deref().filter(|s| !s.is_empty()) {
                query = query.gte(COL_DATE, start);
            }
            if let Some(end) = range.end.as_deref().filter(|s| !s.is_empty()) {
                query = query.lte(COL_DATE, end);
            }
        }

        let cities = self.city_set();
        query = match cities.len() {
            0 => query,
            1 => query.eq(COL_CITY, cities[0].clone()),
            _ => query.in_list(COL_CITY, cities),
        };

        if let Some(license) = self.license_type.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            query = query.eq(COL_LICENSE_TYPE, license);
        }

        if let Some(term) = self.search_term() {
            query = query.any_ilike(&[COL_ADDRESS, COL_COMPANY, COL_CITY], term);
        }

        query
    }
}
