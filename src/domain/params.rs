// src/domain/params.rs
//
// URL query parameters of the browse page: what arrives from bookmarks and
// the filter page, and what every link on the page serializes back to.
use tracing::warn;
use url::form_urlencoded;

use crate::domain::filter::{ConstructionFilter, DateRange, StatusFilter, ALL};
use crate::domain::status::Status;

pub const FIRST_YEAR: i32 = 2010;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Map,
    List,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Map => "map",
            Tab::List => "list",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
}

pub const CATEGORIES: [Category; 4] = [
    Category { id: ALL, label: "Todos" },
    Category { id: "Aprovada", label: "Aprovada" },
    Category { id: "Consulta", label: "Consulta" },
    Category { id: "Análise", label: "Análise" },
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseParams {
    pub city: Option<String>,
    pub cities: Vec<String>,
    pub year: Option<String>,
    pub status: Option<String>,
    pub license_type: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tab: Tab,
    pub selected: Option<String>,
}

impl BrowseParams {
    pub fn parse(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "city" => params.city = Some(value),
                "cities" => {
                    if !params.cities.contains(&value) {
                        params.cities.push(value);
                    }
                }
                "year" => {
                    if is_valid_year(&value) {
                        params.year = Some(value);
                    } else {
                        warn!(year = %value, "ignoring malformed year parameter");
                    }
                }
                "status" => params.status = Some(value),
                "license" => params.license_type = Some(value),
                "q" => params.search = Some(value),
                "category" => params.category = Some(value),
                "tab" => params.tab = if value == "list" { Tab::List } else { Tab::Map },
                "selected" => params.selected = Some(value),
                _ => {}
            }
        }

        params
    }

    /// Chip currently highlighted. An explicit category wins; otherwise a
    /// canonical status parameter selects its own chip.
    pub fn active_category(&self) -> String {
        if let Some(cat) = &self.category {
            return cat.clone();
        }
        match self.status.as_deref().map(Status::from_raw) {
            Some(s) if s.is_canonical() => s.as_str().to_string(),
            _ => ALL.to_string(),
        }
    }

    pub fn to_filter(&self) -> ConstructionFilter {
        let mut status = self
            .status
            .as_deref()
            .map(StatusFilter::parse)
            .unwrap_or_default();

        if let Some(cat) = self.category.as_deref() {
            let cat_status = Status::from_raw(cat);
            if cat_status.is_canonical() {
                status = StatusFilter::Only(cat_status);
            }
        }

        ConstructionFilter {
            status,
            date_range: self.year.as_deref().map(DateRange::year),
            city: self.city.clone(),
            cities: self.cities.clone(),
            license_type: self.license_type.clone(),
            search: self.search.clone(),
        }
    }

    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        if let Some(v) = &self.city {
            ser.append_pair("city", v);
        }
        for c in &self.cities {
            ser.append_pair("cities", c);
        }
        if let Some(v) = &self.year {
            ser.append_pair("year", v);
        }
        if let Some(v) = &self.status {
            ser.append_pair("status", v);
        }
        if let Some(v) = &self.license_type {
            ser.append_pair("license", v);
        }
        if let Some(v) = &self.search {
            ser.append_pair("q", v);
        }
        if let Some(v) = &self.category {
            ser.append_pair("category", v);
        }
        if self.tab != Tab::Map {
            ser.append_pair("tab", self.tab.as_str());
        }
        if let Some(v) = &self.selected {
            ser.append_pair("selected", v);
        }
        ser.finish()
    }

    /// Link to the browse page with these parameters.
    pub fn href(&self) -> String {
        let qs = self.to_query_string();
        if qs.is_empty() {
            "/".to_string()
        } else {
            format!("/?{qs}")
        }
    }

    /// Selecting "all" also clears the status so the chip really shows all.
    pub fn with_category(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.selected = None;
        if id == ALL {
            next.category = None;
            next.status = None;
        } else {
            next.category = Some(id.to_string());
        }
        next
    }

    pub fn with_tab(&self, tab: Tab) -> Self {
        Self {
            tab,
            ..self.clone()
        }
    }

    pub fn with_selected(&self, id: Option<&str>) -> Self {
        Self {
            selected: id.map(str::to_string),
            ..self.clone()
        }
    }

    /// Everything reset except the visible tab.
    pub fn cleared(&self) -> Self {
        Self {
            tab: self.tab,
            ..Self::default()
        }
    }
}

pub fn is_valid_year(raw: &str) -> bool {
    raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Years offered by the filter page, newest first.
pub fn year_options(current_year: i32) -> Vec<String> {
    (FIRST_YEAR..=current_year.max(FIRST_YEAR))
        .rev()
        .map(|y| y.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::DateRange;

    #[test]
    fn parses_url_parameters() {
        let p = BrowseParams::parse(Some(
            "city=Blumenau&year=2022&status=Aprovada&q=silva&tab=list&selected=12",
        ));
        assert_eq!(p.city.as_deref(), Some("Blumenau"));
        assert_eq!(p.year.as_deref(), Some("2022"));
        assert_eq!(p.status.as_deref(), Some("Aprovada"));
        assert_eq!(p.search.as_deref(), Some("silva"));
        assert_eq!(p.tab, Tab::List);
        assert_eq!(p.selected.as_deref(), Some("12"));
    }

    #[test]
    fn year_param_becomes_date_range() {
        let filter = BrowseParams::parse(Some("year=2022")).to_filter();
        assert_eq!(filter.date_range, Some(DateRange::year("2022")));
        assert_eq!(
            filter.date_range.unwrap().start.as_deref(),
            Some("2022-01-01")
        );
    }

    #[test]
    fn malformed_year_is_ignored() {
        let p = BrowseParams::parse(Some("year=22&year=abcd"));
        assert_eq!(p.year, None);
    }

    #[test]
    fn repeated_cities_collect() {
        let p = BrowseParams::parse(Some("cities=Gaspar&cities=Ilhota&cities=Gaspar"));
        assert_eq!(p.cities, vec!["Gaspar".to_string(), "Ilhota".to_string()]);
    }

    #[test]
    fn canonical_category_overrides_status() {
        let p = BrowseParams::parse(Some("status=Consulta&category=Aprovada"));
        assert_eq!(p.to_filter().status, StatusFilter::Only(Status::Aprovada));
    }

    #[test]
    fn all_category_keeps_explicit_status() {
        let p = BrowseParams::parse(Some("status=Consulta&category=all"));
        assert_eq!(p.to_filter().status, StatusFilter::Only(Status::Consulta));
    }

    #[test]
    fn canonical_status_selects_its_chip() {
        assert_eq!(
            BrowseParams::parse(Some("status=Aprovada")).active_category(),
            "Aprovada"
        );
        assert_eq!(
            BrowseParams::parse(Some("status=Embargada")).active_category(),
            ALL
        );
    }

    #[test]
    fn choosing_all_chip_clears_status() {
        let p = BrowseParams::parse(Some("status=Consulta&category=Consulta&selected=3"));
        let next = p.with_category(ALL);
        assert_eq!(next.status, None);
        assert_eq!(next.category, None);
        assert_eq!(next.selected, None);
    }

    #[test]
    fn query_string_round_trips_accents() {
        let p = BrowseParams {
            status: Some("Análise".into()),
            cities: vec!["Rio do Sul".into()],
            ..Default::default()
        };
        let qs = p.to_query_string();
        assert_eq!(qs, "cities=Rio+do+Sul&status=An%C3%A1lise");
        assert_eq!(BrowseParams::parse(Some(&qs)), p);
    }

    #[test]
    fn href_without_params_is_root() {
        assert_eq!(BrowseParams::default().href(), "/");
        assert_eq!(
            BrowseParams::default().with_tab(Tab::List).href(),
            "/?tab=list"
        );
    }

    #[test]
    fn year_options_run_down_to_first_year() {
        let years = year_options(2013);
        assert_eq!(years, vec!["2013", "2012", "2011", "2010"]);
        assert_eq!(year_options(2000), vec!["2010"]);
    }
}
