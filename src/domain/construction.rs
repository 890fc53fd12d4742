// src/domain/construction.rs
use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::status::Status;

// Column names as exposed by the backend view.
pub const COL_ID: &str = "id";
pub const COL_COMPANY: &str = "Nome da Empresa";
pub const COL_TAX_ID: &str = "CNPJ";
pub const COL_ADDRESS: &str = "Endereço";
pub const COL_CITY: &str = "Cidade";
pub const COL_LICENSE_TYPE: &str = "Tipo de Licença";
pub const COL_DATE: &str = "Data";
pub const COL_FILE_NAME: &str = "Nome do Arquivo";
pub const COL_STATUS: &str = "status";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_BUILT_AREA: &str = "Área Construída";
pub const COL_LOT_AREA: &str = "Área do Terreno";

/// One construction-license entry, already normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    pub id: String,
    pub company_name: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub license_type: String,
    /// Kept as the backend sends it (usually `dd/mm/yyyy`).
    pub issue_date: String,
    pub file_name: String,
    pub status: Status,
    pub latitude: f64,
    pub longitude: f64,
    pub built_area: f64,
    pub lot_area: f64,
}

impl Default for Construction {
    fn default() -> Self {
        Self {
            id: String::new(),
            company_name: String::new(),
            tax_id: String::new(),
            address: String::new(),
            city: String::new(),
            license_type: String::new(),
            issue_date: String::new(),
            file_name: String::new(),
            status: Status::DEFAULT,
            latitude: 0.0,
            longitude: 0.0,
            built_area: 0.0,
            lot_area: 0.0,
        }
    }
}

impl Construction {
    /// Map a raw backend row field by field. Missing text becomes `""`,
    /// missing or unparseable numbers become `0`.
    pub fn from_row(row: &Value) -> Self {
        if !row.is_object() {
            return Self::default();
        }

        let file_name = text(row, COL_FILE_NAME);
        let id = match text(row, COL_ID) {
            id if !id.is_empty() => id,
            _ => file_name.clone(),
        };

        let status = match text(row, COL_STATUS) {
            s if s.trim().is_empty() => Status::DEFAULT,
            s => Status::from_raw(&s),
        };

        Self {
            id,
            company_name: text(row, COL_COMPANY),
            tax_id: text(row, COL_TAX_ID),
            address: text(row, COL_ADDRESS),
            city: text(row, COL_CITY),
            license_type: text(row, COL_LICENSE_TYPE),
            issue_date: text(row, COL_DATE),
            file_name,
            status,
            latitude: number(row, COL_LATITUDE),
            longitude: number(row, COL_LONGITUDE),
            built_area: number(row, COL_BUILT_AREA),
            lot_area: number(row, COL_LOT_AREA),
        }
    }

    /// Both coordinates present. Zero stands for "absent".
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }

    pub fn display_name(&self) -> String {
        if self.company_name.is_empty() {
            format!("Construção {}", self.id)
        } else {
            self.company_name.clone()
        }
    }

    /// `dd/mm/yyyy` for display, or `None` when the stored date is unusable.
    pub fn formatted_date(&self) -> Option<String> {
        let raw = self.issue_date.trim();
        if raw.is_empty() {
            return None;
        }

        let date = ["%d/%m/%Y", "%Y-%m-%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            // timestamps such as 2023-05-02T00:00:00
            .or_else(|| {
                raw.get(..10)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            })?;

        Some(date.format("%d/%m/%Y").to_string())
    }

    /// Google Maps search link, by coordinates when available.
    pub fn maps_link(&self) -> String {
        const BASE: &str = "https://www.google.com/maps/search/?api=1&query=";
        if self.has_coordinates() {
            format!("{BASE}{},{}", self.latitude, self.longitude)
        } else {
            let query = format!("{}, {}", self.address, self.city);
            let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
            format!("{BASE}{encoded}")
        }
    }
}

fn text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn number(row: &Value, key: &str) -> f64 {
    let parsed = match row.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_decimal(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Accepts `12.5` and the comma-decimal `12,5` some sources export.
fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    s.parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok())
}
