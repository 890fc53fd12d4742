// src/domain/status.rs
use std::fmt;

/// License status. The data layer does not enforce an enumeration, so
/// anything unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Aprovada,
    Analise,
    Consulta,
    Residencial,
    Comercial,
    Other(String),
}

pub const UNKNOWN_COLOR: &str = "#999999";

impl Status {
    /// Status used when the backend row carries none.
    pub const DEFAULT: Status = Status::Analise;

    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "aprovada" => Status::Aprovada,
            "análise" | "analise" => Status::Analise,
            "consulta" => Status::Consulta,
            "residencial" => Status::Residencial,
            "comercial" => Status::Comercial,
            _ => Status::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Aprovada => "Aprovada",
            Status::Analise => "Análise",
            Status::Consulta => "Consulta",
            Status::Residencial => "Residencial",
            Status::Comercial => "Comercial",
            Status::Other(raw) => raw,
        }
    }

    /// Marker fill color.
    pub fn color(&self) -> &'static str {
        match self {
            Status::Aprovada => "#4CAF50",
            Status::Consulta => "#2196F3",
            Status::Analise => "#FF9800",
            Status::Residencial => "#9C27B0",
            Status::Comercial => "#F44336",
            Status::Other(_) => UNKNOWN_COLOR,
        }
    }

    /// CSS class for the status badge in lists and the details dialog.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Status::Aprovada => "badge badge-approved",
            Status::Consulta => "badge badge-consult",
            Status::Analise => "badge badge-review",
            Status::Residencial | Status::Comercial | Status::Other(_) => "badge badge-neutral",
        }
    }

    /// The three values a category chip may turn into a status filter.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Status::Aprovada | Status::Analise | Status::Consulta)
    }

    pub fn canonical() -> [Status; 3] {
        [Status::Aprovada, Status::Consulta, Status::Analise]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
