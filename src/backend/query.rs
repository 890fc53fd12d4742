// src/backend/query.rs
//
// A small PostgREST query builder. Only the operators the record view needs
// are modelled; everything else stays the backend's business.

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Eq { column: String, value: String },
    Gte { column: String, value: String },
    Lte { column: String, value: String },
    /// OR of equalities on one column.
    In { column: String, values: Vec<String> },
    /// Case-insensitive substring match on any of the columns.
    AnyILike { columns: Vec<String>, term: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    columns: Vec<String>,
    clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the selected columns. An empty list selects `*`.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Gte {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn lte(mut self, column: &str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Lte {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn in_list(mut self, column: &str, values: Vec<String>) -> Self {
        self.clauses.push(Clause::In {
            column: column.to_string(),
            values,
        });
        self
    }

    pub fn any_ilike(mut self, columns: &[&str], term: impl Into<String>) -> Self {
        self.clauses.push(Clause::AnyILike {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            term: term.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_clause_on(&self, column: &str) -> bool {
        self.clauses.iter().any(|c| match c {
            Clause::Eq { column: col, .. }
            | Clause::Gte { column: col, .. }
            | Clause::Lte { column: col, .. }
            | Clause::In { column: col, .. } => col == column,
            Clause::AnyILike { columns, .. } => columns.iter().any(|col| col == column),
        })
    }

    /// Unencoded query-string pairs; the HTTP client percent-encodes them.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(",")
        };

        let mut params = vec![("select".to_string(), select)];

        for clause in &self.clauses {
            let pair = match clause {
                Clause::Eq { column, value } => (column.clone(), format!("eq.{value}")),
                Clause::Gte { column, value } => (column.clone(), format!("gte.{value}")),
                Clause::Lte { column, value } => (column.clone(), format!("lte.{value}")),
                Clause::In { column, values } => {
                    let list = values
                        .iter()
                        .map(|v| quote_value(v))
                        .collect::<Vec<_>>()
                        .join(",");
                    (column.clone(), format!("in.({list})"))
                }
                Clause::AnyILike { columns, term } => {
                    let pattern = quote_value(&format!("*{term}*"));
                    let alternatives = columns
                        .iter()
                        .map(|c| format!("{}.ilike.{pattern}", quote_ident(c)))
                        .collect::<Vec<_>>()
                        .join(",");
                    ("or".to_string(), format!("({alternatives})"))
                }
            };
            params.push(pair);
        }

        params
    }
}

/// Column names with spaces or accents need double quotes inside PostgREST
/// select lists and logic trees.
fn quote_ident(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        quote_value(name)
    }
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
