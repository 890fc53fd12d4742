// src/backend/client.rs
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{BackendError, Query, RowSource};
use crate::config::BackendConfig;

/// Blocking client for the hosted data service. Shared by the record
/// repository (REST) and the auth provider (GoTrue).
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
    view: String,
}

impl SupabaseClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.url.clone(),
            anon_key: cfg.anon_key.clone(),
            view: cfg.view.clone(),
        })
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the project key. `bearer` defaults to the anon key when the call
    /// is not made on behalf of a signed-in user.
    pub fn authorize(&self, req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer.unwrap_or(&self.anon_key)))
    }

    pub fn get(&self, url: &str, bearer: Option<&str>) -> RequestBuilder {
        self.authorize(self.http.get(url), bearer)
    }

    pub fn post(&self, url: &str, bearer: Option<&str>) -> RequestBuilder {
        self.authorize(self.http.post(url), bearer)
    }

    pub fn put(&self, url: &str, bearer: Option<&str>) -> RequestBuilder {
        self.authorize(self.http.put(url), bearer)
    }
}

impl RowSource for SupabaseClient {
    fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let url = self.rest_url(&self.view);
        let params = query.to_params();
        debug!(view = %self.view, ?params, "selecting rows");

        let resp = self
            .get(&url, None)
            .header("Accept", "application/json")
            .query(&params)
            .send()?;

        let body = read_json(resp)?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => {
                warn!(view = %self.view, "row select returned a non-array body");
                Err(BackendError::Decode(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                )))
            }
        }
    }
}

/// Turn a response into JSON, mapping non-2xx statuses to `BackendError::Status`.
pub fn read_json(resp: Response) -> Result<Value, BackendError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    let text = resp.text()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
}

/// PostgREST and GoTrue both put a human-readable message somewhere in the
/// error body; pick the first one present.
pub fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&BackendConfig {
            url: "https://demo.supabase.co".into(),
            anon_key: "anon".into(),
            view: "constructions_view".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn builds_rest_and_auth_urls() {
        let c = client();
        assert_eq!(
            c.rest_url("constructions_view"),
            "https://demo.supabase.co/rest/v1/constructions_view"
        );
        assert_eq!(
            c.auth_url("/token?grant_type=password"),
            "https://demo.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn error_message_prefers_known_keys() {
        assert_eq!(
            error_message(r#"{"code":"400","msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(r#"{"message":"relation does not exist"}"#),
            "relation does not exist"
        );
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn json_kind_names() {
        assert_eq!(json_kind(&serde_json::json!({})), "an object");
        assert_eq!(json_kind(&Value::Null), "null");
    }
}
