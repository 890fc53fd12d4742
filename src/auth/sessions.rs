// src/auth/sessions.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::auth::store::{Navigator, SessionStore};
use crate::auth::token::{SessionToken, TokenDigest};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "sid";
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// Captures the store's navigation so the router can answer with a redirect.
#[derive(Default)]
pub struct RedirectNavigator {
    target: Mutex<Option<String>>,
}

impl RedirectNavigator {
    pub fn take(&self) -> Option<String> {
        self.target.lock().ok().and_then(|mut t| t.take())
    }
}

impl Navigator for RedirectNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut t) = self.target.lock() {
            *t = Some(path.to_string());
        }
    }
}

/// Everything the server keeps for one signed-in browser.
pub struct SessionEntry {
    store: Mutex<SessionStore>,
    pub redirect: Arc<RedirectNavigator>,
    expires_at: i64,
}

impl SessionEntry {
    /// A store that is not registered yet. It only gets a cookie through
    /// [`SessionRegistry::establish`] once authentication succeeds.
    pub fn new(now: i64) -> Self {
        let redirect = Arc::new(RedirectNavigator::default());
        let mut store = SessionStore::new(redirect.clone());
        store.subscribe(|event| info!(event = event.name(), "auth event"));

        Self {
            store: Mutex::new(store),
            redirect,
            expires_at: now + SESSION_TTL_SECS,
        }
    }

    pub fn store(&self) -> Result<MutexGuard<'_, SessionStore>, ServerError> {
        self.store.lock().map_err(|_| ServerError::InternalError)
    }
}

pub struct SessionHandle {
    pub token: SessionToken,
    pub entry: Arc<SessionEntry>,
}

impl SessionHandle {
    pub fn cookie(&self) -> String {
        set_cookie_header(&self.token)
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    entries: Mutex<HashMap<TokenDigest, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<TokenDigest, Arc<SessionEntry>>>, ServerError> {
        self.entries.lock().map_err(|_| ServerError::InternalError)
    }

    /// Find the live session named by the request's cookie. Never creates one.
    pub fn lookup(&self, cookie_header: Option<&str>, now: i64) -> Result<Option<SessionHandle>, ServerError> {
        let Some(token) = cookie_header
            .and_then(|h| cookie_value(h, SESSION_COOKIE))
            .and_then(SessionToken::parse)
        else {
            return Ok(None);
        };

        let mut entries = self.entries()?;
        let digest = token.digest();
        match entries.get(&digest) {
            Some(entry) if entry.expires_at > now => Ok(Some(SessionHandle {
                token,
                entry: entry.clone(),
            })),
            Some(_) => {
                debug!("session expired");
                entries.remove(&digest);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Register an authenticated entry under a freshly minted token.
    pub fn establish(&self, entry: SessionEntry, now: i64) -> Result<SessionHandle, ServerError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }

        let token = SessionToken::generate();
        let entry = Arc::new(entry);
        entries.insert(token.digest(), entry.clone());
        debug!(sessions = entries.len(), "session established");

        Ok(SessionHandle { token, entry })
    }

    pub fn revoke(&self, token: &SessionToken) -> bool {
        match self.entries() {
            Ok(mut entries) => entries.remove(&token.digest()).is_some(),
            Err(_) => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().map(|e| e.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener and session. Called once on the way out.
    pub fn shutdown(&self) {
        let Ok(mut entries) = self.entries() else {
            return;
        };
        for entry in entries.values() {
            if let Ok(mut store) = entry.store.lock() {
                store.shutdown();
            }
        }
        info!(sessions = entries.len(), "session registry shut down");
        entries.clear();
    }
}

pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

pub fn set_cookie_header(token: &SessionToken) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}",
        token.as_str()
    )
}

pub fn clear_cookie_header() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
