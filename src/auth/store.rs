// src/auth/store.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::provider::{
    AuthError, AuthEvent, AuthProvider, AuthUser, Session, SignUpOutcome, VerifyKind,
};

pub const LOGIN_PATH: &str = "/login";

/// Where the store sends the user after signing out.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// The current session has not been checked yet.
    Loading,
    Settled,
}

pub type ListenerId = u64;

type Listener = Box<dyn Fn(&AuthEvent) + Send>;

/// Authentication state of one browser session.
pub struct SessionStore {
    phase: AuthPhase,
    session: Option<Session>,
    navigator: Arc<dyn Navigator>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl SessionStore {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            phase: AuthPhase::Loading,
            session: None,
            navigator,
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Loading
    }

    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Check the stored session against the provider. No-op once settled.
    ///
    /// A token past its `expires_at` skips the user check and goes straight
    /// to refresh. A refresh that fails ends the session with `SignedOut`.
    pub fn settle(&mut self, provider: &dyn AuthProvider, now: i64) {
        if self.phase == AuthPhase::Settled {
            return;
        }

        let Some(session) = self.session.clone() else {
            self.phase = AuthPhase::Settled;
            return;
        };

        let expired = session.expires_at.is_some_and(|at| at <= now);
        let check = if expired {
            debug!("access token past expiry");
            Err(AuthError::SessionExpired)
        } else {
            provider.current_user(&session.access_token)
        };

        match check {
            Ok(user) => {
                if user != session.user {
                    self.handle_event(AuthEvent::UserUpdated(user));
                }
            }
            Err(AuthError::SessionExpired) => match provider.refresh(&session.refresh_token) {
                Ok(fresh) => self.handle_event(AuthEvent::TokenRefreshed(fresh)),
                Err(e) => {
                    info!(error = %e, "stored session could not be refreshed");
                    self.handle_event(AuthEvent::SignedOut);
                }
            },
            Err(e) => warn!(error = %e, "session check failed, keeping stored session"),
        }

        self.phase = AuthPhase::Settled;
    }

    /// Re-check the session from scratch. Runs on every protected request.
    pub fn revalidate(&mut self, provider: &dyn AuthProvider, now: i64) {
        self.invalidate();
        self.settle(provider, now);
    }

    /// Drop back to `Loading` so the next settle re-checks the session.
    pub fn invalidate(&mut self) {
        self.phase = AuthPhase::Loading;
    }

    pub fn handle_event(&mut self, event: AuthEvent) {
        debug!(event = event.name(), "auth state change");

        match &event {
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) | AuthEvent::PasswordRecovery(s) => {
                self.session = Some(s.clone());
            }
            AuthEvent::UserUpdated(user) => {
                if let Some(s) = self.session.as_mut() {
                    s.user = user.clone();
                }
            }
            AuthEvent::SignedOut => {
                if self.session.take().is_some() {
                    self.navigator.navigate(LOGIN_PATH);
                }
            }
        }
        self.phase = AuthPhase::Settled;

        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    pub fn register(
        &mut self,
        provider: &dyn AuthProvider,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let outcome = provider.sign_up(email, password, redirect_to)?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.handle_event(AuthEvent::SignedIn(session.clone()));
        }
        Ok(outcome)
    }

    pub fn authenticate(
        &mut self,
        provider: &dyn AuthProvider,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let session = provider.sign_in(email, password)?;
        info!(user_id = %session.user.id, "signed in");
        self.handle_event(AuthEvent::SignedIn(session));
        Ok(())
    }

    /// Local state is always cleared and `/login` is visited exactly once,
    /// whether or not the remote revoke succeeds.
    pub fn sign_out(&mut self, provider: &dyn AuthProvider) -> Result<(), AuthError> {
        let remote = match self.session.as_ref() {
            Some(s) => provider.sign_out(&s.access_token),
            None => Ok(()),
        };
        if let Err(e) = &remote {
            warn!(error = %e, "remote sign out failed; clearing local session anyway");
        }

        let had_session = self.session.is_some();
        self.handle_event(AuthEvent::SignedOut);
        if !had_session {
            self.navigator.navigate(LOGIN_PATH);
        }
        remote
    }

    pub fn request_password_reset(
        &self,
        provider: &dyn AuthProvider,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        provider.reset_password(email, redirect_to)
    }

    /// Exchange an emailed one-time link for a session.
    pub fn complete_verification(
        &mut self,
        provider: &dyn AuthProvider,
        token_hash: &str,
        kind: VerifyKind,
    ) -> Result<(), AuthError> {
        let session = provider.verify(token_hash, kind)?;
        let event = match kind {
            VerifyKind::Recovery => AuthEvent::PasswordRecovery(session),
            _ => AuthEvent::SignedIn(session),
        };
        self.handle_event(event);
        Ok(())
    }

    pub fn update_password(
        &mut self,
        provider: &dyn AuthProvider,
        password: &str,
    ) -> Result<(), AuthError> {
        let session = self.session.as_ref().ok_or(AuthError::NotSignedIn)?;
        provider.update_password(&session.access_token, password)?;
        let user = session.user.clone();
        self.handle_event(AuthEvent::UserUpdated(user));
        Ok(())
    }

    pub fn subscribe(&mut self, listener: impl Fn(&AuthEvent) + Send + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    #[cfg(test)]
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn shutdown(&mut self) {
        self.listeners.clear();
    }
}
