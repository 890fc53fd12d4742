pub mod gotrue;
pub mod provider;
pub mod sessions;
pub mod store;
pub mod token;

pub use gotrue::GoTrueClient;
pub use provider::{AuthError, AuthEvent, AuthProvider, AuthUser, Session, SignUpOutcome, VerifyKind};
pub use sessions::{SessionEntry, SessionHandle, SessionRegistry};
pub use store::SessionStore;
