//! Google OAuth2 sign-in for agenda.
//!
//! Loads the application credentials, reuses a cached user token when one
//! exists and otherwise walks the operator through the authorization-code
//! flow.

pub mod authorizer;
pub mod client;
pub mod credentials;
pub mod google;
pub mod prompt;
pub mod storage;

pub use authorizer::{AuthState, Authorizer};
pub use client::{AuthenticatedClient, TokenSource};
pub use credentials::{load_application_credential, ApplicationCredential};
pub use google::{GoogleOAuth2Provider, GoogleTokenResponse};
pub use prompt::{Prompt, StdinPrompt};
pub use storage::{TokenStore, UserToken};
