//! OAuth client credentials as downloaded from the Google Cloud console.

use std::fmt;
use std::path::Path;

use agenda_core::AuthError;
use serde::Deserialize;

/// Application (client) credentials. Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ApplicationCredential {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for ApplicationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationCredential")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CredentialFile {
    installed: Option<ClientBlock>,
    web: Option<ClientBlock>,
}

#[derive(Debug, Deserialize)]
struct ClientBlock {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Read the credential file at `path`.
///
/// The client block is taken from `installed`, falling back to `web`.
pub fn load_application_credential(path: &Path) -> Result<ApplicationCredential, AuthError> {
    let contents = std::fs::read_to_string(path).map_err(|e| AuthError::CredentialFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let credential = parse_application_credential(&contents).map_err(|reason| {
        AuthError::CredentialFile {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    tracing::debug!("Loaded application credentials from {:?}", path);
    Ok(credential)
}

fn parse_application_credential(contents: &str) -> Result<ApplicationCredential, String> {
    let file: CredentialFile = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    let block = file
        .installed
        .or(file.web)
        .ok_or_else(|| "expected an \"installed\" or \"web\" client block".to_string())?;

    let redirect_uri = block
        .redirect_uris
        .into_iter()
        .next()
        .ok_or_else(|| "redirect_uris is empty".to_string())?;

    Ok(ApplicationCredential {
        client_id: block.client_id,
        client_secret: block.client_secret,
        redirect_uri,
    })
}
