// src/config/credentials.rs
use std::{fmt, fs, path::Path};

use serde::Deserialize;

/// Site logins read from `credential.json`. Never written back.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(rename = "QOJ_USERNAME", default)]
    pub qoj_username: Option<String>,
    #[serde(rename = "QOJ_PASSWORD", default)]
    pub qoj_password: Option<String>,
}

impl Credentials {
    /// Best-effort load. A missing or malformed file yields empty credentials
    /// and a warning; sites that need a login are then skipped.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                logw!("Credentials: cannot read {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(c) => c,
            Err(e) => {
                logw!("Credentials: malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// QOJ username and password, when both are present and non-empty.
    pub fn qoj(&self) -> Option<(&str, &str)> {
        match (self.qoj_username.as_deref(), self.qoj_password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("qoj_username", &self.qoj_username)
            .field("qoj_password", &self.qoj_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qoj_requires_both_fields() {
        let c: Credentials = serde_json::from_str(r#"{"QOJ_USERNAME":"alice"}"#).unwrap();
        assert!(c.qoj().is_none());

        let c: Credentials =
            serde_json::from_str(r#"{"QOJ_USERNAME":"alice","QOJ_PASSWORD":"pw"}"#).unwrap();
        assert_eq!(c.qoj(), Some(("alice", "pw")));
    }

    #[test]
    fn debug_hides_password() {
        let c = Credentials { qoj_username: Some(s!("alice")), qoj_password: Some(s!("hunter2")) };
        let shown = format!("{c:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("alice"));
    }
}
