//! User, identity, and public view types.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Stable handle for a user inside the identity store.
///
/// Users are never removed while the server runs, so a handle stays valid
/// for the lifetime of the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub usize);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How callers prove who they are. One mode per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Callers present the bearer token issued at registration.
    Token,
    /// The caller's network address is the identity.
    ///
    /// Callers sharing an address (NAT) share a single user.
    Address,
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityMode::Token => write!(f, "token"),
            IdentityMode::Address => write!(f, "address"),
        }
    }
}

impl FromStr for IdentityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(IdentityMode::Token),
            "address" => Ok(IdentityMode::Address),
            other => Err(format!("invalid identity mode: '{other}'")),
        }
    }
}

impl Default for IdentityMode {
    fn default() -> Self {
        IdentityMode::Token
    }
}

/// Key used to look a caller up in the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Token(String),
    Address(String),
}

/// A registered chat participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Network address recorded at registration.
    pub address: String,
    pub nickname: String,
    /// Bearer credential. Immutable once issued.
    pub token: String,
    /// Absolute number of messages already delivered to this user.
    pub cursor: u64,
}

impl User {
    /// Public rendering of this user, with the token nulled when `redact`.
    pub fn view(&self, redact: bool) -> UserView {
        UserView {
            nickname: self.nickname.clone(),
            token: if redact { None } else { Some(self.token.clone()) },
        }
    }
}

/// What other callers see of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub nickname: String,
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: UserId(0),
            address: "127.0.0.1".to_string(),
            nickname: "abc12XYZ".to_string(),
            token: "T1".to_string(),
            cursor: 0,
        }
    }

    #[test]
    fn test_identity_mode_roundtrip() {
        for mode in [IdentityMode::Token, IdentityMode::Address] {
            let parsed: IdentityMode = mode.to_string().parse().unwrap();
            assert_eq!(mode, parsed);
        }
        assert!("cookie".parse::<IdentityMode>().is_err());
    }

    #[test]
    fn test_identity_mode_serde() {
        let json = serde_json::to_string(&IdentityMode::Address).unwrap();
        assert_eq!(json, "\"address\"");
        assert_eq!(IdentityMode::default(), IdentityMode::Token);
    }

    #[test]
    fn test_redacted_view_has_no_token() {
        let user = test_user();
        let view = user.view(true);
        assert_eq!(view.nickname, "abc12XYZ");
        assert!(view.token.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["token"].is_null());
        assert!(json.get("address").is_none());
    }

    #[test]
    fn test_unredacted_view_keeps_token() {
        let view = test_user().view(false);
        assert_eq!(view.token.as_deref(), Some("T1"));
    }
}
