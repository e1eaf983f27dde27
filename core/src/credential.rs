use std::fmt::Debug;
use std::fmt::Formatter;

/// Access credentials for a request.
///
/// Caller owned: the library never mutates, logs, or persists them. The
/// `Debug` output is redacted so a stray log line cannot leak a secret.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token, when the credentials are temporary.
    pub session_token: Option<String>,
}

impl Credential {
    /// Create credentials from an access key pair.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: None,
        }
    }

    /// Attach a session token.
    pub fn with_session_token(mut self, session_token: &str) -> Self {
        self.session_token = Some(session_token.to_string());
        self
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field(
                "session_token",
                &self.session_token.as_deref().map(redact),
            )
            .finish()
    }
}

/// Keep the first and last three characters of long values so different
/// credentials stay distinguishable in logs; short values are hidden
/// entirely.
fn redact(value: &str) -> String {
    let length = value.len();
    if length == 0 {
        "EMPTY".to_string()
    } else if length < 12 {
        "***".to_string()
    } else {
        format!("{}***{}", &value[..3], &value[length - 3..])
    }
}
