//! API credentials read from the process environment.

use std::fmt;

pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
pub const CONSUMER_KEY_ENV: &str = "CONSUMER_KEY";
pub const CONSUMER_SECRET_ENV: &str = "CONSUMER_SECRET_KEY";

/// The four values needed to sign API requests.
///
/// Missing variables become empty strings; the API rejects the request and
/// that rejection is what the user sees.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub access_token_secret: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let credentials = Self {
            access_token: get(ACCESS_TOKEN_ENV),
            access_token_secret: get(ACCESS_TOKEN_SECRET_ENV),
            consumer_key: get(CONSUMER_KEY_ENV),
            consumer_secret: get(CONSUMER_SECRET_ENV),
        };

        for name in credentials.missing() {
            tracing::warn!("{name} is not set; requests will be rejected");
        }
        credentials
    }

    /// Names of the environment variables that were empty or unset.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ACCESS_TOKEN_ENV, &self.access_token),
            (ACCESS_TOKEN_SECRET_ENV, &self.access_token_secret),
            (CONSUMER_KEY_ENV, &self.consumer_key),
            (CONSUMER_SECRET_ENV, &self.consumer_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("access_token_secret", &redact(&self.access_token_secret))
            .field("consumer_key", &redact(&self.consumer_key))
            .field("consumer_secret", &redact(&self.consumer_secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_from_lookup_reads_all_four() {
        let vars: HashMap<&str, &str> = [
            (ACCESS_TOKEN_ENV, "token"),
            (ACCESS_TOKEN_SECRET_ENV, "token-secret"),
            (CONSUMER_KEY_ENV, " key "),
            (CONSUMER_SECRET_ENV, "secret"),
        ]
        .into_iter()
        .collect();

        let creds = Credentials::from_lookup(|name| vars.get(name).map(ToString::to_string));

        assert_eq!(creds.access_token, "token");
        assert_eq!(creds.consumer_key, "key");
        assert!(creds.missing().is_empty());
    }

    #[test]
    fn test_missing_lists_unset_names() {
        let creds = Credentials::from_lookup(|name| {
            (name == CONSUMER_KEY_ENV).then(|| "key".to_string())
        });

        assert_eq!(
            creds.missing(),
            vec![ACCESS_TOKEN_ENV, ACCESS_TOKEN_SECRET_ENV, CONSUMER_SECRET_ENV]
        );
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let creds = Credentials {
            access_token: "very-secret".to_string(),
            ..Credentials::default()
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<unset>"));
    }
}
