//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Builds the `Authorization` header for a request from the four credential
//! values. Query parameters of the URL and any form parameters are part of
//! the signature base string.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use url::Url;

use crate::credentials::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is; everything else is encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Per-request values that make a signature unique.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub nonce: String,
    pub timestamp: u64,
}

impl Nonce {
    pub fn generate() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp,
        }
    }
}

/// Builds the `Authorization` header value for a request.
///
/// # Errors
/// Returns an error if the signing key is rejected by the MAC.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &Url,
    form: &[(&str, &str)],
    nonce: &Nonce,
) -> Result<String> {
    let mut oauth = oauth_params(credentials, nonce);
    let base = signature_base_string(method, url, form, &oauth);
    let signature = sign(credentials, &base)?;
    oauth.push(("oauth_signature".to_string(), signature));
    oauth.sort();

    let fields: Vec<String> = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}

fn oauth_params(credentials: &Credentials, nonce: &Nonce) -> Vec<(String, String)> {
    vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce.nonce.clone()),
        (
            "oauth_signature_method".to_string(),
            SIGNATURE_METHOD.to_string(),
        ),
        ("oauth_timestamp".to_string(), nonce.timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
    ]
}

/// `METHOD&enc(base url)&enc(sorted, encoded params)`.
pub fn signature_base_string(
    method: &str,
    url: &Url,
    form: &[(&str, &str)],
    oauth: &[(String, String)],
) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(form.iter().map(|(k, v)| (encode(k), encode(v))))
        .chain(oauth.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    params.sort();

    let param_string = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url.as_str()),
        encode(&param_string)
    )
}

fn sign(credentials: &Credentials, base: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|err| anyhow!("Invalid signing key: {err}"))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the platform's request signing documentation.
    fn doc_credentials() -> Credentials {
        Credentials {
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
        }
    }

    fn doc_nonce() -> Nonce {
        Nonce {
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string(),
            timestamp: 1_318_622_958,
        }
    }

    const DOC_FORM: &[(&str, &str)] = &[("status", "Hello Ladies + Gentlemen, a signed OAuth request!")];

    fn doc_url() -> Url {
        Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true").unwrap()
    }

    #[test]
    fn test_signature_base_string_matches_reference() {
        let oauth = oauth_params(&doc_credentials(), &doc_nonce());
        let base = signature_base_string("post", &doc_url(), DOC_FORM, &oauth);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen\
             %252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn test_signature_matches_reference() {
        let oauth = oauth_params(&doc_credentials(), &doc_nonce());
        let base = signature_base_string("POST", &doc_url(), DOC_FORM, &oauth);

        assert_eq!(
            sign(&doc_credentials(), &base).unwrap(),
            "hCtSmYh+iHYCEqBWrE7C7hYmtUk="
        );
    }

    #[test]
    fn test_authorization_header_shape() {
        let header =
            authorization_header(&doc_credentials(), "POST", &doc_url(), DOC_FORM, &doc_nonce())
                .unwrap();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.ends_with("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_generated_nonce_is_alphanumeric() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.nonce.len(), 32);
        assert!(nonce.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(nonce.timestamp > 0);
    }
}
