//! AWS Signature Version 4 for form-encoded POST requests.

use crate::error::{CloudProviderError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Access key pair plus optional session token.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub session_token: Option<&'a str>,
}

/// Where the request goes and what it carries.
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    /// `host[:port]` exactly as sent in the `Host` header
    pub host: &'a str,
    /// Request path, `/` unless the endpoint was overridden with a prefix
    pub path: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    pub content_type: &'a str,
    pub payload: &'a str,
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub authorization: String,
    pub security_token: Option<String>,
}

/// Sign a `POST` request with no query string.
pub fn sign_post(
    credentials: &Credentials<'_>,
    target: &RequestTarget<'_>,
    now: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    // Step 1: Build canonical request (headers sorted by lowercase name)
    let mut canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-amz-date:{}\n",
        target.content_type, target.host, amz_date
    );
    let mut signed_headers = String::from("content-type;host;x-amz-date");
    if let Some(token) = credentials.session_token {
        canonical_headers.push_str(&format!("x-amz-security-token:{token}\n"));
        signed_headers.push_str(";x-amz-security-token");
    }

    let hashed_payload = format!("{:x}", Sha256::digest(target.payload.as_bytes()));
    let canonical_request = format!(
        "POST\n{}\n\n{}\n{}\n{}",
        target.path, canonical_headers, signed_headers, hashed_payload
    );
    let hashed_canonical_request = format!("{:x}", Sha256::digest(canonical_request.as_bytes()));

    // Step 2: Build string to sign
    let credential_scope = format!(
        "{}/{}/{}/aws4_request",
        date, target.region, target.service
    );
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM, amz_date, credential_scope, hashed_canonical_request
    );

    // Step 3: Calculate signature
    let key = signing_key(
        credentials.secret_access_key,
        &date,
        target.region,
        target.service,
    )?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    // Step 4: Build authorization header
    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.access_key_id, credential_scope, signed_headers, signature
    );

    Ok(SignedHeaders {
        amz_date,
        authorization,
        security_token: credentials.session_token.map(str::to_string),
    })
}

/// Derive the per-day, per-region, per-service signing key.
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let secret_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let secret_region = hmac_sha256(&secret_date, region.as_bytes())?;
    let secret_service = hmac_sha256(&secret_region, service.as_bytes())?;
    hmac_sha256(&secret_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CloudProviderError::HmacError(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
