//! AWS Signature Version 4
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>

use std::fmt::Write;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm name
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Final element of every credential scope
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Request signer bound to one set of credentials, region and service
#[derive(Clone)]
pub(crate) struct SigV4Signer {
    access_key_id: String,
    /// ⚠️ NEVER log this value
    secret_access_key: String,
    region: String,
    service: &'static str,
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl SigV4Signer {
    pub(crate) fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        service: &'static str,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            service,
        }
    }

    /// Compute the `Authorization` header value for a request
    ///
    /// `headers` must contain every header to be signed, including `Host`
    /// and `X-Amz-Date`. `amz_date` is the `X-Amz-Date` value
    /// (`%Y%m%dT%H%M%SZ`).
    pub(crate) fn authorization(
        &self,
        method: &str,
        uri: &str,
        query: &str,
        headers: &[(String, String)],
        payload: &[u8],
        amz_date: &str,
    ) -> String {
        let date = &amz_date[..amz_date.len().min(8)];
        let canonical = canonical_request(method, uri, query, headers, payload);

        tracing::trace!("CanonicalRequest:\n{}", canonical.text);

        let string_to_sign = self.string_to_sign(&canonical.text, amz_date);
        let key = signing_key(&self.secret_access_key, date, &self.region, self.service);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={signature}",
            self.access_key_id,
            self.scope(date),
            canonical.signed_headers
        )
    }

    fn scope(&self, date: &str) -> String {
        format!("{date}/{}/{}/{SCOPE_TERMINATOR}", self.region, self.service)
    }

    /// Algorithm, request date, credential scope and the canonical request hash
    fn string_to_sign(&self, canonical_request: &str, amz_date: &str) -> String {
        let date = &amz_date[..amz_date.len().min(8)];
        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        format!(
            "{ALGORITHM}\n{amz_date}\n{}\n{hashed_canonical_request}",
            self.scope(date)
        )
    }
}

/// Canonical form of a request and the header list it covers
struct CanonicalRequest {
    text: String,
    signed_headers: String,
}

fn canonical_request(
    method: &str,
    uri: &str,
    query: &str,
    headers: &[(String, String)],
    payload: &[u8],
) -> CanonicalRequest {
    // Lowercase names, sorted, values trimmed
    let mut sorted_headers: Vec<(String, String)> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), normalize_header_value(v)))
        .collect();
    sorted_headers.sort();

    let canonical_headers = sorted_headers
        .iter()
        .fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{v}");
            acc
        });

    let signed_headers = sorted_headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_query = if query.is_empty() {
        String::new()
    } else {
        let mut params: Vec<&str> = query.split('&').collect();
        params.sort_unstable();
        params.join("&")
    };

    let canonical_uri = if uri.is_empty() { "/" } else { uri };
    let hashed_payload = hex::encode(Sha256::digest(payload));

    CanonicalRequest {
        text: format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
        ),
        signed_headers,
    }
}

/// Derive the signing key for a date (`YYYYMMDD`), region and service
pub(crate) fn signing_key(secret_access_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_access_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Trim and collapse runs of spaces
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
