use hmac::{Hmac, Mac as _};
use http::Method;
use sha2::Digest as _;
use sha2::Sha256;
use time::OffsetDateTime;
use url::Url;

use crate::{
    auth::{Credentials, Region},
    error::Error,
};

type HmacSha256 = Hmac<Sha256>;

// Query-style signing covers only the Host header.
const SIGNED_HEADERS: &str = "host";

#[derive(Clone, Copy)]
pub(crate) struct SigV4Params<'a> {
    region: &'a Region,
    service: &'a str,
    credentials: &'a Credentials,
    now: OffsetDateTime,
}

impl<'a> SigV4Params<'a> {
    pub(crate) fn new(
        region: &'a Region,
        service: &'a str,
        credentials: &'a Credentials,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            region,
            service,
            credentials,
            now,
        }
    }
}

/// Signs a query-style request, returning the complete parameter set to
/// send: the caller's parameters plus `X-Amz-Algorithm`,
/// `X-Amz-Credential`, `X-Amz-Date`, `X-Amz-SignedHeaders`, an optional
/// `X-Amz-Security-Token`, and the final `X-Amz-Signature`.
///
/// Deterministic for identical inputs and a fixed `now`.
pub(crate) fn sign_query(
    method: &Method,
    url: &Url,
    params: &[(String, String)],
    sig: SigV4Params<'_>,
) -> Result<Vec<(String, String)>, Error> {
    let amz_date = amz_datetime(sig.now);
    let credential_scope = credential_scope(sig.region, sig.service, sig.now);
    let credential = format!("{}/{}", sig.credentials.access_key_id, credential_scope);

    let mut out = params.to_vec();
    out.push((
        "X-Amz-Algorithm".to_string(),
        "AWS4-HMAC-SHA256".to_string(),
    ));
    out.push(("X-Amz-Credential".to_string(), credential));
    out.push(("X-Amz-Date".to_string(), amz_date));
    out.push(("X-Amz-SignedHeaders".to_string(), SIGNED_HEADERS.to_string()));
    if let Some(token) = &sig.credentials.session_token {
        out.push(("X-Amz-Security-Token".to_string(), token.clone()));
    }

    let canonical_query = crate::util::encode::canonical_query_string(&out);
    let canonical_headers = format!("host:{}\n", host_value(url)?);

    let canonical_request = canonical_request(
        method,
        &canonical_uri(url),
        &canonical_query,
        &canonical_headers,
        SIGNED_HEADERS,
        &payload_hash_empty(),
    );

    let string_to_sign = string_to_sign(sig.region, sig.service, sig.now, &canonical_request);
    let signature = signature(
        sig.credentials,
        sig.region,
        sig.service,
        sig.now,
        &string_to_sign,
    )?;

    out.push(("X-Amz-Signature".to_string(), signature));
    Ok(out)
}

pub(crate) fn payload_hash_empty() -> String {
    sha256_hex(b"")
}

fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn host_value(url: &Url) -> Result<String, Error> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid_config("endpoint must include host"))?;
    let default_port = match url.scheme() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };
    let host = match (url.port(), default_port) {
        (Some(port), Some(default)) if port != default => format!("{host}:{port}"),
        (Some(port), None) => format!("{host}:{port}"),
        _ => host.to_string(),
    };
    Ok(host)
}

fn canonical_request(
    method: &Method,
    canonical_uri: &str,
    canonical_query_string: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    format!(
        "{method}\n{canonical_uri}\n{canonical_query_string}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    )
}

fn string_to_sign(
    region: &Region,
    service: &str,
    now: OffsetDateTime,
    canonical_request: &str,
) -> String {
    let amz_date = amz_datetime(now);
    let scope = credential_scope(region, service, now);
    let hashed = sha256_hex(canonical_request.as_bytes());
    format!("AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{hashed}")
}

fn signature(
    credentials: &Credentials,
    region: &Region,
    service: &str,
    now: OffsetDateTime,
    string_to_sign: &str,
) -> Result<String, Error> {
    let k_date = hmac_sha256(
        format!("AWS4{}", credentials.secret_access_key).as_bytes(),
        date_stamp(now).as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_str().as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
    let sig = hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
    Ok(hex::encode(sig))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|_| Error::signing("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn date_stamp(now: OffsetDateTime) -> String {
    let year = now.year();
    let month = now.month() as u8;
    let day = now.day();
    format!("{year:04}{month:02}{day:02}")
}

fn amz_datetime(now: OffsetDateTime) -> String {
    let year = now.year();
    let month = now.month() as u8;
    let day = now.day();
    let hour = now.hour();
    let minute = now.minute();
    let second = now.second();
    format!("{year:04}{month:02}{day:02}T{hour:02}{minute:02}{second:02}Z")
}

fn credential_scope(region: &Region, service: &str, now: OffsetDateTime) -> String {
    format!(
        "{}/{}/{service}/aws4_request",
        date_stamp(now),
        region.as_str()
    )
}
