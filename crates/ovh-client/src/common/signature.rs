//! OVH request signatures
//!
//! Every authenticated call carries `X-Ovh-Signature`, computed as
//! `"$1$" + hex(sha1(secret + "+" + consumer_key + "+" + METHOD + "+" + url + "+" + body + "+" + timestamp))`.

use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of `input`
pub fn sha1_hex(input: &str) -> String {
    Sha1::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Compute the `X-Ovh-Signature` header value
///
/// `url` must be the exact URL sent (including any query string) and `body`
/// the exact body bytes sent, empty when there is none.
pub fn sign_request(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let payload = format!(
        "{}+{}+{}+{}+{}+{}",
        application_secret, consumer_key, method, url, body, timestamp
    );
    format!("$1${}", sha1_hex(&payload))
}
