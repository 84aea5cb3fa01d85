//! HMAC canonicalization shared by request signing, response verification,
//! and callback validation.
//!
//! The gateway signs the `checkout-`-prefixed parameters of a message (HTTP
//! headers or query parameters) together with its raw body. Both directions
//! use the same canonical form:
//!
//! 1. keep only keys with the exact, case-sensitive prefix `checkout-`
//! 2. sort the kept keys by ordinal comparison, ascending
//! 3. one `key:value` line per kept key, in sorted order
//! 4. the raw body string as the final line (empty string when bodyless)
//! 5. join with `\n`, HMAC with the shared secret, lowercase hex digest
//!
//! Verification is constant-time: the provided hex signature is decoded and
//! checked with [`Mac::verify_slice`] rather than compared as strings.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Exact, case-sensitive prefix of the parameters covered by a signature.
pub const SIGNED_PARAM_PREFIX: &str = "checkout-";

/// HMAC algorithm negotiated via the `checkout-algorithm` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HmacAlgorithm {
    /// HMAC-SHA256, the gateway default.
    #[default]
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl HmacAlgorithm {
    /// Parses the gateway's lowercase algorithm name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// The gateway's name for this algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the canonical signing string from parameters and body.
///
/// `pub(crate)` so tests can assert on the exact canonical form without
/// going through a digest.
pub(crate) fn hmac_payload(params: &[(String, String)], body: &str) -> String {
    let mut signed: Vec<&(String, String)> =
        params.iter().filter(|(key, _)| key.starts_with(SIGNED_PARAM_PREFIX)).collect();
    signed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut lines: Vec<String> =
        signed.iter().map(|(key, value)| format!("{key}:{value}")).collect();
    lines.push(body.to_owned());
    lines.join("\n")
}

/// Computes the signature over `params` + `body` as a lowercase hex digest.
///
/// Only `checkout-`-prefixed keys of `params` participate; everything else
/// is ignored. `body` is the raw transmitted string — sign exactly what goes
/// on the wire.
#[must_use]
pub fn calculate_hmac(
    secret: &str,
    algorithm: HmacAlgorithm,
    params: &[(String, String)],
    body: &str,
) -> String {
    let payload = hmac_payload(params, body);
    match algorithm {
        HmacAlgorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(payload.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
        HmacAlgorithm::Sha512 => {
            let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(payload.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
    }
}

/// Verifies a hex signature over `params` + `body` in constant time.
///
/// Returns false for a wrong digest, malformed hex, or a digest of the wrong
/// length — verification never panics and never leaks how far the comparison
/// got.
#[must_use]
pub fn validate_hmac(
    secret: &str,
    algorithm: HmacAlgorithm,
    params: &[(String, String)],
    body: &str,
    signature: &str,
) -> bool {
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };

    let payload = hmac_payload(params, body);
    match algorithm {
        HmacAlgorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(payload.as_bytes());
            mac.verify_slice(&signature_bytes).is_ok()
        }
        HmacAlgorithm::Sha512 => {
            let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(payload.as_bytes());
            mac.verify_slice(&signature_bytes).is_ok()
        }
    }
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn test_payload_filters_and_sorts() {
        let params = params(&[("checkout-b", "2"), ("checkout-a", "1"), ("other", "x")]);
        assert_eq!(hmac_payload(&params, "payload"), "checkout-a:1\ncheckout-b:2\npayload");
    }

    #[test]
    fn test_payload_empty_params() {
        assert_eq!(hmac_payload(&[], "body"), "body");
        assert_eq!(hmac_payload(&[], ""), "");
    }

    #[test]
    fn test_payload_prefix_is_case_sensitive() {
        let params = params(&[("Checkout-account", "123"), ("checkout-account", "456")]);
        assert_eq!(hmac_payload(&params, ""), "checkout-account:456\n");
    }

    #[test]
    fn test_payload_bodyless_ends_with_empty_line() {
        let params = params(&[("checkout-nonce", "abc")]);
        assert_eq!(hmac_payload(&params, ""), "checkout-nonce:abc\n");
    }

    #[test]
    fn test_calculate_hmac_matches_direct_computation() {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let params = params(&[("checkout-a", "1"), ("checkout-b", "2")]);
        let digest = calculate_hmac("secret", HmacAlgorithm::Sha256, &params, "payload");

        let mut mac = Hmac::<Sha256>::new_from_slice(b"secret").unwrap();
        mac.update(b"checkout-a:1\ncheckout-b:2\npayload");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(digest, expected);
    }

    #[test]
    fn test_calculate_hmac_is_lowercase_hex() {
        let digest = calculate_hmac("secret", HmacAlgorithm::Sha256, &[], "body");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let digest = calculate_hmac("secret", HmacAlgorithm::Sha512, &[], "body");
        assert_eq!(digest.len(), 128);
    }

    #[test]
    fn test_roundtrip() {
        let params = params(&[("checkout-account", "375917"), ("checkout-nonce", "order-1")]);
        let signature = calculate_hmac("secret", HmacAlgorithm::Sha256, &params, "{}");
        assert!(validate_hmac("secret", HmacAlgorithm::Sha256, &params, "{}", &signature));
    }

    #[test]
    fn test_validate_rejects_tampered_body() {
        let params = params(&[("checkout-account", "375917")]);
        let signature = calculate_hmac("secret", HmacAlgorithm::Sha256, &params, "amount=100");
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha256, &params, "amount=900", &signature));
    }

    #[test]
    fn test_validate_rejects_tampered_param() {
        let original = params(&[("checkout-account", "375917")]);
        let tampered = params(&[("checkout-account", "375918")]);
        let signature = calculate_hmac("secret", HmacAlgorithm::Sha256, &original, "");
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha256, &tampered, "", &signature));
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let params = params(&[("checkout-account", "375917")]);
        let signature = calculate_hmac("secret", HmacAlgorithm::Sha256, &params, "");
        assert!(!validate_hmac("other", HmacAlgorithm::Sha256, &params, "", &signature));
    }

    #[test]
    fn test_validate_rejects_malformed_signature() {
        let params = params(&[("checkout-account", "375917")]);
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha256, &params, "", "not-hex"));
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha256, &params, "", ""));
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha256, &params, "", "abcd"));
    }

    #[test]
    fn test_validate_rejects_wrong_algorithm() {
        let params = params(&[("checkout-account", "375917")]);
        let signature = calculate_hmac("secret", HmacAlgorithm::Sha256, &params, "");
        assert!(!validate_hmac("secret", HmacAlgorithm::Sha512, &params, "", &signature));
    }

    #[test]
    fn test_non_checkout_params_do_not_affect_signature() {
        let bare = params(&[("checkout-account", "375917")]);
        let noisy = params(&[("checkout-account", "375917"), ("user-agent", "curl/8.0")]);
        assert_eq!(
            calculate_hmac("secret", HmacAlgorithm::Sha256, &bare, ""),
            calculate_hmac("secret", HmacAlgorithm::Sha256, &noisy, ""),
        );
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!(HmacAlgorithm::parse("sha256"), Some(HmacAlgorithm::Sha256));
        assert_eq!(HmacAlgorithm::parse("sha512"), Some(HmacAlgorithm::Sha512));
        assert_eq!(HmacAlgorithm::parse("SHA256"), None);
        assert_eq!(HmacAlgorithm::parse("md5"), None);
        assert_eq!(HmacAlgorithm::parse(""), None);
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(HmacAlgorithm::Sha256.to_string(), "sha256");
        assert_eq!(HmacAlgorithm::Sha512.to_string(), "sha512");
        assert_eq!(HmacAlgorithm::default(), HmacAlgorithm::Sha256);
    }
}
