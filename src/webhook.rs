//! Validation of asynchronous payment-status callbacks.
//!
//! The gateway reports payment status by calling back with `checkout-`
//! prefixed query parameters plus a `signature`. Callbacks are
//! authenticated with the same canonical HMAC as responses, over the
//! parameters alone (no body). Callers must not act on a callback's payload
//! before [`CallbackValidator::validate_signature`] returns true.

use crate::{
    config::MerchantCredentials,
    signature::{HmacAlgorithm, SIGNED_PARAM_PREFIX, validate_hmac},
};

/// Validates gateway callbacks against the merchant's shared secret.
#[derive(Debug, Clone)]
pub struct CallbackValidator {
    credentials: MerchantCredentials,
}

impl CallbackValidator {
    /// Creates a validator for the given merchant.
    #[must_use]
    pub fn new(credentials: MerchantCredentials) -> Self {
        Self { credentials }
    }

    /// The gateway-namespaced parameter keys present in `params`.
    #[must_use]
    pub fn validation_params<'a>(&self, params: &'a [(String, String)]) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(key, _)| key.starts_with(SIGNED_PARAM_PREFIX))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// True iff at least one parameter key carries the gateway prefix.
    #[must_use]
    pub fn has_validation_params(&self, params: &[(String, String)]) -> bool {
        !self.validation_params(params).is_empty()
    }

    /// Verifies the callback signature over the full parameter set.
    ///
    /// Uses `params["signature"]` and `params["checkout-algorithm"]`; the
    /// body is the empty string since callbacks are query-parameter based.
    /// A missing signature, a missing or unknown algorithm, or a digest that
    /// does not verify all yield false.
    #[must_use]
    pub fn validate_signature(&self, params: &[(String, String)]) -> bool {
        let Some(signature) = param(params, "signature") else {
            return false;
        };
        let Some(algorithm) = param(params, "checkout-algorithm").and_then(HmacAlgorithm::parse)
        else {
            return false;
        };

        validate_hmac(&self.credentials.shared_secret, algorithm, params, "", signature)
    }
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::calculate_hmac;

    fn validator() -> CallbackValidator {
        CallbackValidator::new(MerchantCredentials::new("375917", "SAIPPUAKAUPPIAS"))
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    /// A callback signed the way the gateway signs them.
    fn signed_callback() -> Vec<(String, String)> {
        let mut callback = params(&[
            ("checkout-account", "375917"),
            ("checkout-algorithm", "sha256"),
            ("checkout-amount", "2500"),
            ("checkout-stamp", "29858472953"),
            ("checkout-reference", "9187445"),
            ("checkout-status", "ok"),
        ]);
        let signature = calculate_hmac("SAIPPUAKAUPPIAS", HmacAlgorithm::Sha256, &callback, "");
        callback.push(("signature".to_owned(), signature));
        callback
    }

    #[test]
    fn test_has_validation_params() {
        let validator = validator();
        assert!(!validator.has_validation_params(&[]));
        assert!(validator.has_validation_params(&params(&[("checkout-x", "1")])));
        assert!(!validator.has_validation_params(&params(&[("foo", "1")])));
    }

    #[test]
    fn test_validation_params_filters_keys() {
        let validator = validator();
        let p = params(&[
            ("checkout-account", "375917"),
            ("signature", "abc"),
            ("utm_source", "mail"),
        ]);
        let keys = validator.validation_params(&p);
        assert_eq!(keys, vec!["checkout-account"]);
    }

    #[test]
    fn test_validate_signature_authentic_callback() {
        assert!(validator().validate_signature(&signed_callback()));
    }

    #[test]
    fn test_validate_signature_tampered_status() {
        let mut callback = signed_callback();
        for (key, value) in &mut callback {
            if key == "checkout-status" {
                *value = "fail".to_owned();
            }
        }
        assert!(!validator().validate_signature(&callback));
    }

    #[test]
    fn test_validate_signature_missing_signature() {
        let mut callback = signed_callback();
        callback.retain(|(key, _)| key != "signature");
        assert!(!validator().validate_signature(&callback));
    }

    #[test]
    fn test_validate_signature_missing_algorithm() {
        let mut callback = signed_callback();
        callback.retain(|(key, _)| key != "checkout-algorithm");
        assert!(!validator().validate_signature(&callback));
    }

    #[test]
    fn test_validate_signature_unknown_algorithm() {
        let mut callback = signed_callback();
        for (key, value) in &mut callback {
            if key == "checkout-algorithm" {
                *value = "md5".to_owned();
            }
        }
        assert!(!validator().validate_signature(&callback));
    }

    #[test]
    fn test_validate_signature_extra_unprefixed_params_ignored() {
        // Tracking parameters appended by the shop framework must not break
        // validation.
        let mut callback = signed_callback();
        callback.push(("utm_source".to_owned(), "mail".to_owned()));
        assert!(validator().validate_signature(&callback));
    }

    #[test]
    fn test_validate_signature_wrong_secret() {
        let validator =
            CallbackValidator::new(MerchantCredentials::new("375917", "WRONG-SECRET"));
        assert!(!validator.validate_signature(&signed_callback()));
    }
}
