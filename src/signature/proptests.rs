use proptest::prelude::*;

use super::{HmacAlgorithm, calculate_hmac, hmac_payload, validate_hmac};

fn arb_params() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        ("(checkout-)?[a-z][a-z0-9-]{0,24}", "[ -~]{0,32}"),
        0..8,
    )
    .prop_map(|pairs| {
        let mut seen = std::collections::HashSet::new();
        pairs.into_iter().filter(|(k, _)| seen.insert(k.clone())).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_sign_verify_roundtrip(
        secret in "[ -~]{1,64}",
        params in arb_params(),
        body in "[ -~]{0,256}",
    ) {
        for algorithm in [HmacAlgorithm::Sha256, HmacAlgorithm::Sha512] {
            let signature = calculate_hmac(&secret, algorithm, &params, &body);
            prop_assert!(validate_hmac(&secret, algorithm, &params, &body, &signature));
        }
    }

    #[test]
    fn test_tampered_body_rejected(
        secret in "[ -~]{1,64}",
        params in arb_params(),
        body in "[ -~]{1,256}",
    ) {
        let signature = calculate_hmac(&secret, HmacAlgorithm::Sha256, &params, &body);
        let tampered = format!("{body}!");
        prop_assert!(!validate_hmac(&secret, HmacAlgorithm::Sha256, &params, &tampered, &signature));
    }

    #[test]
    fn test_payload_order_independent(
        params in arb_params(),
        body in "[ -~]{0,64}",
    ) {
        // The canonical form must not depend on parameter insertion order.
        let mut reversed = params.clone();
        reversed.reverse();
        prop_assert_eq!(hmac_payload(&params, &body), hmac_payload(&reversed, &body));
    }

    #[test]
    fn test_payload_ignores_unprefixed(
        params in arb_params(),
        body in "[ -~]{0,64}",
        noise_key in "[a-bd-z][a-z0-9]{0,16}",
        noise_value in "[ -~]{0,32}",
    ) {
        let mut noisy = params.clone();
        noisy.push((noise_key, noise_value));
        prop_assert_eq!(hmac_payload(&params, &body), hmac_payload(&noisy, &body));
    }
}
