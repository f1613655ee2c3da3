//! Property-based tests for URL normalization.
//!
//! Normalization must be idempotent and similarity symmetric, for
//! arbitrary generated URLs.

use marksync::services::url_normalizer::{normalize, urls_are_similar};
use proptest::prelude::*;

/// Strategy for URL strings covering the features normalization touches:
/// mixed case, optional www, optional default or explicit port, optional
/// path with trailing slash, optional query and fragment.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https"), Just("HTTP"), Just("HTTPS")],
        proptest::bool::ANY,
        "[a-zA-Z][a-zA-Z0-9]{2,12}",
        prop_oneof![Just(""), Just(":80"), Just(":443"), Just(":8080")],
        proptest::option::of("/[a-zA-Z0-9]{1,8}(/[a-zA-Z0-9]{1,8}){0,2}"),
        proptest::bool::ANY,
        proptest::option::of("\\?[a-z]{1,6}=[a-z0-9]{1,6}"),
        proptest::option::of("#[a-z0-9]{1,8}"),
    )
        .prop_map(
            |(scheme, www, host, port, path, trailing_slash, query, fragment)| {
                let mut url = format!(
                    "{}://{}{}.example.com{}{}",
                    scheme,
                    if www { "www." } else { "" },
                    host,
                    port,
                    path.unwrap_or_default(),
                );
                if trailing_slash {
                    url.push('/');
                }
                if let Some(q) = query {
                    url.push_str(&q);
                }
                if let Some(f) = fragment {
                    url.push_str(&f);
                }
                url
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Normalizing an already-normalized URL changes nothing.
    #[test]
    fn normalize_is_idempotent(url in arb_url()) {
        let once = normalize(&url);
        prop_assert_eq!(normalize(&once), once);
    }

    /// The normalized form never contains a fragment and is all
    /// lowercase.
    #[test]
    fn normalized_form_is_canonical(url in arb_url()) {
        let norm = normalize(&url);
        prop_assert!(!norm.contains('#'));
        prop_assert_eq!(norm.to_lowercase(), norm.clone());
        // No trailing slash except for the bare root.
        prop_assert!(norm == "/" || !norm.ends_with('/'));
    }

    /// Every URL is similar to itself.
    #[test]
    fn similarity_is_reflexive(url in arb_url()) {
        prop_assert!(urls_are_similar(&url, &url));
    }

    /// Similarity does not depend on argument order.
    #[test]
    fn similarity_is_symmetric(a in arb_url(), b in arb_url()) {
        prop_assert_eq!(urls_are_similar(&a, &b), urls_are_similar(&b, &a));
    }

    /// Equal normalized forms imply similarity.
    #[test]
    fn normalized_equality_implies_similarity(a in arb_url(), b in arb_url()) {
        if normalize(&a) == normalize(&b) {
            prop_assert!(urls_are_similar(&a, &b));
        }
    }
}
