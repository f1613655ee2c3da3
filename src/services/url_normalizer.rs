//! URL normalization for bookmark comparison.
//!
//! Pure string-level canonicalization: no network access, and malformed
//! input normalizes on a best-effort basis instead of failing.

/// Canonicalizes a URL for comparison.
///
/// Folds case, strips the fragment, strips the default port for the
/// scheme (80 for http, 443 for https), and strips a single trailing
/// slash unless the whole input is the bare root path "/". Scheme, host,
/// path, and query are otherwise left untouched; two URLs with different
/// schemes never normalize equal.
pub fn normalize(url: &str) -> String {
    let mut url = url.trim().to_lowercase();

    if let Some(pos) = url.find('#') {
        url.truncate(pos);
    }

    if let Some(scheme_end) = url.find("://") {
        let scheme = url[..scheme_end].to_string();
        let auth_start = scheme_end + 3;
        let auth_end = url[auth_start..]
            .find(['/', '?'])
            .map(|i| auth_start + i)
            .unwrap_or(url.len());
        let default_port = match scheme.as_str() {
            "http" => ":80",
            "https" => ":443",
            _ => "",
        };
        if !default_port.is_empty() && url[auth_start..auth_end].ends_with(default_port) {
            url.replace_range(auth_end - default_port.len()..auth_end, "");
        }
    }

    if url.len() > 1 && url.ends_with('/') {
        url.pop();
    }

    url
}

/// Checks whether two URLs are fuzzy-similar.
///
/// Similar means the normalized forms differ only in scheme (http vs
/// https), a leading "www." on the host, or query-string content. URLs
/// that differ in path are never similar.
pub fn urls_are_similar(url_a: &str, url_b: &str) -> bool {
    let norm_a = normalize(url_a);
    let norm_b = normalize(url_b);

    if norm_a == norm_b {
        return true;
    }

    let parts_a = split_url(&norm_a);
    let parts_b = split_url(&norm_b);

    let schemes_compatible = parts_a.scheme == parts_b.scheme
        || (is_web_scheme(parts_a.scheme) && is_web_scheme(parts_b.scheme));
    if !schemes_compatible {
        return false;
    }

    if strip_www(parts_a.authority) != strip_www(parts_b.authority) {
        return false;
    }

    // Query differences are acceptable; path differences are not.
    parts_a.path.trim_end_matches('/') == parts_b.path.trim_end_matches('/')
}

struct UrlParts<'a> {
    scheme: &'a str,
    authority: &'a str,
    path: &'a str,
}

/// Best-effort split of an already-normalized URL.
fn split_url(url: &str) -> UrlParts<'_> {
    let (scheme, rest) = match url.find("://") {
        Some(i) => (&url[..i], &url[i + 3..]),
        None => ("", url),
    };
    let before_query = match rest.find('?') {
        Some(i) => &rest[..i],
        None => rest,
    };
    let (authority, path) = match before_query.find('/') {
        Some(i) => (&before_query[..i], &before_query[i..]),
        None => (before_query, ""),
    };
    UrlParts {
        scheme,
        authority,
        path,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn is_web_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}
