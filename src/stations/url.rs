//! Stream URL normalization.

use url::Url;

/// Validate a submitted stream URL and return its normalized absolute form.
///
/// Input without a scheme is treated as `http://`. An explicit scheme other
/// than `http`/`https` is rejected, as is anything without a host.
pub fn normalize_stream_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = match leading_scheme(input) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            input.to_string()
        }
        Some(_) => return None,
        None => format!("http://{}", input),
    };

    let parsed = Url::parse(&candidate).ok()?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed.into()),
        _ => None,
    }
}

/// Scheme token at the very start of `input` (`[A-Za-z][A-Za-z0-9+.-]*://`)
fn leading_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
