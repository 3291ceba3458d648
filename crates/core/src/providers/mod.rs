pub mod registry;
pub mod traits;

// Venue backends
pub mod finnhub;
pub mod stooq;

/// Strip query parameters from a reqwest error message so credentials
/// embedded in URLs never reach logs or failure reasons.
pub(crate) fn sanitize_error(e: &reqwest::Error) -> String {
    let msg = e.to_string();
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg,
    }
}
