/// Router Module Index
///
/// Splits the page routes by who is meant to reach them. Access control itself
/// is not applied here: the request gate runs in front of the whole router and
/// redirects by path and cookie presence before any of these handlers execute.

/// Landing, sign-in/sign-up, logout and health. Reachable without a session.
pub mod public;

/// Everything under `/dashboard`. The gate only lets requests carrying a session
/// cookie through; the backend still decides whether that session is valid.
pub mod authenticated;
