//! Request Gate
//!
//! Decides, before any page handler runs, whether a request is served, served
//! with no-cache headers, or short-circuited with a redirect. The decision only
//! looks at the request path and whether a session cookie is present; token
//! validity is the backend's concern.

use std::{collections::BTreeSet, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::session;

/// Directives attached to every response served from a protected route.
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// The single classification output of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    RedirectToSignIn,
    RedirectToDashboard,
    PassThroughPlain,
    PassThroughNoCache,
}

/// One entry of the gate's invocation scope.
///
/// `"/dashboard/:path*"` (or `"/dashboard/**"`) covers `/dashboard` and every
/// descendant; any other string is matched exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePattern {
    Exact(String),
    Subtree(String),
}

impl ScopePattern {
    pub fn parse(raw: &str) -> Self {
        for suffix in ["/:path*", "/**"] {
            if let Some(base) = raw.strip_suffix(suffix) {
                return ScopePattern::Subtree(base.to_string());
            }
        }
        ScopePattern::Exact(raw.to_string())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            ScopePattern::Exact(exact) => path == exact,
            ScopePattern::Subtree(base) => {
                path.strip_prefix(base.as_str()).is_some_and(|rest| {
                    rest.is_empty() || rest.starts_with('/') || base.ends_with('/')
                })
            }
        }
    }
}

/// GateConfig
///
/// Static route sets handed to the gate at startup. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Prefix match: a parent path protects all of its descendants.
    pub protected_prefixes: Vec<String>,
    /// Exact match: authenticated users are sent away from these.
    pub public_exact_routes: BTreeSet<String>,
    /// Requests outside every pattern bypass the gate entirely.
    pub match_scope: Vec<ScopePattern>,
    pub sign_in_path: String,
    pub dashboard_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::with_routes(
            vec!["/dashboard".to_string()],
            ["/auth/signin", "/auth/signup", "/"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        )
    }
}

impl GateConfig {
    /// Builds a config whose scope covers exactly the given route sets: each
    /// protected prefix as a subtree, each public route as an exact path.
    pub fn with_routes(
        protected_prefixes: Vec<String>,
        public_exact_routes: BTreeSet<String>,
    ) -> Self {
        let match_scope = protected_prefixes
            .iter()
            .map(|prefix| ScopePattern::Subtree(prefix.clone()))
            .chain(public_exact_routes.iter().cloned().map(ScopePattern::Exact))
            .collect();

        Self {
            protected_prefixes,
            public_exact_routes,
            match_scope,
            sign_in_path: "/auth/signin".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

/// RequestGate
///
/// Pure, total classifier over `(path, token presence)`. Holds no mutable state,
/// so one instance is shared by every request through `GateState`.
#[derive(Debug, Clone)]
pub struct RequestGate {
    config: GateConfig,
}

/// Shared handle used as middleware state.
pub type GateState = Arc<RequestGate>;

impl RequestGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Whether the gate is invoked for `path` at all.
    pub fn in_scope(&self, path: &str) -> bool {
        self.config.match_scope.iter().any(|pattern| pattern.matches(path))
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.config
            .protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// decide
    ///
    /// Evaluation order is the tie-break policy:
    /// 1. token present and path is public-exact: `RedirectToDashboard`
    /// 2. protected without token: `RedirectToSignIn`
    /// 3. protected with token: `PassThroughNoCache`
    /// 4. anything else: `PassThroughPlain`
    ///
    /// An empty token counts as absent.
    pub fn decide(&self, path: &str, token: Option<&str>) -> GateDecision {
        let has_token = token.is_some_and(|value| !value.is_empty());

        if has_token && self.config.public_exact_routes.contains(path) {
            return GateDecision::RedirectToDashboard;
        }

        if self.is_protected(path) {
            return if has_token {
                GateDecision::PassThroughNoCache
            } else {
                GateDecision::RedirectToSignIn
            };
        }

        GateDecision::PassThroughPlain
    }
}

/// Redirect for a gated request. Reads keep `307`; form submissions get `303`
/// so the browser follows with a GET instead of replaying the POST.
fn redirect(method: &Method, target: &str) -> Response {
    if *method == Method::GET || *method == Method::HEAD {
        Redirect::temporary(target).into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

/// gate_middleware
///
/// Runs the gate in front of the router. Out-of-scope requests are forwarded
/// untouched.
pub async fn gate_middleware(
    State(gate): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !gate.in_scope(&path) {
        return next.run(request).await;
    }

    let token = session::session_token(request.headers());
    let decision = gate.decide(&path, token.as_deref());

    // Never log token material, only whether one was sent.
    tracing::debug!(
        path = %path,
        has_token = token.is_some(),
        decision = ?decision,
        "request gate evaluated"
    );

    match decision {
        GateDecision::RedirectToSignIn => {
            redirect(request.method(), &gate.config.sign_in_path)
        }
        GateDecision::RedirectToDashboard => {
            redirect(request.method(), &gate.config.dashboard_path)
        }
        GateDecision::PassThroughPlain => next.run(request).await,
        GateDecision::PassThroughNoCache => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
            response
        }
    }
}
