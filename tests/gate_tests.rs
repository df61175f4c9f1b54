use post_portal::gate::{GateConfig, GateDecision, RequestGate, ScopePattern};

fn default_gate() -> RequestGate {
    RequestGate::new(GateConfig::default())
}

// --- Scenarios ---

#[test]
fn test_protected_path_without_token_redirects_to_sign_in() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/dashboard/myposts", None),
        GateDecision::RedirectToSignIn
    );
}

#[test]
fn test_protected_path_with_token_passes_without_cache() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/dashboard/myposts", Some("abc123")),
        GateDecision::PassThroughNoCache
    );
}

#[test]
fn test_sign_in_with_token_redirects_to_dashboard() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/auth/signin", Some("abc123")),
        GateDecision::RedirectToDashboard
    );
}

#[test]
fn test_sign_in_without_token_passes() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/auth/signin", None),
        GateDecision::PassThroughPlain
    );
}

#[test]
fn test_root_with_token_redirects_to_dashboard() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/", Some("abc123")),
        GateDecision::RedirectToDashboard
    );
}

#[test]
fn test_unmatched_route_passes() {
    let gate = default_gate();
    assert_eq!(gate.decide("/about", None), GateDecision::PassThroughPlain);
}

// --- Properties ---

#[test]
fn test_every_protected_descendant_requires_token() {
    let gate = default_gate();
    for path in [
        "/dashboard",
        "/dashboard/posts",
        "/dashboard/myposts/42/edit",
        "/dashboard/myposts/create-post",
    ] {
        assert_eq!(
            gate.decide(path, None),
            GateDecision::RedirectToSignIn,
            "{path} without token"
        );
        assert_eq!(
            gate.decide(path, Some("t")),
            GateDecision::PassThroughNoCache,
            "{path} with token"
        );
    }
}

#[test]
fn test_unclassified_paths_ignore_token() {
    let gate = default_gate();
    for path in ["/about", "/auth", "/auth/signin/extra", "/posts", "/api/auth/logout"] {
        assert_eq!(gate.decide(path, None), GateDecision::PassThroughPlain);
        assert_eq!(gate.decide(path, Some("t")), GateDecision::PassThroughPlain);
    }
}

#[test]
fn test_public_routes_without_token_pass() {
    let gate = default_gate();
    for path in ["/auth/signin", "/auth/signup", "/"] {
        assert_eq!(gate.decide(path, None), GateDecision::PassThroughPlain);
    }
}

#[test]
fn test_empty_token_counts_as_absent() {
    let gate = default_gate();
    assert_eq!(
        gate.decide("/dashboard", Some("")),
        GateDecision::RedirectToSignIn
    );
    assert_eq!(
        gate.decide("/auth/signin", Some("")),
        GateDecision::PassThroughPlain
    );
}

#[test]
fn test_prefix_match_is_plain_string_prefix() {
    // Prefix, not path-segment, matching: "/dashboardx" is protected too.
    let gate = default_gate();
    assert_eq!(
        gate.decide("/dashboardx", None),
        GateDecision::RedirectToSignIn
    );
}

#[test]
fn test_public_route_wins_over_protection() {
    let config = GateConfig {
        protected_prefixes: vec!["/auth".to_string()],
        ..GateConfig::default()
    };
    let gate = RequestGate::new(config);

    assert_eq!(
        gate.decide("/auth/signin", Some("t")),
        GateDecision::RedirectToDashboard
    );
    // Without a token the protection rule applies.
    assert_eq!(
        gate.decide("/auth/signin", None),
        GateDecision::RedirectToSignIn
    );
}

#[test]
fn test_decisions_are_idempotent() {
    let gate = default_gate();
    let paths = ["/", "/about", "/auth/signin", "/auth/signup", "/dashboard", "/dashboard/posts/1"];
    for path in paths {
        for token in [None, Some("abc123")] {
            assert_eq!(gate.decide(path, token), gate.decide(path, token));
        }
    }
}

#[test]
fn test_custom_route_sets() {
    let config = GateConfig {
        protected_prefixes: vec!["/admin".to_string(), "/settings".to_string()],
        public_exact_routes: ["/login".to_string()].into_iter().collect(),
        ..GateConfig::default()
    };
    let gate = RequestGate::new(config);

    assert_eq!(gate.decide("/settings/profile", None), GateDecision::RedirectToSignIn);
    assert_eq!(gate.decide("/admin", Some("t")), GateDecision::PassThroughNoCache);
    assert_eq!(gate.decide("/login", Some("t")), GateDecision::RedirectToDashboard);
    assert_eq!(gate.decide("/dashboard", None), GateDecision::PassThroughPlain);
}

// --- Scope ---

#[test]
fn test_scope_pattern_parsing() {
    assert_eq!(
        ScopePattern::parse("/dashboard/:path*"),
        ScopePattern::Subtree("/dashboard".to_string())
    );
    assert_eq!(
        ScopePattern::parse("/dashboard/**"),
        ScopePattern::Subtree("/dashboard".to_string())
    );
    assert_eq!(
        ScopePattern::parse("/auth/signin"),
        ScopePattern::Exact("/auth/signin".to_string())
    );
}

#[test]
fn test_default_scope() {
    let gate = default_gate();

    for path in ["/", "/auth/signin", "/auth/signup", "/dashboard", "/dashboard/myposts/1"] {
        assert!(gate.in_scope(path), "{path} should be gated");
    }
    for path in ["/health", "/api/auth/logout", "/about", "/dashboardx", "/auth/signin/x"] {
        assert!(!gate.in_scope(path), "{path} should bypass the gate");
    }
}

#[test]
fn test_scope_follows_route_sets() {
    let gate = RequestGate::new(GateConfig::with_routes(
        vec!["/admin".to_string()],
        ["/login".to_string()].into_iter().collect(),
    ));

    for path in ["/admin", "/admin/users", "/login"] {
        assert!(gate.in_scope(path), "{path} should be gated");
    }
    for path in ["/dashboard", "/auth/signin", "/adminx", "/login/extra"] {
        assert!(!gate.in_scope(path), "{path} should bypass the gate");
    }
}

#[test]
fn test_root_subtree_covers_everything() {
    let pattern = ScopePattern::Subtree("/".to_string());
    assert!(pattern.matches("/"));
    assert!(pattern.matches("/anything/below"));
}
