//! Route gating for the app shell.
//!
//! Pure decision core mapping (authentication state, path) to an outcome;
//! `crate::middleware::gate` turns the outcome into HTTP redirects. The gate
//! only ever looks at the presence of the session cookie, never its validity:
//! workspace membership and session expiry are checked by the page data
//! loaders behind it.

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Routes that don't require authentication.
const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/signup", "/api/auth"];

/// Routes that require authentication but no workspace context.
const AUTH_ONLY_ROUTES: &[&str] = &["/onboarding", "/dashboard"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    AuthOnly,
    WorkspaceScoped,
}

pub fn classify(path: &str) -> RouteClass {
    let is_public = PUBLIC_ROUTES.iter().any(|route| {
        if *route == "/" {
            path == "/"
        } else {
            path.starts_with(route)
        }
    });
    if is_public {
        return RouteClass::Public;
    }

    if AUTH_ONLY_ROUTES.iter().any(|route| path.starts_with(route)) {
        return RouteClass::AuthOnly;
    }

    RouteClass::WorkspaceScoped
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { redirect: String },
    RedirectToDashboard,
}

pub fn decide(authenticated: bool, path: &str) -> GateDecision {
    match classify(path) {
        RouteClass::Public => {
            // Authenticated users have no business on the auth pages.
            if authenticated && (path == "/login" || path == "/signup") {
                GateDecision::RedirectToDashboard
            } else {
                GateDecision::Allow
            }
        }
        RouteClass::AuthOnly | RouteClass::WorkspaceScoped => {
            if authenticated {
                // Workspace-scoped paths defer membership checks to the
                // page-level data loader.
                GateDecision::Allow
            } else {
                GateDecision::RedirectToLogin {
                    redirect: path.to_string(),
                }
            }
        }
    }
}

/// Login URL carrying the original destination as a callback parameter.
pub fn login_location(redirect: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, redirect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_public_routes() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/login"), RouteClass::Public);
        assert_eq!(classify("/signup"), RouteClass::Public);
        assert_eq!(classify("/api/auth/callback"), RouteClass::Public);
    }

    #[test]
    fn test_classify_auth_only_routes() {
        assert_eq!(classify("/dashboard"), RouteClass::AuthOnly);
        assert_eq!(classify("/onboarding"), RouteClass::AuthOnly);
    }

    #[test]
    fn test_classify_workspace_routes() {
        assert_eq!(classify("/acme"), RouteClass::WorkspaceScoped);
        assert_eq!(classify("/acme/projects/new"), RouteClass::WorkspaceScoped);
    }

    #[test]
    fn test_root_is_not_a_prefix_match() {
        // "/" must match exactly, otherwise every path would be public.
        assert_eq!(classify("/acme"), RouteClass::WorkspaceScoped);
    }

    #[test]
    fn test_unauthenticated_protected_path_redirects_to_login() {
        assert_eq!(
            decide(false, "/dashboard"),
            GateDecision::RedirectToLogin {
                redirect: "/dashboard".to_string()
            }
        );
        assert_eq!(
            decide(false, "/acme"),
            GateDecision::RedirectToLogin {
                redirect: "/acme".to_string()
            }
        );
    }

    #[test]
    fn test_unauthenticated_public_path_is_allowed() {
        assert_eq!(decide(false, "/"), GateDecision::Allow);
        assert_eq!(decide(false, "/login"), GateDecision::Allow);
        assert_eq!(decide(false, "/signup"), GateDecision::Allow);
    }

    #[test]
    fn test_authenticated_auth_pages_redirect_to_dashboard() {
        assert_eq!(decide(true, "/login"), GateDecision::RedirectToDashboard);
        assert_eq!(decide(true, "/signup"), GateDecision::RedirectToDashboard);
    }

    #[test]
    fn test_authenticated_everywhere_else_is_allowed() {
        assert_eq!(decide(true, "/"), GateDecision::Allow);
        assert_eq!(decide(true, "/dashboard"), GateDecision::Allow);
        assert_eq!(decide(true, "/acme"), GateDecision::Allow);
    }

    #[test]
    fn test_login_location_carries_callback() {
        assert_eq!(login_location("/dashboard"), "/login?redirect=/dashboard");
    }
}
