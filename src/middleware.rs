use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, warn};

use crate::services::auth_service::{cookie_value, SESSION_COOKIE};
use crate::state::AppState;

/// Static assets are cached for four hours.
pub const STATIC_CACHE_MAX_AGE: u32 = 14_400;

const ALLOWED_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, \
Authorization, accept, origin, Cache-Control, X-Requested-With";

/// Header policy for one group of routes. `cache_max_age` of `None` forbids caching.
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    pub production: bool,
    pub cache_max_age: Option<u32>,
}

impl SecurityHeaders {
    pub fn no_store(production: bool) -> Self {
        Self { production, cache_max_age: None }
    }

    pub fn cached(production: bool, max_age: u32) -> Self {
        Self { production, cache_max_age: Some(max_age) }
    }

    fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        let mut set = |name: &'static str, value: HeaderValue| {
            headers.insert(HeaderName::from_static(name), value);
        };

        set("x-content-type-options", HeaderValue::from_static("nosniff"));
        set("x-frame-options", HeaderValue::from_static("DENY"));
        set("x-xss-protection", HeaderValue::from_static("1; mode=block"));
        set("referrer-policy", HeaderValue::from_static("strict-origin-when-cross-origin"));
        set("access-control-allow-headers", HeaderValue::from_static(ALLOWED_HEADERS));

        if self.production {
            set(
                "strict-transport-security",
                HeaderValue::from_static("max-age=31536000; includeSubDomains"),
            );
        }

        match self.cache_max_age {
            Some(max_age) => {
                let value = format!("public, max-age={}, must-revalidate", max_age);
                if let Ok(value) = HeaderValue::from_str(&value) {
                    set("cache-control", value);
                }
            }
            None => {
                set(
                    "cache-control",
                    HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
                );
                set("pragma", HeaderValue::from_static("no-cache"));
                set("expires", HeaderValue::from_static("0"));
            }
        }
    }
}

pub async fn security_headers(State(policy): State<SecurityHeaders>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    policy.apply(&mut response);
    response
}

/// The signed-in user, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// Let the request through only with a valid session cookie; otherwise send the browser back
/// to the landing page.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = cookie_value(req.headers(), SESSION_COOKIE) else {
        debug!("No session cookie on {}", req.uri().path());
        return Redirect::to("/").into_response();
    };

    match state.jwt.validate(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser { email: claims.email });
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected session on {}: {}", req.uri().path(), e);
            Redirect::to("/").into_response()
        }
    }
}
