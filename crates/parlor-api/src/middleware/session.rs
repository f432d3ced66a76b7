//! Loads the caller's session at request entry and persists it at exit.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::{Cookie, HeaderMapExt};
use tracing::warn;

use crate::extractors::session::{Session, SessionOutcome};
use crate::state::AppState;

/// Session middleware.
///
/// A live session is saved on every request, which refreshes its idle
/// timer and the cookie. Callers without a session get none until a
/// handler starts one.
pub async fn session_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let settings = &state.config.session;

    let incoming = request
        .headers()
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(&settings.cookie_name).map(str::to_owned));

    let session = match incoming {
        Some(id) => match state.sessions.load(&id).await {
            Some(data) => Session::loaded(id, data),
            None => Session::default(),
        },
        None => Session::default(),
    };
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    let cookie = match session.outcome() {
        SessionOutcome::Untouched => return response,
        SessionOutcome::Save { id, data, retired } => {
            if let Some(old) = retired {
                state.sessions.destroy(&old).await;
            }
            let id = state.sessions.save(id, data).await;
            let max_age = state.sessions.expiration().as_secs();
            cookie_header(&settings.cookie_name, &id, max_age, settings.secure_cookie)
        }
        SessionOutcome::Destroy { ids } => {
            for id in &ids {
                state.sessions.destroy(id).await;
            }
            cookie_header(&settings.cookie_name, "", 0, settings.secure_cookie)
        }
    };

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
    }
    response
}

fn cookie_header(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
