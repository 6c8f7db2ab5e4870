//! axum middleware wrapping [`SessionGate`]
//!
//! Installed router-wide with
//! `axum::middleware::from_fn_with_state(gate, session_gate)` so it runs
//! before routing.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::cookies::RequestCookies;
use crate::gate::{GateDecision, SessionGate};

pub async fn session_gate(
    State(gate): State<SessionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let cookies = RequestCookies::from_headers(request.headers());

    match gate.decide(&path, &cookies).await {
        Ok(GateDecision::Excluded) => next.run(request).await,
        Ok(GateDecision::Deny { location }) => Redirect::temporary(&location).into_response(),
        Ok(GateDecision::Allow { identity, refresh }) => {
            refresh.apply_to_request(request.headers_mut());
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }

            let mut response = next.run(request).await;
            refresh.apply_to_response(response.headers_mut());
            response
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Session refresh failed");
            e.into_response()
        }
    }
}
