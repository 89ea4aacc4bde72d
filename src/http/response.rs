//! Response rendering for the inbound boundary.
//!
//! Every outcome is plain text so an upstream site can relay it verbatim.
//!
//! # Status codes
//! - 200: hop served (a forward failure is reported inside the body)
//! - 400: body unreadable, not a path, or no sites
//! - 500: the delay step failed
//! - 503: the worker pool is gone

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::site::{HopReport, SiteError};

/// Plain text response.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    let body: String = body.into();
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Successful hop.
pub fn report(report: &HopReport) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.render(),
    )
        .into_response()
}

/// Hop that could not be served.
pub fn site_error(err: &SiteError) -> Response {
    let status = match err {
        SiteError::EmptyPath => StatusCode::BAD_REQUEST,
        SiteError::Delay { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SiteError::Scheduler(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    text(status, format!("{}\n", err))
}
