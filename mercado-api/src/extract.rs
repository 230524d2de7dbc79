/// Request extraction with enveloped rejections
///
/// axum's own `Json` rejection answers malformed bodies with a plain-text
/// message, which would be the one response on the API that skips the
/// envelope. This wrapper routes the rejection through [`ApiError`] so a
/// body that fails to parse gets the same validation envelope as any other
/// bad input.

use crate::error::ApiError;
use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Drop-in replacement for `axum::Json` used by every handler
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
