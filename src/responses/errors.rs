// responses/errors.rs
use astra::{Body, Response, ResponseBuilder};
use tracing::{error, warn};

use crate::errors::ServerError;
use crate::templates::components::error_page;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into an HTML error page with the matching status.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    let page = error_page(status, &err.public_message()).into_string();
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(page))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
