use astra::{Body, Response, ResponseBuilder};
use http::header::{HeaderValue, SET_COOKIE};

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

/// Attach a `Set-Cookie` header to an already built response.
pub fn with_cookie(mut resp: Response, cookie: Option<String>) -> ResultResp {
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(&cookie).map_err(|_| ServerError::InternalError)?;
        resp.headers_mut().append(SET_COOKIE, value);
    }
    Ok(resp)
}
