//! The user-facing JSON web server that listens for frame-generation
//! requests. Route handlers live in [`routes`], wire types in [`protocol`];
//! this module holds the web-boundary error type.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

pub mod protocol;
pub mod routes;

use protocol::FrameResponse;

/// Every failure a request can hit, split by who caused it. Input errors
/// map to 400, backend errors to 500; both render the empty-output payload
/// the frontends expect on rejection.
#[derive(Debug)]
pub enum WebError {
    /// The client sent something unusable: a missing input field, invalid
    /// base64, or bytes that are not an image.
    Input(anyhow::Error),

    /// A detector backend failed on a frame that decoded fine.
    Inference(anyhow::Error),
}

impl WebError {
    pub fn input(err: impl Into<anyhow::Error>) -> Self {
        WebError::Input(err.into())
    }

    pub fn inference(err: impl Into<anyhow::Error>) -> Self {
        WebError::Inference(err.into())
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebError::Input(err) => write!(f, "bad input: {err}"),
            WebError::Inference(err) => write!(f, "inference failed: {err}"),
        }
    }
}

impl actix_web::error::ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::Input(_) => StatusCode::BAD_REQUEST,
            WebError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(FrameResponse::empty())
    }
}

impl From<crate::codec::CodecError> for WebError {
    fn from(err: crate::codec::CodecError) -> Self {
        WebError::input(err)
    }
}

impl From<crate::detect::DetectError> for WebError {
    fn from(err: crate::detect::DetectError) -> Self {
        WebError::inference(err)
    }
}
