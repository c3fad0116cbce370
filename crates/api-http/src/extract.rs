//! Request extractors whose rejections render as `ApiError`

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body; malformed or incomplete bodies become 400 with a `detail`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; unparsable segments become 400 with a `detail`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
