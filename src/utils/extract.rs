// src/utils/extract.rs

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections use the API's `{"error": ...}` body.
///
/// Syntax errors, wrong field types and a missing `Content-Type` all become
/// 400 Bad Request instead of axum's plain-text 400/415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
