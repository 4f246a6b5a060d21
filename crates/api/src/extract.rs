//! JSON body extractors with this crate's error envelopes.
//!
//! A malformed body is rejected before the handler runs, so nothing is
//! partially processed.

use axum::extract::FromRequest;

use crate::error::{AppError, AssistError};

/// `axum::Json` that rejects with an [`AppError`] (`{error, code}`, 400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::Json` that rejects with an [`AssistError`] (`{status, message}`, 400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AssistError))]
pub struct AssistJson<T>(pub T);
