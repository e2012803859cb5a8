//! Chat protocol handlers.
//!
//! GET reads messages, POST registers or posts a message, PATCH changes the
//! caller's nickname. Bodies are taken raw so malformed JSON surfaces as an
//! enveloped "Invalid request." rather than an axum rejection.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use storm_core::session::SubmitOutcome;
use storm_types::message::MessageView;

use crate::http::error::AppError;
use crate::http::extractors::caller::CallerIdentity;
use crate::http::response::ApiResponse;
use crate::state::AppState;

pub const MESSAGE_CREATED: &str = "Message created.";
pub const NICKNAME_CHANGED: &str = "Nickname changed.";

/// GET - retrieve messages for the caller.
#[tracing::instrument(skip_all, fields(address = %caller.address))]
pub async fn get_messages(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
) -> Result<ApiResponse<Vec<MessageView>>, AppError> {
    let messages = state.session.retrieve_messages(&caller).await?;
    Ok(ApiResponse::data(StatusCode::OK, messages))
}

/// POST - register an unknown caller or post a message.
#[tracing::instrument(skip_all, fields(address = %caller.address))]
pub async fn post_message(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Bytes,
) -> Result<Response, AppError> {
    let response = match state.session.submit(&caller, &body).await? {
        SubmitOutcome::Registered(registration) => {
            ApiResponse::data(StatusCode::CREATED, registration).into_response()
        }
        SubmitOutcome::MessageCreated => {
            ApiResponse::reason(StatusCode::CREATED, MESSAGE_CREATED).into_response()
        }
    };
    Ok(response)
}

/// PATCH - change the caller's nickname.
#[tracing::instrument(skip_all, fields(address = %caller.address))]
pub async fn patch_nickname(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Bytes,
) -> Result<ApiResponse<()>, AppError> {
    state.session.change_nickname(&caller, &body).await?;
    Ok(ApiResponse::reason(StatusCode::CREATED, NICKNAME_CHANGED))
}
