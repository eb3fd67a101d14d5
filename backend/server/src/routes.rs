use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::{
    database::{RecordStore, store_submission},
    error::AppError,
    form::{Outcome, process},
    pages::{bot_page, form_page, thank_you_page},
    state::AppState,
    utils::get_submission_from_body,
};

pub async fn index_handler() -> impl IntoResponse {
    form_page(&[])
}

pub async fn submit_handler<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let submission = get_submission_from_body(&body)?;

    match process(submission) {
        Outcome::Bot => {
            warn!("Honeypot filled, dropping submission");

            Ok(bot_page().into_response())
        }
        Outcome::Invalid(errors) => {
            debug!(?errors, "Submission rejected");

            Ok(form_page(&errors).into_response())
        }
        Outcome::Valid(submission) => {
            store_submission(&state.store, &submission).await?;

            Ok(thank_you_page(&submission).into_response())
        }
    }
}

pub async fn submit_redirect_handler() -> Redirect {
    Redirect::to("/")
}
