//! Defines the endpoints that save the transaction form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    Error,
    account::get_all_accounts,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    timezone::get_local_date,
    transaction::{
        core::{NewTransaction, Transaction, create_transaction, update_transaction},
        fields::transaction_form_fields,
        form::{FormMode, TransactionFormInput},
        form_fields_endpoint::TransactionFormState,
    },
};

/// Create or update a transaction depending on `mode`.
pub fn save_transaction(
    mode: FormMode,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    match mode {
        FormMode::Create => create_transaction(new_transaction, connection),
        FormMode::Edit(id) => update_transaction(id, new_transaction, connection),
    }
}

fn submit_transaction_form(
    state: &TransactionFormState,
    mode: FormMode,
    input: TransactionFormInput,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let connection = state.lock_connection()?;
    let accounts = get_all_accounts(&connection)?;

    let new_transaction = match input.validate(today, &accounts) {
        Ok(new_transaction) => new_transaction,
        Err(errors) => {
            tracing::debug!("Rejected transaction form {input:?}: {errors:?}");

            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                transaction_form_fields(&input, &errors, &accounts, today),
            )
                .into_response());
        }
    };

    let transaction = save_transaction(mode, new_transaction, &connection)?;

    Ok((
        HxRedirect(format_endpoint(
            endpoints::ACCOUNT_VIEW,
            transaction.account_id,
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response())
}

fn into_response(result: Result<Response, Error>) -> Response {
    result.unwrap_or_else(|error| {
        tracing::error!("could not save transaction: {error}");
        error.into_alert_response()
    })
}

/// A route handler for creating a new transaction, redirects to the account view on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Form(input): Form<TransactionFormInput>,
) -> Response {
    into_response(submit_transaction_form(&state, FormMode::Create, input))
}

/// A route handler for updating a transaction, redirects to the account view on success.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
    Form(input): Form<TransactionFormInput>,
) -> Response {
    into_response(submit_transaction_form(
        &state,
        FormMode::Edit(transaction_id),
        input,
    ))
}
