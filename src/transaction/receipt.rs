//! Pre-fills the new transaction form from a scanned receipt.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    timezone::get_local_date,
    transaction::{
        fields::transaction_form_fields,
        form::{FormErrors, TransactionFormInput},
        form_fields_endpoint::TransactionFormState,
    },
};

/// The data a receipt scanner reports when it finishes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScannedReceipt {
    /// The receipt total.
    pub amount: f64,
    /// The purchase date, `YYYY-MM-DD` optionally followed by a time.
    pub date: String,
    /// The merchant or a summary of the items, if the scanner found one.
    pub description: Option<String>,
    /// A category ID, if the scanner could classify the receipt.
    pub category: Option<String>,
}

fn prefill_fields(
    state: &TransactionFormState,
    receipt: &ScannedReceipt,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let accounts = state.accounts()?;

    tracing::debug!("Pre-filling transaction form from receipt {receipt:?}");

    let mut input = TransactionFormInput::for_new(&accounts, today);
    input.apply_receipt(receipt);

    Ok(transaction_form_fields(&input, &FormErrors::default(), &accounts, today).into_response())
}

/// Returns the new transaction form fields pre-filled with the scanned receipt.
pub async fn receipt_form_fields_endpoint(
    State(state): State<TransactionFormState>,
    Json(receipt): Json<ScannedReceipt>,
) -> Response {
    prefill_fields(&state, &receipt).unwrap_or_else(Error::into_alert_response)
}
