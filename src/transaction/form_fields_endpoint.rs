//! Re-renders the transaction form fields from the current input.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    timezone::get_local_date,
    transaction::{
        fields::transaction_form_fields,
        form::{FormErrors, TransactionFormInput},
    },
};

/// The state needed by the transaction form endpoints.
#[derive(Debug, Clone)]
pub struct TransactionFormState {
    /// The database connection for managing transactions and reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl TransactionFormState {
    pub(crate) fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    pub(crate) fn accounts(&self) -> Result<Vec<Account>, Error> {
        get_all_accounts(&*self.lock_connection()?)
    }
}

fn render_fields(
    state: &TransactionFormState,
    mut input: TransactionFormInput,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let accounts = state.accounts()?;

    input.retain_valid_category();

    Ok(transaction_form_fields(&input, &FormErrors::default(), &accounts, today).into_response())
}

/// Returns the form fields for the submitted input without saving anything.
///
/// Called when the transaction type or the recurrence checkbox changes so that
/// the category choices and the interval field follow the input.
pub async fn transaction_form_fields_endpoint(
    State(state): State<TransactionFormState>,
    Form(input): Form<TransactionFormInput>,
) -> Response {
    render_fields(&state, input).unwrap_or_else(Error::into_alert_response)
}
