//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{NewAccount, create_account},
    endpoints::{self, format_endpoint},
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// The opening balance in dollars, zero when left blank.
    pub balance: Option<f64>,
    /// Set when the "default account" checkbox is ticked.
    #[serde(default)]
    pub is_default: bool,
}

/// A route handler for creating a new account, redirects to the account's view on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_account = NewAccount {
        name: form.name,
        balance: form.balance.unwrap_or_default(),
        is_default: form.is_default,
    };

    let account = match create_account(new_account, &connection) {
        Ok(account) => account,
        Err(error) => {
            tracing::error!("could not create account: {error}");
            return error.into_alert_response();
        }
    };

    (
        HxRedirect(format_endpoint(endpoints::ACCOUNT_VIEW, account.id)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        account::{
            Account, create_account_endpoint,
            create_endpoint::{AccountForm, CreateAccountState},
            get_account, get_all_accounts,
        },
        db::initialize,
        test_utils::assert_hx_redirect,
    };

    fn get_test_state() -> CreateAccountState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CreateAccountState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_account() {
        let state = get_test_state();
        let form = AccountForm {
            name: "Everyday".to_owned(),
            balance: Some(123.45),
            is_default: false,
        };

        let response = create_account_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/accounts/1");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_account(1, &connection).unwrap(),
            Account {
                id: 1,
                name: "Everyday".to_owned(),
                balance: 123.45,
                is_default: true,
            }
        );
    }

    #[tokio::test]
    async fn blank_balance_defaults_to_zero() {
        let state = get_test_state();
        let form = AccountForm {
            name: "Wallet".to_owned(),
            balance: None,
            is_default: false,
        };

        create_account_endpoint(State(state.clone()), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(1, &connection).unwrap().balance, 0.0);
    }

    #[tokio::test]
    async fn duplicate_name_is_bad_request() {
        let state = get_test_state();
        for _ in 0..2 {
            let form = AccountForm {
                name: "Everyday".to_owned(),
                balance: None,
                is_default: false,
            };
            let response = create_account_endpoint(State(state.clone()), Form(form)).await;

            if response.status() != StatusCode::SEE_OTHER {
                assert_eq!(response.status(), StatusCode::BAD_REQUEST);
                return;
            }
        }

        panic!("want the second account with the same name to be rejected");
    }

    #[tokio::test]
    async fn empty_name_is_bad_request() {
        let state = get_test_state();
        let form = AccountForm {
            name: " ".to_owned(),
            balance: None,
            is_default: false,
        };

        let response = create_account_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_finite_balance_is_bad_request() {
        let state = get_test_state();

        for balance in [f64::NAN, f64::INFINITY] {
            let form = AccountForm {
                name: "Everyday".to_owned(),
                balance: Some(balance),
                is_default: false,
            };

            let response = create_account_endpoint(State(state.clone()), Form(form)).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_accounts(&connection).unwrap().is_empty());
    }
}
