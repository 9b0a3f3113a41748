//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{create_account_endpoint, get_account_page, get_create_account_page},
    dashboard::{get_dashboard_page, send_test_email_endpoint},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, get_edit_transaction_page, get_new_transaction_page,
        receipt_form_fields_endpoint, transaction_form_fields_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_account_page))
        .route(endpoints::ACCOUNT_VIEW, get(get_account_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes are called by HTMX and respond with HTML fragments or an HX-Redirect.
    let api_routes = Router::new()
        .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, put(update_transaction_endpoint))
        .route(
            endpoints::TRANSACTION_FORM_FIELDS,
            post(transaction_form_fields_endpoint),
        )
        .route(
            endpoints::TRANSACTION_RECEIPT,
            post(receipt_form_fields_endpoint),
        )
        .route(endpoints::TEST_EMAIL, post(send_test_email_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
