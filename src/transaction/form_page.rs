//! Defines the route handlers for the pages for creating and editing a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    account::{Account, get_all_accounts},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base,
        dollar_input_styles, link, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{
        core::get_transaction,
        fields::{FORM_FIELDS_ID, transaction_form_fields},
        form::{FormErrors, FormMode, TransactionFormInput},
        form_fields_endpoint::TransactionFormState,
    },
};

fn receipt_scanner_section() -> Markup {
    html! {
        section
            id="receipt-scanner"
            data-prefill-url=(endpoints::TRANSACTION_RECEIPT)
            data-target={ "#" (FORM_FIELDS_ID) }
            class="p-4 rounded border border-dashed border-gray-300 dark:border-gray-600"
        {
            h3 class="text-sm font-semibold" { "Scan a receipt" }
            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Scanning a receipt fills in the amount and date, plus the description "
                "and category when they can be read."
            }
        }
    }
}

fn transaction_form_view(
    mode: FormMode,
    input: &TransactionFormInput,
    accounts: &[Account],
    max_date: Date,
) -> Markup {
    let (title, submit_text, active_endpoint) = match mode {
        FormMode::Create => (
            "New Transaction",
            "Create Transaction",
            endpoints::NEW_TRANSACTION_VIEW,
        ),
        FormMode::Edit(_) => (
            "Edit Transaction",
            "Update Transaction",
            endpoints::EDIT_TRANSACTION_VIEW,
        ),
    };
    let cancel_url = match (mode, input.account_id) {
        (FormMode::Edit(_), Some(account_id)) => {
            format_endpoint(endpoints::ACCOUNT_VIEW, account_id)
        }
        _ => endpoints::DASHBOARD_VIEW.to_owned(),
    };
    let (hx_post, hx_put) = match mode {
        FormMode::Create => (Some(endpoints::TRANSACTIONS_API.to_owned()), None),
        FormMode::Edit(id) => (None, Some(format_endpoint(endpoints::TRANSACTION, id))),
    };
    let nav_bar = NavBar::new(active_endpoint).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(input, &FormErrors::default(), accounts, max_date);
    let target_422 = format!("#{FORM_FIELDS_ID}");

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if accounts.is_empty() {
                p class="mb-4 text-sm"
                {
                    "You need an account before you can record transactions. "
                    (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                    "."
                }
            }

            form
                hx-post=[hx_post]
                hx-put=[hx_put]
                hx-target-422=(target_422)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { (title) }

                @if mode == FormMode::Create {
                    (receipt_scanner_section())
                }

                div id=(FORM_FIELDS_ID) class="space-y-4 md:space-y-6" { (fields) }

                div class="flex gap-4"
                {
                    a href=(cancel_url) class=(BUTTON_SECONDARY_STYLE) role="button"
                    {
                        "Cancel"
                    }

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span id="indicator" class="inline htmx-indicator" { (spinner) }
                        " " (submit_text)
                    }
                }
            }
        }
    };

    base(title, &[dollar_input_styles()], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<TransactionFormState>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let accounts = state.accounts().inspect_err(|error| {
        tracing::error!("Failed to retrieve accounts for new transaction page: {error}")
    })?;

    let input = TransactionFormInput::for_new(&accounts, today);

    Ok(transaction_form_view(FormMode::Create, &input, &accounts, today).into_response())
}

/// Renders the page for editing the transaction `transaction_id`.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let (transaction, accounts) = {
        let connection = state.lock_connection()?;
        let transaction = get_transaction(transaction_id, &connection)?;
        let accounts = get_all_accounts(&connection)?;
        (transaction, accounts)
    };

    let input = TransactionFormInput::from_transaction(&transaction);

    Ok(transaction_form_view(
        FormMode::Edit(transaction_id),
        &input,
        &accounts,
        today,
    )
    .into_response())
}
