//! Displays a single account and its transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_account},
    category::get_category,
    database_id::AccountId,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionType, balance_change, get_account_transactions},
};

/// The state needed for the [get_account_page](crate::account::get_account_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.transaction_type {
        TransactionType::Income => "px-6 py-4 text-right text-green-600 dark:text-green-400",
        TransactionType::Expense => "px-6 py-4 text-right",
    };
    let category = get_category(&transaction.category)
        .map(|category| category.name)
        .unwrap_or(transaction.category.as_str());
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.description)

                @if let Some(interval) = transaction.recurring_interval {
                    span class="ms-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "(" (interval.label()) ")"
                    }
                }
            }

            td class=(TABLE_CELL_STYLE) { (category) }

            td class=(amount_style)
            {
                (format_currency(balance_change(transaction.transaction_type, transaction.amount)))
            }

            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
            }
        }
    )
}

fn account_view(account: &Account, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNT_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold"
                        {
                            (account.name)

                            @if account.is_default {
                                span class="ms-2 text-xs font-medium text-blue-700 dark:text-blue-300" { "Default" }
                            }
                        }

                        p id="account-balance" class="text-lg tabular-nums"
                        {
                            (format_currency(account.balance))
                        }
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(&account.name, &[], &content)
}

/// Renders the account `account_id` with its transactions, newest first.
pub async fn get_account_page(
    State(state): State<AccountPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let (account, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let account = get_account(account_id, &connection)?;
        let transactions = get_account_transactions(account_id, &connection)?;
        (account, transactions)
    };

    Ok(account_view(&account, &transactions).into_response())
}
