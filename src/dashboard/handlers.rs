//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, NotificationSettings,
    account::{Account, get_all_accounts, get_total_account_balance},
    dashboard::{cards::account_cards_view, test_email::EMAIL_RESULT_ID},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Who receives notification emails.
    pub notification: NotificationSettings,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            notification: state.notification.clone(),
        }
    }
}

/// Swaps the button label for "Sending..." while a test email is in flight.
fn test_email_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        #send-test-email .sending-label {
            display: none;
        }

        #send-test-email.htmx-request .sending-label {
            display: inline;
        }

        #send-test-email.htmx-request .idle-label {
            display: none;
        }
        "#
        .to_owned(),
    ))
}

fn test_email_section(notification: &NotificationSettings) -> Markup {
    let target = format!("#{EMAIL_RESULT_ID}");

    html! {
        section id="test-email" class="w-full mx-auto space-y-4" {
            h2 class="text-xl font-semibold" { "Email notifications" }

            @match &notification.recipient {
                Some(recipient) => {
                    p class="text-sm text-gray-600 dark:text-gray-400" {
                        "Notifications go to " (recipient.len()) " recipient(s)."
                    }
                }
                None => {
                    p class="text-sm text-gray-600 dark:text-gray-400" {
                        "No notification recipients are configured."
                    }
                }
            }

            button
                type="button"
                id="send-test-email"
                hx-post=(endpoints::TEST_EMAIL)
                hx-target=(target)
                hx-target-error="#alert-container"
                hx-disabled-elt="this"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="idle-label" { "Send Test Email" }
                span class="sending-label" { "Sending..." }
            }

            div id=(EMAIL_RESULT_ID) {}
        }
    }
}

fn dashboard_view(
    accounts: &[Account],
    total_balance: f64,
    notification: &NotificationSettings,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-8"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-2xl font-bold" { "Dashboard" }

                    @if !accounts.is_empty() {
                        (link(endpoints::NEW_TRANSACTION_VIEW, "Add Transaction"))
                    }
                }

                (account_cards_view(accounts, total_balance))

                (test_email_section(notification))
            }
        }
    };

    base("Dashboard", &[test_email_styles()], &content)
}

/// Display a page with the user's accounts and the total balance.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let (accounts, total_balance) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let accounts = get_all_accounts(&connection)
            .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;
        let total_balance = get_total_account_balance(&connection)?;
        (accounts, total_balance)
    };

    Ok(dashboard_view(&accounts, total_balance, &state.notification).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        NotificationSettings,
        account::{NewAccount, create_account},
        db::initialize,
        email::{EmailAddress, Recipient},
        endpoints,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state(accounts: &[(&str, f64)], recipient: Option<Recipient>) -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        for (name, balance) in accounts {
            create_account(
                NewAccount {
                    name: (*name).to_owned(),
                    balance: *balance,
                    is_default: false,
                },
                &conn,
            )
            .unwrap();
        }

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            notification: NotificationSettings { recipient },
        }
    }

    #[tokio::test]
    async fn shows_accounts_and_total_balance() {
        let state = get_test_state(&[("Everyday", 150.0), ("Savings", 200.25)], None);

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let card_names = document
            .select(&Selector::parse("a[data-account-card] h3").unwrap())
            .map(|name| name.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(card_names, vec!["Everyday", "Savings"]);
        let total = document
            .select(&Selector::parse("#total-balance").unwrap())
            .next()
            .expect("total balance missing")
            .text()
            .collect::<String>();
        assert_eq!(total.trim(), "$350.25");
    }

    #[tokio::test]
    async fn has_test_email_button() {
        let recipient = Recipient::Many(vec![
            EmailAddress::new_unchecked("a@example.com"),
            EmailAddress::new_unchecked("b@example.com"),
        ]);
        let state = get_test_state(&[], Some(recipient));

        let response = get_dashboard_page(State(state)).await.unwrap();

        let document = parse_html_document(response).await;
        let button = document
            .select(&Selector::parse("button#send-test-email").unwrap())
            .next()
            .expect("test email button missing");
        assert_eq!(button.value().attr("hx-post"), Some(endpoints::TEST_EMAIL));
        assert_eq!(button.value().attr("hx-target"), Some("#email-result"));
        let description = document
            .select(&Selector::parse("#test-email p").unwrap())
            .next()
            .expect("recipient description missing")
            .text()
            .collect::<String>();
        assert_eq!(description, "Notifications go to 2 recipient(s).");
    }
}
