//! Card components for displaying account balances on the dashboard.

use maud::{Markup, html};

use crate::{
    account::Account,
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, format_currency},
};

/// Renders the account cards section.
///
/// Shows an empty state linking to the create account page if there are no
/// accounts, otherwise a grid with one card per account followed by the total.
pub(super) fn account_cards_view(accounts: &[Account], total_balance: f64) -> Markup {
    if accounts.is_empty() {
        return empty_state_view();
    }

    html! {
        section class="w-full mx-auto" {
            div class="flex justify-between items-baseline mb-4" {
                h2 class="text-xl font-semibold" { "Accounts" }

                div class="text-sm text-gray-600 dark:text-gray-400" {
                    "Total: "
                    span id="total-balance" class="font-semibold tabular-nums" {
                        (format_currency(total_balance))
                    }
                }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4" {
                @for account in accounts {
                    (account_card(account))
                }
            }
        }
    }
}

fn account_card(account: &Account) -> Markup {
    let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account.id);
    let balance_style = if account.balance < 0.0 {
        "text-3xl font-bold tabular-nums text-red-600 dark:text-red-400"
    } else {
        "text-3xl font-bold tabular-nums"
    };

    html! {
        a
            href=(account_url)
            data-account-card="true"
            class="block bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   hover:shadow-lg transition-shadow"
            aria-label=(format!("{}: {}", account.name, format_currency(account.balance)))
        {
            div class="flex justify-between items-center mb-3" {
                h3 class="text-lg font-semibold truncate" title=(account.name) {
                    (account.name)
                }

                @if account.is_default {
                    span class="text-xs font-medium text-blue-700 dark:text-blue-300" {
                        "Default"
                    }
                }
            }

            div class=(balance_style) { (format_currency(account.balance)) }
        }
    }
}

fn empty_state_view() -> Markup {
    html! {
        section class="w-full mx-auto text-center py-8" {
            h2 class="text-xl font-semibold mb-2" { "No accounts yet" }
            p class="text-gray-600 dark:text-gray-400" {
                "Create an account to start tracking your income and expenses. "
                a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE) { "Create an account" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::account::Account;

    use super::account_cards_view;

    fn account(id: i64, name: &str, balance: f64, is_default: bool) -> Account {
        Account {
            id,
            name: name.to_owned(),
            balance,
            is_default,
        }
    }

    #[test]
    fn renders_card_per_account() {
        let accounts = vec![
            account(2, "Everyday", 120.5, true),
            account(1, "Savings", -20.0, false),
        ];

        let html = Html::parse_fragment(&account_cards_view(&accounts, 100.5).into_string());

        let links = html
            .select(&Selector::parse("a[data-account-card]").unwrap())
            .filter_map(|card| card.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(links, vec!["/accounts/2", "/accounts/1"]);
        let total = html
            .select(&Selector::parse("#total-balance").unwrap())
            .next()
            .expect("total balance missing")
            .text()
            .collect::<String>();
        assert_eq!(total.trim(), "$100.50");
    }

    #[test]
    fn empty_state_links_to_new_account_page() {
        let html = Html::parse_fragment(&account_cards_view(&[], 0.0).into_string());

        let link_count = html
            .select(&Selector::parse("a[href='/accounts/new']").unwrap())
            .count();
        assert_eq!(link_count, 1);
        assert_eq!(
            html.select(&Selector::parse("a[data-account-card]").unwrap())
                .count(),
            0
        );
    }
}
