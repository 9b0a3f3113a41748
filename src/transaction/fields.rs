//! Renders the transaction form fields.
//!
//! The fields are swapped in place by HTMX whenever the transaction type or the
//! recurrence checkbox changes, so the category list and the interval select
//! always match the current input.

use maud::{Markup, html};
use time::Date;

use crate::{
    account::Account,
    category::categories_for,
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{
        core::{RecurringInterval, TransactionType},
        form::{FormErrors, MIN_DATE, TransactionFormInput},
    },
};

/// The ID of the element that wraps the form fields.
pub const FORM_FIELDS_ID: &str = "transaction-form-fields";

fn field_error(id: &str, message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p id=(id) class="mt-2 text-sm text-red-600 dark:text-red-500 field-error" { (message) }
        }
    }
}

fn transaction_type_radio(transaction_type: TransactionType, selected: TransactionType) -> Markup {
    let id = format!("transaction-type-{}", transaction_type.as_str().to_lowercase());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(transaction_type.as_str())
                checked[transaction_type == selected]
                required
                tabindex="0"
                hx-post=(endpoints::TRANSACTION_FORM_FIELDS)
                hx-trigger="change"
                hx-target={ "#" (FORM_FIELDS_ID) }
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (transaction_type.label()) }
        }
    }
}

/// Render the fields for `input`, showing any validation `errors` under their fields.
///
/// The markup is the content of the element with the ID [FORM_FIELDS_ID].
pub fn transaction_form_fields(
    input: &TransactionFormInput,
    errors: &FormErrors,
    accounts: &[Account],
    max_date: Date,
) -> Markup {
    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (transaction_type_radio(TransactionType::Expense, input.transaction_type))
                (transaction_type_radio(TransactionType::Income, input.transaction_type))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=(input.amount)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (field_error("amount-error", errors.amount))
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description (optional)"
                value=(input.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

            select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[input.account_id.is_none()] { "Select an account" }

                @for account in accounts {
                    option value=(account.id) selected[input.account_id == Some(account.id)]
                    {
                        (account.name)
                        @if account.is_default { " (default)" }
                    }
                }
            }

            (field_error("account-error", errors.account))
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in categories_for(input.transaction_type) {
                    option value=(category.id) selected[input.category == category.id]
                    {
                        (category.name)
                    }
                }
            }

            (field_error("category-error", errors.category))
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                min=(MIN_DATE)
                max=(max_date)
                value=(input.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error("date-error", errors.date))
        }

        div class="flex items-center gap-3"
        {
            input
                name="is_recurring"
                id="is_recurring"
                type="checkbox"
                value="true"
                checked[input.is_recurring]
                hx-post=(endpoints::TRANSACTION_FORM_FIELDS)
                hx-trigger="change"
                hx-target={ "#" (FORM_FIELDS_ID) }
                class="h-4 w-4 rounded border-gray-300 text-blue-600";

            label for="is_recurring" class="text-sm font-medium" { "Recurring transaction" }
        }

        @if input.is_recurring {
            div
            {
                label for="recurring_interval" class=(FORM_LABEL_STYLE) { "Recurring Interval" }

                select
                    name="recurring_interval"
                    id="recurring_interval"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select an interval" }

                    @for interval in RecurringInterval::ALL {
                        option
                            value=(interval.as_str())
                            selected[input.recurring_interval == Some(interval)]
                        {
                            (interval.label())
                        }
                    }
                }

                (field_error("recurring-interval-error", errors.recurring_interval))
            }
        }
    }
}
