//! The transaction form's raw input, its defaults and its validation rules.

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::date, macros::format_description};

use crate::{
    account::Account,
    category::get_category,
    database_id::{AccountId, TransactionId},
    transaction::{
        core::{NewTransaction, RecurringInterval, Transaction, TransactionType},
        receipt::ScannedReceipt,
    },
};

pub const AMOUNT_REQUIRED: &str = "Amount is required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
pub const ACCOUNT_REQUIRED: &str = "Account is required";
pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const CATEGORY_REQUIRED: &str = "Category is required";
pub const CATEGORY_INVALID: &str = "Category is not valid for this transaction type";
pub const DATE_REQUIRED: &str = "Date is required";
pub const DATE_OUT_OF_RANGE: &str = "Date must be between 1900-01-01 and today";
pub const INTERVAL_REQUIRED: &str = "Recurring interval is required for recurring transactions";

/// The earliest date a transaction may have.
pub const MIN_DATE: Date = date!(1900 - 01 - 01);

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Whether the form creates a new transaction or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting creates a new transaction.
    Create,
    /// Submitting replaces the transaction with this ID.
    Edit(TransactionId),
}

/// The form fields as the browser submitted them.
///
/// Text fields are kept as typed so they can be rendered back to the user
/// unchanged when validation fails.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFormInput {
    /// Income or expense.
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
    /// The amount in dollars, as typed.
    #[serde(default)]
    pub amount: String,
    /// An optional description.
    #[serde(default)]
    pub description: String,
    /// The selected account.
    pub account_id: Option<AccountId>,
    /// The selected category ID.
    #[serde(default)]
    pub category: String,
    /// The date as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Whether the recurrence checkbox is ticked.
    #[serde(default)]
    pub is_recurring: bool,
    /// The selected interval. Ignored unless `is_recurring` is set.
    pub recurring_interval: Option<RecurringInterval>,
}

/// The validation message for each field, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub amount: Option<&'static str>,
    pub account: Option<&'static str>,
    pub category: Option<&'static str>,
    pub date: Option<&'static str>,
    pub recurring_interval: Option<&'static str>,
}

impl FormErrors {
    /// Whether every field passed validation.
    pub fn is_empty(&self) -> bool {
        *self == FormErrors::default()
    }
}

impl TransactionFormInput {
    /// The defaults for a new transaction: an expense on `today` against the default account.
    pub fn for_new(accounts: &[Account], today: Date) -> Self {
        let account_id = accounts
            .iter()
            .find(|account| account.is_default)
            .or_else(|| accounts.first())
            .map(|account| account.id);

        Self {
            account_id,
            date: today.to_string(),
            ..Default::default()
        }
    }

    /// The stored values of `transaction`, for editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            transaction_type: transaction.transaction_type,
            amount: format!("{:.2}", transaction.amount),
            description: transaction.description.clone(),
            account_id: Some(transaction.account_id),
            category: transaction.category.clone(),
            date: transaction.date.to_string(),
            is_recurring: transaction.is_recurring(),
            recurring_interval: transaction.recurring_interval,
        }
    }

    /// Fill in the fields a receipt scan produced.
    ///
    /// Amount and date are always replaced; description and category only when the scan found one.
    pub fn apply_receipt(&mut self, receipt: &ScannedReceipt) {
        self.amount = format!("{:.2}", receipt.amount);
        // Scanners may send a full timestamp, only the date part is kept.
        self.date = receipt
            .date
            .get(..10)
            .unwrap_or(receipt.date.as_str())
            .to_owned();

        if let Some(description) = &receipt.description {
            self.description = description.clone();
        }

        // Unknown categories leave the current selection alone.
        if let Some(category) = receipt.category.as_deref().and_then(get_category) {
            self.category = category.id.to_owned();
            self.transaction_type = category.transaction_type;
        }
    }

    /// Clear the category if it does not belong to the selected transaction type.
    pub fn retain_valid_category(&mut self) {
        let is_valid = get_category(&self.category)
            .is_some_and(|category| category.transaction_type == self.transaction_type);

        if !is_valid {
            self.category.clear();
        }
    }

    /// Check every field and build the transaction to save.
    ///
    /// `today` is the current date in the local timezone and `accounts` are the
    /// accounts that may be selected.
    pub fn validate(&self, today: Date, accounts: &[Account]) -> Result<NewTransaction, FormErrors> {
        let mut errors = FormErrors::default();

        let amount = match self.amount.trim() {
            "" => {
                errors.amount = Some(AMOUNT_REQUIRED);
                None
            }
            amount => match amount.parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
                _ => {
                    errors.amount = Some(AMOUNT_NOT_POSITIVE);
                    None
                }
            },
        };

        let account_id = match self.account_id {
            None => {
                errors.account = Some(ACCOUNT_REQUIRED);
                None
            }
            Some(id) if accounts.iter().any(|account| account.id == id) => Some(id),
            Some(_) => {
                errors.account = Some(ACCOUNT_NOT_FOUND);
                None
            }
        };

        let category = match self.category.trim() {
            "" => {
                errors.category = Some(CATEGORY_REQUIRED);
                None
            }
            id => match get_category(id) {
                Some(category) if category.transaction_type == self.transaction_type => {
                    Some(category.id)
                }
                _ => {
                    errors.category = Some(CATEGORY_INVALID);
                    None
                }
            },
        };

        let date = match self.date.trim() {
            "" => {
                errors.date = Some(DATE_REQUIRED);
                None
            }
            date => match Date::parse(date, DATE_FORMAT) {
                Ok(date) if (MIN_DATE..=today).contains(&date) => Some(date),
                _ => {
                    errors.date = Some(DATE_OUT_OF_RANGE);
                    None
                }
            },
        };

        let recurring_interval = if self.is_recurring {
            if self.recurring_interval.is_none() {
                errors.recurring_interval = Some(INTERVAL_REQUIRED);
            }
            self.recurring_interval
        } else {
            None
        };

        match (amount, account_id, category, date) {
            (Some(amount), Some(account_id), Some(category), Some(date)) if errors.is_empty() => {
                Ok(NewTransaction {
                    transaction_type: self.transaction_type,
                    amount,
                    description: self.description.trim().to_owned(),
                    date,
                    category: category.to_owned(),
                    account_id,
                    recurring_interval,
                })
            }
            _ => Err(errors),
        }
    }
}
