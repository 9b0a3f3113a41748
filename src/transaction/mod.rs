//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions that keep account balances in step
//! - The transaction form: its input, defaults, validation and rendering
//! - Route handlers for the new and edit pages and the form endpoints

mod core;
mod fields;
mod form;
mod form_fields_endpoint;
mod form_page;
mod receipt;
mod submit_endpoint;

pub use core::{
    Transaction, TransactionType, balance_change, create_transaction_table,
    get_account_transactions,
};
pub use form_fields_endpoint::transaction_form_fields_endpoint;
pub use form_page::{get_edit_transaction_page, get_new_transaction_page};
pub use receipt::receipt_form_fields_endpoint;
pub use submit_endpoint::{create_transaction_endpoint, update_transaction_endpoint};

#[cfg(test)]
pub use core::{NewTransaction, RecurringInterval, create_transaction};
