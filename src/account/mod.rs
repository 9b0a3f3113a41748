//! Accounts hold a running balance that transactions are recorded against.

mod account_page;
mod core;
mod create_endpoint;
mod create_page;

pub use account_page::get_account_page;
pub use core::{
    Account, NewAccount, create_account, create_account_table, get_account, get_all_accounts,
    get_total_account_balance,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_create_account_page;
