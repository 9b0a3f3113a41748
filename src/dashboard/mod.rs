//! Dashboard module
//!
//! Provides an overview page showing every account, the total balance across
//! accounts and a button for sending a test notification email.

mod cards;
mod handlers;
mod test_email;

pub use handlers::get_dashboard_page;
pub use test_email::send_test_email_endpoint;
