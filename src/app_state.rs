//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    email::{EmailDispatcher, Recipient},
};

/// Who receives the app's notification emails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationSettings {
    /// The configured recipients, `None` when notifications are not set up.
    pub recipient: Option<Recipient>,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Sends email through the configured provider.
    pub email_dispatcher: EmailDispatcher,

    /// Who receives notification emails.
    pub notification: NotificationSettings,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        email_dispatcher: EmailDispatcher,
        notification: NotificationSettings,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
            email_dispatcher,
            notification,
        })
    }
}
