//! Creates the database schema.

use rusqlite::{Connection, TransactionBehavior, Transaction as SqlTransaction};

use crate::{Error, account::create_account_table, transaction::create_transaction_table};

/// Create the tables for every domain model if they do not exist.
///
/// Foreign keys are switched on for `connection` so that transactions cannot
/// refer to missing accounts.
///
/// # Errors
/// Returns [Error::SqlError] if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
