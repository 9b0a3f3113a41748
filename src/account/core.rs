//! Defines the account model and its database queries.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::AccountId};

/// A bank account, credit card or wallet that transactions are recorded against.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The unique name of the account.
    pub name: String,
    /// The current balance, kept in step with the account's transactions.
    pub balance: f64,
    /// Whether this account is preselected when creating a transaction.
    pub is_default: bool,
}

/// The data needed to create an [Account].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The account name. Leading and trailing whitespace is removed.
    pub name: String,
    /// The opening balance.
    pub balance: f64,
    /// Whether the new account should become the default account.
    pub is_default: bool,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            balance REAL NOT NULL DEFAULT 0,
            is_default INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;
    let is_default = row.get(3)?;

    Ok(Account {
        id,
        name,
        balance,
        is_default,
    })
}

/// Create a new account.
///
/// The first account is always made the default account. If `new_account`
/// is marked as the default, any previous default account loses the flag.
///
/// # Errors
/// Returns:
/// - [Error::EmptyAccountName] if the trimmed name is empty,
/// - [Error::InvalidAccountBalance] if the balance is NaN or infinite,
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - [Error::SqlError] for any other SQL error.
pub fn create_account(new_account: NewAccount, connection: &Connection) -> Result<Account, Error> {
    let name = new_account.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    if !new_account.balance.is_finite() {
        return Err(Error::InvalidAccountBalance);
    }

    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let transaction = connection.unchecked_transaction()?;

    let account_count: i64 =
        transaction.query_row("SELECT COUNT(id) FROM account", [], |row| row.get(0))?;
    let is_default = new_account.is_default || account_count == 0;

    if is_default {
        transaction.execute("UPDATE account SET is_default = 0 WHERE is_default = 1", [])?;
    }

    let account = transaction
        .prepare(
            "INSERT INTO account (name, balance, is_default) VALUES (?1, ?2, ?3)
             RETURNING id, name, balance, is_default",
        )?
        .query_row(
            params![name, new_account.balance, is_default],
            map_row_to_account,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountName(name.to_owned()),
            error => error.into(),
        })?;

    transaction.commit()?;

    tracing::info!("Created account {} \"{}\"", account.id, account.name);

    Ok(account)
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, balance, is_default FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

/// Get every account, the default account first and the rest sorted by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, balance, is_default FROM account ORDER BY is_default DESC, name ASC",
        )?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Get the total balance across all accounts.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM account")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }
}

#[cfg(test)]
mod create_account_tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{Account, NewAccount, create_account, get_account, get_all_accounts};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_account(name: &str, balance: f64, is_default: bool) -> NewAccount {
        NewAccount {
            name: name.to_owned(),
            balance,
            is_default,
        }
    }

    #[test]
    fn first_account_becomes_default() {
        let conn = get_test_connection();

        let account = create_account(new_account("Everyday", 100.0, false), &conn).unwrap();

        assert_eq!(
            account,
            Account {
                id: 1,
                name: "Everyday".to_owned(),
                balance: 100.0,
                is_default: true,
            }
        );
    }

    #[test]
    fn second_account_is_not_default_unless_requested() {
        let conn = get_test_connection();
        create_account(new_account("Everyday", 100.0, false), &conn).unwrap();

        let account = create_account(new_account("Savings", 5.0, false), &conn).unwrap();

        assert!(!account.is_default);
        assert!(get_account(1, &conn).unwrap().is_default);
    }

    #[test]
    fn new_default_account_clears_previous_default() {
        let conn = get_test_connection();
        let first = create_account(new_account("Everyday", 100.0, false), &conn).unwrap();

        let second = create_account(new_account("Savings", 5.0, true), &conn).unwrap();

        assert!(second.is_default);
        assert!(!get_account(first.id, &conn).unwrap().is_default);
        let default_count = get_all_accounts(&conn)
            .unwrap()
            .iter()
            .filter(|account| account.is_default)
            .count();
        assert_eq!(default_count, 1);
    }

    #[test]
    fn trims_name() {
        let conn = get_test_connection();

        let account = create_account(new_account("  Wallet ", 0.0, false), &conn).unwrap();

        assert_eq!(account.name, "Wallet");
    }

    #[test]
    fn rejects_empty_name() {
        let conn = get_test_connection();

        let result = create_account(new_account("   ", 0.0, false), &conn);

        assert_eq!(result, Err(Error::EmptyAccountName));
    }

    #[test]
    fn rejects_non_finite_balance() {
        let conn = get_test_connection();

        for balance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = create_account(new_account("Everyday", balance, false), &conn);

            assert_eq!(result, Err(Error::InvalidAccountBalance), "balance {balance}");
        }
        assert!(get_all_accounts(&conn).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_name() {
        let conn = get_test_connection();
        create_account(new_account("Everyday", 100.0, false), &conn).unwrap();

        let result = create_account(new_account("Everyday", 1.0, true), &conn);

        assert_eq!(
            result,
            Err(Error::DuplicateAccountName("Everyday".to_owned()))
        );
        // The failed insert must not have cleared the existing default.
        assert!(get_account(1, &conn).unwrap().is_default);
    }

    #[test]
    fn get_all_lists_default_first() {
        let conn = get_test_connection();
        create_account(new_account("Zebra", 0.0, false), &conn).unwrap();
        create_account(new_account("Bravo", 0.0, false), &conn).unwrap();
        create_account(new_account("Alpha", 0.0, false), &conn).unwrap();

        let names = get_all_accounts(&conn)
            .unwrap()
            .into_iter()
            .map(|account| account.name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Zebra", "Alpha", "Bravo"]);
    }

    #[test]
    fn get_missing_account_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_account(42, &conn), Err(Error::NotFound));
    }
}
