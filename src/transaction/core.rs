//! Defines the core data models and database queries for transactions.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// A string that did not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value \"{0}\"")]
pub struct UnknownVariantError(pub String);

/// Whether money was earned or spent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money coming into an account.
    Income,
    /// Money leaving an account.
    #[default]
    Expense,
}

impl TransactionType {
    /// The value used in forms and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(UnknownVariantError(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringInterval {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// The same day each month, or the last day of shorter months.
    Monthly,
    /// The same day each year, or February 28th for February 29th in non-leap years.
    Yearly,
}

impl RecurringInterval {
    /// Every interval, in display order.
    pub const ALL: [RecurringInterval; 4] = [
        RecurringInterval::Daily,
        RecurringInterval::Weekly,
        RecurringInterval::Monthly,
        RecurringInterval::Yearly,
    ];

    /// The value used in forms and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }

    /// The date one interval after `date`.
    ///
    /// Returns `None` only if the result falls outside the range `time` can represent.
    pub fn next_date(self, date: Date) -> Option<Date> {
        match self {
            RecurringInterval::Daily => date.next_day(),
            RecurringInterval::Weekly => date.checked_add(Duration::weeks(1)),
            RecurringInterval::Monthly => add_months(date, 1),
            RecurringInterval::Yearly => add_months(date, 12),
        }
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringInterval {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecurringInterval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| UnknownVariantError(s.to_owned()))
    }
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Add calendar months to `date`, clamping the day to the end of the target month.
fn add_months(date: Date, months: i32) -> Option<Date> {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = month_index.div_euclid(12);
    let month = Month::try_from(u8::try_from(month_index.rem_euclid(12) + 1).ok()?).ok()?;

    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
}

/// An expense or income recorded against an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money, always positive. The sign comes from `transaction_type`.
    pub amount: f64,
    /// A text description of what the transaction was for, possibly empty.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the category, see [crate::category].
    pub category: String,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// How often the transaction repeats, if it does.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the transaction is next due, for recurring transactions.
    pub next_recurring_date: Option<Date>,
}

impl Transaction {
    /// Whether the transaction repeats.
    pub fn is_recurring(&self) -> bool {
        self.recurring_interval.is_some()
    }
}

/// A validated transaction ready to be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money, greater than zero.
    pub amount: f64,
    /// A text description, possibly empty.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// A category ID valid for `transaction_type`.
    pub category: String,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// Set for recurring transactions.
    pub recurring_interval: Option<RecurringInterval>,
}

/// The signed amount a transaction adds to its account's balance.
pub fn balance_change(transaction_type: TransactionType, amount: f64) -> f64 {
    match transaction_type {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, transaction_type, amount, description, date, category, \
    account_id, recurring_interval, next_recurring_date";

fn adjust_account_balance(
    account_id: AccountId,
    change: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
        (change, account_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidAccount(account_id));
    }

    Ok(())
}

/// Create a new transaction and apply it to its account's balance.
///
/// Both writes happen in a single SQL transaction, so either both are saved or neither is.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if the account ID does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let sql_transaction = connection.unchecked_transaction()?;

    adjust_account_balance(
        new_transaction.account_id,
        balance_change(new_transaction.transaction_type, new_transaction.amount),
        &sql_transaction,
    )?;

    let next_recurring_date = new_transaction
        .recurring_interval
        .and_then(|interval| interval.next_date(new_transaction.date));

    let transaction = sql_transaction
        .prepare(&format!(
            "INSERT INTO \"transaction\" (transaction_type, amount, description, date, category, \
             account_id, recurring_interval, next_recurring_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.transaction_type,
                new_transaction.amount,
                new_transaction.description,
                new_transaction.date,
                new_transaction.category,
                new_transaction.account_id,
                new_transaction.recurring_interval,
                next_recurring_date,
            ),
            map_transaction_row,
        )?;

    sql_transaction.commit()?;

    tracing::info!(
        "Created {} transaction {} for account {}",
        transaction.transaction_type,
        transaction.id,
        transaction.account_id
    );

    Ok(transaction)
}

/// Replace the transaction `id` with `new_transaction`.
///
/// The old transaction's effect is removed from its account's balance and the
/// new effect is applied to the (possibly different) new account.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - [Error::InvalidAccount] if the new account ID does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let old_transaction = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    adjust_account_balance(
        old_transaction.account_id,
        -balance_change(old_transaction.transaction_type, old_transaction.amount),
        &sql_transaction,
    )?;
    adjust_account_balance(
        new_transaction.account_id,
        balance_change(new_transaction.transaction_type, new_transaction.amount),
        &sql_transaction,
    )?;

    let next_recurring_date = new_transaction
        .recurring_interval
        .and_then(|interval| interval.next_date(new_transaction.date));

    let transaction = sql_transaction
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET transaction_type = ?1, amount = ?2, description = ?3, date = ?4, category = ?5,
                 account_id = ?6, recurring_interval = ?7, next_recurring_date = ?8
             WHERE id = ?9
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.transaction_type,
                new_transaction.amount,
                new_transaction.description,
                new_transaction.date,
                new_transaction.category,
                new_transaction.account_id,
                new_transaction.recurring_interval,
                next_recurring_date,
                id,
            ),
            map_transaction_row,
        )?;

    sql_transaction.commit()?;

    tracing::info!("Updated transaction {id}");

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the transactions for an account, newest first.
pub fn get_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE account_id = :account_id
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('INCOME', 'EXPENSE')),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the account view.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        category: row.get(5)?,
        account_id: row.get(6)?,
        recurring_interval: row.get(7)?,
        next_recurring_date: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{NewAccount, create_account, get_account},
        db::initialize,
    };

    use super::{
        NewTransaction, RecurringInterval, TransactionType, create_transaction,
        get_account_transactions, get_transaction, update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        for (name, balance) in [("Everyday", 100.0), ("Savings", 1000.0)] {
            create_account(
                NewAccount {
                    name: name.to_owned(),
                    balance,
                    is_default: false,
                },
                &conn,
            )
            .unwrap();
        }
        conn
    }

    fn expense(amount: f64, account_id: i64) -> NewTransaction {
        NewTransaction {
            transaction_type: TransactionType::Expense,
            amount,
            description: "Coffee".to_owned(),
            date: date!(2025 - 10 - 05),
            category: "food".to_owned(),
            account_id,
            recurring_interval: None,
        }
    }

    #[test]
    fn create_expense_subtracts_from_balance() {
        let conn = get_test_connection();

        let transaction = create_transaction(expense(12.5, 1), &conn).unwrap();

        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.next_recurring_date, None);
        assert_eq!(get_account(1, &conn).unwrap().balance, 87.5);
    }

    #[test]
    fn create_income_adds_to_balance() {
        let conn = get_test_connection();
        let income = NewTransaction {
            transaction_type: TransactionType::Income,
            category: "salary".to_owned(),
            ..expense(50.25, 1)
        };

        create_transaction(income, &conn).unwrap();

        assert_eq!(get_account(1, &conn).unwrap().balance, 150.25);
    }

    #[test]
    fn create_recurring_sets_next_date() {
        let conn = get_test_connection();
        let recurring = NewTransaction {
            date: date!(2025 - 01 - 31),
            recurring_interval: Some(RecurringInterval::Monthly),
            ..expense(10.0, 1)
        };

        let transaction = create_transaction(recurring, &conn).unwrap();

        assert!(transaction.is_recurring());
        assert_eq!(transaction.next_recurring_date, Some(date!(2025 - 02 - 28)));
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_fails_on_invalid_account() {
        let conn = get_test_connection();

        let result = create_transaction(expense(10.0, 42), &conn);

        assert_eq!(result, Err(Error::InvalidAccount(42)));
        assert!(get_account_transactions(42, &conn).unwrap().is_empty());
    }

    #[test]
    fn update_moves_balance_between_accounts() {
        let conn = get_test_connection();
        let transaction = create_transaction(expense(20.0, 1), &conn).unwrap();
        let replacement = NewTransaction {
            transaction_type: TransactionType::Income,
            category: "freelance".to_owned(),
            ..expense(30.0, 2)
        };

        let updated = update_transaction(transaction.id, replacement, &conn).unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.account_id, 2);
        assert_eq!(get_account(1, &conn).unwrap().balance, 100.0);
        assert_eq!(get_account(2, &conn).unwrap().balance, 1030.0);
    }

    #[test]
    fn update_clears_recurrence() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            NewTransaction {
                recurring_interval: Some(RecurringInterval::Weekly),
                ..expense(20.0, 1)
            },
            &conn,
        )
        .unwrap();

        let updated = update_transaction(transaction.id, expense(20.0, 1), &conn).unwrap();

        assert!(!updated.is_recurring());
        assert_eq!(updated.next_recurring_date, None);
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = update_transaction(99, expense(20.0, 1), &conn);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(get_account(1, &conn).unwrap().balance, 100.0);
    }

    #[test]
    fn update_with_invalid_account_rolls_back() {
        let conn = get_test_connection();
        let transaction = create_transaction(expense(20.0, 1), &conn).unwrap();

        let result = update_transaction(transaction.id, expense(20.0, 42), &conn);

        assert_eq!(result, Err(Error::InvalidAccount(42)));
        assert_eq!(get_account(1, &conn).unwrap().balance, 80.0);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn account_transactions_are_newest_first() {
        let conn = get_test_connection();
        let older = NewTransaction {
            date: date!(2025 - 01 - 01),
            ..expense(1.0, 1)
        };
        let newer = NewTransaction {
            date: date!(2025 - 02 - 01),
            ..expense(2.0, 1)
        };
        create_transaction(older, &conn).unwrap();
        create_transaction(newer, &conn).unwrap();
        create_transaction(expense(3.0, 2), &conn).unwrap();

        let amounts = get_account_transactions(1, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect::<Vec<_>>();

        assert_eq!(amounts, vec![2.0, 1.0]);
    }
}
