//! The built-in transaction categories.
//!
//! Categories are fixed and belong to exactly one transaction type, so a
//! salary can never be filed as an expense and groceries can never be income.

use crate::transaction::TransactionType;

/// A category that a transaction can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The stable identifier stored with a transaction, e.g. "groceries".
    pub id: &'static str,
    /// The human readable name.
    pub name: &'static str,
    /// The type of transaction this category applies to.
    pub transaction_type: TransactionType,
}

const fn income(id: &'static str, name: &'static str) -> Category {
    Category {
        id,
        name,
        transaction_type: TransactionType::Income,
    }
}

const fn expense(id: &'static str, name: &'static str) -> Category {
    Category {
        id,
        name,
        transaction_type: TransactionType::Expense,
    }
}

/// Every category known to the app.
pub const CATEGORIES: &[Category] = &[
    income("salary", "Salary"),
    income("freelance", "Freelance"),
    income("investments", "Investments"),
    income("business", "Business"),
    income("rental", "Rental"),
    income("other-income", "Other Income"),
    expense("housing", "Housing"),
    expense("transportation", "Transportation"),
    expense("groceries", "Groceries"),
    expense("utilities", "Utilities"),
    expense("entertainment", "Entertainment"),
    expense("food", "Food"),
    expense("shopping", "Shopping"),
    expense("healthcare", "Healthcare"),
    expense("education", "Education"),
    expense("personal", "Personal Care"),
    expense("travel", "Travel"),
    expense("insurance", "Insurance"),
    expense("gifts", "Gifts & Donations"),
    expense("bills", "Bills & Fees"),
    expense("other-expense", "Other Expenses"),
];

/// The categories that may be used for `transaction_type`, in display order.
pub fn categories_for(transaction_type: TransactionType) -> impl Iterator<Item = &'static Category> {
    CATEGORIES
        .iter()
        .filter(move |category| category.transaction_type == transaction_type)
}

/// Look up a category by its ID.
pub fn get_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.id == id)
}

#[cfg(test)]
mod category_tests {
    use std::collections::HashSet;

    use crate::transaction::TransactionType;

    use super::{CATEGORIES, categories_for, get_category};

    #[test]
    fn ids_are_unique() {
        let ids = CATEGORIES
            .iter()
            .map(|category| category.id)
            .collect::<HashSet<_>>();

        assert_eq!(ids.len(), CATEGORIES.len());
    }

    #[test]
    fn filters_by_transaction_type() {
        for transaction_type in [TransactionType::Income, TransactionType::Expense] {
            let categories = categories_for(transaction_type).collect::<Vec<_>>();

            assert!(!categories.is_empty());
            assert!(
                categories
                    .iter()
                    .all(|category| category.transaction_type == transaction_type),
                "got a category with the wrong type in {categories:?}"
            );
        }
    }

    #[test]
    fn get_category_finds_known_id() {
        let category = get_category("groceries").expect("groceries should be a category");

        assert_eq!(category.name, "Groceries");
        assert_eq!(category.transaction_type, TransactionType::Expense);
    }

    #[test]
    fn get_category_returns_none_for_unknown_id() {
        assert_eq!(get_category("lottery-winnings"), None);
    }
}
