//! Manager report rows.

use chrono::NaiveDateTime;
use marketplace_core::{StoreId, UpdateNumber, UserId};

/// An entry of the product update audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub update_number: UpdateNumber,
    /// Manager who made the edit.
    pub manager_id: UserId,
    pub store_id: StoreId,
    pub product_name: String,
    pub updated_on: NaiveDateTime,
}

/// A product ranked by units ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularProduct {
    pub product_name: String,
    pub total_ordered: i64,
}

/// A customer ranked by number of orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularCustomer {
    pub user_id: UserId,
    pub name: String,
    pub order_count: i64,
}

/// Sort updates newest first and keep at most `limit` of them.
///
/// Ties keep their input order.
#[must_use]
pub fn most_recent(mut updates: Vec<ProductUpdate>, limit: usize) -> Vec<ProductUpdate> {
    updates.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
    updates.truncate(limit);
    updates
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn update(store: i32, product: &str, day: u32) -> ProductUpdate {
        ProductUpdate {
            update_number: UpdateNumber::new(i32::try_from(day).unwrap()),
            manager_id: UserId::new(1),
            store_id: StoreId::new(store),
            product_name: product.to_owned(),
            updated_on: NaiveDate::from_ymd_opt(2026, 10, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_most_recent_sorts_descending_and_limits() {
        let updates = vec![
            update(1, "a", 1),
            update(2, "b", 7),
            update(1, "c", 3),
            update(2, "d", 9),
            update(1, "e", 5),
            update(2, "f", 2),
        ];

        let names: Vec<String> = most_recent(updates, 5)
            .into_iter()
            .map(|u| u.product_name)
            .collect();

        assert_eq!(names, vec!["d", "b", "e", "c", "f"]);
    }

    #[test]
    fn test_most_recent_fewer_than_limit() {
        let recent = most_recent(vec![update(1, "a", 1), update(1, "b", 2)], 5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent.first().unwrap().product_name, "b");
    }

    #[test]
    fn test_most_recent_empty() {
        assert!(most_recent(Vec::new(), 5).is_empty());
    }
}
