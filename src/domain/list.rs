//! Shopping list domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::Item;

/// A named shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list together with its items, as returned by `GET /lists/{listId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithItems {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ListWithItems {
    #[must_use]
    pub fn purchased_count(&self) -> usize {
        self.items.iter().filter(|i| i.purchased).count()
    }

    /// Replaces the item with the same id, keeping its position.
    ///
    /// Returns `false` if no such item is held locally.
    pub fn replace_item(&mut self, item: Item) -> bool {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Removes the item with the given id, returning it if present.
    pub fn remove_item(&mut self, item_id: &str) -> Option<Item> {
        let pos = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(pos))
    }
}

/// Body of `POST /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ListWithItems {
        serde_json::from_value(json!({
            "_id": "l1",
            "name": "Courses",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
            "items": [
                {"_id": "a", "listId": "l1", "name": "Pain", "quantity": 2, "weight": null,
                 "notes": null, "purchased": true,
                 "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"},
                {"_id": "b", "listId": "l1", "name": "Lait", "quantity": 1, "weight": null,
                 "notes": null, "purchased": false,
                 "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn flattened_list_fields_parse() {
        let list = sample();
        assert_eq!(list.list.name, "Courses");
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.purchased_count(), 1);
    }

    #[test]
    fn replace_and_remove_keep_order() {
        let mut list = sample();
        let mut updated = list.items[1].clone();
        updated.purchased = true;
        assert!(list.replace_item(updated));
        assert_eq!(list.purchased_count(), 2);
        assert_eq!(list.items[1].id, "b");

        assert_eq!(list.remove_item("a").map(|i| i.name), Some("Pain".to_string()));
        assert!(list.remove_item("a").is_none());
        assert_eq!(list.items.len(), 1);
    }
}
