use serde::{Deserialize, Serialize};

/// An item held in the process-lifetime item store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
        }
    }

    /// Build an item from a payload, keeping the given id
    pub fn from_new(id: i64, item: NewItem) -> Self {
        Self {
            id,
            name: item.name,
            description: item.description,
        }
    }
}

/// Item payload without an id, used for create and replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new_keeps_id() {
        let item = Item::from_new(9, NewItem::new("Monitor", Some("4K".to_string())));

        assert_eq!(item.id, 9);
        assert_eq!(item.name, "Monitor");
        assert_eq!(item.description.as_deref(), Some("4K"));
    }

    #[test]
    fn test_new_item_description_is_optional() {
        let item: NewItem = serde_json::from_str(r#"{"name": "Cable"}"#).unwrap();
        assert_eq!(item, NewItem::new("Cable", None));
    }

    #[test]
    fn test_item_serializes_null_description() {
        let json = serde_json::to_value(Item::new(1, "Laptop", None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Laptop", "description": null})
        );
    }
}
