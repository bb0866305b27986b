use std::fmt::Write;

use serde::Serialize;

use crate::models::{SelectionItem, Store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreGroup {
    pub store: Store,
    pub items: Vec<String>,
}

/// Selection entries grouped by store, in order of first appearance, with
/// unassigned entries kept separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    pub groups: Vec<StoreGroup>,
    pub unassigned: Vec<String>,
}

impl ShoppingList {
    #[must_use]
    pub fn from_items(items: &[SelectionItem]) -> Self {
        let mut list = ShoppingList::default();
        for item in items {
            let Some(store) = item.store else {
                list.unassigned.push(item.name.clone());
                continue;
            };
            match list.groups.iter_mut().find(|g| g.store == store) {
                Some(group) => group.items.push(item.name.clone()),
                None => list.groups.push(StoreGroup {
                    store,
                    items: vec![item.name.clone()],
                }),
            }
        }
        list
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.unassigned.is_empty()
    }

    /// Render as plain text: a `* Store *` header per store followed by its
    /// items and a blank line, then unassigned items with no header.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            let _ = writeln!(out, "* {} *", group.store.display_name());
            for name in &group.items {
                let _ = writeln!(out, "{name}");
            }
            out.push('\n');
        }
        for name in &self.unassigned {
            let _ = writeln!(out, "{name}");
        }
        out.trim_end().to_string()
    }
}

#[must_use]
pub fn format_shopping_list(items: &[SelectionItem]) -> String {
    ShoppingList::from_items(items).to_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, store: Option<Store>) -> SelectionItem {
        SelectionItem {
            name: name.to_string(),
            store,
        }
    }

    #[test]
    fn test_format_groups_by_store() {
        let items = vec![
            item("Milk", Some(Store::Meijer)),
            item("Eggs", None),
            item("Bread", Some(Store::Meijer)),
        ];
        assert_eq!(format_shopping_list(&items), "* Meijer *\nMilk\nBread\n\nEggs");
    }

    #[test]
    fn test_format_store_order_is_first_appearance() {
        let items = vec![
            item("Tofu", Some(Store::Papaya)),
            item("Rice", None),
            item("Kale", Some(Store::FreshThyme)),
            item("Soy Sauce", Some(Store::Papaya)),
            item("Paper Towels", Some(Store::Bjs)),
        ];
        assert_eq!(
            format_shopping_list(&items),
            "* Papaya *\nTofu\nSoy Sauce\n\n* Fresh Thyme *\nKale\n\n* BJ's *\nPaper Towels\n\nRice"
        );
    }

    #[test]
    fn test_format_without_unassigned_trims_trailing_blank() {
        let items = vec![item("A", Some(Store::Meijer)), item("B", Some(Store::Bjs))];
        assert_eq!(format_shopping_list(&items), "* Meijer *\nA\n\n* BJ's *\nB");
    }

    #[test]
    fn test_format_only_unassigned() {
        let items = vec![item("A", None), item("B", None)];
        assert_eq!(format_shopping_list(&items), "A\nB");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_shopping_list(&[]), "");
        assert!(ShoppingList::from_items(&[]).is_empty());
    }

    #[test]
    fn test_grouping_structure() {
        let items = vec![
            item("X", Some(Store::FreshThyme)),
            item("Y", None),
            item("Z", Some(Store::FreshThyme)),
        ];
        let list = ShoppingList::from_items(&items);
        assert_eq!(list.groups.len(), 1);
        assert_eq!(list.groups[0].store, Store::FreshThyme);
        assert_eq!(list.groups[0].items, vec!["X", "Z"]);
        assert_eq!(list.unassigned, vec!["Y"]);
    }
}
