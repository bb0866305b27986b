use serde::Serialize;
use tracing::debug;

use crate::models::{GroceryItem, Recipe, SelectionItem, Store};

/// The shopping-list working set.
///
/// Names are unique under case-insensitive comparison; the first spelling
/// added is the one kept. Removal and store assignment match names exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<SelectionItem>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SelectionItem> {
        self.items.iter().find(|item| same_name(&item.name, name))
    }

    /// Returns `true` if the name was inserted.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        debug!(name, "selection add");
        self.items.push(SelectionItem {
            name: name.to_string(),
            store: None,
        });
        true
    }

    /// Insert every name not already present, skipping duplicates within the
    /// batch as well. Returns the number inserted.
    pub fn add_many<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| self.add(name.as_ref()))
            .count()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        let removed = self.items.len() != before;
        if removed {
            debug!(name, "selection remove");
        }
        removed
    }

    /// Remove the entry matching `name` case-insensitively, if any.
    pub fn remove_matching(&mut self, name: &str) -> bool {
        match self.find(name).map(|item| item.name.clone()) {
            Some(exact) => self.remove(&exact),
            None => false,
        }
    }

    /// Returns `false` when no entry has exactly this name.
    pub fn set_store(&mut self, name: &str, store: Store) -> bool {
        let mut found = false;
        for item in self.items.iter_mut().filter(|item| item.name == name) {
            item.store = Some(store);
            found = true;
        }
        if found {
            debug!(name, store = store.code(), "selection store assigned");
        }
        found
    }

    pub fn clear_all(&mut self) {
        debug!(count = self.items.len(), "selection cleared");
        self.items.clear();
    }

    /// A recipe counts as selected when any of its ingredients is in the set.
    #[must_use]
    pub fn is_recipe_selected(&self, recipe: &Recipe) -> bool {
        recipe
            .ingredients
            .iter()
            .any(|ingredient| self.contains(ingredient))
    }

    #[must_use]
    pub fn is_grocery_selected(&self, grocery: &GroceryItem) -> bool {
        self.contains(&grocery.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(selection: &Selection) -> Vec<&str> {
        selection.items().iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_add_dedups_case_insensitively() {
        let mut sel = Selection::new();
        assert!(sel.add("Milk"));
        assert!(!sel.add("milk"));
        assert!(!sel.add("MILK"));
        assert_eq!(sel.len(), 1);
        assert_eq!(names(&sel), vec!["Milk"]);
        assert!(sel.items()[0].store.is_none());
    }

    #[test]
    fn test_add_many_dedups_within_batch() {
        let mut sel = Selection::new();
        sel.add("Eggs");
        let added = sel.add_many(["Flour", "eggs", "Sugar", "FLOUR", "Butter"]);
        assert_eq!(added, 3);
        assert_eq!(names(&sel), vec!["Eggs", "Flour", "Sugar", "Butter"]);
    }

    #[test]
    fn test_remove_is_exact_match() {
        let mut sel = Selection::new();
        sel.add("Milk");
        assert!(!sel.remove("milk"));
        assert_eq!(sel.len(), 1);
        assert!(sel.remove("Milk"));
        assert!(sel.is_empty());
        assert!(!sel.remove("Milk"));
    }

    #[test]
    fn test_remove_matching_ignores_case() {
        let mut sel = Selection::new();
        sel.add("Milk");
        assert!(sel.remove_matching("MILK"));
        assert!(sel.is_empty());
        assert!(!sel.remove_matching("milk"));
    }

    #[test]
    fn test_set_store() {
        let mut sel = Selection::new();
        sel.add("Milk");
        assert!(sel.set_store("Milk", Store::Meijer));
        assert_eq!(sel.items()[0].store, Some(Store::Meijer));
        assert!(sel.set_store("Milk", Store::Papaya));
        assert_eq!(sel.items()[0].store, Some(Store::Papaya));

        // Missing or differently-cased names are ignored
        assert!(!sel.set_store("milk", Store::Bjs));
        assert!(!sel.set_store("Bread", Store::Bjs));
        assert_eq!(sel.items()[0].store, Some(Store::Papaya));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut sel = Selection::new();
        sel.add_many(["A", "B", "C"]);
        sel.clear_all();
        assert!(sel.is_empty());
        assert!(sel.items().is_empty());
        assert!(!sel.contains("A"));
    }

    #[test]
    fn test_is_recipe_selected() {
        let recipe = Recipe {
            id: "1".into(),
            name: "Pancakes".to_string(),
            types: vec![],
            cuisines: vec![],
            last_eaten: String::new(),
            ingredients: vec!["Flour".to_string(), "Eggs".to_string()],
            url: String::new(),
        };
        let mut sel = Selection::new();
        assert!(!sel.is_recipe_selected(&recipe));
        sel.add("eggs");
        assert!(sel.is_recipe_selected(&recipe));

        let grocery = GroceryItem {
            id: "g1".into(),
            name: "EGGS".to_string(),
            grocery_type: "meat".to_string(),
        };
        assert!(sel.is_grocery_selected(&grocery));
    }
}
