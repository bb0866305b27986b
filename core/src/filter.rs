use std::collections::BTreeSet;

use crate::models::{GroceryItem, Recipe};

/// Recipe table filters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub search: String,
    pub recipe_type: String,
    pub cuisine: String,
}

impl RecipeFilter {
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self.search.is_empty() {
            let search = self.search.to_lowercase();
            let hit = recipe.name.to_lowercase().contains(&search)
                || recipe
                    .types
                    .iter()
                    .chain(&recipe.cuisines)
                    .any(|v| v.to_lowercase().contains(&search));
            if !hit {
                return false;
            }
        }
        if !self.recipe_type.is_empty() && !recipe.types.contains(&self.recipe_type) {
            return false;
        }
        if !self.cuisine.is_empty() && !recipe.cuisines.contains(&self.cuisine) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroceryFilter {
    pub search: String,
    pub grocery_type: String,
}

impl GroceryFilter {
    #[must_use]
    pub fn matches(&self, grocery: &GroceryItem) -> bool {
        if !self.search.is_empty() {
            let search = self.search.to_lowercase();
            if !grocery.name.to_lowercase().contains(&search)
                && !grocery.grocery_type.to_lowercase().contains(&search)
            {
                return false;
            }
        }
        self.grocery_type.is_empty() || grocery.grocery_type == self.grocery_type
    }
}

#[must_use]
pub fn filter_recipes<'a>(recipes: &'a [Recipe], filter: &RecipeFilter) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| filter.matches(r)).collect()
}

#[must_use]
pub fn filter_groceries<'a>(
    groceries: &'a [GroceryItem],
    filter: &GroceryFilter,
) -> Vec<&'a GroceryItem> {
    groceries.iter().filter(|g| filter.matches(g)).collect()
}

/// Sorted, de-duplicated recipe types for a type dropdown.
#[must_use]
pub fn type_options(recipes: &[Recipe]) -> Vec<String> {
    unique_sorted(recipes.iter().flat_map(|r| r.types.iter()))
}

#[must_use]
pub fn cuisine_options(recipes: &[Recipe]) -> Vec<String> {
    unique_sorted(recipes.iter().flat_map(|r| r.cuisines.iter()))
}

fn unique_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    LastEaten,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    /// Column-header click: the same key while ascending flips to
    /// descending, anything else sorts ascending by `key`.
    pub fn request(&mut self, key: SortKey) {
        self.order = if self.key == key && self.order == SortOrder::Ascending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        self.key = key;
    }
}

fn sort_field(recipe: &Recipe, key: SortKey) -> &str {
    match key {
        SortKey::Name => &recipe.name,
        SortKey::LastEaten => &recipe.last_eaten,
    }
}

/// Plain string comparison on the chosen column; dates are compared as text.
pub fn sort_recipes(recipes: &mut [&Recipe], state: SortState) {
    recipes.sort_by(|a, b| {
        let ord = sort_field(a, state.key).cmp(sort_field(b, state.key));
        match state.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}
