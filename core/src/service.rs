use std::future::Future;

use tracing::{debug, warn};

use crate::error::{ApiError, HouseholdError};
use crate::models::{GroceryItem, NewGroceryItem, Recipe};
use crate::selection::Selection;
use crate::shopping_list::{ShoppingList, format_shopping_list};

/// The recipe/grocery REST service.
///
/// The CLI implements this with reqwest; tests use an in-memory catalog.
pub trait CatalogApi {
    fn list_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, ApiError>> + Send;
    fn update_recipe(
        &self,
        recipe: &Recipe,
    ) -> impl Future<Output = Result<Recipe, ApiError>> + Send;
    fn list_groceries(&self) -> impl Future<Output = Result<Vec<GroceryItem>, ApiError>> + Send;
    fn add_grocery(
        &self,
        item: &NewGroceryItem,
    ) -> impl Future<Output = Result<GroceryItem, ApiError>> + Send;
    fn delete_grocery(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Session state: the loaded recipe and grocery lists plus the shopping-list
/// selection. Failed requests are logged and leave the state untouched.
pub struct Household<A> {
    api: A,
    recipes: Vec<Recipe>,
    groceries: Vec<GroceryItem>,
    selection: Selection,
}

fn logged<T>(result: Result<T, ApiError>) -> Result<T, HouseholdError> {
    result.map_err(|err| {
        warn!(operation = %err.operation(), error = %err, "catalog request failed");
        HouseholdError::Api(err)
    })
}

impl<A: CatalogApi> Household<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            recipes: Vec::new(),
            groceries: Vec::new(),
            selection: Selection::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn groceries(&self) -> &[GroceryItem] {
        &self.groceries
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    // --- Loading ---

    pub async fn load_recipes(&mut self) -> Result<usize, HouseholdError> {
        let recipes = logged(self.api.list_recipes().await)?;
        debug!(count = recipes.len(), "recipes loaded");
        self.recipes = recipes;
        Ok(self.recipes.len())
    }

    pub async fn load_groceries(&mut self) -> Result<usize, HouseholdError> {
        let groceries = logged(self.api.list_groceries().await)?;
        debug!(count = groceries.len(), "groceries loaded");
        self.groceries = groceries;
        Ok(self.groceries.len())
    }

    /// Load both lists. A failure in one does not prevent the other.
    pub async fn refresh(&mut self) -> Result<(), HouseholdError> {
        let recipes = self.load_recipes().await;
        let groceries = self.load_groceries().await;
        recipes?;
        groceries?;
        Ok(())
    }

    // --- Lookups ---

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn grocery(&self, id: &str) -> Option<&GroceryItem> {
        self.groceries.iter().find(|g| g.id == id)
    }

    /// Resolve by id first, then by case-insensitive name.
    pub fn find_recipe(&self, query: &str) -> Option<&Recipe> {
        self.recipe(query).or_else(|| {
            let wanted = query.to_lowercase();
            self.recipes.iter().find(|r| r.name.to_lowercase() == wanted)
        })
    }

    pub fn find_grocery(&self, query: &str) -> Option<&GroceryItem> {
        self.grocery(query).or_else(|| {
            let wanted = query.to_lowercase();
            self.groceries
                .iter()
                .find(|g| g.name.to_lowercase() == wanted)
        })
    }

    pub fn is_recipe_selected(&self, recipe: &Recipe) -> bool {
        self.selection.is_recipe_selected(recipe)
    }

    pub fn is_grocery_selected(&self, grocery: &GroceryItem) -> bool {
        self.selection.is_grocery_selected(grocery)
    }

    // --- Selection ---

    /// Add every ingredient of the recipe. Returns how many names were new.
    pub fn select_recipe(&mut self, id: &str) -> Result<usize, HouseholdError> {
        let recipe = self
            .recipes
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| HouseholdError::UnknownRecipe(id.to_string()))?;
        let added = self.selection.add_many(&recipe.ingredients);
        debug!(recipe = %recipe.name, added, "recipe selected");
        Ok(added)
    }

    pub fn select_grocery(&mut self, id: &str) -> Result<bool, HouseholdError> {
        let grocery = self
            .groceries
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| HouseholdError::UnknownGrocery(id.to_string()))?;
        Ok(self.selection.add(&grocery.name))
    }

    pub fn shopping_list(&self) -> ShoppingList {
        ShoppingList::from_items(self.selection.items())
    }

    pub fn shopping_list_text(&self) -> String {
        format_shopping_list(self.selection.items())
    }

    // --- Mutations against the service ---

    /// Save an edited recipe and replace the local copy with the server's.
    pub async fn save_recipe(&mut self, recipe: &Recipe) -> Result<Recipe, HouseholdError> {
        if !self.recipes.iter().any(|r| r.id == recipe.id) {
            return Err(HouseholdError::UnknownRecipe(recipe.id.to_string()));
        }
        let saved = logged(self.api.update_recipe(recipe).await)?;
        if let Some(slot) = self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            *slot = saved.clone();
        }
        debug!(id = %saved.id, "recipe saved");
        Ok(saved)
    }

    pub async fn add_grocery(
        &mut self,
        name: &str,
        grocery_type: &str,
    ) -> Result<GroceryItem, HouseholdError> {
        let new_item = NewGroceryItem::new(name, grocery_type)?;
        let created = logged(self.api.add_grocery(&new_item).await)?;
        debug!(id = %created.id, name = %created.name, "grocery added");
        self.groceries.push(created.clone());
        Ok(created)
    }

    /// Delete a grocery from the service, then drop it from the local list
    /// and from the selection.
    pub async fn delete_grocery(&mut self, id: &str) -> Result<GroceryItem, HouseholdError> {
        let Some(index) = self.groceries.iter().position(|g| g.id == id) else {
            return Err(HouseholdError::UnknownGrocery(id.to_string()));
        };
        logged(self.api.delete_grocery(id).await)?;
        let removed = self.groceries.remove(index);
        self.selection.remove_matching(&removed.name);
        debug!(id, name = %removed.name, "grocery deleted");
        Ok(removed)
    }
}
