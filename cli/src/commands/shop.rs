use std::path::Path;

use anyhow::{Context, Result, bail};

use grocer_core::service::{CatalogApi, Household};

use super::helpers::{assign_store, parse_assignment};
use super::{resolve_grocery_id, resolve_recipe_id};

/// What to put on a one-shot shopping list.
#[derive(Debug, Default)]
pub(crate) struct ShopRequest<'a> {
    pub recipes: &'a [String],
    pub groceries: &'a [String],
    pub items: &'a [String],
    pub assignments: &'a [String],
}

impl ShopRequest<'_> {
    fn is_empty(&self) -> bool {
        self.recipes.is_empty() && self.groceries.is_empty() && self.items.is_empty()
    }
}

/// Load whatever lists the request needs and fill the household's selection.
pub(crate) async fn build_selection<A: CatalogApi>(
    household: &mut Household<A>,
    request: &ShopRequest<'_>,
) -> Result<()> {
    if request.is_empty() {
        bail!("Nothing to shop for. Pass at least one --recipe, --grocery or --item");
    }

    if !request.recipes.is_empty() {
        household.load_recipes().await?;
    }
    if !request.groceries.is_empty() {
        household.load_groceries().await?;
    }

    for query in request.recipes {
        let id = resolve_recipe_id(household, query)?;
        household.select_recipe(&id)?;
    }
    for query in request.groceries {
        let id = resolve_grocery_id(household, query)?;
        household.select_grocery(&id)?;
    }
    household.selection_mut().add_many(
        request
            .items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty()),
    );

    for assignment in request.assignments {
        let (name, store) = parse_assignment(assignment)?;
        assign_store(household.selection_mut(), &name, store)?;
    }
    Ok(())
}

pub(crate) async fn cmd_shop<A: CatalogApi>(
    household: &mut Household<A>,
    request: &ShopRequest<'_>,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    build_selection(household, request).await?;

    let rendered = if json {
        serde_json::to_string_pretty(&household.shopping_list())?
    } else {
        household.shopping_list_text()
    };

    match out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let count = household.selection().len();
            eprintln!("Wrote {count} items to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
