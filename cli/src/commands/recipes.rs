use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};

use grocer_core::filter::{
    RecipeFilter, SortState, cuisine_options, filter_recipes, sort_recipes, type_options,
};
use grocer_core::models::{RecipeEdit, parse_ingredients_text, split_multi_value};
use grocer_core::service::{CatalogApi, Household};

use super::helpers::{parse_date, recipe_detail, recipe_table};
use super::exit_not_found;

pub(crate) async fn cmd_recipe_list<A: CatalogApi>(
    household: &mut Household<A>,
    filter: &RecipeFilter,
    sort: SortState,
    json: bool,
) -> Result<()> {
    household.load_recipes().await?;

    let mut recipes = filter_recipes(household.recipes(), filter);
    sort_recipes(&mut recipes, sort);

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        println!("{}", recipe_table(&recipes, household.selection()));
    }
    Ok(())
}

pub(crate) async fn cmd_recipe_show<A: CatalogApi>(
    household: &mut Household<A>,
    query: &str,
    json: bool,
) -> Result<()> {
    household.load_recipes().await?;
    let Some(recipe) = household.find_recipe(query) else {
        exit_not_found(&format!("No recipe found for '{query}'"), json);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        println!("{}", recipe_detail(recipe));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn cmd_recipe_edit<A: CatalogApi>(
    household: &mut Household<A>,
    query: &str,
    name: Option<String>,
    types: Option<&str>,
    cuisines: Option<&str>,
    last_eaten: Option<&str>,
    ingredients: Vec<String>,
    ingredients_file: Option<&Path>,
    url: Option<String>,
    json: bool,
) -> Result<()> {
    let ingredients = match (ingredients.is_empty(), ingredients_file) {
        (false, Some(_)) => bail!("Use either --ingredient or --ingredients-file, not both"),
        (false, None) => Some(
            ingredients
                .iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
        ),
        (true, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(parse_ingredients_text(&text))
        }
        (true, None) => None,
    };

    let edit = RecipeEdit {
        name,
        types: types.map(split_multi_value),
        cuisines: cuisines.map(split_multi_value),
        last_eaten: last_eaten.map(parse_date).transpose()?,
        ingredients,
        url,
    };
    if edit.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --name, --type, --cuisine, --last-eaten, --ingredient, --ingredients-file or --url"
        );
    }
    if edit.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        bail!("Recipe name must not be empty");
    }

    household.load_recipes().await?;
    let Some(current) = household.find_recipe(query) else {
        exit_not_found(&format!("No recipe found for '{query}'"), json);
    };

    let edited = edit.apply_to(current);
    let saved = household.save_recipe(&edited).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        let name = &saved.name;
        let id = &saved.id;
        println!("Updated recipe: {name} (id: {id})");
    }
    Ok(())
}

pub(crate) async fn cmd_recipe_options<A: CatalogApi>(
    household: &mut Household<A>,
    json: bool,
) -> Result<()> {
    household.load_recipes().await?;
    let types = type_options(household.recipes());
    let cuisines = cuisine_options(household.recipes());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "types": types,
                "cuisines": cuisines,
            }))?
        );
    } else {
        println!("Types:    {}", types.join(", "));
        println!("Cuisines: {}", cuisines.join(", "));
    }
    Ok(())
}
