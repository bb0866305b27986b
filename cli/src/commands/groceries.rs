use std::process;

use anyhow::Result;

use grocer_core::filter::{GroceryFilter, filter_groceries};
use grocer_core::models::GroceryType;
use grocer_core::service::{CatalogApi, Household};

use super::helpers::grocery_table;
use super::{exit_not_found, resolve_grocery_id};

/// Map a user-supplied type (`"Home Goods"`, `"home goods"`) onto the
/// lower-cased value the service stores. Unknown types pass through so that
/// legacy categories on the server can still be filtered on.
pub(crate) fn normalize_type_filter(grocery_type: Option<&str>) -> String {
    match grocery_type.map(str::trim) {
        None | Some("") => String::new(),
        Some(t) => t
            .parse::<GroceryType>()
            .map_or_else(|_| t.to_lowercase(), GroceryType::wire_value),
    }
}

pub(crate) async fn cmd_grocery_list<A: CatalogApi>(
    household: &mut Household<A>,
    filter: &GroceryFilter,
    json: bool,
) -> Result<()> {
    household.load_groceries().await?;
    let groceries = filter_groceries(household.groceries(), filter);

    if groceries.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No groceries found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&groceries)?);
    } else {
        println!("{}", grocery_table(&groceries, household.selection()));
    }
    Ok(())
}

pub(crate) async fn cmd_grocery_add<A: CatalogApi>(
    household: &mut Household<A>,
    name: &str,
    grocery_type: &str,
    json: bool,
) -> Result<()> {
    let created = household.add_grocery(name, grocery_type).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        let name = &created.name;
        let id = &created.id;
        let grocery_type = &created.grocery_type;
        println!("Added grocery: {name} [{grocery_type}] (id: {id})");
    }
    Ok(())
}

pub(crate) async fn cmd_grocery_delete<A: CatalogApi>(
    household: &mut Household<A>,
    query: &str,
    json: bool,
) -> Result<()> {
    household.load_groceries().await?;
    let Ok(id) = resolve_grocery_id(household, query) else {
        exit_not_found(&format!("No grocery found for '{query}'"), json);
    };
    let removed = household.delete_grocery(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&removed)?);
    } else {
        let name = &removed.name;
        println!("Deleted grocery: {name} (id: {id})");
    }
    Ok(())
}
