mod groceries;
mod helpers;
mod recipes;
mod session;
mod shop;

use anyhow::Result;
use clap::ValueEnum;

use grocer_core::error::HouseholdError;
use grocer_core::filter::SortKey;
use grocer_core::service::{CatalogApi, Household};

pub(crate) use groceries::{
    cmd_grocery_add, cmd_grocery_delete, cmd_grocery_list, normalize_type_filter,
};
pub(crate) use recipes::{cmd_recipe_edit, cmd_recipe_list, cmd_recipe_options, cmd_recipe_show};
pub(crate) use session::cmd_session;
pub(crate) use shop::{ShopRequest, cmd_shop};

/// Recipe table column to sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortArg {
    Name,
    LastEaten,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::LastEaten => SortKey::LastEaten,
        }
    }
}

/// Resolve a recipe id or name against the loaded list.
pub(super) fn resolve_recipe_id<A: CatalogApi>(
    household: &Household<A>,
    query: &str,
) -> Result<String> {
    household
        .find_recipe(query)
        .map(|r| r.id.to_string())
        .ok_or_else(|| HouseholdError::UnknownRecipe(query.to_string()).into())
}

/// Resolve a grocery id or name against the loaded list.
pub(super) fn resolve_grocery_id<A: CatalogApi>(
    household: &Household<A>,
    query: &str,
) -> Result<String> {
    household
        .find_grocery(query)
        .map(|g| g.id.to_string())
        .ok_or_else(|| HouseholdError::UnknownGrocery(query.to_string()).into())
}

/// Print a not-found message (as JSON when requested) and exit with status 2.
pub(super) fn exit_not_found(message: &str, json: bool) -> ! {
    if json {
        println!("{}", helpers::json_error(message));
    } else {
        eprintln!("{message}");
    }
    std::process::exit(2);
}
