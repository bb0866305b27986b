use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use grocer_core::filter::{
    GroceryFilter, RecipeFilter, SortOrder, SortState, filter_groceries, filter_recipes,
    sort_recipes,
};
use grocer_core::service::{CatalogApi, Household};

use super::groceries::normalize_type_filter;
use super::helpers::{assign_store, grocery_table, recipe_table, selection_table};
use super::{SortArg, resolve_grocery_id, resolve_recipe_id};

const PROMPT: &str = "grocer> ";

#[derive(Parser)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Reload recipes and groceries from the server
    Refresh,
    /// Show recipes, filtered and in the current sort order
    Recipes {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short = 't', long = "type")]
        recipe_type: Option<String>,
        #[arg(short, long)]
        cuisine: Option<String>,
    },
    /// Sort recipes by a column (repeat to flip the direction)
    Sort { key: SortArg },
    /// Show groceries
    Groceries {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short = 't', long = "type")]
        grocery_type: Option<String>,
    },
    /// Put a recipe's ingredients on the shopping list
    AddRecipe {
        /// Recipe ID or name
        recipe: String,
    },
    /// Put a grocery on the shopping list
    AddGrocery {
        /// Grocery ID or name
        grocery: String,
    },
    /// Put free-text items on the shopping list
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Take an item off the shopping list
    Remove { name: String },
    /// Assign a shopping-list item to a store (M, BJ, FT, P or the store name)
    Store { name: String, store: String },
    /// Empty the shopping list
    Clear,
    /// Show the shopping list with store assignments
    List,
    /// Print the formatted shopping list
    Shop {
        /// Write the list to a file instead
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Create a grocery on the server
    NewGrocery {
        name: String,
        #[arg(short = 't', long = "type")]
        grocery_type: String,
    },
    /// Delete a grocery from the server
    DeleteGrocery {
        /// Grocery ID or name
        grocery: String,
    },
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Split a command line on whitespace, keeping double-quoted runs together.
fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        bail!("Unterminated quote in '{line}'");
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

pub(crate) async fn cmd_session<A: CatalogApi>(household: &mut Household<A>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_session(household, stdin.lock(), &mut stdout).await
}

pub(crate) async fn run_session<A, R, W>(
    household: &mut Household<A>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    A: CatalogApi,
    R: BufRead,
    W: Write,
{
    match household.refresh().await {
        Ok(()) => writeln!(
            out,
            "Loaded {} recipes and {} groceries. Type 'help' for commands.",
            household.recipes().len(),
            household.groceries().len()
        )?,
        Err(e) => writeln!(out, "Error: {e:#}")?,
    }

    let mut sort = SortState::default();
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("Failed to read input")?;

        let args = match split_args(&line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(e) => {
                writeln!(out, "Error: {e:#}")?;
                continue;
            }
        };
        let command = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match execute(household, &mut sort, command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "Error: {e:#}")?,
        }
    }
    Ok(())
}

async fn execute<A: CatalogApi, W: Write>(
    household: &mut Household<A>,
    sort: &mut SortState,
    command: SessionCommand,
    out: &mut W,
) -> Result<Flow> {
    match command {
        SessionCommand::Refresh => {
            household.refresh().await?;
            writeln!(
                out,
                "Loaded {} recipes and {} groceries",
                household.recipes().len(),
                household.groceries().len()
            )?;
        }
        SessionCommand::Recipes {
            search,
            recipe_type,
            cuisine,
        } => {
            let filter = RecipeFilter {
                search: search.unwrap_or_default(),
                recipe_type: recipe_type.unwrap_or_default(),
                cuisine: cuisine.unwrap_or_default(),
            };
            let mut recipes = filter_recipes(household.recipes(), &filter);
            sort_recipes(&mut recipes, *sort);
            if recipes.is_empty() {
                writeln!(out, "No recipes found")?;
            } else {
                writeln!(out, "{}", recipe_table(&recipes, household.selection()))?;
            }
        }
        SessionCommand::Sort { key } => {
            sort.request(key.into());
            let direction = match sort.order {
                SortOrder::Ascending => "ascending",
                SortOrder::Descending => "descending",
            };
            writeln!(out, "Sorting recipes by {key:?} ({direction})")?;
        }
        SessionCommand::Groceries {
            search,
            grocery_type,
        } => {
            let filter = GroceryFilter {
                search: search.unwrap_or_default(),
                grocery_type: normalize_type_filter(grocery_type.as_deref()),
            };
            let groceries = filter_groceries(household.groceries(), &filter);
            if groceries.is_empty() {
                writeln!(out, "No groceries found")?;
            } else {
                writeln!(out, "{}", grocery_table(&groceries, household.selection()))?;
            }
        }
        SessionCommand::AddRecipe { recipe } => {
            let id = resolve_recipe_id(household, &recipe)?;
            let added = household.select_recipe(&id)?;
            let name = household.recipe(&id).map_or(recipe.as_str(), |r| r.name.as_str());
            writeln!(out, "Added {added} ingredients from {name}")?;
        }
        SessionCommand::AddGrocery { grocery } => {
            let id = resolve_grocery_id(household, &grocery)?;
            let added = household.select_grocery(&id)?;
            let name = household.grocery(&id).map_or(grocery.as_str(), |g| g.name.as_str());
            if added {
                writeln!(out, "Added {name}")?;
            } else {
                writeln!(out, "{name} is already on the shopping list")?;
            }
        }
        SessionCommand::Add { names } => {
            let added = household.selection_mut().add_many(
                names
                    .iter()
                    .map(|name| name.trim())
                    .filter(|name| !name.is_empty()),
            );
            writeln!(out, "Added {added} items")?;
        }
        SessionCommand::Remove { name } => {
            let Some(exact) = household.selection().find(&name).map(|i| i.name.clone()) else {
                bail!("'{name}' is not on the shopping list");
            };
            household.selection_mut().remove(&exact);
            writeln!(out, "Removed {exact}")?;
        }
        SessionCommand::Store { name, store } => {
            let store = store.parse()?;
            let exact = assign_store(household.selection_mut(), &name, store)?;
            writeln!(out, "{exact} → {store}")?;
        }
        SessionCommand::Clear => {
            household.selection_mut().clear_all();
            writeln!(out, "Shopping list cleared")?;
        }
        SessionCommand::List => {
            if household.selection().is_empty() {
                writeln!(out, "Shopping list is empty")?;
            } else {
                writeln!(out, "{}", selection_table(household.selection().items()))?;
            }
        }
        SessionCommand::Shop { out: path } => {
            if household.selection().is_empty() {
                writeln!(out, "Shopping list is empty")?;
                return Ok(Flow::Continue);
            }
            let text = household.shopping_list_text();
            match path {
                Some(path) => {
                    std::fs::write(&path, format!("{text}\n"))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Wrote shopping list to {}", path.display())?;
                }
                None => writeln!(out, "{text}")?,
            }
        }
        SessionCommand::NewGrocery { name, grocery_type } => {
            let created = household.add_grocery(&name, &grocery_type).await?;
            writeln!(
                out,
                "Added grocery: {} [{}] (id: {})",
                created.name, created.grocery_type, created.id
            )?;
        }
        SessionCommand::DeleteGrocery { grocery } => {
            let id = resolve_grocery_id(household, &grocery)?;
            let removed = household.delete_grocery(&id).await?;
            writeln!(out, "Deleted grocery: {} (id: {id})", removed.name)?;
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
