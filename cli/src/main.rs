mod client;
mod commands;
mod config;
mod logging;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::client::CatalogClient;
use crate::commands::{
    ShopRequest, SortArg, cmd_grocery_add, cmd_grocery_delete, cmd_grocery_list, cmd_recipe_edit,
    cmd_recipe_list, cmd_recipe_options, cmd_recipe_show, cmd_session, cmd_shop,
    normalize_type_filter,
};
use crate::config::Config;
use grocer_core::filter::{GroceryFilter, RecipeFilter, SortOrder, SortState};
use grocer_core::service::Household;

#[derive(Parser)]
#[command(
    name = "grocer",
    version,
    about = "Browse household recipes and groceries and build a shopping list"
)]
struct Cli {
    /// Base URL of the recipe/grocery service (overrides `GROCER_API_URL` and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Browse, add and delete groceries
    Groceries {
        #[command(subcommand)]
        command: GroceryCommands,
    },
    /// Build a shopping list and print it grouped by store
    Shop {
        /// Add a recipe's ingredients (ID or name, repeatable)
        #[arg(short, long)]
        recipe: Vec<String>,
        /// Add a grocery (ID or name, repeatable)
        #[arg(short, long)]
        grocery: Vec<String>,
        /// Add a free-text item (repeatable)
        #[arg(short, long)]
        item: Vec<String>,
        /// Assign an item to a store, e.g. "Milk=M" or "Paper Towels=BJ's" (repeatable)
        #[arg(short, long)]
        assign: Vec<String>,
        /// Write the list to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Output the grouped list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session with a shopping list kept in memory
    Session,
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// List recipes
    List {
        /// Match against name, type and cuisine
        #[arg(short, long)]
        search: Option<String>,
        /// Only recipes with this type
        #[arg(short = 't', long = "type")]
        recipe_type: Option<String>,
        /// Only recipes with this cuisine
        #[arg(short, long)]
        cuisine: Option<String>,
        /// Sort column
        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients
    Show {
        /// Recipe ID or name
        recipe: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a recipe and save it to the server
    Edit {
        /// Recipe ID or name
        recipe: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Types, comma-separated (e.g. "Dinner, Lunch")
        #[arg(long = "type")]
        types: Option<String>,
        /// Cuisines, comma-separated
        #[arg(long = "cuisine")]
        cuisines: Option<String>,
        /// Last eaten (YYYY-MM-DD, today or yesterday)
        #[arg(long)]
        last_eaten: Option<String>,
        /// Replace the ingredient list (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Replace the ingredient list from a file, one ingredient per line
        #[arg(long)]
        ingredients_file: Option<PathBuf>,
        /// Recipe link
        #[arg(long)]
        url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the distinct types and cuisines in use
    Options {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GroceryCommands {
    /// List groceries
    List {
        /// Match against name and type
        #[arg(short, long)]
        search: Option<String>,
        /// Only groceries of this type
        #[arg(short = 't', long = "type")]
        grocery_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a grocery to the server
    Add {
        /// Grocery name
        name: String,
        /// Grocery type (e.g. Fruit, Vegetable, "Home Goods")
        #[arg(short = 't', long = "type")]
        grocery_type: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a grocery from the server
    Delete {
        /// Grocery ID or name
        grocery: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);
    let config = Config::load(cli.api_url)?;
    debug!(api_url = %config.api_url, timeout = ?config.timeout, "configuration loaded");
    let client = CatalogClient::new(&config)?;
    let mut household = Household::new(client);

    match cli.command {
        Commands::Recipes { command } => match command {
            RecipeCommands::List {
                search,
                recipe_type,
                cuisine,
                sort,
                desc,
                json,
            } => {
                let filter = RecipeFilter {
                    search: search.unwrap_or_default(),
                    recipe_type: recipe_type.unwrap_or_default(),
                    cuisine: cuisine.unwrap_or_default(),
                };
                let sort = SortState {
                    key: sort.into(),
                    order: if desc {
                        SortOrder::Descending
                    } else {
                        SortOrder::Ascending
                    },
                };
                cmd_recipe_list(&mut household, &filter, sort, json).await
            }
            RecipeCommands::Show { recipe, json } => {
                cmd_recipe_show(&mut household, &recipe, json).await
            }
            RecipeCommands::Edit {
                recipe,
                name,
                types,
                cuisines,
                last_eaten,
                ingredients,
                ingredients_file,
                url,
                json,
            } => {
                cmd_recipe_edit(
                    &mut household,
                    &recipe,
                    name,
                    types.as_deref(),
                    cuisines.as_deref(),
                    last_eaten.as_deref(),
                    ingredients,
                    ingredients_file.as_deref(),
                    url,
                    json,
                )
                .await
            }
            RecipeCommands::Options { json } => cmd_recipe_options(&mut household, json).await,
        },
        Commands::Groceries { command } => match command {
            GroceryCommands::List {
                search,
                grocery_type,
                json,
            } => {
                let filter = GroceryFilter {
                    search: search.unwrap_or_default(),
                    grocery_type: normalize_type_filter(grocery_type.as_deref()),
                };
                cmd_grocery_list(&mut household, &filter, json).await
            }
            GroceryCommands::Add {
                name,
                grocery_type,
                json,
            } => cmd_grocery_add(&mut household, &name, &grocery_type, json).await,
            GroceryCommands::Delete { grocery, json } => {
                cmd_grocery_delete(&mut household, &grocery, json).await
            }
        },
        Commands::Shop {
            recipe,
            grocery,
            item,
            assign,
            out,
            json,
        } => {
            let request = ShopRequest {
                recipes: &recipe,
                groceries: &grocery,
                items: &item,
                assignments: &assign,
            };
            cmd_shop(&mut household, &request, out.as_deref(), json).await
        }
        Commands::Session => cmd_session(&mut household).await,
    }
}
