use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use grocer_core::models::{GroceryItem, Recipe, SelectionItem, Store};
use grocer_core::selection::Selection;

/// Parse a last-eaten date: `YYYY-MM-DD`, `today` or `yesterday`.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    match s.trim() {
        "today" => Ok(Local::now().date_naive()),
        "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
        other => grocer_core::models::parse_last_eaten(other)
            .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")),
    }
}

/// Parse `NAME=STORE`, e.g. `Milk=M` or `"Paper Towels=BJ's"`.
pub(crate) fn parse_assignment(s: &str) -> Result<(String, Store)> {
    let Some((name, store)) = s.rsplit_once('=') else {
        bail!("Invalid assignment '{s}'. Use NAME=STORE (e.g. 'Milk=M')");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid assignment '{s}'. Item name is empty");
    }
    Ok((name.to_string(), store.parse()?))
}

/// Assign a store to the entry matching `name` case-insensitively. Returns the
/// entry's stored spelling.
pub(crate) fn assign_store(selection: &mut Selection, name: &str, store: Store) -> Result<String> {
    let Some(exact) = selection.find(name).map(|item| item.name.clone()) else {
        bail!("'{name}' is not on the shopping list");
    };
    selection.set_store(&exact, store);
    Ok(exact)
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s
            .char_indices()
            .nth(max.saturating_sub(3))
            .map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

fn listed(selected: bool) -> String {
    if selected { "✓".to_string() } else { String::new() }
}

pub(crate) fn recipe_table(recipes: &[&Recipe], selection: &Selection) -> String {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Recipe")]
        name: String,
        #[tabled(rename = "Type")]
        types: String,
        #[tabled(rename = "Cuisine")]
        cuisines: String,
        #[tabled(rename = "Last Eaten")]
        last_eaten: String,
        #[tabled(rename = "Ingredients")]
        ingredients: usize,
        #[tabled(rename = "Listed")]
        listed: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id.to_string(),
            name: truncate(&r.name, 35),
            types: truncate(&r.types.join(", "), 25),
            cuisines: truncate(&r.cuisines.join(", "), 25),
            last_eaten: r.last_eaten.clone(),
            ingredients: r.ingredients.len(),
            listed: listed(selection.is_recipe_selected(r)),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(5..6)).with(Alignment::right()))
        .to_string()
}

pub(crate) fn grocery_table(groceries: &[&GroceryItem], selection: &Selection) -> String {
    #[derive(Tabled)]
    struct GroceryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        grocery_type: String,
        #[tabled(rename = "Listed")]
        listed: String,
    }

    let rows: Vec<GroceryRow> = groceries
        .iter()
        .map(|g| GroceryRow {
            id: g.id.to_string(),
            name: truncate(&g.name, 35),
            grocery_type: g.grocery_type.clone(),
            listed: listed(selection.is_grocery_selected(g)),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

pub(crate) fn selection_table(items: &[SelectionItem]) -> String {
    #[derive(Tabled)]
    struct SelectionRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "Store")]
        store: String,
    }

    let rows: Vec<SelectionRow> = items
        .iter()
        .enumerate()
        .map(|(i, item)| SelectionRow {
            idx: i + 1,
            name: item.name.clone(),
            store: item
                .store
                .map(|s| format!("{} ({})", s.display_name(), s.code()))
                .unwrap_or_default(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

pub(crate) fn recipe_detail(recipe: &Recipe) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} (id: {})\n", recipe.name, recipe.id));
    if !recipe.types.is_empty() {
        out.push_str(&format!("Type:       {}\n", recipe.types.join(", ")));
    }
    if !recipe.cuisines.is_empty() {
        out.push_str(&format!("Cuisine:    {}\n", recipe.cuisines.join(", ")));
    }
    if !recipe.last_eaten.is_empty() {
        out.push_str(&format!("Last eaten: {}\n", recipe.last_eaten));
    }
    if let Some(url) = recipe.link() {
        out.push_str(&format!("Link:       {url}\n"));
    }
    if recipe.ingredients.is_empty() {
        out.push_str("No ingredients listed\n");
    } else {
        out.push_str("Ingredients:\n");
        for ingredient in &recipe.ingredients {
            out.push_str(&format!("  - {ingredient}\n"));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert_eq!(
            parse_date("yesterday").unwrap(),
            today - chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("nope").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let (name, store) = parse_assignment("Milk=M").unwrap();
        assert_eq!(name, "Milk");
        assert_eq!(store, Store::Meijer);

        let (name, store) = parse_assignment("Paper Towels = BJ's").unwrap();
        assert_eq!(name, "Paper Towels");
        assert_eq!(store, Store::Bjs);

        assert!(parse_assignment("Milk").is_err());
        assert!(parse_assignment("=M").is_err());
        assert!(parse_assignment("Milk=Costco").is_err());
    }

    #[test]
    fn test_assign_store_matches_case_insensitively() {
        let mut selection = Selection::new();
        selection.add("Milk");
        let exact = assign_store(&mut selection, "milk", Store::FreshThyme).unwrap();
        assert_eq!(exact, "Milk");
        assert_eq!(selection.items()[0].store, Some(Store::FreshThyme));
        assert!(assign_store(&mut selection, "Bread", Store::Meijer).is_err());
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Not found"), r#"{"error":"Not found"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate("hello", 2), "...");
        assert_eq!(truncate("hello", 0), "...");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Jalapeño", 10), "Jalapeño");
    }

    #[test]
    fn test_recipe_detail() {
        let recipe = Recipe {
            id: "r1".into(),
            name: "Tacos".to_string(),
            types: vec!["Dinner".to_string(), "Lunch".to_string()],
            cuisines: vec![],
            last_eaten: "2024-03-01".to_string(),
            ingredients: vec!["Tortillas".to_string()],
            url: String::new(),
        };
        assert_eq!(
            recipe_detail(&recipe),
            "Tacos (id: r1)\nType:       Dinner, Lunch\nLast eaten: 2024-03-01\nIngredients:\n  - Tortillas"
        );
    }

    #[test]
    fn test_selection_table_shows_store() {
        let items = vec![SelectionItem {
            name: "Milk".to_string(),
            store: Some(Store::Meijer),
        }];
        let table = selection_table(&items);
        assert!(table.contains("Milk"));
        assert!(table.contains("Meijer (M)"));
    }
}
