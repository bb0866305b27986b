use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HouseholdError;

/// A service-assigned id. The service may hand out numbers or strings; the
/// form received is the form written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Compares against the id as typed by a user or found in a URL path.
impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        match self {
            RecordId::Number(n) => n.to_string() == other,
            RecordId::Text(s) => s == other,
        }
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// A recipe as served by `/recipes`.
///
/// `type` and `cuisine` arrive either as a comma-separated string or as an
/// array of strings; both are normalized into ordered lists here and joined
/// back into a single string when sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_nullable")]
    pub name: String,
    #[serde(rename = "type", default, with = "multi_value")]
    pub types: Vec<String>,
    #[serde(rename = "cuisine", default, with = "multi_value")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "de_nullable")]
    pub last_eaten: String,
    #[serde(default, deserialize_with = "de_nullable_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "de_nullable")]
    pub url: String,
}

impl Recipe {
    /// Link to the recipe source, if one is set.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_nullable")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "de_nullable")]
    pub grocery_type: String,
}

/// Body of `POST /groceries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGroceryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub grocery_type: String,
}

impl NewGroceryItem {
    /// Validate user input for a new grocery. The name is trimmed and must be
    /// non-empty; the type must be one of [`GroceryType::ALL`].
    pub fn new(name: &str, grocery_type: &str) -> Result<Self, HouseholdError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HouseholdError::Invalid(
                "Grocery name must not be empty".to_string(),
            ));
        }
        if grocery_type.trim().is_empty() {
            return Err(HouseholdError::Invalid(
                "Grocery type must not be empty".to_string(),
            ));
        }
        let grocery_type: GroceryType = grocery_type.parse()?;
        Ok(Self {
            name: name.to_string(),
            grocery_type: grocery_type.wire_value(),
        })
    }
}

/// The closed list of grocery categories. The service stores them lower-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroceryType {
    Fruit,
    Vegetable,
    Meat,
    HomeGoods,
    Grain,
    Legume,
    NutsSeeds,
    Condiments,
    Seafood,
    Snacks,
    Cereal,
    Dessert,
    Bread,
}

impl GroceryType {
    pub const ALL: [GroceryType; 13] = [
        GroceryType::Fruit,
        GroceryType::Vegetable,
        GroceryType::Meat,
        GroceryType::HomeGoods,
        GroceryType::Grain,
        GroceryType::Legume,
        GroceryType::NutsSeeds,
        GroceryType::Condiments,
        GroceryType::Seafood,
        GroceryType::Snacks,
        GroceryType::Cereal,
        GroceryType::Dessert,
        GroceryType::Bread,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GroceryType::Fruit => "Fruit",
            GroceryType::Vegetable => "Vegetable",
            GroceryType::Meat => "Meat",
            GroceryType::HomeGoods => "Home Goods",
            GroceryType::Grain => "Grain",
            GroceryType::Legume => "Legume",
            GroceryType::NutsSeeds => "Nuts/Seeds",
            GroceryType::Condiments => "Condiments",
            GroceryType::Seafood => "Seafood",
            GroceryType::Snacks => "Snacks",
            GroceryType::Cereal => "Cereal",
            GroceryType::Dessert => "Dessert",
            GroceryType::Bread => "Bread",
        }
    }

    #[must_use]
    pub fn wire_value(self) -> String {
        self.label().to_lowercase()
    }
}

impl fmt::Display for GroceryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GroceryType {
    type Err = HouseholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        GroceryType::ALL
            .into_iter()
            .find(|t| t.wire_value() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = GroceryType::ALL.iter().map(|t| t.label()).collect();
                HouseholdError::Invalid(format!(
                    "Unknown grocery type '{s}'. Valid types: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// One of the four stores a shopping-list entry can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Store {
    #[serde(rename = "M")]
    Meijer,
    #[serde(rename = "BJ")]
    Bjs,
    #[serde(rename = "FT")]
    FreshThyme,
    #[serde(rename = "P")]
    Papaya,
}

impl Store {
    pub const ALL: [Store; 4] = [Store::Meijer, Store::Bjs, Store::FreshThyme, Store::Papaya];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Store::Meijer => "M",
            Store::Bjs => "BJ",
            Store::FreshThyme => "FT",
            Store::Papaya => "P",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Store::Meijer => "Meijer",
            Store::Bjs => "BJ's",
            Store::FreshThyme => "Fresh Thyme",
            Store::Papaya => "Papaya",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Store {
    type Err = HouseholdError;

    /// Accepts either the short code (`M`, `BJ`, `FT`, `P`) or the display
    /// name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Store::ALL
            .into_iter()
            .find(|st| {
                st.code().to_lowercase() == wanted || st.display_name().to_lowercase() == wanted
            })
            .ok_or_else(|| {
                HouseholdError::Invalid(format!(
                    "Unknown store '{s}'. Use M (Meijer), BJ (BJ's), FT (Fresh Thyme) or P (Papaya)"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub name: String,
    pub store: Option<Store>,
}

/// Replacement values for a recipe edit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeEdit {
    pub name: Option<String>,
    pub types: Option<Vec<String>>,
    pub cuisines: Option<Vec<String>>,
    pub last_eaten: Option<NaiveDate>,
    pub ingredients: Option<Vec<String>>,
    pub url: Option<String>,
}

impl RecipeEdit {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == RecipeEdit::default()
    }

    #[must_use]
    pub fn apply_to(&self, recipe: &Recipe) -> Recipe {
        let mut edited = recipe.clone();
        if let Some(name) = &self.name {
            edited.name = name.trim().to_string();
        }
        if let Some(types) = &self.types {
            edited.types.clone_from(types);
        }
        if let Some(cuisines) = &self.cuisines {
            edited.cuisines.clone_from(cuisines);
        }
        if let Some(date) = self.last_eaten {
            edited.last_eaten = date.format("%Y-%m-%d").to_string();
        }
        if let Some(ingredients) = &self.ingredients {
            edited.ingredients.clone_from(ingredients);
        }
        if let Some(url) = &self.url {
            edited.url = url.trim().to_string();
        }
        edited
    }
}

/// Split a comma-separated multi-value field into trimmed, non-empty parts.
#[must_use]
pub fn split_multi_value(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// One ingredient per line; blank lines are dropped.
#[must_use]
pub fn parse_ingredients_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_last_eaten(s: &str) -> Result<NaiveDate, HouseholdError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        HouseholdError::Invalid(format!("Invalid date '{s}'. Use YYYY-MM-DD"))
    })
}

fn de_nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

mod multi_value {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        List(Vec<Option<String>>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Raw::Joined(s)) => super::split_multi_value(&s),
            Some(Raw::List(values)) => values
                .into_iter()
                .flatten()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
        })
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S>(values: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&values.join(", "))
    }
}
