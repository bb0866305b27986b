//! In-process stand-in for the recipe/grocery service, served by axum on an
//! ephemeral local port.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde_json::{Value, json};

use crate::client::CatalogClient;
use crate::config::Config;

#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    recipes: Arc<Mutex<Vec<Value>>>,
    groceries: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicU64>,
}

impl FakeBackend {
    pub(crate) fn with_sample_data() -> Self {
        let backend = FakeBackend {
            next_id: Arc::new(AtomicU64::new(100)),
            ..FakeBackend::default()
        };
        *backend.recipes.lock().unwrap() = vec![
            json!({
                "id": "r1",
                "name": "Tacos",
                "type": "Dinner, Lunch",
                "cuisine": "Mexican",
                "lastEaten": "2024-03-01",
                "ingredients": ["Tortillas", "Ground Beef", "Salsa"],
                "url": "https://example.com/tacos"
            }),
            json!({
                "id": "r2",
                "name": "Carbonara",
                "type": ["Dinner"],
                "cuisine": "Italian",
                "lastEaten": "2024-01-15",
                "ingredients": ["Spaghetti", "Eggs", "salsa"],
                "url": ""
            }),
            json!({
                "id": 3,
                "name": "Oatmeal",
                "type": "Breakfast",
                "cuisine": null,
                "lastEaten": null,
                "ingredients": ["Oats", "Milk"],
                "url": null
            }),
        ];
        *backend.groceries.lock().unwrap() = vec![
            json!({ "id": "g1", "name": "Milk", "type": "dairy" }),
            json!({ "id": "g2", "name": "Paper Towels", "type": "home goods" }),
        ];
        backend
    }

    pub(crate) fn recipe_json(&self, id: &str) -> Option<Value> {
        self.recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| id_matches(&r["id"], id))
            .cloned()
    }

    pub(crate) fn grocery_count(&self) -> usize {
        self.groceries.lock().unwrap().len()
    }

    /// Serve this backend and return its base URL.
    pub(crate) async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/recipes", get(list_recipes))
            .route("/recipes/{id}", put(update_recipe))
            .route("/groceries", get(list_groceries).post(add_grocery))
            .route("/groceries/{id}", delete(delete_grocery))
            .with_state(self.clone());
        serve(app).await
    }
}

/// Path segments are text; stored ids may be JSON numbers.
fn id_matches(stored: &Value, id: &str) -> bool {
    match stored {
        Value::String(s) => s == id,
        other => other.to_string() == id,
    }
}

async fn list_recipes(State(backend): State<FakeBackend>) -> Json<Vec<Value>> {
    Json(backend.recipes.lock().unwrap().clone())
}

async fn update_recipe(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut recipes = backend.recipes.lock().unwrap();
    let slot = recipes
        .iter_mut()
        .find(|r| id_matches(&r["id"], &id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = body.clone();
    Ok(Json(body))
}

async fn list_groceries(State(backend): State<FakeBackend>) -> Json<Vec<Value>> {
    Json(backend.groceries.lock().unwrap().clone())
}

async fn add_grocery(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = backend.next_id.fetch_add(1, Ordering::SeqCst);
    let created = json!({ "id": id, "name": body["name"], "type": body["type"] });
    backend.groceries.lock().unwrap().push(created.clone());
    (StatusCode::CREATED, Json(created))
}

async fn delete_grocery(State(backend): State<FakeBackend>, Path(id): Path<String>) -> StatusCode {
    let mut groceries = backend.groceries.lock().unwrap();
    let before = groceries.len();
    groceries.retain(|g| !id_matches(&g["id"], &id));
    if groceries.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// A backend that answers every request with HTTP 500.
pub(crate) async fn spawn_failing_backend() -> String {
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    serve(app).await
}

/// A base URL nothing is listening on.
pub(crate) async fn unused_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) fn client_for(base_url: &str) -> CatalogClient {
    CatalogClient::new(&Config {
        api_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}
