use axum::{
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    recipes::dto::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT},
    state::AppState,
};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/openapi.json";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route(DOCS_PATH, get(docs_page))
        .route(OPENAPI_PATH, get(openapi_json))
}

/// GET / → 307 to the API documentation.
pub async fn root() -> Redirect {
    Redirect::temporary(DOCS_PATH)
}

pub async fn docs_page() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <title>Recipes API</title>
  <meta charset="utf-8"/>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    SwaggerUIBundle({{ url: "{OPENAPI_PATH}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>"##
    ))
}

pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

fn query_param(name: &str, schema: Value, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": schema,
    })
}

fn pagination_params() -> Vec<Value> {
    vec![
        query_param(
            "page",
            json!({ "type": "integer", "minimum": 1, "default": DEFAULT_PAGE }),
            "1-based page number",
        ),
        query_param(
            "limit",
            json!({ "type": "integer", "minimum": 1, "maximum": MAX_LIMIT, "default": DEFAULT_LIMIT }),
            "Rows per page",
        ),
        query_param(
            "sort",
            json!({ "type": "string", "enum": ["asc", "desc"], "default": "desc" }),
            "Rating order",
        ),
    ]
}

fn envelope_responses() -> Value {
    json!({
        "200": {
            "description": "Page of recipes",
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/RecipePage" } } }
        },
        "422": {
            "description": "Invalid query parameters",
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
        },
        "500": {
            "description": "Query failed",
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
        }
    })
}

pub fn openapi_document() -> Value {
    let mut search_params = pagination_params();
    search_params.extend([
        query_param("calories_min", json!({ "type": "number" }), "Minimum nutrients.calories"),
        query_param("calories_max", json!({ "type": "number" }), "Maximum nutrients.calories"),
        query_param("cuisine", json!({ "type": "string" }), "Exact cuisine"),
        query_param("title", json!({ "type": "string" }), "Case-insensitive title substring"),
        query_param("rating_min", json!({ "type": "number" }), "Minimum rating"),
        query_param("rating_max", json!({ "type": "number" }), "Maximum rating"),
        query_param("total_time_min", json!({ "type": "integer" }), "Minimum total time (minutes)"),
        query_param("total_time_max", json!({ "type": "integer" }), "Maximum total time (minutes)"),
    ]);

    let nullable = |ty: &str| json!({ "type": ty, "nullable": true });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Recipes API",
            "description": "API for browsing and searching recipes",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/api/recipes": {
                "get": {
                    "summary": "List recipes ordered by rating",
                    "parameters": pagination_params(),
                    "responses": envelope_responses(),
                }
            },
            "/api/recipes/search": {
                "get": {
                    "summary": "Search recipes",
                    "parameters": search_params,
                    "responses": envelope_responses(),
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness probe",
                    "responses": { "200": { "description": "ok" } },
                }
            }
        },
        "components": {
            "schemas": {
                "Recipe": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "cuisine": nullable("string"),
                        "title": nullable("string"),
                        "rating": nullable("number"),
                        "prep_time": nullable("integer"),
                        "cook_time": nullable("integer"),
                        "total_time": nullable("integer"),
                        "description": nullable("string"),
                        "nutrients": { "type": "object", "nullable": true, "additionalProperties": true },
                        "serves": nullable("string"),
                        "content_hash": nullable("string"),
                    }
                },
                "RecipePage": {
                    "type": "object",
                    "required": ["total", "page", "limit", "data"],
                    "properties": {
                        "total": { "type": "integer" },
                        "page": { "type": "integer" },
                        "limit": { "type": "integer" },
                        "data": { "type": "array", "items": { "$ref": "#/components/schemas/Recipe" } },
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "detail": { "type": "string" } }
                }
            }
        }
    })
}
