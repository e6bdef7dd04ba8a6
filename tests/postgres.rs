//! End-to-end tests against a real PostgreSQL.
//!
//! Skipped unless `TEST_DATABASE_URL` is set. Every test works inside its own
//! freshly created schema, dropped again at the end.

use std::sync::Arc;

use axum::{body::Body, http::Request};
use recipes_api::{
    app::build_app,
    config::{AppConfig, DatabaseConfig},
    import::{normalize_batch, parse_document, run_import, ImportError},
    recipes::{
        dto::{PageRequest, SortOrder},
        filters::SearchFilters,
        repo_types::Recipe,
        services,
    },
    state::AppState,
};
use serde_json::{json, Value};
use sqlx::{postgres::PgConnectOptions, postgres::PgPoolOptions, Executor, PgPool};
use tower::ServiceExt;

struct TestDb {
    pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    async fn teardown(self) {
        self.pool.close().await;
        let _ = self
            .admin
            .execute(format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema).as_str())
            .await;
        self.admin.close().await;
    }
}

async fn test_db(name: &str) -> Option<TestDb> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping {name}");
        return None;
    };
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .subsec_nanos();
    let schema = format!("recipes_test_{name}_{}_{nanos}", std::process::id());

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect admin pool");
    admin
        .execute(format!("CREATE SCHEMA {schema}").as_str())
        .await
        .expect("create schema");

    let opts: PgConnectOptions = url.parse().expect("parse TEST_DATABASE_URL");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(opts.options([("search_path", schema.as_str())]))
        .await
        .expect("connect test pool");

    Some(TestDb {
        pool,
        admin,
        schema,
    })
}

fn dump() -> Value {
    let mut doc = serde_json::Map::new();
    let fixtures = [
        ("Italian", "Tiramisu", Some(4.9), json!({ "calories": 450 })),
        ("Italian", "Chocolate Cake", Some(4.8), json!({ "calories": 150 })),
        ("italian", "Lasagna", Some(4.7), json!({ "calories": 100 })),
        ("American", "CAKE pops", Some(4.6), json!({ "calories": "200" })),
        ("American", "Pancakes", Some(4.5), json!({ "calories": "389 kcal" })),
        ("Mexican", "Tacos", Some(4.4), json!({})),
        ("Mexican", "Churros", None, json!("not json")),
    ];
    for (i, (cuisine, title, rating, nutrients)) in fixtures.into_iter().enumerate() {
        doc.insert(
            format!("{i}"),
            json!({
                "cuisine": cuisine,
                "title": title,
                "rating": rating,
                "total_time": 10 * (i + 1),
                "nutrients": nutrients,
            }),
        );
    }
    // Filler rows so pagination spans several pages.
    for i in 0..20_i32 {
        doc.insert(
            format!("filler-{i}"),
            json!({
                "cuisine": "Filler",
                "title": format!("Filler {i}"),
                "rating": 1.0 + f64::from(i) * 0.1,
                "total_time": 90,
                "nutrients": { "calories": 1000 + i },
            }),
        );
    }
    doc.insert("broken".into(), json!("not a recipe"));
    Value::Object(doc)
}

async fn import_fixture(db: &TestDb) {
    let bytes = serde_json::to_vec(&dump()).unwrap();
    let batch = normalize_batch(parse_document(&bytes).unwrap());
    let report = run_import(&db.pool, batch).await.expect("import succeeds");
    assert_eq!(report.inserted, 27);
    assert_eq!(report.skipped, 1);
}

fn titles(rows: &[Recipe]) -> Vec<String> {
    rows.iter().map(|r| r.title.clone().unwrap_or_default()).collect()
}

fn page(page: u32, limit: u32, sort: SortOrder) -> PageRequest {
    PageRequest::new(page, limit, sort).unwrap()
}

#[tokio::test]
async fn list_orders_and_paginates_by_rating() {
    let Some(db) = test_db("list").await else { return };
    import_fixture(&db).await;

    let first = services::list_recipes(&db.pool, page(1, 10, SortOrder::Desc))
        .await
        .unwrap();
    assert_eq!(first.total, 27);
    assert_eq!(first.data.len(), 10);
    let ratings: Vec<f64> = first.data.iter().map(|r| r.rating.unwrap()).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(first.data[0].title.as_deref(), Some("Tiramisu"));

    let second = services::list_recipes(&db.pool, page(2, 10, SortOrder::Desc))
        .await
        .unwrap();
    let twenty = services::list_recipes(&db.pool, page(1, 20, SortOrder::Desc))
        .await
        .unwrap();
    let mut union = titles(&first.data);
    union.extend(titles(&second.data));
    assert_eq!(union, titles(&twenty.data));

    let asc = services::list_recipes(&db.pool, page(1, 50, SortOrder::Asc))
        .await
        .unwrap();
    let rated: Vec<f64> = asc.data.iter().filter_map(|r| r.rating).collect();
    assert!(rated.windows(2).all(|w| w[0] <= w[1]));
    // Unrated recipes sort last in both directions.
    assert_eq!(asc.data.last().unwrap().title.as_deref(), Some("Churros"));

    db.teardown().await;
}

#[tokio::test]
async fn search_filters_match_their_predicates() {
    let Some(db) = test_db("search").await else { return };
    import_fixture(&db).await;
    let window = page(1, 50, SortOrder::Desc);

    let unfiltered = services::search_recipes(&db.pool, window, &SearchFilters::default())
        .await
        .unwrap();
    let listed = services::list_recipes(&db.pool, window).await.unwrap();
    assert_eq!(unfiltered.total, listed.total);
    assert_eq!(titles(&unfiltered.data), titles(&listed.data));

    let italian = SearchFilters {
        cuisine: Some("Italian".into()),
        ..Default::default()
    };
    let found = services::search_recipes(&db.pool, window, &italian).await.unwrap();
    assert_eq!(found.total, 2);
    assert!(found
        .data
        .iter()
        .all(|r| r.cuisine.as_deref() == Some("Italian")));

    let cake = SearchFilters {
        title: Some("cake".into()),
        ..Default::default()
    };
    let found = services::search_recipes(&db.pool, window, &cake).await.unwrap();
    assert_eq!(titles(&found.data), vec!["Chocolate Cake", "CAKE pops", "Pancakes"]);

    let calories = SearchFilters {
        calories_min: Some(100.0),
        calories_max: Some(200.0),
        ..Default::default()
    };
    let found = services::search_recipes(&db.pool, window, &calories)
        .await
        .unwrap();
    assert_eq!(found.total, 3);
    assert_eq!(titles(&found.data), vec!["Chocolate Cake", "Lasagna", "CAKE pops"]);

    let quick_and_good = SearchFilters {
        rating_min: Some(4.5),
        total_time_max: Some(30),
        ..Default::default()
    };
    let found = services::search_recipes(&db.pool, page(1, 2, SortOrder::Desc), &quick_and_good)
        .await
        .unwrap();
    assert_eq!(found.total, 3);
    assert_eq!(titles(&found.data), vec!["Tiramisu", "Chocolate Cake"]);

    db.teardown().await;
}

#[tokio::test]
async fn unparsable_nutrients_are_stored_as_empty_mapping() {
    let Some(db) = test_db("nutrients").await else { return };
    import_fixture(&db).await;

    let nutrients: Value =
        sqlx::query_scalar("SELECT nutrients FROM recipes WHERE title = 'Churros'")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(nutrients, json!({}));

    db.teardown().await;
}

#[tokio::test]
async fn search_endpoint_returns_the_envelope() {
    let Some(db) = test_db("http").await else { return };
    import_fixture(&db).await;

    let config = AppConfig {
        database: DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            name: "unused".into(),
            user: "unused".into(),
            password: "unused".into(),
            max_connections: 2,
        },
        frontend_url: "http://localhost:3000".into(),
        app_host: "127.0.0.1".into(),
        app_port: 0,
    };
    let app = build_app(AppState::from_parts(db.pool.clone(), Arc::new(config))).unwrap();
    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/recipes/search?cuisine=Mexican&limit=1&page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(res.status().is_success());
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["data"][0]["title"], "Churros");
    assert_eq!(body["data"][0]["rating"], Value::Null);

    db.teardown().await;
}

#[tokio::test]
async fn batch_without_valid_records_writes_nothing() {
    let Some(db) = test_db("empty").await else { return };

    let batch = normalize_batch(parse_document(br#"{"a": 1, "b": "x"}"#).unwrap());
    let err = run_import(&db.pool, batch).await.unwrap_err();
    assert!(matches!(err, ImportError::NoValidData));

    let table: Option<String> = sqlx::query_scalar("SELECT to_regclass('recipes')::text")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(table, None);

    db.teardown().await;
}

#[tokio::test]
async fn failed_insert_rolls_back_the_whole_batch() {
    let Some(db) = test_db("rollback").await else { return };

    db.pool
        .execute(recipes_api::db::CREATE_RECIPES_TABLE_SQL)
        .await
        .unwrap();
    db.pool
        .execute("ALTER TABLE recipes ADD CONSTRAINT rating_cap CHECK (rating <= 5)")
        .await
        .unwrap();

    let doc = json!({
        "ok": { "title": "Fine", "rating": 4.0 },
        "bad": { "title": "Too good", "rating": 9.0 },
    });
    let batch = normalize_batch(parse_document(&serde_json::to_vec(&doc).unwrap()).unwrap());
    let err = run_import(&db.pool, batch).await.unwrap_err();
    assert!(matches!(err, ImportError::Database(_)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    db.teardown().await;
}
