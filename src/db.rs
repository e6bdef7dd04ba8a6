use sqlx::{Executor, Postgres};

/// Idempotent DDL for the `recipes` table.
///
/// `content_hash` is reserved: nothing writes or reads it yet.
pub const CREATE_RECIPES_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id SERIAL PRIMARY KEY,
        cuisine VARCHAR(255),
        title VARCHAR(255),
        rating FLOAT,
        prep_time INTEGER,
        cook_time INTEGER,
        total_time INTEGER,
        description TEXT,
        nutrients JSONB,
        serves VARCHAR(255),
        content_hash TEXT
    )
"#;

/// Maximum length of the VARCHAR(255) columns, in characters.
pub const VARCHAR_LIMIT: usize = 255;

/// Creates the `recipes` table if it does not exist yet.
pub async fn ensure_schema<'c, E>(executor: E) -> sqlx::Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    executor.execute(CREATE_RECIPES_TABLE_SQL).await?;
    Ok(())
}
