use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::{
    dto::PageRequest,
    filters::SearchFilters,
    repo_types::{Recipe, RECIPE_COLUMNS},
};

/// `SELECT COUNT(*)` over the rows matching `filters`.
pub fn count_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM recipes");
    filters.push_where(&mut qb);
    qb
}

/// One page of rows matching `filters`, ordered by rating with `id` as tiebreak.
pub fn page_query(filters: &SearchFilters, page: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes"));
    filters.push_where(&mut qb);
    qb.push(" ORDER BY rating ")
        .push(page.sort.as_sql())
        .push(" NULLS LAST, id ASC LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(page.offset());
    qb
}

pub async fn count_matching(conn: &mut PgConnection, filters: &SearchFilters) -> sqlx::Result<i64> {
    let mut qb = count_query(filters);
    let total = qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;
    Ok(total)
}

pub async fn fetch_page(
    conn: &mut PgConnection,
    filters: &SearchFilters,
    page: &PageRequest,
) -> sqlx::Result<Vec<Recipe>> {
    let mut qb = page_query(filters, page);
    let rows = qb.build_query_as::<Recipe>().fetch_all(&mut *conn).await?;
    Ok(rows)
}
