//! Translation of optional search parameters into a parameterized `WHERE` clause.
//!
//! Every supplied parameter yields exactly one [`Predicate`]. Predicates are
//! emitted in a fixed order and joined with `AND`; with none supplied the
//! clause is `WHERE TRUE`. Only column expressions and operators are written
//! into the SQL text, user values always go through `push_bind`.

use sqlx::{Postgres, QueryBuilder};

/// Numeric `calories` entry of the `nutrients` document.
///
/// Evaluates to NULL unless the entry is a JSON number or a string holding a
/// plain decimal number, so such rows never match a bound instead of failing
/// the cast.
pub const CALORIES_EXPR: &str = r"(CASE WHEN jsonb_typeof(nutrients->'calories') = 'number' OR (nutrients->>'calories') ~ '^\s*-?[0-9]+(\.[0-9]+)?\s*$' THEN (nutrients->>'calories')::float8 END)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
    Equals,
    ContainsIgnoreCase,
}

impl Comparison {
    pub fn operator(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
            Comparison::Equals => "=",
            Comparison::ContainsIgnoreCase => "ILIKE",
        }
    }
}

/// Value bound to a predicate's placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Float(f64),
    Int(i32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub expr: &'static str,
    pub comparison: Comparison,
    pub value: BoundValue,
}

impl Predicate {
    fn new(expr: &'static str, comparison: Comparison, value: BoundValue) -> Self {
        Self {
            expr,
            comparison,
            value,
        }
    }
}

/// Optional filters accepted by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub calories_min: Option<f64>,
    pub calories_max: Option<f64>,
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub total_time_min: Option<i32>,
    pub total_time_max: Option<i32>,
}

impl SearchFilters {
    /// Predicates for the supplied parameters, in their fixed order.
    ///
    /// Empty `cuisine` and `title` strings count as not supplied.
    pub fn predicates(&self) -> Vec<Predicate> {
        use BoundValue::{Float, Int, Text};
        use Comparison::{AtLeast, AtMost, ContainsIgnoreCase, Equals};

        [
            self.calories_min
                .map(|v| Predicate::new(CALORIES_EXPR, AtLeast, Float(v))),
            self.calories_max
                .map(|v| Predicate::new(CALORIES_EXPR, AtMost, Float(v))),
            non_empty(&self.cuisine)
                .map(|v| Predicate::new("cuisine", Equals, Text(v.to_string()))),
            non_empty(&self.title).map(|v| {
                Predicate::new(
                    "title",
                    ContainsIgnoreCase,
                    Text(format!("%{}%", escape_like(v))),
                )
            }),
            self.rating_min
                .map(|v| Predicate::new("rating", AtLeast, Float(v))),
            self.rating_max
                .map(|v| Predicate::new("rating", AtMost, Float(v))),
            self.total_time_min
                .map(|v| Predicate::new("total_time", AtLeast, Int(v))),
            self.total_time_max
                .map(|v| Predicate::new("total_time", AtMost, Int(v))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Appends ` WHERE ...` to `qb`, binding every predicate value.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let predicates = self.predicates();
        qb.push(" WHERE ");
        if predicates.is_empty() {
            qb.push("TRUE");
            return;
        }

        for (i, predicate) in predicates.into_iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            qb.push(predicate.expr)
                .push(" ")
                .push(predicate.comparison.operator())
                .push(" ");
            match predicate.value {
                BoundValue::Float(v) => qb.push_bind(v),
                BoundValue::Int(v) => qb.push_bind(v),
                BoundValue::Text(v) => qb.push_bind(v),
            };
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Escapes `LIKE` metacharacters so `needle` matches literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
