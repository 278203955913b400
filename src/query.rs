//! Small query-building helpers over sea-query expressions.

use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

const LIKE_ESCAPE: char = '\\';

/// Escapes `%`, `_` and the escape character itself so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match, portable across Postgres and SQLite.
pub fn contains_ci<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Case-insensitive equality.
pub fn equals_ci<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column.as_column_ref()))).eq(value.to_lowercase())
}

/// `OR` of [`contains_ci`] across several columns.
pub fn any_contains_ci<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    columns
        .iter()
        .fold(Condition::any(), |cond, col| cond.add(contains_ci(*col, term)))
}

/// Case-insensitive membership test on a JSON string-array column.
/// Matches the serialized element text, so it works on Postgres `json` and SQLite alike.
pub fn json_array_contains_ci<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    let element = serde_json::Value::String(value.to_lowercase()).to_string();
    let pattern = format!("%{}%", escape_like(&element));
    Expr::expr(Func::lower(
        Expr::col(column.as_column_ref()).cast_as(Alias::new("text")),
    ))
    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}
