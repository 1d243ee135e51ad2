//! SQL statement normalization
//!
//! Used by the SQL panel to group statements that differ only in literal
//! values, so duplicates and N+1 patterns can be counted.

use regex::Regex;
use std::sync::LazyLock;

use crate::context::SqlQuery;

/// How many occurrences of the same normalized statement count as a
/// likely N+1 pattern
const N_PLUS_ONE_THRESHOLD: usize = 4;

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)--.*$").unwrap());
static STRING_LITERAL_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"'([^'\\]|\\.)*'").unwrap());
static NUMERIC_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\b").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a statement: strip line comments, replace string and numeric
/// literals with `?`, collapse whitespace, uppercase.
///
/// Two statements that differ only in literal values normalize to the same
/// string:
///
/// ```
/// use axum_debug_toolbar::utils::sql_normalization::normalize_sql;
///
/// assert_eq!(
///     normalize_sql("SELECT * FROM users WHERE id = 7"),
///     normalize_sql("select * from users where id = 812"),
/// );
/// ```
pub fn normalize_sql(sql: &str) -> String {
	let sql = LINE_COMMENT_RE.replace_all(sql, "");
	let sql = STRING_LITERAL_RE.replace_all(&sql, "?");
	let sql = NUMERIC_LITERAL_RE.replace_all(&sql, "?");
	let sql = WHITESPACE_RE.replace_all(&sql, " ");
	sql.to_uppercase().trim().to_string()
}

/// Return the normalized statements that repeat often enough to look like
/// an N+1 pattern, in first-seen order
pub fn detect_n_plus_one(queries: &[SqlQuery]) -> Vec<String> {
	use std::collections::HashMap;

	let mut counts: HashMap<String, usize> = HashMap::new();
	let mut patterns = Vec::new();

	for query in queries {
		let normalized = normalize_sql(&query.sql);
		let count = counts.entry(normalized.clone()).or_insert(0);
		*count += 1;
		if *count == N_PLUS_ONE_THRESHOLD {
			patterns.push(normalized);
		}
	}

	patterns
}
