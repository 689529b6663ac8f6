//! Sorting

use super::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// At most one active sort key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Direction for `key` when it is the active sort key.
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        (self.key.as_deref() == Some(key)).then_some(self.direction)
    }

    /// Same key flips the direction, a new key starts ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.reverse();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Asc;
    }
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
    }
}

/// Total order over optional JSON values.
///
/// Numbers compare numerically and strings lexicographically. Values of
/// different kinds order by kind: missing/null, bool, number, string, then
/// arrays and objects (which compare equal among themselves).
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (integer(x), integer(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Exact value of an integer, which `f64` cannot hold above 2^53.
fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Stable in-place sort. Equal keys keep their relative input order in both
/// directions; no active key leaves the order untouched.
pub fn sort_rows(rows: &mut [&Row], sort: &SortState) {
    let Some(key) = sort.key() else {
        return;
    };
    let direction = sort.direction();
    rows.sort_by(|a, b| {
        let ordering = compare_values(a.get(key), b.get(key));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.display("nombre").into_owned()).collect()
    }

    #[test]
    fn test_toggle_cycle() {
        let mut sort = SortState::new();
        sort.toggle("nombre");
        assert_eq!(sort.direction_for("nombre"), Some(SortDirection::Asc));
        sort.toggle("nombre");
        assert_eq!(sort.direction_for("nombre"), Some(SortDirection::Desc));
        sort.toggle("nombre");
        assert_eq!(sort.direction_for("nombre"), Some(SortDirection::Asc));
        sort.toggle("id");
        assert_eq!(sort.key(), Some("id"));
        assert_eq!(sort.direction(), SortDirection::Asc);
        assert_eq!(sort.direction_for("nombre"), None);
    }

    #[test]
    fn test_sort_strings_both_directions() {
        let data: Vec<Row> = ["Beta", "Alfa", "Gamma"]
            .iter()
            .map(|n| Row::new().with("nombre", *n))
            .collect();
        let mut rows: Vec<&Row> = data.iter().collect();

        sort_rows(&mut rows, &SortState::by("nombre", SortDirection::Asc));
        assert_eq!(names(&rows), vec!["Alfa", "Beta", "Gamma"]);

        sort_rows(&mut rows, &SortState::by("nombre", SortDirection::Desc));
        assert_eq!(names(&rows), vec!["Gamma", "Beta", "Alfa"]);
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let data: Vec<Row> = [10, 9, 100].iter().map(|n| Row::new().with("id", *n)).collect();
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, &SortState::by("id", SortDirection::Asc));
        let ids: Vec<_> = rows.iter().map(|r| r.display("id").into_owned()).collect();
        assert_eq!(ids, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_large_integers_keep_exact_order() {
        let data: Vec<Row> = [
            json!(9_007_199_254_740_993_u64),
            json!(9_007_199_254_740_992_u64),
            json!(u64::MAX),
            json!(-1),
            json!(1.5),
        ]
        .into_iter()
        .map(|n| Row::new().with("n", n))
        .collect();
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, &SortState::by("n", SortDirection::Asc));
        let values: Vec<_> = rows.iter().map(|r| r.display("n").into_owned()).collect();
        assert_eq!(
            values,
            vec![
                "-1",
                "1.5",
                "9007199254740992",
                "9007199254740993",
                "18446744073709551615"
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let data = vec![
            Row::new().with("estado", "B").with("nombre", "first"),
            Row::new().with("estado", "A").with("nombre", "second"),
            Row::new().with("estado", "B").with("nombre", "third"),
        ];
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, &SortState::by("estado", SortDirection::Asc));
        assert_eq!(names(&rows), vec!["second", "first", "third"]);
        sort_rows(&mut rows, &SortState::by("estado", SortDirection::Desc));
        assert_eq!(names(&rows), vec!["first", "third", "second"]);
    }

    #[test]
    fn test_mixed_kinds_and_missing_values() {
        let data = vec![
            Row::new().with("nombre", "text").with("v", "x"),
            Row::new().with("nombre", "missing"),
            Row::new().with("nombre", "number").with("v", 3),
            Row::new().with("nombre", "object").with("v", json!({"a": 1})),
        ];
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, &SortState::by("v", SortDirection::Asc));
        assert_eq!(names(&rows), vec!["missing", "number", "text", "object"]);
    }

    #[test]
    fn test_no_key_is_identity() {
        let data = vec![Row::new().with("nombre", "b"), Row::new().with("nombre", "a")];
        let mut rows: Vec<&Row> = data.iter().collect();
        sort_rows(&mut rows, &SortState::new());
        assert_eq!(names(&rows), vec!["b", "a"]);
    }
}
