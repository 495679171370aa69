//! Row: an ordered column-name to value mapping

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::value::Value;

/// One record produced by a row generator.
///
/// Column names are unique and case-sensitive keys. Lookups try the exact
/// name first and fall back to a case-insensitive match. Column order is
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty row with room for `capacity` columns
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Sets a column, replacing the value of an existing column with the
    /// exact same name (position is kept).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Builder form of [`Row::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Looks up a column, exact name first, then case-insensitively
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.columns[i].1)
    }

    /// Returns the stored name of a column (resolving case differences)
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.columns[i].0.as_str())
    }

    /// Returns true if the column exists under any casing
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|(k, _)| k == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|(k, _)| k.eq_ignore_ascii_case(name))
            })
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Builds a row from a JSON object.
    ///
    /// Returns `None` if `json` is not an object. Columns follow the
    /// object's key iteration order.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        let object = json.as_object()?;
        let mut row = Row::with_capacity(object.len());
        for (key, value) in object {
            row.insert(key.clone(), Value::from(value.clone()));
        }
        Some(row)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in &self.columns {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive_fallback() {
        let row = Row::new().with("Name", "sshd").with("pid", 22);
        assert_eq!(row.get("Name"), Some(&Value::from("sshd")));
        assert_eq!(row.get("name"), Some(&Value::from("sshd")));
        assert_eq!(row.get("PID"), Some(&Value::Integer(22)));
        assert_eq!(row.resolve_name("NAME"), Some("Name"));
        assert!(row.get("uid").is_none());
    }

    #[test]
    fn test_exact_match_wins() {
        let row = Row::new().with("path", "lower").with("PATH", "upper");
        assert_eq!(row.get("PATH"), Some(&Value::from("upper")));
        assert_eq!(row.get("path"), Some(&Value::from("lower")));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut row = Row::new().with("a", 1).with("b", 2);
        row.insert("a", 10);
        let names: Vec<_> = row.column_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::Integer(10)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_from_json_object() {
        let row = Row::from_json(&json!({"pid": 1, "name": "init", "parent": null})).unwrap();
        assert_eq!(row.get("pid"), Some(&Value::Integer(1)));
        assert_eq!(row.get("parent"), Some(&Value::Null));
        assert!(Row::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_from_json_keeps_key_order() {
        let row = Row::from_json(&json!({"pid": 1, "name": "init", "cmdline": "x"})).unwrap();
        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["pid", "name", "cmdline"]);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let row = Row::new().with("z", 1).with("a", "x");
        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(text, r#"{"z":1,"a":"x"}"#);
    }
}
