//! Dotted field paths into JSON documents (`stats.lastListenedStoryId`)

use audiostories_core::{AppError, Result};
use serde_json::{Map, Value};

/// Looks up the value at `path`, if every segment exists
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Writes `new_value` at `path`.
///
/// Missing or null parents are created as empty objects. Fails if a parent
/// exists but holds a non-object value.
pub fn set(value: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid_path(path, "empty segment"));
    }
    let last = segments.pop().ok_or_else(|| invalid_path(path, "empty path"))?;

    let mut current = value;
    for key in segments {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let object = current
            .as_object_mut()
            .ok_or_else(|| invalid_path(path, &format!("'{}' has a non-object parent", key)))?;
        current = object.entry(key.to_string()).or_insert(Value::Null);
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    current
        .as_object_mut()
        .ok_or_else(|| invalid_path(path, &format!("'{}' has a non-object parent", last)))?
        .insert(last.to_string(), new_value);

    Ok(())
}

fn invalid_path(path: &str, reason: &str) -> AppError {
    AppError::InvalidArgument {
        argument: format!("field path '{}'", path),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let doc = json!({"stats": {"storyStats": {"s1": 2}}});
        assert_eq!(get(&doc, "stats.storyStats.s1"), Some(&json!(2)));
        assert_eq!(get(&doc, "stats.missing"), None);
        assert_eq!(get(&doc, "name"), None);
    }

    #[test]
    fn test_set_existing_field() {
        let mut doc = json!({"stats": {"lastListenedStoryId": null}});
        set(&mut doc, "stats.lastListenedStoryId", json!("s1")).unwrap();
        assert_eq!(doc["stats"]["lastListenedStoryId"], "s1");
    }

    #[test]
    fn test_set_creates_missing_and_null_parents() {
        let mut doc = json!({"stats": null});
        set(&mut doc, "stats.lastListenedStoryId", json!("s2")).unwrap();
        assert_eq!(doc, json!({"stats": {"lastListenedStoryId": "s2"}}));

        let mut empty = json!({});
        set(&mut empty, "a.b.c", json!(1)).unwrap();
        assert_eq!(empty["a"]["b"]["c"], 1);
    }

    #[test]
    fn test_set_rejects_scalar_parent() {
        let mut doc = json!({"stats": 5});
        assert!(set(&mut doc, "stats.lastListenedStoryId", json!("s1")).is_err());
        assert_eq!(doc, json!({"stats": 5}));
    }

    #[test]
    fn test_set_rejects_empty_segments() {
        let mut doc = json!({});
        assert!(set(&mut doc, "", json!(1)).is_err());
        assert!(set(&mut doc, "stats..x", json!(1)).is_err());
    }
}
