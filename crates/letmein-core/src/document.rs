// ── Typed document accessor ──
//
// Path-based, read-only access to a parsed JSON tree. Paths are
// dot-separated object keys (`"accessDevice.vlan"`); the empty path is the
// root. Typed getters fail with `DocumentError` instead of guessing when a
// value has the wrong shape.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Failure to read a value at a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("no value at '{path}'")]
    Missing { path: String },

    #[error("expected {expected} at '{path}', found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// JSON type name used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A borrowed view of a JSON document, or of a subtree of one.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    root: &'a Value,
}

impl<'a> Document<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// The underlying value of this (sub)document.
    pub fn value(&self) -> &'a Value {
        self.root
    }

    fn lookup(&self, path: &str) -> Option<&'a Value> {
        if path.is_empty() {
            return Some(self.root);
        }
        path.split('.')
            .try_fold(self.root, |node, key| node.as_object()?.get(key))
    }

    /// `true` if a non-null value lives at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(|v| !v.is_null())
    }

    /// The value at `path`. Explicit `null` counts as missing.
    pub fn get(&self, path: &str) -> Result<&'a Value, DocumentError> {
        match self.lookup(path) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(DocumentError::Missing { path: path.into() }),
        }
    }

    pub fn get_str(&self, path: &str) -> Result<&'a str, DocumentError> {
        let value = self.get(path)?;
        value.as_str().ok_or_else(|| mismatch(path, "string", value))
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, DocumentError> {
        let value = self.get(path)?;
        value.as_bool().ok_or_else(|| mismatch(path, "boolean", value))
    }

    /// Elements of the array at `path`, in document order.
    pub fn children(&self, path: &str) -> Result<Vec<Document<'a>>, DocumentError> {
        let value = self.get(path)?;
        let items = value.as_array().ok_or_else(|| mismatch(path, "array", value))?;
        Ok(items.iter().map(Document::new).collect())
    }

    /// Members of the object at `path`, keyed by member name.
    pub fn children_by_key(
        &self,
        path: &str,
    ) -> Result<BTreeMap<&'a str, Document<'a>>, DocumentError> {
        let value = self.get(path)?;
        let members = value.as_object().ok_or_else(|| mismatch(path, "object", value))?;
        Ok(members
            .iter()
            .map(|(k, v)| (k.as_str(), Document::new(v)))
            .collect())
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> DocumentError {
    DocumentError::TypeMismatch {
        path: path.into(),
        expected,
        found: type_name(found),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "devices": {
                "of:01": { "accessDevice": { "vlan": 6, "uplink": "2" } },
                "of:02": { "basic": { "driver": "ovs" } }
            },
            "ports": [ { "port": "1" }, { "port": "local" } ],
            "flag": true,
            "empty": null
        })
    }

    #[test]
    fn nested_paths_resolve() {
        let root = sample();
        let doc = Document::new(&root);
        assert!(doc.exists("devices"));
        assert!(!doc.exists("devices.of:03"));
        assert_eq!(doc.get("devices.of:01.accessDevice.vlan").unwrap(), &json!(6));
        assert_eq!(doc.get_str("devices.of:01.accessDevice.uplink").unwrap(), "2");
        assert!(doc.get_bool("flag").unwrap());
    }

    #[test]
    fn null_is_missing() {
        let root = sample();
        let doc = Document::new(&root);
        assert!(!doc.exists("empty"));
        assert_eq!(
            doc.get("empty").unwrap_err(),
            DocumentError::Missing { path: "empty".into() }
        );
    }

    #[test]
    fn empty_path_is_root() {
        let root = sample();
        let doc = Document::new(&root);
        assert!(doc.get("").unwrap().is_object());
    }

    #[test]
    fn children_by_key_walks_objects() {
        let root = sample();
        let doc = Document::new(&root);
        let devices = doc.children_by_key("devices").unwrap();
        let keys: Vec<_> = devices.keys().copied().collect();
        assert_eq!(keys, ["of:01", "of:02"]);
        assert!(devices["of:01"].exists("accessDevice.vlan"));
        assert!(!devices["of:02"].exists("accessDevice.vlan"));
    }

    #[test]
    fn children_walks_arrays() {
        let root = sample();
        let doc = Document::new(&root);
        let ports = doc.children("ports").unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[1].get_str("port").unwrap(), "local");
    }

    #[test]
    fn type_mismatches_are_explicit() {
        let root = sample();
        let doc = Document::new(&root);
        assert_eq!(
            doc.children("devices").unwrap_err(),
            DocumentError::TypeMismatch {
                path: "devices".into(),
                expected: "array",
                found: "object",
            }
        );
        assert!(matches!(
            doc.children_by_key("ports"),
            Err(DocumentError::TypeMismatch { found: "array", .. })
        ));
        assert!(matches!(
            doc.get_str("flag"),
            Err(DocumentError::TypeMismatch { expected: "string", .. })
        ));
    }

    #[test]
    fn paths_through_scalars_are_missing() {
        let root = sample();
        let doc = Document::new(&root);
        assert!(matches!(
            doc.get("flag.inner"),
            Err(DocumentError::Missing { .. })
        ));
    }
}
