//! Listed object metadata.

use serde::{Deserialize, Serialize};

/// The minimal metadata record returned per listed object.
///
/// `size` is the value reported by the listing call. It is not re-checked
/// against the object itself, so it may lag behind objects that are still
/// being written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    key: String,
    size: i64,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Consume the descriptor, keeping only its key.
    pub fn into_key(self) -> String {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accessors() {
        let obj = ObjectDescriptor::new("2024/01/01/list_clients_a.json", 100);

        assert_eq!(obj.key(), "2024/01/01/list_clients_a.json");
        assert_eq!(obj.size(), 100);
        assert_eq!(obj.into_key(), "2024/01/01/list_clients_a.json");
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let obj = ObjectDescriptor::new("a.json", 7);
        let json = serde_json::to_string(&obj).unwrap();
        assert_eq!(json, r#"{"key":"a.json","size":7}"#);
    }
}
