//! Utility functions for creating A2A Artifact objects.

use crate::types::{Artifact, Part};
use crate::utils::parts::get_text_parts;
use serde_json::{Map, Value};

/// Creates a new Artifact object from a list of parts.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::new_artifact;
///
/// let parts = vec![Part::text("Sample text")];
/// let artifact = new_artifact(parts, "text");
/// assert_eq!(artifact.artifact_type.as_deref(), Some("text"));
/// ```
pub fn new_artifact(parts: Vec<Part>, artifact_type: impl Into<String>) -> Artifact {
    Artifact {
        artifact_type: Some(artifact_type.into()),
        role: None,
        parts,
        extra: Map::new(),
    }
}

/// Creates a new Artifact object containing only a single text Part.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_text_artifact;
///
/// let artifact = new_text_artifact("Hello, world!");
/// assert_eq!(artifact.parts.len(), 1);
/// ```
pub fn new_text_artifact(text: impl Into<String>) -> Artifact {
    Artifact::text(text)
}

/// Creates a new Artifact object containing only a single structured-data Part.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_data_artifact;
/// use serde_json::json;
///
/// let artifact = new_data_artifact(json!({"key": "value", "number": 123}));
/// assert_eq!(artifact.artifact_type.as_deref(), Some("data"));
/// ```
pub fn new_data_artifact(data: Value) -> Artifact {
    let mut fields = Map::new();
    fields.insert("data".into(), data);
    let part = Part {
        kind: "data".into(),
        fields,
    };
    new_artifact(vec![part], "data")
}

/// Extracts and joins all text content from an Artifact's parts.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::{new_artifact, get_artifact_text};
///
/// let parts = vec![Part::text("First line"), Part::text("Second line")];
/// let artifact = new_artifact(parts, "text");
/// let text = get_artifact_text(&artifact, "\n");
/// assert_eq!(text, "First line\nSecond line");
/// ```
pub fn get_artifact_text(artifact: &Artifact, delimiter: &str) -> String {
    get_text_parts(&artifact.parts).join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_artifact_carries_its_type() {
        let parts = vec![Part::text("Sample text")];
        let artifact = new_artifact(parts, "text");
        assert_eq!(artifact.artifact_type.as_deref(), Some("text"));
        assert_eq!(artifact.parts.len(), 1);
    }

    #[test]
    fn new_text_artifact_wraps_a_single_text_part() {
        let artifact = new_text_artifact("Hello, world!");
        assert_eq!(artifact.parts.len(), 1);
        assert_eq!(artifact.parts[0].text_value(), Some("Hello, world!"));
    }

    #[test]
    fn new_data_artifact_carries_the_payload() {
        let data = json!({"key": "value"});
        let artifact = new_data_artifact(data.clone());
        assert_eq!(artifact.parts.len(), 1);
        assert_eq!(artifact.parts[0].fields.get("data"), Some(&data));
    }

    #[test]
    fn get_artifact_text_empty_without_text_parts() {
        let artifact = new_artifact(vec![], "empty");
        assert_eq!(get_artifact_text(&artifact, "\n"), "");
    }
}
