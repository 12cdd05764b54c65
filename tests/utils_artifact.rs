//! Tests for the `utils::artifact` helpers, complementing the inline
//! `#[cfg(test)]` module in `src/utils/artifact.rs`.

use a2a_rs::types::{Artifact, Part};
use a2a_rs::utils::{get_artifact_text, new_artifact, new_data_artifact, new_text_artifact};
use serde_json::json;

#[test]
fn new_artifact_carries_parts_and_type() {
    let parts = vec![Part::text("Sample text")];
    let artifact = new_artifact(parts.clone(), "custom_type");

    assert_eq!(artifact.parts.len(), parts.len());
    assert_eq!(artifact.artifact_type.as_deref(), Some("custom_type"));
}

#[test]
fn new_text_artifact_wraps_a_single_text_part() {
    let artifact = new_text_artifact("Hello, world!");

    assert_eq!(artifact.parts.len(), 1);
    assert_eq!(artifact.parts[0].text_value(), Some("Hello, world!"));
}

#[test]
fn new_text_artifact_matches_artifact_text_constructor() {
    let artifact = new_text_artifact("same content");
    assert_eq!(artifact.parts, Artifact::text("same content").parts);
}

#[test]
fn new_data_artifact_carries_the_payload() {
    let sample_data = json!({"key": "value", "number": 123});
    let artifact = new_data_artifact(sample_data.clone());

    assert_eq!(artifact.parts.len(), 1);
    assert_eq!(artifact.parts[0].kind, "data");
    assert_eq!(artifact.parts[0].fields.get("data"), Some(&sample_data));
}

#[test]
fn get_artifact_text_single_part() {
    let artifact = Artifact::text("Hello world");
    assert_eq!(get_artifact_text(&artifact, "\n"), "Hello world");
}

#[test]
fn get_artifact_text_multiple_parts_joined_by_delimiter() {
    let artifact = Artifact {
        artifact_type: None,
        role: None,
        parts: vec![
            Part::text("First line"),
            Part::text("Second line"),
            Part::text("Third line"),
        ],
        extra: serde_json::Map::new(),
    };

    assert_eq!(
        get_artifact_text(&artifact, "\n"),
        "First line\nSecond line\nThird line"
    );
}

#[test]
fn get_artifact_text_custom_delimiter() {
    let artifact = Artifact {
        artifact_type: None,
        role: None,
        parts: vec![Part::text("First part"), Part::text("Second part")],
        extra: serde_json::Map::new(),
    };

    assert_eq!(
        get_artifact_text(&artifact, " | "),
        "First part | Second part"
    );
}

#[test]
fn get_artifact_text_skips_non_text_parts() {
    let mut data_part = Part::text("ignored");
    data_part.kind = "data".to_string();
    data_part.fields.insert("data".to_string(), json!({"a": 1}));

    let artifact = Artifact {
        artifact_type: None,
        role: None,
        parts: vec![Part::text("kept"), data_part],
        extra: serde_json::Map::new(),
    };

    assert_eq!(get_artifact_text(&artifact, "\n"), "kept");
}

#[test]
fn get_artifact_text_empty_parts() {
    let artifact = Artifact {
        artifact_type: None,
        role: None,
        parts: vec![],
        extra: serde_json::Map::new(),
    };

    assert_eq!(get_artifact_text(&artifact, "\n"), "");
}
