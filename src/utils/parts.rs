//! Utility functions for working with [`Part`] objects.

use crate::types::Part;

/// Extracts text content from all text-typed Parts in a list.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::get_text_parts;
///
/// let parts = vec![Part::text("Hello"), Part::text("World")];
/// let texts = get_text_parts(&parts);
/// assert_eq!(texts, vec!["Hello", "World"]);
/// ```
pub fn get_text_parts(parts: &[Part]) -> Vec<String> {
    parts
        .iter()
        .filter_map(|part| part.text_value().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_parts_empty() {
        let parts: Vec<Part> = vec![];
        assert_eq!(get_text_parts(&parts), Vec::<String>::new());
    }

    #[test]
    fn text_parts_skip_non_text() {
        let mut fields = serde_json::Map::new();
        fields.insert("name".into(), serde_json::Value::String("get_weather".into()));
        let function_call = Part {
            kind: "function_call".into(),
            fields,
        };
        let parts = vec![Part::text("hi"), function_call];
        assert_eq!(get_text_parts(&parts), vec!["hi".to_string()]);
    }
}
