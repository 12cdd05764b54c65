//! Extension utility functions.
//!
//! Helpers for working with the `X-A2A-Extensions` request header, used by
//! clients to declare which protocol extensions they understand and by
//! servers to decide whether to honor extension-specific request fields.

use std::collections::{HashMap, HashSet};

/// HTTP header for A2A extensions.
pub const HTTP_EXTENSION_HEADER: &str = "X-A2A-Extensions";

/// Parse requested extensions from HTTP header values.
///
/// Handles comma-separated values as occurs in HTTP headers.
/// Strips whitespace and filters empty strings.
///
/// # Example
/// ```
/// use a2a_rs::utils::get_requested_extensions;
///
/// let exts = get_requested_extensions(&vec!["foo,bar".to_string(), "baz".to_string()]);
/// assert_eq!(exts, vec!["foo", "bar", "baz"].into_iter().map(String::from).collect());
/// ```
pub fn get_requested_extensions(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Update HTTP kwargs with the X-A2A-Extensions header.
///
/// If `extensions` is `Some`, sets the header to a comma-separated list.
/// If `extensions` is `None`, the header is not modified.
///
/// Returns a new HashMap with the updated headers.
///
/// # Example
/// ```
/// use a2a_rs::utils::update_extension_header;
/// use std::collections::HashMap;
///
/// let mut kwargs: HashMap<String, HashMap<String, String>> = HashMap::new();
/// let result = update_extension_header(Some(kwargs), Some(&vec!["ext1".to_string(), "ext2".to_string()]));
/// let headers = result.get("headers").unwrap();
/// assert_eq!(headers.get("X-A2A-Extensions"), Some(&"ext1,ext2".to_string()));
/// ```
pub fn update_extension_header(
    http_kwargs: Option<HashMap<String, HashMap<String, String>>>,
    extensions: Option<&Vec<String>>,
) -> HashMap<String, HashMap<String, String>> {
    let mut kwargs = http_kwargs.unwrap_or_default();

    if let Some(exts) = extensions {
        let headers = kwargs.entry("headers".to_string()).or_default();
        headers.insert(HTTP_EXTENSION_HEADER.to_string(), exts.join(","));
    }

    kwargs
}
