//! Agent card discovery and resolution.
//!
//! Implements the well-known URI convention for discovering A2A agent cards.
//! An agent card describes the agent's capabilities, skills, and the `url`
//! used for JSON-RPC communication.

use reqwest::header;
use serde_json::Value;

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;

/// Well-known path for the agent card endpoint.
const AGENT_CARD_PATH: &str = "/agent.json";

/// Fallback path — some deployments only mirror routes under `/a2a`.
const PREFIXED_AGENT_CARD_PATH: &str = "/a2a/agent.json";

/// Resolves [`AgentCard`]s from agent base URLs.
///
/// Fetches the agent card from the well-known endpoint (`{base_url}/agent.json`)
/// and deserializes it into an [`AgentCard`].
///
/// # Example
///
/// ```no_run
/// use a2a_rs::client::CardResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = CardResolver::new();
/// let card = resolver.resolve("http://localhost:7420").await?;
/// println!("Agent: {} v{}", card.name, card.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
    /// Override the default agent card path. If `None`, uses `/agent.json`.
    card_path: Option<String>,
}

impl CardResolver {
    /// Create a new resolver with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            card_path: None,
        }
    }

    /// Create a new resolver with an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            card_path: None,
        }
    }

    /// Override the agent card path (instead of `/agent.json`).
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.card_path = Some(path.into());
        self
    }

    /// Fetch and parse the agent card from the given base URL.
    ///
    /// Constructs the full URL as `{base_url}{card_path}` and performs an
    /// HTTP GET with `Accept: application/json` (steering content
    /// negotiation away from the HTML fallback agents may serve to
    /// browsers). Falls back to the `/a2a/agent.json` mirror on a 404.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Transport`] on connection failures, [`A2AError::Http`]
    /// on non-2xx responses, and [`A2AError::InvalidJson`] on parse failures.
    pub async fn resolve(&self, base_url: &str) -> A2AResult<AgentCard> {
        let base = base_url.trim_end_matches('/');

        if let Some(path) = self.card_path.as_deref() {
            return self.fetch_card(base, path).await;
        }

        match self.fetch_card(base, AGENT_CARD_PATH).await {
            Ok(card) => Ok(card),
            Err(A2AError::Http { status: 404, .. }) => {
                tracing::debug!(
                    "agent card not found at {}{}, trying {}",
                    base,
                    AGENT_CARD_PATH,
                    PREFIXED_AGENT_CARD_PATH,
                );
                self.fetch_card(base, PREFIXED_AGENT_CARD_PATH).await
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch and parse an agent card from a specific path relative to a base URL.
    async fn fetch_card(&self, base: &str, path: &str) -> A2AResult<AgentCard> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let url = format!("{base}{path}");

        tracing::debug!("resolving agent card from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    A2AError::Transport(format!("failed to connect to agent at {url}: {e}"))
                } else if e.is_timeout() {
                    A2AError::Timeout(format!("timed out fetching agent card from {url}: {e}"))
                } else {
                    A2AError::Transport(format!("failed to fetch agent card from {url}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("json"))
            .unwrap_or(false);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::Transport(format!("failed to read agent card response: {e}")))?;

        let card: AgentCard = if is_json {
            serde_json::from_slice(&bytes)
                .map_err(|e| A2AError::InvalidJson(format!("failed to parse agent card: {e}")))?
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(card) => card,
                Err(_) => {
                    let text = String::from_utf8_lossy(&bytes);
                    let extracted = extract_json_from_html(&text).ok_or_else(|| {
                        A2AError::InvalidJson(
                            "non-JSON agent card response and no embedded JSON object found"
                                .to_string(),
                        )
                    })?;
                    serde_json::from_value(extracted).map_err(|e| {
                        A2AError::InvalidJson(format!(
                            "failed to parse JSON extracted from HTML agent card: {e}"
                        ))
                    })?
                }
            }
        };

        tracing::debug!("resolved agent card: {} v{}", card.name, card.version);

        Ok(card)
    }

    /// Returns the JSON-RPC endpoint this card advertises.
    ///
    /// The simplified card carries a single `url` rather than a list of
    /// transport-tagged interfaces.
    pub fn get_a2a_url(card: &AgentCard) -> Option<String> {
        if card.url.is_empty() {
            None
        } else {
            Some(card.url.clone())
        }
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// HTML-embedded-JSON fallback
// ---------------------------------------------------------------------------

/// Extract an agent card's JSON body from an HTML response.
///
/// Some deployments render the agent card as an HTML page for browsers while
/// still embedding the JSON verbatim. Prefers the largest JSON object found inside
/// a `<code>`/`<pre>` block; falls back to the first JSON object anywhere in
/// the document that looks like an agent card (`"capabilities"` or `"name"`).
fn extract_json_from_html(html: &str) -> Option<Value> {
    if let Some(best) = find_balanced_objects_in_tagged_blocks(html)
        .into_iter()
        .max_by_key(|v| serde_json::to_string(v).map(|s| s.len()).unwrap_or(0))
    {
        return Some(best);
    }

    find_balanced_objects(html)
        .into_iter()
        .find(|v| v.get("capabilities").is_some() || v.get("name").is_some())
}

/// Find JSON objects nested inside `<code>…</code>` or `<pre>…</pre>` blocks.
fn find_balanced_objects_in_tagged_blocks(html: &str) -> Vec<Value> {
    let mut candidates = Vec::new();
    for tag in ["code", "pre"] {
        let open_tag = format!("<{tag}");
        let close_tag = format!("</{tag}>");
        let mut search_from = 0;
        while let Some(rel_start) = html[search_from..].find(open_tag.as_str()) {
            let tag_start = search_from + rel_start;
            let Some(rel_gt) = html[tag_start..].find('>') else {
                break;
            };
            let content_start = tag_start + rel_gt + 1;
            let Some(rel_close) = html[content_start..].find(close_tag.as_str()) else {
                break;
            };
            let content_end = content_start + rel_close;
            let unescaped = unescape_html_entities(&html[content_start..content_end]);
            candidates.extend(find_balanced_objects(&unescaped));
            search_from = content_end + close_tag.len();
        }
    }
    candidates
}

fn unescape_html_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&amp;", "&")
}

/// Scan `text` for brace-balanced `{...}` substrings and return the ones that
/// parse as JSON objects, in order of appearance.
fn find_balanced_objects(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    let mut results = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' {
            if let Some(end) = matching_brace_end(&chars, i) {
                let candidate: String = chars[i..=end].iter().collect();
                if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
                    if value.is_object() {
                        results.push(value);
                    }
                }
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    results
}

/// Returns the index of the `}` matching the `{` at `start`, tracking string
/// literals so braces inside quoted strings don't throw off the depth count.
fn matching_brace_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;
    for (offset, &c) in chars.iter().enumerate().skip(start) {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}
