//! Constants for well-known URIs used throughout the A2A Rust SDK.

/// The path the server exposes the agent card under.
pub const AGENT_CARD_PATH: &str = "/agent.json";

/// The `/a2a`-prefixed mirror of [`AGENT_CARD_PATH`], for callers that route by prefix.
pub const PREFIXED_AGENT_CARD_PATH: &str = "/a2a/agent.json";

/// The legacy single-shot message/conversation endpoint.
pub const DEFAULT_RPC_URL: &str = "/";
