//! Tests for the `CardResolver` agent card discovery mechanism.
//!
//! Tests that require a live HTTP server (success/error fetches) live in
//! `client_server_integration.rs`, which spins up a real axum server. This
//! file covers construction, URL extraction, and JSON (de)serialization.

use a2a_rs::client::CardResolver;
use a2a_rs::types::{AgentCapabilities, AgentCard, AgentSkill};

fn make_card(name: &str, url: &str) -> AgentCard {
    AgentCard {
        name: name.to_string(),
        description: "test".to_string(),
        version: "1.0".to_string(),
        url: url.to_string(),
        capabilities: AgentCapabilities::default(),
        skills: vec![],
        default_input_modes: vec![],
        default_output_modes: vec![],
        authentication: None,
        provider: None,
        documentation_url: None,
    }
}

// ============================================================================
// Construction tests
// ============================================================================

#[test]
fn card_resolver_default_construction() {
    let resolver = CardResolver::new();
    let _ = format!("{:?}", resolver);
}

#[test]
fn card_resolver_with_custom_path() {
    let resolver = CardResolver::new().with_card_path("/custom/agent/card");
    let _ = format!("{:?}", resolver);
}

#[test]
fn card_resolver_with_reqwest_client() {
    let client = reqwest::Client::new();
    let resolver = CardResolver::with_client(client);
    let _ = format!("{:?}", resolver);
}

// ============================================================================
// get_a2a_url — URL extraction from AgentCard
// ============================================================================

#[test]
fn get_a2a_url_returns_card_url() {
    let card = make_card("TestAgent", "http://example.com/a2a");
    assert_eq!(
        CardResolver::get_a2a_url(&card),
        Some("http://example.com/a2a".to_string())
    );
}

#[test]
fn get_a2a_url_none_when_empty() {
    let card = make_card("TestAgent", "");
    assert!(CardResolver::get_a2a_url(&card).is_none());
}

// ============================================================================
// Agent card JSON deserialization
// ============================================================================

#[test]
fn valid_agent_card_deserialization() {
    let json = serde_json::json!({
        "name": "TestAgent",
        "description": "A test agent",
        "version": "1.0.0",
        "url": "https://example.com/a2a",
        "capabilities": {},
        "defaultInputModes": ["text/plain"],
        "defaultOutputModes": ["text/plain"],
        "skills": [{
            "id": "test-skill",
            "name": "Test Skill",
            "description": "A skill for testing",
            "tags": ["test"]
        }]
    });

    let card: AgentCard = serde_json::from_value(json).unwrap();
    assert_eq!(card.name, "TestAgent");
    assert_eq!(card.description, "A test agent");
    assert_eq!(card.version, "1.0.0");
    assert_eq!(card.skills.len(), 1);
    assert_eq!(card.skills[0].id, "test-skill");
}

#[test]
fn invalid_agent_card_deserialization_fails() {
    let json = serde_json::json!({
        "name": "Test Agent"
    });
    let result: Result<AgentCard, _> = serde_json::from_value(json);
    assert!(result.is_err(), "missing required fields should fail to parse");
}

#[test]
fn agent_card_with_multiple_skills() {
    let json = serde_json::json!({
        "name": "Hello World Agent",
        "description": "Just a hello world agent",
        "version": "1.0.0",
        "url": "http://localhost:9999/",
        "capabilities": {},
        "defaultInputModes": ["text"],
        "defaultOutputModes": ["text"],
        "skills": [
            {
                "id": "hello_world",
                "name": "Returns hello world",
                "description": "just returns hello world",
                "tags": ["hello world"],
                "examples": ["hi", "hello world"]
            },
            {
                "id": "extended_skill",
                "name": "Super Greet",
                "description": "A more enthusiastic greeting.",
                "tags": ["extended"],
                "examples": ["super hi"]
            }
        ]
    });

    let card: AgentCard = serde_json::from_value(json).unwrap();
    assert_eq!(card.skills.len(), 2);
    assert_eq!(card.skills[0].id, "hello_world");
    assert_eq!(card.skills[1].id, "extended_skill");
}

#[test]
fn agent_skill_defaults_empty_tags_and_examples() {
    let skill: AgentSkill = serde_json::from_value(serde_json::json!({
        "id": "bare",
        "name": "Bare Skill",
        "description": "no tags or examples"
    }))
    .unwrap();
    assert!(skill.tags.is_empty());
    assert!(skill.examples.is_empty());
}

// ============================================================================
// A2AClient::from_card — card -> client construction
// ============================================================================

#[test]
fn client_from_card_with_url_succeeds() {
    let card = make_card("TestAgent", "http://example.com/a2a");
    let client = a2a_rs::client::A2AClient::from_card(card);
    assert!(client.is_ok());
}

#[test]
fn client_from_card_without_url_fails() {
    let card = make_card("TestAgent", "");
    let client = a2a_rs::client::A2AClient::from_card(card);
    assert!(client.is_err());
}

#[test]
fn client_from_endpoint_has_no_cached_card() {
    let client = a2a_rs::client::A2AClient::from_endpoint("http://example.com/a2a");
    assert!(client.get_card().is_err());
}

#[test]
fn client_from_card_caches_card() {
    let card = make_card("CachedBot", "http://example.com/a2a");
    let client = a2a_rs::client::A2AClient::from_card(card).unwrap();
    let cached = client.get_card().unwrap();
    assert_eq!(cached.name, "CachedBot");
}
