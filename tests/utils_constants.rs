//! Tests for the utils::constants module.

use a2a_rs::utils::constants;

#[test]
fn agent_card_path_is_bare_not_well_known() {
    assert_eq!(constants::AGENT_CARD_PATH, "/agent.json");
}

#[test]
fn prefixed_agent_card_path_mirrors_a2a_prefix() {
    assert_eq!(constants::PREFIXED_AGENT_CARD_PATH, "/a2a/agent.json");
}

#[test]
fn default_rpc_url_is_root() {
    assert_eq!(constants::DEFAULT_RPC_URL, "/");
}
