//! Wire-format tests for the core A2A types: JSON field names, casing, and
//! round-trip behavior for `Message`, `Task`, `Part`, `Artifact`, `AgentCard`
//! and the JSON-RPC envelope.

use a2a_rs::types::*;
use serde_json::json;

#[test]
fn task_state_all_variants_serialize_kebab_case() {
    let pairs = [
        (TaskState::Submitted, "submitted"),
        (TaskState::Waiting, "waiting"),
        (TaskState::InputRequired, "input-required"),
        (TaskState::Completed, "completed"),
        (TaskState::Canceled, "canceled"),
        (TaskState::Failed, "failed"),
        (TaskState::Unknown, "unknown"),
    ];
    for (state, expected) in pairs {
        let value = serde_json::to_value(state).unwrap();
        assert_eq!(value, json!(expected));
    }
}

#[test]
fn message_role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(MessageRole::User).unwrap(), json!("user"));
    assert_eq!(serde_json::to_value(MessageRole::Agent).unwrap(), json!("agent"));
    assert_eq!(serde_json::to_value(MessageRole::System).unwrap(), json!("system"));
}

#[test]
fn content_text_variant_tagged() {
    let content = Content::text("hello");
    let value = serde_json::to_value(&content).unwrap();
    assert_eq!(value["type"], "text");
    assert_eq!(value["text"], "hello");
}

#[test]
fn content_function_call_variant_tagged() {
    let content = Content::function_call(
        "lookup",
        vec![FunctionParameter {
            name: "query".to_string(),
            value: json!("weather"),
        }],
    );
    let value = serde_json::to_value(&content).unwrap();
    assert_eq!(value["type"], "function_call");
    assert_eq!(value["name"], "lookup");
    assert_eq!(value["parameters"][0]["name"], "query");
}

#[test]
fn message_camel_case_fields() {
    let message = Message::new(MessageRole::User, Content::text("hi")).with_conversation_id("conv-1");
    let value = serde_json::to_value(&message).unwrap();
    assert!(value.get("messageId").is_some(), "expected camelCase messageId");
    assert!(value.get("conversationId").is_some(), "expected camelCase conversationId");
    assert!(value.get("message_id").is_none());
}

#[test]
fn message_roundtrip() {
    let message = Message::new(MessageRole::Agent, Content::text("hello")).with_conversation_id("c1");
    let value = serde_json::to_value(&message).unwrap();
    let decoded: Message = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.role, MessageRole::Agent);
    assert_eq!(decoded.content.as_text(), "hello");
    assert_eq!(decoded.conversation_id.as_deref(), Some("c1"));
}

#[test]
fn task_camel_case_session_id() {
    let task = Task::new("session-1");
    let value = serde_json::to_value(&task).unwrap();
    assert!(value.get("sessionId").is_some(), "expected camelCase sessionId");
    assert!(value.get("session_id").is_none());
}

#[test]
fn task_status_serialization() {
    let status = TaskStatus::new(TaskState::Completed);
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value["state"], "completed");
    assert!(!value["timestamp"].as_str().unwrap().is_empty());
}

#[test]
fn task_with_artifacts_roundtrip() {
    let mut task = Task::new("session-1");
    task.artifacts.push(Artifact::text("artifact body"));
    task.status = TaskStatus::new(TaskState::Completed);

    let value = serde_json::to_value(&task).unwrap();
    let decoded: Task = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.artifacts.len(), 1);
    assert_eq!(decoded.artifacts[0].parts[0].text_value(), Some("artifact body"));
}

#[test]
fn part_flattens_extra_fields() {
    let part = Part::text("hi");
    let value = serde_json::to_value(&part).unwrap();
    assert_eq!(value["kind"], "text");
    assert_eq!(value["text"], "hi");
}

#[test]
fn stream_chunk_message_variant_roundtrip() {
    let chunk = StreamChunk::MessageChunk {
        content: json!({"kind": "text", "text": "chunk"}),
        index: 0,
        append: false,
        last_chunk: Some(true),
    };
    let value = serde_json::to_value(&chunk).unwrap();
    assert_eq!(value["lastChunk"], true);
    let decoded: StreamChunk = serde_json::from_value(value).unwrap();
    assert!(decoded.is_last());
}

#[test]
fn stream_chunk_task_variant_roundtrip() {
    let task = Task::new("session-1");
    let chunk = StreamChunk::TaskChunk {
        task,
        index: 0,
        append: true,
        last_chunk: Some(false),
    };
    let value = serde_json::to_value(&chunk).unwrap();
    let decoded: StreamChunk = serde_json::from_value(value).unwrap();
    match decoded {
        StreamChunk::TaskChunk { task, .. } => assert_eq!(task.session_id, "session-1"),
        StreamChunk::MessageChunk { .. } => panic!("expected TaskChunk"),
    }
}

#[test]
fn agent_card_camel_case_fields() {
    let card = AgentCard {
        name: "Echo".to_string(),
        description: "desc".to_string(),
        url: "http://localhost/a2a".to_string(),
        version: "1.0.0".to_string(),
        capabilities: AgentCapabilities::default(),
        skills: vec![],
        default_input_modes: vec!["text/plain".to_string()],
        default_output_modes: vec!["text/plain".to_string()],
        authentication: None,
        provider: None,
        documentation_url: None,
    };
    let value = serde_json::to_value(&card).unwrap();
    assert!(value.get("defaultInputModes").is_some());
    assert!(value.get("defaultOutputModes").is_some());
}

#[test]
fn json_rpc_request_serialization() {
    let request = JsonRpcRequest::new(1i64, "tasks/send", Some(json!({"id": "task-1"})));
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["method"], "tasks/send");
    assert_eq!(value["id"], 1);
}

#[test]
fn json_rpc_id_all_variants_roundtrip() {
    for id in [JsonRpcId::Number(1), JsonRpcId::String("abc".to_string())] {
        let value = serde_json::to_value(&id).unwrap();
        let decoded: JsonRpcId = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, id);
    }
}

#[test]
fn json_rpc_response_error() {
    let response = JsonRpcResponse::error(
        JsonRpcId::Number(1),
        JsonRpcError {
            code: -32602,
            message: "Invalid params".to_string(),
            data: None,
        },
    );
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["code"], -32602);
    assert!(value.get("result").is_none());
}
