//! Integration tests for MCP protocol handling.
//!
//! These tests verify the MCP server's JSON-RPC 2.0 protocol implementation,
//! lifecycle management, and the tool and resource surface over a live
//! session.

use serde_json::{json, Value};
use tokio::io::BufReader;
use tokio_test::io::{Builder, Mock};

use solidedge_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};
use solidedge_mcp::mcp::server::{McpServer, ServerState};
use solidedge_mcp::mcp::Transport;
use solidedge_mcp::session::Session;

type TestServer = McpServer<BufReader<Mock>, Mock>;

fn idle_transport() -> Transport<BufReader<Mock>, Mock> {
    Transport::new(BufReader::new(Builder::new().build()), Builder::new().build())
}

fn running_server() -> TestServer {
    let mut server = McpServer::with_transport(idle_transport(), Session::default(), Vec::new());
    server.process_line(
        &json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "integration", "version": "1.0.0" }
            }
        })
        .to_string(),
    );
    server.process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
    assert_eq!(server.state(), ServerState::Running);
    server
}

/// Calls a tool; returns the decoded text body and whether it is an error.
fn call(server: &mut TestServer, name: &str, arguments: Value) -> (Value, bool) {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    });
    let reply = server
        .process_line(&request.to_string())
        .expect("tools/call always replies");
    let result = reply.result().expect("tool failures are results, not errors");
    let text = result["content"][0]["text"].as_str().unwrap();
    let is_error = result.get("isError").and_then(Value::as_bool).unwrap_or(false);
    (serde_json::from_str(text).unwrap(), is_error)
}

fn ok(server: &mut TestServer, name: &str, arguments: Value) -> Value {
    let (body, is_error) = call(server, name, arguments);
    assert!(!is_error, "{name} failed: {body}");
    body
}

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_tools_call_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": "call-7",
        "method": "tools/call",
        "params": { "name": "create_extrude", "arguments": { "distance": 0.01 } }
    }"#;

    let IncomingMessage::Request(req) = parse_message(json).unwrap() else {
        panic!("Expected Request");
    };
    assert_eq!(req.id, RequestId::String("call-7".to_string()));
    assert_eq!(req.params.unwrap()["arguments"]["distance"], 0.01);
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    let json = "not valid json";

    let result = parse_message(json);
    assert!(result.is_err());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let json = r#"{
        "id": 1,
        "method": "test"
    }"#;

    let result = parse_message(json);
    assert!(result.is_err());
}

// =============================================================================
// Transport Loop Tests
// =============================================================================

#[tokio::test]
async fn test_serve_rejects_calls_before_initialise() {
    let input = Builder::new()
        .read(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n")
        .read(b"\n")
        .read(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n")
        .build();
    let output = Builder::new()
        .write(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"error\":{\"code\":-32600,\"message\":\"Server not initialised\"}}\n")
        .write(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{}}\n")
        .build();

    let transport = Transport::new(BufReader::new(input), output);
    let mut server = McpServer::with_transport(transport, Session::default(), Vec::new());
    server.serve().await.unwrap();

    assert_eq!(server.state(), ServerState::ShuttingDown);
}

// =============================================================================
// Tool Surface Tests
// =============================================================================

#[test]
fn test_revolve_keeps_axis_for_next_revolve() {
    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));

    ok(&mut server, "create_sketch", json!({ "plane": "Front" }));
    ok(
        &mut server,
        "draw_rectangle",
        json!({ "x1": 0.01, "y1": 0.0, "x2": 0.02, "y2": 0.05 }),
    );
    ok(
        &mut server,
        "set_axis_of_revolution",
        json!({ "x1": 0.0, "y1": 0.0, "x2": 0.0, "y2": 0.05 }),
    );
    ok(&mut server, "close_sketch", json!({}));

    let body = ok(&mut server, "create_revolve", json!({ "angle": 360 }));
    assert_eq!(body["feature"]["type"], "Revolve");
    assert!(body["sketch_state"]["active_axis"].is_number());
    assert_eq!(body["sketch_state"]["accumulated_count"], 0);

    // The axis survives, the profile does not
    let (body, is_error) = call(&mut server, "create_revolved_cutout", json!({ "angle": 90 }));
    assert!(is_error);
    assert_eq!(body["code"], "NO_ACTIVE_PROFILE");
}

#[test]
fn test_loft_through_three_sections() {
    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));

    for (plane, radius) in [("Top", 0.02), ("Front", 0.015), ("Right", 0.01)] {
        ok(&mut server, "create_sketch", json!({ "plane": plane }));
        ok(
            &mut server,
            "draw_circle",
            json!({ "center_x": 0.0, "center_y": 0.0, "radius": radius }),
        );
        ok(&mut server, "close_sketch", json!({}));
    }

    let state = ok(&mut server, "get_sketch_state", json!({}));
    assert_eq!(state["sketch_state"]["accumulated_count"], 3);

    let (body, is_error) = call(
        &mut server,
        "create_loft",
        json!({ "profile_indices": [0, 5] }),
    );
    assert!(is_error);
    assert_eq!(body["code"], "PROFILE_INDEX_OUT_OF_RANGE");

    let body = ok(&mut server, "create_loft", json!({ "profile_indices": [2, 1, 0] }));
    assert_eq!(body["feature"]["type"], "Loft");
    assert_eq!(body["feature"]["profiles"], 3);
    assert_eq!(body["sketch_state"]["accumulated_count"], 0);
}

#[test]
fn test_lofted_cutout_waits_for_material() {
    fn sketch_circles(server: &mut TestServer, radii: &[f64]) {
        for (plane, radius) in ["Top", "Front", "Right"].iter().zip(radii) {
            ok(server, "create_sketch", json!({ "plane": plane }));
            ok(
                server,
                "draw_circle",
                json!({ "center_x": 0.0, "center_y": 0.0, "radius": radius }),
            );
            ok(server, "close_sketch", json!({}));
        }
    }

    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));

    sketch_circles(&mut server, &[0.005, 0.004]);
    let (body, is_error) = call(&mut server, "create_lofted_cutout", json!({}));
    assert!(is_error);
    assert_eq!(body["code"], "NO_BASE_FEATURE");
    let state = ok(&mut server, "get_sketch_state", json!({}));
    assert_eq!(state["sketch_state"]["accumulated_count"], 2);

    // The most recent profile becomes the base solid
    ok(&mut server, "create_extrude", json!({ "distance": 0.05 }));
    sketch_circles(&mut server, &[0.003, 0.002]);

    let body = ok(&mut server, "create_lofted_cutout", json!({}));
    assert_eq!(body["feature"]["type"], "LoftedCutout");
    assert_eq!(body["sketch_state"]["accumulated_count"], 0);

    let (body, is_error) = call(
        &mut server,
        "create_helix_cutout",
        json!({ "pitch": 0.005, "height": 0.02 }),
    );
    assert!(is_error);
    assert_eq!(body["code"], "NO_ACTIVE_PROFILE");
}

#[test]
fn test_loft_with_guides_needs_a_guide() {
    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));
    for plane in ["Top", "Front", "Right"] {
        ok(&mut server, "create_sketch", json!({ "plane": plane }));
        ok(
            &mut server,
            "draw_line",
            json!({ "x1": 0.0, "y1": 0.0, "x2": 0.01, "y2": 0.01 }),
        );
        ok(&mut server, "close_sketch", json!({}));
    }

    let (body, is_error) = call(&mut server, "create_loft_with_guides", json!({}));
    assert!(is_error);
    assert_eq!(body["code"], "GUIDE_CURVES_REQUIRED");

    let body = ok(
        &mut server,
        "create_loft_with_guides",
        json!({ "guide_profile_indices": [2] }),
    );
    assert_eq!(body["feature"]["type"], "Loft");
}

#[test]
fn test_assembly_cutout_through_placed_part() {
    let dir = tempfile::tempdir().unwrap();
    let part = dir.path().join("plate.par");
    std::fs::write(&part, b"").unwrap();

    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "assembly" }));
    let body = ok(
        &mut server,
        "place_component",
        json!({ "path": part.to_string_lossy() }),
    );
    assert_eq!(body["occurrence"]["index"], 0);

    ok(&mut server, "create_sketch", json!({ "plane": "Top" }));
    ok(
        &mut server,
        "draw_circle",
        json!({ "center_x": 0.0, "center_y": 0.0, "radius": 0.003 }),
    );
    ok(&mut server, "close_sketch", json!({}));

    let (body, is_error) = call(
        &mut server,
        "create_assembly_extruded_cutout",
        json!({ "scope_parts": [4] }),
    );
    assert!(is_error);
    assert_eq!(body["code"], "INVALID_OCCURRENCE");

    let body = ok(
        &mut server,
        "create_assembly_extruded_cutout",
        json!({ "scope_parts": [0] }),
    );
    assert_eq!(body["feature"]["type"], "AssemblyCutout");
}

#[test]
fn test_document_switch_invalidates_profiles() {
    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));
    ok(&mut server, "create_sketch", json!({ "plane": "Top" }));
    ok(
        &mut server,
        "draw_rectangle",
        json!({ "x1": 0.0, "y1": 0.0, "x2": 0.02, "y2": 0.02 }),
    );
    ok(&mut server, "close_sketch", json!({}));

    let body = ok(&mut server, "create_document", json!({ "type": "part" }));
    assert_eq!(body["document"]["name"], "Part2");
    assert_eq!(body["sketch_state"]["accumulated_count"], 0);

    let (body, is_error) = call(&mut server, "create_extrude", json!({ "distance": 0.01 }));
    assert!(is_error);
    assert_eq!(body["code"], "NO_ACTIVE_PROFILE");

    let list = ok(&mut server, "list_documents", json!({}));
    assert_eq!(list["count"], 2);
}

#[test]
fn test_save_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bracket.par");

    let mut server = running_server();
    ok(&mut server, "create_document", json!({ "type": "part" }));

    let (body, is_error) = call(&mut server, "save_document", json!({}));
    assert!(is_error);
    assert_eq!(body["code"], "CALL_FAILED");

    let body = ok(
        &mut server,
        "save_document",
        json!({ "path": target.to_string_lossy() }),
    );
    assert_eq!(body["document"]["name"], "bracket.par");

    let body = ok(&mut server, "close_document", json!({ "save": true }));
    assert!(body["active"].is_null());

    let (body, _) = call(&mut server, "close_document", json!({}));
    assert_eq!(body["code"], "NO_ACTIVE_DOCUMENT");
}
