use std::sync::Arc;

use axum::{routing::any_service, Router};
use http_body_util::BodyExt; // for .collect
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tower::ServiceExt; // for .oneshot

use hk_transport_mcp::infra::runtime::mcp_transport;
use hk_transport_mcp::tools::transport::tool_router::{TransportRouter, TransportSvc};

static MCP_PROTOCOL_VERSION: &str = "0.5";

const CSV_DATA: &str = "\u{feff}Date,Control Point,Arrival / Departure,Hong Kong Residents,Mainland Visitors,Other Visitors,Total
07-01-2021,Airport,Arrival,600,10,20,630
07-01-2021,Airport,Departure,800,35,45,880
08-01-2021,Airport,Arrival,650,12,22,684
08-01-2021,Airport,Departure,850,40,50,940
";

fn sse_result(body: &[u8]) -> Value {
    let s = String::from_utf8_lossy(body);
    s.lines()
        .find_map(|line| line.strip_prefix("data: ").map(|d| d.to_string()))
        .and_then(|d| serde_json::from_str::<Value>(&d).ok())
        .expect("no rpcResponse frame in SSE body")
}

#[tokio::test]
async fn initialize_list_and_call_passenger_stats_over_streamable_http() {
    let server = httpmock::MockServer::start();
    server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/opendata/eng/transport/immigration_clearance/statistics_on_daily_passenger_traffic.csv");
        then.status(200).body(CSV_DATA);
    });

    let factory = {
        let base = server.base_url();
        move || {
            let svc = TransportSvc::with_bases(base.clone(), base.clone(), base.clone());
            let tools: TransportRouter = TransportSvc::router();
            (svc, tools)
        }
    };

    let session_mgr = Arc::new(mcp_transport::LocalSessionManager::default());
    let app = mcp_transport::make_streamable_http_service(factory, session_mgr);
    let app = Router::new().route_service("/mcp", any_service(app));

    // Initialize
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    let init_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Protocol-Version", MCP_PROTOCOL_VERSION)
        .body(axum::body::Body::from(init.to_string()))
        .unwrap();
    let init_res = app.clone().oneshot(init_req).await.unwrap();
    assert!(init_res.status().is_success());
    let session_id = init_res
        .headers()
        .get("MCP-Session-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();

    // notifications/initialized
    let initialized_notif =
        json!({"jsonrpc":"2.0","method":"notifications/initialized","params":{}});
    let initialized_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(initialized_notif.to_string()))
        .unwrap();
    let initialized_res = app.clone().oneshot(initialized_req).await.unwrap();
    assert_eq!(initialized_res.status(), StatusCode::ACCEPTED);

    // tools/list
    let list = json!({"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}});
    let list_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(list.to_string()))
        .unwrap();
    let list_res = timeout(Duration::from_secs(20), app.clone().oneshot(list_req))
        .await
        .unwrap()
        .unwrap();
    assert!(list_res.status().is_success());
    let list_bytes = list_res.into_body().collect().await.unwrap().to_bytes();
    let list_v = sse_result(&list_bytes);
    let names: Vec<&str> = list_v["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"get_passenger_stats"));
    assert!(names.contains(&"get_bus_kmb"));
    assert!(names.contains(&"get_land_boundary_wait_times"));

    // tools/call
    let call = json!({
        "jsonrpc":"2.0","id":3,"method":"tools/call",
        "params": {"name":"get_passenger_stats","arguments":{"start_date":"07-01-2021","end_date":"08-01-2021"}}
    });
    let call_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(call.to_string()))
        .unwrap();
    let call_res = app.clone().oneshot(call_req).await.unwrap();
    assert!(call_res.status().is_success());
    let bytes = call_res.into_body().collect().await.unwrap().to_bytes();
    let v = sse_result(&bytes);
    let payload = &v["result"]["structuredContent"];
    assert_eq!(payload["type"], "PassengerStats");
    let data = payload["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    // Newest first; same-date rows keep source order.
    assert_eq!(data[0]["date"], "08-01-2021");
    assert_eq!(data[0]["direction"], "Arrival");
    assert_eq!(data[0]["total"], 684);
    assert_eq!(data[1]["direction"], "Departure");
    assert_eq!(data[3]["date"], "07-01-2021");
}
