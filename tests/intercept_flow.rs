use cdp_options::matcher::UrlMatcher;
use cdp_options::normalize::normalize;
use cdp_options::protocol::{Command, Response};
use cdp_options::rehydrate::rehydrate;
use cdp_options::route::{
    ErrorReason, FulfillOptions, HeaderEntry, InterceptedRequest, Route, RouteHandlerEntry,
};
use cdp_options::{option_record, OptionMap};
use regex::Regex;
use serde_json::json;

fn routing_table() -> Vec<RouteHandlerEntry> {
    vec![
        RouteHandlerEntry::new(UrlMatcher::glob("**/*.png").unwrap(), |route, _| {
            Some(route.abort(ErrorReason::BlockedByClient))
        }),
        RouteHandlerEntry::new(
            UrlMatcher::regex(Regex::new(r"^https://x\.test/v1/.*$").unwrap()),
            |route, request| {
                let body = format!("{{\"method\":\"{}\"}}", request.method);
                Some(route.fulfill(&FulfillOptions {
                    response_headers: Some(vec![HeaderEntry::new("Content-Type", "application/json")]),
                    body: Some(body),
                    ..Default::default()
                }))
            },
        ),
        RouteHandlerEntry::new(UrlMatcher::predicate(|url| url.contains("admin")), |route, _| {
            Some(route.continue_request(&json!({"interceptResponse": true})))
        }),
        RouteHandlerEntry::new(UrlMatcher::glob("**/slow/*").unwrap(), |_, _| None),
    ]
}

/// Returns the command the owning table should send, if any entry decided.
fn dispatch(table: &[RouteHandlerEntry], frame: &str) -> Option<Command> {
    let response = Response::from_json(frame).unwrap();
    assert!(response.is_event());
    let request = InterceptedRequest::from_response(&response).unwrap();

    table
        .iter()
        .find(|entry| entry.matches(&request.url))
        .and_then(|entry| entry.handle(&Route::for_request(&request), &request))
}

fn paused(id: &str, url: &str, method: &str) -> String {
    json!({
        "method": "Fetch.requestPaused",
        "params": {
            "requestId": id,
            "resourceType": "Other",
            "request": {"url": url, "method": method, "headers": {}}
        }
    })
    .to_string()
}

#[test]
fn test_first_matching_entry_handles_request() {
    let table = routing_table();

    let frames = [
        paused("1", "https://x.test/v1/static/logo.png", "GET"),
        paused("2", "https://x.test/v1/users", "POST"),
        paused("3", "https://y.test/admin/panel", "GET"),
        paused("4", "https://y.test/public", "GET"),
        paused("5", "https://y.test/slow/report", "GET"),
    ];
    let sent: Vec<Command> = frames.iter().filter_map(|frame| dispatch(&table, frame)).collect();

    let methods: Vec<_> = sent.iter().map(|c| c.method.as_str()).collect();
    assert_eq!(
        methods,
        vec!["Fetch.failRequest", "Fetch.fulfillRequest", "Fetch.continueRequest"]
    );

    assert_eq!(sent[0].params["requestId"], json!("1"));
    assert_eq!(sent[1].params["responseCode"], json!(200));
    assert_eq!(sent[1].params["body"], json!("{\"method\":\"POST\"}"));
    assert_eq!(sent[2].params["interceptResponse"], json!(true));
    println!("✅ Requests routed to the first matching entry");
}

#[test]
fn test_commands_serialize_with_transport_ids() {
    let table = routing_table();

    match dispatch(&table, &paused("9", "https://x.test/a.png", "GET")) {
        Some(cmd) => assert_eq!(
            cmd.with_id(42).to_json().unwrap(),
            r#"{"id":42,"method":"Fetch.failRequest","params":{"errorReason":"BlockedByClient","requestId":"9"}}"#
        ),
        other => panic!("❌ Expected a fail command, but got: {:?}", other),
    }
}

option_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct CookieParam {
        name: String,
        value: String,
        domain: Option<String>,
        http_only: bool => "httpOnly",
        expires: Option<i64>,
    }
}

#[test]
fn test_record_round_trip_through_wire_text() {
    let cookie = CookieParam {
        name: "session".into(),
        value: "abc".into(),
        domain: Some("x.test".into()),
        http_only: true,
        expires: Some(1_700_000_000),
    };

    let command = Command::with_options("Network.setCookie", &cookie).with_id(7);
    let echo = json!({"id": command.id, "result": command.params}).to_string();
    let echoed = Response::from_json(&echo).unwrap();

    let mut decoded = CookieParam::default();
    let result: OptionMap = echoed.into_result().unwrap();
    rehydrate(&result, &mut decoded).unwrap();
    assert_eq!(decoded, cookie);
    assert_eq!(normalize(&decoded), normalize(&cookie));
}
