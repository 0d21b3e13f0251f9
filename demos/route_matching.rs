use cdp_options::error::OptionsResult;
use cdp_options::matcher::UrlMatcher;
use cdp_options::protocol::Response;
use cdp_options::route::{
    ContinueOptions, ErrorReason, HeaderEntry, InterceptedRequest, Route, RouteHandlerEntry,
};
use regex::Regex;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> OptionsResult<()> {
    fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let routes = vec![
        RouteHandlerEntry::new(UrlMatcher::glob("**/*.png")?, |route, request| {
            info!("🖼️ Blocking {}", request.url);
            Some(route.abort(ErrorReason::BlockedByClient))
        }),
        RouteHandlerEntry::new(
            UrlMatcher::regex(Regex::new(r"^https://[^/]+/api/")?),
            |route, request| {
                info!("🌐 Tagging {} {}", request.method, request.url);
                Some(route.continue_request(&ContinueOptions {
                    headers: Some(vec![HeaderEntry::new("X-Intercepted", "1")]),
                    ..Default::default()
                }))
            },
        ),
        RouteHandlerEntry::new(
            UrlMatcher::predicate(|url| url.contains("admin")),
            |route, _| Some(route.fulfill(&serde_json::json!({"responseCode": 403}))),
        ),
    ];

    let frames = [
        r#"{"method":"Fetch.requestPaused","params":{"requestId":"1","resourceType":"Image","request":{"url":"https://www.rust-lang.org/logo.png","method":"GET"}}}"#,
        r#"{"method":"Fetch.requestPaused","params":{"requestId":"2","resourceType":"XHR","request":{"url":"https://crates.io/api/v1/crates","method":"GET"}}}"#,
        r#"{"method":"Fetch.requestPaused","params":{"requestId":"3","resourceType":"Document","request":{"url":"https://x.test/admin","method":"GET"}}}"#,
        r#"{"method":"Fetch.requestPaused","params":{"requestId":"4","resourceType":"Document","request":{"url":"https://x.test/","method":"GET"}}}"#,
    ];

    for (id, frame) in (1u64..).zip(frames) {
        let request = InterceptedRequest::from_response(&Response::from_json(frame)?)?;
        let decision = routes
            .iter()
            .find(|entry| entry.matches(&request.url))
            .and_then(|entry| entry.handle(&Route::for_request(&request), &request));
        match decision {
            Some(command) => info!("📤 Sending {}", command.with_id(id).to_json()?),
            None => info!("📢 No route for {}", request.url),
        }
    }

    Ok(())
}
