//! # cdp-options
//!
//! Option marshalling and request-interception matching for a Chrome DevTools
//! Protocol automation client.
//!
//! ## Examples
//! ### 1. Normalizing command options
//! Required positional options merge with optional named ones; absent values
//! never reach the wire.
//!
//! ```rust
//! use cdp_options::normalize::normalize_with;
//! use cdp_options::option_record;
//! use cdp_options::protocol::Command;
//! use serde_json::json;
//!
//! option_record! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct NavigateOptions {
//!         pub referrer: Option<String>,
//!         pub transition_type: Option<String> => "transitionType",
//!     }
//! }
//!
//! let options = NavigateOptions {
//!     transition_type: Some("link".into()),
//!     ..Default::default()
//! };
//! let params = normalize_with(&json!({"url": "https://www.rust-lang.org"}), &Some(options));
//! let command = Command::new("Page.navigate", params).with_id(1);
//!
//! assert_eq!(
//!     command.to_json().unwrap(),
//!     r#"{"id":1,"method":"Page.navigate","params":{"transitionType":"link","url":"https://www.rust-lang.org"}}"#
//! );
//! ```
//!
//! ### 2. Routing intercepted requests
//! A routing table holds [`route::RouteHandlerEntry`] values and hands each
//! paused request to the first entry whose matcher accepts its URL. The
//! handler's decision comes back as a [`protocol::Command`] for the table's
//! owner to send.
//!
//! ```rust
//! use cdp_options::error::OptionsResult;
//! use cdp_options::matcher::UrlMatcher;
//! use cdp_options::protocol::Response;
//! use cdp_options::route::{ErrorReason, InterceptedRequest, Route, RouteHandlerEntry};
//!
//! # fn doc_example() -> OptionsResult<()> {
//! let table = vec![
//!     RouteHandlerEntry::new(UrlMatcher::glob("**/*.png")?, |route, _| {
//!         Some(route.abort(ErrorReason::BlockedByClient))
//!     }),
//!     RouteHandlerEntry::new(UrlMatcher::predicate(|url| url.contains("admin")), |route, _| {
//!         Some(route.continue_request(&()))
//!     }),
//! ];
//!
//! let frame = r#"{"method":"Fetch.requestPaused","params":{"requestId":"1","resourceType":"Image","request":{"url":"https://x.test/logo.png","method":"GET"}}}"#;
//! let request = InterceptedRequest::from_response(&Response::from_json(frame)?)?;
//! let command = table
//!     .iter()
//!     .find(|entry| entry.matches(&request.url))
//!     .and_then(|entry| entry.handle(&Route::for_request(&request), &request));
//! assert_eq!(command.map(|c| c.method), Some("Fetch.failRequest".to_string()));
//! # Ok(())
//! # }
//! # doc_example().unwrap();
//! ```

pub mod error;
pub mod expression;
pub mod matcher;
pub mod normalize;
pub mod protocol;
pub mod record;
pub mod rehydrate;
pub mod route;

/// The canonical option map passed across the protocol boundary.
pub type OptionMap = serde_json::Map<String, serde_json::Value>;

/// An opaque option value.
pub type OptionValue = serde_json::Value;
