//! Request interception: route handler entries and the route-control handle
//! handed to them.
//!
//! The routing table that holds [`RouteHandlerEntry`] values belongs to the
//! page or browser context; it decides iteration order and unregistration.
//! This module only supplies the pieces that table is built from.

use crate::error::OptionsResult;
use crate::matcher::UrlMatcher;
use crate::normalize::{normalize_with, OptionsBuilder, ToOptions};
use crate::option_record;
use crate::protocol::{Command, Response};
use crate::rehydrate::{from_options, rehydrate};
use crate::{OptionMap, OptionValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Decides what happens to a paused request. `None` leaves the request
/// paused for the owner of the routing table.
pub type RouteHandler = Arc<dyn Fn(&Route, &InterceptedRequest) -> Option<Command> + Send + Sync>;

option_record! {
    /// A request paused by the `Fetch` domain.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct InterceptedRequest {
        pub request_id: String => "requestId",
        pub url: String,
        pub method: String,
        pub resource_type: String => "resourceType",
        pub frame_id: Option<String> => "frameId",
        pub network_id: Option<String> => "networkId",
    }
}

impl InterceptedRequest {
    /// Decodes the params of a `Fetch.requestPaused` event. The URL and method
    /// live in the nested `request` object.
    pub fn from_event(params: &OptionMap) -> OptionsResult<Self> {
        let mut request: InterceptedRequest = from_options(params)?;
        if let Some(OptionValue::Object(inner)) = params.get("request") {
            rehydrate(inner, &mut request)?;
        }
        Ok(request)
    }

    pub fn from_response(response: &Response) -> OptionsResult<Self> {
        Self::from_event(&response.event_options())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

option_record! {
    /// Changes applied to a request that is allowed through.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ContinueOptions {
        pub url: Option<String>,
        pub method: Option<String>,
        pub post_data: Option<String> => "postData",
        pub headers: Option<Vec<HeaderEntry>>,
        pub intercept_response: Option<bool> => "interceptResponse",
    }
}

option_record! {
    /// A synthetic response served in place of the network.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct FulfillOptions {
        pub response_code: Option<u16> => "responseCode",
        pub response_headers: Option<Vec<HeaderEntry>> => "responseHeaders",
        /// Base64-encoded.
        pub body: Option<String>,
        pub response_phrase: Option<String> => "responsePhrase",
    }
}

/// Network-level failure reported for an aborted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorReason {
    #[default]
    Failed,
    Aborted,
    TimedOut,
    AccessDenied,
    ConnectionClosed,
    ConnectionReset,
    ConnectionRefused,
    ConnectionAborted,
    ConnectionFailed,
    NameNotResolved,
    InternetDisconnected,
    AddressUnreachable,
    BlockedByClient,
    BlockedByResponse,
}

/// Control handle for one paused request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    request_id: String,
}

impl Route {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    pub fn for_request(request: &InterceptedRequest) -> Self {
        Self::new(request.request_id.clone())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    fn base(&self) -> OptionsBuilder {
        OptionsBuilder::new().insert("requestId", &self.request_id)
    }

    pub fn continue_request<T: ToOptions + ?Sized>(&self, options: &T) -> Command {
        Command::new("Fetch.continueRequest", normalize_with(&self.base(), options))
    }

    /// Serves a response; the status defaults to 200.
    pub fn fulfill<T: ToOptions + ?Sized>(&self, options: &T) -> Command {
        let base = self.base().insert("responseCode", 200);
        Command::new("Fetch.fulfillRequest", normalize_with(&base, options))
    }

    pub fn abort(&self, reason: ErrorReason) -> Command {
        Command::new(
            "Fetch.failRequest",
            self.base().insert("errorReason", reason).build(),
        )
    }
}

/// A matcher paired with the callback run for requests it accepts.
#[derive(Clone)]
pub struct RouteHandlerEntry {
    matcher: UrlMatcher,
    handler: RouteHandler,
}

impl RouteHandlerEntry {
    pub fn new<F>(matcher: UrlMatcher, handler: F) -> Self
    where
        F: Fn(&Route, &InterceptedRequest) -> Option<Command> + Send + Sync + 'static,
    {
        Self {
            matcher,
            handler: Arc::new(handler),
        }
    }

    pub fn matcher(&self) -> &UrlMatcher {
        &self.matcher
    }

    pub fn handler(&self) -> &RouteHandler {
        &self.handler
    }

    pub fn matches(&self, url: &str) -> bool {
        self.matcher.matches(url)
    }

    /// Runs the handler and hands its decision back to the caller, which
    /// forwards it to the transport.
    pub fn handle(&self, route: &Route, request: &InterceptedRequest) -> Option<Command> {
        debug!("Routing {} {} via {:?}", request.method, request.url, self.matcher);
        let decision = (self.handler)(route, request);
        if decision.is_none() {
            debug!("Handler left request {} paused", route.request_id());
        }
        decision
    }
}

impl fmt::Debug for RouteHandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteHandlerEntry")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
