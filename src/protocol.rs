use crate::error::{OptionsError, OptionsResult};
use crate::normalize::{normalize, ToOptions};
use crate::record::OptionRecord;
use crate::rehydrate::from_options;
use crate::{OptionMap, OptionValue};
use serde::{Deserialize, Serialize};

/// An outbound protocol command whose params are a canonical option map.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Command {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: String,
    #[serde(skip_serializing_if = "OptionMap::is_empty")]
    pub params: OptionMap,
}

impl Command {
    pub fn new(method: impl Into<String>, params: OptionMap) -> Self {
        Self {
            id: None,
            method: method.into(),
            params,
        }
    }

    pub fn with_options<T: ToOptions + ?Sized>(method: impl Into<String>, options: &T) -> Self {
        Self::new(method, normalize(options))
    }

    /// Stamps the id the transport correlates the response with.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn to_json(&self) -> OptionsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A frame received from the browser: either a command response (`id` set)
/// or an event (`method` set).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Response {
    pub id: Option<u64>,
    pub result: Option<OptionValue>,
    pub error: Option<OptionValue>,
    pub method: Option<String>,
    pub params: Option<OptionValue>,
}

impl Response {
    pub fn from_json(text: &str) -> OptionsResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_event(&self) -> bool {
        self.id.is_none() && self.method.is_some()
    }

    /// The command result as a canonical map, or the protocol error it carried.
    pub fn into_result(self) -> OptionsResult<OptionMap> {
        if let Some(error_obj) = self.error {
            return Err(OptionsError::Protocol {
                code: error_obj["code"].as_i64().unwrap_or(-1),
                message: error_obj["message"]
                    .as_str()
                    .unwrap_or("Unknown CDP error")
                    .to_string(),
            });
        }
        Ok(normalize(&self.result))
    }

    pub fn event_options(&self) -> OptionMap {
        normalize(&self.params)
    }

    pub fn rehydrate_result<R: OptionRecord + Default>(self) -> OptionsResult<R> {
        from_options(&self.into_result()?)
    }

    pub fn rehydrate_params<R: OptionRecord + Default>(&self) -> OptionsResult<R> {
        from_options(&self.event_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option_record;
    use serde_json::json;

    option_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct NavigateResult {
            frame_id: String => "frameId",
            loader_id: Option<String> => "loaderId",
            error_text: Option<String> => "errorText",
        }
    }

    #[test]
    fn test_command_serialization_omits_empty_params() {
        let json = Command::with_options("Page.enable", &()).with_id(3).to_json().unwrap();
        assert_eq!(json, r#"{"id":3,"method":"Page.enable"}"#);

        let json = Command::with_options("Page.navigate", &json!({"url": "about:blank", "referrer": null}))
            .with_id(4)
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"id":4,"method":"Page.navigate","params":{"url":"about:blank"}}"#);
    }

    #[test]
    fn test_result_rehydrates_into_record() {
        let response = Response::from_json(
            r#"{"id":4,"result":{"frameId":"F1","loaderId":"L9"}}"#,
        )
        .unwrap();
        assert!(!response.is_event());

        let result: NavigateResult = response.rehydrate_result().unwrap();
        assert_eq!(result.frame_id, "F1");
        assert_eq!(result.loader_id.as_deref(), Some("L9"));
        assert_eq!(result.error_text, None);
    }

    #[test]
    fn test_protocol_error_mapping() {
        let response = Response::from_json(
            r#"{"id":5,"error":{"code":-32000,"message":"Cannot navigate to invalid URL"}}"#,
        )
        .unwrap();

        match response.into_result() {
            Err(OptionsError::Protocol { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "Cannot navigate to invalid URL");
            }
            other => panic!("❌ Expected Protocol error, but got: {:?}", other),
        }
    }

    #[test]
    fn test_event_params_as_options() {
        let response =
            Response::from_json(r#"{"method":"Page.loadEventFired","params":{"timestamp":12345}}"#)
                .unwrap();
        assert!(response.is_event());
        assert_eq!(response.event_options()["timestamp"], json!(12345));

        let empty = Response::from_json(r#"{"id":1,"result":{}}"#).unwrap();
        assert!(empty.event_options().is_empty());
        assert!(empty.into_result().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_frame_is_json_error() {
        assert!(matches!(Response::from_json("{not json"), Err(OptionsError::Json(_))));
    }
}
