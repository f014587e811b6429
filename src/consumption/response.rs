//! Serde model of the EIA v2 API response envelope for the natural-gas consumption route.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top level of an API reply: either a `response` body or an `error` message.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub response: Option<ApiResponse>,
    pub error: Option<String>,
    pub code: Option<Value>,
}

impl ApiEnvelope {
    /// The API error message, with the error code appended when one was sent.
    pub fn error_message(&self) -> Option<String> {
        let message = self.error.as_deref()?;
        Some(match &self.code {
            None | Some(Value::Null) => message.to_string(),
            Some(Value::String(code)) => format!("{} (code {})", message, code),
            Some(code) => format!("{} (code {})", message, code),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Number of rows matching the request; EIA sends it as a string or a number.
    pub total: Option<Value>,
    pub date_format: Option<String>,
    pub frequency: Option<String>,
    #[serde(default)]
    pub warnings: Vec<ApiWarning>,
    #[serde(default)]
    pub data: Vec<ConsumptionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiWarning {
    pub warning: Option<String>,
    pub description: Option<String>,
}

/// One data row of the consumption route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsumptionRecord {
    pub period: Option<String>,
    pub duoarea: Option<String>,
    pub area_name: Option<String>,
    pub product: Option<String>,
    pub product_name: Option<String>,
    pub process: Option<String>,
    pub process_name: Option<String>,
    pub series: Option<String>,
    pub series_description: Option<String>,
    /// Kept as sent (string, number or null); coercion happens during reconciliation.
    pub value: Option<Value>,
    pub units: Option<String>,
}

impl ConsumptionRecord {
    /// The value in its textual form, `None` when the API sent null.
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}
