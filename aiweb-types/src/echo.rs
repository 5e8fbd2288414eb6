use serde::{Deserialize, Serialize};

/// Request body for `POST /echo` and `POST /flaky-echo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EchoPayload {
    pub msg: String,
}

/// Echoed message. `attempts` is only present when the call went through the
/// simulated-failure path and counts the successful request as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EchoResponse {
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_echo_omits_attempts() {
        let json = serde_json::to_string(&EchoResponse { msg: "hi".into(), attempts: None }).unwrap();
        assert_eq!(json, r#"{"msg":"hi"}"#);
    }
}
