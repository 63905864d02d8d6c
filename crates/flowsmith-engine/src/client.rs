//! Engine API client.
//!
//! Two calls, in pipeline order: `deploy` uploads a definition file and
//! yields its [`ProcessDefinitionId`]; `start` posts that id and yields the
//! running [`ProcessInstanceId`]. "Started" is where the contract ends; the
//! client never polls for completion.
//!
//! Response interpretation is strict and two-phased. A body that does not
//! parse as the expected JSON shape is [`EngineError::ResponseParse`]; a
//! body that parses but lacks the identifier (absent, `null`, or empty) is
//! [`EngineError::MissingField`]. The two cases point at different server
//! problems and stay distinct all the way up.

use camino::Utf8Path;
use serde::Deserialize;
use std::sync::Arc;

use flowsmith_config::{Config, TransportKind};
use flowsmith_utils::error::EngineError;
use flowsmith_utils::types::{EngineCall, ProcessDefinitionId, ProcessInstanceId};

use crate::curl::CurlTransport;
use crate::http::HttpTransport;
use crate::request::{EngineRequest, EngineResponse, EngineTransport, RequestBody};

/// Form field the deploy endpoint reads the definition from.
const DEPLOY_FILE_FIELD: &str = "file";

/// Identifier field names, as the engine spells them.
const DEFINITION_ID_FIELD: &str = "processDefinitionId";
const INSTANCE_ID_FIELD: &str = "processInstanceId";

/// Client for the engine's deploy/start API.
pub struct EngineClient {
    base_url: String,
    transport: Arc<dyn EngineTransport>,
}

/// Deploy response contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployResponse {
    process_definition_id: Option<String>,
}

/// Start response contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    process_instance_id: Option<String>,
}

impl EngineClient {
    /// Construct with an explicit transport.
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn EngineTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Construct from configuration, selecting the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] when the selected transport cannot
    /// be constructed (curl missing, HTTP client build failure).
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let transport: Arc<dyn EngineTransport> = match config.engine.transport {
            TransportKind::Curl => Arc::new(CurlTransport::new(config)?),
            TransportKind::Http => Arc::new(HttpTransport::new(config)?),
        };
        Ok(Self::new(config.engine.base_url.clone(), transport))
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a definition file to `{base_url}/deploy`.
    ///
    /// # Errors
    ///
    /// Transport failures pass through; response bodies that are not JSON
    /// become [`EngineError::ResponseParse`] and JSON without a usable
    /// `processDefinitionId` becomes [`EngineError::MissingField`].
    pub async fn deploy(&self, artifact: &Utf8Path) -> Result<ProcessDefinitionId, EngineError> {
        let request = EngineRequest {
            call: EngineCall::Deploy,
            url: format!("{}/deploy", self.base_url),
            body: RequestBody::FileUpload {
                field: DEPLOY_FILE_FIELD.to_string(),
                path: artifact.to_path_buf(),
            },
        };

        let response = self.transport.send(&request).await?;
        let parsed: DeployResponse = Self::parse_body(EngineCall::Deploy, &response)?;

        match parsed.process_definition_id {
            Some(id) if !id.is_empty() => {
                tracing::info!(definition_id = %id, "definition deployed");
                Ok(ProcessDefinitionId::new(id))
            }
            _ => Err(EngineError::MissingField {
                call: EngineCall::Deploy,
                field: DEFINITION_ID_FIELD,
            }),
        }
    }

    /// Start an instance of a deployed definition via `{base_url}/start`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`deploy`](Self::deploy), with
    /// `processInstanceId` as the required field.
    pub async fn start(
        &self,
        definition: &ProcessDefinitionId,
    ) -> Result<ProcessInstanceId, EngineError> {
        let request = EngineRequest {
            call: EngineCall::Start,
            url: format!("{}/start", self.base_url),
            body: RequestBody::Json(serde_json::json!({
                DEFINITION_ID_FIELD: definition.as_str(),
            })),
        };

        let response = self.transport.send(&request).await?;
        let parsed: StartResponse = Self::parse_body(EngineCall::Start, &response)?;

        match parsed.process_instance_id {
            Some(id) if !id.is_empty() => {
                tracing::info!(instance_id = %id, "process instance started");
                Ok(ProcessInstanceId::new(id))
            }
            _ => Err(EngineError::MissingField {
                call: EngineCall::Start,
                field: INSTANCE_ID_FIELD,
            }),
        }
    }

    fn parse_body<T: for<'de> Deserialize<'de>>(
        call: EngineCall,
        response: &EngineResponse,
    ) -> Result<T, EngineError> {
        serde_json::from_str(&response.body).map_err(|e| {
            tracing::debug!(call = %call, body = %response.body, "unparseable engine response");
            EngineError::ResponseParse {
                call,
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that replays canned responses and records requests.
    struct MockTransport {
        responses: Mutex<VecDeque<Result<EngineResponse, EngineError>>>,
        requests: Mutex<Vec<EngineRequest>>,
    }

    impl MockTransport {
        fn replying(bodies: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    bodies
                        .into_iter()
                        .map(|b| {
                            Ok(EngineResponse {
                                status: Some(200),
                                body: b.to_string(),
                            })
                        })
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: EngineError) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from([Err(err)])),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<EngineRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EngineTransport for MockTransport {
        async fn send(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock transport ran out of responses")
        }
    }

    fn client_with(transport: Arc<MockTransport>) -> EngineClient {
        EngineClient::new("http://localhost:8080", transport)
    }

    #[tokio::test]
    async fn test_deploy_extracts_definition_id() {
        let transport = MockTransport::replying(vec![r#"{"processDefinitionId": "def-123"}"#]);
        let client = client_with(transport.clone());

        let id = client
            .deploy(Utf8Path::new("/work/flow.bpmn20.xml"))
            .await
            .unwrap();

        assert_eq!(id.as_str(), "def-123");

        let requests = transport.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].call, EngineCall::Deploy);
        assert_eq!(requests[0].url, "http://localhost:8080/deploy");
        match &requests[0].body {
            RequestBody::FileUpload { field, path } => {
                assert_eq!(field, "file");
                assert_eq!(path.as_str(), "/work/flow.bpmn20.xml");
            }
            RequestBody::Json(_) => panic!("deploy must be a file upload"),
        }
    }

    #[tokio::test]
    async fn test_start_posts_definition_id_and_extracts_instance_id() {
        let transport = MockTransport::replying(vec![r#"{"processInstanceId": "inst-9"}"#]);
        let client = client_with(transport.clone());

        let instance = client
            .start(&ProcessDefinitionId::new("def-123"))
            .await
            .unwrap();

        assert_eq!(instance.as_str(), "inst-9");

        let requests = transport.recorded();
        assert_eq!(requests[0].url, "http://localhost:8080/start");
        match &requests[0].body {
            RequestBody::Json(value) => {
                assert_eq!(value, &serde_json::json!({"processDefinitionId": "def-123"}));
            }
            RequestBody::FileUpload { .. } => panic!("start must be a JSON post"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_response_parse_error() {
        let transport =
            MockTransport::replying(vec!["<html><body>Internal Server Error</body></html>"]);
        let client = client_with(transport);

        let err = client
            .deploy(Utf8Path::new("/work/flow.bpmn20.xml"))
            .await
            .unwrap_err();

        match err {
            EngineError::ResponseParse { call, .. } => assert_eq!(call, EngineCall::Deploy),
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_json_without_field_is_missing_field_error() {
        let transport = MockTransport::replying(vec![r#"{"deploymentId": "dep-1"}"#]);
        let client = client_with(transport);

        let err = client
            .deploy(Utf8Path::new("/work/flow.bpmn20.xml"))
            .await
            .unwrap_err();

        match err {
            EngineError::MissingField { call, field } => {
                assert_eq!(call, EngineCall::Deploy);
                assert_eq!(field, "processDefinitionId");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_and_empty_ids_are_missing_field_errors() {
        for body in [
            r#"{"processInstanceId": null}"#,
            r#"{"processInstanceId": ""}"#,
            "{}",
        ] {
            let transport = MockTransport::replying(vec![body]);
            let client = client_with(transport);

            let err = client
                .start(&ProcessDefinitionId::new("def-123"))
                .await
                .unwrap_err();

            assert!(
                matches!(
                    err,
                    EngineError::MissingField {
                        call: EngineCall::Start,
                        field: "processInstanceId",
                    }
                ),
                "body {body:?} produced {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_parse_and_missing_field_never_conflate() {
        let not_json = MockTransport::replying(vec!["definitely not json"]);
        let missing = MockTransport::replying(vec!["{}"]);

        let parse_err = client_with(not_json)
            .deploy(Utf8Path::new("/a.xml"))
            .await
            .unwrap_err();
        let missing_err = client_with(missing)
            .deploy(Utf8Path::new("/a.xml"))
            .await
            .unwrap_err();

        assert!(matches!(parse_err, EngineError::ResponseParse { .. }));
        assert!(matches!(missing_err, EngineError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let transport = MockTransport::failing(EngineError::CommandFailed {
            exit_code: Some(7),
            stdout: String::new(),
            stderr: "connection refused".to_string(),
        });
        let client = client_with(transport);

        let err = client
            .deploy(Utf8Path::new("/work/flow.bpmn20.xml"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_extra_response_fields_are_tolerated() {
        let transport = MockTransport::replying(vec![
            r#"{"processDefinitionId": "def-5", "deploymentTime": "2026-01-01T00:00:00Z", "tenantId": null}"#,
        ]);
        let client = client_with(transport);

        let id = client.deploy(Utf8Path::new("/a.xml")).await.unwrap();
        assert_eq!(id.as_str(), "def-5");
    }
}
