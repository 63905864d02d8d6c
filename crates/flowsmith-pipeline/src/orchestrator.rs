//! Five-stage pipeline execution with halt-on-first-failure semantics.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use flowsmith_config::Config;
use flowsmith_engine::EngineClient;
use flowsmith_generator::{CapabilityProfile, DefinitionGenerator, GeneratedDefinition, GenerationRequest};
use flowsmith_report::{ArtifactRecord, ReportWriter, RunReport};
use flowsmith_utils::error::{FlowsmithError, PipelineError};
use flowsmith_utils::logging::{log_stage_complete, log_stage_error, log_stage_start};
use flowsmith_utils::store::{self, WrittenFile};
use flowsmith_utils::types::{PipelineState, ProcessDefinitionId, ProcessInstanceId, Stage};

/// Result of a pipeline run that reached `Completed`.
///
/// Collects every output the five stages produced. A failed run never yields
/// one of these; the [`PipelineError`] names the stage it halted in instead.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The user's request, verbatim.
    pub request: String,
    /// Identifier the engine assigned to the deployed definition.
    pub definition_id: ProcessDefinitionId,
    /// Identifier the engine assigned to the started instance.
    pub instance_id: ProcessInstanceId,
    /// The persisted definition with its size and content hash.
    pub artifact: ArtifactRecord,
    /// The written run report.
    pub report: WrittenFile,
    /// Stages that ran to completion, in execution order.
    pub completed: Vec<Stage>,
    /// When the run entered its first stage.
    pub started_at: DateTime<Utc>,
    /// When the final stage finished.
    pub finished_at: DateTime<Utc>,
}

/// Drives one workflow request through the five stages in fixed order:
/// generate, persist, deploy, start, report.
///
/// Each stage consumes the validated output of the previous one. The first
/// failure halts the run: the state machine drops into `Failed` at the
/// current stage and the typed error is returned. There are no retries and
/// no compensating actions, so side effects accumulate: a failed start
/// leaves a deployed definition behind, and a failed report leaves a
/// deployed-and-started instance with no local record.
pub struct Orchestrator {
    config: Config,
    generator: Box<dyn DefinitionGenerator>,
    engine: EngineClient,
    capabilities: CapabilityProfile,
    state: PipelineState,
}

impl Orchestrator {
    /// Assemble a pipeline from already-constructed collaborators.
    #[must_use]
    pub fn new(
        config: Config,
        generator: Box<dyn DefinitionGenerator>,
        engine: EngineClient,
        capabilities: CapabilityProfile,
    ) -> Self {
        Self {
            config,
            generator,
            engine,
            capabilities,
            state: PipelineState::Idle,
        }
    }

    /// Assemble a pipeline from configuration: provider lookup, engine
    /// client construction, and capability loading.
    ///
    /// # Errors
    ///
    /// Fails when the configured provider is unknown or the engine transport
    /// cannot be constructed (for example, no curl binary on `PATH`). A
    /// missing capabilities file is not an error; generation proceeds with
    /// the placeholder profile.
    pub fn from_config(config: Config) -> Result<Self, FlowsmithError> {
        let generator = flowsmith_generator::from_config(&config)?;
        let engine = EngineClient::from_config(&config)?;
        let capabilities = CapabilityProfile::load(&config.capabilities_path());
        Ok(Self::new(config, generator, engine, capabilities))
    }

    /// Current state of the run. Observable before, during, and after `run`.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The configuration this pipeline was assembled from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the five stages for `request`.
    ///
    /// Runs once per pipeline: transitions are forward-only, so a pipeline
    /// whose state machine already reached `Completed` or `Failed` refuses
    /// to run again.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, wrapped in the [`PipelineError`]
    /// variant naming that stage. Side effects committed by earlier stages
    /// (the written artifact, the engine-side deploy and start) are left in
    /// place.
    pub async fn run(&mut self, request: &str) -> Result<PipelineRun, PipelineError> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::InvalidState { from: self.state });
        }

        info!(
            provider = %self.generator.name(),
            engine = %self.engine.base_url(),
            "pipeline run started"
        );

        let started_at = Utc::now();
        let mut completed = Vec::with_capacity(Stage::ALL.len());

        // Stage 1: turn the request into a definition document.
        let definition = self.generate(request).await?;
        completed.push(Stage::Generating);

        // Stage 2: persist the document; from here on, side effects stay.
        let artifact = self.persist(&definition)?;
        completed.push(Stage::Persisting);

        // Stage 3: deploy the persisted artifact to the engine.
        let definition_id = self.deploy(&artifact).await?;
        completed.push(Stage::Deploying);

        // Stage 4: start an instance of the deployed definition.
        let instance_id = self.start(&definition_id).await?;
        completed.push(Stage::Starting);

        // Stage 5: write the run report; engine-side effects are already
        // committed, so a failure here is purely local.
        let report = self.report(request, &definition_id, &instance_id, &artifact)?;
        completed.push(Stage::Reporting);
        let finished_at = Utc::now();

        self.transition(PipelineState::Completed);
        info!(
            definition_id = %definition_id,
            instance_id = %instance_id,
            report = %report.path,
            "pipeline run completed"
        );

        Ok(PipelineRun {
            request: request.to_string(),
            definition_id,
            instance_id,
            artifact,
            report,
            completed,
            started_at,
            finished_at,
        })
    }

    async fn generate(&mut self, request: &str) -> Result<GeneratedDefinition, PipelineError> {
        self.enter(Stage::Generating);
        let started = Instant::now();

        let generation = GenerationRequest::new(request, self.capabilities.clone());
        let definition = match self.generator.generate(&generation).await {
            Ok(definition) => definition,
            Err(err) => return Err(self.fail(Stage::Generating, PipelineError::Generate(err))),
        };

        debug!(
            provider = %definition.provider,
            process_id = definition.process_id.as_deref().unwrap_or("unknown"),
            bytes = definition.content.len(),
            "definition generated"
        );
        log_stage_complete(Stage::Generating, elapsed_ms(started));
        Ok(definition)
    }

    fn persist(&mut self, definition: &GeneratedDefinition) -> Result<ArtifactRecord, PipelineError> {
        self.enter(Stage::Persisting);
        let started = Instant::now();

        let path = self.config.artifact_path();
        let written = match store::write_text_atomic(&path, &definition.content) {
            Ok(written) => written,
            Err(err) => return Err(self.fail(Stage::Persisting, PipelineError::Persist(err))),
        };

        let artifact = ArtifactRecord {
            path: written.path,
            bytes: written.bytes,
            blake3_hex: blake3::hash(definition.content.as_bytes())
                .to_hex()
                .to_string(),
        };

        log_stage_complete(Stage::Persisting, elapsed_ms(started));
        Ok(artifact)
    }

    async fn deploy(&mut self, artifact: &ArtifactRecord) -> Result<ProcessDefinitionId, PipelineError> {
        self.enter(Stage::Deploying);
        let started = Instant::now();

        let definition_id = match self.engine.deploy(&artifact.path).await {
            Ok(id) => id,
            Err(err) => return Err(self.fail(Stage::Deploying, PipelineError::Deploy(err))),
        };

        log_stage_complete(Stage::Deploying, elapsed_ms(started));
        Ok(definition_id)
    }

    async fn start(
        &mut self,
        definition_id: &ProcessDefinitionId,
    ) -> Result<ProcessInstanceId, PipelineError> {
        self.enter(Stage::Starting);
        let started = Instant::now();

        let instance_id = match self.engine.start(definition_id).await {
            Ok(id) => id,
            Err(err) => return Err(self.fail(Stage::Starting, PipelineError::Start(err))),
        };

        log_stage_complete(Stage::Starting, elapsed_ms(started));
        Ok(instance_id)
    }

    fn report(
        &mut self,
        request: &str,
        definition_id: &ProcessDefinitionId,
        instance_id: &ProcessInstanceId,
        artifact: &ArtifactRecord,
    ) -> Result<WrittenFile, PipelineError> {
        self.enter(Stage::Reporting);
        let started = Instant::now();

        let report = RunReport::new(
            request,
            definition_id.clone(),
            instance_id.clone(),
            artifact.clone(),
        );
        let written = match ReportWriter::new(self.config.report_path()).write(&report) {
            Ok(written) => written,
            Err(err) => return Err(self.fail(Stage::Reporting, PipelineError::Report(err))),
        };

        log_stage_complete(Stage::Reporting, elapsed_ms(started));
        Ok(written)
    }

    /// Advance into a working stage.
    fn enter(&mut self, stage: Stage) {
        self.transition(PipelineState::Working(stage));
        log_stage_start(stage);
    }

    /// Drop into `Failed` at `stage` and hand the error back for return.
    fn fail(&mut self, stage: Stage, err: PipelineError) -> PipelineError {
        self.transition(PipelineState::Failed(stage));
        log_stage_error(stage, &err);
        err
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal pipeline transition: {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use camino::Utf8PathBuf;

    use flowsmith_engine::{EngineRequest, EngineResponse, EngineTransport, RequestBody};
    use flowsmith_generator::TemplateGenerator;
    use flowsmith_utils::error::{EngineError, GeneratorError};
    use flowsmith_utils::types::EngineCall;

    const TWO_STEP_REQUEST: &str = "I need a simple two-step approval workflow for a document, \
         first by a manager, then by the finance team.";

    /// Transport that replays a scripted sequence of results and records
    /// every request it saw.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<EngineResponse, EngineError>>>,
        seen: Mutex<Vec<EngineRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<EngineResponse, EngineError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        /// Deploy and start both succeed with the given identifiers.
        fn happy(definition_id: &str, instance_id: &str) -> Arc<Self> {
            Self::new(vec![
                Ok(body(&format!(r#"{{"processDefinitionId": "{definition_id}"}}"#))),
                Ok(body(&format!(r#"{{"processInstanceId": "{instance_id}"}}"#))),
            ])
        }

        fn seen_calls(&self) -> Vec<EngineCall> {
            self.seen.lock().unwrap().iter().map(|r| r.call).collect()
        }
    }

    #[async_trait]
    impl EngineTransport for ScriptedTransport {
        async fn send(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
            self.seen.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unscripted engine call: {}", request.call))
        }
    }

    fn body(text: &str) -> EngineResponse {
        EngineResponse {
            status: Some(200),
            body: text.to_string(),
        }
    }

    /// Generator that declines every request.
    #[derive(Debug)]
    struct DecliningGenerator;

    #[async_trait]
    impl DefinitionGenerator for DecliningGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GeneratedDefinition, GeneratorError> {
            Err(GeneratorError::Declined {
                reason: "pattern not in catalog".to_string(),
            })
        }

        fn name(&self) -> &str {
            "declining"
        }
    }

    /// Generator returning a fixed document.
    #[derive(Debug)]
    struct FixedGenerator(&'static str);

    #[async_trait]
    impl DefinitionGenerator for FixedGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GeneratedDefinition, GeneratorError> {
            Ok(GeneratedDefinition::new(self.0, "fixed"))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        transport: Arc<ScriptedTransport>,
        orchestrator: Orchestrator,
    }

    fn harness(generator: Box<dyn DefinitionGenerator>, transport: Arc<ScriptedTransport>) -> Harness {
        let dir = tempfile::TempDir::new().unwrap();
        let workspace = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let config = Config::builder().workspace_dir(workspace).build().unwrap();
        let engine = EngineClient::new(config.engine.base_url.clone(), transport.clone());
        let orchestrator = Orchestrator::new(
            config,
            generator,
            engine,
            CapabilityProfile::from_text("Use camelCase ids."),
        );
        Harness {
            _dir: dir,
            transport,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_happy_path_report_carries_both_identifiers() {
        let mut h = harness(
            Box::new(TemplateGenerator::new()),
            ScriptedTransport::happy("twoStepApproval:1:a1b2", "run-77"),
        );

        let run = h.orchestrator.run(TWO_STEP_REQUEST).await.unwrap();

        assert_eq!(run.definition_id.as_str(), "twoStepApproval:1:a1b2");
        assert_eq!(run.instance_id.as_str(), "run-77");
        assert_eq!(run.completed, Stage::ALL);
        assert!(run.started_at <= run.finished_at);
        assert_eq!(h.orchestrator.state(), PipelineState::Completed);

        let report = std::fs::read_to_string(&run.report.path).unwrap();
        assert!(report.contains("twoStepApproval:1:a1b2"));
        assert!(report.contains("run-77"));
        let heading = report.find("## User Request").unwrap();
        let request = report.find(TWO_STEP_REQUEST).unwrap();
        assert!(request > heading);
    }

    #[tokio::test]
    async fn test_happy_path_persists_artifact_before_deploying() {
        let mut h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::happy("d-1", "i-1"),
        );

        let run = h.orchestrator.run("anything").await.unwrap();

        let on_disk = std::fs::read_to_string(run.artifact.path.as_std_path()).unwrap();
        assert_eq!(on_disk, "<definitions/>");
        assert_eq!(run.artifact.bytes, on_disk.len() as u64);
        assert_eq!(
            run.artifact.blake3_hex,
            blake3::hash(b"<definitions/>").to_hex().to_string()
        );

        // Deploy uploaded the persisted path; start referenced the returned id.
        let seen = h.transport.seen.lock().unwrap();
        match &seen[0].body {
            RequestBody::FileUpload { field, path } => {
                assert_eq!(field, "file");
                assert_eq!(path, &run.artifact.path);
            }
            other => panic!("deploy sent {other:?}"),
        }
        match &seen[1].body {
            RequestBody::Json(value) => {
                assert_eq!(value["processDefinitionId"], "d-1");
            }
            other => panic!("start sent {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_declined_generation_halts_with_no_side_effects() {
        let mut h = harness(Box::new(DecliningGenerator), ScriptedTransport::new(vec![]));

        let err = h.orchestrator.run("draw me a pony").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Generate(GeneratorError::Declined { .. })
        ));
        assert_eq!(
            h.orchestrator.state(),
            PipelineState::Failed(Stage::Generating)
        );
        assert!(h.transport.seen_calls().is_empty());
        assert!(!h.orchestrator.config().artifact_path().as_std_path().exists());
        assert!(!h.orchestrator.config().report_path().as_std_path().exists());
    }

    #[tokio::test]
    async fn test_deploy_command_failure_halts_before_start() {
        let mut h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::new(vec![Err(EngineError::CommandFailed {
                exit_code: Some(7),
                stdout: String::new(),
                stderr: "Failed to connect to localhost port 8080".to_string(),
            })]),
        );

        let err = h.orchestrator.run("anything").await.unwrap_err();

        match &err {
            PipelineError::Deploy(EngineError::CommandFailed { exit_code, stderr, .. }) => {
                assert_eq!(*exit_code, Some(7));
                assert!(stderr.contains("Failed to connect"));
            }
            other => panic!("expected deploy command failure, got {other:?}"),
        }
        assert_eq!(
            h.orchestrator.state(),
            PipelineState::Failed(Stage::Deploying)
        );
        assert_eq!(h.transport.seen_calls(), vec![EngineCall::Deploy]);

        // The artifact was already persisted; failure does not roll it back.
        assert!(h.orchestrator.config().artifact_path().as_std_path().exists());
        assert!(!h.orchestrator.config().report_path().as_std_path().exists());
    }

    #[tokio::test]
    async fn test_start_missing_field_preserves_deploy_side_effect() {
        let mut h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::new(vec![
                Ok(body(r#"{"processDefinitionId": "d-9"}"#)),
                Ok(body(r#"{"links": []}"#)),
            ]),
        );

        let err = h.orchestrator.run("anything").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Start(EngineError::MissingField {
                call: EngineCall::Start,
                field: "processInstanceId",
            })
        ));
        assert_eq!(
            h.orchestrator.state(),
            PipelineState::Failed(Stage::Starting)
        );
        assert_eq!(
            h.transport.seen_calls(),
            vec![EngineCall::Deploy, EngineCall::Start]
        );
        assert!(!h.orchestrator.config().report_path().as_std_path().exists());
    }

    #[tokio::test]
    async fn test_start_malformed_body_is_a_parse_error_not_missing_field() {
        let mut h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::new(vec![
                Ok(body(r#"{"processDefinitionId": "d-9"}"#)),
                Ok(body("<html>502 Bad Gateway</html>")),
            ]),
        );

        let err = h.orchestrator.run("anything").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Start(EngineError::ResponseParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_same_request_yields_byte_identical_artifacts() {
        let mut first = harness(
            Box::new(TemplateGenerator::new()),
            ScriptedTransport::happy("d-1", "i-1"),
        );
        let mut second = harness(
            Box::new(TemplateGenerator::new()),
            ScriptedTransport::happy("d-2", "i-2"),
        );

        let a = first.orchestrator.run(TWO_STEP_REQUEST).await.unwrap();
        let b = second.orchestrator.run(TWO_STEP_REQUEST).await.unwrap();

        let bytes_a = std::fs::read(a.artifact.path.as_std_path()).unwrap();
        let bytes_b = std::fs::read(b.artifact.path.as_std_path()).unwrap();
        assert_eq!(bytes_a, bytes_b);
        assert_eq!(a.artifact.blake3_hex, b.artifact.blake3_hex);
    }

    #[tokio::test]
    async fn test_report_write_failure_fails_the_reporting_stage() {
        let dir = tempfile::TempDir::new().unwrap();
        let workspace = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        // Occupy the report's parent path with a file so directory creation
        // inside it must fail.
        std::fs::write(dir.path().join("blocked"), b"file, not a dir").unwrap();
        let config = Config::builder()
            .workspace_dir(workspace)
            .report_path("blocked/test_summary.md")
            .build()
            .unwrap();

        let transport = ScriptedTransport::happy("d-1", "i-1");
        let engine = EngineClient::new(config.engine.base_url.clone(), transport.clone());
        let mut orchestrator = Orchestrator::new(
            config,
            Box::new(FixedGenerator("<definitions/>")),
            engine,
            CapabilityProfile::from_text("rules"),
        );

        let err = orchestrator.run("anything").await.unwrap_err();

        assert!(matches!(err, PipelineError::Report(_)));
        assert_eq!(orchestrator.state(), PipelineState::Failed(Stage::Reporting));
        // Both engine calls were committed before the failure.
        assert_eq!(
            transport.seen_calls(),
            vec![EngineCall::Deploy, EngineCall::Start]
        );
    }

    #[tokio::test]
    async fn test_run_refuses_to_restart_a_finished_pipeline() {
        let mut h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::happy("d-1", "i-1"),
        );

        h.orchestrator.run("anything").await.unwrap();
        let err = h.orchestrator.run("anything").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::InvalidState {
                from: PipelineState::Completed
            }
        ));
        assert_eq!(h.orchestrator.state(), PipelineState::Completed);
    }

    #[tokio::test]
    async fn test_state_is_idle_before_any_run() {
        let h = harness(
            Box::new(FixedGenerator("<definitions/>")),
            ScriptedTransport::new(vec![]),
        );
        assert_eq!(h.orchestrator.state(), PipelineState::Idle);
    }
}
