//! Builds a game from resolved settings and plays it, collecting the trace.

use std::sync::Arc;
use std::time::Duration;

use config::GameSettings;
use thiserror::Error;
use tokio::time::Instant;
use twentyq::{
    CancellationToken, ChatOpenAI, Coordinator, FnSink, GameError, GameFailure, GamePrompts, GameRecord,
    LlmAnswerer, LlmClient, LlmJudge, LlmQuestioner, PromptLoadError, RecordingSink,
    SecretCatalogue, TraceEvent, TraceSink,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config: {0}")]
    Config(#[from] config::LoadError),
    #[error("prompts: {0}")]
    Prompts(#[from] PromptLoadError),
    #[error(transparent)]
    Game(#[from] GameError),
    /// The game started but did not finish; carries the partial record.
    #[error(transparent)]
    Aborted(#[from] GameFailure),
    #[error("OPENAI_API_KEY is not set (export it, or put it in .env or the [env] table of {0})")]
    MissingApiKey(String),
    #[error("write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to start one game.
#[derive(Debug, Clone, Default)]
pub struct GameOptions {
    /// Fixed secret; when `None` one is drawn from the catalogue.
    pub secret: Option<String>,
    pub settings: GameSettings,
    /// Wall-clock budget for the whole run, checked at phase boundaries.
    pub timeout: Option<Duration>,
}

impl GameOptions {
    /// The explicit secret if given, else a (seeded) pick from the configured catalogue.
    pub fn choose_secret(&self) -> Result<String, RunError> {
        if let Some(secret) = self.secret.as_deref().map(str::trim) {
            if secret.is_empty() {
                return Err(GameError::InvalidConfig("secret must not be empty".into()).into());
            }
            return Ok(secret.to_string());
        }
        let catalogue = match &self.settings.catalogue {
            Some(items) => SecretCatalogue::new(items.iter().map(String::as_str))?,
            None => SecretCatalogue::default(),
        };
        Ok(catalogue.pick(self.settings.seed).to_string())
    }

    pub fn record(&self, secret: String) -> GameRecord {
        GameRecord::new(secret, self.settings.max_rounds)
    }
}

/// Fails early with a readable message instead of a 401 from the first request.
pub fn require_api_key() -> Result<(), RunError> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => {
            let path = config::config_path(config::APP_NAME)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the XDG config".to_string());
            Err(RunError::MissingApiKey(path))
        }
    }
}

fn chat_client(model: &str, temperature: Option<f32>) -> Arc<dyn LlmClient> {
    let client = ChatOpenAI::new(model);
    match temperature {
        Some(t) => Arc::new(client.with_temperature(t)),
        None => Arc::new(client),
    }
}

/// One Chat Completions client per role, sharing one prompt set.
pub fn build_coordinator(settings: &GameSettings) -> Result<Coordinator, RunError> {
    let prompts = Arc::new(GamePrompts::load(settings.prompts_dir.as_deref())?);
    tracing::debug!(
        questioner = %settings.questioner_model,
        answerer = %settings.answerer_model,
        judge = %settings.judge_model,
        "Building coordinator"
    );
    Ok(Coordinator::new(
        Arc::new(LlmQuestioner::new(
            chat_client(&settings.questioner_model, settings.temperature),
            prompts.clone(),
        )),
        Arc::new(LlmAnswerer::new(
            chat_client(&settings.answerer_model, settings.temperature),
            prompts.clone(),
        )),
        Arc::new(LlmJudge::new(
            chat_client(&settings.judge_model, settings.temperature),
            prompts,
        )),
    ))
}

/// Final record plus every event emitted while producing it.
#[derive(Debug, Clone)]
pub struct GameOutput {
    pub record: GameRecord,
    pub events: Vec<TraceEvent>,
}

impl RunError {
    /// Record of a game that stopped part-way, if this error came from one.
    pub fn partial_record(&self) -> Option<&GameRecord> {
        match self {
            RunError::Aborted(failure) => Some(&failure.record),
            _ => None,
        }
    }
}

impl GameOutput {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "record": self.record,
            "summary": self.record.summary(),
            "events": self.events,
        })
    }
}

/// Plays `record` to the end. `on_event` sees each event as it happens (live transcript);
/// the same events are also returned in the output. A game that stops part-way returns
/// [`RunError::Aborted`] with the record as far as it got.
pub async fn play<F>(
    coordinator: Coordinator,
    record: GameRecord,
    on_event: F,
    timeout: Option<Duration>,
    cancel: CancellationToken,
) -> Result<GameOutput, RunError>
where
    F: Fn(&TraceEvent) + Send + Sync + 'static,
{
    let recorder = Arc::new(RecordingSink::new());
    let sink = {
        let recorder = recorder.clone();
        FnSink::new(move |event: &TraceEvent| {
            recorder.emit(event);
            on_event(event);
        })
    };

    let mut coordinator = coordinator
        .with_trace_sink(Arc::new(sink))
        .with_cancellation(cancel);
    if let Some(t) = timeout {
        coordinator = coordinator.with_deadline(Instant::now() + t);
    }

    let record = coordinator.run(record).await?;
    Ok(GameOutput {
        record,
        events: recorder.events(),
    })
}

/// Token cancelled on the first Ctrl-C; the run stops at the next phase boundary.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received; stopping at next phase boundary");
            child.cancel();
        }
    });
    token
}
