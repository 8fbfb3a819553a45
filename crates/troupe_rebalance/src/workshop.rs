//! Script workshop: review, polish, stage kits and rehearsal coaching.
//!
//! Unlike rebalancing there is nothing to fall back on here, so service
//! failures are returned to the caller.

use crate::{prompts, service::call};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use troupe_core::{Message, ParserConfig, PracticeTurn, RoleSet, ScriptParser, roles_of};
use troupe_error::{RebalanceError, RebalanceErrorKind, TroupeResult};
use troupe_interface::GenerationService;
use tracing::{info, instrument, warn};

/// Sampling limits for one kind of workshop request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskLimits {
    /// Sampling temperature
    pub temperature: f32,
    /// Longest answer, in tokens
    pub max_tokens: u32,
}

impl TaskLimits {
    const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

fn default_feedback() -> TaskLimits {
    TaskLimits::new(0.4, 1400)
}

fn default_final_draft() -> TaskLimits {
    TaskLimits::new(0.6, 2600)
}

fn default_stage_kit() -> TaskLimits {
    TaskLimits::new(0.4, 1200)
}

fn default_session_feedback() -> TaskLimits {
    TaskLimits::new(0.4, 800)
}

fn default_call_timeout_secs() -> u64 {
    120
}

/// Workshop configuration, the `[workshop]` table of `troupe.toml`.
///
/// # Examples
///
/// ```
/// use troupe_rebalance::WorkshopConfig;
///
/// let config: WorkshopConfig =
///     serde_json::from_str(r#"{"stage_kit": {"temperature": 0.2, "max_tokens": 600}}"#).unwrap();
/// assert_eq!(config.stage_kit.max_tokens, 600);
/// assert_eq!(config.final_draft.max_tokens, 2600);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopConfig {
    /// Deadline for one generation call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Seven-criteria script review
    #[serde(default = "default_feedback")]
    pub feedback: TaskLimits,

    /// Polished performance draft
    #[serde(default = "default_final_draft")]
    pub final_draft: TaskLimits,

    /// Props, set and costume checklist
    #[serde(default = "default_stage_kit")]
    pub stage_kit: TaskLimits,

    /// Rehearsal session coaching
    #[serde(default = "default_session_feedback")]
    pub session_feedback: TaskLimits,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout_secs(),
            feedback: default_feedback(),
            final_draft: default_final_draft(),
            stage_kit: default_stage_kit(),
            session_feedback: default_session_feedback(),
        }
    }
}

impl WorkshopConfig {
    /// Deadline for one generation call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// A polished draft, held to the cast of the script it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDraft {
    /// The draft, with lines by invented speakers demoted to stage directions
    pub script: String,
    /// How many lines were demoted
    pub demoted: usize,
}

/// Text-to-text helpers around a script, backed by a generation service.
///
/// # Examples
///
/// ```
/// use troupe_models::OfflineService;
/// use troupe_rebalance::Workshop;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let workshop = Workshop::new(OfflineService::new());
/// assert!(workshop.feedback("Mina: Hello there.").await.is_err());
/// # }
/// ```
#[derive(Debug)]
pub struct Workshop<S> {
    service: S,
    config: WorkshopConfig,
    parser: ScriptParser,
}

impl<S: GenerationService> Workshop<S> {
    /// Workshop with default limits.
    pub fn new(service: S) -> Self {
        Self::with_config(service, WorkshopConfig::default())
    }

    /// Workshop with explicit limits.
    pub fn with_config(service: S, config: WorkshopConfig) -> Self {
        Self {
            service,
            config,
            parser: ScriptParser::default(),
        }
    }

    /// Use these speaker label rules when reading scripts.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = ScriptParser::new(parser);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &WorkshopConfig {
        &self.config
    }

    /// The generation service.
    pub fn service(&self) -> &S {
        &self.service
    }

    async fn ask(&self, user: String, limits: TaskLimits) -> TroupeResult<String> {
        let messages = vec![Message::system(prompts::coach_system()), Message::user(user)];
        call(
            &self.service,
            messages,
            Some(limits.max_tokens),
            Some(limits.temperature),
            self.config.call_timeout(),
        )
        .await
    }

    fn cast(&self, text: &str) -> TroupeResult<RoleSet> {
        let roles = roles_of(&self.parser.parse(text));
        if roles.is_empty() {
            return Err(RebalanceError::new(RebalanceErrorKind::EmptyRoleSet).into());
        }
        Ok(roles)
    }

    /// Review `text` against seven criteria, from theme to spelling.
    ///
    /// # Errors
    ///
    /// [`RebalanceErrorKind::EmptyRoleSet`] for a script without dialogue, or
    /// the service's error.
    #[instrument(skip_all, fields(text_len = text.len(), provider = self.service.provider_name()))]
    pub async fn feedback(&self, text: &str) -> TroupeResult<String> {
        self.cast(text)?;
        let review = self
            .ask(prompts::feedback_request(text.trim()), self.config.feedback)
            .await?;
        info!(chars = review.len(), "Script feedback ready");
        Ok(review)
    }

    /// Polish and expand `text` into a scene-structured performance draft.
    ///
    /// Dialogue by anyone outside the original cast is demoted.
    ///
    /// # Errors
    ///
    /// [`RebalanceErrorKind::EmptyRoleSet`] for a script without dialogue, or
    /// the service's error.
    #[instrument(skip_all, fields(text_len = text.len(), provider = self.service.provider_name()))]
    pub async fn final_draft(&self, text: &str) -> TroupeResult<FinalDraft> {
        let roles = self.cast(text)?;
        let answer = self
            .ask(
                prompts::final_draft_request(text.trim(), &roles),
                self.config.final_draft,
            )
            .await?;

        let (script, demoted) = self.parser.parse_generated(&answer).demote_off_roster(&roles);
        if demoted > 0 {
            warn!(demoted, "Final draft used speakers outside the cast");
        }
        info!(lines = script.len(), "Final draft ready");
        Ok(FinalDraft {
            script: script.render(),
            demoted,
        })
    }

    /// Props, set and costume checklist for staging `text`.
    ///
    /// # Errors
    ///
    /// [`RebalanceErrorKind::EmptyRoleSet`] for a script without dialogue, or
    /// the service's error.
    #[instrument(skip_all, fields(text_len = text.len(), provider = self.service.provider_name()))]
    pub async fn stage_kit(&self, text: &str) -> TroupeResult<String> {
        self.cast(text)?;
        self.ask(prompts::stage_kit_request(text.trim()), self.config.stage_kit)
            .await
    }

    /// Coaching notes on pace, tone and volume for a rehearsal session.
    ///
    /// # Errors
    ///
    /// [`RebalanceErrorKind::NoPracticeTurns`] if `turns` is empty, or the
    /// service's error.
    #[instrument(skip_all, fields(turns = turns.len(), provider = self.service.provider_name()))]
    pub async fn session_feedback(&self, turns: &[PracticeTurn]) -> TroupeResult<String> {
        if turns.is_empty() {
            return Err(RebalanceError::new(RebalanceErrorKind::NoPracticeTurns).into());
        }
        self.ask(
            prompts::session_feedback_request(turns),
            self.config.session_feedback,
        )
        .await
    }
}
