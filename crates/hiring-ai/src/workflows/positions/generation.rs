//! Description generation collaborator and the cancellable task that drives it.
//!
//! The wizard never awaits the generator directly. It spawns a [`GenerationTask`] that advances a
//! progress counter on a timer, then asks the generator for a draft. Dropping the task cancels it,
//! so a completion can only ever be observed by the controller that still holds the handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::WizardConfig;

/// Structured draft returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDraft {
    pub description: String,
    pub requirements: Vec<String>,
    pub criteria: Vec<GeneratedCriterion>,
    pub killer_criteria: Vec<GeneratedKillerCriterion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCriterion {
    pub name: String,
    pub weight: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedKillerCriterion {
    pub question: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    #[error("generation service rejected the prompt: {0}")]
    Rejected(String),
    #[error("no tokio runtime is available to run generation")]
    NoRuntime,
}

/// Black-box service turning an operator prompt into a structured position draft.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, title: &str) -> Result<GeneratedDraft, GenerationError>;

    /// Rewrites a terse prompt into a fuller description the operator can keep editing.
    async fn refine(&self, prompt: &str, title: &str) -> Result<String, GenerationError>;
}

/// Timer cadence for the simulated progress counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSchedule {
    pub tick: Duration,
    pub step: u8,
}

impl GenerationSchedule {
    pub fn new(tick: Duration, step: u8) -> Self {
        Self {
            tick,
            step: step.clamp(1, 100),
        }
    }

    /// Single zero-length tick; used by fakes and tests.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, 100)
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self::new(
            Duration::from_millis(config.generation_tick_ms),
            config.generation_step,
        )
    }

    pub fn ticks(&self) -> u32 {
        u32::from(100u8.div_ceil(self.step))
    }
}

impl Default for GenerationSchedule {
    fn default() -> Self {
        Self::new(Duration::from_millis(600), 20)
    }
}

#[derive(Debug)]
pub(crate) struct GenerationOutcome {
    pub(crate) sequence: u64,
    pub(crate) result: Result<GeneratedDraft, GenerationError>,
}

/// Handle to an in-flight generation. Dropping it cancels the task.
#[derive(Debug)]
pub(crate) struct GenerationTask {
    sequence: u64,
    cancel: CancellationToken,
    progress: watch::Receiver<u8>,
    outcome: oneshot::Receiver<GenerationOutcome>,
    handle: JoinHandle<()>,
}

impl GenerationTask {
    /// Spawns onto the current tokio runtime; fails with [`GenerationError::NoRuntime`] outside one.
    pub(crate) fn spawn(
        generator: Arc<dyn DescriptionGenerator>,
        prompt: String,
        title: String,
        schedule: GenerationSchedule,
        sequence: u64,
    ) -> Result<Self, GenerationError> {
        let runtime = Handle::try_current().map_err(|_| GenerationError::NoRuntime)?;
        let cancel = CancellationToken::new();
        let (progress_tx, progress) = watch::channel(0u8);
        let (outcome_tx, outcome) = oneshot::channel();

        let token = cancel.clone();
        let handle = runtime.spawn(async move {
            let mut progress = 0u8;
            while progress < 100 {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(sequence, progress, "generation cancelled while in progress");
                        return;
                    }
                    _ = tokio::time::sleep(schedule.tick) => {}
                }
                progress = progress.saturating_add(schedule.step).min(100);
                let _ = progress_tx.send(progress);
            }

            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!(sequence, "generation cancelled before the draft arrived");
                    return;
                }
                result = generator.generate(&prompt, &title) => result,
            };

            // Receiver is gone when the controller moved on; nothing to deliver.
            let _ = outcome_tx.send(GenerationOutcome { sequence, result });
        });

        Ok(Self {
            sequence,
            cancel,
            progress,
            outcome,
            handle,
        })
    }

    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// Non-blocking check; `None` while the task is still running.
    pub(crate) fn try_outcome(&mut self) -> Option<GenerationOutcome> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(self.lost()),
        }
    }

    pub(crate) async fn outcome(&mut self) -> GenerationOutcome {
        match (&mut self.outcome).await {
            Ok(outcome) => outcome,
            Err(_) => self.lost(),
        }
    }

    fn lost(&self) -> GenerationOutcome {
        GenerationOutcome {
            sequence: self.sequence,
            result: Err(GenerationError::Unavailable(
                "generation task ended without a result".to_string(),
            )),
        }
    }
}

impl Drop for GenerationTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Deterministic stand-in for the generation service.
#[derive(Debug, Clone, Default)]
pub struct MockDescriptionGenerator {
    latency: Duration,
}

impl MockDescriptionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleFamily {
    Kitchen,
    FloorService,
    Assistant,
    General,
}

impl RoleFamily {
    fn detect(title: &str) -> Self {
        let title = title.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|needle| title.contains(needle));
        if mentions(&["cook", "chef", "cociner"]) {
            Self::Kitchen
        } else if mentions(&["waiter", "waitress", "server", "camarer", "meser"]) {
            Self::FloorService
        } else if mentions(&["assistant", "ayudante", "helper"]) {
            Self::Assistant
        } else {
            Self::General
        }
    }

    fn responsibilities(self) -> [&'static str; 5] {
        match self {
            Self::Kitchen => [
                "Prepare dishes following standard recipes and procedures",
                "Keep stations clean and organised",
                "Manage ingredient and supply inventory",
                "Follow food safety and hygiene rules strictly",
                "Work closely with the kitchen team during peak services",
            ],
            Self::FloorService => [
                "Welcome and attend guests professionally",
                "Take orders and serve food and drinks",
                "Keep tables clean and ready",
                "Process payments through the POS",
                "Coordinate with the kitchen to keep service flowing",
            ],
            Self::Assistant => [
                "Help with ingredient preparation and mise en place",
                "Keep every work area clean and tidy",
                "Support the team during busy services",
                "Carry out scheduled deep cleaning",
                "Receive and store deliveries",
            ],
            Self::General => [
                "Carry out the core duties of the role efficiently",
                "Keep quality standards high in every task",
                "Collaborate with the rest of the team",
                "Follow established procedures and protocols",
                "Contribute to a positive working environment",
            ],
        }
    }

    fn requirements(self) -> [&'static str; 5] {
        match self {
            Self::Kitchen => [
                "At least 2 years of professional kitchen experience",
                "Knowledge of core culinary techniques",
                "Able to work rotating shifts",
                "Experience in high-volume restaurants",
                "Food handler certificate",
            ],
            Self::FloorService => [
                "Previous experience serving tables",
                "Excellent communication skills",
                "Able to work rotating shifts",
                "Basic knowledge of wines and drinks",
                "Comfortable with POS systems",
            ],
            Self::Assistant => [
                "Previous experience in a similar role is a plus",
                "Able to work under pressure",
                "Able to work rotating shifts",
                "Attention to cleanliness and order",
                "Food handler certificate",
            ],
            Self::General => [
                "1-2 years of experience in a similar position",
                "Strong communication and teamwork skills",
                "Able to work under pressure",
                "Availability for rotating shifts including weekends",
                "Relevant sector certifications",
            ],
        }
    }
}

#[async_trait]
impl DescriptionGenerator for MockDescriptionGenerator {
    async fn generate(&self, prompt: &str, title: &str) -> Result<GeneratedDraft, GenerationError> {
        self.wait().await;
        let family = RoleFamily::detect(title);

        let mut description = format!(
            "We are looking for a motivated {} to join a fast-paced team. The right person keeps quality high under pressure and thrives in a dynamic environment.\n\nResponsibilities:\n",
            title.trim().to_lowercase()
        );
        for line in family.responsibilities() {
            description.push_str("• ");
            description.push_str(line);
            description.push('\n');
        }
        if !prompt.trim().is_empty() {
            description.push_str("\nNotes from the hiring team:\n");
            description.push_str(prompt.trim());
        }

        let criteria = [
            ("Relevant Experience", 30u8, "2+ years in similar high-turnover venues"),
            ("Technical Skills", 25, "Command of the core techniques of the role"),
            ("Teamwork", 20, "Proven collaboration within large teams"),
            ("Schedule Flexibility", 15, "Available for rotating shifts and weekends"),
            ("Working Under Pressure", 10, "Experience in high-volume, fast-paced settings"),
        ]
        .into_iter()
        .map(|(name, weight, description)| GeneratedCriterion {
            name: name.to_string(),
            weight,
            description: description.to_string(),
        })
        .collect();

        let killer_criteria = [
            "Are you at least 18 years old?",
            "Do you hold a valid work permit for Spain?",
            "Do you hold a current food handler certificate?",
            "Are you available to work weekends?",
        ]
        .into_iter()
        .map(|question| GeneratedKillerCriterion {
            question: question.to_string(),
            required: true,
        })
        .collect();

        Ok(GeneratedDraft {
            description,
            requirements: family
                .requirements()
                .iter()
                .map(|line| line.to_string())
                .collect(),
            criteria,
            killer_criteria,
        })
    }

    async fn refine(&self, prompt: &str, title: &str) -> Result<String, GenerationError> {
        self.wait().await;
        let family = RoleFamily::detect(title);

        let mut refined = format!(
            "Role: {title}\n\nWe are looking for a highly motivated {} to join our team. This is a great opportunity to grow professionally in a collaborative, demanding environment.\n\nKey responsibilities:\n",
            title.to_lowercase()
        );
        for line in family.responsibilities() {
            refined.push_str("• ");
            refined.push_str(line);
            refined.push('\n');
        }
        refined.push_str(
            "\nEssential requirements:\n• Previous experience in similar positions (1-2 years minimum)\n• Excellent communication and teamwork skills\n• Able to work under pressure in high-demand settings\n• Availability for rotating shifts, including weekends\n\nWhat we offer:\n• A dynamic, collaborative workplace\n• Room to grow professionally\n• Ongoing training\n• Flexible schedules and competitive benefits\n",
        );
        if prompt.chars().count() > 50 {
            refined.push_str("\nAdditional information:\n");
            refined.push_str(prompt);
            refined.push('\n');
        }

        Ok(refined)
    }
}
