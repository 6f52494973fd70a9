//! Step-by-step controller for creating a position from a short prompt.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::WizardConfig;

use super::domain::Position;
use super::draft::PositionDraft;
use super::generation::{
    DescriptionGenerator, GenerationError, GenerationOutcome, GenerationSchedule, GenerationTask,
};
use super::publish::{Platform, PublishSelector};
use super::repository::{PositionRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Prompt,
    Generating,
    Review,
    Criteria,
    KillerCriteria,
    Publish,
}

impl WizardStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Generating => "generating",
            Self::Review => "review",
            Self::Criteria => "criteria",
            Self::KillerCriteria => "killer-criteria",
            Self::Publish => "publish",
        }
    }

    /// Target of `back`. `generating` is never one, and `prompt` has none.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Prompt | Self::Generating => None,
            Self::Review => Some(Self::Prompt),
            Self::Criteria => Some(Self::Review),
            Self::KillerCriteria => Some(Self::Criteria),
            Self::Publish => Some(Self::KillerCriteria),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    SubmitPrompt,
    RefinePrompt,
    AwaitGeneration,
    ContinueToCriteria,
    ContinueToKillerCriteria,
    ContinueToPublish,
    Back,
    Finalize,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SubmitPrompt => "submit the prompt",
            Self::RefinePrompt => "refine the prompt",
            Self::AwaitGeneration => "wait for generation",
            Self::ContinueToCriteria => "continue to criteria",
            Self::ContinueToKillerCriteria => "continue to killer criteria",
            Self::ContinueToPublish => "continue to publish",
            Self::Back => "go back",
            Self::Finalize => "finalize",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedReason {
    EmptyTitle,
    EmptyPrompt,
    NoPlatforms,
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("a position title is required"),
            Self::EmptyPrompt => f.write_str("a short description is required"),
            Self::NoPlatforms => f.write_str("select at least one platform"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    Blocked(BlockedReason),
    #[error("cannot {action} from the {from} step")]
    InvalidTransition {
        from: WizardStep,
        action: WizardAction,
    },
    #[error("draft generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("could not store position: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a non-blocking generation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPoll {
    Pending { progress: u8 },
    Ready,
}

/// Owns one draft at a time and moves it through
/// `prompt → generating → review → criteria → killer-criteria → publish`.
pub struct WizardController<R: PositionRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn DescriptionGenerator>,
    schedule: GenerationSchedule,
    default_location: String,
    default_contract_type: String,
    step: WizardStep,
    draft: PositionDraft,
    publish: PublishSelector,
    pending: Option<GenerationTask>,
    generation_sequence: u64,
    last_generation_error: Option<GenerationError>,
}

impl<R: PositionRepository + ?Sized> WizardController<R> {
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn DescriptionGenerator>,
        config: &WizardConfig,
    ) -> Self {
        Self {
            repository,
            generator,
            schedule: GenerationSchedule::from_config(config),
            default_location: config.default_location.clone(),
            default_contract_type: config.default_contract_type.clone(),
            step: WizardStep::Prompt,
            draft: PositionDraft::new(&config.default_location, &config.default_contract_type),
            publish: PublishSelector::default(),
            pending: None,
            generation_sequence: 0,
            last_generation_error: None,
        }
    }

    pub fn with_schedule(mut self, schedule: GenerationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &PositionDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PositionDraft {
        &mut self.draft
    }

    pub fn publish_selector(&self) -> &PublishSelector {
        &self.publish
    }

    pub fn toggle_platform(&mut self, platform: Platform) -> bool {
        self.publish.toggle(platform)
    }

    pub fn last_generation_error(&self) -> Option<&GenerationError> {
        self.last_generation_error.as_ref()
    }

    /// Percentage reported by the running generation; 0 when nothing is pending.
    pub fn generation_progress(&self) -> u8 {
        self.pending.as_ref().map_or(0, GenerationTask::progress)
    }

    /// Stores the inputs and starts generating on the current tokio runtime.
    pub fn submit_prompt(&mut self, title: &str, prompt: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Prompt, WizardAction::SubmitPrompt)?;
        if title.trim().is_empty() {
            return Err(WizardError::Blocked(BlockedReason::EmptyTitle));
        }
        if prompt.trim().is_empty() {
            return Err(WizardError::Blocked(BlockedReason::EmptyPrompt));
        }

        self.draft.set_prompt_inputs(title, prompt);
        self.last_generation_error = None;
        let sequence = self.generation_sequence + 1;
        let task = GenerationTask::spawn(
            Arc::clone(&self.generator),
            self.draft.prompt().to_string(),
            self.draft.title().to_string(),
            self.schedule,
            sequence,
        )?;
        self.generation_sequence = sequence;
        self.pending = Some(task);
        self.step = WizardStep::Generating;
        info!(
            sequence = self.generation_sequence,
            title = self.draft.title(),
            "draft generation started"
        );
        Ok(())
    }

    /// Asks the generation service to expand the prompt, replacing it in place.
    pub async fn refine_prompt(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Prompt, WizardAction::RefinePrompt)?;
        if self.draft.prompt().trim().is_empty() {
            return Err(WizardError::Blocked(BlockedReason::EmptyPrompt));
        }

        let refined = self
            .generator
            .refine(self.draft.prompt(), self.draft.title())
            .await?;
        debug!(length = refined.len(), "prompt refined");
        self.draft.replace_prompt(refined);
        Ok(())
    }

    /// Updates the prompt inputs without submitting them.
    pub fn edit_prompt(&mut self, title: &str, prompt: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Prompt, WizardAction::SubmitPrompt)?;
        self.draft.set_prompt_inputs(title, prompt);
        Ok(())
    }

    pub fn poll_generation(&mut self) -> Result<GenerationPoll, WizardError> {
        self.expect_step(WizardStep::Generating, WizardAction::AwaitGeneration)?;
        let Some(task) = self.pending.as_mut() else {
            return Err(self.invalid(WizardAction::AwaitGeneration));
        };
        match task.try_outcome() {
            None => Ok(GenerationPoll::Pending {
                progress: task.progress(),
            }),
            Some(outcome) => self.apply_outcome(outcome).map(|()| GenerationPoll::Ready),
        }
    }

    pub async fn await_generation(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Generating, WizardAction::AwaitGeneration)?;
        let Some(task) = self.pending.as_mut() else {
            return Err(self.invalid(WizardAction::AwaitGeneration));
        };
        let outcome = task.outcome().await;
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: GenerationOutcome) -> Result<(), WizardError> {
        self.pending = None;
        // Unreachable while `pending` and `generation_sequence` change together. A stale
        // result must never reach the draft.
        if outcome.sequence != self.generation_sequence {
            debug!(
                expected = self.generation_sequence,
                received = outcome.sequence,
                "discarding superseded generation result"
            );
            return self.fail_generation(GenerationError::Unavailable(
                "generation was superseded".to_string(),
            ));
        }

        match outcome.result {
            Ok(generated) => {
                self.draft.apply_generated(generated);
                self.step = WizardStep::Review;
                info!(
                    sequence = outcome.sequence,
                    requirements = self.draft.requirements().len(),
                    criteria = self.draft.criteria().len(),
                    "draft generation completed"
                );
                Ok(())
            }
            Err(err) => self.fail_generation(err),
        }
    }

    fn fail_generation(&mut self, err: GenerationError) -> Result<(), WizardError> {
        warn!(sequence = self.generation_sequence, error = %err, "draft generation failed");
        self.step = WizardStep::Prompt;
        self.last_generation_error = Some(err.clone());
        Err(WizardError::Generation(err))
    }

    pub fn continue_to_criteria(&mut self) -> Result<(), WizardError> {
        self.advance(WizardStep::Review, WizardStep::Criteria, WizardAction::ContinueToCriteria)
    }

    pub fn continue_to_killer_criteria(&mut self) -> Result<(), WizardError> {
        self.advance(
            WizardStep::Criteria,
            WizardStep::KillerCriteria,
            WizardAction::ContinueToKillerCriteria,
        )
    }

    pub fn continue_to_publish(&mut self) -> Result<(), WizardError> {
        self.advance(
            WizardStep::KillerCriteria,
            WizardStep::Publish,
            WizardAction::ContinueToPublish,
        )
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self
            .step
            .previous()
            .ok_or_else(|| self.invalid(WizardAction::Back))?;
        debug!(from = %self.step, to = %previous, "wizard moved back");
        self.step = previous;
        Ok(previous)
    }

    /// Drops any pending generation and starts over with a fresh draft.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            info!(
                sequence = task.sequence(),
                progress = task.progress(),
                "draft generation cancelled"
            );
        }
        debug!(from = %self.step, "wizard reset");
        self.reset();
    }

    /// Commits the draft with tombstoned entries filtered out. The pinned platform is always
    /// added to `platforms`.
    ///
    /// The controller stays on `publish` when blocked or when the repository rejects the
    /// position, so the operator can retry.
    pub fn finalize(&mut self, platforms: &BTreeSet<Platform>) -> Result<Position, WizardError> {
        self.expect_step(WizardStep::Publish, WizardAction::Finalize)?;
        if platforms.is_empty() {
            return Err(WizardError::Blocked(BlockedReason::NoPlatforms));
        }

        let weight_total = self.draft.criteria_weight_total();
        if weight_total != 100 {
            warn!(weight_total, "criteria weights do not add up to 100");
        }

        let mut platforms = platforms.clone();
        platforms.insert(self.publish.pinned());

        let new_position = self.draft.clone().finalize(platforms.clone());
        let position = self.repository.commit(new_position)?;
        info!(
            position_id = %position.id,
            platforms = platforms.len(),
            criteria = position.criteria.len(),
            "position finalized"
        );
        self.reset();
        Ok(position)
    }

    /// Finalizes with the platforms picked through [`Self::toggle_platform`].
    pub fn finalize_selected(&mut self) -> Result<Position, WizardError> {
        self.expect_step(WizardStep::Publish, WizardAction::Finalize)?;
        if !self.publish.is_valid() {
            return Err(WizardError::Blocked(BlockedReason::NoPlatforms));
        }
        let platforms = self.publish.selected().clone();
        self.finalize(&platforms)
    }

    fn advance(
        &mut self,
        from: WizardStep,
        to: WizardStep,
        action: WizardAction,
    ) -> Result<(), WizardError> {
        self.expect_step(from, action)?;
        debug!(from = %from, to = %to, "wizard advanced");
        self.step = to;
        Ok(())
    }

    fn expect_step(&self, expected: WizardStep, action: WizardAction) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: WizardAction) -> WizardError {
        WizardError::InvalidTransition {
            from: self.step,
            action,
        }
    }

    fn reset(&mut self) {
        self.pending = None;
        self.step = WizardStep::Prompt;
        self.draft = PositionDraft::new(&self.default_location, &self.default_contract_type);
        self.publish = PublishSelector::default();
        self.last_generation_error = None;
    }
}

impl<R: PositionRepository + ?Sized> fmt::Debug for WizardController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("step", &self.step)
            .field("generation_sequence", &self.generation_sequence)
            .field("pending", &self.pending.is_some())
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::positions::domain::{NewPosition, PositionId};
    use crate::workflows::positions::generation::{GeneratedDraft, MockDescriptionGenerator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MemoryRepository {
        positions: Mutex<Vec<Position>>,
        committed: Mutex<Vec<NewPosition>>,
    }

    impl PositionRepository for MemoryRepository {
        fn commit(&self, position: NewPosition) -> Result<Position, RepositoryError> {
            self.committed.lock().expect("lock").push(position.clone());
            let mut guard = self.positions.lock().expect("lock");
            let id = PositionId(format!("{}", guard.len() + 1));
            let position = position.into_position(id, "01/03/2025".to_string());
            guard.insert(0, position.clone());
            Ok(position)
        }

        fn prepend(&self, position: Position) -> Result<(), RepositoryError> {
            self.positions.lock().expect("lock").insert(0, position);
            Ok(())
        }

        fn list(&self) -> Result<Vec<Position>, RepositoryError> {
            Ok(self.positions.lock().expect("lock").clone())
        }

        fn fetch(&self, id: &PositionId) -> Result<Option<Position>, RepositoryError> {
            Ok(self
                .positions
                .lock()
                .expect("lock")
                .iter()
                .find(|position| &position.id == id)
                .cloned())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl DescriptionGenerator for FailingGenerator {
        async fn generate(&self, _: &str, _: &str) -> Result<GeneratedDraft, GenerationError> {
            Err(GenerationError::Unavailable("service down".to_string()))
        }

        async fn refine(&self, _: &str, _: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Rejected("nope".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
        inner: MockDescriptionGenerator,
    }

    #[async_trait]
    impl DescriptionGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str, title: &str) -> Result<GeneratedDraft, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate(prompt, title).await
        }

        async fn refine(&self, prompt: &str, title: &str) -> Result<String, GenerationError> {
            self.inner.refine(prompt, title).await
        }
    }

    fn controller(
        generator: Arc<dyn DescriptionGenerator>,
    ) -> (Arc<MemoryRepository>, WizardController<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::default());
        let controller =
            WizardController::new(Arc::clone(&repository), generator, &WizardConfig::default());
        (repository, controller)
    }

    async fn at_publish(controller: &mut WizardController<MemoryRepository>) {
        controller
            .submit_prompt("Cocinero", "Cook for a busy restaurant")
            .expect("submitted");
        controller.await_generation().await.expect("generated");
        controller.continue_to_criteria().expect("criteria");
        controller.continue_to_killer_criteria().expect("killer");
        controller.continue_to_publish().expect("publish");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_inputs_block_submission() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));

        let err = controller.submit_prompt("  ", "prompt").unwrap_err();
        assert!(matches!(err, WizardError::Blocked(BlockedReason::EmptyTitle)));
        let err = controller.submit_prompt("Cocinero", "").unwrap_err();
        assert!(matches!(err, WizardError::Blocked(BlockedReason::EmptyPrompt)));
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert_eq!(controller.generation_progress(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_progresses_then_lands_on_review() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");
        assert_eq!(controller.step(), WizardStep::Generating);

        tokio::time::sleep(Duration::from_millis(650)).await;
        assert_eq!(
            controller.poll_generation().expect("polled"),
            GenerationPoll::Pending { progress: 20 }
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            controller.poll_generation().expect("polled"),
            GenerationPoll::Ready
        );
        assert_eq!(controller.step(), WizardStep::Review);
        assert_eq!(controller.draft().criteria().len(), 5);
        assert_eq!(controller.draft().criteria_weight_total(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn forward_and_back_follow_the_step_order() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        assert!(matches!(
            controller.back(),
            Err(WizardError::InvalidTransition {
                from: WizardStep::Prompt,
                action: WizardAction::Back
            })
        ));

        at_publish(&mut controller).await;
        assert_eq!(controller.back().expect("back"), WizardStep::KillerCriteria);
        assert_eq!(controller.back().expect("back"), WizardStep::Criteria);
        assert!(controller.continue_to_publish().is_err());
        assert_eq!(controller.step(), WizardStep::Criteria);
        assert_eq!(controller.back().expect("back"), WizardStep::Review);
        assert_eq!(controller.back().expect("back"), WizardStep::Prompt);
        assert!(controller.continue_to_criteria().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn back_is_rejected_while_generating() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");
        assert!(matches!(
            controller.back(),
            Err(WizardError::InvalidTransition {
                from: WizardStep::Generating,
                ..
            })
        ));
        assert_eq!(controller.step(), WizardStep::Generating);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_generation_before_the_service_is_called() {
        let generator = Arc::new(CountingGenerator::default());
        let (_, mut controller) = controller(generator.clone());
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");
        tokio::time::sleep(Duration::from_millis(1300)).await;

        controller.cancel();
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert_eq!(controller.draft().title(), "");
        assert_eq!(controller.generation_progress(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert!(controller.draft().criteria().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_service_call_then_resubmit_keeps_only_the_new_draft() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::with_latency(
            Duration::from_secs(5),
        )));
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(controller.generation_progress(), 100);
        assert!(matches!(
            controller.poll_generation(),
            Ok(GenerationPoll::Pending { progress: 100 })
        ));

        controller.cancel();
        controller
            .submit_prompt("Cocinero", "Grill station on the terrace")
            .expect("resubmitted");
        controller.await_generation().await.expect("generated");
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(controller.step(), WizardStep::Review);
        assert_eq!(controller.draft().title(), "Cocinero");
        let description = controller.draft().description();
        assert!(description.contains("cocinero"));
        assert!(description.contains("Grill station on the terrace"));
        assert!(!description.contains("camarero"));
        assert!(!description.contains("Weekend floor staff"));
        assert!(controller
            .draft()
            .requirements()
            .iter()
            .any(|line| line.contains("kitchen")));
    }

    #[tokio::test(start_paused = true)]
    async fn result_with_a_stale_sequence_is_discarded() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");
        let stale = MockDescriptionGenerator::new()
            .generate("Old prompt", "Sommelier")
            .await
            .expect("mock generates");

        let err = controller
            .apply_outcome(GenerationOutcome {
                sequence: 0,
                result: Ok(stale),
            })
            .unwrap_err();
        assert!(matches!(err, WizardError::Generation(GenerationError::Unavailable(_))));
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert_eq!(controller.draft().description(), "");
        assert!(controller.draft().requirements().is_empty());
        assert_eq!(controller.generation_progress(), 0);
    }

    #[test]
    fn submit_outside_a_runtime_is_reported_not_panicked() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        let err = controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .unwrap_err();
        assert!(matches!(err, WizardError::Generation(GenerationError::NoRuntime)));
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert_eq!(controller.generation_progress(), 0);
        assert_eq!(controller.draft().title(), "Camarero");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_generation_returns_to_prompt_keeping_inputs() {
        let (_, mut controller) = controller(Arc::new(FailingGenerator));
        controller
            .submit_prompt("Camarero", "Weekend floor staff")
            .expect("submitted");

        let err = controller.await_generation().await.unwrap_err();
        assert!(matches!(err, WizardError::Generation(_)));
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert_eq!(controller.draft().title(), "Camarero");
        assert_eq!(controller.draft().prompt(), "Weekend floor staff");
        assert_eq!(
            controller.last_generation_error(),
            Some(&GenerationError::Unavailable("service down".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn finalize_without_platforms_stays_on_publish() {
        let (repository, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        at_publish(&mut controller).await;

        let err = controller.finalize(&BTreeSet::new()).unwrap_err();
        assert!(matches!(err, WizardError::Blocked(BlockedReason::NoPlatforms)));
        assert_eq!(controller.step(), WizardStep::Publish);
        assert!(repository.list().expect("list").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn finalize_always_publishes_to_the_pinned_platform() {
        let (repository, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        at_publish(&mut controller).await;

        let position = controller
            .finalize(&BTreeSet::from([Platform::LinkedIn]))
            .expect("finalized");
        let committed = repository.committed.lock().expect("lock");
        assert_eq!(
            committed.last().map(|new_position| &new_position.platforms),
            Some(&BTreeSet::from([Platform::Orbio, Platform::LinkedIn]))
        );
        assert_eq!(repository.list().expect("list"), vec![position]);
    }

    #[tokio::test(start_paused = true)]
    async fn finalize_excludes_tombstoned_entries_and_resets() {
        let (repository, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        controller
            .submit_prompt("Cocinero", "Cook for a busy restaurant")
            .expect("submitted");
        controller.await_generation().await.expect("generated");

        let removed_requirement = controller.draft().requirements()[1].clone();
        let removed_criterion = controller.draft().criteria()[0].id.clone();
        controller.draft_mut().delete_requirement(1);
        controller.draft_mut().delete_criterion(&removed_criterion);
        controller.draft_mut().set_salary("1.600 € / month");

        controller.continue_to_criteria().expect("criteria");
        controller.continue_to_killer_criteria().expect("killer");
        controller.continue_to_publish().expect("publish");
        assert!(controller.toggle_platform(Platform::LinkedIn));

        let position = controller.finalize_selected().expect("finalized");
        assert_eq!(position.title, "Cocinero");
        assert_eq!(position.location, "Madrid");
        assert_eq!(position.salary, "1.600 € / month");
        assert_eq!(position.candidate_count, 0);
        assert!(!position.requirements.contains(&removed_requirement));
        assert!(position
            .criteria
            .iter()
            .all(|criterion| criterion.id != removed_criterion));
        assert_eq!(position.criteria.len(), 4);

        assert_eq!(repository.list().expect("list"), vec![position]);
        assert_eq!(controller.step(), WizardStep::Prompt);
        assert!(controller.draft().requirements().is_empty());
        assert_eq!(
            controller.publish_selector().selected().len(),
            1,
            "selector resets to the pinned platform"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restored_requirement_survives_finalize() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        controller
            .submit_prompt("Cocinero", "Cook for a busy restaurant")
            .expect("submitted");
        controller.await_generation().await.expect("generated");
        let requirement = controller.draft().requirements()[1].clone();
        controller.draft_mut().delete_requirement(1);
        controller.draft_mut().restore_requirement(1);

        controller.continue_to_criteria().expect("criteria");
        controller.continue_to_killer_criteria().expect("killer");
        controller.continue_to_publish().expect("publish");
        let position = controller
            .finalize(&BTreeSet::from([Platform::Orbio]))
            .expect("finalized");
        assert!(position.requirements.contains(&requirement));
    }

    #[tokio::test]
    async fn refine_rewrites_the_prompt_only_from_prompt_step() {
        let (_, mut controller) = controller(Arc::new(MockDescriptionGenerator::new()));
        assert!(matches!(
            controller.refine_prompt().await,
            Err(WizardError::Blocked(BlockedReason::EmptyPrompt))
        ));

        controller
            .edit_prompt("Camarero", "Weekend floor staff")
            .expect("edited");
        controller.refine_prompt().await.expect("refined");
        assert!(controller.draft().prompt().len() > "Weekend floor staff".len());
        assert_eq!(controller.step(), WizardStep::Prompt);
    }

    #[tokio::test]
    async fn refine_failure_leaves_prompt_untouched() {
        let (_, mut controller) = controller(Arc::new(FailingGenerator));
        controller
            .edit_prompt("Camarero", "Weekend floor staff")
            .expect("edited");
        assert!(matches!(
            controller.refine_prompt().await,
            Err(WizardError::Generation(GenerationError::Rejected(_)))
        ));
        assert_eq!(controller.draft().prompt(), "Weekend floor staff");
    }
}
