use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{
    total_weight, CriterionId, EvaluationCriterion, KillerCriterion, KillerCriterionId,
    NewPosition,
};
use super::edit::{
    CriterionBuffer, CriterionPatch, EditError, EditSession, KillerCriterionBuffer,
    KillerCriterionPatch,
};
use super::generation::GeneratedDraft;
use super::overlay::SoftDeleteOverlay;
use super::publish::Platform;

/// In-progress position owned by a single wizard run.
///
/// Deletes are tombstones: entries stay in the live lists until [`PositionDraft::finalize`]
/// filters them, so every delete can be restored while the wizard is open.
#[derive(Debug, Clone)]
pub struct PositionDraft {
    title: String,
    prompt: String,
    location: String,
    contract_type: String,
    salary: String,
    description: String,
    requirements: Vec<String>,
    criteria: Vec<EvaluationCriterion>,
    killer_criteria: Vec<KillerCriterion>,
    deleted_requirements: SoftDeleteOverlay<usize>,
    deleted_criteria: SoftDeleteOverlay<CriterionId>,
    deleted_killer_criteria: SoftDeleteOverlay<KillerCriterionId>,
    requirement_edit: EditSession<usize, String>,
    criterion_edit: EditSession<CriterionId, CriterionBuffer>,
    killer_criterion_edit: EditSession<KillerCriterionId, KillerCriterionBuffer>,
}

/// Serializable snapshot of what the operator currently sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftView {
    pub title: String,
    pub location: String,
    pub contract_type: String,
    pub salary: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub criteria: Vec<EvaluationCriterion>,
    pub killer_criteria: Vec<KillerCriterion>,
    pub criteria_weight_total: u32,
}

impl PositionDraft {
    pub fn new(location: impl Into<String>, contract_type: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            prompt: String::new(),
            location: location.into(),
            contract_type: contract_type.into(),
            salary: String::new(),
            description: String::new(),
            requirements: Vec::new(),
            criteria: Vec::new(),
            killer_criteria: Vec::new(),
            deleted_requirements: SoftDeleteOverlay::new(),
            deleted_criteria: SoftDeleteOverlay::new(),
            deleted_killer_criteria: SoftDeleteOverlay::new(),
            requirement_edit: EditSession::new(),
            criterion_edit: EditSession::new(),
            killer_criterion_edit: EditSession::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn contract_type(&self) -> &str {
        &self.contract_type
    }

    pub fn salary(&self) -> &str {
        &self.salary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn set_contract_type(&mut self, contract_type: impl Into<String>) {
        self.contract_type = contract_type.into();
    }

    pub fn set_salary(&mut self, salary: impl Into<String>) {
        self.salary = salary.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn set_prompt_inputs(&mut self, title: &str, prompt: &str) {
        self.title = title.trim().to_string();
        self.prompt = prompt.to_string();
    }

    pub(crate) fn replace_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    /// Replaces the generated content, dropping any tombstones and open edits from a previous run.
    pub(crate) fn apply_generated(&mut self, generated: GeneratedDraft) {
        let GeneratedDraft {
            description,
            requirements,
            criteria,
            killer_criteria,
        } = generated;

        self.description = description;
        self.requirements = requirements;
        self.criteria = criteria
            .into_iter()
            .enumerate()
            .map(|(index, criterion)| EvaluationCriterion {
                id: CriterionId((index + 1).to_string()),
                name: criterion.name,
                weight: criterion.weight.min(100),
                description: criterion.description,
            })
            .collect();
        self.killer_criteria = killer_criteria
            .into_iter()
            .enumerate()
            .map(|(index, criterion)| KillerCriterion {
                id: KillerCriterionId((index + 1).to_string()),
                question: criterion.question,
                required: criterion.required,
            })
            .collect();

        self.deleted_requirements.clear();
        self.deleted_criteria.clear();
        self.deleted_killer_criteria.clear();
        self.requirement_edit.cancel();
        self.criterion_edit.cancel();
        self.killer_criterion_edit.cancel();
    }

    // Requirements

    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    pub fn live_requirements(&self) -> Vec<&String> {
        self.deleted_requirements.live_indexed(&self.requirements)
    }

    /// Out-of-range indices are ignored.
    pub fn delete_requirement(&mut self, index: usize) {
        if index < self.requirements.len() {
            self.deleted_requirements.mark_deleted(index);
        }
    }

    pub fn restore_requirement(&mut self, index: usize) {
        self.deleted_requirements.restore(&index);
    }

    pub fn is_requirement_deleted(&self, index: usize) -> bool {
        self.deleted_requirements.is_deleted(&index)
    }

    pub fn begin_requirement_edit(&mut self, index: usize) -> Result<(), EditError> {
        let text = self
            .requirements
            .get(index)
            .cloned()
            .ok_or(EditError::TargetMissing)?;
        self.requirement_edit.begin(index, text);
        Ok(())
    }

    pub fn requirement_edit(&self) -> Option<(usize, &str)> {
        let index = *self.requirement_edit.editing()?;
        let buffer = self.requirement_edit.current_buffer()?;
        Some((index, buffer.as_str()))
    }

    pub fn update_requirement_edit(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        let text: String = text.into();
        self.requirement_edit.update_buffer(text)
    }

    pub fn commit_requirement_edit(&mut self) -> Result<usize, EditError> {
        let (index, text) = self
            .requirement_edit
            .take()
            .ok_or(EditError::NoOpenSession)?;
        let slot = self
            .requirements
            .get_mut(index)
            .ok_or(EditError::TargetMissing)?;
        *slot = text;
        Ok(index)
    }

    pub fn cancel_requirement_edit(&mut self) -> bool {
        self.requirement_edit.cancel()
    }

    // Evaluation criteria

    pub fn criteria(&self) -> &[EvaluationCriterion] {
        &self.criteria
    }

    pub fn live_criteria(&self) -> Vec<&EvaluationCriterion> {
        self.deleted_criteria
            .live_view(&self.criteria, |criterion| &criterion.id)
    }

    pub fn delete_criterion(&mut self, id: &CriterionId) {
        if self.criteria.iter().any(|criterion| &criterion.id == id) {
            self.deleted_criteria.mark_deleted(id.clone());
        }
    }

    pub fn restore_criterion(&mut self, id: &CriterionId) {
        self.deleted_criteria.restore(id);
    }

    pub fn is_criterion_deleted(&self, id: &CriterionId) -> bool {
        self.deleted_criteria.is_deleted(id)
    }

    pub fn begin_criterion_edit(&mut self, id: &CriterionId) -> Result<(), EditError> {
        let buffer = self
            .criteria
            .iter()
            .find(|criterion| &criterion.id == id)
            .map(CriterionBuffer::from)
            .ok_or(EditError::TargetMissing)?;
        self.criterion_edit.begin(id.clone(), buffer);
        Ok(())
    }

    pub fn criterion_edit(&self) -> Option<(&CriterionId, &CriterionBuffer)> {
        Some((
            self.criterion_edit.editing()?,
            self.criterion_edit.current_buffer()?,
        ))
    }

    pub fn update_criterion_edit(&mut self, patch: CriterionPatch) -> Result<(), EditError> {
        self.criterion_edit.update_buffer(patch)
    }

    pub fn commit_criterion_edit(&mut self) -> Result<CriterionId, EditError> {
        self.criterion_edit.commit(
            &mut self.criteria,
            |criterion| &criterion.id,
            |criterion, buffer| {
                criterion.name = buffer.name;
                criterion.weight = buffer.weight;
                criterion.description = buffer.description;
            },
        )
    }

    pub fn cancel_criterion_edit(&mut self) -> bool {
        self.criterion_edit.cancel()
    }

    /// Sum of the weights of criteria that are not tombstoned.
    pub fn criteria_weight_total(&self) -> u32 {
        total_weight(self.live_criteria())
    }

    // Killer criteria

    pub fn killer_criteria(&self) -> &[KillerCriterion] {
        &self.killer_criteria
    }

    pub fn live_killer_criteria(&self) -> Vec<&KillerCriterion> {
        self.deleted_killer_criteria
            .live_view(&self.killer_criteria, |criterion| &criterion.id)
    }

    pub fn delete_killer_criterion(&mut self, id: &KillerCriterionId) {
        if self.killer_criteria.iter().any(|criterion| &criterion.id == id) {
            self.deleted_killer_criteria.mark_deleted(id.clone());
        }
    }

    pub fn restore_killer_criterion(&mut self, id: &KillerCriterionId) {
        self.deleted_killer_criteria.restore(id);
    }

    pub fn is_killer_criterion_deleted(&self, id: &KillerCriterionId) -> bool {
        self.deleted_killer_criteria.is_deleted(id)
    }

    pub fn begin_killer_criterion_edit(&mut self, id: &KillerCriterionId) -> Result<(), EditError> {
        let buffer = self
            .killer_criteria
            .iter()
            .find(|criterion| &criterion.id == id)
            .map(KillerCriterionBuffer::from)
            .ok_or(EditError::TargetMissing)?;
        self.killer_criterion_edit.begin(id.clone(), buffer);
        Ok(())
    }

    pub fn killer_criterion_edit(&self) -> Option<(&KillerCriterionId, &KillerCriterionBuffer)> {
        Some((
            self.killer_criterion_edit.editing()?,
            self.killer_criterion_edit.current_buffer()?,
        ))
    }

    pub fn update_killer_criterion_edit(
        &mut self,
        patch: KillerCriterionPatch,
    ) -> Result<(), EditError> {
        self.killer_criterion_edit.update_buffer(patch)
    }

    pub fn commit_killer_criterion_edit(&mut self) -> Result<KillerCriterionId, EditError> {
        self.killer_criterion_edit.commit(
            &mut self.killer_criteria,
            |criterion| &criterion.id,
            |criterion, buffer| {
                criterion.question = buffer.question;
                criterion.required = buffer.required;
            },
        )
    }

    pub fn cancel_killer_criterion_edit(&mut self) -> bool {
        self.killer_criterion_edit.cancel()
    }

    pub fn view(&self) -> DraftView {
        DraftView {
            title: self.title.clone(),
            location: self.location.clone(),
            contract_type: self.contract_type.clone(),
            salary: self.salary.clone(),
            description: self.description.clone(),
            requirements: self.live_requirements().into_iter().cloned().collect(),
            criteria: self.live_criteria().into_iter().cloned().collect(),
            killer_criteria: self.live_killer_criteria().into_iter().cloned().collect(),
            criteria_weight_total: self.criteria_weight_total(),
        }
    }

    /// Consumes the draft, dropping tombstoned entries. Open edit buffers are discarded unsaved.
    pub fn finalize(self, platforms: BTreeSet<Platform>) -> NewPosition {
        let requirements = self
            .requirements
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !self.deleted_requirements.is_deleted(index))
            .map(|(_, requirement)| requirement)
            .collect();
        let criteria = self
            .criteria
            .into_iter()
            .filter(|criterion| !self.deleted_criteria.is_deleted(&criterion.id))
            .collect();
        let killer_criteria = self
            .killer_criteria
            .into_iter()
            .filter(|criterion| !self.deleted_killer_criteria.is_deleted(&criterion.id))
            .collect();

        NewPosition {
            title: self.title,
            location: self.location,
            description: self.description,
            requirements,
            criteria,
            killer_criteria,
            contract_type: self.contract_type,
            salary: self.salary,
            platforms,
        }
    }
}
