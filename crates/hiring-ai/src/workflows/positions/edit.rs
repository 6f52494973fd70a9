use serde::{Deserialize, Serialize};

use super::domain::{EvaluationCriterion, KillerCriterion};

/// Single-slot edit buffer for one entity category.
///
/// Opening a session on another entity replaces the current buffer without writing it back.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession<K, T> {
    open: Option<OpenEdit<K, T>>,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenEdit<K, T> {
    key: K,
    buffer: T,
}

impl<K, T> Default for EditSession<K, T> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<K: PartialEq, T> EditSession<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session with a working copy, returning the unsaved buffer it replaced.
    pub fn begin(&mut self, key: K, working_copy: T) -> Option<(K, T)> {
        self.open
            .replace(OpenEdit {
                key,
                buffer: working_copy,
            })
            .map(|previous| (previous.key, previous.buffer))
    }

    pub fn current_buffer(&self) -> Option<&T> {
        self.open.as_ref().map(|edit| &edit.buffer)
    }

    pub fn editing(&self) -> Option<&K> {
        self.open.as_ref().map(|edit| &edit.key)
    }

    pub fn is_editing(&self, key: &K) -> bool {
        self.editing() == Some(key)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn update_buffer<P>(&mut self, patch: P) -> Result<(), EditError>
    where
        T: Patch<P>,
    {
        let edit = self.open.as_mut().ok_or(EditError::NoOpenSession)?;
        edit.buffer.apply(patch);
        Ok(())
    }

    /// Writes the buffer into the entry whose key matches and closes the session.
    ///
    /// When no entry matches the session is still closed and the buffer dropped.
    pub fn commit<E, F, W>(&mut self, list: &mut [E], key_of: F, write: W) -> Result<K, EditError>
    where
        F: Fn(&E) -> &K,
        W: FnOnce(&mut E, T),
    {
        let OpenEdit { key, buffer } = self.open.take().ok_or(EditError::NoOpenSession)?;
        let target = list
            .iter_mut()
            .find(|entry| key_of(entry) == &key)
            .ok_or(EditError::TargetMissing)?;
        write(target, buffer);
        Ok(key)
    }

    /// Closes the session and hands back the buffer for callers that address entries themselves.
    pub fn take(&mut self) -> Option<(K, T)> {
        self.open.take().map(|edit| (edit.key, edit.buffer))
    }

    /// Discards the buffer; the underlying list is never touched.
    pub fn cancel(&mut self) -> bool {
        self.open.take().is_some()
    }
}

/// Partial update applied to an edit buffer.
pub trait Patch<P> {
    fn apply(&mut self, patch: P);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no edit session is open")]
    NoOpenSession,
    #[error("edited entry is no longer present")]
    TargetMissing,
}

/// Working copy of an evaluation criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionBuffer {
    pub name: String,
    pub weight: u8,
    pub description: String,
}

impl From<&EvaluationCriterion> for CriterionBuffer {
    fn from(criterion: &EvaluationCriterion) -> Self {
        Self {
            name: criterion.name.clone(),
            weight: criterion.weight,
            description: criterion.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionPatch {
    pub name: Option<String>,
    pub weight: Option<u8>,
    pub description: Option<String>,
}

impl CriterionPatch {
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn description(value: impl Into<String>) -> Self {
        Self {
            description: Some(value.into()),
            ..Self::default()
        }
    }

    /// Weight typed by the operator; see [`parse_weight`].
    pub fn weight_input(raw: &str) -> Self {
        Self {
            weight: Some(parse_weight(raw)),
            ..Self::default()
        }
    }
}

impl Patch<CriterionPatch> for CriterionBuffer {
    fn apply(&mut self, patch: CriterionPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight.min(100);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// Working copy of a killer criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillerCriterionBuffer {
    pub question: String,
    pub required: bool,
}

impl From<&KillerCriterion> for KillerCriterionBuffer {
    fn from(criterion: &KillerCriterion) -> Self {
        Self {
            question: criterion.question.clone(),
            required: criterion.required,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillerCriterionPatch {
    pub question: Option<String>,
    pub required: Option<bool>,
}

impl KillerCriterionPatch {
    pub fn question(value: impl Into<String>) -> Self {
        Self {
            question: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn required(value: bool) -> Self {
        Self {
            required: Some(value),
            ..Self::default()
        }
    }
}

impl Patch<KillerCriterionPatch> for KillerCriterionBuffer {
    fn apply(&mut self, patch: KillerCriterionPatch) {
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
    }
}

impl Patch<String> for String {
    fn apply(&mut self, patch: String) {
        *self = patch;
    }
}

impl Patch<&str> for String {
    fn apply(&mut self, patch: &str) {
        self.clear();
        self.push_str(patch);
    }
}

/// Lenient weight parsing: leading integer digits are read, anything unparsable becomes 0,
/// and values above 100 are clamped.
pub fn parse_weight(raw: &str) -> u8 {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.starts_with('-') {
        return 0;
    }
    let digits: String = unsigned
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(value) => value.min(100) as u8,
        Err(_) if !digits.is_empty() => 100,
        Err(_) => 0,
    }
}
