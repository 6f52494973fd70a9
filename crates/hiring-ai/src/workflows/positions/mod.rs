//! Position drafting wizard, draft editing overlays, publishing, and list browsing.

pub mod domain;
pub mod draft;
pub mod edit;
pub mod generation;
pub mod listing;
pub mod overlay;
pub mod publish;
pub mod repository;
pub mod router;
pub mod wizard;

pub use domain::{
    EvaluationCriterion, KillerCriterion, NewPosition, Position, PositionId, PositionStatus,
    CITIES, CONTRACT_TYPES,
};
pub use draft::{DraftView, PositionDraft};
pub use edit::{CriterionPatch, EditError, KillerCriterionPatch};
pub use generation::{
    DescriptionGenerator, GeneratedDraft, GenerationError, GenerationSchedule,
    MockDescriptionGenerator,
};
pub use listing::{CityFilter, PositionListEngine, SortDirection, SortField, SortState};
pub use publish::{Platform, PublishSelector};
pub use repository::{PositionRepository, RepositoryError};
pub use router::position_router;
pub use wizard::{BlockedReason, GenerationPoll, WizardController, WizardError, WizardStep};
