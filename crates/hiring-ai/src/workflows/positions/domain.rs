use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::publish::Platform;

/// Identifier assigned by the repository when a position is committed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionId(pub String);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an evaluation criterion, unique within one draft.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CriterionId(pub String);

/// Identifier of a killer criterion, unique within one draft.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KillerCriterionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Active,
    Draft,
    Paused,
    Closed,
}

impl PositionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }
}

/// Weighted rubric entry used to score candidates for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCriterion {
    pub id: CriterionId,
    pub name: String,
    /// Percentage in `0..=100`.
    pub weight: u8,
    pub description: String,
}

/// Disqualifying yes/no screening question. `required == false` is shown as "recommended".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillerCriterion {
    pub id: KillerCriterionId,
    pub question: String,
    pub required: bool,
}

/// Committed position owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub title: String,
    pub location: String,
    /// Creation date as `DD/MM/YYYY` text.
    pub date: String,
    pub status: PositionStatus,
    pub candidate_count: u32,
    pub description: String,
    pub requirements: Vec<String>,
    pub criteria: Vec<EvaluationCriterion>,
    pub killer_criteria: Vec<KillerCriterion>,
    pub contract_type: String,
    pub salary: String,
}

impl Position {
    pub fn criteria_weight_total(&self) -> u32 {
        total_weight(&self.criteria)
    }
}

/// Finalized field set produced by the wizard and handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPosition {
    pub title: String,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub criteria: Vec<EvaluationCriterion>,
    pub killer_criteria: Vec<KillerCriterion>,
    pub contract_type: String,
    pub salary: String,
    pub platforms: BTreeSet<Platform>,
}

impl NewPosition {
    /// Builds the repository-owned record once identity and creation date are known.
    pub fn into_position(self, id: PositionId, date: String) -> Position {
        Position {
            id,
            title: self.title,
            location: self.location,
            date,
            status: PositionStatus::Active,
            candidate_count: 0,
            description: self.description,
            requirements: self.requirements,
            criteria: self.criteria,
            killer_criteria: self.killer_criteria,
            contract_type: self.contract_type,
            salary: self.salary,
        }
    }
}

pub(crate) fn total_weight<'a>(criteria: impl IntoIterator<Item = &'a EvaluationCriterion>) -> u32 {
    criteria
        .into_iter()
        .map(|criterion| u32::from(criterion.weight))
        .sum()
}

/// Cities offered when placing a position.
pub const CITIES: [&str; 49] = [
    "A Coruña",
    "Albacete",
    "Alicante",
    "Almería",
    "Barcelona",
    "Bilbao",
    "Burgos",
    "Cáceres",
    "Cádiz",
    "Castelló de la Plana",
    "Ciudad Real",
    "Córdoba",
    "Cuenca",
    "Girona",
    "Granada",
    "Guadalajara",
    "Huelva",
    "Huesca",
    "Jaén",
    "Las Palmas de Gran Canaria",
    "León",
    "Lleida",
    "Logroño",
    "Lugo",
    "Madrid",
    "Málaga",
    "Murcia",
    "Ourense",
    "Oviedo",
    "Palencia",
    "Palma",
    "Pamplona",
    "Pontevedra",
    "Salamanca",
    "San Sebastián",
    "Santa Cruz de Tenerife",
    "Santander",
    "Segovia",
    "Sevilla",
    "Soria",
    "Tarragona",
    "Teruel",
    "Toledo",
    "Valencia",
    "Valladolid",
    "Vigo",
    "Vitoria-Gasteiz",
    "Zamora",
    "Zaragoza",
];

/// Contract types offered when placing a position.
pub const CONTRACT_TYPES: [&str; 10] = [
    "Indefinido",
    "Temporal",
    "Obra o servicio",
    "Interinidad",
    "Formación y aprendizaje",
    "Prácticas",
    "Relevo",
    "Sustitución por anticipación de la edad de jubilación",
    "Temporal por circunstancias excepcionales",
    "Fijo discontinuo",
];
