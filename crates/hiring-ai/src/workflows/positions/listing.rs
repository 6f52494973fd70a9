//! Search, city filter and sorting for the committed positions list.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::Position;

/// Label shown for the "no city filter" option.
pub const ALL_CITIES_LABEL: &str = "All cities";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityFilter {
    #[default]
    All,
    City(String),
}

impl CityFilter {
    /// Blank input and the sentinel label both mean "all cities".
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case("all") => Self::All,
            Some(value) if value == ALL_CITIES_LABEL => Self::All,
            Some(value) => Self::City(value.to_string()),
        }
    }

    pub fn matches(&self, location: &str) -> bool {
        match self {
            Self::All => true,
            Self::City(city) => city == location,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CITIES_LABEL,
            Self::City(city) => city,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Status,
    CandidateCount,
    Date,
}

impl SortField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Status => "status",
            Self::CandidateCount => "candidate_count",
            Self::Date => "date",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "candidates" | "candidate_count" => Ok(Self::CandidateCount),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Active sort column. Newest first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Re-selecting the active field flips direction; a new field starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Browsing state for the positions list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionListEngine {
    pub search: String,
    pub city: CityFilter,
    pub sort: SortState,
}

impl PositionListEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_city(&mut self, city: CityFilter) {
        self.city = city;
    }

    /// Choosing the city that is already selected clears the filter.
    pub fn select_city(&mut self, city: &str) {
        let chosen = CityFilter::from_param(Some(city));
        self.city = if chosen == self.city {
            CityFilter::All
        } else {
            chosen
        };
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn apply(&self, positions: &[Position]) -> Vec<Position> {
        view(
            positions,
            &self.search,
            &self.city,
            self.sort.field,
            self.sort.direction,
        )
    }
}

/// Filters by title substring and city, then stable-sorts on one field.
pub fn view(
    positions: &[Position],
    search: &str,
    city: &CityFilter,
    field: SortField,
    direction: SortDirection,
) -> Vec<Position> {
    let needle = search.to_lowercase();
    let mut matches: Vec<Position> = positions
        .iter()
        .filter(|position| position.title.to_lowercase().contains(&needle))
        .filter(|position| city.matches(&position.location))
        .cloned()
        .collect();

    matches.sort_by(|a, b| direction.apply(compare(a, b, field)));
    matches
}

fn compare(a: &Position, b: &Position, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Status => a.status.label().cmp(b.status.label()),
        SortField::CandidateCount => a.candidate_count.cmp(&b.candidate_count),
        SortField::Date => parse_listing_date(&a.date).cmp(&parse_listing_date(&b.date)),
    }
}

/// Reads `DD/MM/YYYY` (or `D/M/YYYY`) first, then a handful of common layouts.
///
/// Unparsable text yields `None`, which orders before every real date.
pub fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 3 {
        let day = leading_number(parts[0])?;
        let month = leading_number(parts[1])?;
        let year = leading_number(parts[2])?;
        return NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day);
    }

    lenient_date(raw)
}

fn leading_number(part: &str) -> Option<u32> {
    let digits: String = part
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn lenient_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.date());
    }
    ["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Choices for the city filter: the sentinel first, then each distinct location in order.
pub fn available_cities(positions: &[Position]) -> Vec<String> {
    let distinct: BTreeSet<&str> = positions
        .iter()
        .map(|position| position.location.as_str())
        .collect();
    std::iter::once(ALL_CITIES_LABEL.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// Compact row used by list responses and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionSummary {
    pub id: String,
    pub title: String,
    pub location: String,
    pub date: String,
    pub status: &'static str,
    pub candidate_count: u32,
    pub contract_type: String,
    pub salary: String,
}

impl From<&Position> for PositionSummary {
    fn from(position: &Position) -> Self {
        Self {
            id: position.id.0.clone(),
            title: position.title.clone(),
            location: position.location.clone(),
            date: position.date.clone(),
            status: position.status.label(),
            candidate_count: position.candidate_count,
            contract_type: position.contract_type.clone(),
            salary: position.salary.clone(),
        }
    }
}

pub fn write_csv<W: io::Write>(positions: &[Position], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for position in positions {
        csv_writer.serialize(PositionSummary::from(position))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::positions::domain::{PositionId, PositionStatus};

    fn position(id: &str, title: &str, location: &str, date: &str, candidates: u32) -> Position {
        Position {
            id: PositionId(id.to_string()),
            title: title.to_string(),
            location: location.to_string(),
            date: date.to_string(),
            status: PositionStatus::Active,
            candidate_count: candidates,
            description: String::new(),
            requirements: Vec::new(),
            criteria: Vec::new(),
            killer_criteria: Vec::new(),
            contract_type: "Indefinido".to_string(),
            salary: String::new(),
        }
    }

    fn titles(positions: &[Position]) -> Vec<&str> {
        positions
            .iter()
            .map(|position| position.title.as_str())
            .collect()
    }

    #[test]
    fn sorts_by_parsed_date_and_candidate_count() {
        let positions = vec![
            position("1", "Camarero A", "Barcelona", "02/03/2025", 64),
            position("2", "Camarero B", "Barcelona", "01/03/2025", 4),
        ];

        let by_date = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::Date,
            SortDirection::Asc,
        );
        assert_eq!(titles(&by_date), vec!["Camarero B", "Camarero A"]);

        let by_candidates = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::CandidateCount,
            SortDirection::Desc,
        );
        assert_eq!(titles(&by_candidates), vec!["Camarero A", "Camarero B"]);
    }

    #[test]
    fn day_month_order_beats_lexicographic_order() {
        let positions = vec![
            position("1", "Later", "Madrid", "5/1/2025", 0),
            position("2", "Earlier", "Madrid", "28/12/2024", 0),
        ];
        let sorted = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::Date,
            SortDirection::Asc,
        );
        assert_eq!(titles(&sorted), vec!["Earlier", "Later"]);
    }

    #[test]
    fn unparsable_dates_fall_back_then_sort_first() {
        assert_eq!(
            parse_listing_date("2025-03-04"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(parse_listing_date("soon"), None);
        assert_eq!(parse_listing_date("31/02/2025"), None);

        let positions = vec![
            position("1", "Dated", "Madrid", "01/01/2024", 0),
            position("2", "Undated", "Madrid", "tbd", 0),
        ];
        let sorted = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::Date,
            SortDirection::Asc,
        );
        assert_eq!(titles(&sorted), vec!["Undated", "Dated"]);
    }

    #[test]
    fn search_is_case_insensitive_and_city_is_exact() {
        let positions = vec![
            position("1", "Cocinero/a", "Barcelona", "01/03/2025", 1),
            position("2", "Camarero", "Madrid", "01/03/2025", 2),
            position("3", "Jefe de cocina", "Madrid", "01/03/2025", 3),
        ];

        let found = view(
            &positions,
            "COCIN",
            &CityFilter::All,
            SortField::Title,
            SortDirection::Asc,
        );
        assert_eq!(titles(&found), vec!["Cocinero/a", "Jefe de cocina"]);

        let madrid = view(
            &positions,
            "cocin",
            &CityFilter::City("Madrid".to_string()),
            SortField::Title,
            SortDirection::Asc,
        );
        assert_eq!(titles(&madrid), vec!["Jefe de cocina"]);

        let partial_city = view(
            &positions,
            "",
            &CityFilter::City("Madr".to_string()),
            SortField::Title,
            SortDirection::Asc,
        );
        assert!(partial_city.is_empty());
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let positions = vec![
            position("1", "First", "Madrid", "01/03/2025", 5),
            position("2", "Second", "Madrid", "01/03/2025", 5),
            position("3", "Third", "Madrid", "01/03/2025", 1),
        ];
        let ascending = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::CandidateCount,
            SortDirection::Asc,
        );
        assert_eq!(titles(&ascending), vec!["Third", "First", "Second"]);

        let descending = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::CandidateCount,
            SortDirection::Desc,
        );
        assert_eq!(titles(&descending), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn descending_reverses_ascending_without_ties() {
        let positions = vec![
            position("1", "bravo", "Madrid", "03/03/2025", 9),
            position("2", "Alpha", "Sevilla", "01/03/2025", 3),
            position("3", "charlie", "Madrid", "02/03/2025", 7),
        ];
        for field in [SortField::Title, SortField::CandidateCount, SortField::Date] {
            let ascending = view(&positions, "", &CityFilter::All, field, SortDirection::Asc);
            let mut descending =
                view(&positions, "", &CityFilter::All, field, SortDirection::Desc);
            descending.reverse();
            assert_eq!(ascending, descending, "field {}", field.key());
        }
    }

    #[test]
    fn status_sorts_by_label() {
        let with_status = |id: &str, status: PositionStatus| Position {
            status,
            ..position(id, status.label(), "Madrid", "01/03/2025", 0)
        };
        let positions = vec![
            with_status("1", PositionStatus::Paused),
            with_status("2", PositionStatus::Active),
            with_status("3", PositionStatus::Draft),
            with_status("4", PositionStatus::Closed),
        ];

        let ascending = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::Status,
            SortDirection::Asc,
        );
        assert_eq!(titles(&ascending), vec!["active", "closed", "draft", "paused"]);

        let descending = view(
            &positions,
            "",
            &CityFilter::All,
            SortField::Status,
            SortDirection::Desc,
        );
        assert_eq!(titles(&descending), vec!["paused", "draft", "closed", "active"]);
    }

    #[test]
    fn viewing_a_view_changes_nothing() {
        let positions = vec![
            position("1", "Camarero", "Madrid", "03/03/2025", 9),
            position("2", "Camarera de pisos", "Madrid", "01/03/2025", 3),
            position("3", "Cocinero", "Madrid", "02/03/2025", 7),
            position("4", "Camarero", "Sevilla", "02/03/2025", 7),
        ];
        let city = CityFilter::City("Madrid".to_string());
        let once = view(&positions, "camar", &city, SortField::Date, SortDirection::Desc);
        let twice = view(&once, "camar", &city, SortField::Date, SortDirection::Desc);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn toggling_sort_flips_or_resets_direction() {
        let mut engine = PositionListEngine::new();
        assert_eq!(engine.sort, SortState::default());

        engine.toggle_sort(SortField::Date);
        assert_eq!(engine.sort.direction, SortDirection::Asc);
        engine.toggle_sort(SortField::Date);
        assert_eq!(engine.sort.direction, SortDirection::Desc);

        engine.toggle_sort(SortField::Title);
        assert_eq!(engine.sort.field, SortField::Title);
        assert_eq!(engine.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn selecting_the_active_city_clears_the_filter() {
        let mut engine = PositionListEngine::new();
        engine.select_city("Madrid");
        assert_eq!(engine.city, CityFilter::City("Madrid".to_string()));
        engine.select_city("Madrid");
        assert_eq!(engine.city, CityFilter::All);
        engine.select_city(ALL_CITIES_LABEL);
        assert_eq!(engine.city, CityFilter::All);
    }

    #[test]
    fn cities_list_starts_with_sentinel_and_is_deduplicated() {
        let positions = vec![
            position("1", "A", "Sevilla", "01/03/2025", 0),
            position("2", "B", "Barcelona", "01/03/2025", 0),
            position("3", "C", "Sevilla", "01/03/2025", 0),
        ];
        assert_eq!(
            available_cities(&positions),
            vec![ALL_CITIES_LABEL, "Barcelona", "Sevilla"]
        );
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let positions = vec![position("7", "Barista", "Madrid", "12/01/2025", 67)];
        let mut buffer = Vec::new();
        write_csv(&positions, &mut buffer).expect("csv writes");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,title,location,date,status,candidate_count,contract_type,salary")
        );
        assert_eq!(
            lines.next(),
            Some("7,Barista,Madrid,12/01/2025,active,67,Indefinido,")
        );
    }
}
