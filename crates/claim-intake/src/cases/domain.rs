use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::triage::{PriorityBand, ScoreBand, ScoreComponent, TriageOutcome, CHECKED};

/// Identifier wrapper for stored cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub u64);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw answers posted by the public intake form.
///
/// Every field arrives as an optional string. Checkboxes post [`CHECKED`] when ticked and are
/// omitted otherwise, so the flags stay as strings here and are interpreted by the triage rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub accident_type: Option<String>,
    pub submitter_role: Option<String>,
    pub accident_date: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "checkbox_value")]
    pub injuries: Option<String>,
    #[serde(deserialize_with = "checkbox_value")]
    pub material_damage: Option<String>,
    #[serde(deserialize_with = "checkbox_value")]
    pub insurance_involved: Option<String>,
    pub own_insurer: Option<String>,
    pub other_insurer: Option<String>,
}

impl IntakeForm {
    pub fn injuries_present(&self) -> bool {
        is_checked(self.injuries.as_deref())
    }

    pub fn material_damage_present(&self) -> bool {
        is_checked(self.material_damage.as_deref())
    }

    pub fn insurance_present(&self) -> bool {
        is_checked(self.insurance_involved.as_deref())
    }

    /// Typed accident type, if the raw token is one of the known values.
    pub fn accident_kind(&self) -> Option<AccidentType> {
        self.accident_type.as_deref().and_then(AccidentType::from_token)
    }

    pub fn role(&self) -> Option<SubmitterRole> {
        self.submitter_role
            .as_deref()
            .and_then(SubmitterRole::from_token)
    }
}

fn is_checked(value: Option<&str>) -> bool {
    value == Some(CHECKED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccidentType {
    Vehicular,
    Pedestrian,
    Motorcycle,
    PublicTransport,
}

impl AccidentType {
    pub const ALL: [AccidentType; 4] = [
        AccidentType::Vehicular,
        AccidentType::Pedestrian,
        AccidentType::Motorcycle,
        AccidentType::PublicTransport,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            AccidentType::Vehicular => "vehicular",
            AccidentType::Pedestrian => "pedestrian",
            AccidentType::Motorcycle => "motorcycle",
            AccidentType::PublicTransport => "public_transport",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccidentType::Vehicular => "Vehicle collision",
            AccidentType::Pedestrian => "Pedestrian struck",
            AccidentType::Motorcycle => "Motorcycle accident",
            AccidentType::PublicTransport => "Public transport accident",
        }
    }

    pub fn from_token(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitterRole {
    Victim,
    ResponsibleParty,
}

impl SubmitterRole {
    pub const fn token(self) -> &'static str {
        match self {
            SubmitterRole::Victim => "victim",
            SubmitterRole::ResponsibleParty => "responsible_party",
        }
    }

    pub fn from_token(value: &str) -> Option<Self> {
        match value {
            "victim" => Some(SubmitterRole::Victim),
            "responsible_party" => Some(SubmitterRole::ResponsibleParty),
            _ => None,
        }
    }
}

/// Accepts any value for a checkbox answer.
///
/// Strings are kept verbatim; numbers and booleans keep their textual form and nulls, lists
/// and objects become `None`. None of these equal [`CHECKED`], so they all count as unchecked.
fn checkbox_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CheckboxVisitor;

    impl<'de> Visitor<'de> for CheckboxVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a checkbox value")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(CheckboxVisitor)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(CheckboxVisitor)
}

/// Lifecycle label attached to every case.
///
/// Serializes as the canonical snake_case token. Deserialization goes through
/// [`CaseState::parse`], so legacy spellings from older intake forms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CaseState {
    New,
    UnderReview,
    Qualified,
    Discarded,
    Contacted,
}

impl CaseState {
    pub const ALL: [CaseState; 5] = [
        CaseState::New,
        CaseState::UnderReview,
        CaseState::Qualified,
        CaseState::Discarded,
        CaseState::Contacted,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            CaseState::New => "new",
            CaseState::UnderReview => "under_review",
            CaseState::Qualified => "qualified",
            CaseState::Discarded => "discarded",
            CaseState::Contacted => "contacted",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CaseState::New => "New",
            CaseState::UnderReview => "Under review",
            CaseState::Qualified => "Qualified",
            CaseState::Discarded => "Discarded",
            CaseState::Contacted => "Contacted",
        }
    }

    /// Cases still waiting on a staff decision.
    pub const fn is_pending(self) -> bool {
        matches!(self, CaseState::New | CaseState::UnderReview)
    }

    /// Parses a state token, folding case, accents and separators first.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = normalize_token(value);
        match normalized.as_str() {
            "new" | "nuevo" => Some(CaseState::New),
            "under_review" | "en_revision" => Some(CaseState::UnderReview),
            "qualified" | "apto" => Some(CaseState::Qualified),
            "discarded" | "descartado" => Some(CaseState::Discarded),
            "contacted" | "contactado" => Some(CaseState::Contacted),
            _ => None,
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl TryFrom<String> for CaseState {
    type Error = UnknownCaseState;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CaseState::parse(&value).ok_or(UnknownCaseState(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown case state '{0}'")]
pub struct UnknownCaseState(pub String);

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Stored case: the intake answers plus derived and staff-owned attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: CaseId,
    pub intake: IntakeForm,
    pub viability_score: u8,
    pub state: CaseState,
    pub priority: u8,
    pub score_breakdown: Vec<ScoreComponent>,
    pub lawyer_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CaseRecord {
    pub fn new(
        id: CaseId,
        intake: IntakeForm,
        outcome: TriageOutcome,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            id,
            intake,
            viability_score: 0,
            state: CaseState::New,
            priority: 1,
            score_breakdown: Vec::new(),
            lawyer_notes: String::new(),
            created_at,
            updated_at: None,
        };
        record.apply_triage(outcome);
        record
    }

    /// Overwrites the derived attributes with a fresh triage outcome.
    pub fn apply_triage(&mut self, outcome: TriageOutcome) {
        self.viability_score = outcome.score;
        self.state = outcome.state;
        self.priority = outcome.priority;
        self.score_breakdown = outcome.components;
    }

    pub fn view(&self) -> CaseView {
        CaseView {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            full_name: self.intake.full_name.clone().unwrap_or_default(),
            email: self.intake.email.clone().unwrap_or_default(),
            phone: self.intake.phone.clone().unwrap_or_default(),
            accident_type: self.intake.accident_kind(),
            submitter_role: self.intake.role(),
            accident_date: self.intake.accident_date.clone(),
            injuries: self.intake.injuries_present(),
            material_damage: self.intake.material_damage_present(),
            insurance_involved: self.intake.insurance_present(),
            viability_score: self.viability_score,
            score_band: ScoreBand::from_score(self.viability_score),
            state: self.state,
            state_label: self.state.label(),
            priority: self.priority,
            priority_band: PriorityBand::from_priority(self.priority),
            lawyer_notes: self.lawyer_notes.clone(),
        }
    }
}

/// Staff-facing projection of a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseView {
    pub id: CaseId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub accident_type: Option<AccidentType>,
    pub submitter_role: Option<SubmitterRole>,
    pub accident_date: Option<String>,
    pub injuries: bool,
    pub material_damage: bool,
    pub insurance_involved: bool,
    pub viability_score: u8,
    pub score_band: ScoreBand,
    pub state: CaseState,
    pub state_label: &'static str,
    pub priority: u8,
    pub priority_band: PriorityBand,
    pub lawyer_notes: String,
}

/// Staff edits; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffUpdate {
    pub state: Option<CaseState>,
    pub priority: Option<u8>,
    pub lawyer_notes: Option<String>,
}

impl StaffUpdate {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.priority.is_none() && self.lawyer_notes.is_none()
    }
}

/// Listing filter used by the staff case list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub state: Option<CaseState>,
    pub min_priority: Option<u8>,
}

impl CaseFilter {
    pub fn matches(&self, record: &CaseRecord) -> bool {
        self.state.map_or(true, |state| record.state == state)
            && self
                .min_priority
                .map_or(true, |minimum| record.priority >= minimum)
    }
}
