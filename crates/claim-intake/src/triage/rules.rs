use serde::{Deserialize, Serialize};

use super::ScoreComponent;
use crate::cases::domain::IntakeForm;

/// Value a browser posts for a ticked checkbox.
pub const CHECKED: &str = "on";

/// Ceiling applied to the summed weights.
pub const MAX_VIABILITY: u8 = 10;

const VICTIM_ROLE: &str = "victim";
const PEDESTRIAN_ACCIDENT: &str = "pedestrian";

/// Intake signals that carry weight in the viability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageFactor {
    Injuries,
    MaterialDamage,
    InsuranceInvolved,
    VictimRole,
    PedestrianAccident,
}

impl TriageFactor {
    pub const ALL: [TriageFactor; 5] = [
        TriageFactor::Injuries,
        TriageFactor::MaterialDamage,
        TriageFactor::InsuranceInvolved,
        TriageFactor::VictimRole,
        TriageFactor::PedestrianAccident,
    ];

    pub const fn weight(self) -> u8 {
        match self {
            TriageFactor::Injuries => 3,
            TriageFactor::MaterialDamage => 2,
            TriageFactor::InsuranceInvolved => 2,
            TriageFactor::VictimRole => 2,
            TriageFactor::PedestrianAccident => 1,
        }
    }

    const fn note(self) -> &'static str {
        match self {
            TriageFactor::Injuries => "personal injuries reported",
            TriageFactor::MaterialDamage => "material damage reported",
            TriageFactor::InsuranceInvolved => "insurance involved",
            TriageFactor::VictimRole => "submitter is the victim",
            TriageFactor::PedestrianAccident => "pedestrian accident",
        }
    }

    fn applies_to(self, form: &IntakeForm) -> bool {
        match self {
            TriageFactor::Injuries => form.injuries_present(),
            TriageFactor::MaterialDamage => form.material_damage_present(),
            TriageFactor::InsuranceInvolved => form.insurance_present(),
            TriageFactor::VictimRole => form.submitter_role.as_deref() == Some(VICTIM_ROLE),
            TriageFactor::PedestrianAccident => {
                form.accident_type.as_deref() == Some(PEDESTRIAN_ACCIDENT)
            }
        }
    }
}

/// Weights that fired for `form` and their unclamped sum.
pub(crate) fn score_form(form: &IntakeForm) -> (Vec<ScoreComponent>, u8) {
    let components: Vec<ScoreComponent> = TriageFactor::ALL
        .into_iter()
        .filter(|factor| factor.applies_to(form))
        .map(|factor| ScoreComponent {
            factor,
            points: factor.weight(),
            notes: factor.note().to_string(),
        })
        .collect();

    let total = components
        .iter()
        .fold(0u8, |sum, component| sum.saturating_add(component.points));

    (components, total)
}

/// Viability score in `0..=10` for the intake answers.
pub fn compute_viability(form: &IntakeForm) -> u8 {
    let (_, total) = score_form(form);
    total.min(MAX_VIABILITY)
}

/// Coarse strength bucket used when rendering scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub const fn from_score(score: u8) -> Self {
        if score >= 7 {
            ScoreBand::High
        } else if score >= 4 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}
