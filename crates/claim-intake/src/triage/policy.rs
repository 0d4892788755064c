use serde::{Deserialize, Serialize};

use super::rules::compute_viability;
use crate::cases::domain::{CaseState, IntakeForm};

/// Automatic state for the intake answers. Never yields `New` or `Contacted`.
pub fn classify_state(form: &IntakeForm) -> CaseState {
    decide_state(
        compute_viability(form),
        form.injuries_present(),
        form.material_damage_present(),
        form.insurance_present(),
    )
}

/// Priority derived from the automatic state and the injury flag.
pub fn compute_priority(form: &IntakeForm) -> u8 {
    priority_for(classify_state(form), form.injuries_present())
}

pub(crate) fn decide_state(
    score: u8,
    injuries: bool,
    material_damage: bool,
    insurance: bool,
) -> CaseState {
    // qualification must be checked before review
    if score >= 8 || (injuries && score >= 7) {
        return CaseState::Qualified;
    }

    if score >= 5 || material_damage || insurance {
        return CaseState::UnderReview;
    }

    CaseState::Discarded
}

/// Priority ladder for a state. `New` only shows up when a caller skipped classification.
pub fn priority_for(state: CaseState, injuries: bool) -> u8 {
    match state {
        CaseState::Qualified if injuries => 5,
        CaseState::Qualified => 4,
        CaseState::UnderReview => 3,
        CaseState::New => 2,
        CaseState::Discarded | CaseState::Contacted => 1,
    }
}

/// Urgency bucket used when rendering priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    Routine,
    Elevated,
    Urgent,
}

impl PriorityBand {
    pub const fn from_priority(priority: u8) -> Self {
        if priority >= 4 {
            PriorityBand::Urgent
        } else if priority == 3 {
            PriorityBand::Elevated
        } else {
            PriorityBand::Routine
        }
    }
}
