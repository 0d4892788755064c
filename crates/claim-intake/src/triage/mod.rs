//! Case triage: viability score, automatic state and priority.
//!
//! Every function here is total over [`IntakeForm`]. Missing or malformed answers count as
//! unchecked, so a blank form scores 0, lands in `discarded` and gets priority 1.

mod policy;
mod rules;

pub use policy::{classify_state, compute_priority, priority_for, PriorityBand};
pub use rules::{compute_viability, ScoreBand, TriageFactor, CHECKED, MAX_VIABILITY};

use crate::cases::domain::{CaseState, IntakeForm};
use serde::{Deserialize, Serialize};

/// Stateless evaluator applied once per submission and on explicit re-triage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriageEngine;

impl TriageEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, form: &IntakeForm) -> TriageOutcome {
        let (components, total) = rules::score_form(form);
        let score = total.min(MAX_VIABILITY);
        let injuries = form.injuries_present();
        let state = policy::decide_state(
            score,
            injuries,
            form.material_damage_present(),
            form.insurance_present(),
        );
        let priority = priority_for(state, injuries);

        TriageOutcome {
            score,
            state,
            priority,
            components,
        }
    }
}

/// Discrete contribution to a viability score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: TriageFactor,
    pub points: u8,
    pub notes: String,
}

/// Derived attributes merged into a case before storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub score: u8,
    pub state: CaseState,
    pub priority: u8,
    pub components: Vec<ScoreComponent>,
}

impl TriageOutcome {
    pub fn summary(&self) -> String {
        format!(
            "score {}/{} -> {} (priority {})",
            self.score,
            MAX_VIABILITY,
            self.state.label().to_lowercase(),
            self.priority
        )
    }
}
