use std::cmp::Reverse;

use serde::Serialize;

use super::domain::{CaseRecord, CaseState, CaseView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCount {
    pub state: CaseState,
    pub state_label: &'static str,
    pub count: usize,
}

/// Staff dashboard: totals per state, the review queue and the latest arrivals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_cases: usize,
    pub by_state: Vec<StateCount>,
    pub pending: Vec<CaseView>,
    pub latest: Vec<CaseView>,
}

impl DashboardSummary {
    pub fn from_records(records: &[CaseRecord], recent_limit: usize) -> Self {
        let by_state = CaseState::ALL
            .into_iter()
            .map(|state| StateCount {
                state,
                state_label: state.label(),
                count: records.iter().filter(|record| record.state == state).count(),
            })
            .collect();

        let mut pending: Vec<&CaseRecord> = records
            .iter()
            .filter(|record| record.state.is_pending())
            .collect();
        pending.sort_by_key(|record| (Reverse(record.priority), Reverse(record.created_at)));

        let mut latest: Vec<&CaseRecord> = records.iter().collect();
        sort_newest_first(&mut latest);
        latest.truncate(recent_limit);

        Self {
            total_cases: records.len(),
            by_state,
            pending: pending.into_iter().map(CaseRecord::view).collect(),
            latest: latest.into_iter().map(CaseRecord::view).collect(),
        }
    }

    pub fn count(&self, state: CaseState) -> usize {
        self.by_state
            .iter()
            .find(|entry| entry.state == state)
            .map_or(0, |entry| entry.count)
    }
}

/// Newest first; ties fall back to the higher id.
pub(crate) fn sort_newest_first(records: &mut [&CaseRecord]) {
    records.sort_by_key(|record| (Reverse(record.created_at), Reverse(record.id)));
}
