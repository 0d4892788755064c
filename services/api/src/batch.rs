use claim_intake::cases::{read_intake_forms_from_path, sanitize, IntakeForm};
use claim_intake::error::AppError;
use claim_intake::triage::{TriageEngine, TriageOutcome, CHECKED};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct TriageArgs {
    /// The claimant reports injuries
    #[arg(long)]
    pub(crate) injuries: bool,
    /// The claimant reports material damage
    #[arg(long)]
    pub(crate) material_damage: bool,
    /// An insurer is involved
    #[arg(long)]
    pub(crate) insurance: bool,
    /// Submitter role token (victim, responsible_party)
    #[arg(long)]
    pub(crate) role: Option<String>,
    /// Accident type token (vehicular, pedestrian, motorcycle, public_transport)
    #[arg(long)]
    pub(crate) accident_type: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Intake CSV export with one submission per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Emit one JSON object per row instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let form = form_from_flags(args);
    let outcome = TriageEngine::new().evaluate(&form);
    for line in render_outcome(&outcome) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let forms = read_intake_forms_from_path(&args.csv)?;
    for line in batch_lines(&forms, args.json) {
        println!("{line}");
    }
    Ok(())
}

fn form_from_flags(args: TriageArgs) -> IntakeForm {
    let flag = |on: bool| on.then(|| CHECKED.to_string());
    IntakeForm {
        injuries: flag(args.injuries),
        material_damage: flag(args.material_damage),
        insurance_involved: flag(args.insurance),
        submitter_role: args.role,
        accident_type: args.accident_type,
        ..IntakeForm::default()
    }
}

fn render_outcome(outcome: &TriageOutcome) -> Vec<String> {
    let mut lines = vec![format!("Triage: {}", outcome.summary())];
    if outcome.components.is_empty() {
        lines.push("  No weighted signals present".to_string());
    }
    for component in &outcome.components {
        lines.push(format!("  +{} {}", component.points, component.notes));
    }
    lines
}

fn batch_lines(forms: &[IntakeForm], as_json: bool) -> Vec<String> {
    let engine = TriageEngine::new();
    let mut lines = Vec::with_capacity(forms.len() + 1);
    if !as_json {
        lines.push(format!(
            "{:>4}  {:<28} {:>5}  {:<13} {:>8}  {}",
            "row", "name", "score", "state", "priority", "intake"
        ));
    }

    for (index, form) in forms.iter().enumerate() {
        let row = index + 1;
        let outcome = engine.evaluate(form);
        let intake = match sanitize(form.clone()) {
            Ok(_) => "ok".to_string(),
            Err(violation) => violation.to_string(),
        };
        let name = form.full_name.as_deref().unwrap_or("-");

        if as_json {
            lines.push(
                json!({
                    "row": row,
                    "full_name": form.full_name,
                    "viability_score": outcome.score,
                    "state": outcome.state,
                    "priority": outcome.priority,
                    "intake": intake,
                })
                .to_string(),
            );
        } else {
            lines.push(format!(
                "{:>4}  {:<28} {:>5}  {:<13} {:>8}  {}",
                row,
                name,
                outcome.score,
                outcome.state.token(),
                outcome.priority,
                intake
            ));
        }
    }
    lines
}
