use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use super::domain::{CaseRecord, IntakeForm};

#[derive(Debug, thiserror::Error)]
pub enum CaseCsvError {
    #[error("failed to access case CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid case CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u64,
    created_at: String,
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    accident_type: &'a str,
    submitter_role: &'a str,
    viability_score: u8,
    state: &'static str,
    priority: u8,
}

impl<'a> From<&'a CaseRecord> for ExportRow<'a> {
    fn from(record: &'a CaseRecord) -> Self {
        let intake = &record.intake;
        Self {
            id: record.id.0,
            created_at: record.created_at.to_rfc3339(),
            full_name: intake.full_name.as_deref().unwrap_or_default(),
            email: intake.email.as_deref().unwrap_or_default(),
            phone: intake.phone.as_deref().unwrap_or_default(),
            accident_type: intake.accident_type.as_deref().unwrap_or_default(),
            submitter_role: intake.submitter_role.as_deref().unwrap_or_default(),
            viability_score: record.viability_score,
            state: record.state.token(),
            priority: record.priority,
        }
    }
}

/// Writes one CSV row per case, header included.
pub fn write_cases<W: Write>(writer: W, records: &[CaseRecord]) -> Result<(), CaseCsvError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads intake rows whose headers match the intake form field names.
///
/// Missing columns and blank cells are treated as unanswered.
pub fn read_intake_forms<R: Read>(reader: R) -> Result<Vec<IntakeForm>, CaseCsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut forms = Vec::new();

    for row in csv_reader.deserialize::<IntakeForm>() {
        forms.push(blank_cells_as_none(row?));
    }

    Ok(forms)
}

pub fn read_intake_forms_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<IntakeForm>, CaseCsvError> {
    let file = File::open(path)?;
    read_intake_forms(file)
}

fn blank_cells_as_none(form: IntakeForm) -> IntakeForm {
    let clean = |value: Option<String>| value.filter(|cell| !cell.trim().is_empty());
    IntakeForm {
        full_name: clean(form.full_name),
        email: clean(form.email),
        phone: clean(form.phone),
        accident_type: clean(form.accident_type),
        submitter_role: clean(form.submitter_role),
        accident_date: clean(form.accident_date),
        description: clean(form.description),
        injuries: clean(form.injuries),
        material_damage: clean(form.material_damage),
        insurance_involved: clean(form.insurance_involved),
        own_insurer: clean(form.own_insurer),
        other_insurer: clean(form.other_insurer),
    }
}
