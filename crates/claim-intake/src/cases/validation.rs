use chrono::NaiveDate;

use super::domain::{AccidentType, IntakeForm, SubmitterRole};

const MAX_NAME_CHARS: usize = 100;
const MAX_PHONE_CHARS: usize = 20;
const MAX_INSURER_CHARS: usize = 100;
const MIN_DESCRIPTION_CHARS: usize = 30;
const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Reasons an intake submission is turned away before triage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} needs at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("email address '{0}' is not valid")]
    InvalidEmail(String),
    #[error("unknown accident type '{0}'")]
    UnknownAccidentType(String),
    #[error("unknown submitter role '{0}'")]
    UnknownSubmitterRole(String),
    #[error("accident date '{0}' must be YYYY-MM-DD")]
    InvalidAccidentDate(String),
}

/// Trims text answers, drops blank optionals and checks the intake rules.
///
/// Checkbox fields are passed through untouched: the triage rules compare them against the
/// exact checked sentinel.
pub fn sanitize(form: IntakeForm) -> Result<IntakeForm, IntakeViolation> {
    let IntakeForm {
        full_name,
        email,
        phone,
        accident_type,
        submitter_role,
        accident_date,
        description,
        injuries,
        material_damage,
        insurance_involved,
        own_insurer,
        other_insurer,
    } = form;

    let full_name = required("full_name", full_name, MAX_NAME_CHARS)?;
    let email = required("email", email, usize::MAX)?;
    let phone = required("phone", phone, MAX_PHONE_CHARS)?;

    if !looks_like_email(&email) {
        return Err(IntakeViolation::InvalidEmail(email));
    }

    let accident_type = optional("accident_type", accident_type, usize::MAX)?;
    if let Some(token) = &accident_type {
        if AccidentType::from_token(token).is_none() {
            return Err(IntakeViolation::UnknownAccidentType(token.clone()));
        }
    }

    let submitter_role = optional("submitter_role", submitter_role, usize::MAX)?;
    if let Some(token) = &submitter_role {
        if SubmitterRole::from_token(token).is_none() {
            return Err(IntakeViolation::UnknownSubmitterRole(token.clone()));
        }
    }

    let accident_date = optional("accident_date", accident_date, usize::MAX)?;
    if let Some(raw) = &accident_date {
        if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_err() {
            return Err(IntakeViolation::InvalidAccidentDate(raw.clone()));
        }
    }

    let description = optional("description", description, MAX_DESCRIPTION_CHARS)?;
    if let Some(text) = &description {
        if text.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(IntakeViolation::TooShort {
                field: "description",
                min: MIN_DESCRIPTION_CHARS,
            });
        }
    }

    Ok(IntakeForm {
        full_name: Some(full_name),
        email: Some(email),
        phone: Some(phone),
        accident_type,
        submitter_role,
        accident_date,
        description,
        injuries,
        material_damage,
        insurance_involved,
        own_insurer: optional("own_insurer", own_insurer, MAX_INSURER_CHARS)?,
        other_insurer: optional("other_insurer", other_insurer, MAX_INSURER_CHARS)?,
    })
}

fn required(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<String, IntakeViolation> {
    optional(field, value, max)?.ok_or(IntakeViolation::MissingField(field))
}

fn optional(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, IntakeViolation> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(IntakeViolation::TooLong { field, max });
    }

    Ok(Some(trimmed.to_string()))
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
}
