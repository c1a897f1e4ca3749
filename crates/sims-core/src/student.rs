//! The student record and its create-time input schema.
//!
//! Records are immutable once persisted. The only way in is
//! [`NewStudent::validate`] followed by [`ValidStudent::into_record`], and the
//! only way out is deletion by `id`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::{Error, Result};

// ─── Persisted record ────────────────────────────────────────────────────────

/// One student as stored in the backing document and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
  /// Server-assigned, unique across the collection.
  #[serde(deserialize_with = "lenient_string")]
  pub id:         String,
  #[serde(deserialize_with = "lenient_string")]
  pub student_id: String,
  #[serde(deserialize_with = "lenient_string")]
  pub full_name:  String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "lenient_optional_string"
  )]
  pub gender:     Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub gmail:      String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "lenient_optional_string"
  )]
  pub program:    Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "lenient_year_level"
  )]
  pub year_level: Option<u32>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "lenient_optional_string"
  )]
  pub university: Option<String>,
  pub created_at: DateTime<Utc>,
}

// ─── Create input ────────────────────────────────────────────────────────────

/// JSON body accepted when creating a student.
///
/// Required fields are still `Option` here so that a missing field is
/// reported as a validation failure rather than a parse failure. Unknown
/// fields are rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStudent {
  pub student_id: Option<String>,
  pub full_name:  Option<String>,
  pub gender:     Option<String>,
  pub gmail:      Option<String>,
  pub program:    Option<String>,
  #[serde(default, deserialize_with = "lenient_year_level")]
  pub year_level: Option<u32>,
  pub university: Option<String>,
}

/// A [`NewStudent`] whose required fields are known to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudent {
  pub student_id: String,
  pub full_name:  String,
  pub gender:     Option<String>,
  pub gmail:      String,
  pub program:    Option<String>,
  pub year_level: Option<u32>,
  pub university: Option<String>,
}

impl NewStudent {
  /// Check that `studentId`, `fullName` and `gmail` are present and not
  /// blank. String fields are trimmed; blank optional fields become `None`.
  pub fn validate(self) -> Result<ValidStudent> {
    match (
      non_blank(self.student_id),
      non_blank(self.full_name),
      non_blank(self.gmail),
    ) {
      (Some(student_id), Some(full_name), Some(gmail)) => Ok(ValidStudent {
        student_id,
        full_name,
        gender: non_blank(self.gender),
        gmail,
        program: non_blank(self.program),
        year_level: self.year_level,
        university: non_blank(self.university),
      }),
      (student_id, full_name, gmail) => {
        let missing = [
          ("studentId", student_id.is_none()),
          ("fullName", full_name.is_none()),
          ("gmail", gmail.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        Err(Error::MissingFields(missing))
      }
    }
  }
}

impl ValidStudent {
  /// Attach the server-assigned fields, producing the record to persist.
  pub fn into_record(
    self,
    id: String,
    created_at: DateTime<Utc>,
  ) -> StudentRecord {
    StudentRecord {
      id,
      student_id: self.student_id,
      full_name: self.full_name,
      gender: self.gender,
      gmail: self.gmail,
      program: self.program,
      year_level: self.year_level,
      university: self.university,
      created_at,
    }
  }
}

// ─── Id assignment ───────────────────────────────────────────────────────────

/// Pick an id for a record created at `now`.
///
/// Ids are the decimal millisecond timestamp, bumped forward past any id
/// already present in `existing`. Uniqueness holds only if the caller keeps
/// `existing` current, i.e. assigns ids under the store's write gate.
pub fn next_id(now: DateTime<Utc>, existing: &[StudentRecord]) -> String {
  let taken: HashSet<&str> = existing.iter().map(|s| s.id.as_str()).collect();
  let mut candidate = now.timestamp_millis();
  while taken.contains(candidate.to_string().as_str()) {
    candidate += 1;
  }
  candidate.to_string()
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

/// Text of a scalar stored by an older writer, which kept whatever JSON type
/// the client sent. Numbers and booleans are rendered as text.
fn scalar_text(value: Value) -> Option<Result<String, String>> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(Ok(s)),
    Value::Number(n) => Some(Ok(n.to_string())),
    Value::Bool(b) => Some(Ok(b.to_string())),
    other => Some(Err(format!("expected a string, found {other}"))),
  }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match scalar_text(Value::deserialize(deserializer)?) {
    Some(Ok(s)) => Ok(s),
    Some(Err(msg)) => Err(D::Error::custom(msg)),
    None => Err(D::Error::custom("expected a string, found null")),
  }
}

fn lenient_optional_string<'de, D>(
  deserializer: D,
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let text = scalar_text(Value::deserialize(deserializer)?)
    .transpose()
    .map_err(D::Error::custom)?;
  Ok(non_blank(text))
}

fn lenient_year_level<'de, D>(
  deserializer: D,
) -> Result<Option<u32>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.as_ref().and_then(year_level_from_json))
}

/// Interpret a JSON value as a year level.
///
/// Positive whole numbers, given either as a JSON number or a numeric string,
/// are accepted. Everything else (zero, negatives, fractions, text, `null`)
/// is treated as absent.
pub fn year_level_from_json(value: &Value) -> Option<u32> {
  let n = match value {
    Value::Number(n) => n.as_u64().or_else(|| {
      n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u64)
    }),
    Value::String(s) => s.trim().parse::<u64>().ok(),
    _ => None,
  }?;
  u32::try_from(n).ok().filter(|n| *n > 0)
}
