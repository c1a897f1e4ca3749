//! List filters over the student collection.

use serde::Deserialize;

use crate::student::StudentRecord;

/// Filters accepted by the list operation.
///
/// Every supplied filter must pass for a record to be kept. An empty string
/// counts as "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
  /// Case-insensitive substring over `studentId`, `fullName` or `program`.
  pub q:       Option<String>,
  /// Case-insensitive exact match on `gender`.
  pub gender:  Option<String>,
  /// Case-insensitive substring match on `program`.
  pub program: Option<String>,
}

impl StudentQuery {
  /// Whether `record` passes every supplied filter.
  pub fn matches(&self, record: &StudentRecord) -> bool {
    if let Some(q) = supplied(&self.q) {
      let hit = contains_ci(&record.student_id, &q)
        || contains_ci(&record.full_name, &q)
        || record.program.as_deref().is_some_and(|p| contains_ci(p, &q));
      if !hit {
        return false;
      }
    }

    if let Some(gender) = supplied(&self.gender)
      && record.gender.as_deref().unwrap_or_default().to_lowercase() != gender
    {
      return false;
    }

    if let Some(program) = supplied(&self.program)
      && !contains_ci(record.program.as_deref().unwrap_or_default(), &program)
    {
      return false;
    }

    true
  }

  /// Keep only the matching records, preserving their order.
  pub fn apply(&self, mut records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    records.retain(|r| self.matches(r));
    records
  }
}

/// The lower-cased filter value, or `None` if absent or empty.
fn supplied(filter: &Option<String>) -> Option<String> {
  filter
    .as_deref()
    .filter(|s| !s.is_empty())
    .map(str::to_lowercase)
}

/// `haystack` contains the already lower-cased `needle`, ignoring case.
fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::student::NewStudent;

  fn student(
    id: &str,
    student_id: &str,
    name: &str,
    gender: Option<&str>,
    program: Option<&str>,
  ) -> StudentRecord {
    NewStudent {
      student_id: Some(student_id.into()),
      full_name: Some(name.into()),
      gmail: Some(format!("{student_id}@x.com")),
      gender: gender.map(Into::into),
      program: program.map(Into::into),
      ..Default::default()
    }
    .validate()
    .unwrap()
    .into_record(id.into(), Utc::now())
  }

  fn fixture() -> Vec<StudentRecord> {
    vec![
      student("3", "S3", "Carl Moss", None, None),
      student("2", "S2", "Bo Chan", Some("M"), Some("CS")),
      student("1", "S1", "Ann Lee", Some("F"), Some("Computer Science")),
    ]
  }

  fn ids(records: &[StudentRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
  }

  fn query(q: Option<&str>, gender: Option<&str>, program: Option<&str>) -> StudentQuery {
    StudentQuery {
      q:       q.map(Into::into),
      gender:  gender.map(Into::into),
      program: program.map(Into::into),
    }
  }

  #[test]
  fn no_filters_keeps_everything_in_order() {
    let out = StudentQuery::default().apply(fixture());
    assert_eq!(ids(&out), ["3", "2", "1"]);
  }

  #[test]
  fn q_matches_any_of_three_fields() {
    assert_eq!(ids(&query(Some("ann"), None, None).apply(fixture())), ["1"]);
    assert_eq!(ids(&query(Some("s2"), None, None).apply(fixture())), ["2"]);
    assert_eq!(
      ids(&query(Some("SCIENCE"), None, None).apply(fixture())),
      ["1"]
    );
  }

  #[test]
  fn q_does_not_search_other_fields() {
    let out = query(Some("x.com"), None, None).apply(fixture());
    assert!(out.is_empty());
  }

  #[test]
  fn gender_is_exact_and_case_insensitive() {
    assert_eq!(ids(&query(None, Some("f"), None).apply(fixture())), ["1"]);
    assert!(query(None, Some("Fe"), None).apply(fixture()).is_empty());
  }

  #[test]
  fn program_is_substring_and_case_insensitive() {
    let out = query(None, None, Some("c")).apply(fixture());
    assert_eq!(ids(&out), ["2", "1"]);
  }

  #[test]
  fn filters_compose_conjunctively() {
    let records = vec![
      student("b", "B", "Bee", Some("M"), Some("CS")),
      student("a", "A", "Ay", Some("F"), Some("CS")),
    ];
    let out = query(None, Some("F"), Some("CS")).apply(records);
    assert_eq!(ids(&out), ["a"]);
  }

  #[test]
  fn empty_filters_are_ignored() {
    let out = query(Some(""), Some(""), Some("")).apply(fixture());
    assert_eq!(out.len(), 3);
  }
}
