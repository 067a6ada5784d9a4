//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against case tables. A fixture holds
//! one table and a list of subjects with their expected action; `expect:
//! null` (or omitting it) means the subject must be unmatched.
//!
//! ```yaml
//! name: value cases
//! description: exact integers
//! table:
//!   cases:
//!     - when: { value: 1 }
//!       action: one
//! tests:
//!   - name: hit
//!     subject: 1
//!     expect: one
//!   - name: miss
//!     subject: 2
//! ```

use casewise::{CaseTable, TableConfig};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub table: TableConfig<String>,
    /// Substring of the error `build()` must fail with. No tests run then.
    #[serde(default)]
    pub build_error: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub subject: serde_json::Value,
    #[serde(default)]
    pub expect: Option<String>,
    /// Index of the case expected to fire, checked through the trace.
    #[serde(default)]
    pub matched_index: Option<usize>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub matched_index: Option<usize>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    fn build(&self) -> Result<CaseTable<String>, casewise::ConfigError> {
        self.table.clone().build()
    }

    /// Run all test cases and return results
    ///
    /// # Panics
    ///
    /// Panics if the table fails to build.
    pub fn run(&self) -> Vec<CaseResult> {
        let table = self
            .build()
            .unwrap_or_else(|e| panic!("Fixture '{}' table failed to build: {e}", self.name));
        self.tests
            .iter()
            .map(|case| {
                let actual = table.evaluate(&case.subject).ok();
                let trace = table.evaluate_with_trace(&case.subject);
                let traced = trace.result.as_ref().ok().cloned();
                let matched_index = trace.matched_index();
                let index_ok = case.matched_index.map_or(true, |i| matched_index == Some(i));
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect && traced == actual && index_ok,
                    expected: case.expect.clone(),
                    actual,
                    matched_index,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if let Some(expected) = &self.build_error {
            match self.build() {
                Ok(_) => panic!(
                    "Fixture '{}' expected build error containing {expected:?}, table built",
                    self.name
                ),
                Err(e) => assert!(
                    e.to_string().contains(expected.as_str()),
                    "Fixture '{}' build error {:?} does not contain {expected:?}",
                    self.name,
                    e.to_string()
                ),
            }
            return;
        }

        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?} (matched case {:?})",
                self.name, result.case_name, result.expected, result.actual, result.matched_index
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: inline
description: two documents
table:
  cases:
    - when: { value: 1 }
      action: one
tests:
  - name: hit
    subject: 1
    expect: one
    matched_index: 0
  - name: miss
    subject: 2
---
name: broken
table:
  cases:
    - when: { value: 1.5 }
      options: { float_epsilon: -0.1 }
      action: never
build_error: float_epsilon
"#;

    #[test]
    fn parses_multiple_documents() {
        let fixtures = Fixture::from_yaml_multi(YAML).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].tests.len(), 2);
        assert!(fixtures[1].tests.is_empty());
    }

    #[test]
    fn runs_and_reports() {
        let fixtures = Fixture::from_yaml_multi(YAML).unwrap();
        let results = fixtures[0].run();
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(results[1].actual, None);
        fixtures[1].run_and_assert();
    }

    #[test]
    fn failing_case_is_reported() {
        let fixture = Fixture::from_yaml(
            r#"
name: wrong
table:
  cases:
    - when: { value: 1 }
      action: one
tests:
  - name: expects the wrong action
    subject: 1
    expect: two
"#,
        )
        .unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual.as_deref(), Some("one"));
    }
}
