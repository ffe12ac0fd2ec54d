//! Typed records of a Qase JSONP report.
//!
//! Records are deserialized once per fetch and never mutated afterwards;
//! every view over them (filtering, selection, rendering) borrows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Invalid,
    Broken,
    Blocked,
    Muted,
}

impl TestStatus {
    pub const ALL: [TestStatus; 7] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Skipped,
        TestStatus::Invalid,
        TestStatus::Broken,
        TestStatus::Blocked,
        TestStatus::Muted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::Invalid => "invalid",
            TestStatus::Broken => "broken",
            TestStatus::Blocked => "blocked",
            TestStatus::Muted => "muted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one test, as listed in `report.jsonp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPreview {
    pub id: String,
    pub title: String,
    pub status: TestStatus,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunExecution {
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub cumulative_duration: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub broken: u64,
    #[serde(default)]
    pub blocked: u64,
    #[serde(default)]
    pub invalid: u64,
    #[serde(default)]
    pub muted: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostData {
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub machine: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub arch: String,
}

/// Contents of `report.jsonp`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Report {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub execution: RunExecution,
    #[serde(default)]
    pub stats: RunStats,
    pub results: Vec<TestPreview>,
    #[serde(default)]
    pub threads: Vec<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub host_data: Option<HostData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestExecution {
    /// Unix milliseconds.
    #[serde(default)]
    pub start_time: i64,
    /// Unix milliseconds.
    #[serde(default)]
    pub end_time: i64,
    pub status: TestStatus,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub stacktrace: Option<String>,
    #[serde(default)]
    pub thread: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestFields {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestAttachment {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepData {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepExecution {
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    pub status: TestStatus,
    #[serde(default)]
    pub duration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestStep {
    pub id: String,
    #[serde(default)]
    pub step_type: String,
    pub execution: StepExecution,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub data: StepData,
    #[serde(default)]
    pub attachments: Vec<TestAttachment>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

/// Full detail record of one test, from `results/{id}.jsonp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Test {
    pub id: String,
    pub title: String,
    pub execution: TestExecution,
    #[serde(default)]
    pub fields: TestFields,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
    #[serde(default)]
    pub attachments: Vec<TestAttachment>,
}

impl Test {
    pub fn step_count(&self) -> usize {
        fn count(steps: &[TestStep]) -> usize {
            steps.iter().map(|s| 1 + count(&s.steps)).sum()
        }
        count(&self.steps)
    }

    /// Test-level attachments followed by step attachments in tree order.
    pub fn all_attachments(&self) -> Vec<&TestAttachment> {
        fn collect<'a>(steps: &'a [TestStep], out: &mut Vec<&'a TestAttachment>) {
            for step in steps {
                out.extend(step.attachments.iter());
                collect(&step.steps, out);
            }
        }
        let mut out: Vec<&TestAttachment> = self.attachments.iter().collect();
        collect(&self.steps, &mut out);
        out
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
