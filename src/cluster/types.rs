//! Worker types shared by the cluster and API layers.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Config;

/// Label holding the worker app name.
pub const APP_LABEL: &str = "app";
/// Label holding the task number.
pub const TASK_LABEL: &str = "number";
/// Env var carrying the task number into the worker container.
pub const TASK_NUMBER_ENV: &str = "TASK_NUMBER";
/// Env var carrying the pod name into the worker container.
pub const WORKER_ID_ENV: &str = "WORKER_ID";

/// Caller-supplied task identifier.
///
/// Accepted from JSON as either a string or an integer and kept in its
/// textual form. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskNumber(String);

impl TaskNumber {
    /// Create a task number, returning `None` if it is blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Borrow the textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TaskNumberVisitor)
    }
}

struct TaskNumberVisitor;

impl<'de> Visitor<'de> for TaskNumberVisitor {
    type Value = TaskNumber;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a task number as a string or an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TaskNumber(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TaskNumber(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        TaskNumber::new(v).ok_or_else(|| E::custom("task_number must not be empty"))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        TaskNumber::new(v).ok_or_else(|| E::custom("task_number must not be empty"))
    }
}

/// Body of `POST /workers`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkerRequest {
    /// Task to start workers for.
    pub task_number: TaskNumber,
}

/// Response of `POST /workers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkerResponse {
    /// Name of the created Deployment.
    pub name: String,
}

/// Shape of every worker Deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTemplate {
    /// App label, container name and Deployment name prefix.
    pub app: String,
    /// Container image.
    pub image: String,
    /// Replica count.
    pub replicas: i32,
}

impl WorkerTemplate {
    /// Build the template from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            app: config.worker_app.clone(),
            image: config.worker_image.clone(),
            replicas: config.worker_replicas,
        }
    }

    /// Deployment name for a task, e.g. `k8s-worker-7`.
    pub fn deployment_name(&self, task: &TaskNumber) -> String {
        format!("{}-{}", self.app, task)
    }

    /// Selector and pod labels for a task.
    pub fn labels(&self, task: &TaskNumber) -> BTreeMap<String, String> {
        BTreeMap::from([
            (APP_LABEL.to_string(), self.app.clone()),
            (TASK_LABEL.to_string(), task.to_string()),
        ])
    }
}

impl Default for WorkerTemplate {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_number_accepts_string_and_integer() {
        let from_text: CreateWorkerRequest =
            serde_json::from_str(r#"{"task_number": "42"}"#).unwrap();
        let from_int: CreateWorkerRequest = serde_json::from_str(r#"{"task_number": 42}"#).unwrap();

        assert_eq!(from_text.task_number, from_int.task_number);
        assert_eq!(from_int.task_number.as_str(), "42");
    }

    #[test]
    fn task_number_rejects_blank() {
        let err = serde_json::from_str::<CreateWorkerRequest>(r#"{"task_number": "  "}"#)
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn task_number_rejects_missing_and_null() {
        let missing = serde_json::from_str::<CreateWorkerRequest>("{}").unwrap_err();
        assert!(missing.to_string().contains("missing field `task_number`"));

        let null = serde_json::from_str::<CreateWorkerRequest>(r#"{"task_number": null}"#)
            .unwrap_err();
        assert!(null.to_string().contains("invalid type: null"));

        let float = serde_json::from_str::<CreateWorkerRequest>(r#"{"task_number": 1.5}"#)
            .unwrap_err();
        assert!(float.to_string().contains("expected a task number"));
    }

    #[test]
    fn task_number_accepts_full_integer_range() {
        let max: CreateWorkerRequest =
            serde_json::from_str(r#"{"task_number": 18446744073709551615}"#).unwrap();
        assert_eq!(max.task_number.as_str(), "18446744073709551615");

        let negative: CreateWorkerRequest =
            serde_json::from_str(r#"{"task_number": -3}"#).unwrap();
        assert_eq!(negative.task_number.as_str(), "-3");
    }

    #[test]
    fn task_number_is_trimmed() {
        assert_eq!(TaskNumber::new(" 7 ").unwrap().as_str(), "7");
        assert!(TaskNumber::new("").is_none());
    }

    #[test]
    fn template_names_and_labels() {
        let template = WorkerTemplate::default();
        let task = TaskNumber::new("3").unwrap();

        assert_eq!(template.deployment_name(&task), "k8s-worker-3");

        let labels = template.labels(&task);
        assert_eq!(labels.get(APP_LABEL).map(String::as_str), Some("k8s-worker"));
        assert_eq!(labels.get(TASK_LABEL).map(String::as_str), Some("3"));
    }
}
