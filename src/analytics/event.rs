//! Analytics event record.

use serde::{Deserialize, Serialize};

// == Analytics Event ==
/// A single user-interaction record waiting to be shipped to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub category: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_interaction: Option<bool>,
}

impl AnalyticsEvent {
    /// Creates an event with only the required classification.
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            label: None,
            value: None,
            non_interaction: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Marks the event as not caused by a direct user interaction.
    pub fn non_interaction(mut self) -> Self {
        self.non_interaction = Some(true);
        self
    }

    /// Returns an error message if a required field is blank.
    pub fn validate(&self) -> Option<String> {
        if self.category.trim().is_empty() {
            return Some("Event category cannot be empty".to_string());
        }
        if self.action.trim().is_empty() {
            return Some("Event action cannot be empty".to_string());
        }
        None
    }
}
