use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FieldMap;

pub const DEFAULT_CHANNEL: &str = "web_dashboard";
pub const DEFAULT_MODEL_VERSION: &str = "v4.0";

/// System-captured facts about one submission. The timestamp is supplied by the caller so
/// that resolution stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemContext {
    pub channel_type: String,
    pub application_source: String,
    pub device_type: String,
    pub model_version: String,
    pub captured_at: DateTime<FixedOffset>,
}

impl SystemContext {
    pub fn new(captured_at: DateTime<FixedOffset>) -> Self {
        SystemContext {
            channel_type: DEFAULT_CHANNEL.to_string(),
            application_source: DEFAULT_CHANNEL.to_string(),
            device_type: "desktop".to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            captured_at,
        }
    }

    pub fn with_device(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        self.application_source = channel.clone();
        self.channel_type = channel;
        self
    }

    pub fn time_of_day(&self) -> &'static str {
        time_of_day_bucket(self.captured_at.hour())
    }

    /// The `systemData` map consumed by the resolver.
    pub fn into_system_data(self) -> FieldMap {
        let time_of_day = self.time_of_day();
        let mut data = FieldMap::new();
        data.insert("model_version".into(), Value::String(self.model_version));
        data.insert("channel_type".into(), Value::String(self.channel_type));
        data.insert(
            "application_source".into(),
            Value::String(self.application_source),
        );
        data.insert("device_type".into(), Value::String(self.device_type));
        data.insert(
            "time_of_day_application".into(),
            Value::String(time_of_day.to_string()),
        );
        data
    }
}

/// Bucket a local hour (0..=23) into the submission-time category.
pub fn time_of_day_bucket(hour: u32) -> &'static str {
    match hour {
        9..=16 => "Business_Hours",
        17..=21 => "Evening",
        6..=8 => "Early_Morning",
        _ => "Late_Night",
    }
}
