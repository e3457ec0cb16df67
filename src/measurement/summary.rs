//! Measurement summaries
//!
//! A summary is the named, timestamped, serialized output of one measurement.

use chrono::{DateTime, SecondsFormat, Utc};

/// Serialized result of a measurement
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    name: String,
    ext: String,
    time: DateTime<Utc>,
    content: String,
}

impl Summary {
    /// Create a new summary
    pub fn new(
        name: impl Into<String>,
        ext: impl Into<String>,
        time: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ext: ext.into(),
            time,
            content: content.into(),
        }
    }

    /// Measurement name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content format extension
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Time the summary describes
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Serialized content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// File name for persisting this summary, e.g.
    /// `NetworkProgrammingLatency_2024-01-02T03:04:05Z.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.name,
            self.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.ext
        )
    }
}
