use serde::{Deserialize, Serialize};

/// Settings for a [`BufferedProducer`](super::BufferedProducer).
///
/// Deserializable so it can sit inside an application's config file; missing
/// fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Label attached to every log record of this producer.
    pub name: String,
    /// Log a warning once a single context stages more events than this.
    /// Purely informational: sends are never refused.
    pub pending_warn_threshold: Option<usize>,
    /// Warn when a context created by the producer is dropped while still
    /// holding events.
    pub warn_on_discard: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            name: "buffered-producer".to_string(),
            pending_warn_threshold: None,
            warn_on_discard: true,
        }
    }
}

impl ProducerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_pending_warn_threshold(mut self, threshold: usize) -> Self {
        self.pending_warn_threshold = Some(threshold);
        self
    }

    pub fn with_warn_on_discard(mut self, warn: bool) -> Self {
        self.warn_on_discard = warn;
        self
    }
}
