//! Registry of documented message-broker topics.

use serde::Serialize;

use super::table;

/// Documentation metadata of one topic handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDescriptor {
    /// Topic pattern, wildcards included (`devices/+/heartbeat`).
    pub topic: String,
    pub description: String,
    pub tag: String,
    /// Kind of handler bound to the topic. Informational only; never emitted.
    pub handler_kind: String,
    /// `true` for subscriptions, `false` for published topics.
    pub subscription: bool,
}

impl TopicDescriptor {
    #[must_use]
    pub fn subscribe(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            description: String::new(),
            tag: String::new(),
            handler_kind: String::new(),
            subscription: true,
        }
    }

    #[must_use]
    pub fn publish(topic: impl Into<String>) -> Self {
        Self {
            subscription: false,
            ..Self::subscribe(topic)
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn handler_kind(mut self, kind: impl Into<String>) -> Self {
        self.handler_kind = kind.into();
        self
    }
}

/// Ordered collection of [`TopicDescriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    topics: Vec<TopicDescriptor>,
}

/// Serialized form of a [`TopicRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicDocument {
    pub mqtt_topics: Vec<TopicEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicEntry {
    pub topic: String,
    pub description: String,
    pub tag: String,
    pub subscription: bool,
}

impl TopicDocument {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl TopicRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, topic: TopicDescriptor) -> &mut Self {
        self.topics.push(topic);
        self
    }

    #[must_use]
    pub fn topics(&self) -> &[TopicDescriptor] {
        &self.topics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Document listing every topic in registration order.
    #[must_use]
    pub fn generate_document(&self) -> TopicDocument {
        TopicDocument {
            mqtt_topics: self
                .topics
                .iter()
                .map(|t| TopicEntry {
                    topic: t.topic.clone(),
                    description: t.description.clone(),
                    tag: t.tag.clone(),
                    subscription: t.subscription,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.generate_document().to_json()
    }

    #[must_use]
    pub fn render_table(&self) -> String {
        const WIDTHS: [usize; 3] = [20, 40, 40];
        let mut out = table::header(&["Tag", "Topic", "Description"], &WIDTHS);
        for t in &self.topics {
            out.push_str(&table::row(&[&t.tag, &t.topic, &t.description], &WIDTHS));
        }
        out
    }
}
