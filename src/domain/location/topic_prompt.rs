//! Prompt construction for topic lookup

const INSTRUCTION_HEADER: &str =
    "Listen to this audio carefully and find the exact moment when the following topic is spoken or discussed:";

const INSTRUCTION_FOOTER: &str = r#"Return ONLY the timestamp in HH:MM:SS format (e.g., "00:05:47") when this topic first appears.
If not found, return "00:00:00"."#;

/// Instruction text sent to the model alongside the uploaded audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPrompt {
    content: String,
}

impl TopicPrompt {
    /// Build the lookup prompt for a topic
    pub fn for_topic(topic: &str) -> Self {
        Self {
            content: format!(
                "{}\n\nTopic: \"{}\"\n\n{}",
                INSTRUCTION_HEADER, topic, INSTRUCTION_FOOTER
            ),
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the prompt content
    pub fn into_content(self) -> String {
        self.content
    }
}
