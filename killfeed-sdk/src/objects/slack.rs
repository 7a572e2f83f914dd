//! Slack incoming-webhook payload.
//!
//! Only the subset of Block Kit used for kill notifications is modelled:
//! attachments carrying a color bar and `section` blocks with markdown
//! text, field pairs and an image accessory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Hex color of the attachment bar, e.g. `#00cc00`.
    pub color: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Text>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    Mrkdwn { text: String },
}

impl Text {
    pub fn markdown(text: impl Into<String>) -> Self {
        Text::Mrkdwn { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_serialization() {
        let message = SlackMessage {
            attachments: vec![Attachment {
                color: "#cc0000".to_string(),
                blocks: vec![
                    Block::Section {
                        text: Text::markdown("*hello*"),
                        fields: vec![Text::markdown("a"), Text::markdown("b")],
                        accessory: Some(Accessory::Image {
                            image_url: "https://images.evetech.net/types/587/icon?size=128"
                                .to_string(),
                            alt_text: "Rifter".to_string(),
                        }),
                    },
                    Block::Section {
                        text: Text::markdown("value"),
                        fields: vec![],
                        accessory: None,
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "attachments": [{
                    "color": "#cc0000",
                    "blocks": [
                        {
                            "type": "section",
                            "text": {"type": "mrkdwn", "text": "*hello*"},
                            "fields": [
                                {"type": "mrkdwn", "text": "a"},
                                {"type": "mrkdwn", "text": "b"}
                            ],
                            "accessory": {
                                "type": "image",
                                "image_url": "https://images.evetech.net/types/587/icon?size=128",
                                "alt_text": "Rifter"
                            }
                        },
                        {
                            "type": "section",
                            "text": {"type": "mrkdwn", "text": "value"}
                        }
                    ]
                }]
            })
        );
    }
}
