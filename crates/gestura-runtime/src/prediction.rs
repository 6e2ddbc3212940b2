//! Prediction message - the per-frame result as sent to a remote display
//!
//! Shape: `{"type": "prediction", "action": "iloveyou" | null,
//! "confidence": 0.9, "hands_detected": true}`. `action` carries the
//! compact action key, not the display text. Display text is still accepted
//! when decoding. No transport is provided; this only fixes the serialized
//! form.

use gestura_core::{GesturaResult, GestureLabel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Prediction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, with = "action_key")]
    pub action: Option<GestureLabel>,
    pub confidence: f32,
    pub hands_detected: bool,
}

impl Prediction {
    pub fn new(action: Option<GestureLabel>, confidence: f32, hands_detected: bool) -> Self {
        Self {
            kind: MessageType::Prediction,
            action,
            confidence,
            hands_detected,
        }
    }

    pub fn to_json(&self) -> GesturaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> GesturaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Optional labels as action keys ("iloveyou")
mod action_key {
    use gestura_core::GestureLabel;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<GestureLabel>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(label) => serializer.serialize_some(label.action_key()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<GestureLabel>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|key| key.parse().map_err(de::Error::custom))
            .transpose()
    }
}
