//! LUIS recognition response types.
//!
//! Wire-faithful mapping of the JSON document the service returns for a
//! prediction or dialog turn. Only the top scoring intent and the entity
//! list are interpreted by the facade; everything else is carried verbatim
//! so the whole document can be fed back into a `reply` continuation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recognition result for one utterance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LuisResponse {
    /// The utterance as echoed back by the service.
    #[serde(default)]
    pub query: Option<String>,

    /// The highest-confidence intent, e.g. `"None"` when nothing matched.
    #[serde(rename = "topScoringIntent", default)]
    pub top_scoring_intent: Option<TopScoringIntent>,

    /// Full ranked intent list. Populated only when the app was queried
    /// with the verbose flag set.
    #[serde(default)]
    pub intents: Vec<IntentScore>,

    /// Recognized entities, in the order returned by the service.
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Multi-turn dialog state; the transport reads `context_id` from here
    /// when continuing a conversation.
    #[serde(default)]
    pub dialog: Option<DialogState>,

    /// Fields this facade does not interpret, preserved for passthrough.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LuisResponse {
    /// First entity whose type exactly matches `entity_type`, in stored
    /// order. Later entities of the same type are ignored.
    pub fn first_entity(&self, entity_type: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_type == entity_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopScoringIntent {
    pub intent: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A recognized named span within the utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// The raw recognized span, exactly as it appeared in the utterance.
    pub entity: String,

    /// Entity type, e.g. `"City"` or `"builtin.datetimeV2.date"`.
    #[serde(rename = "type")]
    pub entity_type: String,

    #[serde(rename = "startIndex", default)]
    pub start_index: Option<usize>,

    #[serde(rename = "endIndex", default)]
    pub end_index: Option<usize>,

    #[serde(default)]
    pub score: Option<f64>,

    /// Canonical/normalized resolution, when the service provides one
    /// (e.g. resolving "tomorrow" to an ISO date).
    #[serde(default)]
    pub resolution: Option<EntityResolution>,
}

impl Entity {
    /// The entity's value under the canonical-first policy: the first
    /// resolution value when present and non-empty, the raw span otherwise.
    pub fn value(&self) -> &str {
        match self
            .resolution
            .as_ref()
            .and_then(|r| r.values.as_ref())
            .and_then(|values| values.first())
        {
            Some(canonical) => canonical,
            None => &self.entity,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityResolution {
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

/// Dialog continuation state for multi-turn conversations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogState {
    #[serde(rename = "contextId", default)]
    pub context_id: Option<String>,

    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(rename = "parameterName", default)]
    pub parameter_name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "query": "book a flight to paris tomorrow",
        "topScoringIntent": { "intent": "BookFlight", "score": 0.9713 },
        "intents": [
            { "intent": "BookFlight", "score": 0.9713 },
            { "intent": "None", "score": 0.0182 }
        ],
        "entities": [
            {
                "entity": "paris",
                "type": "City",
                "startIndex": 17,
                "endIndex": 21,
                "score": 0.8914,
                "resolution": { "values": ["Paris, France"] }
            },
            {
                "entity": "tomorrow",
                "type": "builtin.datetimeV2.date",
                "startIndex": 23,
                "endIndex": 30
            }
        ],
        "dialog": {
            "contextId": "1dc1f576-aab2-4a14-9b8c-5cfb4a6f4dd1",
            "status": "Finished"
        },
        "sentimentAnalysis": { "label": "neutral", "score": 0.5 }
    }"#;

    #[test]
    fn test_deserialize_full_document() {
        let response: LuisResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("sample document must parse");

        assert_eq!(
            response.query.as_deref(),
            Some("book a flight to paris tomorrow")
        );

        let top = response.top_scoring_intent.as_ref().expect("top intent");
        assert_eq!(top.intent, "BookFlight");
        assert!((top.score.expect("score") - 0.9713).abs() < 1e-9);

        // Verbose mode: full ranked list alongside the top intent.
        assert_eq!(response.intents.len(), 2);
        assert_eq!(response.intents[1].intent, "None");

        assert_eq!(response.entities.len(), 2);
        let city = &response.entities[0];
        assert_eq!(city.entity, "paris");
        assert_eq!(city.entity_type, "City");
        assert_eq!(city.start_index, Some(17));
        assert_eq!(city.end_index, Some(21));

        let dialog = response.dialog.as_ref().expect("dialog state");
        assert_eq!(
            dialog.context_id.as_deref(),
            Some("1dc1f576-aab2-4a14-9b8c-5cfb4a6f4dd1")
        );

        // Uninterpreted fields survive as passthrough.
        assert!(response.extra.contains_key("sentimentAnalysis"));
    }

    #[test]
    fn test_minimal_document() {
        let response: LuisResponse =
            serde_json::from_str(r#"{ "topScoringIntent": { "intent": "None" } }"#)
                .expect("minimal document must parse");

        assert_eq!(response.top_scoring_intent.expect("top intent").intent, "None");
        assert!(response.query.is_none());
        assert!(response.intents.is_empty());
        assert!(response.entities.is_empty());
        assert!(response.dialog.is_none());
    }

    #[test]
    fn test_entity_value_prefers_canonical_resolution() {
        let response: LuisResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("sample document must parse");
        assert_eq!(response.entities[0].value(), "Paris, France");
    }

    #[test]
    fn test_entity_value_falls_back_to_raw_span() {
        let response: LuisResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("sample document must parse");
        // No resolution at all.
        assert_eq!(response.entities[1].value(), "tomorrow");

        // Resolution present but with an empty value list counts as absent.
        let entity = Entity {
            entity: "tomorrow".to_string(),
            entity_type: "builtin.datetimeV2.date".to_string(),
            start_index: None,
            end_index: None,
            score: None,
            resolution: Some(EntityResolution {
                values: Some(vec![]),
            }),
        };
        assert_eq!(entity.value(), "tomorrow");
    }

    #[test]
    fn test_first_entity_scans_in_stored_order() {
        let response: LuisResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("sample document must parse");

        let date = response
            .first_entity("builtin.datetimeV2.date")
            .expect("date entity");
        assert_eq!(date.entity, "tomorrow");

        assert!(response.first_entity("Airline").is_none());
    }
}
