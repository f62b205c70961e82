//! AI-generated payloads.
//!
//! The analysis and brief documents are large nested structures owned by the
//! AI services. The dashboard stores them and hands them to the presentation
//! layer without interpreting their internals, so they are kept as opaque
//! JSON with only an existence check.

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! opaque_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Value);

        impl $name {
            /// Wraps a payload, returning `None` unless it is a non-empty JSON object.
            #[must_use]
            pub fn from_value(value: Value) -> Option<Self> {
                match &value {
                    Value::Object(map) if !map.is_empty() => Some(Self(value)),
                    _ => None,
                }
            }

            /// Top-level field lookup for presentation code.
            #[must_use]
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

            #[must_use]
            pub fn as_value(&self) -> &Value {
                &self.0
            }
        }
    };
}

opaque_payload!(
    /// Pattern analysis for one item: pattern scores, monetization
    /// opportunities, insights and suggested adaptations.
    AnalysisResult
);

opaque_payload!(
    /// Content brief for one item: hooks, angles, outline and calls to action.
    ContentBrief
);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_non_empty_object() {
        let analysis = AnalysisResult::from_value(json!({
            "content_id": "1",
            "key_insights": ["hooks early"]
        }))
        .unwrap();
        assert_eq!(analysis.get("content_id"), Some(&json!("1")));
    }

    #[test]
    fn rejects_empty_or_non_object_payloads() {
        assert!(ContentBrief::from_value(json!({})).is_none());
        assert!(ContentBrief::from_value(json!(null)).is_none());
        assert!(ContentBrief::from_value(json!(["hook"])).is_none());
    }
}
