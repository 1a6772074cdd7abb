//! Normalization of the Space's heterogeneous return shapes.
//!
//! The hosted Space has changed its output shape over time: sometimes a
//! `(display_text, score)` pair, sometimes a bare number. Decoding is a pure
//! function over the unwrapped prediction value so it can be tested without
//! any transport in play.

use serde_json::Value;

use super::error::SpaceError;

/// Extracts the similarity score from an unwrapped prediction value.
///
/// Decode rules, in order:
/// - a sequence of length >= 2: the score is element 1 (element 0 is a
///   display label and is discarded);
/// - a bare number: the score itself;
/// - anything else: [`SpaceError::Protocol`] carrying the raw value.
///
/// Non-finite scores are rejected as protocol errors.
pub fn decode_similarity(value: &Value) -> Result<f64, SpaceError> {
    let score = match value {
        Value::Array(items) if items.len() >= 2 => items[1].as_f64(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match score {
        Some(s) if s.is_finite() => Ok(s),
        _ => Err(SpaceError::Protocol {
            detail: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_pair_takes_second_element() {
        let value = json!(["some label", 0.87]);
        assert_eq!(decode_similarity(&value).expect("should decode"), 0.87);
    }

    #[test]
    fn test_decode_longer_sequence_still_takes_index_one() {
        let value = json!(["label", 0.5, "extra"]);
        assert_eq!(decode_similarity(&value).expect("should decode"), 0.5);
    }

    #[test]
    fn test_decode_bare_number() {
        assert_eq!(decode_similarity(&json!(0.42)).expect("should decode"), 0.42);
        assert_eq!(decode_similarity(&json!(1)).expect("should decode"), 1.0);
    }

    #[test]
    fn test_decode_rejects_objects() {
        let value = json!({"unexpected": "shape"});
        let err = decode_similarity(&value).expect_err("should reject");
        match err {
            SpaceError::Protocol { detail } => assert!(detail.contains("unexpected")),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_short_sequences_and_strings() {
        assert!(decode_similarity(&json!(["only-label"])).is_err());
        assert!(decode_similarity(&json!("0.9")).is_err());
        assert!(decode_similarity(&json!(null)).is_err());
    }

    #[test]
    fn test_decode_rejects_non_numeric_score_slot() {
        let value = json!(["label", "not-a-number"]);
        assert!(decode_similarity(&value).is_err());
    }
}
