//! Property tests for lenient parsing of model output.

use proptest::prelude::*;
use serde_json::Value;

use care_match_llm::{extract_json_block, lenient_confidence, parse_analysis_response};

proptest! {
    #[test]
    fn confidence_from_number_is_clamped(x in any::<f64>()) {
        // Non-finite numbers become Value::Null
        let c = lenient_confidence(Some(&Value::from(x)));
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn confidence_from_text_is_clamped(text in "\\PC*") {
        let c = lenient_confidence(Some(&Value::String(text)));
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn confidence_from_numeric_text_matches_number(x in -10.0f64..10.0) {
        let from_text = lenient_confidence(Some(&Value::String(format!(" {} ", x))));
        prop_assert_eq!(from_text, x.clamp(0.0, 1.0));
    }

    #[test]
    fn json_block_never_panics(text in "\\PC*") {
        if let Ok(block) = extract_json_block(&text) {
            prop_assert!(text.contains(block));
        }
        let _ = parse_analysis_response(&text);
    }

    #[test]
    fn json_block_ignores_surrounding_prose(
        before in "[^{}`]*",
        after in "[^{}`]*",
        risk in prop::sample::select(vec!["Low", "Medium", "High"]),
    ) {
        let body = format!(r#"{{"risk_level": "{}"}}"#, risk);
        let text = format!("{}{}{}", before, body, after);

        prop_assert_eq!(extract_json_block(&text).unwrap(), body.as_str());
        let raw = parse_analysis_response(&text).unwrap();
        prop_assert_eq!(raw.risk_level.as_deref(), Some(risk));
    }
}
