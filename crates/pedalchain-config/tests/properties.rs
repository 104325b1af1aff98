//! Property tests for parameter validation.

use pedalchain_config::{ParamError, validate};
use pedalchain_registry::{EffectFamily, EffectTypeDescriptor, NativeEffect, ParamSpec};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn unit_descriptor(min: f64, max: f64) -> EffectTypeDescriptor {
    EffectTypeDescriptor::new("unit", "Unit", "", EffectFamily::Native(NativeEffect::Gain))
        .param(ParamSpec::float("x", min, max, min))
}

fn one(value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("x".into(), value);
    map
}

#[test]
fn bounds_are_inclusive() {
    let descriptor = unit_descriptor(0.0, 1.0);
    for ok in [0.0, 1.0] {
        assert!(validate(&descriptor, &one(json!(ok))).is_ok(), "{ok}");
    }
    for bad in [-0.0001, 1.0001] {
        assert!(
            matches!(
                validate(&descriptor, &one(json!(bad))),
                Err(ParamError::OutOfRange { .. })
            ),
            "{bad}"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn in_range_values_accepted(
        min in -1000.0f64..1000.0,
        span in 0.0f64..1000.0,
        t in 0.0f64..=1.0,
    ) {
        let max = min + span;
        let value = (min + t * span).clamp(min, max);
        let validated = validate(&unit_descriptor(min, max), &one(json!(value))).unwrap();
        prop_assert_eq!(validated.number("x"), Some(value));
    }

    #[test]
    fn out_of_range_values_rejected(
        min in -1000.0f64..1000.0,
        span in 0.0f64..1000.0,
        gap in 0.001f64..1000.0,
        above in any::<bool>(),
    ) {
        let max = min + span;
        let value = if above { max + gap } else { min - gap };
        let result = validate(&unit_descriptor(min, max), &one(json!(value)));
        let rejected = matches!(result, Err(ParamError::OutOfRange { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn numeric_strings_match_numbers(value in -1000.0f64..1000.0) {
        let descriptor = unit_descriptor(-1000.0, 1000.0);
        let from_number = validate(&descriptor, &one(json!(value))).unwrap();
        let from_string = validate(&descriptor, &one(json!(value.to_string()))).unwrap();
        prop_assert_eq!(from_number, from_string);
    }

    #[test]
    fn unknown_key_always_wins(key in "[a-z_]{1,12}", value in -10.0f64..10.0) {
        prop_assume!(key != "x");
        let mut params = one(json!(5000.0));
        params.insert(key.clone(), json!(value));
        let err = validate(&unit_descriptor(0.0, 1.0), &params).unwrap_err();
        prop_assert_eq!(err, ParamError::UnknownParameter { name: key });
    }

    #[test]
    fn validation_is_deterministic(value in any::<f64>()) {
        let descriptor = unit_descriptor(-1.0, 1.0);
        let a = validate(&descriptor, &one(json!(value)));
        let b = validate(&descriptor, &one(json!(value)));
        prop_assert_eq!(a, b);
    }
}
