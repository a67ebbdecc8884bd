//! Wire stability of the declarative value types.

use serde_test::{assert_tokens, Token};
use virtual_input::prelude::*;

#[test]
fn button_state_serializes_as_a_unit_variant() {
    assert_tokens(
        &ButtonState::Down,
        &[Token::UnitVariant {
            name: "ButtonState",
            variant: "Down",
        }],
    );
    assert_tokens(
        &ButtonState::None,
        &[Token::UnitVariant {
            name: "ButtonState",
            variant: "None",
        }],
    );
}

#[test]
fn cutoff_kind_serializes_as_a_unit_variant() {
    assert_tokens(
        &CutoffKind::Scaled,
        &[Token::UnitVariant {
            name: "CutoffKind",
            variant: "Scaled",
        }],
    );
}

#[test]
fn merge_policy_serializes_as_a_unit_variant() {
    assert_tokens(
        &MergePolicy::Largest,
        &[Token::UnitVariant {
            name: "MergePolicy",
            variant: "Largest",
        }],
    );
}

#[test]
fn axle_value_consideration_serializes_as_a_unit_variant() {
    assert_tokens(
        &AxleValueConsideration::Absolute,
        &[Token::UnitVariant {
            name: "AxleValueConsideration",
            variant: "Absolute",
        }],
    );
}

#[test]
fn profile_bindings_serialize_with_named_fields() {
    assert_tokens(
        &ProfileBinding::Button { button: 3 },
        &[
            Token::StructVariant {
                name: "ProfileBinding",
                variant: "Button",
                len: 1,
            },
            Token::Str("button"),
            Token::U64(3),
            Token::StructVariantEnd,
        ],
    );

    assert_tokens(
        &ProfileBinding::AxleButton {
            axis: 2,
            consideration: AxleValueConsideration::Positive,
            deadzone: 0.5,
        },
        &[
            Token::StructVariant {
                name: "ProfileBinding",
                variant: "AxleButton",
                len: 3,
            },
            Token::Str("axis"),
            Token::U64(2),
            Token::Str("consideration"),
            Token::UnitVariant {
                name: "AxleValueConsideration",
                variant: "Positive",
            },
            Token::Str("deadzone"),
            Token::F32(0.5),
            Token::StructVariantEnd,
        ],
    );
}

#[test]
fn controller_inputs_serialize_by_variant_name() {
    assert_tokens(
        &ControllerInput::LeftStickX,
        &[Token::UnitVariant {
            name: "ControllerInput",
            variant: "LeftStickX",
        }],
    );
}
