//! Property-based tests for the Gemini translation layer
//!
//! - Every message is translated, in order, with exactly one part
//! - Roles map onto the provider's `user` / `model` vocabulary
//! - System text never leaks into `contents`

use super::gemini::GeminiService;
use super::types::{LlmMessage, LlmRequest, MessageRole, SystemContent};
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = LlmMessage> {
    (
        prop_oneof![Just(MessageRole::User), Just(MessageRole::Assistant)],
        "[a-zA-Z0-9 _.!?,]{1,80}",
    )
        .prop_map(|(role, text)| LlmMessage { role, text })
}

fn arb_request() -> impl Strategy<Value = LlmRequest> {
    (
        "[a-zA-Z .:]{1,60}",
        proptest::collection::vec(arb_message(), 1..12),
        proptest::option::of(0.0f32..1.0),
    )
        .prop_map(|(system, messages, temperature)| LlmRequest {
            system: vec![SystemContent::new(system)],
            messages,
            temperature,
            max_tokens: None,
        })
}

proptest! {
    #[test]
    fn translation_preserves_order_and_roles(request in arb_request()) {
        let wire = GeminiService::translate_request(&request);

        prop_assert_eq!(wire.contents.len(), request.messages.len());
        for (content, msg) in wire.contents.iter().zip(&request.messages) {
            let expected_role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            };
            prop_assert_eq!(content.role.as_deref(), Some(expected_role));
            prop_assert_eq!(content.parts.len(), 1);
            prop_assert_eq!(&content.parts[0].text, &msg.text);
        }
    }

    #[test]
    fn system_text_only_in_system_instruction(request in arb_request()) {
        let wire = GeminiService::translate_request(&request);
        let system = wire.system_instruction.expect("system instruction present");

        prop_assert!(system.role.is_none());
        prop_assert_eq!(&system.parts[0].text, &request.system[0].text);
        prop_assert_eq!(wire.generation_config.is_some(), request.temperature.is_some());
    }
}
