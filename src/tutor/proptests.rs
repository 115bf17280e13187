//! Property-based tests for the tutoring core
//!
//! Drives a session through arbitrary interleavings of questions, model
//! outcomes, level changes and resets, checking after every step that:
//! - the transcript alternates user/assistant starting with user
//! - each request carries `len(transcript) + 2` entries
//! - failures and level changes never rewrite stored turns
//! - reset empties the transcript and keeps the level

use super::*;
use crate::llm::{LlmRequest, MessageRole};
use crate::state_machine::{Effect, Event};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Ask { text: String, reply: Option<String> },
    SelectLevel(Level),
    Reset,
}

fn arb_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Beginner),
        Just(Level::Intermediate),
        Just(Level::Expert),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => ("[a-zA-Z?]{1,30}", proptest::option::weighted(0.8, "[a-zA-Z.]{1,30}"))
            .prop_map(|(text, reply)| Op::Ask { text, reply }),
        2 => arb_level().prop_map(Op::SelectLevel),
        1 => Just(Op::Reset),
    ]
}

/// One full interaction: assemble, then fold the outcome back
fn interact(
    assembler: &PromptAssembler,
    session: &mut Session,
    text: &str,
    reply: Option<&str>,
) -> LlmRequest {
    let effects = session
        .handle(Event::UserMessage {
            text: text.to_string(),
        })
        .unwrap();
    let Some(Effect::RequestLlm { utterance }) = effects.into_iter().next() else {
        panic!("expected a model request");
    };
    let request = assembler.assemble(session.level(), session.transcript(), &utterance);

    let outcome = match reply {
        Some(reply) => Event::LlmReply {
            text: reply.to_string(),
        },
        None => Event::LlmFailed {
            message: "provider down".to_string(),
        },
    };
    session.handle(outcome).unwrap();
    request
}

fn assert_alternating(transcript: &[Turn]) -> Result<(), TestCaseError> {
    for (i, turn) in transcript.iter().enumerate() {
        let expected = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        prop_assert_eq!(turn.role(), expected);
    }
    Ok(())
}

proptest! {
    #[test]
    fn transcript_invariants_hold(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let assembler = PromptAssembler::default();
        let mut session = Session::new("prop", Level::Beginner);

        for op in ops {
            let before: Vec<Turn> = session.transcript().to_vec();
            match op {
                Op::Ask { text, reply } => {
                    let request = interact(&assembler, &mut session, &text, reply.as_deref());

                    prop_assert_eq!(
                        request.system.len() + request.messages.len(),
                        before.len() + 2
                    );
                    prop_assert_eq!(request.system_text(), assembler.instruction(session.level()));

                    match reply {
                        Some(reply) => {
                            prop_assert_eq!(session.transcript().len(), before.len() + 2);
                            prop_assert_eq!(&session.transcript()[..before.len()], &before[..]);
                            prop_assert_eq!(&session.transcript()[before.len()], &Turn::user(text));
                            prop_assert_eq!(
                                &session.transcript()[before.len() + 1],
                                &Turn::assistant(reply)
                            );
                        }
                        None => {
                            prop_assert_eq!(session.transcript(), &before[..]);
                        }
                    }
                }
                Op::SelectLevel(level) => {
                    session.handle(Event::SelectLevel { level }).unwrap();
                    prop_assert_eq!(session.level(), level);
                    prop_assert_eq!(session.transcript(), &before[..]);
                }
                Op::Reset => {
                    let level = session.level();
                    session.handle(Event::Reset).unwrap();
                    prop_assert!(session.transcript().is_empty());
                    prop_assert_eq!(session.level(), level);
                }
            }
            assert_alternating(session.transcript())?;
        }
    }

    #[test]
    fn n_successes_give_2n_turns(questions in proptest::collection::vec("[a-z]{1,10}", 0..20)) {
        let assembler = PromptAssembler::default();
        let mut session = Session::new("prop", Level::Expert);

        for q in &questions {
            interact(&assembler, &mut session, q, Some("answer"));
        }

        prop_assert_eq!(session.transcript().len(), 2 * questions.len());
        assert_alternating(session.transcript())?;
    }

    #[test]
    fn level_change_only_alters_later_instruction(
        first in arb_level(),
        second in arb_level(),
    ) {
        let assembler = PromptAssembler::default();
        let mut session = Session::new("prop", first);

        let early = interact(&assembler, &mut session, "What is a p-value?", Some("A p-value is..."));
        let stored: Vec<Turn> = session.transcript().to_vec();

        session.handle(Event::SelectLevel { level: second }).unwrap();
        let late = interact(&assembler, &mut session, "And a confidence interval?", Some("A range..."));

        prop_assert_eq!(early.system_text(), assembler.instruction(first));
        prop_assert_eq!(late.system_text(), assembler.instruction(second));
        prop_assert_eq!(&session.transcript()[..2], &stored[..]);
        prop_assert_eq!(late.messages.len(), 3);
        prop_assert_eq!(late.messages[0].clone(), stored[0].to_message());
        prop_assert_eq!(late.messages[1].clone(), stored[1].to_message());
    }
}
