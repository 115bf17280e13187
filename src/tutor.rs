//! Tutoring core: expertise levels, the transcript, prompt assembly and the
//! per-client session that ties them together.

mod assembler;
mod level;
mod session;
mod transcript;

#[cfg(test)]
mod proptests;

pub use assembler::PromptAssembler;
pub use level::Level;
pub use session::{Session, SessionSnapshot};
pub use transcript::{ConversationStore, Turn};
