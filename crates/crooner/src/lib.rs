//! Crooner: a chat-style music assistant for the terminal.
//!
//! The user types free text; the conversation goes to a completion API;
//! replies may carry an action directive that triggers a music search,
//! whose results render alongside the transcript.

pub mod action;
pub mod completion;
pub mod orchestrator;
pub mod render;
pub mod transcript;

pub use action::{Action, ACTION_MARKER};
pub use completion::{CompletionBackend, CompletionError, OpenAiClient};
pub use orchestrator::Orchestrator;
pub use render::{Sink, TerminalSink};
pub use transcript::{ChatMessage, Role, Transcript};
