pub mod prompt;

pub use prompt::{build_system_prompt, PromptSection};
