//! Generation orchestration: grounded prompts, section extraction, chat

mod cache;
mod chat;
pub mod prompt;
mod sections;

pub use cache::{CachedSections, SectionCache, SECTIONS_SCHEMA_VERSION};
pub use chat::ChatAnswerer;
pub use prompt::{
    build_chat_prompt, default_section_templates, SectionTemplate, CHAT_REFUSAL_SENTINEL,
    NOT_STATED_SENTINEL,
};
pub use sections::{build_context, SectionGenerator};
