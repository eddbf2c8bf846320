//! Prompt templates for grounded generation
//!
//! Section prompts are data, not code: each category is a record of its
//! canonical retrieval query, template text, and refusal sentinel, so adding
//! a category or tightening the grounding rules never touches the
//! orchestration logic.

use crate::error::{Error, Result};

/// Refusal sentinel for section extraction
pub const NOT_STATED_SENTINEL: &str = "Not stated in the paper.";

/// Refusal sentinel for chat answers
pub const CHAT_REFUSAL_SENTINEL: &str = "Not found in the provided document.";

/// Placeholder substituted with the retrieved context
const CONTEXT_SLOT: &str = "{context}";

/// Prompt configuration for one section category
#[derive(Debug, Clone)]
pub struct SectionTemplate {
    /// Category key, used in the result mapping and the cache artifact
    pub category: String,
    /// Canonical retrieval query issued against the index
    pub retrieval_query: String,
    /// Template text with a `{context}` slot
    pub template: String,
    /// Sentinel the model must emit when the information is absent
    pub sentinel: String,
}

impl SectionTemplate {
    /// Validate the template at startup
    pub fn validate(&self) -> Result<()> {
        if !self.template.contains(CONTEXT_SLOT) {
            return Err(Error::Config(format!(
                "Section template '{}' is missing the {} slot",
                self.category, CONTEXT_SLOT
            )));
        }
        if !self.template.contains(&self.sentinel) {
            return Err(Error::Config(format!(
                "Section template '{}' does not state its refusal sentinel",
                self.category
            )));
        }
        Ok(())
    }

    /// Fill the template with retrieved context
    pub fn render(&self, context: &str) -> String {
        self.template.replace(CONTEXT_SLOT, context)
    }
}

/// Build a section template with the shared grounding preamble
///
/// Every category carries the same grounding contract: answer only from the
/// supplied context and emit the sentinel when the information is absent.
/// That rule is a correctness requirement against hallucination, not a
/// style choice.
fn section_template(category: &str, retrieval_query: &str, task: &str) -> SectionTemplate {
    let template = format!(
        r#"You are an AI research assistant.

You must answer ONLY using the provided context.
Do NOT use prior knowledge or external information.
If the requested information is not stated in the context, reply exactly: "{sentinel}"

Context:
{{context}}

Task:
{task}
"#,
        sentinel = NOT_STATED_SENTINEL,
        task = task,
    );

    SectionTemplate {
        category: category.to_string(),
        retrieval_query: retrieval_query.to_string(),
        template,
        sentinel: NOT_STATED_SENTINEL.to_string(),
    }
}

/// The configured section categories, in generation order
pub fn default_section_templates() -> Vec<SectionTemplate> {
    vec![
        section_template(
            "problem_statement",
            "This paper addresses the problem of",
            "Extract the main research problem addressed by the paper.",
        ),
        section_template(
            "motivation",
            "The motivation for this research is",
            "Explain the motivation of the paper.",
        ),
        section_template(
            "methodology",
            "The proposed method consists of",
            "Explain the methodology proposed in the paper.",
        ),
    ]
}

/// Build the single-shot chat prompt with the strict grounding contract
pub fn build_chat_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are an AI research assistant performing context-grounded question answering.

STRICT RULES (must be followed):
1. Use ONLY the information contained in the provided context.
2. Do NOT use prior knowledge or external information.
3. If the answer exists in the context, you MUST extract and summarize it.
4. ONLY reply "{sentinel}" if the information is completely absent.
5. Every claim in the answer MUST be supported by the provided context.
6. Include verbatim context excerpts that directly support the answer.

Answer guidelines:
- Answer the question fully using information from the context.
- 3-5 concise sentences.
- Prefer technical specificity over general summaries.

Required output format:

Answer:
<concise, context-grounded answer>

Supporting Context (verbatim):
<exact excerpts used>

Context:
{context}

Question:
{question}
"#,
        sentinel = CHAT_REFUSAL_SENTINEL,
        context = context,
        question = question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_validate() {
        let templates = default_section_templates();
        assert_eq!(templates.len(), 3);
        for template in &templates {
            template.validate().unwrap();
        }
    }

    #[test]
    fn test_category_order_is_fixed() {
        let categories: Vec<String> = default_section_templates()
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(categories, vec!["problem_statement", "motivation", "methodology"]);
    }

    #[test]
    fn test_every_template_carries_the_sentinel() {
        for template in default_section_templates() {
            assert!(
                template.template.contains(NOT_STATED_SENTINEL),
                "template '{}' lacks the refusal sentinel",
                template.category
            );
        }
    }

    #[test]
    fn test_render_substitutes_context() {
        let template = &default_section_templates()[0];
        let rendered = template.render("THE CONTEXT GOES HERE");
        assert!(rendered.contains("THE CONTEXT GOES HERE"));
        assert!(!rendered.contains("{context}"));
    }

    #[test]
    fn test_validate_rejects_missing_slot() {
        let broken = SectionTemplate {
            category: "broken".to_string(),
            retrieval_query: "q".to_string(),
            template: "no slot here".to_string(),
            sentinel: NOT_STATED_SENTINEL.to_string(),
        };
        assert!(matches!(broken.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_chat_prompt_contains_contract() {
        let prompt = build_chat_prompt("some context", "What is the method?");
        assert!(prompt.contains(CHAT_REFUSAL_SENTINEL));
        assert!(prompt.contains("verbatim"));
        assert!(prompt.contains("3-5 concise sentences"));
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("What is the method?"));
    }
}
