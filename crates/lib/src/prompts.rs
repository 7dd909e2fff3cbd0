//! # Default Prompt Templates
//!
//! The prompt sent for every chunk of a generation session. It can be
//! replaced through `GenerationOptions::prompt_template` (the server exposes
//! it as `generation.prompt_template` in `config.yml`).

/// The default FAQ generation prompt.
///
/// Placeholders: `{disease}`, `{num_faqs}`, `{last_two_questions}`
pub const FAQ_GENERATION_PROMPT: &str = "You are an expert for {disease} patients. \
Provide exactly {num_faqs} FAQs in the 1st column, 2:answers, 3:source, and 4:keyword in a tabular format. \
Do not include the number before questions. \
Continue from these last questions given in the previous prompt: {last_two_questions}. \
Ensure the total number of FAQs provided is exactly {num_faqs}.";

/// Fills a generation prompt template.
///
/// The continuation questions are rendered as a bracketed, quoted list
/// (`["q1", "q2"]`), or `[]` when there are none.
pub fn render_faq_prompt(
    template: &str,
    disease: &str,
    num_faqs: usize,
    last_questions: &[String],
) -> String {
    template
        .replace("{disease}", disease)
        .replace("{num_faqs}", &num_faqs.to_string())
        .replace("{last_two_questions}", &format!("{last_questions:?}"))
}
