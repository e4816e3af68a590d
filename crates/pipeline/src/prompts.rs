//! Prompt templates for the pipeline stages

pub const SUMMARIZE_VIDEO: &str = include_str!("../assets/prompts/summarize_video.txt");

pub const EXTRACT_TOPICS: &str = include_str!("../assets/prompts/extract_topics.txt");

pub const GENERATE_QUESTIONS: &str = include_str!("../assets/prompts/generate_questions.txt");

/// Fill `{key}` placeholders in a single pass over the template
///
/// Substituted values are copied verbatim and never rescanned, so braces in
/// model output or web snippets reach the prompt unchanged. Unknown
/// placeholders are left as they are.
pub fn format_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                result.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
