//! Best-effort extraction of lists from free-form model output
//!
//! Both parsers try JSON first and fall back to one entry per physical line.
//! Parse failures are never errors; they only degrade output quality.

use serde_json::Value;

/// Maximum number of topics kept from a model response
pub const MAX_TOPICS: usize = 6;

/// Longest line accepted as a topic by the line fallback
pub const MAX_TOPIC_CHARS: usize = 80;

/// Maximum number of questions kept from a model response
pub const MAX_QUESTIONS: usize = 12;

/// Strip bullet markers and whitespace from both ends of a line
pub fn strip_bullets(line: &str) -> &str {
    line.trim_matches(|c: char| matches!(c, '-' | '•' | '*') || c.is_whitespace())
}

/// Strip markdown code fences from a model response.
pub fn strip_markdown_fences(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        // Find the end of the opening fence (```json or ```)
        let after_fence = if let Some(newline_pos) = trimmed.find('\n') {
            &trimmed[newline_pos + 1..]
        } else {
            trimmed
                .strip_prefix("```json")
                .or_else(|| trimmed.strip_prefix("```"))
                .unwrap_or(trimmed)
        };

        if let Some(close_pos) = after_fence.rfind("```") {
            after_fence[..close_pos].trim()
        } else {
            after_fence.trim()
        }
    } else {
        trimmed
    }
}

/// Extract topics from a model response.
///
/// Accepts `{"topics": [...]}`, a bare JSON array (optionally inside a code
/// fence), or a bulleted list. The line fallback drops lines longer than
/// [`MAX_TOPIC_CHARS`] unless that would leave nothing. The result is always
/// de-duplicated and holds at most [`MAX_TOPICS`] entries.
pub fn parse_topics(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let candidates = match topics_from_json(text)
        .or_else(|| topics_from_json(strip_markdown_fences(text)))
    {
        Some(topics) => topics,
        None => {
            let lines: Vec<String> = non_empty_lines(text);
            let short: Vec<String> = lines
                .iter()
                .filter(|l| l.chars().count() <= MAX_TOPIC_CHARS)
                .cloned()
                .collect();
            if short.is_empty() {
                lines
            } else {
                short
            }
        }
    };

    let mut topics: Vec<String> = Vec::with_capacity(MAX_TOPICS);
    for topic in candidates {
        if topics.len() == MAX_TOPICS {
            break;
        }
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    topics
}

/// Extract questions from a model response.
///
/// A JSON array yields its elements in order; any other valid JSON yields
/// nothing. Invalid JSON falls back to one question per non-empty line, so a
/// truncated array on one line stays a single entry with its brackets.
pub fn parse_questions(text: &str) -> Vec<String> {
    let questions: Vec<String> = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .iter()
            .map(value_as_text)
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => non_empty_lines(text),
    };

    questions.into_iter().take(MAX_QUESTIONS).collect()
}

fn topics_from_json(text: &str) -> Option<Vec<String>> {
    let items = match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(mut map) => match map.remove("topics") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter(Value::is_string)
                .collect::<Vec<_>>(),
            _ => return None,
        },
        Value::Array(items) => items,
        _ => return None,
    };

    Some(
        items
            .iter()
            .map(value_as_text)
            .map(|t| strip_bullets(&t).to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    )
}

/// Array elements are stringified as written; only strings lose their quotes
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullets)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_bullets() {
        assert_eq!(strip_bullets("- Topic"), "Topic");
        assert_eq!(strip_bullets("  • Topic  "), "Topic");
        assert_eq!(strip_bullets("* Topic *"), "Topic");
        assert_eq!(strip_bullets("Self-hosting"), "Self-hosting");
        assert_eq!(strip_bullets("---"), "");
    }

    #[test]
    fn test_strip_markdown_fences() {
        assert_eq!(strip_markdown_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_markdown_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_markdown_fences("plain"), "plain");
    }

    #[test]
    fn test_topics_from_bullets() {
        assert_eq!(parse_topics("- X\n- Y"), strings(&["X", "Y"]));
        assert_eq!(
            parse_topics("• Climate policy\n\n• Carbon markets\r\n* Adaptation"),
            strings(&["Climate policy", "Carbon markets", "Adaptation"])
        );
    }

    #[test]
    fn test_topics_empty_response() {
        assert!(parse_topics("").is_empty());
        assert!(parse_topics("  \n \n").is_empty());
    }

    #[test]
    fn test_topics_from_json_object() {
        let text = r#"{"topics": ["Energy", " Grid storage ", "", 7]}"#;
        assert_eq!(parse_topics(text), strings(&["Energy", "Grid storage"]));
    }

    #[test]
    fn test_topics_from_json_array_in_fence() {
        let text = "```json\n[\"Energy\", \"Grid storage\"]\n```";
        assert_eq!(parse_topics(text), strings(&["Energy", "Grid storage"]));
    }

    #[test]
    fn test_topics_object_without_topics_key_uses_lines() {
        let text = r#"{"items": ["a"]}"#;
        assert_eq!(parse_topics(text), strings(&[r#"{"items": ["a"]}"#]));
    }

    #[test]
    fn test_topics_deduplicated_and_capped() {
        let text = "- A\n- B\n- A\n- C\n- D\n- E\n- F\n- G";
        assert_eq!(parse_topics(text), strings(&["A", "B", "C", "D", "E", "F"]));
    }

    #[test]
    fn test_topics_long_lines_filtered() {
        let long = "x".repeat(MAX_TOPIC_CHARS + 1);
        let text = format!("- Short topic\n- {long}\n- Another");
        assert_eq!(parse_topics(&text), strings(&["Short topic", "Another"]));
    }

    #[test]
    fn test_topics_only_long_lines_kept_as_fallback() {
        let long = "y".repeat(MAX_TOPIC_CHARS + 10);
        let text = format!("- {long}");
        assert_eq!(parse_topics(&text), vec![long]);
    }

    #[test]
    fn test_topics_never_exceed_cap_or_contain_bullets() {
        let inputs = [
            "- a\n- b\n- c\n- d\n- e\n- f\n- g\n- h",
            r#"["- a", "b", "c", "d", "e", "f", "g"]"#,
            "•••\n---\n***",
            "one line without bullets",
        ];
        for input in inputs {
            let topics = parse_topics(input);
            assert!(topics.len() <= MAX_TOPICS, "too many topics for {input:?}");
            for topic in &topics {
                assert!(!topic.is_empty());
                assert!(!topic.starts_with(['-', '•', '*', ' ']));
            }
        }
    }

    #[test]
    fn test_questions_valid_json_array() {
        assert_eq!(
            parse_questions(r#"["Q1?","Q2?"]"#),
            strings(&["Q1?", "Q2?"])
        );
    }

    #[test]
    fn test_questions_json_array_truncated() {
        let items: Vec<String> = (1..=15).map(|i| format!("Question {i}?")).collect();
        let text = serde_json::to_string(&items).unwrap();
        let parsed = parse_questions(&text);
        assert_eq!(parsed.len(), MAX_QUESTIONS);
        assert_eq!(parsed, items[..MAX_QUESTIONS].to_vec());
    }

    #[test]
    fn test_questions_malformed_json_single_line() {
        assert_eq!(parse_questions("[Q1?, Q2?"), strings(&["[Q1?, Q2?"]));
    }

    #[test]
    fn test_questions_line_fallback_strips_markers() {
        let text = "Here are some questions:\n* What drives X?\n- How does Y scale?\n\n";
        assert_eq!(
            parse_questions(text),
            strings(&["Here are some questions:", "What drives X?", "How does Y scale?"])
        );
    }

    #[test]
    fn test_questions_non_array_json_is_empty() {
        assert!(parse_questions(r#"{"questions": ["Q?"]}"#).is_empty());
        assert!(parse_questions("42").is_empty());
    }

    #[test]
    fn test_questions_blank_entries_dropped() {
        assert_eq!(
            parse_questions(r#"["  ", "Why?", 3]"#),
            strings(&["Why?", "3"])
        );
    }

    #[test]
    fn test_array_elements_of_any_type_are_stringified() {
        assert_eq!(
            parse_questions(r#"["Why?", null, true, {"q": 1}]"#),
            strings(&["Why?", "null", "true", r#"{"q":1}"#])
        );
        assert_eq!(parse_topics(r#"["X", null]"#), strings(&["X", "null"]));
    }
}
