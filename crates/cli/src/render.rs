//! Markdown rendering of a run report for the terminal

use std::fmt::Write;
use vidquest_core::{RunReport, SearchHit};

/// Render a completed run: summary, topics, questions, then hits per topic
pub fn render_markdown(report: &RunReport) -> String {
    let mut out = String::new();

    section(&mut out, "📌 Video Summary");
    if report.summary.is_empty() {
        out.push_str("_No summary_\n");
    } else {
        let _ = writeln!(out, "{}", report.summary);
    }

    section(&mut out, "🧭 Key Topics");
    bullet_list(&mut out, &report.topics, "_No topics extracted._");

    section(&mut out, "🤖 Suggested Questions");
    bullet_list(&mut out, &report.questions, "_No questions generated._");

    section(&mut out, "🔎 Web Results (by topic)");
    if report.search_results.is_empty() {
        out.push_str("_No search results._\n");
    }
    for pack in &report.search_results {
        let _ = writeln!(out, "\n### **{}**\n", pack.topic);
        if pack.results.is_empty() {
            out.push_str("_No hits._\n");
            continue;
        }
        for hit in &pack.results {
            out.push_str(&render_hit(hit));
        }
    }

    out
}

/// `- **[title](url)**` followed by the snippet on an indented line
pub fn render_hit(hit: &SearchHit) -> String {
    let title = hit.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled");
    let url = hit.url.as_deref().filter(|u| !u.is_empty()).unwrap_or("#");
    let snippet = hit.snippet.as_deref().unwrap_or("");
    format!("- **[{title}]({url})**  \n  {snippet}\n")
}

fn section(out: &mut String, heading: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "## {heading}\n");
}

fn bullet_list(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "{empty}");
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
