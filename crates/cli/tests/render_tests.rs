use pretty_assertions::assert_eq;
use vidquest::render::render_markdown;
use vidquest_core::{ResultPack, RunReport, SearchHit};

fn report() -> RunReport {
    RunReport {
        summary: "The video discusses X and Y.".to_string(),
        topics: vec!["X".to_string(), "Y".to_string()],
        search_results: vec![
            ResultPack {
                topic: "X".to_string(),
                results: vec![SearchHit {
                    title: Some("On X".to_string()),
                    url: Some("https://x.example".to_string()),
                    snippet: Some("All about X".to_string()),
                }],
            },
            ResultPack {
                topic: "Y".to_string(),
                results: vec![],
            },
        ],
        questions: vec!["Q1?".to_string(), "Q2?".to_string()],
    }
}

#[test]
fn test_full_report() {
    let expected = "\
## 📌 Video Summary

The video discusses X and Y.

## 🧭 Key Topics

- X
- Y

## 🤖 Suggested Questions

- Q1?
- Q2?

## 🔎 Web Results (by topic)


### **X**

- **[On X](https://x.example)**  
  All about X

### **Y**

_No hits._
";
    assert_eq!(render_markdown(&report()), expected);
}

#[test]
fn test_empty_sections_use_placeholders() {
    let report = RunReport {
        summary: String::new(),
        topics: vec![],
        search_results: vec![],
        questions: vec![],
    };

    let rendered = render_markdown(&report);
    assert!(rendered.contains("_No summary_"));
    assert!(rendered.contains("_No topics extracted._"));
    assert!(rendered.contains("_No questions generated._"));
    assert!(rendered.contains("_No search results._"));
}
