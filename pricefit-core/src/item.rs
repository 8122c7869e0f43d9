//! Labeled test items and dataset loading.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LABEL_CHARS: usize = 40;

/// A labeled evaluation example: prompt text plus its true price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    pub prompt: String,
    #[serde(alias = "price")]
    pub truth: f64,
    #[serde(default)]
    pub title: Option<String>,
}

impl TestItem {
    pub fn new(prompt: impl Into<String>, truth: f64) -> Self {
        Self {
            prompt: prompt.into(),
            truth,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Short label for diagnostics: the title, or the first non-empty
    /// prompt line, cut to 40 characters.
    pub fn label(&self) -> String {
        let source = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.prompt
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
            })
            .unwrap_or("");
        source.chars().take(LABEL_CHARS).collect()
    }
}

/// Load test items from a `.jsonl`, `.json` or `.csv` file.
pub fn load_items(path: &Path) -> Result<Vec<TestItem>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let items = match ext.as_str() {
        "jsonl" => parse_jsonl(&std::fs::read_to_string(path)?)
            .map_err(|e| Error::dataset(format!("{}: {e}", path.display())))?,
        "json" => serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| Error::dataset(format!("{}: {e}", path.display())))?,
        "csv" => parse_csv(std::fs::File::open(path)?)?,
        other => {
            return Err(Error::dataset(format!(
                "{}: unsupported extension '{other}' (expected jsonl, json or csv)",
                path.display()
            )));
        }
    };

    log::info!("loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Parse one JSON object per line. Blank lines are skipped.
pub fn parse_jsonl(text: &str) -> std::result::Result<Vec<TestItem>, String> {
    let mut items = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: TestItem =
            serde_json::from_str(line).map_err(|e| format!("line {}: {e}", i + 1))?;
        items.push(item);
    }
    Ok(items)
}

/// Parse CSV with a header row naming `prompt`, `price` (or `truth`) and
/// optionally `title`.
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<Vec<TestItem>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut items = Vec::new();
    for row in rdr.deserialize() {
        let item: TestItem = row?;
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_title() {
        let item = TestItem::new("How much does this cost?\n\nA kettle", 20.0)
            .with_title("Stainless Electric Kettle");
        assert_eq!(item.label(), "Stainless Electric Kettle");
    }

    #[test]
    fn label_falls_back_to_first_prompt_line() {
        let item = TestItem::new("\n  How much does this cost?\nA kettle", 20.0);
        assert_eq!(item.label(), "How much does this cost?");
    }

    #[test]
    fn label_is_truncated() {
        let item = TestItem::new("x".repeat(100), 1.0);
        assert_eq!(item.label().chars().count(), 40);
    }

    #[test]
    fn jsonl_accepts_price_alias_and_skips_blank_lines() {
        let text = r#"{"prompt": "a", "price": 12.5}

{"prompt": "b", "truth": 3, "title": "B"}
"#;
        let items = parse_jsonl(text).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].truth, 12.5);
        assert_eq!(items[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn jsonl_error_names_line() {
        let text = "{\"prompt\": \"a\", \"price\": 1}\nnot json\n";
        let err = parse_jsonl(text).unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
    }

    #[test]
    fn csv_with_header() {
        let data = "prompt,price,title\n\"What is this worth?\",19.99,Mug\nsecond,5,\n";
        let items = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].truth, 19.99);
        assert_eq!(items[0].title.as_deref(), Some("Mug"));
        assert_eq!(items[1].prompt, "second");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.txt");
        std::fs::write(&path, "whatever").unwrap();
        let err = load_items(&path).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn load_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"prompt": "a", "price": 1.0}]"#).unwrap();
        let items = load_items(&path).unwrap();
        assert_eq!(items, vec![TestItem::new("a", 1.0)]);
    }
}
