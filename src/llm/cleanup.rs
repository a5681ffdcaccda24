//! Post-processing of model output

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub struct ResponseCleaner {
    preamble_regex: Regex,
    trailer_regex: Regex,
    bullet_regex: Regex,
    emphasis_regex: Regex,
    fence_regex: Regex,
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCleaner {
    pub fn new() -> Self {
        Self {
            preamble_regex: Regex::new(r"(?is)^.*?resume tailored.*?\n").expect("Invalid preamble regex"),
            trailer_regex: Regex::new(r"(?is)to further refine this resume.*$").expect("Invalid trailer regex"),
            bullet_regex: Regex::new(r"^(\*+|-+|•)\s*").expect("Invalid bullet regex"),
            emphasis_regex: Regex::new(r"(\*\*|__|\*)").expect("Invalid emphasis regex"),
            fence_regex: Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\n?\s*```\s*$").expect("Invalid fence regex"),
        }
    }

    /// Turn a generated resume into clean plain text: drop the model's
    /// preamble and closing advice, blank lines, bullet and emphasis markers.
    pub fn clean_resume(&self, text: &str) -> String {
        let text = self.preamble_regex.replace(text, "");
        let text = self.trailer_regex.replace(&text, "");

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let line = self.bullet_regex.replace(line, "");
                self.emphasis_regex.replace_all(&line, "").into_owned()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Unwrap a Markdown code fence (```json ... ```) around model output
    pub fn strip_code_fence<'a>(&self, text: &'a str) -> &'a str {
        match self.fence_regex.captures(text).and_then(|caps| caps.get(1)) {
            Some(inner) => inner.as_str().trim(),
            None => text.trim(),
        }
    }
}

/// Shorten text to at most `max_graphemes`, cutting at a word boundary
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let truncated = graphemes[..max_graphemes].concat();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}...", truncated[..cut].trim_end())
}
