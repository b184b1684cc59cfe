pub mod cli;
pub mod exercises;
pub mod favourites;
pub mod session;

use serde_json::Value;

/// What a command has to say, rendered as text lines or as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub lines: Vec<String>,
    pub data: Value,
}

impl Report {
    pub fn new(data: Value) -> Self {
        Self {
            lines: Vec::new(),
            data,
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn render(&self, json: bool) -> String {
        if json {
            serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
        } else {
            self.lines.join("\n")
        }
    }
}
