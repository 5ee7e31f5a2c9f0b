use serde::{Deserialize, Serialize};

/// Which rendered lines of an upstream reply are left out of `Records`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordLineFilter {
    /// Drop lines starting with `;`.
    Comments,
    /// Drop empty lines.
    Blank,
    /// Drop both comment and empty lines.
    #[default]
    CommentsAndBlank,
}

impl RecordLineFilter {
    pub fn keeps(&self, line: &str) -> bool {
        let is_comment = line.starts_with(';');
        let is_blank = line.trim().is_empty();

        match self {
            Self::Comments => !is_comment,
            Self::Blank => !is_blank,
            Self::CommentsAndBlank => !is_comment && !is_blank,
        }
    }

    pub fn apply(&self, rendered: &str) -> Vec<String> {
        rendered
            .lines()
            .filter(|line| self.keeps(line))
            .map(str::to_string)
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Blank => "blank",
            Self::CommentsAndBlank => "comments_and_blank",
        }
    }
}
