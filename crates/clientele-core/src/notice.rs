// Operator-facing outcome messages.

use serde::Serialize;
use strum::Display;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the operator: a title plus optional server text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, None)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, None)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, None)
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail: String = detail.into();
        Self::new(NoticeLevel::Error, title, Some(detail).filter(|d| !d.is_empty()))
    }

    /// Attach the subject of the message (usually the client).
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn new(level: NoticeLevel, title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level,
            title: title.into(),
            detail,
        }
    }

    /// Title and detail on one line.
    pub fn text(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {detail}", self.title),
            None => self.title.clone(),
        }
    }
}
