use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task category (closed set from the enrollment onboarding domain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Enrollment,
    Organizational,
    Exams,
    Finance,
    Housing,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrollment => "enrollment",
            Self::Organizational => "organizational",
            Self::Exams => "exams",
            Self::Finance => "finance",
            Self::Housing => "housing",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Enrollment,
            Self::Organizational,
            Self::Exams,
            Self::Finance,
            Self::Housing,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enrollment" => Ok(Self::Enrollment),
            "organizational" => Ok(Self::Organizational),
            "exams" => Ok(Self::Exams),
            "finance" => Ok(Self::Finance),
            "housing" => Ok(Self::Housing),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Feedback urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown urgency: {}", other)),
        }
    }
}

/// What kind of feedback a submission is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Suggestion,
    Bug,
    Question,
    Praise,
    Criticism,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Bug => "bug",
            Self::Question => "question",
            Self::Praise => "praise",
            Self::Criticism => "criticism",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suggestion" => Ok(Self::Suggestion),
            "bug" => Ok(Self::Bug),
            "question" => Ok(Self::Question),
            "praise" => Ok(Self::Praise),
            "criticism" => Ok(Self::Criticism),
            other => Err(format!("unknown feedback kind: {}", other)),
        }
    }
}

/// Interface language for a feedback submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    DE,
    FR,
    EN,
    ES,
    IT,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DE => "Deutsch",
            Self::FR => "Français",
            Self::EN => "English",
            Self::ES => "Español",
            Self::IT => "Italiano",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::DE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DE" => Ok(Self::DE),
            "FR" => Ok(Self::FR),
            "EN" => Ok(Self::EN),
            "ES" => Ok(Self::ES),
            "IT" => Ok(Self::IT),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// Derived deadline classification of a task relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueToday,
    /// `days_left` is `None` for tasks without a deadline
    Upcoming { days_left: Option<i64> },
}
