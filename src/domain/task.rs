use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority `{other}` (use low|medium|high)")),
        }
    }
}

impl Task {
    pub fn new(text: String) -> Self {
        Self::with_schedule(text, Priority::default(), None)
    }

    pub fn with_schedule(text: String, priority: Priority, due_date: Option<NaiveDate>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text,
            priority,
            due_date,
            completed: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Flip the completed flag, keeping `completed_at` consistent with it.
    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Utc::now();

        if self.completed {
            self.completed_at = Some(Utc::now());
        } else {
            self.completed_at = None;
        }
    }

    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        self.due_date == Some(today)
    }

    /// Due within one day of `today`, inclusive at both ends.
    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        match (self.due_date, today.succ_opt()) {
            (Some(due), Some(tomorrow)) => due >= today && due <= tomorrow,
            _ => false,
        }
    }
}
