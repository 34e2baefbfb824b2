//! Task module - the record type produced by extraction

use chrono::NaiveDate;
use std::fmt;

/// Status assigned to every freshly extracted task
pub const DEFAULT_STATUS: &str = "To Do";

/// Column names in display and export order
pub const COLUMNS: [&str; 5] = ["Task", "Category", "Priority", "Due Date", "Status"];

/// Date format used on the wire and in exports (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a field value is outside its allowed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError {
    /// Field that failed to parse
    pub field: &'static str,

    /// The offending input
    pub value: String,
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.field, self.value)
    }
}

impl std::error::Error for ParseFieldError {}

/// Life area a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Job and professional tasks
    Work,

    /// Household, errands, social
    #[default]
    Personal,

    /// Exercise, appointments, wellbeing
    Health,

    /// Bills, budgeting, payments
    Finance,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Finance,
    ];

    /// Get the category name as it appears in prompts and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Finance => "Finance",
        }
    }

    /// Parse a category, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Category::Work),
            "personal" => Some(Category::Personal),
            "health" => Some(Category::Health),
            "finance" => Some(Category::Finance),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseFieldError {
            field: "Category",
            value: s.to_string(),
        })
    }
}

/// Urgency of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Do first
    High,

    /// Normal urgency
    #[default]
    Medium,

    /// Whenever there is time
    Low,
}

impl Priority {
    /// All priorities, most urgent first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Get the priority name as it appears in prompts and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parse a priority, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseFieldError {
            field: "Priority",
            value: s.to_string(),
        })
    }
}

/// A single structured task
///
/// Records have no identity: two records with equal fields are
/// indistinguishable and both are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// What needs doing (never blank)
    pub task: String,

    /// Life area
    pub category: Category,

    /// Urgency
    pub priority: Priority,

    /// Optional deadline
    pub due_date: Option<NaiveDate>,

    /// Workflow status, "To Do" unless told otherwise
    pub status: String,
}

impl TaskRecord {
    /// Create a new record with default priority, no due date and "To Do" status
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdb_domain::{Category, Priority, TaskRecord};
    ///
    /// let record = TaskRecord::new("Buy milk", Category::Personal);
    /// assert_eq!(record.priority, Priority::Medium);
    /// assert_eq!(record.status, "To Do");
    /// assert!(record.due_date.is_none());
    /// ```
    pub fn new(task: impl Into<String>, category: Category) -> Self {
        Self {
            task: task.into(),
            category,
            priority: Priority::default(),
            due_date: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Check that the task text is non-blank
    pub fn validate(&self) -> Result<(), ParseFieldError> {
        if self.task.trim().is_empty() {
            return Err(ParseFieldError {
                field: "Task",
                value: self.task.clone(),
            });
        }
        Ok(())
    }

    /// Due date formatted as YYYY-MM-DD, or an empty string
    pub fn due_date_string(&self) -> String {
        self.due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Field values in [`COLUMNS`] order
    pub fn to_row(&self) -> [String; 5] {
        [
            self.task.clone(),
            self.category.to_string(),
            self.priority.to_string(),
            self.due_date_string(),
            self.status.clone(),
        ]
    }
}

/// Raw, possibly incomplete field values for one record
///
/// Both the upstream JSON reply and imported CSV rows are reduced to this
/// shape so that one set of coercion rules applies everywhere:
///
/// - `task` must be present and non-blank
/// - missing `category`/`priority` take their defaults; unknown values are errors
/// - missing or absence-marker `due_date` is `None`; non-ISO dates are errors
/// - missing or blank `status` becomes "To Do"; any other status is kept as given
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTaskFields<'a> {
    /// Task text
    pub task: Option<&'a str>,
    /// Category name
    pub category: Option<&'a str>,
    /// Priority name
    pub priority: Option<&'a str>,
    /// Due date text
    pub due_date: Option<&'a str>,
    /// Status text
    pub status: Option<&'a str>,
}

impl RawTaskFields<'_> {
    /// Coerce the raw fields into a record
    pub fn into_record(self) -> Result<TaskRecord, ParseFieldError> {
        let task = self
            .task
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ParseFieldError {
                field: "Task",
                value: self.task.unwrap_or_default().to_string(),
            })?;

        let category = match self.category {
            Some(c) => c.parse::<Category>()?,
            None => Category::default(),
        };

        let priority = match self.priority {
            Some(p) => p.parse::<Priority>()?,
            None => Priority::default(),
        };

        let due_date = match self.due_date {
            Some(d) => parse_due_date(d)?,
            None => None,
        };

        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_STATUS);

        Ok(TaskRecord {
            task: task.to_string(),
            category,
            priority,
            due_date,
            status: status.to_string(),
        })
    }
}

/// Parse a due date, treating the usual "no date" markers as absent
///
/// Returns `Ok(None)` for empty strings and `None`/`null`/`N/A` markers,
/// `Ok(Some(_))` for a valid `YYYY-MM-DD` date, and an error otherwise.
pub fn parse_due_date(s: &str) -> Result<Option<NaiveDate>, ParseFieldError> {
    let trimmed = s.trim();
    if is_absence_marker(trimmed) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ParseFieldError {
            field: "Due Date",
            value: s.to_string(),
        })
}

fn is_absence_marker(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case("none")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("n/a")
}
