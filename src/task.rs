//! Tasks, as exchanged with the backend

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The identifier the backend gave to a task.
///
/// The backend treats it as an opaque value. It is usually a JSON integer, but strings are accepted too.
/// An ID is written back the way it was read: `7` stays a number, `"007"` stays a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    content: String,
    numeric: bool,
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Whether this ID is a JSON number on the wire
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// The numeric value of this ID, if it has one
    pub fn as_number(&self) -> Option<i64> {
        self.content.parse().ok()
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self { content: id.to_string(), numeric: true }
    }
}
impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self { content: id.to_string(), numeric: false }
    }
}
impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content, numeric: false }
    }
}

/// Parses what a user typed: canonical integers (`42`, not `042`) become numeric IDs, anything else is kept as text
impl FromStr for TaskId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Ok(Self::from(n)),
            _ => Ok(Self::from(s)),
        }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.numeric {
            if let Ok(n) = self.content.parse::<i64>() {
                return serializer.serialize_i64(n);
            }
            if let Ok(n) = self.content.parse::<u64>() {
                return serializer.serialize_u64(n);
            }
        }
        serializer.serialize_str(&self.content)
    }
}

/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TaskIdVisitor;

        impl<'de> Visitor<'de> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "an integer or a string")
            }
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
                Ok(TaskId::from(v))
            }
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
                Ok(TaskId { content: v.to_string(), numeric: true })
            }
            fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
                Ok(TaskId::from(v))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}



/// How urgent a task is
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    /// A value this crate does not know about. It is kept as-is so that it can be sent back to the server
    Other(String),
}

impl Priority {
    /// The rank the backend sorts by (lower comes first)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Other(s) => s,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Low" => Priority::Low,
            "Medium" => Priority::Medium,
            "High" => Priority::High,
            _ => Priority::Other(s),
        }
    }
}
impl From<Priority> for String {
    fn from(p: Priority) -> String {
        p.as_str().to_string()
    }
}
impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}



/// What a task is about. Only `Work` and `Personal` get special treatment (e.g. in statistics)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Other(s) => s,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Personal
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Work" => Category::Work,
            "Personal" => Category::Personal,
            _ => Category::Other(s),
        }
    }
}
impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}
impl From<Category> for String {
    fn from(c: Category) -> String {
        c.as_str().to_string()
    }
}
impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}



/// A task, as returned by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    description: String,

    /// `None` in case the backend sent something that is not a valid date
    #[serde(default, with = "timestamp")]
    start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    end_time: Option<NaiveDateTime>,

    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default)]
    done: bool,
}

impl Task {
    /// Create a pending task, with the default priority and category
    pub fn new(id: TaskId, description: String, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self::new_with_parameters(id, description, Some(start_time), Some(end_time),
            Priority::default(), Category::default(), None, false)
    }

    pub fn new_with_parameters(id: TaskId, description: String,
                               start_time: Option<NaiveDateTime>, end_time: Option<NaiveDateTime>,
                               priority: Priority, category: Category,
                               notes: Option<String>, done: bool,
                            ) -> Self
    {
        Self { id, description, start_time, end_time, priority, category, notes, done }
    }

    /// Build the task the server would create from a [`NewTask`]
    pub fn from_new(id: TaskId, new_task: NewTask) -> Self {
        Self::new_with_parameters(id, new_task.description, new_task.start_time, new_task.end_time,
            new_task.priority, new_task.category, new_task.notes, false)
    }

    pub fn id(&self) -> &TaskId                         { &self.id          }
    pub fn description(&self) -> &str                   { &self.description }
    pub fn start_time(&self) -> Option<&NaiveDateTime>  { self.start_time.as_ref() }
    pub fn end_time(&self) -> Option<&NaiveDateTime>    { self.end_time.as_ref() }
    pub fn priority(&self) -> &Priority                 { &self.priority    }
    pub fn category(&self) -> &Category                 { &self.category    }
    pub fn notes(&self) -> Option<&str>                 { self.notes.as_deref() }
    pub fn done(&self) -> bool                          { self.done         }

    /// The start time, as a wall-clock time of the given time zone
    ///
    /// Task times carry no zone (see [`timestamp::parse`]), so the same task starts at different instants in different zones.
    /// Returns `None` when the start time is malformed, or does not map to a single instant in `tz`
    pub fn start_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.start_time.as_ref().and_then(|t| localize(t, tz))
    }

    /// The end time, as a wall-clock time of the given time zone. See [`Self::start_time_in`]
    pub fn end_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.end_time.as_ref().and_then(|t| localize(t, tz))
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Apply an edit, the way the server does it.
    ///
    /// Every editable field is overwritten; `done` only changes when the update carries one
    pub fn apply_update(&mut self, update: TaskUpdate) {
        self.description = update.description;
        self.start_time = update.start_time;
        self.end_time = update.end_time;
        self.priority = update.priority;
        self.category = update.category;
        self.notes = update.notes;
        if let Some(done) = update.done {
            self.done = done;
        }
    }
}

fn localize<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).single()
}



/// The content of a task to create. The server picks its ID, and new tasks are never done
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub description: String,
    #[serde(default, with = "timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTask {
    pub fn new(description: String, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            description,
            start_time: Some(start_time),
            end_time: Some(end_time),
            priority: Priority::default(),
            category: Category::default(),
            notes: None,
        }
    }

    /// A task starting in a minute and lasting an hour, which is what a blank creation form suggests
    pub fn starting_soon(description: String) -> Self {
        let now = Local::now().naive_local();
        Self::new(description, now + chrono::Duration::minutes(1), now + chrono::Duration::hours(1))
    }
}



/// The new content of an edited task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub description: String,
    #[serde(default, with = "timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub notes: Option<String>,
    /// Left untouched on the server when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl From<&Task> for TaskUpdate {
    /// An update that would leave the task unchanged. Useful to edit only a few fields
    fn from(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            start_time: task.start_time,
            end_time: task.end_time,
            priority: task.priority.clone(),
            category: task.category.clone(),
            notes: task.notes.clone(),
            done: None,
        }
    }
}



/// Serde support for the zone-less timestamps the backend exchanges.
///
/// Unparseable values become `None` instead of failing the whole task.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    const ACCEPTED_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse a timestamp the way the backend and browsers write them.
    ///
    /// Timestamps with an offset keep the wall-clock time they were written with, and the offset is dropped.
    /// Like every other timestamp, they are then read in the time zone of whoever evaluates them
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        for format in ACCEPTED_FORMATS.iter() {
            if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
                return Some(t);
            }
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.naive_local())
    }

    pub fn format(t: &NaiveDateTime) -> String {
        t.format(WIRE_FORMAT).to_string()
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&format(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        let parsed = match &value {
            Some(serde_json::Value::String(s)) => parse(s),
            _ => None,
        };
        if parsed.is_none() && value.is_some() {
            log::debug!("Ignoring malformed timestamp {:?}", value);
        }
        Ok(parsed)
    }
}
