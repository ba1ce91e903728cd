use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Colour family a badge is drawn with. Front ends map these onto their palette.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Gray,
    Yellow,
    Orange,
    Green,
    Blue,
    Purple,
    Red,
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    pub fn is_terminal(self) -> bool {
        self == TaskStatus::Completed
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Review => "In review",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            TaskStatus::Todo => Tone::Gray,
            TaskStatus::InProgress => Tone::Blue,
            TaskStatus::Review => Tone::Yellow,
            TaskStatus::Completed => Tone::Green,
        }
    }
}

/// Status vocabulary of content tasks. Folded onto [`TaskStatus`] by [`ContentStatus::canonical`].
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Draft,
    InReview,
    Approved,
    Published,
    Rejected,
}

impl ContentStatus {
    pub fn canonical(self) -> TaskStatus {
        match self {
            ContentStatus::Draft | ContentStatus::Rejected => TaskStatus::Todo,
            ContentStatus::Approved => TaskStatus::InProgress,
            ContentStatus::InReview => TaskStatus::Review,
            ContentStatus::Published => TaskStatus::Completed,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ContentStatus::Published
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentStatus::Draft => "Draft",
            ContentStatus::InReview => "In review",
            ContentStatus::Approved => "Approved",
            ContentStatus::Published => "Published",
            ContentStatus::Rejected => "Rejected",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ContentStatus::Draft => Tone::Gray,
            ContentStatus::InReview => Tone::Yellow,
            ContentStatus::Approved => Tone::Green,
            ContentStatus::Published => Tone::Blue,
            ContentStatus::Rejected => Tone::Red,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Priority::Low => Tone::Green,
            Priority::Medium => Tone::Yellow,
            Priority::High => Tone::Orange,
            Priority::Urgent => Tone::Red,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    General,
    SocialMedia,
    Blog,
    Video,
    Design,
    Meeting,
    Event,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        ContentType::General,
        ContentType::SocialMedia,
        ContentType::Blog,
        ContentType::Video,
        ContentType::Design,
        ContentType::Meeting,
        ContentType::Event,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContentType::General => "General",
            ContentType::SocialMedia => "Social media",
            ContentType::Blog => "Blog",
            ContentType::Video => "Video",
            ContentType::Design => "Design",
            ContentType::Meeting => "Meeting",
            ContentType::Event => "Event",
        }
    }
}

/// Kind of a content task, the older content vocabulary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Post,
    Video,
    Image,
    Story,
    Article,
    Campaign,
}

impl ContentKind {
    pub fn content_type(self) -> ContentType {
        match self {
            ContentKind::Post | ContentKind::Story => ContentType::SocialMedia,
            ContentKind::Video => ContentType::Video,
            ContentKind::Image => ContentType::Design,
            ContentKind::Article => ContentType::Blog,
            ContentKind::Campaign => ContentType::General,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "Post",
            ContentKind::Video => "Video",
            ContentKind::Image => "Image",
            ContentKind::Story => "Story",
            ContentKind::Article => "Article",
            ContentKind::Campaign => "Campaign",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Task,
    Event,
    Meeting,
    Milestone,
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum CalendarType {
    #[default]
    Team,
    Personal,
    Shared,
}

impl CalendarType {
    pub const ALL: [CalendarType; 3] = [
        CalendarType::Team,
        CalendarType::Personal,
        CalendarType::Shared,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CalendarType::Team => "Team",
            CalendarType::Personal => "Personal",
            CalendarType::Shared => "Shared",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            CalendarType::Team => Tone::Blue,
            CalendarType::Personal => Tone::Green,
            CalendarType::Shared => Tone::Purple,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Team,
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Team => "team",
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

/// A calendar task. All-day records never carry a start or end time; the
/// decoder drops them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_default")]
    pub content_type: ContentType,
    #[serde(default, deserialize_with = "null_default")]
    pub task_type: TaskType,
    #[serde(default, with = "calendar_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub calendar_type: CalendarType,
    #[serde(default, deserialize_with = "null_default")]
    pub visibility: Visibility,
    #[serde(default, deserialize_with = "null_default")]
    pub is_event: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub is_all_day: bool,
    #[serde(default, with = "time_of_day")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_of_day")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub attendees: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
    #[serde(default, with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub actual_hours: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub story_points: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Serialize for TaskRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaskRecord::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for TaskRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut task = TaskRecord::deserialize(deserializer)?;
        if task.is_all_day {
            task.start_time = None;
            task.end_time = None;
        }
        Ok(task)
    }
}

impl TaskRecord {
    /// A todo on the team calendar with everything else defaulted.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            content_type: ContentType::General,
            task_type: TaskType::Task,
            due_date: None,
            calendar_type: CalendarType::Team,
            visibility: Visibility::Team,
            is_event: false,
            is_all_day: false,
            start_time: None,
            end_time: None,
            location: None,
            meeting_url: None,
            attendees: None,
            created_by: created_by.into(),
            assigned_to: None,
            project_id: None,
            parent_task_id: None,
            tags: Vec::new(),
            estimated_hours: None,
            actual_hours: 0.0,
            story_points: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Start and end time of day, `None` for all-day entries.
    pub fn time_window(&self) -> Option<(NaiveTime, Option<NaiveTime>)> {
        if self.is_all_day {
            return None;
        }
        self.start_time.map(|start| (start, self.end_time))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: ContentStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_default")]
    pub content_type: ContentKind,
    #[serde(default, with = "calendar_date")]
    pub due_date: Option<NaiveDate>,
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentTask {
    pub fn into_task(self) -> TaskRecord {
        let mut task = TaskRecord::new(self.id, self.title, self.created_by);
        task.description = self.description;
        task.status = self.status.canonical();
        task.priority = self.priority;
        task.content_type = self.content_type.content_type();
        task.due_date = self.due_date;
        task.created_at = self.created_at;
        task.updated_at = self.updated_at;
        task
    }
}

impl From<ContentTask> for TaskRecord {
    fn from(content: ContentTask) -> Self {
        content.into_task()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    #[default]
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Active",
            ProjectStatus::OnHold => "On hold",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ProjectStatus::Planning => Tone::Gray,
            ProjectStatus::Active => Tone::Green,
            ProjectStatus::OnHold => Tone::Yellow,
            ProjectStatus::Completed => Tone::Blue,
            ProjectStatus::Cancelled => Tone::Red,
        }
    }
}

/// Percentage in `0..=100`. Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Progress(u8);

impl Progress {
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self(0);
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Serialize for Progress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.map_or(Progress::default(), Progress::from_f64))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: Priority,
    #[serde(default, with = "calendar_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "calendar_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub spent_budget: Option<f64>,
    pub owner_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectRecord {
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|text| text.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Planned,
    Active,
    Completed,
    OnHold,
}

impl PhaseStatus {
    /// Completed phases reopen as active; anything else completes.
    pub fn toggled(self) -> Self {
        match self {
            PhaseStatus::Completed => PhaseStatus::Active,
            PhaseStatus::Planned | PhaseStatus::Active | PhaseStatus::OnHold => {
                PhaseStatus::Completed
            }
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            PhaseStatus::Planned => Tone::Gray,
            PhaseStatus::Active => Tone::Green,
            PhaseStatus::Completed => Tone::Blue,
            PhaseStatus::OnHold => Tone::Yellow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "calendar_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "calendar_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: PhaseStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub order_index: u32,
}

/// Sorts phases by their explicit index, keeping input order for ties.
pub fn order_phases(phases: &mut [ProjectPhase]) {
    phases.sort_by_key(|phase| phase.order_index);
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Editor,
    #[default]
    #[serde(alias = "participant")]
    Member,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Owner,
        Role::Admin,
        Role::Manager,
        Role::Editor,
        Role::Member,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Editor => "Editor",
            Role::Member => "Member",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Owner => "Full access to every feature",
            Role::Admin => "Manages the team and projects",
            Role::Manager => "Creates and assigns tasks",
            Role::Editor => "Creates and edits content",
            Role::Member => "Works on assigned tasks",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Role::Owner => Tone::Purple,
            Role::Admin => Tone::Blue,
            Role::Manager => Tone::Green,
            Role::Editor => Tone::Yellow,
            Role::Member => Tone::Gray,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub role: Role,
}

impl User {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Reads an explicit `null` the same as a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `YYYY-MM-DD` dates. Anything else decodes as "no date".
pub(crate) mod calendar_date {
    use chrono::NaiveDate;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(value, FORMAT) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::debug!(value, %err, "ignoring unparsable calendar date");
                None
            }
        }
    }

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) => parse(&text),
            Some(Raw::Other(_)) | None => None,
        })
    }
}

/// `HH:MM` (seconds tolerated on input).
mod time_of_day {
    use chrono::NaiveTime;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) => parse(&text),
            Some(Raw::Other(_)) | None => None,
        })
    }
}

/// Tags travel as one comma separated string.
mod tag_list {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum Raw {
        Text(String),
        List(Vec<String>),
        Other(IgnoredAny),
    }

    pub fn split(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn serialize<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        if tags.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&tags.join(", "))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(text)) => split(&text),
            Some(Raw::List(list)) => list
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            Some(Raw::Other(_)) | None => Vec::new(),
        })
    }
}

pub(crate) use tag_list::split as split_tags;
