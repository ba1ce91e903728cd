use std::collections::BTreeSet;

use crate::record::{
    CalendarType, ContentType, Priority, ProjectRecord, ProjectStatus, TaskRecord, TaskStatus,
};

/// Which calendar tab is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarSelection {
    #[default]
    All,
    Only(CalendarType),
}

impl CalendarSelection {
    pub fn admits(self, calendar: CalendarType) -> bool {
        match self {
            CalendarSelection::All => true,
            CalendarSelection::Only(selected) => selected == calendar,
        }
    }
}

/// Per-calendar show/hide toggles, applied on top of [`CalendarSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarVisibility {
    pub team: bool,
    pub personal: bool,
    pub shared: bool,
}

impl Default for CalendarVisibility {
    fn default() -> Self {
        Self::all(true)
    }
}

impl CalendarVisibility {
    pub fn all(visible: bool) -> Self {
        Self {
            team: visible,
            personal: visible,
            shared: visible,
        }
    }

    pub fn is_visible(&self, calendar: CalendarType) -> bool {
        match calendar {
            CalendarType::Team => self.team,
            CalendarType::Personal => self.personal,
            CalendarType::Shared => self.shared,
        }
    }

    pub fn set(&mut self, calendar: CalendarType, visible: bool) {
        match calendar {
            CalendarType::Team => self.team = visible,
            CalendarType::Personal => self.personal = visible,
            CalendarType::Shared => self.shared = visible,
        }
    }

    pub fn toggle(&mut self, calendar: CalendarType) {
        let visible = self.is_visible(calendar);
        self.set(calendar, !visible);
    }

    fn and(self, other: Self) -> Self {
        Self {
            team: self.team && other.team,
            personal: self.personal && other.personal,
            shared: self.shared && other.shared,
        }
    }
}

/// A set of accepted values. Building one from an empty set yields [`Selection::Any`];
/// `Only` with an empty set only arises from intersecting disjoint selections and
/// accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    Any,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::Any
    }
}

impl<T: Ord + Clone> Selection<T> {
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        values.into_iter().collect()
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Selection::Any)
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::Any => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    /// Records lacking the field only pass an unrestricted selection.
    pub fn accepts_option(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Selection::Any, _) => true,
            (Selection::Only(set), Some(value)) => set.contains(value),
            (Selection::Only(_), None) => false,
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        match (self, other) {
            (Selection::Any, other) => other.clone(),
            (this, Selection::Any) => this.clone(),
            (Selection::Only(a), Selection::Only(b)) => {
                Selection::Only(a.intersection(b).cloned().collect())
            }
        }
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let set: BTreeSet<T> = iter.into_iter().collect();
        if set.is_empty() {
            Selection::Any
        } else {
            Selection::Only(set)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfiguration {
    pub calendar: CalendarSelection,
    pub visibility: CalendarVisibility,
    pub statuses: Selection<TaskStatus>,
    pub priorities: Selection<Priority>,
    pub show_completed: bool,
    pub assignees: Selection<String>,
    pub projects: Selection<String>,
    pub content_types: Selection<ContentType>,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            calendar: CalendarSelection::All,
            visibility: CalendarVisibility::default(),
            statuses: Selection::Any,
            priorities: Selection::Any,
            show_completed: true,
            assignees: Selection::Any,
            projects: Selection::Any,
            content_types: Selection::Any,
        }
    }
}

impl FilterConfiguration {
    pub fn with_calendar(mut self, calendar: CalendarSelection) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_visibility(mut self, visibility: CalendarVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = Selection::of(statuses);
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = Selection::of(priorities);
        self
    }

    pub fn with_show_completed(mut self, show_completed: bool) -> Self {
        self.show_completed = show_completed;
        self
    }

    pub fn with_assignees<S: Into<String>>(
        mut self,
        assignees: impl IntoIterator<Item = S>,
    ) -> Self {
        self.assignees = Selection::of(assignees.into_iter().map(Into::into));
        self
    }

    pub fn with_projects<S: Into<String>>(
        mut self,
        projects: impl IntoIterator<Item = S>,
    ) -> Self {
        self.projects = Selection::of(projects.into_iter().map(Into::into));
        self
    }

    pub fn with_content_types(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        self.content_types = Selection::of(types);
        self
    }

    /// Whether a single record survives every pass.
    pub fn admits(&self, record: &TaskRecord) -> bool {
        self.calendar.admits(record.calendar_type)
            && self.visibility.is_visible(record.calendar_type)
            && self.statuses.accepts(&record.status)
            && self.priorities.accepts(&record.priority)
            && (self.show_completed || !record.is_completed())
            && self.assignees.accepts_option(record.assigned_to.as_ref())
            && self.projects.accepts_option(record.project_id.as_ref())
            && self.content_types.accepts(&record.content_type)
    }

    /// Configuration admitting exactly the records both `self` and `other` admit.
    pub fn merge(&self, other: &Self) -> Self {
        let mut visibility = self.visibility.and(other.visibility);
        let calendar = match (self.calendar, other.calendar) {
            (CalendarSelection::All, selected) | (selected, CalendarSelection::All) => selected,
            (CalendarSelection::Only(a), CalendarSelection::Only(b)) => {
                if a != b {
                    visibility = CalendarVisibility::all(false);
                }
                CalendarSelection::Only(a)
            }
        };
        Self {
            calendar,
            visibility,
            statuses: self.statuses.intersect(&other.statuses),
            priorities: self.priorities.intersect(&other.priorities),
            show_completed: self.show_completed && other.show_completed,
            assignees: self.assignees.intersect(&other.assignees),
            projects: self.projects.intersect(&other.projects),
            content_types: self.content_types.intersect(&other.content_types),
        }
    }
}

/// Narrows `records` to those admitted by `config`, preserving their order.
pub fn filter<'a, I>(records: I, config: &FilterConfiguration) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|record| config.admits(record))
        .collect()
}

/// Project list narrowing: case-insensitive search over name and description,
/// then an optional status match. A blank search term matches everything.
pub fn filter_projects<'a>(
    projects: &'a [ProjectRecord],
    search: &str,
    status: Option<ProjectStatus>,
) -> Vec<&'a ProjectRecord> {
    let needle = search.trim().to_lowercase();
    projects
        .iter()
        .filter(|project| needle.is_empty() || project.matches_search(&needle))
        .filter(|project| status.map_or(true, |status| project.status == status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use proptest::sample::select;

    fn task(id: &str, calendar: CalendarType, status: TaskStatus, priority: Priority) -> TaskRecord {
        let mut task = TaskRecord::new(id, format!("Task {id}"), "u1");
        task.calendar_type = calendar;
        task.status = status;
        task.priority = priority;
        task
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a &'a TaskRecord>) -> Vec<&'a str> {
        records.into_iter().map(|task| task.id.as_str()).collect()
    }

    fn sample() -> Vec<TaskRecord> {
        vec![
            task("a", CalendarType::Team, TaskStatus::Todo, Priority::High),
            task("b", CalendarType::Personal, TaskStatus::Completed, Priority::Low),
            task("c", CalendarType::Shared, TaskStatus::Review, Priority::Urgent),
            task("d", CalendarType::Team, TaskStatus::Completed, Priority::Medium),
            task("e", CalendarType::Personal, TaskStatus::InProgress, Priority::High),
        ]
    }

    #[test]
    fn default_configuration_keeps_everything_in_order() {
        let records = sample();
        let kept = filter(&records, &FilterConfiguration::default());
        assert_eq!(ids(&kept), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn hidden_calendar_overrides_selected_tab() {
        let records = sample();
        let mut visibility = CalendarVisibility::default();
        visibility.toggle(CalendarType::Team);
        let config = FilterConfiguration::default()
            .with_calendar(CalendarSelection::Only(CalendarType::Team))
            .with_visibility(visibility);
        assert!(filter(&records, &config).is_empty());
    }

    #[test]
    fn visibility_applies_without_a_selected_tab() {
        let records = sample();
        let config = FilterConfiguration::default().with_visibility(CalendarVisibility {
            team: true,
            personal: false,
            shared: true,
        });
        assert_eq!(ids(&filter(&records, &config)), vec!["a", "c", "d"]);
    }

    #[test]
    fn status_and_priority_sets_narrow_independently() {
        let records = sample();
        let config = FilterConfiguration::default()
            .with_statuses([TaskStatus::Todo, TaskStatus::InProgress])
            .with_priorities([Priority::High]);
        assert_eq!(ids(&filter(&records, &config)), vec!["a", "e"]);

        let empty_sets = FilterConfiguration::default()
            .with_statuses([])
            .with_priorities([]);
        assert_eq!(filter(&records, &empty_sets).len(), records.len());
    }

    #[test]
    fn hiding_completed_drops_only_completed() {
        let records = sample();
        let config = FilterConfiguration::default().with_show_completed(false);
        assert_eq!(ids(&filter(&records, &config)), vec!["a", "c", "e"]);
    }

    #[test]
    fn assignee_selection_drops_unassigned_records() {
        let mut records = sample();
        records[0].assigned_to = Some("u2".into());
        records[2].assigned_to = Some("u3".into());
        let config = FilterConfiguration::default().with_assignees(["u2"]);
        assert_eq!(ids(&filter(&records, &config)), vec!["a"]);
    }

    #[test]
    fn conflicting_tabs_merge_to_nothing() {
        let records = sample();
        let team = FilterConfiguration::default()
            .with_calendar(CalendarSelection::Only(CalendarType::Team));
        let shared = FilterConfiguration::default()
            .with_calendar(CalendarSelection::Only(CalendarType::Shared));
        assert!(filter(&records, &team.merge(&shared)).is_empty());
    }

    #[test]
    fn disjoint_status_sets_merge_to_nothing() {
        let records = sample();
        let todo = FilterConfiguration::default().with_statuses([TaskStatus::Todo]);
        let review = FilterConfiguration::default().with_statuses([TaskStatus::Review]);
        let merged = todo.merge(&review);
        assert_eq!(merged.statuses, Selection::Only(BTreeSet::new()));
        assert!(filter(&records, &merged).is_empty());
    }

    #[test]
    fn project_filter_searches_name_and_description() {
        let make = |id: &str, name: &str, description: Option<&str>, status| ProjectRecord {
            id: id.into(),
            name: name.into(),
            description: description.map(str::to_string),
            status,
            priority: Priority::Medium,
            start_date: None,
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            progress: Default::default(),
            budget: None,
            spent_budget: None,
            owner_id: "u1".into(),
            team_members: vec!["u1".into()],
            created_by: Some("u1".into()),
            created_at: None,
            updated_at: None,
        };
        let projects = vec![
            make("p1", "Spring Launch", None, ProjectStatus::Active),
            make("p2", "Blog refresh", Some("New LAUNCH copy"), ProjectStatus::OnHold),
            make("p3", "Hiring", None, ProjectStatus::Active),
        ];

        let found: Vec<_> = filter_projects(&projects, " launch ", None)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(found, vec!["p1", "p2"]);

        let active: Vec<_> = filter_projects(&projects, "", Some(ProjectStatus::Active))
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(active, vec!["p1", "p3"]);
    }

    fn arb_task() -> impl Strategy<Value = TaskRecord> {
        (
            select(CalendarType::ALL.to_vec()),
            select(TaskStatus::ALL.to_vec()),
            select(Priority::ALL.to_vec()),
            proptest::option::of(select(vec!["u1", "u2", "u3"])),
            proptest::option::of(select(vec!["p1", "p2"])),
            select(ContentType::ALL.to_vec()),
        )
            .prop_map(|(calendar, status, priority, assignee, project, content)| {
                let mut record = task("t", calendar, status, priority);
                record.assigned_to = assignee.map(str::to_string);
                record.project_id = project.map(str::to_string);
                record.content_type = content;
                record
            })
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<TaskRecord>> {
        proptest::collection::vec(arb_task(), 0..24).prop_map(|mut records| {
            for (idx, record) in records.iter_mut().enumerate() {
                record.id = format!("t{idx}");
            }
            records
        })
    }

    fn arb_selection<T: Ord + Clone + std::fmt::Debug + 'static>(
        values: Vec<T>,
    ) -> impl Strategy<Value = Selection<T>> {
        proptest::collection::vec(select(values), 0..3).prop_map(|values| Selection::of(values))
    }

    fn arb_config() -> impl Strategy<Value = FilterConfiguration> {
        (
            proptest::option::of(select(CalendarType::ALL.to_vec())),
            any::<(bool, bool, bool)>(),
            arb_selection(TaskStatus::ALL.to_vec()),
            arb_selection(Priority::ALL.to_vec()),
            any::<bool>(),
            arb_selection(vec!["u1".to_string(), "u2".to_string()]),
            arb_selection(vec!["p1".to_string(), "p2".to_string()]),
            arb_selection(ContentType::ALL.to_vec()),
        )
            .prop_map(
                |(
                    calendar,
                    (team, personal, shared),
                    statuses,
                    priorities,
                    show,
                    assignees,
                    projects,
                    content_types,
                )| {
                    FilterConfiguration {
                        calendar: calendar.map_or(CalendarSelection::All, CalendarSelection::Only),
                        visibility: CalendarVisibility {
                            team,
                            personal,
                            shared,
                        },
                        statuses,
                        priorities,
                        show_completed: show,
                        assignees,
                        projects,
                        content_types,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn filtering_yields_an_ordered_subsequence(records in arb_tasks(), config in arb_config()) {
            let kept = filter(&records, &config);
            let mut cursor = records.iter();
            for survivor in &kept {
                prop_assert!(cursor.any(|record| std::ptr::eq(record, *survivor)));
            }
        }

        #[test]
        fn successive_filters_equal_merged_filter(
            records in arb_tasks(),
            first in arb_config(),
            second in arb_config(),
        ) {
            let narrowed = filter(&records, &first);
            let twice = filter(narrowed.iter().copied(), &second);
            let merged = filter(&records, &first.merge(&second));
            prop_assert_eq!(ids(&twice), ids(&merged));
        }
    }
}
