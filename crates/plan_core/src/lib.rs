pub mod backend;
pub mod calendar;
pub mod error;
pub mod filter;
pub mod forms;
pub mod memory;
pub mod notifications;
pub mod record;
pub mod service;
pub mod stats;

pub use crate::backend::{Collection, Condition, Direction, Query, Session};
pub use crate::calendar::{GridCell, MonthCursor, MonthView, RelativeDay};
pub use crate::error::{PlannerError, Result};
pub use crate::filter::{CalendarSelection, CalendarVisibility, FilterConfiguration, Selection};
pub use crate::service::{PlannerService, PlannerServiceBuilder, ProjectDetail};
pub use crate::stats::{DashboardStats, ProjectDetailStats};
