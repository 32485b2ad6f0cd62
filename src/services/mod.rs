mod export_service;
mod schedule_service;

pub use export_service::{ExportFormat, SummaryRow, TaskSummary};
pub use schedule_service::ScheduleView;
