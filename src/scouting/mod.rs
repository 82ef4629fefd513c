pub mod aggregate;
pub mod cancel;
pub mod outcome;
pub mod reconcile;
pub mod report;
pub mod tendencies;
pub mod veto;

pub use cancel::CancelToken;
pub use report::{season_record, upcoming_rows, ReportError, ScoutingService};
