pub mod competition_cache;
pub mod faceit_client;
pub mod veto_log_service;

pub use competition_cache::CompetitionCache;
pub use faceit_client::{FaceitClient, FaceitError};
pub use veto_log_service::VetoLogService;
