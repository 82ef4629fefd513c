pub mod report_handler;
pub mod team_handler;
pub mod veto_log_handler;
