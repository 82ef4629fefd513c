pub mod faceit;
pub mod scouting;
pub mod veto_log;
