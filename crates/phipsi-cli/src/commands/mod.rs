pub mod analyze;
pub mod classify;
