pub mod commands;
pub mod panel;
pub mod type_session;
