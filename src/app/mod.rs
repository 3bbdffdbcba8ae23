//! Application runtime composition modules.

pub(crate) mod config_show;
pub(crate) mod exit_handler;
pub(crate) mod input_processor;
pub(crate) mod runtime;
pub(crate) mod terminal;
pub(crate) mod terminal_host;
