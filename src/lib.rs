//! `tsm` opens, closes and lists tmux sessions described by YAML files in
//! `~/.tsm`.
pub mod actions;
pub mod cli;
pub mod error;
pub mod persistence;
pub mod tmux;
pub mod util;

pub use util::validate_session_name;
