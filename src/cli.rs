//! CLI argument parser
use clap::{Parser, Subcommand};

use crate::util::validate_session_name;

/// Command-line argument parser for `tsm`.
#[derive(Debug, Parser)]
#[command(name = "tsm", disable_help_subcommand = true)]
#[command(
    about = "Open, close and list tmux sessions described by YAML files",
    long_about = "tsm - A small tmux session manager.

Each session is described by ~/.tsm/<session>.yml. Opening a session that is
not running builds it from that file: environment, windows and their commands,
then attaches to it. Without a file a bare session is created.

Examples:
 tsm              # list configured sessions and whether they are running
 tsm open web     # attach to `web`, building it first if needed
 tsm close web    # kill the running `web` session
 tsm view web     # print ~/.tsm/web.yml

Use `tsm <COMMAND> --help` for more details."
)]
pub struct Args {
    // `list` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands for `tsm`.
#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        about = "Open the specified session",
        long_about = "Attach to the session if it is running. Otherwise create
it, build it from its config file if one exists, and attach. Without a name,
attach to the most recent session.",
        visible_aliases = ["o", "attach", "a"]
    )]
    Open {
        /// Name of the session
        #[arg(value_parser = validate_session_name)]
        session_name: Option<String>,
    },

    #[command(
        about = "Close the specified session",
        long_about = "Kill the running session. Fails if it is not open.",
        arg_required_else_help = true,
        alias = "c"
    )]
    Close {
        /// Name of the session
        #[arg(value_parser = validate_session_name)]
        session_name: String,
    },

    #[command(
        about = "List configured sessions",
        long_about = "List every config in ~/.tsm with a running marker and its
description.",
        alias = "l"
    )]
    List,

    #[command(
        about = "Print the config file of the specified session",
        arg_required_else_help = true,
        alias = "v"
    )]
    View {
        /// Name of the session
        #[arg(value_parser = validate_session_name)]
        session_name: String,
    },

    #[command(about = "Print this help", alias = "h")]
    Help,
}
