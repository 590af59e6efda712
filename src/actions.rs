use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;
use crossterm::style::Stylize;
use tracing::{debug, info};

use crate::cli::{Args, Commands};
use crate::error::TsmError;
use crate::persistence::ConfigStore;
use crate::tmux::builder::SessionBuilder;
use crate::tmux::interface::*;

const RUNNING_MARKER: &str = "●";
const STOPPED_MARKER: &str = "○";

pub fn handle(args: Args) -> Result<()> {
    match args.command.unwrap_or(Commands::List) {
        Commands::Open { session_name } => open(
            &ConfigStore::from_home()?,
            &mut Tmux::new(),
            session_name.as_deref(),
        ),
        Commands::Close { session_name } => {
            close(&mut Tmux::new(), &session_name)
        }
        Commands::List => list(
            &ConfigStore::from_home()?,
            &mut Tmux::new(),
            &mut io::stdout().lock(),
        ),
        Commands::View { session_name } => view(
            &ConfigStore::from_home()?,
            &session_name,
            &mut io::stdout().lock(),
        ),
        Commands::Help => {
            Args::command().print_help().context("Failed to print help")
        }
    }
}

/// Attaches to `session_name`, building it first when it is not running.
///
/// A running session is attached as is; its config is not replayed again.
pub fn open(
    store: &ConfigStore,
    tmux: &mut impl Multiplexer,
    session_name: Option<&str>,
) -> Result<()> {
    let Some(session_name) = session_name else {
        attach_to_default_session(tmux);
        return Ok(());
    };

    if is_active_session(tmux, session_name) {
        info!(session = session_name, "session already running");
        attach_to_session(tmux, session_name);
        return Ok(());
    }

    let config = if store.config_exists(session_name) {
        Some(store.load_config(session_name)?)
    } else {
        debug!(session = session_name, "no config, opening bare session");
        None
    };

    SessionBuilder::new(tmux, session_name).build(config.as_ref());

    Ok(())
}

pub fn close(tmux: &mut impl Multiplexer, session_name: &str) -> Result<()> {
    if !is_active_session(tmux, session_name) {
        return Err(TsmError::SessionNotOpen(session_name.to_string()).into());
    }

    close_session(tmux, session_name);
    Ok(())
}

/// Prints one line per config: running marker, name and description.
pub fn list(
    store: &ConfigStore,
    tmux: &mut impl Multiplexer,
    out: &mut impl Write,
) -> Result<()> {
    let session_names = store.list_configs()?;
    let running = list_running_session_names(tmux).unwrap_or_default();

    for session_name in session_names {
        let config = store.load_config(&session_name)?;

        let marker = if listing_contains(&running, &session_name) {
            RUNNING_MARKER.green()
        } else {
            STOPPED_MARKER.red()
        };

        let written = match config.description {
            Some(description) => {
                writeln!(out, "{marker} {session_name} - {description}")
            }
            None => writeln!(out, "{marker} {session_name}"),
        };
        written.context("Failed to write session list")?;
    }

    Ok(())
}

pub fn view(
    store: &ConfigStore,
    session_name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let data = store.read_raw(session_name)?;
    out.write_all(data.as_bytes())
        .context("Failed to write config")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::tmux::testing::Recorder;

    fn store_with(configs: &[(&str, &str)]) -> (TempDir, ConfigStore) {
        let dir = tempdir().unwrap();
        for (name, text) in configs {
            fs::write(dir.path().join(format!("{name}.yml")), text).unwrap();
        }
        let store = ConfigStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn open_running_session_only_attaches() {
        let (_dir, store) =
            store_with(&[("web", "windows:\n  editor: vim\n")]);
        let mut tmux = Recorder::with_running("web: 1 windows\n");

        open(&store, &mut tmux, Some("web")).unwrap();

        assert_eq!(tmux.calls, ["ls", "attach -t web"]);
    }

    #[test]
    fn open_without_config_creates_bare_session() {
        let (_dir, store) = store_with(&[]);
        let mut tmux = Recorder::default();

        open(&store, &mut tmux, Some("scratch")).unwrap();

        assert_eq!(
            tmux.calls,
            ["ls", "new-session -d -s scratch", "attach -t scratch"]
        );
    }

    #[test]
    fn open_with_config_builds_windows() {
        let (_dir, store) = store_with(&[(
            "web",
            "windows:\n  editor: vim\n  shell: none\nselect_window: editor\n",
        )]);
        let mut tmux = Recorder::with_running("webapp: 1 windows\n");

        open(&store, &mut tmux, Some("web")).unwrap();

        assert_eq!(
            tmux.calls,
            [
                "ls",
                "new-session -d -s web",
                "new-window -t web:2",
                "kill-window -t web:1",
                "new-window -t web:1",
                "kill-window -t web:2",
                "rename-window -t web:1 editor",
                "send-keys -t web:1 vim C-m",
                "new-window -t web:2",
                "rename-window -t web:2 shell",
                "select-window -t web:editor",
                "attach -t web",
            ]
        );
    }

    #[test]
    fn open_with_malformed_config_runs_nothing() {
        let (_dir, store) = store_with(&[("web", "windows: [\n")]);
        let mut tmux = Recorder::default();

        let err = open(&store, &mut tmux, Some("web")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TsmError>(),
            Some(TsmError::ConfigFileUnreadable { .. })
        ));
        assert_eq!(tmux.calls, ["ls"]);
    }

    #[test]
    fn open_without_name_attaches_default() {
        let (_dir, store) = store_with(&[]);
        let mut tmux = Recorder::default();

        open(&store, &mut tmux, None).unwrap();

        assert_eq!(tmux.calls, ["attach"]);
    }

    #[test]
    fn close_kills_running_session() {
        let mut tmux = Recorder::with_running("web: 1 windows\n");

        close(&mut tmux, "web").unwrap();

        assert_eq!(tmux.calls, ["ls", "kill-session -t web"]);
    }

    #[test]
    fn close_stopped_session_fails_without_kill() {
        let mut tmux = Recorder::with_running("webapp: 1 windows\n");

        let err = close(&mut tmux, "web").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TsmError>(),
            Some(TsmError::SessionNotOpen(name)) if name == "web"
        ));
        assert_eq!(tmux.calls, ["ls"]);
    }

    #[test]
    fn list_marks_running_sessions() {
        let (_dir, store) = store_with(&[
            ("api", "description: Backend\n"),
            ("web", ""),
        ]);
        let mut tmux = Recorder::with_running("api: 2 windows\n");
        let mut out = Vec::new();

        list(&store, &mut tmux, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let order = store.list_configs().unwrap();
        assert_eq!(lines.len(), 2);

        for (line, name) in lines.iter().zip(&order) {
            match name.as_str() {
                "api" => {
                    assert!(line.contains(RUNNING_MARKER));
                    assert!(line.contains("api - Backend"));
                }
                "web" => {
                    assert!(line.contains(STOPPED_MARKER));
                    assert!(line.ends_with(" web"));
                }
                other => panic!("unexpected session {other}"),
            }
        }
    }

    #[test]
    fn list_without_server_marks_everything_stopped() {
        let (_dir, store) = store_with(&[("web", "")]);
        let mut tmux = Recorder::default();
        let mut out = Vec::new();

        list(&store, &mut tmux, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(STOPPED_MARKER));
        assert!(!out.contains(RUNNING_MARKER));
    }

    #[test]
    fn view_prints_raw_file() {
        let text = "# comments survive\ndescription: web\n";
        let (_dir, store) = store_with(&[("web", text)]);
        let mut out = Vec::new();

        view(&store, "web", &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[test]
    fn view_missing_config_fails() {
        let (_dir, store) = store_with(&[]);
        let mut out = Vec::new();

        let err = view(&store, "web", &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TsmError>(),
            Some(TsmError::ConfigFileUnreadable { .. })
        ));
        assert!(out.is_empty());
    }
}
