use std::borrow::Cow;
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use shell_escape::escape;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const TMUX_BIN: &str = "tmux";

/// Where the output of a tmux invocation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Passed through to the controlling terminal.
    Inherit,
    /// Stdout captured and returned, stderr discarded.
    Capture,
}

/// The only way the rest of the crate talks to tmux.
///
/// Failures are soft: an invocation that cannot be spawned or exits with a
/// nonzero status yields `None`, never an error.
pub trait Multiplexer {
    /// Runs `tmux <args...>` with already tokenized arguments.
    ///
    /// Returns the captured stdout in [`OutputMode::Capture`] and an empty
    /// string in [`OutputMode::Inherit`].
    fn execute(&mut self, args: &[&str], mode: OutputMode) -> Option<String>;

    /// Runs one tmux command line written in tmux's own command syntax.
    fn execute_line(&mut self, line: &str) -> Option<String>;

    /// Whether this process already runs inside a tmux client.
    fn inside_client(&self) -> bool;
}

/// [`Multiplexer`] backed by the `tmux` binary on `PATH`.
#[derive(Debug, Default)]
pub struct Tmux {
    inside_client: bool,
}

impl Tmux {
    pub fn new() -> Self {
        Self {
            inside_client: env::var("TMUX").is_ok_and(|s| !s.is_empty()),
        }
    }
}

impl Multiplexer for Tmux {
    fn execute(&mut self, args: &[&str], mode: OutputMode) -> Option<String> {
        let rendered = render_command(args);
        debug!(command = %rendered, ?mode, "running tmux");

        let mut cmd = Command::new(TMUX_BIN);
        cmd.args(args);

        match mode {
            OutputMode::Inherit => match cmd.status() {
                Ok(status) if status.success() => Some(String::new()),
                Ok(status) => {
                    warn!(command = %rendered, %status, "tmux command failed");
                    None
                }
                Err(e) => {
                    warn!(
                        command = %rendered,
                        error = %e,
                        "failed to run tmux"
                    );
                    None
                }
            },
            OutputMode::Capture => {
                let output =
                    cmd.stdin(Stdio::null()).stderr(Stdio::null()).output();

                match output {
                    Ok(output) if output.status.success() => Some(
                        String::from_utf8_lossy(&output.stdout).into_owned(),
                    ),
                    Ok(output) => {
                        debug!(
                            command = %rendered,
                            status = %output.status,
                            "tmux command failed"
                        );
                        None
                    }
                    Err(e) => {
                        debug!(
                            command = %rendered,
                            error = %e,
                            "failed to run tmux"
                        );
                        None
                    }
                }
            }
        }
    }

    fn execute_line(&mut self, line: &str) -> Option<String> {
        // tmux parses the file itself, so quoting follows tmux rules and no
        // shell ever sees the line
        let script = NamedTempFile::new().and_then(|mut file| {
            writeln!(file, "{line}")?;
            Ok(file)
        });

        match script {
            Ok(script) => {
                let path = script.path().to_string_lossy().into_owned();
                debug!(%line, "replaying tmux command line");
                self.execute(&["source-file", &path], OutputMode::Inherit)
            }
            Err(e) => {
                warn!(%line, error = %e, "failed to stage tmux command line");
                None
            }
        }
    }

    fn inside_client(&self) -> bool {
        self.inside_client
    }
}

/// Raw `tmux ls` output, or `None` when no server is running.
pub fn list_running_session_names(
    tmux: &mut impl Multiplexer,
) -> Option<String> {
    tmux.execute(&["ls"], OutputMode::Capture)
}

/// Checks a `tmux ls` listing for `session_name`.
///
/// A line matches only when it starts with the name immediately followed by
/// `:`, so `foo` is not reported as running when only `foobar` is.
pub fn listing_contains(listing: &str, session_name: &str) -> bool {
    listing.lines().any(|line| {
        line.strip_prefix(session_name)
            .is_some_and(|rest| rest.starts_with(':'))
    })
}

pub fn is_active_session(
    tmux: &mut impl Multiplexer,
    session_name: &str,
) -> bool {
    list_running_session_names(tmux)
        .is_some_and(|listing| listing_contains(&listing, session_name))
}

pub fn attach_to_session(tmux: &mut impl Multiplexer, session_name: &str) {
    let attach_cmd = if tmux.inside_client() {
        "switch-client"
    } else {
        "attach"
    };

    tmux.execute(&[attach_cmd, "-t", session_name], OutputMode::Inherit);
}

/// Attaches to whatever session tmux picks by default.
pub fn attach_to_default_session(tmux: &mut impl Multiplexer) {
    tmux.execute(&["attach"], OutputMode::Inherit);
}

pub fn close_session(tmux: &mut impl Multiplexer, session_name: &str) {
    tmux.execute(&["kill-session", "-t", session_name], OutputMode::Inherit);
}

fn render_command(args: &[&str]) -> String {
    let mut rendered = String::from(TMUX_BIN);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&escape(Cow::from(*arg)));
    }
    rendered
}
