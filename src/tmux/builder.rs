//! Replays a [`SessionConfig`] as an ordered sequence of tmux commands.
use tracing::{debug, info};

use crate::tmux::interface::{Multiplexer, OutputMode, attach_to_session};
use crate::tmux::session::{CommandMap, SessionConfig};

/// Window value that names a window without typing anything into it.
const NO_COMMAND: &str = "none";

/// Builds one session. Steps run strictly in order, each one blocking until
/// tmux returns. A step whose field is absent from the config is skipped.
pub struct SessionBuilder<'a, M: Multiplexer> {
    tmux: &'a mut M,
    session_name: &'a str,
}

impl<'a, M: Multiplexer> SessionBuilder<'a, M> {
    pub fn new(tmux: &'a mut M, session_name: &'a str) -> Self {
        Self { tmux, session_name }
    }

    /// Creates the session, applies `config` if there is one and attaches.
    pub fn build(mut self, config: Option<&SessionConfig>) {
        info!(session = self.session_name, "creating session");
        self.new_session();

        if let Some(config) = config {
            self.apply(config);
        }

        attach_to_session(self.tmux, self.session_name);
    }

    fn new_session(&mut self) {
        self.run(&["new-session", "-d", "-s", self.session_name]);
    }

    fn apply(&mut self, config: &SessionConfig) {
        let name = self.session_name;

        if let Some(dir) = &config.session_dir {
            self.run(&["set-environment", "-t", name, "SESSION_DIR", dir]);
        }

        if let Some(url) = &config.session_url {
            let url = format!("http://{url}");
            self.run(&["set-environment", "-t", name, "SESSION_URL", &url]);
        }

        if let Some(commands) = &config.commands_before {
            self.replay(commands);
        }

        if let Some(dir) = &config.session_dir {
            // the option is gone from newer tmux versions; keep its
            // complaint off the screen
            self.tmux.execute(
                &["set-option", "-t", name, "default-path", dir],
                OutputMode::Capture,
            );
        }

        self.refresh_environment();

        if let Some(windows) = &config.windows {
            self.build_windows(windows);
        }

        let selected = config
            .select_window
            .as_ref()
            .map_or_else(|| "1".to_string(), ToString::to_string);
        let selected = self.target(&selected);
        self.run(&["select-window", "-t", &selected]);

        if let Some(description) = &config.description {
            self.run(&[
                "set-option",
                "-t",
                name,
                "set-titles-string",
                description,
            ]);
        }

        if let Some(commands) = &config.commands_after {
            self.replay(commands);
        }
    }

    /// Forces tmux to hand the session environment to the first window by
    /// replacing it. Must stay exactly these four steps.
    fn refresh_environment(&mut self) {
        debug!(session = self.session_name, "refreshing session environment");

        let first = self.target("1");
        let second = self.target("2");

        self.run(&["new-window", "-t", &second]);
        self.run(&["kill-window", "-t", &first]);
        self.run(&["new-window", "-t", &first]);
        self.run(&["kill-window", "-t", &second]);
    }

    /// Window 1 already exists, so only later windows are created.
    fn build_windows(&mut self, windows: &CommandMap) {
        for (index, (window_name, commands)) in (1..).zip(windows.iter()) {
            let target = self.target(&index.to_string());

            if index > 1 {
                self.run(&["new-window", "-t", &target]);
            }
            self.run(&["rename-window", "-t", &target, window_name]);

            for command in commands.items() {
                if command.is_empty() || command == NO_COMMAND {
                    continue;
                }
                self.run(&["send-keys", "-t", &target, command, "C-m"]);
            }
        }
    }

    fn replay(&mut self, commands: &CommandMap) {
        for (command, arguments) in commands.iter() {
            if command.is_empty() {
                continue;
            }

            let arguments = arguments.joined();
            let line = if arguments.is_empty() {
                command.to_string()
            } else {
                format!("{command} {arguments}")
            };

            self.tmux.execute_line(&line);
        }
    }

    fn target(&self, window: &str) -> String {
        format!("{}:{}", self.session_name, window)
    }

    fn run(&mut self, args: &[&str]) {
        self.tmux.execute(args, OutputMode::Inherit);
    }
}
