//! Output Rendering
//!
//! Turns `PushEvent`s into progress lines or NDJSON.
//!
//! On a terminal an action is announced before the remote operation runs
//! and completed afterwards (`path modified...` then `pushed`), so a slow
//! transfer shows what it is waiting on. Elsewhere each line is written once,
//! complete.

use std::io::{self, Write};

use crate::application::{Action, PushEvent};
use crate::config::SyncConfig;

/// How progress should look
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub quiet: bool,
    pub show_ignored: bool,
    pub json: bool,
    /// stdout is a terminal
    pub interactive: bool,
}

impl OutputOptions {
    pub fn from_config(config: &SyncConfig, interactive: bool) -> Self {
        Self {
            quiet: config.quiet,
            show_ignored: config.show_ignored,
            json: config.json,
            interactive,
        }
    }
}

/// Writes progress for one session
#[derive(Debug)]
pub struct ProgressPrinter<W: Write> {
    out: W,
    options: OutputOptions,
    /// An announced action is waiting for its result
    line_open: bool,
}

impl<W: Write> ProgressPrinter<W> {
    pub fn new(out: W, options: OutputOptions) -> Self {
        Self {
            out,
            options,
            line_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render one event
    pub fn handle(&mut self, event: &PushEvent) -> io::Result<()> {
        if self.options.json {
            writeln!(self.out, "{}", event.to_json())?;
            return self.out.flush();
        }

        match event {
            PushEvent::SessionStarted { .. } | PushEvent::ReconcileComplete => {}
            PushEvent::ReconcileStarted { .. } => self.status("Performing initial one-way sync")?,
            PushEvent::Waiting => self.status("Startup complete, waiting for file changes")?,
            PushEvent::Shutdown => self.status("Done")?,
            PushEvent::ActionStarted { action } => {
                if self.options.interactive && !self.options.quiet {
                    write!(self.out, "{}...", action.describe())?;
                    self.line_open = true;
                }
            }
            PushEvent::Pushed { action } => {
                if !self.options.quiet {
                    self.complete(action, "pushed")?;
                }
            }
            PushEvent::Failed { action, error } => {
                // Failures are shown even when quiet
                self.complete(action, &format!("failed ({})", error))?;
            }
            PushEvent::Ignored { action } => {
                if self.options.show_ignored && !self.options.quiet {
                    writeln!(self.out, "{} (ignored)", action.describe())?;
                }
            }
        }
        self.out.flush()
    }

    fn status(&mut self, message: &str) -> io::Result<()> {
        if !self.options.quiet {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn complete(&mut self, action: &Action, result: &str) -> io::Result<()> {
        if self.line_open {
            self.line_open = false;
            writeln!(self.out, "{}", result)
        } else {
            writeln!(self.out, "{}...{}", action.describe(), result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ActionKind;
    use crate::domain::value_objects::RelPath;

    fn rel(p: &str) -> RelPath {
        RelPath::new(p).unwrap()
    }

    fn session() -> Vec<PushEvent> {
        let modified = Action::new(ActionKind::Modified, &rel("src/main.rs"));
        let moved = Action::moved(&rel("a.txt"), &rel("b.txt"));
        let deleted = Action::new(ActionKind::Deleted, &rel("gone.txt"));
        vec![
            PushEvent::SessionStarted {
                target: "dev@box:/srv/app/".to_string(),
                local_root: "/work/repo".to_string(),
                policy: "git".to_string(),
            },
            PushEvent::ReconcileStarted {
                excluded: 2,
                delete: "extraneous".to_string(),
            },
            PushEvent::ReconcileComplete,
            PushEvent::Waiting,
            PushEvent::ActionStarted {
                action: modified.clone(),
            },
            PushEvent::Pushed { action: modified },
            PushEvent::Ignored {
                action: Action::new(ActionKind::Created, &rel("build/out.o")),
            },
            PushEvent::ActionStarted {
                action: moved.clone(),
            },
            PushEvent::Pushed { action: moved },
            PushEvent::ActionStarted {
                action: deleted.clone(),
            },
            PushEvent::Failed {
                action: deleted,
                error: "connection to box lost".to_string(),
            },
            PushEvent::Shutdown,
        ]
    }

    fn render(options: OutputOptions) -> String {
        let mut printer = ProgressPrinter::new(Vec::new(), options);
        for event in session() {
            printer.handle(&event).unwrap();
        }
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn plain_output_writes_complete_lines() {
        insta::assert_snapshot!(render(OutputOptions::default()), @r"
        Performing initial one-way sync
        Startup complete, waiting for file changes
        src/main.rs modified...pushed
        a.txt moved to b.txt...pushed
        gone.txt deleted...failed (connection to box lost)
        Done
        ");
    }

    #[test]
    fn interactive_output_matches_plain_output() {
        let interactive = render(OutputOptions {
            interactive: true,
            ..OutputOptions::default()
        });
        assert_eq!(interactive, render(OutputOptions::default()));
    }

    #[test]
    fn interactive_announces_before_result() {
        let mut printer = ProgressPrinter::new(
            Vec::new(),
            OutputOptions {
                interactive: true,
                ..OutputOptions::default()
            },
        );
        let action = Action::new(ActionKind::Created, &rel("x"));
        printer
            .handle(&PushEvent::ActionStarted {
                action: action.clone(),
            })
            .unwrap();
        assert_eq!(printer.out, b"x created...");
        printer.handle(&PushEvent::Pushed { action }).unwrap();
        assert_eq!(printer.out, b"x created...pushed\n");
    }

    #[test]
    fn show_ignored_adds_ignored_lines() {
        let out = render(OutputOptions {
            show_ignored: true,
            ..OutputOptions::default()
        });
        assert!(out.contains("build/out.o created (ignored)\n"));
    }

    #[test]
    fn quiet_keeps_only_failures() {
        let out = render(OutputOptions {
            quiet: true,
            show_ignored: true,
            interactive: true,
            ..OutputOptions::default()
        });
        assert_eq!(out, "gone.txt deleted...failed (connection to box lost)\n");
    }

    #[test]
    fn json_writes_one_object_per_event() {
        let out = render(OutputOptions {
            json: true,
            quiet: true,
            ..OutputOptions::default()
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), session().len());
        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["command"], "push");
        }
        assert!(lines[0].contains(r#""event":"session_started""#));
        assert!(lines[6].contains(r#""event":"ignored""#));
    }
}
