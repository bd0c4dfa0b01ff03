//! Terminal colors for status lines
//!
//! Applies ANSI escape codes using crossterm, honoring `NO_COLOR` and
//! whether stdout is a terminal.

use crossterm::style::{Color, Stylize};

/// When to colorize output
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Formats success and failure lines, with or without color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(choice: ColorChoice) -> Self {
        let enabled = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none()
                    && crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        };
        Self { enabled }
    }

    /// A painter that never emits escape codes
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn success(&self, message: &str) -> String {
        self.paint(message, Color::Green)
    }

    pub fn failure(&self, message: &str) -> String {
        self.paint(message, Color::Red)
    }

    pub fn heading(&self, message: &str) -> String {
        self.paint(message, Color::Cyan)
    }

    fn paint(&self, message: &str, color: Color) -> String {
        if self.enabled {
            format!("{}", message.with(color))
        } else {
            message.to_string()
        }
    }
}
