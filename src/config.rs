//! Editor and environment configuration.

use std::env;

use crate::core::history::DEFAULT_HISTORY_CAPACITY;
use crate::core::width::WidthPolicy;

pub const DEFAULT_PROMPT: &str = "> ";
/// `VTIME` for raw reads: 10 deciseconds.
pub const DEFAULT_READ_TIMEOUT_DECISECONDS: u8 = 10;

/// What to do with an ESC that is not followed by `[`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownEscape {
    /// Drop the sequence and keep editing.
    #[default]
    Ignore,
    /// Finish the line as if Enter had been pressed.
    Submit,
}

/// Raw environment values; unset or empty variables are `None`/`false`.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub prompt: Option<String>,
    pub history_size: Option<String>,
    pub write_log: Option<String>,
    pub log_file: Option<String>,
    pub wide_chars: bool,
    pub strict_escapes: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            prompt: env_string_opt("RAWLINE_PROMPT"),
            history_size: env_string_opt("RAWLINE_HISTORY_SIZE"),
            write_log: env_string_opt("RAWLINE_WRITE_LOG"),
            log_file: env_string_opt("RAWLINE_LOG"),
            wide_chars: env_flag("RAWLINE_WIDE_CHARS"),
            strict_escapes: env_flag("RAWLINE_STRICT_ESCAPES"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub prompt: String,
    pub history_capacity: usize,
    pub read_timeout_deciseconds: u8,
    pub width_policy: WidthPolicy,
    pub unknown_escape: UnknownEscape,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            read_timeout_deciseconds: DEFAULT_READ_TIMEOUT_DECISECONDS,
            width_policy: WidthPolicy::CodePoints,
            unknown_escape: UnknownEscape::Ignore,
        }
    }
}

impl EditorConfig {
    /// Defaults overridden by `RAWLINE_*` variables.
    pub fn from_env() -> Self {
        Self::default().with_env(&EnvConfig::from_env())
    }

    #[must_use]
    pub fn with_env(mut self, env: &EnvConfig) -> Self {
        if let Some(prompt) = env.prompt.as_ref() {
            self.prompt = prompt.clone();
        }
        if let Some(capacity) = env
            .history_size
            .as_deref()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|capacity| *capacity > 0)
        {
            self.history_capacity = capacity;
        }
        if env.wide_chars {
            self.width_policy = WidthPolicy::Columns;
        }
        if env.strict_escapes {
            self.unknown_escape = UnknownEscape::Submit;
        }
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_read_timeout_deciseconds(mut self, deciseconds: u8) -> Self {
        self.read_timeout_deciseconds = deciseconds;
        self
    }

    #[must_use]
    pub fn with_width_policy(mut self, policy: WidthPolicy) -> Self {
        self.width_policy = policy;
        self
    }

    #[must_use]
    pub fn with_unknown_escape(mut self, policy: UnknownEscape) -> Self {
        self.unknown_escape = policy;
        self
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
