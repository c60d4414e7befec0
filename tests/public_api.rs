#![allow(unused_imports)]

use rawline::{
    column_width, decode_key, default_fatal_handler, display_width, Arrow, Editor, EditorConfig, EnvConfig,
    FatalHandler, History, Key, LineBuffer, LineError, LineRenderer, Navigation, ProcessTerminal, Terminal,
    TerminalGuard, UnknownEscape, WidthPolicy, DEFAULT_HISTORY_CAPACITY, DEFAULT_PROMPT,
};

#[test]
fn public_api_exports_compile() {}

#[test]
fn defaults_match_documented_values() {
    assert_eq!(DEFAULT_PROMPT, "> ");
    assert_eq!(DEFAULT_HISTORY_CAPACITY, 100);
    let config = EditorConfig::default();
    assert_eq!(config.prompt, DEFAULT_PROMPT);
    assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    assert_eq!(config.unknown_escape, UnknownEscape::Ignore);
    assert_eq!(config.width_policy, WidthPolicy::CodePoints);
}

#[test]
fn fatal_handler_type_accepts_default() {
    let handler: FatalHandler = default_fatal_handler;
    let _ = handler;
}
