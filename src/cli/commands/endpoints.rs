use crate::config::{ConfigOverrides, DEFAULT_AUTH_URL, DEFAULT_CHAT_URL, DEFAULT_GEO_URL};
use clap::{Arg, ArgMatches, Command};

pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_CHAT_URL: &str = "chat-url";
pub const ARG_GEO_URL: &str = "geo-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TAB: &str = "tab";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_SCREEN: &str = "screen";

/// Backend endpoints and local state location, shared by every subcommand.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help(format!("Auth service base URL (default: {DEFAULT_AUTH_URL})"))
                .env("CHATGATE_AUTH_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CHAT_URL)
                .long(ARG_CHAT_URL)
                .help(format!("Chat service base URL (default: {DEFAULT_CHAT_URL})"))
                .env("CHATGATE_CHAT_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_GEO_URL)
                .long(ARG_GEO_URL)
                .help(format!("IP geolocation endpoint (default: {DEFAULT_GEO_URL})"))
                .env("CHATGATE_GEO_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long(ARG_STATE_DIR)
                .help("Directory holding session and tab state (default: ~/.chatgate)")
                .env("CHATGATE_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TAB)
                .long(ARG_TAB)
                .help("Tab name; each tab keeps its own flow markers")
                .env("CHATGATE_TAB")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("CHATGATE_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SCREEN)
                .long(ARG_SCREEN)
                .help("Screen size reported with device metadata, as WIDTHxHEIGHT")
                .env("CHATGATE_SCREEN")
                .global(true),
        )
}

/// Raw endpoint values; defaults are applied by `AppConfig::load`.
#[must_use]
pub fn overrides(matches: &ArgMatches) -> ConfigOverrides {
    let value = |id: &str| matches.get_one::<String>(id).cloned();
    ConfigOverrides {
        auth_base_url: value(ARG_AUTH_URL),
        chat_base_url: value(ARG_CHAT_URL),
        geo_url: value(ARG_GEO_URL),
        state_dir: value(ARG_STATE_DIR),
        tab: value(ARG_TAB),
        request_timeout_secs: matches.get_one::<u64>(ARG_TIMEOUT).copied(),
        screen: value(ARG_SCREEN),
    }
}
