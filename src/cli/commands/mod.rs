pub mod endpoints;
pub mod logging;
pub mod pages;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str =
        Box::leak(format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str());

    let command = Command::new("chatgate")
        .about("Sign in, verify and chat from the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles);

    let command = endpoints::with_args(command);
    let command = logging::with_args(command);
    pages::with_subcommands(command)
}
