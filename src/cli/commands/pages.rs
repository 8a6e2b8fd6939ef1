use clap::{Arg, ArgAction, Command};

pub const CMD_OPEN: &str = "open";
pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";
pub const CMD_VERIFY_OTP: &str = "verify-otp";
pub const CMD_RESEND_OTP: &str = "resend-otp";
pub const CMD_VERIFY_PENDING: &str = "verify-pending";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_CHAT: &str = "chat";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_STATUS: &str = "status";

pub const ARG_TARGET: &str = "target";
pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_MOBILE: &str = "mobile";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_WAIT: &str = "wait";
pub const ARG_OTP: &str = "otp";
pub const ARG_RESEND: &str = "resend";
pub const ARG_TOKEN: &str = "token";
pub const ARG_MESSAGE: &str = "message";

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .long(ARG_EMAIL)
        .help("Account email address")
        .required(true)
}

fn password() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("CHATGATE_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn confirm_password() -> Arg {
    Arg::new(ARG_CONFIRM_PASSWORD)
        .long(ARG_CONFIRM_PASSWORD)
        .help("Password confirmation")
        .hide_env_values(true)
        .required(true)
}

/// One subcommand per page of the web client, plus session housekeeping.
#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Navigate to a page or link, e.g. /chat or /reset-password?token=XYZ")
                .arg(Arg::new(ARG_TARGET).required(true)),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and open the chat")
                .arg(email())
                .arg(password())
                .arg(
                    Arg::new(ARG_WAIT)
                        .long(ARG_WAIT)
                        .help("When the account is locked, wait out the lockout and retry once")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_SIGNUP)
                .about("Register a new account and start email verification")
                .arg(
                    Arg::new(ARG_NAME)
                        .long(ARG_NAME)
                        .help("Display name")
                        .required(true),
                )
                .arg(email())
                .arg(
                    Arg::new(ARG_MOBILE)
                        .long(ARG_MOBILE)
                        .help("10-digit mobile number")
                        .required(true),
                )
                .arg(password())
                .arg(confirm_password()),
        )
        .subcommand(
            Command::new(CMD_VERIFY_OTP)
                .about("Submit the one-time code sent after signup")
                .arg(
                    Arg::new(ARG_OTP)
                        .long(ARG_OTP)
                        .help("One-time code from the verification email")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_RESEND_OTP).about("Request a new one-time code"))
        .subcommand(
            Command::new(CMD_VERIFY_PENDING)
                .about("Show the pending verification for an unverified login")
                .arg(
                    Arg::new(ARG_RESEND)
                        .long(ARG_RESEND)
                        .help("Send a new verification code")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Request a password reset link")
                .arg(email()),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password from a reset link")
                .arg(password())
                .arg(confirm_password())
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long(ARG_TOKEN)
                        .help("Reset token from the emailed link"),
                ),
        )
        .subcommand(
            Command::new(CMD_CHAT)
                .about("Chat with the assistant; reads stdin when no message is given")
                .arg(
                    Arg::new(ARG_MESSAGE)
                        .short('m')
                        .long(ARG_MESSAGE)
                        .help("Message to send; repeat for several turns")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out in every tab"))
        .subcommand(Command::new(CMD_STATUS).about("Show session and flow state for this tab"))
}
