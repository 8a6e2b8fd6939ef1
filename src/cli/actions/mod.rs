pub mod account;
pub mod chat;
pub mod password;
pub mod verify;

use crate::{
    cli::globals::{GlobalArgs, Tab},
    flows::{Notice, SignupForm, Submission},
    session::Location,
};
use anyhow::{bail, Result};
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Open {
        target: String,
    },
    Login {
        email: String,
        password: SecretString,
        wait: bool,
    },
    Signup(SignupForm),
    VerifyOtp {
        otp: String,
    },
    ResendOtp,
    VerifyPending {
        resend: bool,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        password: SecretString,
        confirmation: SecretString,
        token: Option<String>,
    },
    Chat {
        messages: Vec<String>,
    },
    Logout,
    Status,
}

/// Runs one action in a freshly opened tab.
///
/// # Errors
/// Returns an error when a gate refuses the page or the page reports a failure.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let mut tab = globals.open_tab()?;

    match action {
        Action::Open { target } => account::open(&mut tab, &target),
        Action::Login {
            email,
            password,
            wait,
        } => account::login(&mut tab, &email, &password, wait).await,
        Action::Signup(form) => account::signup(&mut tab, &form).await,
        Action::VerifyOtp { otp } => verify::verify_otp(&mut tab, &otp).await,
        Action::ResendOtp => verify::resend_otp(&mut tab).await,
        Action::VerifyPending { resend } => verify::pending(&mut tab, resend).await,
        Action::ForgotPassword { email } => password::forgot(&mut tab, &email).await,
        Action::ResetPassword {
            password,
            confirmation,
            token,
        } => password::reset(&mut tab, &password, &confirmation, token.as_deref()).await,
        Action::Chat { messages } => chat::handle(&mut tab, messages).await,
        Action::Logout => account::logout(&mut tab).await,
        Action::Status => {
            account::status(&tab, globals);
            Ok(())
        }
    }
}

/// Navigates to `location`. A gate redirect ends the command.
fn enter(tab: &mut Tab, location: &Location) -> Result<()> {
    let navigation = tab.machine.navigate(location);
    if navigation.allowed() {
        return Ok(());
    }
    match navigation.landed {
        Some(route) => bail!("{} is not available; redirected to {route}", navigation.requested),
        None => bail!("{} is not available yet", navigation.requested),
    }
}

/// Shows the page's notice and follows its transition. An error notice fails
/// the command after the transition has run.
async fn report(tab: &mut Tab, submission: Submission) -> Result<()> {
    let Submission { notice, transition } = submission;

    if let Some(Notice::Info(text) | Notice::Success(text)) = &notice {
        println!("{text}");
    }

    if let Some(transition) = transition {
        let navigation = tab.machine.follow(transition).await;
        if let Some(route) = navigation.landed {
            println!("Now at {route}");
        }
    }

    match notice {
        Some(Notice::Error(text)) => bail!(text),
        _ => Ok(()),
    }
}
