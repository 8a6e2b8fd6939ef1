use super::{enter, report};
use crate::{
    cli::globals::Tab,
    flows::{ForgotPasswordPage, Notice, ResetPasswordPage},
    session::{transitions::FORGOT_PASSWORD_REDIRECT_SECS, Countdown, Location, Route, RESET_TOKEN_PARAM},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

/// Requests a reset link, then counts down to the login page.
pub async fn forgot(tab: &mut Tab, email: &str) -> Result<()> {
    enter(tab, &Location::new(Route::ForgotPassword))?;

    let page = ForgotPasswordPage::new(tab.backends.clone());
    let submission = page.submit(email).await;

    let (Some(Notice::Success(text)), Some(transition)) =
        (submission.notice.clone(), submission.transition)
    else {
        return report(tab, submission).await;
    };

    println!("{text}");
    Countdown::new(FORGOT_PASSWORD_REDIRECT_SECS)
        .run(|left| {
            if left > 0 {
                eprint!("\rRedirecting in {left}...");
            } else {
                eprintln!();
            }
        })
        .await;

    if let Some(route) = tab.machine.navigate(&Location::new(transition.to)).landed {
        println!("Now at {route}");
    }
    Ok(())
}

/// Sets a new password. A token from the emailed link is stored on entry;
/// without one the token already stored in this tab is used.
pub async fn reset(
    tab: &mut Tab,
    password: &SecretString,
    confirmation: &SecretString,
    token: Option<&str>,
) -> Result<()> {
    let mut location = Location::new(Route::ResetPassword);
    if let Some(token) = token {
        location = location.with_query(RESET_TOKEN_PARAM, token);
    }
    enter(tab, &location)?;

    let page = ResetPasswordPage::new(tab.machine.store().clone(), tab.backends.clone());
    let submission = page
        .submit(password.expose_secret(), confirmation.expose_secret())
        .await;
    report(tab, submission).await
}
