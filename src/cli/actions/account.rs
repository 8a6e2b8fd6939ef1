use super::{enter, report};
use crate::{
    cli::globals::{GlobalArgs, Tab},
    flows::{self, LoginPage, SignupForm, SignupPage},
    session::{Location, Route},
    store::FlowMarker,
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

/// Shows where a path or link lands for this tab.
pub fn open(tab: &mut Tab, target: &str) -> Result<()> {
    let navigation = tab.machine.navigate(&Location::parse(target));
    match navigation.landed {
        Some(route) if navigation.allowed() => println!("Now at {route}"),
        Some(route) => println!("{} redirected to {route}", navigation.requested),
        None => println!("{} is still loading", navigation.requested),
    }
    Ok(())
}

pub async fn login(tab: &mut Tab, email: &str, password: &SecretString, wait: bool) -> Result<()> {
    enter(tab, &Location::new(Route::Login))?;

    let mut page = LoginPage::new(tab.machine.store().clone(), tab.backends.clone());
    let mut submission = page.submit(email, password.expose_secret()).await;

    if wait && !page.can_submit() {
        if let Some(notice) = &submission.notice {
            eprintln!("{notice}");
        }
        page.wait_for_unlock(|left| {
            if left > 0 {
                eprint!("\rTry again in {left:>3}s");
            } else {
                eprintln!();
            }
        })
        .await;
        submission = page.submit(email, password.expose_secret()).await;
    }

    report(tab, submission).await
}

pub async fn signup(tab: &mut Tab, form: &SignupForm) -> Result<()> {
    enter(tab, &Location::new(Route::Signup))?;

    let page = SignupPage::new(tab.machine.store().clone(), tab.backends.clone());
    let submission = page.submit(form).await;
    report(tab, submission).await
}

/// Signs out in every tab. The local session is cleared even when the auth
/// service cannot be told.
pub async fn logout(tab: &mut Tab) -> Result<()> {
    let transition = flows::sign_out(tab.machine.store(), &tab.backends).await;
    tab.machine.follow(transition).await;
    println!("Signed out.");
    Ok(())
}

pub fn status(tab: &Tab, globals: &GlobalArgs) {
    let store = tab.machine.store();

    println!("tab:     {}", globals.config.tab);
    println!("state:   {}", globals.config.state_dir.display());

    if store.is_authenticated() {
        let profile = store.cached_profile().unwrap_or_default();
        let who = profile.name.or(profile.email).unwrap_or_else(|| "unknown user".to_string());
        println!("session: signed in as {who}");
    } else {
        println!("session: signed out");
    }

    if let Some(marker) = store.signup_marker() {
        let stage = if marker.otp_pending {
            "verification pending"
        } else {
            "signup started"
        };
        println!("signup:  {stage} for {}", flows::mask_email(&marker.email));
    }
    if store.has_marker(FlowMarker::ResetToken) {
        println!("reset:   link stored");
    }
}
