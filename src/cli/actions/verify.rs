use super::{enter, report};
use crate::{
    cli::globals::Tab,
    flows::{VerifyOtpPage, VerifyPendingPage},
    session::{Location, Route},
};
use anyhow::{bail, Result};

async fn open_otp_page(tab: &mut Tab) -> Result<VerifyOtpPage> {
    enter(tab, &Location::new(Route::VerifyOtp))?;

    match VerifyOtpPage::open(tab.machine.store().clone(), tab.backends.clone()) {
        Ok(page) => Ok(page),
        Err(redirect) => {
            let navigation = tab.machine.follow(redirect).await;
            match navigation.landed {
                Some(route) => bail!("No verification pending; redirected to {route}"),
                None => bail!("No verification pending"),
            }
        }
    }
}

pub async fn verify_otp(tab: &mut Tab, otp: &str) -> Result<()> {
    let page = open_otp_page(tab).await?;
    println!("{}", page.greeting());

    let submission = page.verify(otp).await;
    report(tab, submission).await
}

pub async fn resend_otp(tab: &mut Tab) -> Result<()> {
    let mut page = open_otp_page(tab).await?;
    let submission = page.resend().await;
    report(tab, submission).await
}

pub async fn pending(tab: &mut Tab, resend: bool) -> Result<()> {
    enter(tab, &Location::new(Route::VerifyPending))?;

    let mut page = VerifyPendingPage::open(tab.machine.store().clone(), tab.backends.clone());
    println!(
        "Your email {} is not verified yet. Check your inbox for the code.",
        page.masked_email()
    );

    if resend {
        let submission = page.resend().await;
        return report(tab, submission).await;
    }

    let cooldown = page.cooldown();
    if cooldown.is_running() {
        println!("A new code can be requested in {}s.", cooldown.remaining());
    }
    println!("Run `chatgate verify-otp --otp <code>` to verify now.");
    Ok(())
}
