use crate::{
    cli::{
        actions::Action,
        commands::pages::{
            ARG_CONFIRM_PASSWORD, ARG_EMAIL, ARG_MESSAGE, ARG_MOBILE, ARG_NAME, ARG_OTP,
            ARG_PASSWORD, ARG_RESEND, ARG_TARGET, ARG_TOKEN, ARG_WAIT, CMD_CHAT,
            CMD_FORGOT_PASSWORD, CMD_LOGIN, CMD_LOGOUT, CMD_OPEN, CMD_RESEND_OTP,
            CMD_RESET_PASSWORD, CMD_SIGNUP, CMD_STATUS, CMD_VERIFY_OTP, CMD_VERIFY_PENDING,
        },
    },
    flows::SignupForm,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("missing required argument: --{id}"))
}

pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches.subcommand().context("subcommand not found")?;

    let action = match name {
        CMD_OPEN => Action::Open {
            target: required(sub_m, ARG_TARGET)?,
        },
        CMD_LOGIN => Action::Login {
            email: required(sub_m, ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
            wait: sub_m.get_flag(ARG_WAIT),
        },
        CMD_SIGNUP => Action::Signup(SignupForm {
            name: required(sub_m, ARG_NAME)?,
            email: required(sub_m, ARG_EMAIL)?,
            mobile: required(sub_m, ARG_MOBILE)?,
            password: required(sub_m, ARG_PASSWORD)?,
            confirm_password: required(sub_m, ARG_CONFIRM_PASSWORD)?,
        }),
        CMD_VERIFY_OTP => Action::VerifyOtp {
            otp: required(sub_m, ARG_OTP)?,
        },
        CMD_RESEND_OTP => Action::ResendOtp,
        CMD_VERIFY_PENDING => Action::VerifyPending {
            resend: sub_m.get_flag(ARG_RESEND),
        },
        CMD_FORGOT_PASSWORD => Action::ForgotPassword {
            email: required(sub_m, ARG_EMAIL)?,
        },
        CMD_RESET_PASSWORD => Action::ResetPassword {
            password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
            confirmation: SecretString::from(required(sub_m, ARG_CONFIRM_PASSWORD)?),
            token: sub_m.get_one::<String>(ARG_TOKEN).cloned(),
        },
        CMD_CHAT => Action::Chat {
            messages: sub_m
                .get_many::<String>(ARG_MESSAGE)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        },
        CMD_LOGOUT => Action::Logout,
        CMD_STATUS => Action::Status,
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Action {
        temp_env::with_vars([("CHATGATE_PASSWORD", None::<&str>)], || {
            let matches = commands::new().get_matches_from(args);
            handler(&matches).unwrap()
        })
    }

    #[test]
    fn test_login_action() {
        let action = dispatch(&["chatgate", "login", "--email", "a@b.co", "--password", "Pw1!"]);
        match action {
            Action::Login {
                email,
                password,
                wait,
            } => {
                assert_eq!(email, "a@b.co");
                assert_eq!(password.expose_secret(), "Pw1!");
                assert!(!wait);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_signup_action() {
        let action = dispatch(&[
            "chatgate",
            "signup",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--mobile",
            "9876543210",
            "--password",
            "Secret1!",
            "--confirm-password",
            "Secret1!",
        ]);
        let Action::Signup(form) = action else {
            panic!("expected signup action");
        };
        assert_eq!(form.name, "Ada");
        assert_eq!(form.mobile, "9876543210");
        assert_eq!(form.password, form.confirm_password);
    }

    #[test]
    fn test_reset_password_token_is_optional() {
        let action = dispatch(&[
            "chatgate",
            "reset-password",
            "--password",
            "Secret1!",
            "--confirm-password",
            "Secret1!",
        ]);
        assert!(matches!(action, Action::ResetPassword { token: None, .. }));

        let action = dispatch(&[
            "chatgate",
            "reset-password",
            "--password",
            "Secret1!",
            "--confirm-password",
            "Secret1!",
            "--token",
            "XYZ",
        ]);
        assert!(matches!(
            action,
            Action::ResetPassword { token: Some(ref t), .. } if t == "XYZ"
        ));
    }

    #[test]
    fn test_simple_actions() {
        assert!(matches!(dispatch(&["chatgate", "status"]), Action::Status));
        assert!(matches!(dispatch(&["chatgate", "logout"]), Action::Logout));
        assert!(matches!(
            dispatch(&["chatgate", "verify-pending", "--resend"]),
            Action::VerifyPending { resend: true }
        ));
        assert!(matches!(
            dispatch(&["chatgate", "chat"]),
            Action::Chat { ref messages } if messages.is_empty()
        ));
    }
}
