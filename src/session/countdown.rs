//! Local, advisory countdowns. The backend's next response is authoritative;
//! these only pace the UI.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Lockout length used when the backend omits `remainingSeconds`.
pub const DEFAULT_LOCKOUT_SECS: u32 = 60;
/// Minimum spacing between OTP sends.
pub const RESEND_COOLDOWN_SECS: u32 = 30;

const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.remaining > 0
    }

    /// Advances one second; returns what is left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// Ticks once per second until zero, reporting each remaining value.
    pub async fn run(mut self, mut on_tick: impl FnMut(u32)) {
        let mut interval = tokio::time::interval(TICK);
        // first tick completes immediately
        interval.tick().await;
        while self.is_running() {
            interval.tick().await;
            on_tick(self.tick());
        }
    }
}

/// Cooldown left before another OTP may be requested.
#[must_use]
pub fn resend_cooldown(last_sent: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Countdown {
    let Some(last_sent) = last_sent else {
        return Countdown::default();
    };
    let elapsed = (now - last_sent).num_seconds().max(0);
    let cooldown = i64::from(RESEND_COOLDOWN_SECS);
    if elapsed < cooldown {
        Countdown::new(u32::try_from(cooldown - elapsed).unwrap_or(RESEND_COOLDOWN_SECS))
    } else {
        Countdown::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn tick_counts_down_to_zero() {
        let mut countdown = Countdown::new(3);
        assert!(countdown.is_running());
        assert_eq!(countdown.tick(), 2);
        assert_eq!(countdown.tick(), 1);
        assert_eq!(countdown.tick(), 0);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), 0);
    }

    #[test]
    fn resend_cooldown_from_last_sent() {
        let now = Utc::now();
        assert_eq!(resend_cooldown(None, now).remaining(), 0);
        assert_eq!(resend_cooldown(Some(now), now).remaining(), 30);
        assert_eq!(
            resend_cooldown(Some(now - ChronoDuration::seconds(12)), now).remaining(),
            18
        );
        assert_eq!(
            resend_cooldown(Some(now - ChronoDuration::seconds(30)), now).remaining(),
            0
        );
        // clock skew never extends the cooldown
        assert_eq!(
            resend_cooldown(Some(now + ChronoDuration::seconds(90)), now).remaining(),
            30
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_reports_every_step() {
        let mut seen = Vec::new();
        Countdown::new(3).run(|left| seen.push(left)).await;
        assert_eq!(seen, vec![2, 1, 0]);
    }
}
