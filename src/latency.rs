use std::time::Duration;
use tokio::time::sleep;

/// Simulated remote-API latency, awaited at the top of every repository
/// operation. The store underneath is local and synchronous; this keeps
/// the contract remote-API-shaped without any real transport.
///
/// Values are a profile, not semantics: reads are slower than writes in
/// name only order-wise, and tests run with `Latency::none()` so nothing
/// ever depends on the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    read: Duration,
    write: Duration,
    toggle: Duration,
}

impl Latency {
    pub fn simulated() -> Self {
        Self {
            read: Duration::from_millis(300),
            write: Duration::from_millis(250),
            toggle: Duration::from_millis(150),
        }
    }

    pub fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
            toggle: Duration::ZERO,
        }
    }

    /// Daemon default: simulated unless `SCHOLARD_LATENCY=off`.
    pub fn from_env() -> Self {
        match std::env::var("SCHOLARD_LATENCY") {
            Ok(v) if v.eq_ignore_ascii_case("off") || v == "0" => Self::none(),
            _ => Self::simulated(),
        }
    }

    pub async fn before_read(&self) {
        sleep(self.read).await;
    }

    pub async fn before_write(&self) {
        sleep(self.write).await;
    }

    pub async fn before_toggle(&self) {
        sleep(self.toggle).await;
    }
}
