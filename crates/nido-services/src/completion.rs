//! Completion sweeper
//!
//! Background task that promotes confirmed reservations to completed
//! once their slot has elapsed. Pending reservations are never touched;
//! an unanswered request simply stays pending until someone cancels it.

use nido_core::traits::ReservationRepository;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Periodic sweep that completes elapsed confirmed reservations
pub struct CompletionSweeper<R: ReservationRepository> {
    reservation_repo: Arc<R>,
    sweep_interval: Duration,
}

impl<R: ReservationRepository> CompletionSweeper<R> {
    pub fn new(reservation_repo: Arc<R>, sweep_interval_secs: u64) -> Self {
        Self {
            reservation_repo,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
        }
    }

    /// Run the sweep loop forever
    ///
    /// Store errors are logged and the loop keeps going; the next tick
    /// picks up whatever the failed sweep left behind.
    pub async fn run(self) {
        let mut ticker = interval(self.sweep_interval);
        info!(
            "Completion sweeper started (interval: {}s)",
            self.sweep_interval.as_secs()
        );

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    async fn sweep_once(&self) {
        let now = Utc::now().naive_utc();
        match self.reservation_repo.complete_elapsed(now).await {
            Ok(0) => {}
            Ok(n) => info!("Completed {} elapsed reservations", n),
            Err(e) => error!("Completion sweep failed: {}", e),
        }
    }
}
