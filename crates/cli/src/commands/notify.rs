//! # Open-Points Reminder Command
//!
//! The scheduled escalation job: one pass over open points, then exit.
//! An external scheduler (cron, typically twice daily) owns the cadence;
//! re-runs re-send the same reminders.

use error::Result;
use server::{jobs, notify::push::PushClient, settings::ServerSettings};
use tracing::info;

/// Runs one open-points reminder pass.
pub async fn notify_open_points() -> Result<()> {
    let db = migration::db::connect_from_env().await?;

    let settings = ServerSettings::from_env();
    let push = PushClient::new(settings.push_endpoint, settings.push_api_key);

    let summary = jobs::run_open_points_job(&db, &push).await?;

    info!(
        target: "notify",
        open_points = summary.open_points,
        admins_notified = summary.admins_notified,
        engineers_notified = summary.engineers_notified,
        overdue_notifications = summary.overdue_notifications,
        "Reminder pass finished"
    );

    Ok(())
}
