//! Route workflow commands. Each maps one state-machine operation to text.

use anyhow::Result;
use std::path::PathBuf;

use greenroute_application::RouteProgress;
use greenroute_core::session::{Progress, Session};
use greenroute_core::stop::{CompletionPayload, PhotoAttachment, StopOutcome, StopView};

pub async fn login(progress: &RouteProgress, vehicle: &str, license: &str) -> Result<()> {
    let session = progress.authenticate(vehicle, license).await?;
    println!(
        "✅ Logged in as {} ({}, {} protocol)",
        session.driver_name(),
        session.vehicle_number(),
        session.protocol()
    );
    print_session_summary(&session);
    Ok(())
}

pub async fn current(progress: &RouteProgress, json: bool) -> Result<()> {
    match progress.current_stop().await? {
        Some(view) if json => println!("{}", serde_json::to_string_pretty(&view)?),
        Some(view) => print_stop(&view),
        None if progress.is_logged_in().await? => println!("🏁 Route complete, no stop remaining."),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn navigate(progress: &RouteProgress, json: bool) -> Result<()> {
    match progress.navigation().await? {
        Some(nav) if json => println!("{}", serde_json::to_string_pretty(&nav)?),
        Some(nav) => {
            println!("🧭 {} ({})", nav.customer_name, nav.address);
            println!("{}", nav.url);
        }
        None if progress.is_logged_in().await? => {
            println!("No coordinates for the current stop.")
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn start(progress: &RouteProgress) -> Result<()> {
    // Stop timing is advisory; the workflow continues either way.
    match progress.start_current_stop().await {
        Ok(started) => println!(
            "⏱  Stop started{}",
            started
                .pickup_started_at
                .map(|at| format!(" at {at}"))
                .unwrap_or_default()
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Could not start stop timing");
            println!("⚠️  Stop timing not recorded: {err}");
        }
    }
    Ok(())
}

pub async fn complete(
    progress: &RouteProgress,
    weight: Option<f64>,
    notes: Option<String>,
    photo: Option<PathBuf>,
) -> Result<()> {
    let payload = CompletionPayload {
        weight,
        notes,
        photo: photo.map(PhotoAttachment::new),
    };
    let outcome = progress.complete_current_stop(&payload).await?;
    print_outcome("completed", &outcome);
    Ok(())
}

pub async fn skip(progress: &RouteProgress, reason: &str) -> Result<()> {
    let outcome = progress.skip_current_stop(reason).await?;
    print_outcome("skipped", &outcome);
    Ok(())
}

pub async fn show_progress(progress: &RouteProgress, json: bool) -> Result<()> {
    match progress.progress().await? {
        Some(p) if json => println!("{}", serde_json::to_string_pretty(&p)?),
        Some(p) => print_progress(&p),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn remote_progress(progress: &RouteProgress) -> Result<()> {
    let remote = progress.remote_progress().await?;
    println!("{}", serde_json::to_string_pretty(&remote)?);
    Ok(())
}

pub async fn refresh(progress: &RouteProgress) -> Result<()> {
    let count = progress.refresh_pickups().await?;
    println!("🔄 {count} pickups cached");
    Ok(())
}

pub async fn status(progress: &RouteProgress, json: bool) -> Result<()> {
    let state = progress.state().await?;
    let session = progress.session().await?;
    if json {
        let value = serde_json::json!({ "state": state, "session": session });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("State: {state}");
    if session.is_none() {
        println!("New logins use the {} protocol.", progress.login_protocol());
    }
    if let Some(session) = session {
        println!(
            "Driver: {} ({}), logged in {}",
            session.driver_name(),
            session.vehicle_number(),
            session.authenticated_at().format("%Y-%m-%d %H:%M UTC")
        );
        print_session_summary(&session);
    }
    Ok(())
}

pub async fn logout(progress: &RouteProgress) -> Result<()> {
    progress.logout().await?;
    println!("👋 Logged out");
    Ok(())
}

fn print_session_summary(session: &Session) {
    match session {
        Session::Current(s) => println!(
            "Assignment {} on {}: stop {} of {}",
            s.assignment_id,
            s.route_date,
            s.current_sequence.min(s.total_stops),
            s.total_stops
        ),
        Session::Legacy(s) => println!(
            "Driver {}: pickup {} of {}",
            s.driver_id,
            (s.current_pickup_index + 1).min(s.total_pickups),
            s.total_pickups
        ),
    }
}

fn print_stop(view: &StopView) {
    let last = if view.is_last { " (last)" } else { "" };
    println!("📍 Stop {} of {}{}", view.position, view.total, last);
    println!("   {}", view.customer_name);
    println!("   {}", view.address);
    if let (Some(lat), Some(lon)) = (view.latitude, view.longitude) {
        println!("   {lat:.6}, {lon:.6}");
    }
    if let Some(date) = &view.next_pickup_date {
        println!("   Next pickup: {date}");
    }
}

fn print_progress(p: &Progress) {
    let status = if p.complete { " ✔" } else { "" };
    println!(
        "{}/{} stops ({}%), {} remaining{}",
        p.current, p.total, p.percentage, p.remaining, status
    );
}

fn print_outcome(verb: &str, outcome: &StopOutcome) {
    match outcome {
        StopOutcome::Next(view) => {
            println!("✅ Stop {verb}. Next:");
            print_stop(view);
        }
        StopOutcome::RouteComplete { total } => {
            println!("🏁 Stop {verb}. Route complete ({total} stops).");
        }
    }
}
