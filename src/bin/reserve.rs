// Books one vehicle for a date range against a running backend.
//
// usage: reserve <vehicle-id> <first-day> <second-day> [--dry-run]

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vehicle_booking::{
    BookingDialog, ClientConfig, DateOnly, DayMarking, DialogOptions, HttpReservationApi,
    ReservationApi, SideEffect, TapOutcome,
};

struct Args {
    vehicle_id: i64,
    first: DateOnly,
    second: DateOnly,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut dry_run = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            _ => positional.push(arg),
        }
    }
    if positional.len() != 3 {
        bail!("usage: reserve <vehicle-id> <first-day> <second-day> [--dry-run]");
    }
    Ok(Args {
        vehicle_id: positional[0]
            .parse()
            .with_context(|| format!("invalid vehicle id '{}'", positional[0]))?,
        first: positional[1].parse()?,
        second: positional[2].parse()?,
        dry_run,
    })
}

fn marking_symbol(marking: DayMarking) -> char {
    match marking {
        DayMarking::Free => '.',
        DayMarking::Blocked => 'x',
        DayMarking::SelectionStart => '[',
        DayMarking::SelectionMiddle => '=',
        DayMarking::SelectionEnd => ']',
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args()?;
    let config = ClientConfig::from_env()?;
    let options = DialogOptions::from_config(&config);
    let api = Arc::new(HttpReservationApi::new(config)?);

    let vehicle = api
        .fetch_vehicle(args.vehicle_id)
        .await
        .context("could not load vehicle")?;
    if !vehicle.is_rental() {
        bail!("vehicle {} is listed for sale, not rental", vehicle.id);
    }
    info!(vehicle_id = vehicle.id, rate = vehicle.daily_rate(), "vehicle loaded");

    let dialog = BookingDialog::new(Arc::clone(&api), options);
    dialog.open(args.vehicle_id, vehicle.daily_rate()).await?;

    for date in [args.first, args.second] {
        if let TapOutcome::Applied { effect, .. } = dialog.tap(date)? {
            if let Some(notice) = effect.notice() {
                bail!("{}: {}", date, notice);
            }
            if effect == SideEffect::RecomputeCost {
                info!(%date, "range confirmed");
            }
        }
    }

    let view = dialog.view();
    let interval = view
        .selection
        .confirmed()
        .context("no date range was confirmed")?;

    for (day, marking) in &view.markings {
        println!("{}  {}", day, marking_symbol(*marking));
    }
    let total = view.cost.unwrap_or_default();
    println!(
        "{} {}: {} ({} days) = {}",
        vehicle.marca, vehicle.modelo, interval, total.days, total
    );

    if args.dry_run {
        dialog.close();
        return Ok(());
    }

    let record = dialog.submit().await?;
    println!(
        "reservation {} created, pending owner confirmation",
        record.id.map_or_else(|| "?".to_string(), |id| id.to_string())
    );
    Ok(())
}
