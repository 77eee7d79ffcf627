use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use vacancy::{
    Engine, EngineConfig, EventRegistry, InMemoryDirectory, InMemoryInventory, Requester,
    Resource, Tier, TierPriorityPolicy, TokioScheduler,
};

/// Rooms split 60/20/20 across standard, gold and platinum.
fn seed_rooms(count: usize) -> Vec<Resource> {
    (1..=count)
        .map(|i| {
            let tier = match (i - 1) * 10 / count.max(1) {
                0..=5 => Tier::Standard,
                6..=7 => Tier::Gold,
                _ => Tier::Platinum,
            };
            Resource::new(format!("R{i}"), tier)
        })
        .collect()
}

/// Guests split 50/30/20 across standard, gold and platinum.
fn seed_guests(count: usize) -> Vec<Requester> {
    (1..=count)
        .map(|i| {
            let tier = match (i - 1) * 10 / count.max(1) {
                0..=4 => Tier::Standard,
                5..=7 => Tier::Gold,
                _ => Tier::Platinum,
            };
            Requester::new(format!("G{i}"), tier).with_name(format!("GuestName{i}"))
        })
        .collect()
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("VACANCY_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    vacancy::observability::init(metrics_port)?;

    let config = EngineConfig::from_env();
    let room_count = env_usize("VACANCY_ROOMS", 50);
    let guest_count = env_usize("VACANCY_GUESTS", 100);

    info!("vacancy simulation");
    info!("  rooms: {room_count}");
    info!("  guests: {guest_count}");
    info!("  promotion_delay: {:?}", config.promotion_delay);
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let engine = Engine::new(
        config,
        Arc::new(InMemoryDirectory::new(seed_guests(guest_count))),
        Box::new(InMemoryInventory::new(seed_rooms(room_count))),
        Arc::new(TierPriorityPolicy),
        Arc::new(TokioScheduler::current()?),
        Arc::new(EventRegistry::new()),
    );
    engine.subscribe(|b: &vacancy::Booking| {
        info!(
            "waiting guest {} confirmed into room {}",
            b.requester_id(),
            b.resource_id().unwrap_or("-")
        );
    });

    // Every standard guest checks in at once; more of them than standard rooms.
    let standard: Vec<String> = seed_guests(guest_count)
        .into_iter()
        .filter(|g| g.tier == Tier::Standard)
        .map(|g| g.id)
        .collect();
    let check_ins = standard.into_iter().map(|guest| {
        let engine = engine.clone();
        tokio::task::spawn_blocking(move || engine.check_in(&guest))
    });
    for result in join_all(check_ins).await {
        if let Err(e) = result? {
            tracing::error!("check-in failed: {e}");
        }
    }
    info!("waiting list size: {}", engine.waiting_list().len());
    info!("occupancy ratio: {:.1}%", engine.occupancy_ratio()?);

    // Then a wave of check-outs hands rooms to the waiting list.
    let checkout_count = room_count.min(20);
    let check_outs = (1..=checkout_count).map(|i| {
        let engine = engine.clone();
        tokio::task::spawn_blocking(move || engine.check_out(&format!("R{i}")))
    });
    for result in join_all(check_outs).await {
        if let Err(e) = result? {
            tracing::error!("check-out failed: {e}");
        }
    }
    info!("waiting list size: {}", engine.waiting_list().len());
    info!("occupancy ratio: {:.1}%", engine.occupancy_ratio()?);
    info!("waiting list: {}", serde_json::to_string(&engine.waiting_list())?);

    info!("vacancy simulation done");
    Ok(())
}
