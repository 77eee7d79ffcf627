use std::sync::Arc;
use std::time::{Duration, Instant};

use vacancy::{
    Engine, EngineConfig, EventRegistry, InMemoryDirectory, InMemoryInventory, Requester,
    Resource, Tier, TierPriorityPolicy, TokioScheduler,
};

const ROOMS: usize = 500;
const GUESTS: usize = 1000;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}ms, p50={:.3}ms, p95={:.3}ms, p99={:.3}ms, max={:.3}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies.last().unwrap().as_secs_f64() * 1000.0,
    );
}

fn tier_for(i: usize, n: usize) -> Tier {
    match (i * 3) / n {
        0 => Tier::Standard,
        1 => Tier::Gold,
        _ => Tier::Platinum,
    }
}

fn setup() -> Arc<Engine> {
    let rooms = (0..ROOMS).map(|i| Resource::new(format!("R{i}"), tier_for(i, ROOMS)));
    let guests = (0..GUESTS).map(|i| Requester::new(format!("G{i}"), tier_for(i, GUESTS)));
    let engine = Engine::new(
        EngineConfig::default().with_promotion_delay(Duration::from_millis(50)),
        Arc::new(InMemoryDirectory::new(guests)),
        Box::new(InMemoryInventory::new(rooms)),
        Arc::new(TierPriorityPolicy),
        Arc::new(TokioScheduler::current().expect("inside runtime")),
        Arc::new(EventRegistry::new()),
    );
    println!("  {ROOMS} rooms, {GUESTS} guests");
    engine
}

fn phase1_sequential(engine: &Engine) {
    let start = Instant::now();
    let mut latencies = Vec::with_capacity(GUESTS);
    for i in 0..GUESTS {
        let t = Instant::now();
        engine.check_in(&format!("G{i}")).unwrap();
        latencies.push(t.elapsed());
    }
    let elapsed = start.elapsed();
    let ops = GUESTS as f64 / elapsed.as_secs_f64();
    println!("  {GUESTS} check-ins in {:.2}s = {ops:.0} ops/sec", elapsed.as_secs_f64());
    println!("  waiting: {}, occupancy: {:.1}%", engine.waiting_list().len(), engine.occupancy_ratio().unwrap());
    print_latency("check_in", &mut latencies);
}

async fn phase2_concurrent_churn(engine: Arc<Engine>) {
    let n_tasks = 16;
    let n_per_task = 500;

    let start = Instant::now();
    let mut handles = Vec::new();
    for task in 0..n_tasks {
        let engine = engine.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let mut latencies = Vec::with_capacity(n_per_task * 2);
            for j in 0..n_per_task {
                let room = format!("R{}", (task * n_per_task + j) % ROOMS);
                let t = Instant::now();
                engine.check_out(&room).unwrap();
                latencies.push(t.elapsed());

                let guest = format!("G{}", (task * 31 + j * 7) % GUESTS);
                let t = Instant::now();
                engine.check_in(&guest).unwrap();
                latencies.push(t.elapsed());
            }
            latencies
        }));
    }

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.await.unwrap());
    }
    let elapsed = start.elapsed();
    let total = n_tasks * n_per_task * 2;
    let ops = total as f64 / elapsed.as_secs_f64();
    println!(
        "  {n_tasks} tasks x {n_per_task} check-out/check-in pairs = {total} ops in {:.2}s = {ops:.0} ops/sec",
        elapsed.as_secs_f64()
    );
    print_latency("mixed", &mut all);
}

async fn phase3_promotion_storm(engine: &Engine) {
    let before = engine.waiting_list();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let promoted = Tier::ALL
        .iter()
        .map(|t| engine.queue_depth(*t).priority)
        .sum::<usize>();
    println!("  {} waiting before, {promoted} in priority queues after delay", before.len());
}

#[tokio::main]
async fn main() {
    println!("=== vacancy stress benchmark ===");

    println!("[setup]");
    let engine = setup();

    println!("\n[phase 1] sequential check-in");
    phase1_sequential(&engine);

    println!("\n[phase 2] concurrent check-out/check-in churn");
    phase2_concurrent_churn(engine.clone()).await;

    println!("\n[phase 3] promotion storm");
    phase3_promotion_storm(&engine).await;

    println!("\n=== benchmark complete ===");
}
