//! End-to-end playback, scrubbing, and reset through the driver.
//!
//! Every test runs on a paused Tokio clock, so wall-clock intervals and
//! debounce periods elapse deterministically.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::time::Duration;

use cortex_core::clock::{START_DAY, TOTAL_DAY};
use cortex_core::config::SimulationConfig;
use cortex_core::driver::SimulationDriver;
use cortex_core::state::SimulationState;
use cortex_types::{Cell, CellType};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn seeded_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.population.seed = Some(2024);
    config
}

fn make_driver() -> SimulationDriver {
    SimulationDriver::new(&seeded_config()).unwrap()
}

async fn wait_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Cohort membership keyed by kind and birth day in thousandths.
fn cohorts(cells: &[Cell]) -> BTreeMap<(CellType, i64), usize> {
    let mut out = BTreeMap::new();
    for cell in cells {
        #[allow(clippy::cast_possible_truncation)]
        let birth = (cell.migration_start * 1000.0).round() as i64;
        let count: &mut usize = out.entry((cell.cell_type, birth)).or_insert(0);
        *count = count.saturating_add(1);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn reset_restores_initial_population() {
    let driver = make_driver();
    driver.set_day(16.0);
    wait_ms(100).await;
    assert!(driver.cells().len() > 23);

    driver.reset();
    assert!(close(driver.day(), START_DAY));
    assert!(!driver.is_playing());
    let census = driver.census();
    assert_eq!(census.get(&CellType::Progenitor), Some(&15));
    assert_eq!(census.get(&CellType::LayerI), Some(&8));
    assert_eq!(driver.cells().len(), 23);
}

#[tokio::test(start_paused = true)]
async fn scrub_burst_commits_one_rebuild() {
    let driver = make_driver();
    let before = driver.revision();

    for _ in 0..3 {
        driver.set_day(15.0);
        wait_ms(10).await;
    }
    // Still inside the quiet period of the last call.
    assert_eq!(driver.revision(), before);
    assert!(close(driver.day(), START_DAY));

    wait_ms(100).await;
    assert_eq!(driver.revision(), before.saturating_add(1));
    assert!(close(driver.day(), 15.0));
    assert_eq!(driver.stage_label(), "Superficial Layer Formation (III, II)");
}

#[tokio::test(start_paused = true)]
async fn scrub_burst_lands_on_last_value() {
    let driver = make_driver();
    for day in [11.0, 12.0, 13.0, 14.0] {
        driver.set_day(day);
        wait_ms(5).await;
    }
    wait_ms(100).await;
    assert!(close(driver.day(), 14.0));
}

#[tokio::test(start_paused = true)]
async fn playing_near_end_stops_after_one_tick() {
    let driver = make_driver();
    driver.set_day(17.99);
    wait_ms(60).await;
    assert!(close(driver.day(), 17.99));

    assert!(driver.play_pause());
    wait_ms(60).await;
    assert!(!driver.is_playing());
    assert!(close(driver.day(), TOTAL_DAY));
    assert!(driver.day() <= TOTAL_DAY);

    wait_ms(500).await;
    assert!(close(driver.day(), TOTAL_DAY));
    assert!(!driver.playback_running());
}

#[tokio::test(start_paused = true)]
async fn reset_stops_running_playback() {
    let driver = make_driver();
    assert!(driver.play_pause());
    wait_ms(520).await;
    assert!(driver.day() > START_DAY);

    driver.reset();
    assert!(!driver.is_playing());
    assert!(!driver.playback_running());
    wait_ms(500).await;
    assert!(close(driver.day(), START_DAY));
    assert_eq!(driver.cells().len(), 23);
}

#[tokio::test(start_paused = true)]
async fn pause_halts_and_resume_continues() {
    let driver = make_driver();
    assert!(driver.play_pause());
    wait_ms(275).await;
    assert!(!driver.play_pause());
    let paused_at = driver.day();
    assert!(close(paused_at, 10.25));

    wait_ms(1000).await;
    assert!(close(driver.day(), paused_at));

    assert!(driver.play_pause());
    wait_ms(75).await;
    assert!(close(driver.day(), 10.3));
}

#[tokio::test(start_paused = true)]
async fn full_playback_matches_full_regenerate() {
    let driver = make_driver();
    assert!(driver.play_pause());

    // 160 steps at 50 ms each, plus slack.
    wait_ms(9000).await;
    assert!(!driver.is_playing());
    assert!(close(driver.day(), TOTAL_DAY));
    let played = driver.cells();

    let mut rebuilt = SimulationState::new(&seeded_config()).unwrap();
    rebuilt.full_regenerate(TOTAL_DAY);

    assert_eq!(played.len(), rebuilt.cells().len());
    assert_eq!(cohorts(&played), cohorts(rebuilt.cells()));
}

#[tokio::test(start_paused = true)]
async fn scrub_during_playback_continues_from_new_day() {
    let driver = make_driver();
    assert!(driver.play_pause());
    wait_ms(120).await;

    driver.set_day(14.0);
    wait_ms(60).await;
    assert!(driver.is_playing());
    let day = driver.day();
    assert!(day >= 14.0, "day {day}");
    assert!(day < 14.2, "day {day}");
    assert_eq!(driver.census().get(&CellType::LayerIII), Some(&12));
}

#[tokio::test(start_paused = true)]
async fn snapshots_arrive_on_the_watch_channel() {
    let driver = make_driver();
    let mut rx = driver.subscribe();
    assert!(close(rx.borrow().day, START_DAY));

    assert!(driver.play_pause());
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().playing);

    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert!(snapshot.day > START_DAY);
    assert!(snapshot.progress > 0.0);
    assert_eq!(snapshot.cells.len(), 23);

    driver.reset();
    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert!(!snapshot.playing);
    assert!(close(snapshot.day, START_DAY));
}

#[tokio::test(start_paused = true)]
async fn positions_follow_the_clock() {
    let driver = make_driver();
    driver.set_day(13.0);
    wait_ms(60).await;

    let day = driver.day();
    for cell in driver.cells() {
        let at = SimulationDriver::position(&cell, day);
        assert!((0.0..=1.0).contains(&at.y), "{at:?}");
        if day >= cell.migration_end {
            assert_eq!(at, cell.destination);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn latest_snapshot_matches_state_after_reset() {
    let mut config = seeded_config();
    config.timeline.tick_interval_ms = 1;
    let driver = SimulationDriver::new(&config).unwrap();
    let rx = driver.subscribe();

    for round in 0..40_u64 {
        assert!(driver.play_pause());
        tokio::time::sleep(Duration::from_millis((round % 7).saturating_add(1))).await;
        driver.reset();
        // Let any step that raced the abort run to completion.
        tokio::time::sleep(Duration::from_millis(3)).await;

        let published = rx.borrow().clone();
        assert_eq!(published, driver.snapshot(), "round {round}");
        assert!(!published.playing);
        assert!(close(published.day, START_DAY));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn published_days_never_run_backwards_during_playback() {
    let mut config = seeded_config();
    config.timeline.tick_interval_ms = 1;
    let driver = SimulationDriver::new(&config).unwrap();
    let mut rx = driver.subscribe();
    assert!(driver.play_pause());

    let mut last = START_DAY;
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.day >= last, "{} after {last}", snapshot.day);
        last = snapshot.day;
        if !snapshot.playing {
            break;
        }
    }
    assert!(close(last, TOTAL_DAY));
}
