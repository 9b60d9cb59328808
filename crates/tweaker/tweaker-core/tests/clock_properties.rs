use std::thread;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use tweaker_core::{ControllableTime, ManualTimeSource};

fn manual_clock() -> (ManualTimeSource, ControllableTime) {
    let wall = ManualTimeSource::new();
    let time = ControllableTime::with_source(wall.clone());
    (wall, time)
}

#[test]
fn running_clock_accumulates_step_durations() {
    let (wall, mut time) = manual_clock();
    let frame_ms = [16, 17, 16, 33, 8, 16];
    for ms in frame_ms {
        wall.advance_millis(ms);
        time.next_step();
        assert!(time.step_duration_seconds() > 0.0);
    }
    let total: u64 = frame_ms.iter().sum();
    assert_eq!(time.step_count(), frame_ms.len() as u64);
    assert_abs_diff_eq!(
        time.seconds_since_start(),
        total as f64 / 1000.0,
        epsilon = 1e-9
    );
}

#[test]
fn running_clock_follows_system_time() {
    let mut time = ControllableTime::new();
    let steps = 5;
    let started = std::time::Instant::now();
    for _ in 0..steps {
        thread::sleep(Duration::from_millis(20));
        time.next_step();
    }
    let wall = started.elapsed().as_secs_f64();
    assert_eq!(time.step_count(), steps);
    // Millisecond resolution plus scheduler jitter.
    assert!(time.seconds_since_start() >= 0.09);
    assert!(time.seconds_since_start() <= wall + 0.01);
}

#[test]
fn paused_time_is_frozen_across_steps() {
    let (wall, mut time) = manual_clock();
    wall.advance_millis(400);
    time.next_step();
    time.set_paused(true);

    for _ in 0..4 {
        wall.advance_millis(1000);
        time.next_step();
        assert_abs_diff_eq!(time.seconds_since_start(), 0.4, epsilon = 1e-9);
        assert_eq!(time.step_duration_seconds(), 0.0);
    }
    assert_eq!(time.step_count(), 5);
}

#[test]
fn resume_does_not_count_the_pause() {
    let (wall, mut time) = manual_clock();
    wall.advance_millis(250);
    time.next_step();

    time.set_paused(true);
    wall.advance_seconds(30.0);
    time.set_paused(false);
    time.next_step();
    assert_abs_diff_eq!(time.seconds_since_start(), 0.25, epsilon = 1e-9);

    wall.advance_millis(50);
    time.next_step();
    assert_abs_diff_eq!(time.seconds_since_start(), 0.3, epsilon = 1e-9);
}

#[test]
fn toggling_pause_without_query_still_skips_gap() {
    let (wall, mut time) = manual_clock();
    time.set_paused(true);
    wall.advance_millis(700);
    time.set_paused(false);
    time.set_paused(true);
    wall.advance_millis(700);
    time.set_paused(false);
    assert_abs_diff_eq!(time.current_time_seconds(), 0.0, epsilon = 1e-9);
}

#[test]
fn reverse_speed_runs_time_backward() {
    let (wall, mut time) = manual_clock();
    wall.advance_seconds(2.0);
    time.next_step();

    time.set_speed_factor(-0.5);
    let mut previous = time.seconds_since_start();
    for _ in 0..4 {
        wall.advance_millis(100);
        time.next_step();
        assert!(time.seconds_since_start() < previous);
        assert_abs_diff_eq!(time.step_duration_seconds(), -0.05, epsilon = 1e-9);
        previous = time.seconds_since_start();
    }
    assert_abs_diff_eq!(time.seconds_since_start(), 1.8, epsilon = 1e-9);
}
