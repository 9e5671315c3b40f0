use std::sync::{Arc, Mutex};

use itertools::Itertools;
use pacekit::prelude::*;

const WINDOW: Duration = Duration::from_millis(100);

struct Scroll {
    timer: ManualTimer,
    start: Instant,
    runs: Arc<Mutex<Vec<(Duration, u32)>>>,
}

impl Scroll {
    fn new() -> Self {
        let start = Instant::now();
        Self {
            timer: ManualTimer::starting_at(start),
            start,
            runs: Arc::default(),
        }
    }

    fn late_by(slack: Duration) -> Self {
        let scroll = Self::new();
        Self {
            timer: scroll.timer.with_slack(slack),
            ..scroll
        }
    }

    fn throttled(&self) -> Throttled<u32, ManualTimer> {
        let runs = self.runs.clone();
        let timer = self.timer.clone();
        let start = self.start;
        Throttled::with_timer(self.timer.clone(), WINDOW, move |offset: u32| {
            runs.lock().unwrap().push((timer.now() - start, offset))
        })
    }

    fn at(&self, millis: u64) {
        let target = self.start + Duration::from_millis(millis);
        self.timer
            .advance(target.saturating_duration_since(self.timer.now()));
    }

    fn runs(&self) -> Vec<(Duration, u32)> {
        self.runs.lock().unwrap().clone()
    }
}

#[test]
fn leading_and_trailing_runs_for_calls_within_window() {
    let scroll = Scroll::new();
    let throttled = scroll.throttled();

    throttled.call(0);
    assert_eq!(scroll.runs(), vec![(Duration::ZERO, 0)]);

    scroll.at(10);
    throttled.call(10);
    scroll.at(50);
    throttled.call(50);
    scroll.at(1000);

    assert_eq!(
        scroll.runs(),
        vec![(Duration::ZERO, 0), (Duration::from_millis(100), 50)]
    );
}

#[test]
fn idle_period_restores_leading_edge() {
    let scroll = Scroll::new();
    let throttled = scroll.throttled();

    throttled.call(1);
    scroll.at(30);
    throttled.call(2);
    scroll.at(500);
    throttled.call(3);

    assert_eq!(
        scroll.runs(),
        vec![
            (Duration::ZERO, 1),
            (Duration::from_millis(100), 2),
            (Duration::from_millis(500), 3)
        ]
    );
}

#[test]
fn continuous_calls_run_once_per_window() {
    let scroll = Scroll::new();
    let throttled = scroll.throttled();

    (0..=1000).step_by(5).for_each(|millis| {
        scroll.at(millis);
        throttled.call(millis as u32);
    });
    scroll.at(1500);

    let runs = scroll.runs();

    assert!(runs
        .iter()
        .tuple_windows()
        .all(|((previous, _), (next, _))| *next - *previous >= WINDOW));
    assert_eq!(runs.len(), 12);
    assert_eq!(runs.last(), Some(&(Duration::from_millis(1100), 1000)));
}

#[test]
fn late_timers_never_shrink_window() {
    let scroll = Scroll::late_by(Duration::from_millis(35));
    let throttled = scroll.throttled();

    (0..=700).step_by(9).for_each(|millis| {
        scroll.at(millis);
        throttled.call(millis as u32);
    });
    scroll.at(2000);

    let runs = scroll.runs();

    assert!(runs
        .iter()
        .tuple_windows()
        .all(|((previous, _), (next, _))| *next - *previous >= WINDOW));
    assert_eq!(runs.last().map(|(_, offset)| *offset), Some(693));
}

#[test]
fn settings_configure_throttle_window() {
    let scroll = Scroll::new();
    let runs = scroll.runs.clone();
    let throttled = PacingSettings::default()
        .with_throttle(Duration::from_millis(40))
        .throttled(scroll.timer.clone(), move |offset: u32| {
            runs.lock().unwrap().push((Duration::ZERO, offset))
        });

    throttled.call(1);
    throttled.call(2);
    scroll.at(39);

    assert_eq!(scroll.runs().len(), 1);

    scroll.at(40);

    assert_eq!(scroll.runs().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn throttle_function_uses_tokio_runtime() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let throttled = throttle(move |value: u8| sink.lock().unwrap().push(value), WINDOW).unwrap();

    throttled.call(1);
    throttled.call(2);
    throttled.call(3);

    assert_eq!(*calls.lock().unwrap(), vec![1]);

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(*calls.lock().unwrap(), vec![1, 3]);
}

#[test]
fn negative_window_is_configuration_error() {
    let result = Throttled::from_millis(ManualTimer::new(), -10, |_: ()| {});

    assert_eq!(result.err(), Some(PacingError::NegativeDelay(-10)));
}
