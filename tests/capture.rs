use gestrokey::capture::{PointerCapture, Termination, RECENT_STROKES};
use gestrokey::config::CaptureConfig;

fn capture() -> PointerCapture {
    PointerCapture::new(CaptureConfig::default())
}

#[test]
fn release_before_trigger_distance_discards_buffer() {
    let mut capture = capture();
    capture.trigger_down(0.0, 0.0, 0);
    assert!(capture.sample(5.0, 0.0, 10).is_none());
    assert!(capture.sample(10.0, 0.0, 20).is_none());
    assert!(!capture.is_active());

    assert!(capture.trigger_up(30).is_none());
    assert_eq!(capture.recent_strokes().count(), 0);
}

#[test]
fn activation_seeds_stroke_with_pre_trigger_buffer() {
    let mut capture = capture();
    capture.trigger_down(0.0, 0.0, 0);
    assert!(capture.sample(10.0, 0.0, 10).is_none());
    // Crosses the 20-unit trigger distance: the buffered trail becomes
    // the stroke.
    assert!(capture.sample(25.0, 0.0, 20).is_none());
    assert!(capture.is_active());

    let stroke = capture.trigger_up(30).expect("active stroke");
    assert_eq!(stroke.id, 1);
    assert_eq!(stroke.termination, Termination::Released);
    assert_eq!(stroke.points.len(), 3);
    assert_eq!(stroke.points[0].position().x, 0.0);
    assert_eq!(stroke.points[2].position().x, 25.0);
    assert!(!capture.is_active());
}

#[test]
fn min_record_rule_filters_slow_jitter() {
    let mut capture = capture();
    capture.trigger_down(0.0, 0.0, 0);
    capture.sample(30.0, 0.0, 100);
    assert!(capture.is_active());

    // 1 unit at a slow cadence: under the 2-unit floor, dropped.
    capture.sample(31.0, 0.0, 200);
    // 2.5 units: kept.
    capture.sample(32.5, 0.0, 300);
    // 2 units within the fast window: under the stricter 3-unit floor.
    capture.sample(34.5, 0.0, 304);
    // 4 units within the fast window: kept.
    capture.sample(36.5, 0.0, 306);

    let stroke = capture.trigger_up(400).expect("active stroke");
    let xs: Vec<f64> = stroke.points.iter().map(|s| s.x).collect();
    assert_eq!(xs, vec![0.0, 30.0, 32.5, 36.5]);
}

#[test]
fn point_limit_force_finishes_the_stroke() {
    let mut capture = PointerCapture::new(CaptureConfig {
        max_stroke_points: 5,
        ..CaptureConfig::default()
    });
    capture.trigger_down(0.0, 0.0, 0);
    capture.sample(20.0, 0.0, 10);
    assert!(capture.is_active());

    assert!(capture.sample(30.0, 0.0, 20).is_none());
    assert!(capture.sample(40.0, 0.0, 30).is_none());
    assert!(capture.sample(50.0, 0.0, 40).is_none());

    let stroke = capture.sample(60.0, 0.0, 50).expect("forced finish");
    assert_eq!(stroke.termination, Termination::Forced);
    assert_eq!(stroke.points.len(), 5);
    assert!(!capture.is_active());

    // Idle until the next trigger: further input is discarded.
    assert!(capture.sample(70.0, 0.0, 60).is_none());
    assert!(capture.trigger_up(70).is_none());
}

#[test]
fn duration_limit_force_finishes_the_stroke() {
    let mut capture = PointerCapture::new(CaptureConfig {
        max_stroke_duration_ms: 100,
        ..CaptureConfig::default()
    });
    capture.trigger_down(0.0, 0.0, 0);
    capture.sample(25.0, 0.0, 0);
    assert!(capture.is_active());

    assert!(capture.sample(35.0, 0.0, 50).is_none());
    let stroke = capture.sample(45.0, 0.0, 150).expect("forced finish");
    assert_eq!(stroke.termination, Termination::Forced);
}

#[test]
fn recent_ring_records_summaries_and_stays_bounded() {
    let mut capture = capture();
    for i in 0..(RECENT_STROKES as u64 + 4) {
        let t = i * 1_000;
        capture.trigger_down(0.0, 0.0, t);
        capture.sample(25.0, 0.0, t + 10);
        capture.trigger_up(t + 20);
    }

    let summaries: Vec<_> = capture.recent_strokes().collect();
    assert_eq!(summaries.len(), RECENT_STROKES);
    // Oldest entries were evicted; ids keep counting up.
    assert_eq!(summaries[0].id, 5);
    assert_eq!(summaries.last().unwrap().id, RECENT_STROKES as u64 + 4);
    assert!(summaries
        .iter()
        .all(|s| s.termination == Termination::Released));
}

#[test]
fn samples_while_idle_are_discarded() {
    let mut capture = capture();
    assert!(capture.sample(100.0, 100.0, 0).is_none());
    assert!(capture.trigger_up(10).is_none());
    assert_eq!(capture.recent_strokes().count(), 0);
}

#[test]
fn reset_drops_in_flight_state() {
    let mut capture = capture();
    capture.trigger_down(0.0, 0.0, 0);
    capture.sample(25.0, 0.0, 10);
    assert!(capture.is_active());

    capture.reset();
    assert!(!capture.is_active());
    assert!(capture.trigger_up(20).is_none());
}
