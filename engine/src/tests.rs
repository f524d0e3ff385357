//! Unit tests for the engine crate.

use chrono::{TimeDelta, TimeZone};

use super::*;
use crate::media::tests::RejectingAudio;

fn target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid target")
}

fn at(offset_ms: i64) -> DateTime<Utc> {
    target() + TimeDelta::milliseconds(offset_ms)
}

fn test_app(start_offset_ms: i64) -> App {
    App::with_audio(
        Settings::for_target(target()),
        at(start_offset_ms),
        Box::new(Silence),
    )
}

/// Tick every `frame_ms` from `from` (exclusive) through `to` (inclusive),
/// recording the stage after each frame.
fn run(app: &mut App, from: i64, to: i64, frame_ms: i64) -> Vec<Stage> {
    let mut stages = Vec::new();
    let mut t = from;
    while t < to {
        t = (t + frame_ms).min(to);
        app.tick(at(t));
        stages.push(app.stage());
    }
    stages
}

#[test]
fn remaining_is_shown_before_first_poll() {
    let app = test_app(-90_061_000);
    let remaining = app.remaining();
    assert_eq!(
        (remaining.days, remaining.hours, remaining.minutes, remaining.seconds),
        (1, 1, 1, 1)
    );
    assert!(app.is_polling());
    assert_eq!(app.frame(), 0);
}

#[test]
fn polls_once_per_second() {
    let mut app = test_app(-60_000);
    app.tick(at(-60_000));
    assert_eq!(app.remaining().seconds, 0);
    assert_eq!(app.remaining().minutes, 1);

    // Frames inside the interval leave the display alone.
    app.tick(at(-59_500));
    assert_eq!(app.remaining().minutes, 1);

    app.tick(at(-59_000));
    assert_eq!(app.remaining().minutes, 0);
    assert_eq!(app.remaining().seconds, 59);
}

#[test]
fn clock_stepping_back_repolls() {
    let mut app = test_app(-10_000_000);
    app.tick(at(-10_000_000));
    app.tick(at(-20_000_000));
    assert_eq!(app.remaining().whole_seconds(), 20_000);
}

#[test]
fn final_stretch_then_year_shown() {
    let mut app = test_app(-12_000);
    run(&mut app, -12_000, -9_000, 33);
    assert!(app.stage().is_final_stretch());
    assert!(app.is_polling());

    let stages = run(&mut app, -9_000, 1_000, 33);
    assert!(stages.contains(&Stage::YearShown));
    assert!(app.stage() >= Stage::YearShown);
    assert!(!app.stage().is_final_stretch());
    assert!(!app.is_polling(), "poll timer cancelled at target");
    assert!(app.remaining().is_elapsed());
}

#[test]
fn late_start_reaches_celebrating_within_budget() {
    let mut app = test_app(5_000);
    app.tick(at(5_000));
    assert_eq!(app.remaining(), Remaining::ZERO);
    assert_eq!(app.stage(), Stage::YearShown);

    let stages = run(&mut app, 5_000, 7_500, 33);
    assert_eq!(app.stage(), Stage::Celebrating);
    let first_celebrating = stages
        .iter()
        .position(|s| *s == Stage::Celebrating)
        .expect("celebration reached");
    // 1.5s of one-shot delays, at 33ms frames.
    assert!(first_celebrating <= 1_500 / 33 + 1);
}

#[test]
fn stages_never_regress() {
    let mut app = test_app(-15_000);
    let stages = run(&mut app, -15_000, 20_000, 40);
    assert!(stages.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(stages.last(), Some(&Stage::Celebrating));

    // Clock jumps back before the target; the celebration stays.
    app.tick(at(-100_000));
    assert_eq!(app.stage(), Stage::Celebrating);
}

#[test]
fn digit_roll_runs_during_rolling_stage() {
    let mut app = test_app(0);
    app.tick(at(0));
    assert!(app.digit_roll_phase().is_none());

    app.tick(at(1_000));
    assert_eq!(app.stage(), Stage::DigitRolling);
    assert!(matches!(app.digit_roll_phase(), Some(AnimPhase::Running { .. })));

    app.tick(at(1_200));
    assert!(
        matches!(app.digit_roll_phase(), Some(AnimPhase::Running { progress }) if progress > 0.3)
    );

    app.tick(at(1_500));
    assert_eq!(app.stage(), Stage::Celebrating);
    assert!(app.digit_roll_phase().is_none());
    assert!(app.banner_phase().is_some());
}

#[test]
fn fireworks_start_with_the_year() {
    let mut app = test_app(-1);
    app.tick(at(-1));
    assert!(app.stage().is_final_stretch());
    assert!(!app.fireworks_running());
    assert!(!app.backdrop().is_visible());

    app.tick(at(999));
    assert_eq!(app.stage(), Stage::YearShown);
    assert!(app.fireworks_running());
    assert!(app.backdrop().is_visible());
    assert!(app.particles().is_empty());

    app.tick(at(1_249));
    assert_eq!(app.particles().len(), 100, "two bursts of fifty");
}

#[test]
fn long_frame_gap_steps_one_clamped_delta() {
    let mut app = test_app(0);
    app.tick(at(0));
    assert_eq!(app.stage(), Stage::YearShown);

    // Ten seconds without a frame: stages catch up, the show advances 250ms.
    app.tick(at(10_000));
    assert_eq!(app.stage(), Stage::Celebrating);
    assert_eq!(app.particles().len(), 100, "one interval of bursts");

    app.tick(at(10_100));
    assert_eq!(app.particles().len(), 100);
}

#[test]
fn timed_show_stops() {
    let mut settings = Settings::for_target(target());
    settings.fireworks.duration = Some(Duration::from_secs(1));
    let mut app = App::with_audio(settings, at(0), Box::new(Silence));
    run(&mut app, -33, 1_200, 33);
    assert!(!app.fireworks_running());
    run(&mut app, 1_200, 3_000, 33);
    assert!(app.particles().is_empty(), "last particles burn out");
    assert_eq!(app.stage(), Stage::Celebrating);
}

#[test]
fn reduced_motion_skips_particles_but_advances() {
    let mut settings = Settings::for_target(target());
    settings.ui.reduced_motion = true;
    let mut app = App::with_audio(settings, at(0), Box::new(Silence));
    run(&mut app, -33, 3_000, 33);
    assert_eq!(app.stage(), Stage::Celebrating);
    assert!(!app.fireworks_running());
    assert!(app.particles().is_empty());
    assert!(app.banner_phase().is_none());
}

#[test]
fn rejected_audio_does_not_block_sequence() {
    let audio = RejectingAudio::default();
    let attempts = std::rc::Rc::clone(&audio.attempts);
    let mut app = App::with_audio(Settings::for_target(target()), at(0), Box::new(audio));
    run(&mut app, -33, 3_000, 33);
    assert_eq!(app.stage(), Stage::Celebrating);
    assert_eq!(*attempts.borrow(), 1);
}

#[test]
fn shutdown_releases_media() {
    let mut app = test_app(0);
    run(&mut app, -33, 2_000, 33);
    assert!(app.backdrop().is_visible());
    app.shutdown();
    assert!(!app.backdrop().is_visible());
    assert!(!app.fireworks_running());
    assert!(app.particles().is_empty());
    app.shutdown();
}

#[test]
fn quit_flag() {
    let mut app = test_app(-1_000);
    assert!(!app.should_quit());
    app.request_quit();
    assert!(app.should_quit());
}
