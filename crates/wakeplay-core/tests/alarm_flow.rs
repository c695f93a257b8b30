//! End-to-end flow over the composed alarm clock: configure, fire on the
//! tick cadence, ramp to full volume, and auto-stop -- the whole lifecycle
//! a real morning exercises, driven with simulated wall-clock times.

use chrono::{DateTime, Duration, Local, TimeZone};
use wakeplay_core::alarm::{MAX_PLAYBACK_SECS, MAX_VOLUME_STEP, STEP_INTERVAL_SECS};
use wakeplay_core::notify::RecordingNotifier;
use wakeplay_core::player::{PlayerCommand, RecordingPlayer};
use wakeplay_core::{AlarmClock, AlarmConfig, Event, Phase, StopReason, TriggerSource};

const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, 7, h, m, s).unwrap()
}

fn new_clock(dir: &tempfile::TempDir) -> AlarmClock<RecordingPlayer, RecordingNotifier> {
    let mut clock = AlarmClock::new(
        dir.path().join("alarm.toml"),
        RecordingPlayer::default(),
        RecordingNotifier::default(),
        at(6, 0, 0),
    );
    clock.on_player_message(r#"{"event":"ready"}"#).unwrap();
    clock
}

#[test]
fn full_morning_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut clock = new_clock(&dir);

    let saved = clock
        .save(
            AlarmConfig {
                media_url: URL.into(),
                target_time: "07:00".into(),
                enabled: true,
            },
            at(6, 59, 59),
        )
        .unwrap();
    assert!(matches!(saved, Event::AlarmArmed { next_occurrence, .. } if next_occurrence == at(7, 0, 0)));

    // Tick every second from 06:59:59 through the full playback window.
    let mut started = 0;
    let mut steps = Vec::new();
    let mut stopped = Vec::new();
    for offset in 0..=(1 + MAX_PLAYBACK_SECS + 5) {
        let now = at(6, 59, 59) + Duration::seconds(offset);
        for event in clock.tick(now) {
            match event {
                Event::PlaybackStarted { source, .. } => {
                    assert_eq!(source, TriggerSource::Tick);
                    assert_eq!(now, at(7, 0, 0));
                    started += 1;
                }
                Event::VolumeStepped { step, volume, .. } => {
                    steps.push((now, step, volume));
                }
                Event::PlaybackStopped { reason, .. } => {
                    stopped.push((now, reason));
                }
                _ => {}
            }
        }
    }

    assert_eq!(started, 1);

    // Steps 2..=8, thirty seconds apart, volumes 0.25 ..= 1.0.
    let expected: Vec<u8> = (2..=MAX_VOLUME_STEP).collect();
    let got: Vec<u8> = steps.iter().map(|(_, s, _)| *s).collect();
    assert_eq!(got, expected);
    for (i, (when, step, volume)) in steps.iter().enumerate() {
        assert_eq!(
            *when,
            at(7, 0, 0) + Duration::seconds((i as i64 + 1) * STEP_INTERVAL_SECS)
        );
        assert!((volume - f64::from(*step) / f64::from(MAX_VOLUME_STEP)).abs() < f64::EPSILON);
    }

    // Exactly one auto-stop, ten minutes after the trigger.
    assert_eq!(stopped.len(), 1);
    assert_eq!(stopped[0].0, at(7, 0, 0) + Duration::seconds(MAX_PLAYBACK_SECS));
    assert_eq!(stopped[0].1, StopReason::MaxDuration);
    assert_eq!(clock.phase(), Phase::Idle);

    // Wire traffic: one Play, seven SetVolume steps plus the initial one,
    // one Stop.
    let plays = clock
        .player()
        .sent
        .iter()
        .filter(|c| matches!(c, PlayerCommand::Play { .. }))
        .count();
    let volumes = clock
        .player()
        .sent
        .iter()
        .filter(|c| matches!(c, PlayerCommand::SetVolume { .. }))
        .count();
    let stops = clock
        .player()
        .sent
        .iter()
        .filter(|c| matches!(c, PlayerCommand::Stop))
        .count();
    assert_eq!((plays, volumes, stops), (1, 8, 1));
}

#[test]
fn suspend_and_resume_reconciles_without_retrofiring() {
    let dir = tempfile::tempdir().unwrap();
    let mut clock = new_clock(&dir);
    clock
        .save(
            AlarmConfig {
                media_url: URL.into(),
                target_time: "07:00".into(),
                enabled: true,
            },
            at(6, 0, 0),
        )
        .unwrap();

    // Last tick before the platform suspends the process.
    assert!(clock.tick(at(6, 30, 0)).is_empty());

    // Resume long after the match. Reconciliation recomputes the schedule
    // instead of firing the missed alarm.
    let snapshot = clock.reconcile(at(9, 0, 0));
    match snapshot {
        Event::StateSnapshot {
            phase,
            next_occurrence,
            ..
        } => {
            assert_eq!(phase, Phase::Idle);
            assert_eq!(
                next_occurrence,
                Some(Local.with_ymd_and_hms(2026, 8, 8, 7, 0, 0).unwrap())
            );
        }
        _ => panic!("expected StateSnapshot"),
    }
    assert!(clock.tick(at(9, 0, 1)).is_empty());
    assert!(clock.player().sent.is_empty());

    // The missed match is covered by the armed signal instead; the user's
    // tap arrives as a notification trigger.
    let event = clock
        .trigger(TriggerSource::Notification, at(9, 0, 2))
        .unwrap()
        .unwrap();
    assert!(matches!(
        event,
        Event::PlaybackStarted {
            source: TriggerSource::Notification,
            ..
        }
    ));
    assert_eq!(clock.phase(), Phase::Playing);
}

#[test]
fn playback_survives_config_resave_and_manual_stop_lands_idle() {
    let dir = tempfile::tempdir().unwrap();
    let mut clock = new_clock(&dir);
    let config = AlarmConfig {
        media_url: URL.into(),
        target_time: "07:00".into(),
        enabled: true,
    };
    clock.save(config.clone(), at(6, 0, 0)).unwrap();

    clock.trigger(TriggerSource::Manual, at(6, 5, 0)).unwrap();
    clock.tick(at(6, 5, 0) + Duration::seconds(STEP_INTERVAL_SECS));
    assert_eq!(clock.phase(), Phase::Playing);

    // Editing the alarm while it rings re-arms the wake signal but leaves
    // the running session alone.
    let mut edited = config;
    edited.target_time = "07:30".into();
    clock.save(edited, at(6, 5, 40)).unwrap();
    assert_eq!(clock.phase(), Phase::Playing);

    let stopped = clock.stop(at(6, 5, 50)).unwrap();
    assert!(matches!(
        stopped,
        Event::PlaybackStopped {
            reason: StopReason::Manual,
            at_step: 2,
            ..
        }
    ));
    assert_eq!(clock.phase(), Phase::Idle);
}
