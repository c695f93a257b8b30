//! The foreground alarm loop: a 1-second tick cadence driving the clock,
//! console commands on stdin, and best-effort desktop alerts when playback
//! starts. Events stream to stdout as JSON lines.

use std::process::Command;

use chrono::{Duration, Local};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;
use wakeplay_core::{
    AlarmClock, AlarmConfig, BrowserPlayer, Event, FileNotifier, PlayerNotice, TriggerSource,
};

/// A tick arriving this late means the platform suspended the process;
/// the cadence is restarted through reconciliation rather than trusting
/// whatever survived.
const SUSPEND_GAP_SECS: i64 = 5;

type Clock = AlarmClock<BrowserPlayer, FileNotifier>;

pub fn run(test: bool) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(test))
}

async fn run_loop(test: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = AlarmConfig::default_path()?;
    let mut clock = Clock::new(path, BrowserPlayer, FileNotifier::new()?, Local::now());

    // This shell's player is ready as soon as the process is.
    let ready = serde_json::to_string(&PlayerNotice::Ready)?;
    clock.on_player_message(&ready)?;

    emit(&clock.snapshot(Local::now()))?;
    if test {
        match clock.trigger(TriggerSource::Manual, Local::now()) {
            Ok(Some(event)) => emit(&event)?,
            Ok(None) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }

    let mut ticker = interval(std::time::Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last_tick = Local::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Local::now();
                if now - last_tick > Duration::seconds(SUSPEND_GAP_SECS) {
                    info!("resumed after a gap, reconciling schedule");
                    emit(&clock.reconcile(now))?;
                }
                last_tick = now;
                for event in clock.tick(now) {
                    if matches!(event, Event::PlaybackStarted { .. }) {
                        surface_alert("Wakeplay", "Alarm playing");
                    }
                    emit(&event)?;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if handle_command(line.trim(), &mut clock)? {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if let Some(event) = clock.stop(Local::now()) {
                    emit(&event)?;
                }
                break;
            }
        }
    }
    Ok(())
}

/// Returns true when the loop should exit.
fn handle_command(cmd: &str, clock: &mut Clock) -> Result<bool, Box<dyn std::error::Error>> {
    let now = Local::now();
    match cmd {
        "" => {}
        "test" => match clock.trigger(TriggerSource::Manual, now) {
            Ok(Some(event)) => emit(&event)?,
            Ok(None) => info!("already playing"),
            Err(e) => eprintln!("error: {e}"),
        },
        "stop" => match clock.stop(now) {
            Some(event) => emit(&event)?,
            None => info!("nothing playing"),
        },
        "status" => emit(&clock.snapshot(now))?,
        "quit" | "q" => {
            if let Some(event) = clock.stop(now) {
                emit(&event)?;
            }
            return Ok(true);
        }
        other => eprintln!("unknown command {other:?} (try: test, stop, status, quit)"),
    }
    Ok(false)
}

fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Best-effort desktop alert alongside playback; failures are ignored.
fn surface_alert(title: &str, message: &str) {
    let _ = Command::new("notify-send").arg(title).arg(message).spawn();
}
