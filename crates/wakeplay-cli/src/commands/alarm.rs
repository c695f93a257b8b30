use chrono::Local;
use clap::Subcommand;
use wakeplay_core::{AlarmClock, AlarmConfig, BrowserPlayer, FileNotifier};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Configure the alarm; omitted flags keep their stored values
    Set {
        /// Video URL to wake up to
        #[arg(long)]
        url: Option<String>,
        /// Alarm time, zero-padded HH:MM
        #[arg(long)]
        time: Option<String>,
        /// Enable or disable the alarm
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Print current alarm state as JSON
    Status,
    /// Enable the alarm
    Enable,
    /// Disable the alarm
    Disable,
}

fn open_clock() -> Result<AlarmClock<BrowserPlayer, FileNotifier>, Box<dyn std::error::Error>> {
    let path = AlarmConfig::default_path()?;
    Ok(AlarmClock::new(
        path,
        BrowserPlayer,
        FileNotifier::new()?,
        Local::now(),
    ))
}

fn save_and_print(
    clock: &mut AlarmClock<BrowserPlayer, FileNotifier>,
    config: AlarmConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let event = clock.save(config, Local::now())?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut clock = open_clock()?;
    match action {
        AlarmAction::Set { url, time, enabled } => {
            let mut config = clock.config().clone();
            if let Some(url) = url {
                config.media_url = url;
            }
            if let Some(time) = time {
                config.target_time = time;
            }
            if let Some(enabled) = enabled {
                config.enabled = enabled;
            }
            save_and_print(&mut clock, config)
        }
        AlarmAction::Status => {
            let snapshot = clock.snapshot(Local::now());
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        AlarmAction::Enable => {
            let mut config = clock.config().clone();
            config.enabled = true;
            save_and_print(&mut clock, config)
        }
        AlarmAction::Disable => {
            let mut config = clock.config().clone();
            config.enabled = false;
            save_and_print(&mut clock, config)
        }
    }
}
