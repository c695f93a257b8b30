use chrono::Local;
use clap::Subcommand;
use wakeplay_core::{AlarmClock, AlarmConfig, BrowserPlayer, FileNotifier};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (media_url, target_time, enabled)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = AlarmConfig::default_path()?;
    match action {
        ConfigAction::Get { key } => {
            let config = AlarmConfig::load(&path);
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            // Saving through the clock keeps the armed wake signal in step
            // with whatever the edit changed.
            let mut clock = AlarmClock::new(path, BrowserPlayer, FileNotifier::new()?, Local::now());
            let mut config = clock.config().clone();
            config.set(&key, &value)?;
            clock.save(config, Local::now())?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = AlarmConfig::load(&path);
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let mut clock = AlarmClock::new(path, BrowserPlayer, FileNotifier::new()?, Local::now());
            clock.save(AlarmConfig::default(), Local::now())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
