use env_logger::{Builder, Env};
use log::LevelFilter;

use driftfield_core::enums::{ColorTag, SoundEffect};
use driftfield_core::events::NotificationSink;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and the
/// default is info.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Fails only when a logger is already installed.
    let _ = builder.try_init();
}

/// Notification sink that writes toasts to the log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    delivered: usize,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl NotificationSink for LogNotifier {
    fn notify(&mut self, title: &str, color: ColorTag, detail: &str) {
        self.delivered += 1;
        let sep = if detail.is_empty() { "" } else { ": " };
        match color {
            ColorTag::Danger | ColorTag::Warning => log::warn!("{title}{sep}{detail}"),
            ColorTag::Info | ColorTag::Success => log::info!("{title}{sep}{detail}"),
        }
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.delivered += 1;
        log::trace!("sound {effect:?}");
    }
}
