//! Events emitted by the simulation for audio and UI feedback.
//!
//! The core never waits on these; they are buffered per tick, exposed in the
//! snapshot, and forwarded to an attached `NotificationSink` if there is one.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Fire-and-forget output of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Toast for the notification area.
    Notify {
        title: String,
        color: ColorTag,
        detail: String,
    },
    /// Play a sound effect.
    Sound { effect: SoundEffect },
}

impl SimEvent {
    pub fn notify(title: impl Into<String>, color: ColorTag, detail: impl Into<String>) -> Self {
        SimEvent::Notify {
            title: title.into(),
            color,
            detail: detail.into(),
        }
    }

    pub fn sound(effect: SoundEffect) -> Self {
        SimEvent::Sound { effect }
    }
}

/// Receiver for notifications and sounds (UI/audio layer).
pub trait NotificationSink {
    fn notify(&mut self, title: &str, color: ColorTag, detail: &str);
    fn play_sound(&mut self, effect: SoundEffect);

    /// Route one buffered event to the matching method.
    fn deliver(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Notify {
                title,
                color,
                detail,
            } => self.notify(title, *color, detail),
            SimEvent::Sound { effect } => self.play_sound(*effect),
        }
    }
}
