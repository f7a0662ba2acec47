//! Audio plumbing on the game side.
//!
//! - [`AudioQueue`] is the outbox gameplay code writes [`AudioCmd`]s into.
//!   The level world keeps one as an ECS resource; `main` drains it every
//!   frame and forwards the commands over the [`AudioBridge`].
//! - [`MusicPlaylist`] maps game states to background tracks.
//! - [`AudioBridge`] owns the channels and join handle of the audio thread.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::gamestate::GameStates;
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use rustc_hash::FxHashMap;

/// Id of the single background music stream.
pub const MUSIC_ID: &str = "background";

/// Pending audio commands, in the order they were issued.
#[derive(Resource, Debug, Default)]
pub struct AudioQueue {
    pending: Vec<AudioCmd>,
}

impl AudioQueue {
    pub fn push(&mut self, cmd: AudioCmd) {
        self.pending.push(cmd);
    }

    pub fn play_fx(&mut self, id: &str) {
        self.push(AudioCmd::PlayFx { id: id.to_string() });
    }

    pub fn play_fx_if_idle(&mut self, id: &str) {
        self.push(AudioCmd::PlayFxIfIdle { id: id.to_string() });
    }

    pub fn pending(&self) -> &[AudioCmd] {
        &self.pending
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, AudioCmd> {
        self.pending.drain(..)
    }
}

/// Background music per game state.
#[derive(Debug, Default)]
pub struct MusicPlaylist {
    tracks: FxHashMap<GameStates, String>,
}

impl MusicPlaylist {
    pub fn set_music(&mut self, state: GameStates, path: impl Into<String>) {
        self.tracks.insert(state, path.into());
    }

    pub fn clear_music(&mut self, state: GameStates) {
        self.tracks.remove(&state);
    }

    pub fn track(&self, state: GameStates) -> Option<&str> {
        self.tracks.get(&state).map(String::as_str)
    }

    /// Stop the current track and start the one registered for `state`, looping.
    pub fn play(&self, state: GameStates, queue: &mut AudioQueue) {
        queue.push(AudioCmd::StopMusic {
            id: MUSIC_ID.to_string(),
        });
        queue.push(AudioCmd::UnloadMusic {
            id: MUSIC_ID.to_string(),
        });
        if let Some(path) = self.track(state) {
            queue.push(AudioCmd::LoadMusic {
                id: MUSIC_ID.to_string(),
                path: path.to_string(),
            });
            queue.push(AudioCmd::PlayMusic {
                id: MUSIC_ID.to_string(),
                looped: true,
            });
        }
    }
}

/// Bridge between the game loop and the audio thread.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (game -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

impl AudioBridge {
    /// Spawn the audio thread.
    pub fn spawn() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));
        Self {
            tx_cmd,
            rx_msg,
            handle,
        }
    }

    /// Forward queued commands; send errors only happen after shutdown.
    pub fn forward(&self, queue: &mut AudioQueue) {
        for cmd in queue.drain() {
            let _ = self.tx_cmd.send(cmd);
        }
    }

    /// Messages the audio thread sent since the last poll.
    pub fn poll(&self) -> impl Iterator<Item = AudioMessage> + '_ {
        self.rx_msg.try_iter()
    }

    /// Request shutdown and wait for the thread to exit.
    pub fn shutdown(self) {
        let _ = self.tx_cmd.send(AudioCmd::Shutdown);
        let _ = self.handle.join();
    }
}
