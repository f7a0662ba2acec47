//! Audio thread backed by Raylib.
//!
//! [`audio_thread`] runs on its own OS thread, owns the Raylib audio device
//! and every `Music`/`Sound` handle, and processes
//! [`AudioCmd`](crate::events::audio::AudioCmd) messages. Load failures are
//! reported back as [`AudioMessage`](crate::events::audio::AudioMessage).
//!
//! Sound effects share one logical voice: [`AudioCmd::PlayFx`] stops the
//! effect currently playing before starting a new one, while
//! [`AudioCmd::PlayFxIfIdle`] is dropped if anything is still audible. Music
//! streams are pumped every loop iteration and restarted when a looped track
//! ends.

use crate::events::audio::{AudioCmd, AudioMessage};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

/// Entry point of the dedicated audio thread.
///
/// Blocks until it receives [`AudioCmd::Shutdown`] (or the command channel
/// disconnects), then drops all handles before the device.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            warn!("audio device unavailable, running silent: {}", e);
            // keep draining so senders never block on a dead thread
            while let Ok(cmd) = rx_cmd.recv() {
                if matches!(cmd, AudioCmd::Shutdown) {
                    break;
                }
            }
            return;
        }
    };

    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut playing: FxHashSet<String> = FxHashSet::default();
    let mut looped: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut fx_current: Option<String> = None;

    'run: loop {
        // 1) Drain commands
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("music loaded id='{}' path='{}'", id, path);
                        musics.insert(id, music);
                    }
                    Err(e) => {
                        warn!("music load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_evt.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic {
                    id,
                    looped: want_loop,
                } => {
                    if let Some(music) = musics.get(&id) {
                        debug!("music play id='{}' looped={}", id, want_loop);
                        music.seek_stream(0.0);
                        music.play_stream();
                        if want_loop {
                            looped.insert(id.clone());
                        } else {
                            looped.remove(&id);
                        }
                        playing.insert(id);
                    }
                }
                AudioCmd::StopMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        music.stop_stream();
                        playing.remove(&id);
                        looped.remove(&id);
                    }
                }
                AudioCmd::UnloadMusic { id } => {
                    if musics.remove(&id).is_some() {
                        playing.remove(&id);
                        looped.remove(&id);
                    }
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id, sound);
                    }
                    Err(e) => {
                        warn!("fx load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_evt.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    if let Some(current) = fx_current.take() {
                        if let Some(sound) = sounds.get(&current) {
                            sound.stop();
                        }
                    }
                    if let Some(sound) = sounds.get(&id) {
                        sound.play();
                        fx_current = Some(id);
                    }
                }
                AudioCmd::PlayFxIfIdle { id } => {
                    let busy = fx_current
                        .as_ref()
                        .and_then(|current| sounds.get(current))
                        .is_some_and(|sound| sound.is_playing());
                    if !busy {
                        if let Some(sound) = sounds.get(&id) {
                            sound.play();
                            fx_current = Some(id);
                        }
                    }
                }
                AudioCmd::UnloadAllFx => {
                    sounds.clear();
                    fx_current = None;
                }
                AudioCmd::Shutdown => {
                    info!("audio shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Pump streaming; restart looped tracks that reached their end.
        for id in playing.iter() {
            if let Some(music) = musics.get(id) {
                if music.is_stream_playing() {
                    music.update_stream();
                } else if looped.contains(id) {
                    let len = music.get_time_length();
                    let played = music.get_time_played();
                    if played >= len - 0.01 || played == 0.0 {
                        music.seek_stream(0.0);
                        music.play_stream();
                    }
                }
            }
        }
        playing.retain(|id| looped.contains(id) || musics.get(id).is_some_and(|m| m.is_stream_playing()));

        if rx_cmd.is_empty() {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    } // 'run

    musics.clear();
    sounds.clear();
    info!("audio thread exiting (id={:?})", std::thread::current().id());
}
