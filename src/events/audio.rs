//! Messages exchanged with the audio thread.

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    UnloadMusic { id: String },
    PlayMusic { id: String, looped: bool },
    StopMusic { id: String },
    LoadFx { id: String, path: String },
    /// Stop whatever effect is playing, then play this one.
    PlayFx { id: String },
    /// Play only when no effect is currently playing.
    PlayFxIfIdle { id: String },
    UnloadAllFx,
    Shutdown,
}

/// Events sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    MusicLoadFailed { id: String, error: String },
    FxLoadFailed { id: String, error: String },
}
