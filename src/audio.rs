use crate::foundation::error::ScrollyResult;

pub const DEFAULT_VOLUME: f32 = 0.4;

/// Playback device for the background track.
pub trait AudioBackend {
    /// Start or resume playback. Hosts may refuse (autoplay policies).
    fn play(&mut self) -> ScrollyResult<()>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Background-track control with best-effort semantics.
///
/// Playback failures never reach the caller: they are logged and leave the
/// controller in the paused state, which the UI shows as "sound off".
#[derive(Debug)]
pub struct AudioController<B> {
    backend: B,
    playing: bool,
    volume: f32,
}

impl<B: AudioBackend> AudioController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            playing: false,
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply the current volume and try to start playback.
    pub fn start(&mut self) -> bool {
        self.backend.set_volume(self.volume);
        self.try_play()
    }

    /// Pause when playing, otherwise try to play. Returns the new playing state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.backend.pause();
            self.playing = false;
            false
        } else {
            self.try_play()
        }
    }

    /// Clamp to `[0, 1]` and forward to the backend.
    pub fn set_volume(&mut self, volume: f32) {
        let v = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
        self.volume = v;
        self.backend.set_volume(v);
    }

    fn try_play(&mut self) -> bool {
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(err) => {
                tracing::warn!(%err, "playback blocked, staying muted");
                self.playing = false;
            }
        }
        self.playing
    }
}
