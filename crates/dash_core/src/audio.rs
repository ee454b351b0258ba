use std::collections::HashMap;
use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;

/// Every sound the game asks for. The string form is the asset name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Sound {
    /// The background loop of the main scene.
    Bgm,
    Jump,
    /// Stinger of the win sequence.
    Clear,
    /// Stinger of the lose sequence.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// Playback is the host's concern, the game only asks for sounds to start
/// and stop.
pub trait AudioPlayer {
    fn play(&mut self, sound: Sound, looped: bool) -> SoundHandle;
    fn stop(&mut self, handle: SoundHandle);
}

/// The single ambient channel. Starting a track stops the previous one.
#[derive(Debug, Default)]
pub struct AmbientTrack {
    current: Option<SoundHandle>,
}

impl AmbientTrack {
    pub fn start(&mut self, audio: &mut dyn AudioPlayer, sound: Sound) {
        self.stop(audio);
        self.current = Some(audio.play(sound, true));
    }

    pub fn stop(&mut self, audio: &mut dyn AudioPlayer) {
        if let Some(handle) = self.current.take() {
            audio.stop(handle);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioCall {
    Play {
        sound: Sound,
        looped: bool,
        handle: SoundHandle,
    },
    Stop(SoundHandle),
}

/// Number of calls `LoggedAudio` keeps for inspection.
pub const AUDIO_HISTORY_LEN: usize = 64;

/// An `AudioPlayer` that plays nothing. Calls are logged and counted, and
/// the most recent ones are kept so headless hosts and tests can inspect
/// them.
#[derive(Debug, Default)]
pub struct LoggedAudio {
    next_handle: u64,
    call_count: usize,
    play_counts: HashMap<Sound, usize>,
    recent: VecDeque<AudioCall>,
    loops: Vec<(SoundHandle, Sound)>,
}

impl LoggedAudio {
    /// Total calls made since creation.
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// The last `AUDIO_HISTORY_LEN` calls, oldest first.
    pub fn recent_calls(&self) -> impl Iterator<Item = &AudioCall> {
        self.recent.iter()
    }

    /// How many times `sound` was started.
    pub fn play_count(&self, sound: Sound) -> usize {
        self.play_counts.get(&sound).copied().unwrap_or(0)
    }

    /// Looped sounds that were started and not stopped yet.
    pub fn active_loops(&self) -> Vec<Sound> {
        self.loops.iter().map(|(_, sound)| *sound).collect()
    }

    fn record(&mut self, call: AudioCall) {
        self.call_count += 1;
        if self.recent.len() == AUDIO_HISTORY_LEN {
            self.recent.pop_front();
        }
        self.recent.push_back(call);
    }
}

impl AudioPlayer for LoggedAudio {
    fn play(&mut self, sound: Sound, looped: bool) -> SoundHandle {
        self.next_handle += 1;
        let handle = SoundHandle(self.next_handle);
        tracing::debug!(%sound, looped, handle = handle.0, "play");
        if looped {
            self.loops.push((handle, sound));
        }
        *self.play_counts.entry(sound).or_default() += 1;
        self.record(AudioCall::Play {
            sound,
            looped,
            handle,
        });
        handle
    }

    fn stop(&mut self, handle: SoundHandle) {
        tracing::debug!(handle = handle.0, "stop");
        self.loops.retain(|(h, _)| *h != handle);
        self.record(AudioCall::Stop(handle));
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn sound_names_match_assets() {
        assert_eq!(Sound::Bgm.to_string(), "bgm");
        assert_eq!(Sound::GameOver.to_string(), "gameover");
        let name: &'static str = Sound::Clear.into();
        assert_eq!(name, "clear");
        assert_eq!(Sound::from_str("jump").unwrap(), Sound::Jump);
    }

    #[test]
    fn ambient_keeps_a_single_loop() {
        let mut audio = LoggedAudio::default();
        let mut ambient = AmbientTrack::default();
        ambient.start(&mut audio, Sound::Bgm);
        ambient.start(&mut audio, Sound::Bgm);
        assert_eq!(audio.active_loops(), vec![Sound::Bgm]);
        assert_eq!(audio.play_count(Sound::Bgm), 2);
        ambient.stop(&mut audio);
        ambient.stop(&mut audio);
        assert!(audio.active_loops().is_empty());
        assert!(!ambient.is_playing());
        assert_eq!(audio.call_count(), 3);
    }

    #[test]
    fn history_is_bounded_but_counts_are_not() {
        let mut audio = LoggedAudio::default();
        for _ in 0..AUDIO_HISTORY_LEN + 10 {
            audio.play(Sound::Jump, false);
        }
        let clear = audio.play(Sound::Clear, false);
        assert_eq!(audio.call_count(), AUDIO_HISTORY_LEN + 11);
        assert_eq!(audio.play_count(Sound::Jump), AUDIO_HISTORY_LEN + 10);
        assert_eq!(audio.recent_calls().count(), AUDIO_HISTORY_LEN);
        assert_eq!(
            audio.recent_calls().last(),
            Some(&AudioCall::Play {
                sound: Sound::Clear,
                looped: false,
                handle: clear,
            })
        );
    }
}
