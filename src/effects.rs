//! Score feedback: particle bursts and one-shot sounds
//!
//! Emitters and the audio source belong to the host. Every slot is
//! optional; a missing emitter, source or clip just skips that cue.

use crate::settings::Settings;
use crate::sim::ShotKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Regular basket
    Score,
    /// Basket after touching the ring
    PerfectScore,
}

/// Host handle to an audio clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundClip(pub String);

/// Host particle system
pub trait ParticleEmitter {
    fn play(&mut self);
}

/// Host audio source
pub trait AudioSource {
    fn play_one_shot(&mut self, clip: &SoundClip, volume: f32);
}

/// Which cues fired for one score (for logging and tests)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayedCues {
    pub perfect_particles: bool,
    pub score_particles: bool,
    pub sound: Option<SoundEffect>,
}

/// Plays score effects through whatever the scene provides
#[derive(Default)]
pub struct EffectsPlayer {
    pub score_particles: Option<Box<dyn ParticleEmitter>>,
    pub perfect_particles: Option<Box<dyn ParticleEmitter>>,
    pub audio: Option<Box<dyn AudioSource>>,
    pub score_sound: Option<SoundClip>,
    pub perfect_sound: Option<SoundClip>,
    pub settings: Settings,
}

impl EffectsPlayer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Play the particle and sound cues for a basket
    pub fn play_score(&mut self, kind: ShotKind) -> PlayedCues {
        let perfect = kind == ShotKind::Perfect;
        let mut cues = PlayedCues::default();

        if self.settings.particles {
            // Perfect burst if there is one, otherwise the regular burst
            match (perfect, self.perfect_particles.as_mut()) {
                (true, Some(emitter)) => {
                    emitter.play();
                    cues.perfect_particles = true;
                }
                _ => {
                    if let Some(emitter) = self.score_particles.as_mut() {
                        emitter.play();
                        cues.score_particles = true;
                    }
                }
            }
        }

        let volume = self.settings.effective_sfx_volume();
        let (effect, clip) = match (perfect, self.perfect_sound.as_ref()) {
            (true, Some(clip)) => (SoundEffect::PerfectScore, Some(clip)),
            _ => (SoundEffect::Score, self.score_sound.as_ref()),
        };
        if let (Some(source), Some(clip)) = (self.audio.as_mut(), clip) {
            if volume > 0.0 {
                source.play_one_shot(clip, volume);
                cues.sound = Some(effect);
            }
        }

        log::debug!("Score effects for {:?}: {:?}", kind, cues);
        cues
    }
}

impl std::fmt::Debug for EffectsPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectsPlayer")
            .field("score_particles", &self.score_particles.is_some())
            .field("perfect_particles", &self.perfect_particles.is_some())
            .field("audio", &self.audio.is_some())
            .field("score_sound", &self.score_sound)
            .field("perfect_sound", &self.perfect_sound)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<String>>>);

    struct Emitter(&'static str, Log);

    impl ParticleEmitter for Emitter {
        fn play(&mut self) {
            self.1.0.borrow_mut().push(self.0.to_string());
        }
    }

    struct Speaker(Log);

    impl AudioSource for Speaker {
        fn play_one_shot(&mut self, clip: &SoundClip, _volume: f32) {
            self.0.0.borrow_mut().push(clip.0.clone());
        }
    }

    fn full_player(log: &Log) -> EffectsPlayer {
        EffectsPlayer {
            score_particles: Some(Box::new(Emitter("score_fx", log.clone()))),
            perfect_particles: Some(Box::new(Emitter("perfect_fx", log.clone()))),
            audio: Some(Box::new(Speaker(log.clone()))),
            score_sound: Some(SoundClip("swish".into())),
            perfect_sound: Some(SoundClip("perfect".into())),
            settings: Settings::default(),
        }
    }

    #[test]
    fn test_perfect_uses_perfect_cues() {
        let log = Log::default();
        let mut player = full_player(&log);
        let cues = player.play_score(ShotKind::Perfect);
        assert!(cues.perfect_particles);
        assert_eq!(cues.sound, Some(SoundEffect::PerfectScore));
        assert_eq!(*log.0.borrow(), vec!["perfect_fx", "perfect"]);
    }

    #[test]
    fn test_perfect_falls_back_to_regular_cues() {
        let log = Log::default();
        let mut player = full_player(&log);
        player.perfect_particles = None;
        player.perfect_sound = None;
        player.play_score(ShotKind::Perfect);
        assert_eq!(*log.0.borrow(), vec!["score_fx", "swish"]);
    }

    #[test]
    fn test_missing_audio_source_is_skipped() {
        let log = Log::default();
        let mut player = full_player(&log);
        player.audio = None;
        let cues = player.play_score(ShotKind::Regular);
        assert!(cues.score_particles);
        assert_eq!(cues.sound, None);
    }

    #[test]
    fn test_empty_player_does_nothing() {
        let mut player = EffectsPlayer::new(Settings::default());
        assert_eq!(player.play_score(ShotKind::Perfect), PlayedCues::default());
    }

    #[test]
    fn test_muted_skips_sound_only() {
        let log = Log::default();
        let mut player = full_player(&log);
        player.settings.muted = true;
        player.play_score(ShotKind::Regular);
        assert_eq!(*log.0.borrow(), vec!["score_fx"]);
    }
}
