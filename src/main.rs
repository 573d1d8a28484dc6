//! Swipe Hoops - headless demo runner
//!
//! Runs a sandbox court with a seeded auto-player at a jittery frame rate,
//! stepping the simulation at the fixed tick, and logs what happens.
//!
//! Usage:
//!   RUST_LOG=info cargo run -- --seed 7 --balls 5

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use swipe_hoops::autoplay::AutoPlayer;
    use swipe_hoops::consts::{MAX_SUBSTEPS, SIM_DT};
    use swipe_hoops::effects::{AudioSource, EffectsPlayer, ParticleEmitter, SoundClip};
    use swipe_hoops::sandbox::{Sandbox, court_tuning};
    use swipe_hoops::sim::{GameEvent, GameState, Outcome, PhysicsHost, TickInput, TriggerOverlap, tick};
    use swipe_hoops::ui::{UiLayout, UiState};
    use swipe_hoops::{Settings, Tuning};

    #[derive(Parser, Debug)]
    #[command(about = "Play a round of Swipe Hoops headless", version, author)]
    struct Args {
        /// Auto-player seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Tuning JSON (defaults to the sandbox court preset)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Effects settings JSON
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Give up after this much simulated time
        #[arg(long, default_value_t = 45.0)]
        max_seconds: f32,
        /// Balls on the court
        #[arg(long, default_value_t = 5)]
        balls: usize,
    }

    struct LogEmitter(&'static str);

    impl ParticleEmitter for LogEmitter {
        fn play(&mut self) {
            log::info!("*{}*", self.0);
        }
    }

    struct LogSpeaker;

    impl AudioSource for LogSpeaker {
        fn play_one_shot(&mut self, clip: &SoundClip, volume: f32) {
            log::info!("~{}~ at {:.2}", clip.0, volume);
        }
    }

    struct Game {
        state: GameState,
        sandbox: Sandbox,
        player: AutoPlayer,
        effects: EffectsPlayer,
        accumulator: f32,
        /// Entries from the last physics step, consumed by the next tick
        overlaps: Vec<TriggerOverlap>,
    }

    impl Game {
        /// Run as many fixed ticks as the frame time allows
        fn update(&mut self, frame_dt: f32) {
            self.accumulator += frame_dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    pointer: self.player.next_input(&self.state, &self.sandbox),
                    overlaps: std::mem::take(&mut self.overlaps),
                };
                tick(&mut self.state, &mut self.sandbox, &input, SIM_DT);
                self.overlaps = self.sandbox.step(SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in self.state.drain_events() {
                    self.on_event(event);
                }
            }
        }

        fn on_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::BallThrown { entity, velocity, force } => {
                    log::debug!("{:?} thrown at {:.1} ({:?})", entity, force, velocity);
                }
                GameEvent::Scored { kind, points, counted: true, .. } => {
                    self.effects.play_score(kind);
                    log::info!("{:?} basket, +{}", kind, points);
                }
                GameEvent::Scored { counted: false, .. } => {
                    log::info!("Basket after the buzzer, not counted");
                }
                GameEvent::RoundOver { outcome } => {
                    log::info!("Round over: {:?}", outcome);
                }
                other => log::debug!("{:?}", other),
            }
        }

        /// Round over and the download button is up
        fn finished(&self) -> bool {
            self.state.outcome() != Outcome::Active
                && (UiState::is_active(self.state.ui.download_button)
                    || self.state.ui.download_button.is_none())
        }
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        let args = Args::parse();
        if args.balls == 0 {
            anyhow::bail!("need at least one ball");
        }

        let tuning = match &args.tuning {
            Some(path) => Tuning::from_file(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => court_tuning(),
        };
        let settings = args.settings.as_ref().map(Settings::load).unwrap_or_default();

        let (sandbox, camera, hoop) = Sandbox::court(args.balls);
        let total_balls = sandbox.count_tagged(&tuning.ball_tag);
        let state = GameState::new(tuning, camera, UiLayout::default(), total_balls);

        let mut effects = EffectsPlayer::new(settings);
        effects.score_particles = Some(Box::new(LogEmitter("swish")));
        effects.perfect_particles = Some(Box::new(LogEmitter("sparkles")));
        effects.audio = Some(Box::new(LogSpeaker));
        effects.score_sound = Some(SoundClip("score".into()));
        effects.perfect_sound = Some(SoundClip("perfect_score".into()));

        log::info!("Swipe Hoops (native) starting, seed {}", args.seed);
        let mut game = Game {
            state,
            sandbox,
            player: AutoPlayer::new(args.seed, hoop.center),
            effects,
            accumulator: 0.0,
            overlaps: Vec::new(),
        };

        // Frame pacing noise, separate from the player's choices
        let mut clock = Pcg32::seed_from_u64(args.seed ^ 0x5eed);
        let mut elapsed = 0.0;
        while elapsed < args.max_seconds && !game.finished() {
            let frame_dt = SIM_DT * clock.random_range(0.7..1.6);
            game.update(frame_dt);
            elapsed += frame_dt;
        }

        let session = &game.state.session;
        log::info!(
            "{} after {:.1}s ({} ticks)",
            game.state.ui.message,
            elapsed,
            game.state.time_ticks
        );
        println!("{}", serde_json::to_string_pretty(session)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by a host engine on the web; nothing to run here
}
