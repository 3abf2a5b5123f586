//! Serpent Chompy entry point
//!
//! Native builds run a headless autopilot game on a simulated clock. The
//! browser build is driven from JS through `SnakeHandle` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry lives in the library's start hook
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use serpent_chompy::Session;
    use serpent_chompy::audio::NullAudio;
    use serpent_chompy::platform::{Command, FileStorage};
    use serpent_chompy::sim::{GamePhase, choose_direction};

    /// Stop a demo that somehow never ends
    const MAX_TICKS: u64 = 50_000;

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let seed = match std::env::args().nth(1) {
            Some(arg) => match arg.parse::<u64>() {
                Ok(seed) => seed,
                Err(e) => {
                    eprintln!("invalid seed {:?}: {}", arg, e);
                    std::process::exit(2);
                }
            },
            None => wall_clock_seed(),
        };

        let dir = std::env::var_os("SERPENT_CHOMPY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".serpent-chompy"));
        let storage = FileStorage::new(dir);
        log::info!("Storing data under {}", storage.dir().display());
        let mut session = Session::new(Box::new(storage), Box::new(NullAudio), seed);
        session.handle(Command::StartOrRestart);

        // Simulated clock: jump straight to each due tick
        let mut now = 0.0;
        session.frame(now);
        while session.engine().phase() == GamePhase::Running
            && session.engine().state().ticks < MAX_TICKS
        {
            let dir = choose_direction(session.engine().state());
            session.handle(Command::Turn(dir));
            now += f64::from(session.engine().current_speed());
            session.frame(now);
        }

        let state = session.engine().state();
        if state.phase == GamePhase::Running {
            log::warn!("Stopping demo after {} ticks", state.ticks);
        }
        println!(
            "seed {}: score {} (length {}) after {} ticks, best {}",
            seed,
            state.score,
            state.len(),
            state.ticks,
            session.high_score()
        );
        session.dispose();
    }

    fn wall_clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
