//! Fusion Lander entry point
//!
//! Headless runner: the autopilot flies for a stretch of simulated time,
//! answering every refuel quiz, and the leaderboard is printed at the end.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use chrono::Utc;
    use clap::Parser;

    use fusion_lander::consts::SIM_DT;
    use fusion_lander::highscores::format_date;
    use fusion_lander::persistence::{self, JsonFileStore};
    use fusion_lander::sim::{GamePhase, ShipClass};
    use fusion_lander::{Session, Settings};

    /// Seconds the autopilot "thinks" before answering a quiz
    const ANSWER_DELAY: f64 = 1.0;

    #[derive(Parser, Debug)]
    #[command(name = "fusion-lander", version, about = "Headless Fusion Lander demo")]
    struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Ship class: light or heavy
        #[arg(long, value_parser = parse_ship)]
        ship: Option<ShipClass>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        seconds: f64,

        /// Keep high scores and settings changes in memory only
        #[arg(long)]
        no_save: bool,
    }

    fn parse_ship(s: &str) -> Result<ShipClass, String> {
        ShipClass::from_str(s).ok_or_else(|| format!("unknown ship class '{}' (light|heavy)", s))
    }

    fn time_seed() -> u64 {
        Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n as u64)
            .unwrap_or(0x5eed)
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args = Args::parse();
        let settings = Settings::load();
        let seed = args.seed.unwrap_or_else(time_seed);
        let ship = args.ship.unwrap_or(settings.ship_class);
        log::info!("Fusion Lander (headless) seed={} ship={}", seed, ship.as_str());

        let mut session = Session::new(seed, settings);
        if !args.no_save {
            match JsonFileStore::in_data_dir() {
                Ok(store) => {
                    log::info!("High scores at {:?}", store.path());
                    session = session.with_store(Box::new(store));
                }
                Err(e) => log::warn!("{}; high scores will not be saved", e),
            }
            match persistence::data_path(Settings::FILE_NAME) {
                Ok(path) => session = session.with_settings_path(path),
                Err(e) => log::warn!("{}; settings will not be saved", e),
            }
        }
        session.set_autopilot(true);

        let frames = (args.seconds.max(0.0) / SIM_DT).ceil() as u64;
        let mut runs = 0u32;
        let mut landings = 0u32;
        let mut last_phase = session.phase();

        for _ in 0..frames {
            match session.phase() {
                GamePhase::Menu => {
                    if session.start(ship) {
                        runs += 1;
                    }
                }
                GamePhase::Landed => {
                    let answer = session
                        .quiz()
                        .filter(|q| q.budget - q.remaining >= ANSWER_DELAY)
                        .map(|q| q.challenge.answer);
                    if let Some(answer) = answer {
                        session.submit_answer(answer);
                    }
                }
                _ => {}
            }

            session.update(SIM_DT);

            let phase = session.phase();
            if phase != last_phase {
                if phase == GamePhase::Landed {
                    landings += 1;
                }
                if phase == GamePhase::Exploding {
                    log::info!(
                        "{} (score {})",
                        session.game_over_message().unwrap_or("GAME OVER"),
                        session.score()
                    );
                }
                last_phase = phase;
            }
        }

        println!(
            "{:.0}s simulated: {} run(s), {} landing(s), current score {}",
            args.seconds,
            runs,
            landings,
            session.score()
        );

        let now = session.now_ms();
        let board = session.high_scores();
        if board.is_empty() {
            println!("No high scores yet");
        }
        for (i, entry) in board.entries.iter().enumerate() {
            println!("{:>2}. {:>6}  {}", i + 1, entry.score, format_date(entry.timestamp, now));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Session` directly
}
