//! Lane Strike headless runner
//!
//! Drives the simulation at a fixed host refresh with a simple autopilot,
//! advancing through stages and retrying on game over, then prints the final
//! snapshot as JSON. Usage: `lane-strike [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use glam::Vec2;
    use lane_strike::Settings;
    use lane_strike::consts::PLAYER_START_Y;
    use lane_strike::sim::{
        FrameInput, GameState, Mode, Snapshot, frame, next_stage, retry,
        run_complete,
    };

    /// Host refresh rate
    const HOST_DT: f32 = 1.0 / 60.0;
    /// Ten minutes of play
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const MAX_RETRIES: u32 = 3;

    /// Chase the lowest enemy's column, otherwise drift back to center
    fn autopilot(state: &GameState) -> FrameInput {
        let lowest = state
            .enemies
            .iter()
            .filter(|e| e.pos.y > 0.0)
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let x = lowest.map(|e| e.pos.x).unwrap_or(state.player.pos.x);
        let step = (x - state.player.pos.x).clamp(-0.05, 0.05);
        FrameInput {
            drag: Some(Vec2::new(step, PLAYER_START_Y - state.player.pos.y)),
            ..Default::default()
        }
    }

    pub fn run() {
        env_logger::init();

        let settings = std::env::args()
            .nth(1)
            .map(|path| Settings::load(Path::new(&path)))
            .unwrap_or_default();
        let mut state = GameState::from_settings(&settings, rand::random());
        log::info!("Lane Strike (headless) starting with seed {}", state.seed);

        let mut retries = 0;
        for _ in 0..MAX_FRAMES {
            let input = autopilot(&state);
            frame(&mut state, &input, HOST_DT);

            match state.mode {
                Mode::GameOver if retries < MAX_RETRIES => {
                    retries += 1;
                    retry(&mut state);
                }
                Mode::GameOver => break,
                Mode::Cleared if run_complete(&state) => {
                    log::info!("Run complete with {} kills", state.total_score);
                    break;
                }
                Mode::Cleared => {
                    next_stage(&mut state);
                }
                _ => {}
            }
        }

        match serde_json::to_string_pretty(&Snapshot::of(&state)) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}
