// arena-core/src/lib.rs
//
// Unit behavior and disc combat for the arena, driven frame by frame
// from the browser through `WasmArena`.

pub mod archetype;
pub mod config;
pub mod disc;
pub mod error;
pub mod movement;
pub mod scheduler;
pub mod sprite;
pub mod throwing;
pub mod unit;
pub mod vector;
pub mod world;

use archetype::Archetype;
use config::Config;
use error::ArenaError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use vector::Vector;
use wasm_bindgen::prelude::*;
use world::Arena;

/// Forwards `log` records to the browser console
struct ConsoleLogger;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route core logging to the console. `level` is e.g. "info" or "debug".
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter: LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    // A second call only adjusts the level
    let _ = log::set_logger(&CONSOLE_LOGGER);
    log::set_max_level(filter);
    Ok(())
}

fn to_json<T: Serialize>(value: &T, what: &'static str) -> Result<String, ArenaError> {
    serde_json::to_string(value).map_err(|source| ArenaError::Serialize { what, source })
}

fn js_error(err: ArenaError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exported arena
#[wasm_bindgen]
pub struct WasmArena {
    arena: Arena,
}

#[wasm_bindgen]
impl WasmArena {
    /// Create an arena from a JSON config, seeded from the browser's entropy
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmArena, JsValue> {
        let config = Config::from_json(config_json).map_err(js_error)?;
        Ok(WasmArena {
            arena: Arena::new(config, ChaCha8Rng::from_entropy()),
        })
    }

    /// Deterministic arena for replays and tests
    #[wasm_bindgen]
    pub fn with_seed(config_json: &str, seed: u32) -> Result<WasmArena, JsValue> {
        let config = Config::from_json(config_json).map_err(js_error)?;
        Ok(WasmArena {
            arena: Arena::with_seed(config, seed as u64),
        })
    }

    #[wasm_bindgen]
    pub fn spawn_player(&mut self, x: f32, y: f32) -> u32 {
        self.arena.spawn_player(Vector::new(x, y))
    }

    /// Spawn "warrior", "bulldog", "leader" or "guard"
    #[wasm_bindgen]
    pub fn spawn_unit(&mut self, archetype: &str, x: f32, y: f32) -> Result<u32, JsValue> {
        let archetype: Archetype = archetype.parse().map_err(js_error)?;
        Ok(self.arena.spawn(archetype, Vector::new(x, y)))
    }

    #[wasm_bindgen]
    pub fn move_player(&mut self, x: f32, y: f32) -> bool {
        self.arena.move_player(Vector::new(x, y))
    }

    #[wasm_bindgen]
    pub fn clear_player(&mut self) {
        self.arena.clear_player();
    }

    #[wasm_bindgen]
    pub fn throw_player_disc(&mut self, dx: f32, dy: f32, current_time: f64) -> bool {
        self.arena.throw_player_disc(Vector::new(dx, dy), current_time)
    }

    #[wasm_bindgen]
    pub fn hit_unit(&mut self, unit_id: u32, strength: u32) -> bool {
        self.arena.hit_unit(unit_id, strength.max(1))
    }

    /// Cancel a unit's pending automatic throw
    #[wasm_bindgen]
    pub fn cancel_throw(&mut self, unit_id: u32) -> bool {
        self.arena.cancel_throw(unit_id)
    }

    /// Advance one frame - returns JSON
    #[wasm_bindgen]
    pub fn tick(&mut self, current_time: f64) -> Result<String, JsValue> {
        let result = self.arena.tick(current_time);
        to_json(&result, "tick result").map_err(js_error)
    }

    /// Render list - returns JSON
    #[wasm_bindgen]
    pub fn draw(&self) -> Result<String, JsValue> {
        to_json(&self.arena.draw(), "draw list").map_err(js_error)
    }

    /// Every unit on the grid, player first - returns JSON
    #[wasm_bindgen]
    pub fn get_units(&self) -> Result<String, JsValue> {
        let units: Vec<_> = self
            .arena
            .player
            .iter()
            .chain(self.arena.enemies.iter())
            .collect();
        to_json(&units, "units").map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn score(&self) -> u32 {
        self.arena.score
    }

    #[wasm_bindgen]
    pub fn is_player_dead(&self) -> bool {
        self.arena.is_player_dead()
    }
}
