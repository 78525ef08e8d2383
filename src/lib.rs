//! Hanzi Ink core crate.
//!
//! Handwriting practice canvas: a target character is shown, the learner
//! writes over it with mouse, finger or stylus, and a bold reference mask of
//! the glyph is kept offscreen for comparison. The interesting part is the
//! ink pipeline in [`ink`]; [`web`] wires it to the DOM and exports the
//! JavaScript API (`start_practice`, navigation, hint / theme toggles,
//! clear and undo).

use wasm_bindgen::prelude::*;

pub mod error;
pub mod ink;
pub mod logging;
pub mod mask;
pub mod prefs;
pub mod session;
pub mod vocab;
pub mod web;

pub use error::InkError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level);
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Seed for deck shuffling.
pub(crate) fn random_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    // Clock-seeded fallback (not crypto secure)
    ((performance_now() * 1000.0) as u64)
        .wrapping_mul(1664525)
        .wrapping_add(1013904223)
}
