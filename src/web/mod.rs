//! Browser glue: canvases, pointer listeners, frame scheduling and the
//! functions exported to JavaScript.
//!
//! All state lives in one thread-local [`App`]. Event handlers borrow it with
//! `try_borrow_mut`, so a handler that fires while a frame drain holds the
//! state is skipped instead of re-entering it.

mod canvas;

use std::cell::RefCell;

use js_sys::Reflect;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlElement, ImageData, KeyboardEvent, PointerEvent, Storage, Window, window,
};

use crate::error::InkError;
use crate::ink::point::pixel_ratio_or_default;
use crate::ink::raster::{DARK_INK, LIGHT_INK};
use crate::ink::{
    BrushConfig, FrameScheduler, InkEngine, InputCapabilities, PointerKind, RawSample,
    SurfaceGeometry,
};
use crate::mask::{BackgroundStyle, MaskLayout, render_background, render_mask};
use crate::prefs::{PrefStore, Preferences};
use crate::session::PracticeSession;
use crate::vocab::{FallbackVocab, LoadedVocab, VocabProvider};
use canvas::CanvasSurface;

const BACKGROUND_ID: &str = "hi-background";
const INK_ID: &str = "hi-ink";
const MASK_ID: &str = "hi-mask";
const LAYER_STYLE: &str = "position:absolute; left:0; top:0;";
const INK_STYLE: &str = "position:absolute; left:0; top:0; touch-action:none; cursor:crosshair;";

struct App {
    session: PracticeSession,
    engine: InkEngine<ImageData>,
    ink: CanvasSurface,
    background: CanvasSurface,
    /// Offscreen comparison reference, never attached to the document.
    mask: CanvasSurface,
    container: HtmlElement,
    caps: InputCapabilities,
    store: LocalStore,
    vocab: LoadedVocab,
    active_pointer: Option<i32>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

// --- Frame scheduling --------------------------------------------------------

/// `requestAnimationFrame` backed scheduler; the callback drains the ink queue.
struct AnimationFrames;

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) {
        FRAME.with(|cell| {
            let frame = cell.borrow();
            let (Some(cb), Some(win)) = (frame.as_ref(), window()) else {
                return;
            };
            if let Err(e) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                warn!("requestAnimationFrame failed: {}", InkError::from(e));
            }
        });
    }
}

fn install_frame_callback() {
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        APP.with(|cell| match cell.try_borrow_mut() {
            Ok(mut guard) => {
                if let Some(app) = guard.as_mut() {
                    app.engine.on_frame(&mut app.ink);
                }
            }
            Err(_) => warn!("frame skipped: state busy"),
        });
    }) as Box<dyn FnMut(f64)>);
    FRAME.with(|cell| cell.replace(Some(cb)));
}

// --- Preferences -------------------------------------------------------------

/// `localStorage` store; storage failures are logged and ignored.
struct LocalStore(Option<Storage>);

impl LocalStore {
    fn open(win: &Window) -> Self {
        let storage = win.local_storage().ok().flatten();
        if storage.is_none() {
            warn!("localStorage unavailable; preferences will not persist");
        }
        Self(storage)
    }
}

impl PrefStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.0 {
            if let Err(e) = storage.set_item(key, value) {
                warn!("could not persist {}: {}", key, InkError::from(e));
            }
        }
    }
}

// --- Startup -----------------------------------------------------------------

/// Build the practice canvases inside the element `container_id`.
#[wasm_bindgen]
pub fn start_practice(container_id: &str) -> Result<(), JsValue> {
    let win = window().ok_or(InkError::NoWindow)?;
    let doc = win.document().ok_or(InkError::NoDocument)?;
    let container: HtmlElement = doc
        .get_element_by_id(container_id)
        .ok_or_else(|| InkError::MissingElement(container_id.to_string()))?
        .dyn_into()
        .map_err(|_| InkError::MissingElement(container_id.to_string()))?;

    let background = CanvasSurface::create(&doc, BACKGROUND_ID, LAYER_STYLE)?;
    let ink = CanvasSurface::create(&doc, INK_ID, INK_STYLE)?;
    let mask = CanvasSurface::create(&doc, MASK_ID, LAYER_STYLE)?;
    container.append_child(background.canvas())?;
    container.append_child(ink.canvas())?;

    let store = LocalStore::open(&win);
    let prefs = Preferences::load(&store);
    let vocab = LoadedVocab::new();
    let session = PracticeSession::new(prefs, &vocab, crate::random_seed());
    let mut brush = BrushConfig::default();
    if session.dark_theme() {
        brush.color = DARK_INK.to_string();
    }
    let caps = probe_capabilities(&win);
    info!(
        "practice started: level {} ({} entries), input {:?}",
        session.level(),
        session.len(),
        caps
    );

    let app = App {
        session,
        engine: InkEngine::new(brush, SurfaceGeometry::default()),
        ink,
        background,
        mask,
        container,
        caps,
        store,
        vocab,
        active_pointer: None,
    };
    install_frame_callback();
    install_listeners(&doc, &win, &app)?;
    APP.with(|cell| cell.replace(Some(app)));
    with_app(|app| {
        resize(app);
        app.session.preferences().save(&mut app.store);
    })?;
    Ok(())
}

fn probe_capabilities(win: &Window) -> InputCapabilities {
    let prototype = |ctor: &str| -> Option<JsValue> {
        let c = Reflect::get(win, &JsValue::from_str(ctor)).ok()?;
        if c.is_undefined() {
            return None;
        }
        Reflect::get(&c, &JsValue::from_str("prototype")).ok()
    };
    let has = |target: Option<&JsValue>, name: &str| -> bool {
        target
            .and_then(|t| Reflect::has(t, &JsValue::from_str(name)).ok())
            .unwrap_or(false)
    };
    let win_value: &JsValue = win.as_ref();
    let pointer = prototype("PointerEvent");
    let element = prototype("Element");
    InputCapabilities {
        coalesced_events: has(pointer.as_ref(), "getCoalescedEvents"),
        raw_update: has(Some(win_value), "onpointerrawupdate"),
        pointer_capture: has(element.as_ref(), "setPointerCapture"),
    }
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Result<R, InkError> {
    APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().map_err(|_| InkError::Busy)?;
        let app = guard.as_mut().ok_or(InkError::NotStarted)?;
        Ok(f(app))
    })
}

// --- Layout & layers -----------------------------------------------------------

/// Reallocate every surface to the container size. Ink is discarded.
fn resize(app: &mut App) {
    let pixel_ratio = pixel_ratio_or_default(window().map(|w| w.device_pixel_ratio()));
    let rect = app.container.get_bounding_client_rect();
    let (w, h) = (rect.width().floor(), rect.height().floor());
    app.background.resize(w, h, pixel_ratio);
    app.ink.resize(w, h, pixel_ratio);
    app.mask.resize(w, h, pixel_ratio);
    let origin = app.ink.canvas().get_bounding_client_rect();
    app.engine.resize(SurfaceGeometry {
        origin_x: origin.left(),
        origin_y: origin.top(),
        pixel_ratio,
    });
    debug!("surfaces resized to {}x{} @{}", w, h, pixel_ratio);
    render_layers(app);
}

fn render_layers(app: &mut App) {
    let layout = MaskLayout::compute(app.ink.width() as f64, app.ink.height() as f64);
    let glyph = app
        .session
        .current()
        .map(|e| e.character.clone())
        .unwrap_or_default();
    render_mask(&glyph, &layout, &mut app.mask);
    render_background(
        &glyph,
        app.session.hint(),
        BackgroundStyle::for_theme(app.session.dark_theme()),
        &layout,
        &mut app.background,
        app.engine.geometry().pixel_ratio,
    );
}

/// New target character: fresh ink, fresh undo history, redrawn layers.
fn character_changed(app: &mut App) {
    app.active_pointer = None;
    app.engine.reset();
    crate::ink::InkSurface::clear(&mut app.ink);
    render_layers(app);
    app.session.preferences().save(&mut app.store);
    if let Some(entry) = app.session.current() {
        debug!("character changed to {} ({})", entry.character, entry.pronunciation);
    }
}

// --- Input ---------------------------------------------------------------------

fn num_prop(target: &JsValue, name: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_f64())
}

fn sample_from(evt: &PointerEvent) -> RawSample {
    let kind = PointerKind::from_pointer_type(&evt.pointer_type());
    let client_x = num_prop(evt, "clientX").unwrap_or(evt.client_x() as f64);
    let client_y = num_prop(evt, "clientY").unwrap_or(evt.client_y() as f64);
    let mut s = RawSample::new(client_x, client_y, evt.time_stamp(), kind);
    s.pressure = Some(evt.pressure() as f64);
    s.force = num_prop(evt, "webkitForce");
    s.altitude = num_prop(evt, "altitudeAngle");
    s.azimuth = num_prop(evt, "azimuthAngle");
    s
}

fn samples_from(evt: &PointerEvent, caps: &InputCapabilities) -> Vec<RawSample> {
    if caps.expand_coalesced() {
        let coalesced: Vec<RawSample> = evt
            .get_coalesced_events()
            .iter()
            .filter_map(|e| e.dyn_into::<PointerEvent>().ok())
            .map(|e| sample_from(&e))
            .collect();
        if !coalesced.is_empty() {
            return coalesced;
        }
    }
    vec![sample_from(evt)]
}

fn on_pointer_down(app: &mut App, evt: &PointerEvent) {
    if app.active_pointer.is_some_and(|id| id != evt.pointer_id()) {
        return;
    }
    evt.prevent_default();
    app.active_pointer = Some(evt.pointer_id());
    if app.caps.pointer_capture {
        if let Err(e) = app.ink.canvas().set_pointer_capture(evt.pointer_id()) {
            debug!("pointer capture refused: {}", InkError::from(e));
        }
    }
    let rect = app.ink.canvas().get_bounding_client_rect();
    app.engine.set_origin(rect.left(), rect.top());
    app.engine
        .begin_stroke(&sample_from(evt), &app.ink, &mut AnimationFrames);
}

fn on_pointer_move(app: &mut App, evt: &PointerEvent) {
    if app.active_pointer != Some(evt.pointer_id()) {
        return;
    }
    evt.prevent_default();
    let samples = samples_from(evt, &app.caps);
    app.engine.extend_stroke(&samples, &mut AnimationFrames);
}

fn on_pointer_up(app: &mut App, evt: &PointerEvent) {
    if app.active_pointer != Some(evt.pointer_id()) {
        return;
    }
    app.active_pointer = None;
    app.engine.end_stroke(&mut app.ink);
    if app.caps.pointer_capture {
        app.ink
            .canvas()
            .release_pointer_capture(evt.pointer_id())
            .ok();
    }
}

fn on_pointer_cancel(app: &mut App, evt: &PointerEvent) {
    if app.active_pointer != Some(evt.pointer_id()) {
        return;
    }
    app.active_pointer = None;
    app.engine.cancel_stroke();
}

fn listen_pointer(
    target: &web_sys::EventTarget,
    event: &str,
    handler: fn(&mut App, &PointerEvent),
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
        if let Err(e) = with_app(|app| handler(app, &evt)) {
            debug!("pointer event dropped: {}", e);
        }
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_listeners(doc: &Document, win: &Window, app: &App) -> Result<(), JsValue> {
    let ink = app.ink.canvas();
    listen_pointer(ink, "pointerdown", on_pointer_down)?;
    listen_pointer(ink, app.caps.move_event(), on_pointer_move)?;
    listen_pointer(ink, "pointerup", on_pointer_up)?;
    listen_pointer(ink, "pointercancel", on_pointer_cancel)?;
    // without capture the stroke ends when the pointer leaves the canvas
    listen_pointer(ink, "pointerleave", on_pointer_up)?;

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Err(e) = with_app(resize) {
                warn!("resize skipped: {}", e);
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard shortcuts: arrows navigate, h toggles the hint, ctrl+z undoes.
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let key = evt.key();
            let result = with_app(|app| match key.as_str() {
                "ArrowRight" => navigate(app, PracticeSession::next),
                "ArrowLeft" => navigate(app, PracticeSession::prev),
                "h" | "H" => {
                    let hint = !app.session.hint();
                    app.session.set_hint(hint);
                    render_layers(app);
                }
                "z" | "Z" if evt.ctrl_key() || evt.meta_key() => {
                    app.engine.undo(&mut app.ink);
                }
                _ => {}
            });
            if let Err(e) = result {
                debug!("key {} ignored: {}", key, e);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn navigate(app: &mut App, step: fn(&mut PracticeSession) -> bool) {
    if step(&mut app.session) {
        character_changed(app);
    }
}

// --- Exports -------------------------------------------------------------------

#[wasm_bindgen]
pub fn next_character() -> Result<(), JsValue> {
    with_app(|app| navigate(app, PracticeSession::next))?;
    Ok(())
}

#[wasm_bindgen]
pub fn prev_character() -> Result<(), JsValue> {
    with_app(|app| navigate(app, PracticeSession::prev))?;
    Ok(())
}

#[wasm_bindgen]
pub fn goto_character(index: usize) -> Result<(), JsValue> {
    with_app(|app| {
        if app.session.goto(index) {
            character_changed(app);
        }
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_level(level: u8) -> Result<(), JsValue> {
    with_app(|app| {
        app.session
            .set_level(level, &app.vocab, crate::random_seed())?;
        character_changed(app);
        Ok::<_, InkError>(())
    })??;
    Ok(())
}

/// Replace the deck data with a JSON object keyed by level.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn load_vocabulary(json: &str) -> Result<(), JsValue> {
    let vocab = LoadedVocab::from_json(json)?;
    with_app(|app| {
        app.vocab = vocab;
        let level = app.session.level();
        app.session
            .set_level(level, &app.vocab, crate::random_seed())?;
        character_changed(app);
        Ok::<_, InkError>(())
    })??;
    Ok(())
}

#[wasm_bindgen]
pub fn set_hint(on: bool) -> Result<(), JsValue> {
    with_app(|app| {
        if app.session.set_hint(on) {
            render_layers(app);
        }
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_shuffle(on: bool) -> Result<(), JsValue> {
    with_app(|app| {
        if app.session.shuffle() == on {
            return;
        }
        app.session.set_shuffle(on, crate::random_seed());
        app.session.preferences().save(&mut app.store);
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_dark_theme(on: bool) -> Result<(), JsValue> {
    with_app(|app| {
        if app.session.set_dark_theme(on) {
            app.engine.set_ink_color(if on { DARK_INK } else { LIGHT_INK });
            render_layers(app);
            app.session.preferences().save(&mut app.store);
        }
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn clear_ink() -> Result<(), JsValue> {
    with_app(|app| app.engine.clear(&mut app.ink))?;
    Ok(())
}

/// Returns false when there is nothing to undo.
#[wasm_bindgen]
pub fn undo_stroke() -> Result<bool, JsValue> {
    Ok(with_app(|app| app.engine.undo(&mut app.ink))?)
}

#[wasm_bindgen]
pub fn current_character() -> Option<String> {
    current_field(|e| e.character.clone())
}

#[wasm_bindgen]
pub fn current_pronunciation() -> Option<String> {
    current_field(|e| e.pronunciation.clone())
}

#[wasm_bindgen]
pub fn current_definition() -> Option<String> {
    current_field(|e| e.definition.clone())
}

fn current_field(f: impl Fn(&crate::vocab::VocabEntry) -> String) -> Option<String> {
    with_app(|app| app.session.current().map(&f)).ok().flatten()
}

/// Entry count of a built-in level, for hosts that render a level picker.
#[wasm_bindgen]
pub fn builtin_level_size(level: u8) -> usize {
    FallbackVocab.load(level).len()
}
