// Browser smoke tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(id: &str) {
    let doc = web_sys::window().unwrap().document().unwrap();
    let div: web_sys::HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    div.set_id(id);
    div.set_attribute("style", "position:relative; width:320px; height:240px;")
        .unwrap();
    doc.body().unwrap().append_child(&div).unwrap();
}

#[wasm_bindgen_test]
fn practice_starts_and_navigates() {
    mount("practice");
    hanzi_ink::web::start_practice("practice").unwrap();

    let first = hanzi_ink::web::current_character();
    assert!(first.is_some());
    hanzi_ink::web::next_character().unwrap();
    assert_ne!(hanzi_ink::web::current_character(), first);
    hanzi_ink::web::prev_character().unwrap();
    assert_eq!(hanzi_ink::web::current_character(), first);

    // fresh character: nothing to undo until something is cleared
    assert!(!hanzi_ink::web::undo_stroke().unwrap());
    hanzi_ink::web::clear_ink().unwrap();
    assert!(hanzi_ink::web::undo_stroke().unwrap());

    assert!(hanzi_ink::web::set_level(0).is_err());
    hanzi_ink::web::set_level(6).unwrap();
    assert_eq!(hanzi_ink::web::current_character().as_deref(), Some("墨"));
}
