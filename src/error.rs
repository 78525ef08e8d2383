use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the edges of the ink pipeline (DOM setup, storage, deck data).
///
/// The pipeline itself never fails: missing device capabilities fall back to
/// inference and an unready surface turns a drain into a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InkError {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("2d context unavailable for canvas")]
    ContextUnavailable,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[error("practice state is busy (frame drain in progress)")]
    Busy,
    #[error("practice session not started; call start_practice() first")]
    NotStarted,
    #[error("unknown vocabulary level {0}")]
    UnknownLevel(u8),
    #[error("vocabulary payload invalid: {0}")]
    Vocab(String),
}

impl From<JsValue> for InkError {
    fn from(value: JsValue) -> Self {
        InkError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<InkError> for JsValue {
    fn from(err: InkError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
