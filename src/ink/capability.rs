//! Input capabilities, probed once per input source instead of per event.

/// What the current browser's pointer events can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InputCapabilities {
    /// `PointerEvent.getCoalescedEvents()` is available.
    pub coalesced_events: bool,
    /// `pointerrawupdate` fires (higher frequency than `pointermove`).
    pub raw_update: bool,
    /// `Element.setPointerCapture()` is available.
    pub pointer_capture: bool,
}

impl InputCapabilities {
    /// Event that carries in-stroke motion.
    pub fn move_event(&self) -> &'static str {
        if self.raw_update {
            "pointerrawupdate"
        } else {
            "pointermove"
        }
    }

    /// Whether a move event should be expanded into its coalesced samples.
    /// `pointerrawupdate` events are already delivered one per sample.
    pub fn expand_coalesced(&self) -> bool {
        self.coalesced_events && !self.raw_update
    }
}
