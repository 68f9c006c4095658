//! User interactions with rendered markup: maximize controls, the modal's
//! close paths, and expertise expand/collapse toggles.

use super::widget::ProfileWidget;
use crate::models::ModalKind;
use crate::services::modal::{CloseTrigger, ModalState};

impl ProfileWidget {
    /// Maximize control on an item or expertise card. `index` is the
    /// position carried in the rendered control.
    pub fn open_modal(&self, kind: ModalKind, index: usize) -> bool {
        self.state.lock().open_modal(kind, index)
    }

    pub fn close_modal(&self) -> bool {
        self.state.lock().close_modal(CloseTrigger::CloseButton)
    }

    pub fn click_backdrop(&self) -> bool {
        self.state.lock().close_modal(CloseTrigger::Backdrop)
    }

    pub fn key_pressed(&self, key: &str) -> bool {
        self.state.lock().key_pressed(key)
    }

    pub fn modal_state(&self) -> ModalState {
        self.state.lock().modal().state()
    }

    /// "Show more" / "Show less" on an expertise card.
    pub fn toggle_expertise(&self, index: usize) -> Option<bool> {
        self.state.lock().toggle_expertise(index)
    }
}
