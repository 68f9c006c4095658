use crate::models::{ExpertiseEntry, Item, ModalKind};
use crate::services::renderer::modal_html;
use crate::services::surface::Surface;
use crate::services::view_model::{expertise_modal_view, item_modal_view};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalSelection {
    pub kind: ModalKind,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ModalSelection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    EscapeKey,
}

/// Drives the single modal surface.
///
/// Lookups go against copies of the rendered sequences, refreshed on every
/// render, so an index always means what the user saw.
#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
    items: Vec<Item>,
    entries: Vec<ExpertiseEntry>,
    debug: bool,
}

impl ModalController {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            ..Self::default()
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn cache(&mut self, items: Vec<Item>, entries: Vec<ExpertiseEntry>) {
        self.items = items;
        self.entries = entries;
    }

    /// Show the full content of the selected entity. Out-of-range indices
    /// leave the page and the state untouched.
    pub fn open(&mut self, surface: &mut dyn Surface, kind: ModalKind, index: usize) -> bool {
        if !surface.has_modal() {
            return false;
        }
        let view = match kind {
            ModalKind::Item => self.items.get(index).map(item_modal_view),
            ModalKind::ExpertiseEntry => self.entries.get(index).map(expertise_modal_view),
        };
        let Some(view) = view else {
            return false;
        };

        surface.show_modal(&modal_html(&view));
        if !self.is_open() {
            surface.set_escape_listener(true);
        }
        self.state = ModalState::Open(ModalSelection { kind, index });
        true
    }

    pub fn close(&mut self, surface: &mut dyn Surface, trigger: CloseTrigger) -> bool {
        if !self.is_open() {
            return false;
        }
        if self.debug {
            log::debug!("closing modal via {:?}", trigger);
        }
        surface.hide_modal();
        surface.set_escape_listener(false);
        self.state = ModalState::Closed;
        true
    }

    pub fn handle_key(&mut self, surface: &mut dyn Surface, key: &str) -> bool {
        if key == "Escape" {
            self.close(surface, CloseTrigger::EscapeKey)
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::surface::{MemorySurface, Mount};

    fn controller() -> ModalController {
        let mut modal = ModalController::new(false);
        modal.cache(
            vec![Item {
                text: Some("first".into()),
                description: Some("all the details".into()),
                ..Default::default()
            }],
            vec![ExpertiseEntry {
                name: "Rust".into(),
                content: Some("long ".repeat(200)),
                ..Default::default()
            }],
        );
        modal
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut surface = MemorySurface::full();
        let mut modal = controller();
        assert!(!modal.open(&mut surface, ModalKind::Item, 1));
        assert!(!modal.open(&mut surface, ModalKind::ExpertiseEntry, 7));
        assert_eq!(surface.mutations(), 0);
        assert_eq!(surface.escape_listeners(), 0);
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn open_replace_and_close() {
        let mut surface = MemorySurface::full();
        let mut modal = controller();

        assert!(modal.open(&mut surface, ModalKind::Item, 0));
        assert!(surface.modal_html().unwrap().contains("all the details"));

        assert!(modal.open(&mut surface, ModalKind::ExpertiseEntry, 0));
        let html = surface.modal_html().unwrap();
        assert!(html.contains("Rust"));
        assert!(!html.contains('…'));
        assert_eq!(surface.escape_listeners(), 1);
        assert_eq!(
            modal.state(),
            ModalState::Open(ModalSelection { kind: ModalKind::ExpertiseEntry, index: 0 })
        );

        assert!(modal.close(&mut surface, CloseTrigger::Backdrop));
        assert_eq!(surface.modal_html(), None);
        assert_eq!(surface.escape_listeners(), 0);
        assert!(!modal.close(&mut surface, CloseTrigger::CloseButton));
    }

    #[test]
    fn escape_closes_other_keys_do_not() {
        let mut surface = MemorySurface::full();
        let mut modal = controller();
        modal.open(&mut surface, ModalKind::Item, 0);
        assert!(!modal.handle_key(&mut surface, "Enter"));
        assert!(modal.is_open());
        assert!(modal.handle_key(&mut surface, "Escape"));
        assert!(!modal.is_open());
    }

    #[test]
    fn listeners_do_not_accumulate_across_opens() {
        let mut surface = MemorySurface::full();
        let mut modal = controller();
        for _ in 0..5 {
            modal.open(&mut surface, ModalKind::Item, 0);
            modal.close(&mut surface, CloseTrigger::CloseButton);
        }
        assert_eq!(surface.escape_listeners(), 0);
    }

    #[test]
    fn page_without_modal_container() {
        let mut surface = MemorySurface::with_mounts(&[Mount::Items], false);
        let mut modal = controller();
        assert!(!modal.open(&mut surface, ModalKind::Item, 0));
        assert!(!modal.is_open());
    }
}
