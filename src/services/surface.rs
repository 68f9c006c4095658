use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::utils::html::escape_html;

/// Mount points the host page may provide. Any of them can be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mount {
    CurrentState,
    About,
    Items,
    Expertise,
    LastUpdated,
}

impl Mount {
    pub const ALL: [Mount; 5] = [
        Mount::CurrentState,
        Mount::About,
        Mount::Items,
        Mount::Expertise,
        Mount::LastUpdated,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Mount::CurrentState => "profile-current-state",
            Mount::About => "profile-about",
            Mount::Items => "profile-items",
            Mount::Expertise => "profile-expertise",
            Mount::LastUpdated => "profile-last-updated",
        }
    }
}

/// The page the widget draws into.
pub trait Surface: Send {
    fn has_mount(&self, mount: Mount) -> bool;
    /// Replace the content of a mount. Callers check `has_mount` first.
    fn set_html(&mut self, mount: Mount, html: &str);
    fn has_modal(&self) -> bool;
    fn show_modal(&mut self, html: &str);
    fn hide_modal(&mut self);
    fn set_escape_listener(&mut self, attached: bool);
    fn scroll_into_view(&mut self, element_id: &str);
}

#[derive(Debug, Default)]
struct Page {
    mounts: BTreeMap<Mount, String>,
    modal: Option<ModalSlot>,
    escape_listeners: usize,
    scroll_requests: Vec<String>,
    mutations: usize,
}

#[derive(Debug, Default)]
struct ModalSlot {
    visible: bool,
    html: String,
}

/// In-memory page. Clones share the same page so a host can keep a handle
/// while the widget owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    page: Arc<Mutex<Page>>,
}

impl MemorySurface {
    /// A page with every mount point and a modal container.
    pub fn full() -> Self {
        Self::with_mounts(&Mount::ALL, true)
    }

    pub fn with_mounts(mounts: &[Mount], modal: bool) -> Self {
        let page = Page {
            mounts: mounts.iter().map(|m| (*m, String::new())).collect(),
            modal: modal.then(ModalSlot::default),
            ..Default::default()
        };
        Self {
            page: Arc::new(Mutex::new(page)),
        }
    }

    pub fn html(&self, mount: Mount) -> Option<String> {
        self.page.lock().mounts.get(&mount).cloned()
    }

    pub fn modal_html(&self) -> Option<String> {
        let page = self.page.lock();
        page.modal.as_ref().filter(|m| m.visible).map(|m| m.html.clone())
    }

    pub fn escape_listeners(&self) -> usize {
        self.page.lock().escape_listeners
    }

    pub fn scroll_requests(&self) -> Vec<String> {
        self.page.lock().scroll_requests.clone()
    }

    /// Number of writes made to the page so far.
    pub fn mutations(&self) -> usize {
        self.page.lock().mutations
    }

    /// Assemble the page into a standalone HTML document.
    pub fn to_document(&self, title: &str) -> String {
        let page = self.page.lock();
        let mut doc = String::new();
        doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        doc.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        doc.push_str("</head>\n<body>\n");
        for (mount, html) in &page.mounts {
            doc.push_str(&format!(
                "<section id=\"{}\">{}</section>\n",
                mount.element_id(),
                html
            ));
        }
        if let Some(modal) = &page.modal {
            let hidden = if modal.visible { "" } else { " hidden" };
            doc.push_str(&format!(
                "<div id=\"profile-modal\" class=\"profile-modal\"{}>\
                 <div class=\"profile-modal-backdrop\"></div>\
                 <div class=\"profile-modal-body\">\
                 <button class=\"profile-modal-close\" aria-label=\"Close\">&times;</button>{}</div></div>\n",
                hidden, modal.html
            ));
        }
        doc.push_str("</body>\n</html>\n");
        doc
    }
}

impl Surface for MemorySurface {
    fn has_mount(&self, mount: Mount) -> bool {
        self.page.lock().mounts.contains_key(&mount)
    }

    fn set_html(&mut self, mount: Mount, html: &str) {
        let mut page = self.page.lock();
        if let Some(slot) = page.mounts.get_mut(&mount) {
            *slot = html.to_string();
            page.mutations += 1;
        }
    }

    fn has_modal(&self) -> bool {
        self.page.lock().modal.is_some()
    }

    fn show_modal(&mut self, html: &str) {
        let mut page = self.page.lock();
        if let Some(modal) = page.modal.as_mut() {
            modal.visible = true;
            modal.html = html.to_string();
            page.mutations += 1;
        }
    }

    fn hide_modal(&mut self) {
        let mut page = self.page.lock();
        if let Some(modal) = page.modal.as_mut() {
            modal.visible = false;
            modal.html.clear();
            page.mutations += 1;
        }
    }

    fn set_escape_listener(&mut self, attached: bool) {
        let mut page = self.page.lock();
        if attached {
            page.escape_listeners += 1;
        } else {
            page.escape_listeners = page.escape_listeners.saturating_sub(1);
        }
    }

    fn scroll_into_view(&mut self, element_id: &str) {
        self.page.lock().scroll_requests.push(element_id.to_string());
    }
}
