use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::models::{
    AboutView, CurrentState, CurrentStateView, ExpertiseCard, ExpertiseEntry, Item, ItemsView,
    LastUpdatedView, ModalView, WidgetSettings,
};
use crate::services::avatar::AvatarResolver;
use crate::services::surface::{Mount, Surface};
use crate::services::view_model::{self, AboutSource};
use crate::utils::html::{escape_html, escape_html_into};

const NO_ITEMS_TEXT: &str = "No active items shared right now.";
const NO_EXPERTISE_TEXT: &str = "No expertise shared yet.";
const OFFLINE_TEXT: &str = "Showing a static snapshot (offline)";

/// Writes each profile section to its mount point.
///
/// Every `render_*` call is a no-op when the page lacks the mount. All text
/// from the profile goes through [`escape_html`].
pub struct Renderer {
    avatars: AvatarResolver,
    attribution_url: String,
    attribution_label: String,
    expertise: Vec<ExpertiseCard>,
    expanded: BTreeSet<usize>,
}

impl Renderer {
    pub fn new(settings: &WidgetSettings) -> Self {
        Self {
            avatars: AvatarResolver::new(settings.avatar_size(), &settings.avatar_fallback_style),
            attribution_url: settings.attribution_url.clone(),
            attribution_label: settings.attribution_label.clone(),
            expertise: Vec::new(),
            expanded: BTreeSet::new(),
        }
    }

    pub fn render_current_state(
        &self,
        surface: &mut dyn Surface,
        state: Option<&CurrentState>,
        now: DateTime<Utc>,
    ) {
        if !surface.has_mount(Mount::CurrentState) {
            return;
        }
        let view = state
            .map(|s| view_model::current_state_view(s, now))
            .unwrap_or_default();
        surface.set_html(Mount::CurrentState, &current_state_html(&view));
    }

    pub fn render_about(&self, surface: &mut dyn Surface, source: AboutSource<'_>) {
        if !surface.has_mount(Mount::About) {
            return;
        }
        let view = view_model::about_view(source, &self.avatars);
        surface.set_html(Mount::About, &about_html(&view));
    }

    /// Renders already sorted and truncated items (see [`view_model::visible_items`]).
    pub fn render_items(&self, surface: &mut dyn Surface, visible: &[Item]) {
        if !surface.has_mount(Mount::Items) {
            return;
        }
        let view = view_model::items_view(visible);
        surface.set_html(Mount::Items, &items_html(&view));
    }

    /// Renders expertise cards collapsed, forgetting any earlier expansion.
    pub fn render_expertise(&mut self, surface: &mut dyn Surface, entries: &[ExpertiseEntry]) {
        self.expertise = view_model::expertise_view(entries).cards;
        self.expanded.clear();
        if !surface.has_mount(Mount::Expertise) {
            return;
        }
        surface.set_html(Mount::Expertise, &self.expertise_html());
    }

    /// Flip one card between preview and full content. Returns the new
    /// expanded state, or `None` when the card does not exist or has nothing
    /// to expand.
    pub fn toggle_expertise(&mut self, surface: &mut dyn Surface, index: usize) -> Option<bool> {
        let card = self.expertise.get(index).filter(|c| c.is_expandable())?;
        let element_id = card.element_id();
        if !surface.has_mount(Mount::Expertise) {
            return None;
        }

        let expanded = if self.expanded.remove(&index) {
            false
        } else {
            self.expanded.insert(index);
            true
        };
        surface.set_html(Mount::Expertise, &self.expertise_html());
        if !expanded {
            surface.scroll_into_view(&element_id);
        }
        Some(expanded)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn render_last_updated(
        &self,
        surface: &mut dyn Surface,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        if !surface.has_mount(Mount::LastUpdated) {
            return;
        }
        let view = view_model::last_updated_view(
            timestamp,
            now,
            &self.attribution_url,
            &self.attribution_label,
        );
        surface.set_html(Mount::LastUpdated, &last_updated_html(&view));
    }

    /// Swap the last-updated indicator for the offline marker. Other
    /// sections keep whatever they last showed.
    pub fn render_offline(&self, surface: &mut dyn Surface) {
        if !surface.has_mount(Mount::LastUpdated) {
            return;
        }
        surface.set_html(
            Mount::LastUpdated,
            &format!(
                "<span class=\"profile-offline\" role=\"status\">{}</span>",
                OFFLINE_TEXT
            ),
        );
    }

    fn expertise_html(&self) -> String {
        if self.expertise.is_empty() {
            return empty_html(NO_EXPERTISE_TEXT);
        }
        let mut html = String::from("<div class=\"profile-expertise-list\">");
        for card in &self.expertise {
            expertise_card_html(&mut html, card, self.expanded.contains(&card.index));
        }
        html.push_str("</div>");
        html
    }
}

fn empty_html(text: &str) -> String {
    format!("<p class=\"profile-empty\">{}</p>", text)
}

fn tags_html(out: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    out.push_str("<ul class=\"profile-tags\">");
    for tag in tags {
        out.push_str("<li class=\"profile-tag\">");
        escape_html_into(out, tag);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn maximize_button(out: &mut String, kind: &str, index: usize) {
    out.push_str(&format!(
        "<button class=\"profile-maximize\" data-kind=\"{}\" data-index=\"{}\" aria-label=\"Open details\">&#x2922;</button>",
        kind, index
    ));
}

fn current_state_html(view: &CurrentStateView) -> String {
    let mut html = String::from("<dl class=\"profile-state\">");
    for row in &view.rows {
        html.push_str("<div class=\"profile-state-row\"><dt>");
        html.push_str(row.label);
        html.push_str("</dt><dd>");
        escape_html_into(&mut html, &row.value);
        if let Some(suffix) = &row.suffix {
            html.push_str(" <span class=\"profile-muted\">(");
            escape_html_into(&mut html, suffix);
            html.push_str(")</span>");
        }
        html.push_str("</dd></div>");
    }
    html.push_str("</dl>");
    html
}

fn about_html(view: &AboutView) -> String {
    let mut html = String::from("<div class=\"profile-about\">");
    if let Some(url) = &view.avatar_url {
        html.push_str(&format!(
            "<img class=\"profile-avatar\" src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            escape_html(url),
            escape_html(view.name.as_deref().unwrap_or("Avatar"))
        ));
    }
    let mut tagged = |tag: &str, class: &str, value: &Option<String>| {
        if let Some(value) = value {
            html.push_str(&format!("<{} class=\"{}\">", tag, class));
            escape_html_into(&mut html, value);
            html.push_str(&format!("</{}>", tag));
        }
    };
    tagged("h3", "profile-name", &view.name);
    tagged("p", "profile-role", &view.role);
    tagged("p", "profile-tagline", &view.tagline);
    tagged("blockquote", "profile-philosophy", &view.philosophy);
    tagged("p", "profile-bio", &view.bio);
    tagged("p", "profile-current-work", &view.current_work);
    tagged("p", "profile-expertise-summary", &view.expertise_summary);
    tags_html(&mut html, &view.expertise);
    html.push_str("</div>");
    html
}

fn items_html(view: &ItemsView) -> String {
    if view.rows.is_empty() {
        return empty_html(NO_ITEMS_TEXT);
    }
    let mut html = String::from("<ul class=\"profile-items\">");
    for row in &view.rows {
        html.push_str(&format!(
            "<li class=\"profile-item profile-priority-{}\" data-index=\"{}\"><span class=\"profile-item-text\">",
            row.priority.as_str(),
            row.index
        ));
        escape_html_into(&mut html, &row.label);
        html.push_str("</span>");
        if let Some(status) = &row.status {
            html.push_str("<span class=\"profile-item-status\">");
            escape_html_into(&mut html, status);
            html.push_str("</span>");
        }
        tags_html(&mut html, &row.tags);
        maximize_button(&mut html, "item", row.index);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

fn expertise_card_html(out: &mut String, card: &ExpertiseCard, expanded: bool) {
    out.push_str(&format!(
        "<article class=\"profile-card\" id=\"{}\"><header><h4>",
        card.element_id()
    ));
    escape_html_into(out, &card.name);
    out.push_str("</h4>");
    if let Some(kind) = &card.kind {
        out.push_str("<span class=\"profile-card-type\">");
        escape_html_into(out, kind);
        out.push_str("</span>");
    }
    maximize_button(out, "expertise", card.index);
    out.push_str("</header>");

    if let Some(content) = &card.content {
        out.push_str("<div class=\"profile-card-content\">");
        let text = if expanded { &content.full } else { &content.preview };
        escape_html_into(out, text);
        out.push_str("</div>");
        if content.truncated {
            out.push_str(&format!(
                "<button class=\"profile-card-toggle\" data-index=\"{}\" aria-expanded=\"{}\">{}</button>",
                card.index,
                expanded,
                if expanded { "Show less" } else { "Show more" }
            ));
        }
    }
    tags_html(out, &card.tags);
    out.push_str("</article>");
}

fn last_updated_html(view: &LastUpdatedView) -> String {
    let mut html = String::from("<span class=\"profile-updated\">Updated ");
    escape_html_into(&mut html, &view.relative);
    html.push_str(&format!(
        "</span> <a class=\"profile-attribution\" href=\"{}\" target=\"_blank\" rel=\"noopener\">",
        escape_html(&view.attribution_url)
    ));
    escape_html_into(&mut html, &view.attribution_label);
    html.push_str("</a>");
    html
}

/// Markup for the modal body, showing the untruncated entity.
pub fn modal_html(view: &ModalView) -> String {
    let mut html = String::from("<div class=\"profile-modal-content\"><h3>");
    escape_html_into(&mut html, &view.title);
    html.push_str("</h3>");
    if !view.badges.is_empty() {
        html.push_str("<div class=\"profile-badges\">");
        for badge in &view.badges {
            html.push_str("<span class=\"profile-badge\">");
            escape_html_into(&mut html, badge);
            html.push_str("</span>");
        }
        html.push_str("</div>");
    }
    if let Some(body) = &view.body {
        html.push_str("<div class=\"profile-modal-text\">");
        escape_html_into(&mut html, body);
        html.push_str("</div>");
    }
    tags_html(&mut html, &view.tags);
    html.push_str("</div>");
    html
}
