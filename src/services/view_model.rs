//! Pure mappings from profile sections to view models.

use chrono::{DateTime, Utc};

use crate::models::profile::non_empty;
use crate::models::{
    About, AboutView, ContentPreview, CurrentState, CurrentStateView, ExpertiseCard,
    ExpertiseEntry, ExpertiseView, Identity, Item, ItemRow, ItemsView, LastUpdatedView, ModalKind,
    ModalView, StateRow,
};
use crate::services::avatar::AvatarResolver;
use crate::utils::time::format_relative_time;

pub const MAX_VISIBLE_ITEMS: usize = 5;
pub const PREVIEW_CHAR_BUDGET: usize = 500;

fn owned(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

pub fn current_state_view(state: &CurrentState, now: DateTime<Utc>) -> CurrentStateView {
    let mut rows = Vec::new();

    if let Some(focus) = owned(state.focus.as_deref()) {
        rows.push(StateRow { label: "Focus", value: focus, suffix: None });
    }
    if let Some(energy) = &state.energy {
        if let Some(display) = owned(Some(energy.display())) {
            let suffix = energy
                .updated_at()
                .map(|at| format!("updated {}", format_relative_time(at, now)));
            rows.push(StateRow { label: "Energy", value: display, suffix });
        }
    }
    if let Some(location) = owned(state.location.as_deref()) {
        rows.push(StateRow { label: "Location", value: location, suffix: None });
    }
    if let Some(availability) = owned(state.availability.as_deref()) {
        rows.push(StateRow { label: "Availability", value: availability, suffix: None });
    }

    CurrentStateView { rows }
}

/// Inputs for the about section, gathered from across the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct AboutSource<'a> {
    pub identity: Option<&'a Identity>,
    pub about: Option<&'a About>,
    pub custom_bio: Option<&'a str>,
    pub username: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub email: Option<&'a str>,
}

pub fn about_view(source: AboutSource<'_>, avatars: &AvatarResolver) -> AboutView {
    let about = source.about;
    let identity = source.identity;

    let bio = non_empty(source.custom_bio)
        .or_else(|| non_empty(about.and_then(|a| a.bio.as_deref())))
        .or_else(|| non_empty(identity.and_then(|i| i.bio.as_deref())))
        .map(str::to_string);

    let philosophy = owned(about.and_then(|a| a.philosophy.as_deref()))
        .or_else(|| owned(identity.and_then(|i| i.philosophy.as_deref())));

    let tagline = owned(about.and_then(|a| a.tagline.as_deref()))
        .filter(|t| philosophy.as_deref() != Some(t.as_str()));

    let role = owned(about.and_then(|a| a.role.as_deref()))
        .or_else(|| owned(identity.and_then(|i| i.role.as_deref())));

    let name = owned(identity.and_then(|i| i.name.as_deref())).or_else(|| owned(source.username));

    AboutView {
        avatar_url: avatars.resolve(source.avatar_url, source.email),
        name,
        role,
        tagline,
        philosophy,
        bio,
        current_work: owned(about.and_then(|a| a.current_work.as_deref())),
        expertise_summary: owned(about.and_then(|a| a.expertise_summary.as_deref())),
        expertise: identity.map(|i| i.expertise.clone()).unwrap_or_default(),
    }
}

/// Stable sort by priority rank, keeping the first `MAX_VISIBLE_ITEMS`.
pub fn visible_items(items: &[Item]) -> Vec<Item> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.priority.rank());
    sorted.truncate(MAX_VISIBLE_ITEMS);
    sorted
}

/// Rows for items already passed through [`visible_items`].
pub fn items_view(visible: &[Item]) -> ItemsView {
    let rows = visible
        .iter()
        .enumerate()
        .map(|(index, item)| ItemRow {
            index,
            label: item.label().to_string(),
            priority: item.priority,
            status: owned(item.status.as_deref()),
            tags: item.tags.clone(),
        })
        .collect();
    ItemsView { rows }
}

/// Cut `content` to at most `budget` characters at a word boundary.
pub fn preview_content(content: &str, budget: usize) -> ContentPreview {
    let full = content.to_string();
    if content.chars().count() <= budget {
        return ContentPreview { preview: full.clone(), full, truncated: false };
    }

    // Byte offset of the character at position `budget`.
    let cap = content
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    let head = &content[..cap];

    let boundary_at_cap = content[cap..].starts_with(char::is_whitespace);
    let cut = if boundary_at_cap {
        cap
    } else {
        head.char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(cap)
    };

    let mut preview = content[..cut].trim_end().to_string();
    preview.push('…');
    ContentPreview { preview, full, truncated: true }
}

pub fn expertise_view(entries: &[ExpertiseEntry]) -> ExpertiseView {
    let cards = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ExpertiseCard {
            index,
            name: if entry.name.trim().is_empty() {
                "Untitled".to_string()
            } else {
                entry.name.trim().to_string()
            },
            kind: owned(entry.kind.as_deref()),
            content: non_empty(entry.content.as_deref())
                .map(|c| preview_content(c, PREVIEW_CHAR_BUDGET)),
            tags: entry.tags.clone(),
        })
        .collect();
    ExpertiseView { cards }
}

pub fn last_updated_view(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    attribution_url: &str,
    attribution_label: &str,
) -> LastUpdatedView {
    LastUpdatedView {
        relative: format_relative_time(timestamp, now),
        attribution_url: attribution_url.to_string(),
        attribution_label: attribution_label.to_string(),
    }
}

pub fn item_modal_view(item: &Item) -> ModalView {
    let mut badges = vec![item.priority.as_str().to_string()];
    if let Some(status) = owned(item.status.as_deref()) {
        badges.push(status);
    }
    ModalView {
        kind: ModalKind::Item,
        title: item.label().to_string(),
        badges,
        body: owned(item.description.as_deref()),
        tags: item.tags.clone(),
    }
}

pub fn expertise_modal_view(entry: &ExpertiseEntry) -> ModalView {
    ModalView {
        kind: ModalKind::ExpertiseEntry,
        title: entry.name.clone(),
        badges: owned(entry.kind.as_deref()).into_iter().collect(),
        body: owned(entry.content.as_deref()),
        tags: entry.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Energy, Priority};
    use chrono::Duration;

    fn item(text: &str, priority: Priority) -> Item {
        Item {
            text: Some(text.to_string()),
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn current_state_omits_missing_fields() {
        let now = Utc::now();
        let state = CurrentState {
            focus: Some("parsers".into()),
            energy: Some(Energy::Detailed {
                display: "high".into(),
                updated_at: Some(now - Duration::minutes(10)),
            }),
            location: Some("  ".into()),
            availability: None,
        };
        let view = current_state_view(&state, now);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[1].suffix.as_deref(), Some("updated 10 minutes ago"));
    }

    #[test]
    fn bio_precedence_and_tagline_dedup() {
        let about = About {
            tagline: Some("Build small".into()),
            philosophy: Some("Build small".into()),
            bio: Some("about bio".into()),
            ..Default::default()
        };
        let identity = Identity {
            bio: Some("identity bio".into()),
            name: Some("Ada".into()),
            ..Default::default()
        };
        let avatars = AvatarResolver::default();

        let view = about_view(
            AboutSource {
                identity: Some(&identity),
                about: Some(&about),
                custom_bio: Some("custom"),
                ..Default::default()
            },
            &avatars,
        );
        assert_eq!(view.bio.as_deref(), Some("custom"));
        assert_eq!(view.tagline, None);
        assert_eq!(view.philosophy.as_deref(), Some("Build small"));
        assert_eq!(view.avatar_url, None);

        let view = about_view(
            AboutSource {
                identity: Some(&identity),
                about: Some(&About { bio: Some("".into()), ..Default::default() }),
                custom_bio: Some(" "),
                email: Some("ada@example.com"),
                ..Default::default()
            },
            &avatars,
        );
        assert_eq!(view.bio.as_deref(), Some("identity bio"));
        assert_eq!(view.name.as_deref(), Some("Ada"));
        assert!(view.avatar_url.is_some());
    }

    #[test]
    fn items_sort_stably_and_truncate() {
        let items = vec![
            item("1", Priority::High),
            item("2", Priority::High),
            item("3", Priority::Low),
        ];
        let labels: Vec<_> = items_view(&visible_items(&items))
            .rows
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["1", "2", "3"]);

        let many: Vec<_> = (0..9)
            .map(|i| item(&i.to_string(), if i % 2 == 0 { Priority::Low } else { Priority::Urgent }))
            .collect();
        let visible = visible_items(&many);
        assert_eq!(visible.len(), MAX_VISIBLE_ITEMS);
        let labels: Vec<_> = visible.iter().map(|i| i.label().to_string()).collect();
        assert_eq!(labels, vec!["1", "3", "5", "7", "0"]);
        assert_eq!(items_view(&visible).rows[4].index, 4);
    }

    #[test]
    fn unknown_priority_ranks_with_low() {
        let items = vec![
            item("unknown", Priority::Unknown),
            item("low", Priority::Low),
            item("normal", Priority::Normal),
        ];
        let labels: Vec<_> = visible_items(&items).iter().map(|i| i.label().to_string()).collect();
        assert_eq!(labels, vec!["normal", "unknown", "low"]);
    }

    #[test]
    fn preview_never_splits_words() {
        let word = "abcdefghi "; // 10 chars
        let content = word.repeat(49) + "supercalifragilistic tail";
        assert!(content.chars().count() > PREVIEW_CHAR_BUDGET);

        let preview = preview_content(&content, PREVIEW_CHAR_BUDGET);
        assert!(preview.truncated);
        assert!(preview.preview.ends_with("abcdefghi…"));
        assert!(!preview.preview.contains("super"));
        assert_eq!(preview.full, content);
    }

    #[test]
    fn preview_cuts_at_cap_when_whitespace_follows() {
        let content = "a".repeat(PREVIEW_CHAR_BUDGET) + " rest";
        let preview = preview_content(&content, PREVIEW_CHAR_BUDGET);
        assert_eq!(preview.preview.chars().count(), PREVIEW_CHAR_BUDGET + 1);
    }

    #[test]
    fn short_content_is_not_truncated() {
        let preview = preview_content("short note", PREVIEW_CHAR_BUDGET);
        assert!(!preview.truncated);
        assert_eq!(preview.preview, "short note");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let content = "é".repeat(PREVIEW_CHAR_BUDGET);
        assert!(!preview_content(&content, PREVIEW_CHAR_BUDGET).truncated);
    }

    #[test]
    fn nameless_expertise_renders_as_untitled() {
        let entries: Vec<ExpertiseEntry> =
            serde_json::from_str(r#"[{"name": null, "content": "kept"}]"#).unwrap();
        let view = expertise_view(&entries);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].name, "Untitled");
    }

    #[test]
    fn modal_views_keep_full_content() {
        let entry = ExpertiseEntry {
            name: "Rust".into(),
            kind: Some("skill".into()),
            content: Some("x ".repeat(400)),
            tags: vec!["lang".into()],
        };
        let view = expertise_modal_view(&entry);
        assert_eq!(view.body.as_ref().map(|b| b.len()), Some(799));
        assert_eq!(view.badges, vec!["skill"]);

        let view = item_modal_view(&Item {
            title: Some("ship".into()),
            priority: Priority::Urgent,
            status: Some("active".into()),
            description: Some("details".into()),
            ..Default::default()
        });
        assert_eq!(view.badges, vec!["urgent", "active"]);
        assert_eq!(view.body.as_deref(), Some("details"));
    }
}
