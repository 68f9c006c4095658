use super::Priority;

/// One labelled line of the current-state panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRow {
    pub label: &'static str,
    pub value: String,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentStateView {
    pub rows: Vec<StateRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AboutView {
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub tagline: Option<String>,
    pub philosophy: Option<String>,
    pub bio: Option<String>,
    pub current_work: Option<String>,
    pub expertise_summary: Option<String>,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    /// Position in the sorted, truncated list; the modal looks items up by it.
    pub index: usize,
    pub label: String,
    pub priority: Priority,
    pub status: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsView {
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentPreview {
    pub preview: String,
    pub full: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpertiseCard {
    pub index: usize,
    pub name: String,
    pub kind: Option<String>,
    pub content: Option<ContentPreview>,
    pub tags: Vec<String>,
}

impl ExpertiseCard {
    pub fn element_id(&self) -> String {
        format!("profile-expertise-{}", self.index)
    }

    pub fn is_expandable(&self) -> bool {
        self.content.as_ref().is_some_and(|c| c.truncated)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpertiseView {
    pub cards: Vec<ExpertiseCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastUpdatedView {
    pub relative: String,
    pub attribution_url: String,
    pub attribution_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Item,
    ExpertiseEntry,
}

/// Untruncated content shown in the modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: String,
    pub badges: Vec<String>,
    pub body: Option<String>,
    pub tags: Vec<String>,
}
