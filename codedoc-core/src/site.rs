//! Documentation site model: pages, navigation lists, sections and content
//! blocks. Everything here is plain data deserialized from the site file and
//! handed to [`crate::render`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_TITLE: &str = "Code Documentation";
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// One sidebar link. `href` is not checked against the page's anchors; a
/// dangling anchor simply renders a link that goes nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub href: String,
}

impl NavItem {
    pub fn new(id: &str, label: &str, href: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// Sidebar entries used by pages that declare no navigation of their own.
pub fn default_navigation() -> Vec<NavItem> {
    vec![
        NavItem::new("overview", "Overview", "#overview"),
        NavItem::new("getting-started", "Getting Started", "#getting-started"),
        NavItem::new("examples", "Examples", "#examples"),
        NavItem::new("api", "API Reference", "#api"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

fn default_site_title() -> String {
    DEFAULT_SITE_TITLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// File stem of the rendered page (`backend` → `backend.html`).
    pub slug: String,
    /// Header title; falls back to the site title when absent.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub navigation: Vec<NavItem>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Page {
    /// Declared navigation, or [`default_navigation`] when none is declared.
    pub fn effective_navigation(&self) -> Vec<NavItem> {
        if self.navigation.is_empty() {
            default_navigation()
        } else {
            self.navigation.clone()
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.sections
            .iter()
            .flat_map(|section| section.blocks.iter())
            .filter_map(|block| match block {
                Block::Code(code) => Some(code),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text(TextBlock),
    Code(CodeBlock),
    List(ListBlock),
    Cards(CardsBlock),
    Tip(TextBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    #[serde(default = "default_code_language")]
    pub language: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl CodeBlock {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: default_code_language(),
            title: None,
        }
    }
}

fn default_code_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    #[serde(default)]
    pub heading: Option<String>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsBlock {
    pub cards: Vec<Card>,
}

/// Summary card linking to another page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}
