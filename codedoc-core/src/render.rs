//! HTML rendering of the documentation components.
//!
//! Each component is a [Tera](https://keats.github.io/tera/) template bundled
//! from `templates/` and rendered with autoescaping on:
//!
//! - [`render_page`]: full document, layout plus the page script
//! - [`render_layout`]: header with menu toggle, sidebar navigation, main area
//! - [`render_section`]: titled, anchored section wrapping content blocks
//! - [`render_code_block`]: highlighted code with title bar and copy button
//! - [`render_content`], [`render_list`], [`render_cards`], [`render_tip`]
//!
//! Highlighted code is the only markup passed through unescaped; it comes from
//! [`crate::highlight`], which escapes span text before tagging it.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, error};

use crate::copy_feedback::DEFAULT_RESET_WINDOW;
use crate::highlight::{annotate, LexicalCategory};
use crate::site::{default_navigation, Block, Card, CodeBlock, ListBlock, NavItem, Page, Section, Site};

const TEMPLATES: [(&str, &str); 11] = [
    ("page.html", include_str!("../templates/page.html")),
    ("layout.html", include_str!("../templates/layout.html")),
    ("navigation.html", include_str!("../templates/navigation.html")),
    ("section.html", include_str!("../templates/section.html")),
    ("block.html", include_str!("../templates/block.html")),
    ("code_block.html", include_str!("../templates/code_block.html")),
    ("content.html", include_str!("../templates/content.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("cards.html", include_str!("../templates/cards.html")),
    ("tip.html", include_str!("../templates/tip.html")),
    ("style.css", include_str!("../templates/style.css")),
];

fn templates() -> &'static Tera {
    static ENGINE: OnceLock<Tera> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .expect("bundled templates are valid");
        tera
    })
}

/// A bundled template failed to render.
#[derive(Debug)]
pub struct RenderError {
    pub template: String,
    pub source: tera::Error,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to render {}: {}", self.template, self.source)
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn render(template: &str, context: &Context) -> Result<String, RenderError> {
    templates().render(template, context).map_err(|source| {
        error!(template, error = ?source, "Template rendering failed");
        RenderError {
            template: template.to_string(),
            source,
        }
    })
}

/// Open/closed state of the sidebar on narrow screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub sidebar_open: bool,
}

impl LayoutState {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn sidebar_class(&self) -> &'static str {
        if self.sidebar_open {
            "sidebar open"
        } else {
            "sidebar hidden"
        }
    }

    fn toggle_label(&self) -> &'static str {
        if self.sidebar_open {
            "Close menu"
        } else {
            "Open menu"
        }
    }
}

#[derive(Serialize)]
struct CodeBlockView<'a> {
    title: Option<&'a str>,
    language: &'a str,
    highlighted: String,
    // Raw text for the copy button; never the highlight markup.
    source: &'a str,
}

impl<'a> From<&'a CodeBlock> for CodeBlockView<'a> {
    fn from(block: &'a CodeBlock) -> Self {
        Self {
            title: block.title.as_deref(),
            language: &block.language,
            highlighted: annotate(&block.code).to_html(),
            source: &block.code,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum BlockView<'a> {
    Text { text: &'a str },
    Code(CodeBlockView<'a>),
    List(&'a ListBlock),
    Cards { cards: &'a [Card] },
    Tip { text: &'a str },
}

impl<'a> From<&'a Block> for BlockView<'a> {
    fn from(block: &'a Block) -> Self {
        match block {
            Block::Text(text) => BlockView::Text { text: &text.text },
            Block::Code(code) => BlockView::Code(code.into()),
            Block::List(list) => BlockView::List(list),
            Block::Cards(cards) => BlockView::Cards { cards: &cards.cards },
            Block::Tip(tip) => BlockView::Tip { text: &tip.text },
        }
    }
}

#[derive(Serialize)]
struct SectionView<'a> {
    id: Option<&'a str>,
    title: Option<&'a str>,
    blocks: Vec<BlockView<'a>>,
}

impl<'a> From<&'a Section> for SectionView<'a> {
    fn from(section: &'a Section) -> Self {
        Self {
            id: section.id.as_deref(),
            title: section.title.as_deref(),
            blocks: section.blocks.iter().map(BlockView::from).collect(),
        }
    }
}

fn block_context<T: Serialize + ?Sized>(block: &T) -> Context {
    let mut context = Context::new();
    context.insert("block", block);
    context
}

pub fn render_code_block(block: &CodeBlock) -> Result<String, RenderError> {
    render("code_block.html", &block_context(&CodeBlockView::from(block)))
}

pub fn render_content(text: &str) -> Result<String, RenderError> {
    render("content.html", &block_context(&BlockView::Text { text }))
}

pub fn render_tip(text: &str) -> Result<String, RenderError> {
    render("tip.html", &block_context(&BlockView::Tip { text }))
}

pub fn render_list(list: &ListBlock) -> Result<String, RenderError> {
    render("list.html", &block_context(list))
}

pub fn render_cards(cards: &[Card]) -> Result<String, RenderError> {
    render("cards.html", &block_context(&BlockView::Cards { cards }))
}

pub fn render_block(block: &Block) -> Result<String, RenderError> {
    render("block.html", &block_context(&BlockView::from(block)))
}

pub fn render_section(section: &Section) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("section", &SectionView::from(section));
    render("section.html", &context)
}

/// One entry per item, in order; an empty list yields the default entries.
fn navigation_items(items: &[NavItem]) -> Vec<NavItem> {
    if items.is_empty() {
        default_navigation()
    } else {
        items.to_vec()
    }
}

/// One link per entry, in order. An empty list renders the default entries.
pub fn render_navigation(items: &[NavItem]) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("navigation", &navigation_items(items));
    render("navigation.html", &context)
}

fn layout_context(title: &str, navigation: &[NavItem], state: LayoutState, sections: &[Section]) -> Context {
    let sections: Vec<SectionView<'_>> = sections.iter().map(SectionView::from).collect();
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("navigation", &navigation_items(navigation));
    context.insert("sidebar_class", state.sidebar_class());
    context.insert("sidebar_expanded", &state.sidebar_open.to_string());
    context.insert("toggle_label", state.toggle_label());
    context.insert("sections", &sections);
    context
}

pub fn render_layout(
    title: &str,
    navigation: &[NavItem],
    state: LayoutState,
    sections: &[Section],
) -> Result<String, RenderError> {
    render("layout.html", &layout_context(title, navigation, state, sections))
}

/// Render a complete HTML document for `page`.
///
/// The document carries a small script that toggles the sidebar and wires
/// every copy button to the browser clipboard, resetting its "copied" state
/// after [`DEFAULT_RESET_WINDOW`].
pub fn render_page(site: &Site, page: &Page, state: LayoutState) -> Result<String, RenderError> {
    let title = page.title.as_deref().unwrap_or(&site.title);
    let mut context = layout_context(title, &page.navigation, state, &page.sections);
    context.insert("copy_reset_ms", &(DEFAULT_RESET_WINDOW.as_millis() as u64));
    let html = render("page.html", &context)?;
    debug!(slug = %page.slug, sections = page.sections.len(), bytes = html.len(), "Rendered page");
    Ok(html)
}

#[derive(Serialize)]
struct HighlightRule {
    class: &'static str,
    style: &'static str,
}

fn category_style(category: LexicalCategory) -> &'static str {
    match category {
        LexicalCategory::Keyword => "color: #c678dd; font-weight: 600;",
        LexicalCategory::String => "color: #98c379;",
        LexicalCategory::Number => "color: #d19a66;",
        LexicalCategory::Comment => "color: #7f848e; font-style: italic;",
        LexicalCategory::FunctionName => "color: #61afef;",
    }
}

/// Stylesheet shared by every page; one rule per highlight category.
pub fn stylesheet() -> Result<String, RenderError> {
    let rules: Vec<HighlightRule> = LexicalCategory::ALL
        .into_iter()
        .map(|category| HighlightRule {
            class: category.css_class(),
            style: category_style(category),
        })
        .collect();
    let mut context = Context::new();
    context.insert("highlight_rules", &rules);
    render("style.css", &context)
}
