use codedoc::load_config::{load_config, OUTPUT_DIR_ENV};
use codedoc_core::site::Block;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const SITE_YAML: &str = r##"
output_dir: ./tmp/site
site:
  title: Code Documentation System
  pages:
    - slug: index
      navigation:
        - id: overview
          label: Overview
          href: "#overview"
        - id: architecture
          label: Architecture
          href: "#architecture"
      sections:
        - id: overview
          title: System Overview
          blocks:
            - type: text
              text: Welcome.
            - type: cards
              cards:
                - title: Backend API
                  description: FastAPI single-file architecture
                  link: backend.html
            - type: list
              heading: Backend API Features
              items:
                - RESTful API endpoints
                - Authentication and authorization
            - type: tip
              text: Start with the component you're most interested in.
    - slug: backend
      title: FastAPI Backend Documentation
      sections:
        - id: main-app
          blocks:
            - type: code
              title: main.py
              language: python
              code: "app = FastAPI()"
            - type: code
              code: "const x = 1"
"##;

fn write_config(yaml: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), yaml).unwrap();
    config_file
}

#[test]
#[serial]
fn load_config_maps_site_pages_and_blocks() {
    env::remove_var(OUTPUT_DIR_ENV);
    let config_file = write_config(SITE_YAML);

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.output_dir, PathBuf::from("./tmp/site"));
    assert_eq!(config.site.title, "Code Documentation System");
    assert_eq!(config.site.pages.len(), 2);

    let index = &config.site.pages[0];
    assert_eq!(index.slug, "index");
    assert_eq!(index.title, None);
    assert_eq!(index.navigation.len(), 2);
    assert_eq!(index.navigation[1].href, "#architecture");
    let blocks = &index.sections[0].blocks;
    assert!(matches!(blocks[0], Block::Text(_)));
    assert!(matches!(&blocks[1], Block::Cards(c) if c.cards[0].link.as_deref() == Some("backend.html")));
    assert!(matches!(&blocks[2], Block::List(l) if l.items.len() == 2));
    assert!(matches!(blocks[3], Block::Tip(_)));

    let backend = &config.site.pages[1];
    let code: Vec<_> = backend.code_blocks().collect();
    assert_eq!(code.len(), 2);
    assert_eq!(code[0].language, "python");
    assert_eq!(code[0].title.as_deref(), Some("main.py"));
    // Code blocks without a language are treated as javascript.
    assert_eq!(code[1].language, "javascript");
    assert_eq!(code[1].title, None);
}

#[test]
#[serial]
fn load_config_defaults_output_dir_and_site_title() {
    env::remove_var(OUTPUT_DIR_ENV);
    let config_file = write_config("site:\n  pages: []\n");

    let config = load_config(config_file.path()).expect("Config should load");
    assert_eq!(config.output_dir, PathBuf::from("dist"));
    assert_eq!(config.site.title, "Code Documentation");
    assert!(config.site.pages.is_empty());
}

#[test]
#[serial]
fn environment_overrides_output_dir() {
    let config_file = write_config(SITE_YAML);
    env::set_var(OUTPUT_DIR_ENV, "/srv/docs");

    let config = load_config(config_file.path()).expect("Config should load");
    env::remove_var(OUTPUT_DIR_ENV);

    assert_eq!(config.output_dir, PathBuf::from("/srv/docs"));
}

#[test]
#[serial]
fn load_config_errors_for_invalid_file() {
    let config_file = write_config("not-yaml: [:::");

    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn load_config_errors_for_unknown_block_type() {
    let config_file = write_config(
        "site:\n  pages:\n    - slug: a\n      sections:\n        - blocks:\n            - type: video\n              url: x\n",
    );
    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("YAML"), "got: {err}");
}

#[test]
#[serial]
fn load_config_errors_for_missing_file() {
    let err = load_config("definitely/missing/site.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn demo_site_loads_and_validates() {
    env::remove_var(OUTPUT_DIR_ENV);
    let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/site.yaml");

    let config = load_config(&demo).expect("demo site should load");
    codedoc_core::build::validate_site(&config.site).expect("demo site is buildable");

    let slugs: Vec<&str> = config.site.pages.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["index", "data-pipeline", "backend", "frontend"]);

    let code_blocks: Vec<usize> = config
        .site
        .pages
        .iter()
        .map(|page| page.code_blocks().count())
        .collect();
    assert_eq!(code_blocks, vec![0, 3, 4, 7]);

    // Every page's sidebar points at a section the page actually has.
    for page in &config.site.pages {
        assert!(!page.navigation.is_empty(), "{} declares navigation", page.slug);
        for item in &page.navigation {
            let anchor = item.href.trim_start_matches('#');
            assert!(
                page.sections.iter().any(|s| s.id.as_deref() == Some(anchor)),
                "{}: no section for {}",
                page.slug,
                item.href
            );
        }
    }

    let frontend = &config.site.pages[3];
    let labels: Vec<&str> = frontend.navigation.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Overview",
            "Main App",
            "User Management",
            "Message Handler",
            "Channel Monitor",
            "Additional Features"
        ]
    );
}
