//! Project cards rendered from `data/projects.json`.
//!
//! ## Data shape
//!
//! The file is an ordered array of project records:
//!
//! ```json
//! [
//!   {
//!     "title": { "en": "Portfolio", "pt": "Portfólio" },
//!     "description": { "en": "This site.", "pt": "Este site." },
//!     "alt": { "en": "Screenshot", "pt": "Captura de tela" },
//!     "image": "assets/img/portfolio.png",
//!     "link": "projects/portfolio.html",
//!     "technologies": ["Rust", "HTML"]
//!   }
//! ]
//! ```
//!
//! Older records use plain strings for `title`, `description` and `alt`.
//! Both shapes are normalized into [`Localized`] at load time; plain strings
//! are kept for both languages and the record is flagged as needing
//! migration.
//!
//! ## Rendering
//!
//! Cards keep source order. The featured subset is simply the first N. When
//! the list could not be loaded, the container gets a single localized error
//! message and no cards.
//!
//! Internal links are rewritten relative to the page, and into the `pt/`
//! tree on Portuguese pages. Internal images are only made relative, since
//! images are shared between languages. Absolute `http(s)` URLs pass through.
//! Any other scheme (`javascript:`, `data:`) is refused: the link becomes `#`
//! and the image source is left empty.

use crate::context::PageContext;
use crate::document::PageDocument;
use crate::types::Lang;
use maud::{Markup, html};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECTS_MOUNT: &str = "projects-container";
pub const FEATURED_MOUNT: &str = "featured-projects-container";

#[derive(Error, Debug)]
pub enum ProjectsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid project data in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Text available per language. Missing languages fall back to English,
/// then to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localized {
    pub en: Option<String>,
    pub pt: Option<String>,
}

impl Localized {
    pub fn get(&self, lang: Lang) -> &str {
        let requested = match lang {
            Lang::En => self.en.as_deref(),
            Lang::Pt => self.pt.as_deref(),
        };
        requested.or(self.en.as_deref()).unwrap_or_default()
    }
}

/// Localized field as it appears in the JSON file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLocalized {
    Plain(String),
    PerLang {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        pt: Option<String>,
    },
}

impl RawLocalized {
    fn is_legacy(&self) -> bool {
        matches!(self, RawLocalized::Plain(_))
    }

    fn normalize(self) -> Localized {
        match self {
            RawLocalized::Plain(text) => Localized {
                en: Some(text.clone()),
                pt: Some(text),
            },
            RawLocalized::PerLang { en, pt } => Localized { en, pt },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(default)]
    title: Option<RawLocalized>,
    #[serde(default)]
    description: Option<RawLocalized>,
    #[serde(default)]
    alt: Option<RawLocalized>,
    #[serde(default)]
    image: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub title: Localized,
    pub description: Localized,
    pub alt: Localized,
    pub image: String,
    pub link: String,
    pub technologies: Vec<String>,
    /// At least one localized field used the legacy plain-string shape.
    pub needs_migration: bool,
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        let needs_migration = [
            raw.title.as_ref(),
            raw.description.as_ref(),
            raw.alt.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(RawLocalized::is_legacy);
        let norm = |f: Option<RawLocalized>| f.map(RawLocalized::normalize).unwrap_or_default();
        Self {
            title: norm(raw.title),
            description: norm(raw.description),
            alt: norm(raw.alt),
            image: raw.image,
            link: raw.link,
            technologies: raw.technologies,
            needs_migration,
        }
    }
}

/// Parse a project list from JSON text.
pub fn parse(json: &str) -> Result<Vec<Project>, serde_json::Error> {
    let raw: Vec<RawProject> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(Project::from).collect())
}

/// Read and normalize the project list. Legacy records are logged.
pub fn load(path: &Path) -> Result<Vec<Project>, ProjectsError> {
    let content = fs::read_to_string(path).map_err(|source| ProjectsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let projects = parse(&content).map_err(|source| ProjectsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    for (idx, project) in projects.iter().enumerate() {
        if project.needs_migration {
            tracing::warn!(
                index = idx,
                title = project.title.get(Lang::En),
                "Project uses plain-string fields; migrate to {{\"en\", \"pt\"}} maps"
            );
        }
    }
    Ok(projects)
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// A scheme other than http(s), e.g. `javascript:` or `data:`.
fn has_foreign_scheme(url: &str) -> bool {
    !is_external(url) && url.split('/').next().is_some_and(|head| head.contains(':'))
}

/// Page-relative href for a project link.
pub fn resolve_link(link: &str, ctx: &PageContext) -> String {
    if is_external(link) {
        return link.to_string();
    }
    if has_foreign_scheme(link) {
        tracing::warn!(link, "project link with unsupported scheme replaced by #");
        return "#".to_string();
    }
    let link = link.trim_start_matches('/');
    let lang_prefix = ctx.lang().dir_prefix();
    let localized = if lang_prefix.is_empty() || link.starts_with(lang_prefix) {
        link.to_string()
    } else {
        format!("{lang_prefix}{link}")
    };
    format!("{}{}", ctx.path_to_root(), localized)
}

/// Page-relative image source. Images are shared across languages.
pub fn resolve_image(image: &str, ctx: &PageContext) -> String {
    if is_external(image) {
        return image.to_string();
    }
    if has_foreign_scheme(image) {
        tracing::warn!(image, "project image with unsupported scheme dropped");
        return String::new();
    }
    format!("{}{}", ctx.path_to_root(), image.trim_start_matches('/'))
}

pub fn error_message(lang: Lang) -> &'static str {
    lang.pick(
        "Could not load projects. Please try again later.",
        "Não foi possível carregar os projetos. Tente novamente mais tarde.",
    )
}

fn render_card(project: &Project, ctx: &PageContext) -> Markup {
    let lang = ctx.lang();
    let external = is_external(&project.link);
    html! {
        article.project-card {
            a.project-link href=(resolve_link(&project.link, ctx))
                target=[external.then_some("_blank")]
                rel=[external.then_some("noopener noreferrer")] {
                img.project-image src=(resolve_image(&project.image, ctx))
                    alt=(project.alt.get(lang)) loading="lazy";
                div.project-body {
                    h3.project-title { (project.title.get(lang)) }
                    p.project-description { (project.description.get(lang)) }
                    @if !project.technologies.is_empty() {
                        ul.project-tech {
                            @for tech in &project.technologies {
                                li.tech-badge { (tech) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render the cards, or the error message when loading failed.
///
/// `limit` takes the first N projects in source order; `None` renders all.
pub fn render<E>(
    ctx: &PageContext,
    projects: &Result<Vec<Project>, E>,
    limit: Option<usize>,
) -> Markup {
    match projects {
        Ok(list) => {
            let shown = limit.unwrap_or(list.len()).min(list.len());
            html! {
                @for project in &list[..shown] {
                    (render_card(project, ctx))
                }
            }
        }
        Err(_) => html! {
            p.projects-error role="alert" { (error_message(ctx.lang())) }
        },
    }
}

/// Fill whichever project containers the page has.
///
/// Returns the number of containers rendered.
pub fn apply<E>(
    doc: &mut PageDocument,
    ctx: &PageContext,
    projects: &Result<Vec<Project>, E>,
    featured: usize,
) -> usize {
    let mut rendered = 0;
    if doc.has_mount(PROJECTS_MOUNT) {
        let markup = render(ctx, projects, None).into_string();
        rendered += usize::from(doc.replace_inner(PROJECTS_MOUNT, &markup));
    }
    if doc.has_mount(FEATURED_MOUNT) {
        let markup = render(ctx, projects, Some(featured)).into_string();
        rendered += usize::from(doc.replace_inner(FEATURED_MOUNT, &markup));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use tempfile::TempDir;

    fn ctx(path: &str) -> PageContext {
        PageContext::new(path, Theme::Light)
    }

    fn project(n: usize) -> Project {
        Project {
            title: Localized {
                en: Some(format!("Project {n}")),
                pt: Some(format!("Projeto {n}")),
            },
            description: Localized::default(),
            alt: Localized::default(),
            image: format!("assets/img/{n}.png"),
            link: format!("projects/{n}.html"),
            technologies: vec!["Rust".to_string()],
            needs_migration: false,
        }
    }

    fn ok(n: usize) -> Result<Vec<Project>, ProjectsError> {
        Ok((0..n).map(project).collect())
    }

    #[test]
    fn parse_current_shape() {
        let projects = parse(
            r#"[{"title": {"en": "Site", "pt": "Sítio"}, "description": {"en": "d", "pt": "d"},
                 "alt": {"en": "a", "pt": "a"}, "image": "x.png", "link": "x.html",
                 "technologies": ["Rust", "CSS"]}]"#,
        )
        .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title.get(Lang::Pt), "Sítio");
        assert_eq!(projects[0].technologies, vec!["Rust", "CSS"]);
        assert!(!projects[0].needs_migration);
    }

    #[test]
    fn parse_legacy_shape_is_flagged() {
        let json = r#"[{"title": "Old", "description": "Desc", "alt": "Alt", "image": "", "link": ""}]"#;
        let projects = parse(json).unwrap();
        assert!(projects[0].needs_migration);
        assert_eq!(projects[0].title.get(Lang::En), "Old");
        assert_eq!(projects[0].title.get(Lang::Pt), "Old");
        assert!(projects[0].technologies.is_empty());
    }

    #[test]
    fn missing_language_falls_back_to_english_then_empty() {
        let text = Localized {
            en: Some("Hello".to_string()),
            pt: None,
        };
        assert_eq!(text.get(Lang::Pt), "Hello");
        let only_pt = Localized {
            en: None,
            pt: Some("Olá".to_string()),
        };
        assert_eq!(only_pt.get(Lang::En), "");
        assert_eq!(Localized::default().get(Lang::Pt), "");
    }

    #[test]
    fn limit_renders_first_n_in_order() {
        let html = render(&ctx("/index.html"), &ok(10), Some(3)).into_string();
        assert_eq!(html.matches("<article").count(), 3);
        let p0 = html.find("Project 0").unwrap();
        let p1 = html.find("Project 1").unwrap();
        let p2 = html.find("Project 2").unwrap();
        assert!(p0 < p1 && p1 < p2);
        assert!(!html.contains("Project 3"));
    }

    #[test]
    fn no_limit_renders_all() {
        let html = render(&ctx("/projects.html"), &ok(10), None).into_string();
        assert_eq!(html.matches("<article").count(), 10);
    }

    #[test]
    fn limit_larger_than_list() {
        let html = render(&ctx("/index.html"), &ok(2), Some(3)).into_string();
        assert_eq!(html.matches("<article").count(), 2);
    }

    #[test]
    fn pt_internal_link_moves_into_language_tree() {
        let c = ctx("/pt/projects.html");
        assert_eq!(
            resolve_link("projects/foo.html", &c),
            format!("{}pt/projects/foo.html", c.path_to_root())
        );
        assert_eq!(resolve_link("projects/foo.html", &c), "../pt/projects/foo.html");
    }

    #[test]
    fn pt_link_already_in_language_tree_is_kept() {
        let c = ctx("/pt/index.html");
        assert_eq!(resolve_link("pt/projects/foo.html", &c), "../pt/projects/foo.html");
        assert_eq!(resolve_link("/projects/foo.html", &c), "../pt/projects/foo.html");
    }

    #[test]
    fn en_internal_link_is_prefixed_only() {
        let c = ctx("/projects/portfolio.html");
        assert_eq!(resolve_link("projects/foo.html", &c), "../projects/foo.html");
    }

    #[test]
    fn external_urls_pass_through() {
        let c = ctx("/pt/projects/portfolio.html");
        assert_eq!(
            resolve_link("https://github.com/x/y", &c),
            "https://github.com/x/y"
        );
        assert_eq!(
            resolve_image("https://cdn.example/x.png", &c),
            "https://cdn.example/x.png"
        );
        assert_eq!(resolve_image("assets/img/x.png", &c), "../../assets/img/x.png");
    }

    #[test]
    fn script_and_data_schemes_are_not_emitted() {
        let c = ctx("/index.html");
        assert_eq!(resolve_link("javascript:alert(document.cookie)", &c), "#");
        assert_eq!(resolve_link("data:text/html,<b>x</b>", &c), "#");
        assert_eq!(resolve_image("javascript:alert(1)", &c), "");
        // a colon after the first segment is just part of the path
        assert_eq!(resolve_link("projects/a:b.html", &c), "projects/a:b.html");

        let json = r#"[{"title": "X", "link": "javascript:alert(document.cookie)",
                        "image": "data:image/svg+xml,<svg/>"}]"#;
        let list = parse(json).unwrap();
        let html = render(&c, &Ok::<_, ProjectsError>(list), None).into_string();
        assert!(!html.contains(r#"href="javascript:"#));
        assert!(!html.contains(r#"src="data:"#));
        assert!(html.contains(r##"href="#""##));
    }

    #[test]
    fn card_uses_unmodified_external_image() {
        let mut p = project(1);
        p.image = "https://cdn.example/x.png".to_string();
        let html = render(&ctx("/pt/index.html"), &Ok::<_, ProjectsError>(vec![p]), None)
            .into_string();
        assert!(html.contains(r#"src="https://cdn.example/x.png""#));
    }

    #[test]
    fn external_link_opens_new_tab() {
        let mut p = project(1);
        p.link = "https://example.com".to_string();
        let html = render(&ctx("/index.html"), &Ok::<_, ProjectsError>(vec![p]), None)
            .into_string();
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn failure_renders_only_error_message() {
        let failed: Result<Vec<Project>, &str> = Err("network down");
        let mut doc = PageDocument::new(r#"<div id="projects-container"><p>Loading…</p></div>"#);
        assert_eq!(apply(&mut doc, &ctx("/pt/projects.html"), &failed, 3), 1);
        let inner = doc.inner(PROJECTS_MOUNT).unwrap();
        assert_eq!(
            inner,
            format!(
                r#"<p class="projects-error" role="alert">{}</p>"#,
                error_message(Lang::Pt)
            )
        );
        assert!(!inner.contains("<article"));
    }

    #[test]
    fn apply_fills_both_containers() {
        let mut doc = PageDocument::new(
            r#"<div id="featured-projects-container"></div><div id="projects-container"></div>"#,
        );
        assert_eq!(apply(&mut doc, &ctx("/index.html"), &ok(5), 2), 2);
        assert_eq!(doc.inner(FEATURED_MOUNT).unwrap().matches("<article").count(), 2);
        assert_eq!(doc.inner(PROJECTS_MOUNT).unwrap().matches("<article").count(), 5);
    }

    #[test]
    fn apply_without_containers_is_noop() {
        let mut doc = PageDocument::new("<main></main>");
        assert_eq!(apply(&mut doc, &ctx("/about.html"), &ok(5), 3), 0);
        assert_eq!(doc.body, "<main></main>");
    }

    #[test]
    fn json_text_is_escaped() {
        let mut p = project(1);
        p.title.en = Some("<img src=x onerror=alert(1)>".to_string());
        let html = render(&ctx("/index.html"), &Ok::<_, ProjectsError>(vec![p]), None)
            .into_string();
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x"));
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load(&tmp.path().join("missing.json")),
            Err(ProjectsError::Io { .. })
        ));
        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(load(&bad), Err(ProjectsError::Json { .. })));
    }

    #[test]
    fn load_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projects.json");
        let json = r#"[{"title": {"en": "A"}, "link": "a.html", "image": "a.png"}]"#;
        fs::write(&path, json).unwrap();
        let projects = load(&path).unwrap();
        assert_eq!(projects[0].title.get(Lang::Pt), "A");
    }
}
