//! `go-import` / `go-source` meta tag discovery for vanity import paths.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;

use crate::download;

/// Head-region metadata of a module's import-path page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// `<meta property="og:site_name">`.
    pub site_name: Option<String>,
    /// `<meta name="go-import">` content: `prefix vcs repo-root`.
    pub go_import: Option<String>,
    /// `<meta name="go-source">` content.
    pub go_source: Option<String>,
}

impl PageMeta {
    fn absorb(&mut self, tag: &BytesStart<'_>) {
        let mut name = None;
        let mut property = None;
        let mut content = None;
        for attr in tag.html_attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            let key = attr.key.as_ref();
            if key.eq_ignore_ascii_case(b"name") {
                name = Some(value);
            } else if key.eq_ignore_ascii_case(b"property") {
                property = Some(value);
            } else if key.eq_ignore_ascii_case(b"content") {
                content = Some(value);
            }
        }

        let Some(content) = content else { return };
        match (name.as_deref(), property.as_deref()) {
            (Some("go-import"), _) => self.go_import = Some(content),
            (Some("go-source"), _) => self.go_source = Some(content),
            (_, Some("og:site_name")) => self.site_name = Some(content),
            _ => {}
        }
    }
}

/// Scan markup up to the first `<body>` tag and collect the meta tags of interest.
///
/// Malformed markup ends the scan with whatever was collected so far. When
/// a tag repeats, the last one wins.
pub fn scan_head(content: &str) -> PageMeta {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut meta = PageMeta::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) => {
                let name = tag.name();
                if name.as_ref().eq_ignore_ascii_case(b"body") {
                    break;
                }
                if name.as_ref().eq_ignore_ascii_case(b"meta") {
                    meta.absorb(&tag);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("stopped scanning markup: {e}");
                break;
            }
            Ok(_) => {}
        }
    }
    meta
}

/// The `(go-import, go-source)` hints of a page.
pub fn extract_source_hints(content: &str) -> (Option<String>, Option<String>) {
    let meta = scan_head(content);
    (meta.go_import, meta.go_source)
}

/// A parsed `go-import` hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    pub prefix: String,
    pub vcs: String,
    pub repo_root: String,
}

impl GoImport {
    /// Parse `prefix vcs repo-root`.
    pub fn parse(content: &str) -> Option<Self> {
        let fields: Vec<&str> = content.split_whitespace().collect();
        match fields.as_slice() {
            [prefix, vcs, repo_root] => Some(Self {
                prefix: prefix.to_string(),
                vcs: vcs.to_string(),
                repo_root: repo_root.to_string(),
            }),
            _ => None,
        }
    }

    /// Whether this hint covers `module_path`.
    pub fn covers(&self, module_path: &str) -> bool {
        module_path
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Fetch a page and scan its head.
pub async fn fetch_page_meta(client: &Client, url: &str) -> miette::Result<PageMeta> {
    let body = download::fetch_text(client, url).await?;
    Ok(scan_head(&body))
}

/// URL of a module's `go-get=1` page, on its own host or under `mirror`.
pub fn go_get_url(module_path: &str, mirror: Option<&str>) -> String {
    match mirror {
        Some(base) => format!("{}/{module_path}?go-get=1", base.trim_end_matches('/')),
        None => format!("https://{module_path}?go-get=1"),
    }
}

/// Ask a vanity import path where its git repository lives.
///
/// Returns `Ok(None)` when the page carries no usable git `go-import` hint.
pub async fn discover_git_root(
    client: &Client,
    module_path: &str,
    mirror: Option<&str>,
) -> miette::Result<Option<String>> {
    let url = go_get_url(module_path, mirror);
    let meta = fetch_page_meta(client, &url).await?;
    let hint = meta.go_import.as_deref().and_then(GoImport::parse);
    Ok(hint
        .filter(|h| h.vcs == "git" && h.covers(module_path))
        .map(|h| h.repo_root))
}
