//! Operation: print the go-import metadata of a single page.

use serde::Serialize;

use licrawl_source::download;
use licrawl_source::meta::{self, PageMeta};
use licrawl_util::errors::LicrawlError;

/// The JSON record printed by `licrawl meta`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MetaRecord {
    pub sitename: String,
    pub gitsource: String,
    pub gitimport: String,
}

impl From<PageMeta> for MetaRecord {
    fn from(meta: PageMeta) -> Self {
        Self {
            sitename: meta.site_name.unwrap_or_default(),
            gitsource: meta.go_source.unwrap_or_default(),
            gitimport: meta.go_import.unwrap_or_default(),
        }
    }
}

/// Fetch `url` and print its site name and go-import / go-source hints as JSON.
pub async fn meta(url: &str) -> miette::Result<()> {
    let client = download::build_client()?;
    let page = meta::fetch_page_meta(&client, url).await?;
    let record = MetaRecord::from(page);
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| LicrawlError::Generic {
            message: format!("Failed to encode meta record: {e}"),
        })?;
    println!("{json}");
    Ok(())
}
