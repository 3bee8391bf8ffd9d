//! Handler for `licrawl meta`.

use miette::Result;

pub async fn exec(url: &str) -> Result<()> {
    licrawl_ops::ops_meta::meta(url).await
}
