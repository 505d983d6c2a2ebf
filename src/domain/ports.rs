use crate::utils::error::Result;
use async_trait::async_trait;

/// Opens URLs for the user.
pub trait Launcher {
    fn launch(&self, url: &str) -> Result<()>;
}

#[async_trait]
pub trait TitleFetcher: Send + Sync {
    /// `Ok(None)` means the page had no usable `<title>`.
    async fn fetch_title(&self, url: &str) -> Result<Option<String>>;
}
