use crate::domain::ports::Launcher;
use crate::utils::error::{Result, ToolError};
use url::Url;

/// Build the explainshell query URL for `words`, joined by single spaces.
pub fn build_explain_url<S: AsRef<str>>(base_url: &str, words: &[S]) -> Result<Url> {
    let command = words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");

    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut().append_pair("cmd", &command);
    Ok(url)
}

/// Opens URLs with the desktop's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn launch(&self, url: &str) -> Result<()> {
        tracing::debug!("Opening {} in the default browser", url);
        open::that(url).map_err(|source| ToolError::BrowserError {
            url: url.to_string(),
            source,
        })
    }
}

pub fn explain<S: AsRef<str>, L: Launcher>(base_url: &str, words: &[S], launcher: &L) -> Result<Url> {
    let url = build_explain_url(base_url, words)?;
    launcher.launch(url.as_str())?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const BASE: &str = "http://explainshell.com/explain";

    #[derive(Default)]
    struct RecordingLauncher {
        opened: RefCell<Vec<String>>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, url: &str) -> Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_words_are_joined_and_encoded() {
        let url = build_explain_url(BASE, &["tar", "-xzvf", "a&b.tgz"]).unwrap();
        assert_eq!(url.as_str(), "http://explainshell.com/explain?cmd=tar+-xzvf+a%26b.tgz");

        let cmd: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(cmd, vec![("cmd".to_string(), "tar -xzvf a&b.tgz".to_string())]);
    }

    #[test]
    fn test_no_words_gives_empty_query() {
        let url = build_explain_url::<&str>(BASE, &[]).unwrap();
        assert_eq!(url.as_str(), "http://explainshell.com/explain?cmd=");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = build_explain_url(BASE.trim_start_matches("http://"), &["ls"]).unwrap_err();
        assert!(matches!(err, ToolError::UrlError(_)));
    }

    #[test]
    fn test_explain_launches_built_url() {
        let launcher = RecordingLauncher::default();
        let url = explain(BASE, &["ls", "-la"], &launcher).unwrap();

        assert_eq!(launcher.opened.borrow().as_slice(), [url.to_string()]);
        assert!(url.as_str().ends_with("?cmd=ls+-la"));
    }
}
