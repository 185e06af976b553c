//! Core domain types: which guide is being converted and where its files live.

use url::Url;

use crate::error::{GuideConverterError, Result};

// ---------------------------------------------------------------------------
// GuideRef
// ---------------------------------------------------------------------------

/// A guide repository at a given branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideRef {
    /// Repository name, e.g. `guide-rest-intro`.
    pub name: String,
    /// Branch to read from, e.g. `master` or `main`.
    pub branch: String,
}

impl GuideRef {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// Reject names that could not be a repository (empty, path separators).
    pub fn validate(&self) -> Result<()> {
        for (what, value) in [("guide name", &self.name), ("branch", &self.branch)] {
            if value.trim().is_empty() {
                return Err(GuideConverterError::validation(format!("{what} is empty")));
            }
            if value.contains(char::is_whitespace) || value.contains("..") {
                return Err(GuideConverterError::validation(format!(
                    "invalid {what} '{value}'"
                )));
            }
        }
        if self.name.contains('/') {
            return Err(GuideConverterError::validation(format!(
                "guide name '{}' must not contain '/'",
                self.name
            )));
        }
        Ok(())
    }

    /// The `{projectid}` attribute value: the name without its `guide-` prefix.
    pub fn project_id(&self) -> &str {
        self.name.strip_prefix("guide-").unwrap_or(&self.name)
    }

    /// File name of the converted output.
    pub fn output_file_name(&self) -> String {
        format!("{}.md", self.name)
    }
}

impl std::fmt::Display for GuideRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.branch)
    }
}

// ---------------------------------------------------------------------------
// GuideSource
// ---------------------------------------------------------------------------

/// Remote locations of guide documents, code snippets and shared fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideSource {
    raw_host: String,
    owner: String,
    common_url: String,
}

impl GuideSource {
    pub fn new(raw_host: &str, owner: &str, common_url: &str) -> Self {
        Self {
            raw_host: raw_host.trim_end_matches('/').to_string(),
            owner: owner.trim_matches('/').to_string(),
            common_url: common_url.trim_end_matches('/').to_string(),
        }
    }

    /// Point every location at a single base URL (used against mock servers).
    pub fn with_base(base: &str, owner: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            raw_host: base.to_string(),
            owner: owner.trim_matches('/').to_string(),
            common_url: format!("{base}/guides-common"),
        }
    }

    /// `README.adoc` of the guide.
    pub fn readme_url(&self, guide: &GuideRef) -> String {
        format!("{}/README.adoc", self.repo_root(guide))
    }

    /// A finished source file, relative to the guide's `finish/` directory.
    pub fn snippet_url(&self, guide: &GuideRef, path: &str) -> String {
        format!(
            "{}/finish/{}",
            self.repo_root(guide),
            path.trim_start_matches('/')
        )
    }

    /// A shared guides-common fragment file.
    pub fn fragment_url(&self, file: &str) -> String {
        format!("{}/{}", self.common_url, file)
    }

    /// Check that the configured locations form valid URLs.
    pub fn validate(&self, guide: &GuideRef) -> Result<()> {
        for candidate in [self.readme_url(guide), self.fragment_url("gitclone.adoc")] {
            Url::parse(&candidate).map_err(|e| {
                GuideConverterError::config(format!("invalid source URL '{candidate}': {e}"))
            })?;
        }
        Ok(())
    }

    fn repo_root(&self, guide: &GuideRef) -> String {
        let host = if self.raw_host.contains("://") {
            self.raw_host.clone()
        } else {
            format!("https://{}", self.raw_host)
        };
        format!("{host}/{}/{}/{}", self.owner, guide.name, guide.branch)
    }
}

impl Default for GuideSource {
    fn default() -> Self {
        Self::new(
            "raw.githubusercontent.com",
            "openliberty",
            "https://raw.githubusercontent.com/OpenLiberty/guides-common/dev",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> GuideRef {
        GuideRef::new("guide-rest-intro", "master")
    }

    #[test]
    fn readme_and_snippet_urls() {
        let source = GuideSource::default();
        assert_eq!(
            source.readme_url(&guide()),
            "https://raw.githubusercontent.com/openliberty/guide-rest-intro/master/README.adoc"
        );
        assert_eq!(
            source.snippet_url(&guide(), "src/main/liberty/config/server.xml"),
            "https://raw.githubusercontent.com/openliberty/guide-rest-intro/master/finish/src/main/liberty/config/server.xml"
        );
    }

    #[test]
    fn fragment_url_joins_common_base() {
        let source = GuideSource::default();
        assert_eq!(
            source.fragment_url("gitclone.adoc"),
            "https://raw.githubusercontent.com/OpenLiberty/guides-common/dev/gitclone.adoc"
        );
    }

    #[test]
    fn with_base_targets_one_host() {
        let source = GuideSource::with_base("http://127.0.0.1:4000/", "openliberty");
        assert_eq!(
            source.readme_url(&guide()),
            "http://127.0.0.1:4000/openliberty/guide-rest-intro/master/README.adoc"
        );
        assert_eq!(
            source.fragment_url("twyb-end.adoc"),
            "http://127.0.0.1:4000/guides-common/twyb-end.adoc"
        );
    }

    #[test]
    fn project_id_strips_guide_prefix() {
        assert_eq!(guide().project_id(), "rest-intro");
        assert_eq!(GuideRef::new("sample", "main").project_id(), "sample");
    }

    #[test]
    fn guide_validation() {
        assert!(guide().validate().is_ok());
        assert!(GuideRef::new("", "master").validate().is_err());
        assert!(GuideRef::new("a/b", "master").validate().is_err());
        assert!(GuideRef::new("guide-x", "no such").validate().is_err());
    }
}
