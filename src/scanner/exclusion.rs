//! Path exclusion rules built from explicit patterns and named templates

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::core::error::{Error, Result};

/// Immutable mapping from template name to exclusion fragments.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<String, Vec<String>>,
}

impl TemplateSet {
    /// Templates shipped with the tool.
    ///
    /// * `restic` - repository `config` file, which is not content addressed
    /// * `darwin` - Finder metadata files
    pub fn builtin() -> Self {
        Self::from_iter([
            ("restic", vec!["config"]),
            ("darwin", vec![r"\.DS_Store"]),
        ])
    }

    /// Fragments for `name`; unknown names yield none.
    pub fn fragments(&self, name: &str) -> &[String] {
        self.templates.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl<N, F, P> FromIterator<(N, F)> for TemplateSet
where
    N: Into<String>,
    F: IntoIterator<Item = P>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, F)>>(iter: I) -> Self {
        let templates = iter
            .into_iter()
            .map(|(name, fragments)| {
                (name.into(), fragments.into_iter().map(Into::into).collect())
            })
            .collect();
        Self { templates }
    }
}

/// Compiled exclusion filter shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    pattern: Option<Regex>,
}

impl ExclusionFilter {
    /// Filter that excludes nothing.
    pub fn none() -> Self {
        Self { pattern: None }
    }

    /// Union explicit patterns with the fragments of each named template
    ///
    /// # Arguments
    /// * `explicit` - User supplied regular expressions
    /// * `template_names` - Names looked up in `templates`; unknown names are ignored
    /// * `templates` - Template table to resolve names against
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] naming the first fragment that does not
    /// compile on its own.
    pub fn build<S, T>(
        explicit: &[S],
        template_names: &[T],
        templates: &TemplateSet,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let fragments: Vec<&str> = explicit
            .iter()
            .map(|pattern| pattern.as_ref())
            .chain(
                template_names
                    .iter()
                    .flat_map(|name| templates.fragments(name.as_ref()))
                    .map(String::as_str),
            )
            .collect();

        if fragments.is_empty() {
            return Ok(Self::none());
        }

        // Compile each fragment alone first so the error names the culprit.
        for fragment in &fragments {
            Regex::new(fragment).map_err(|source| Error::InvalidPattern {
                pattern: (*fragment).to_owned(),
                source,
            })?;
        }

        let combined = format!("({})", fragments.join(")|("));
        let pattern = Regex::new(&combined).map_err(|source| Error::InvalidPattern {
            pattern: combined.clone(),
            source,
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// True if any fragment matches somewhere in the full path.
    pub fn matches(&self, path: &Path) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(&path.to_string_lossy()),
            None => false,
        }
    }

    /// The combined alternation, if any fragments were supplied.
    #[cfg(test)]
    fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}
