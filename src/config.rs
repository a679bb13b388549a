use crate::error::{Error, Result};
use std::path::PathBuf;

/// Label assignment policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Every independently matching label is assigned; a record may carry several.
    MultiLabel,
    /// First matching label in taxonomy order; the fallback label when none match.
    SingleLabel,
}

impl From<&str> for LabelPolicy {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "single" => LabelPolicy::SingleLabel,
            _ => LabelPolicy::MultiLabel,
        }
    }
}

/// Which text the Docker relevance filter inspects before a record is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceScope {
    /// Keep every row with a pull request object
    Off,
    /// Require a Docker token in the pull request body
    BodyOnly,
    /// Require a Docker token anywhere in title, body, or comments
    FullText,
}

impl From<&str> for RelevanceScope {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" => RelevanceScope::Off,
            "body" => RelevanceScope::BodyOnly,
            _ => RelevanceScope::FullText,
        }
    }
}

/// Configuration for the batch processor
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub policy: LabelPolicy,
    pub relevance: RelevanceScope,
    pub rewrap_width: Option<usize>,
    pub rescale: bool,
    pub limit: Option<usize>,
}

impl Config {
    /// Create a new default configuration
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            policy: LabelPolicy::MultiLabel,
            relevance: RelevanceScope::FullText,
            rewrap_width: None,
            rescale: false,
            limit: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.exists() {
            return Err(Error::Config(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }

        if !self.input_dir.is_dir() {
            return Err(Error::Config(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }

        if self.rewrap_width == Some(0) {
            return Err(Error::Config(
                "Re-wrap width must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(input_dir),
        }
    }

    /// Set the label policy
    pub fn policy(mut self, policy: LabelPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Set the label policy from string ("multi" or "single")
    pub fn policy_str(mut self, policy: &str) -> Self {
        self.config.policy = LabelPolicy::from(policy);
        self
    }

    /// Set the relevance filter scope
    pub fn relevance(mut self, scope: RelevanceScope) -> Self {
        self.config.relevance = scope;
        self
    }

    /// Set the relevance filter scope from string ("off", "body", or "full")
    pub fn relevance_str(mut self, scope: &str) -> Self {
        self.config.relevance = RelevanceScope::from(scope);
        self
    }

    /// Re-wrap normalized title and body text at the given width
    pub fn rewrap_width(mut self, width: usize) -> Self {
        self.config.rewrap_width = Some(width);
        self
    }

    /// Rescale summary percentages so the cross-label sum is exactly 100
    pub fn rescale(mut self, rescale: bool) -> Self {
        self.config.rescale = rescale;
        self
    }

    /// Set the record limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Clear the record limit
    pub fn no_limit(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}
