use std::str::FromStr;

use academia_core::ET_AL;
use academia_core::config_file::ConfigFile;
use regex::Regex;

use crate::ParsingError;

/// How a free-text author list is broken into names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameListStrategy {
    /// Token scanner with "Last, First" swap detection.
    #[default]
    Scanner,
    /// Split on list separators only; no swap detection.
    Split,
}

impl FromStr for NameListStrategy {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scanner" => Ok(Self::Scanner),
            "split" => Ok(Self::Split),
            _ => Err(ParsingError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Configuration for the linking pipeline.
///
/// `references_title_re` is `None` when the built-in default applies.
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Regex matched against section titles to find the bibliography.
    pub(crate) references_title_re: Option<Regex>,
    /// Surname the "et al." placeholder parses into.
    pub(crate) et_al: String,
    pub(crate) name_list_strategy: NameListStrategy,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            references_title_re: None,
            et_al: ET_AL.to_string(),
            name_list_strategy: NameListStrategy::Scanner,
        }
    }
}

impl ParsingConfig {
    pub fn et_al(&self) -> &str {
        &self.et_al
    }

    pub fn name_list_strategy(&self) -> NameListStrategy {
        self.name_list_strategy
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    references_title_re: Option<String>,
    et_al: Option<String>,
    name_list_strategy: Option<NameListStrategy>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[parsing]` table of a config file.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, ParsingError> {
        let mut builder = Self::new();
        let Some(parsing) = &file.parsing else {
            return Ok(builder);
        };
        if let Some(pattern) = &parsing.references_title {
            builder = builder.references_title_regex(pattern);
        }
        if let Some(et_al) = &parsing.et_al {
            builder = builder.et_al_sentinel(et_al);
        }
        if let Some(strategy) = &parsing.name_list_strategy {
            builder = builder.name_list_strategy(strategy.parse()?);
        }
        Ok(builder)
    }

    pub fn references_title_regex(mut self, pattern: &str) -> Self {
        self.references_title_re = Some(pattern.to_string());
        self
    }

    pub fn et_al_sentinel(mut self, sentinel: &str) -> Self {
        self.et_al = Some(sentinel.to_string());
        self
    }

    pub fn name_list_strategy(mut self, strategy: NameListStrategy) -> Self {
        self.name_list_strategy = Some(strategy);
        self
    }

    /// Compile all string patterns and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ParsingError> {
        let references_title_re = self
            .references_title_re
            .map(|p| Regex::new(&p))
            .transpose()?;

        let et_al = self
            .et_al
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| ET_AL.to_string());

        Ok(ParsingConfig {
            references_title_re,
            et_al,
            name_list_strategy: self.name_list_strategy.unwrap_or_default(),
        })
    }
}
