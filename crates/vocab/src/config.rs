//! JSON configuration for sets of vocabulary validators.
//!
//! ```json
//! { "string_format": [ {
//!     "formatTag": "animal_subject",
//!     "filePath": "GenBankControlledVocabulary.tsv.gz",
//!     "tableFormat": { "format": ["\t", "\t", "\t"], "entryFormat": [null, null, ", ", ", "] },
//!     "rules": { "correct": ["Scientific_Name"], "suggestions": ["Synonyms"] },
//!     "loadTableIntoMemory": true } ] }
//! ```
//!
//! Deserializing only checks the JSON shape. Everything else is checked by
//! [`ValidatorConfig::build`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, VocabError};
use crate::input::LineFormat;
use crate::registry::FormatRegistry;
use crate::validation::{EnumLookupValidator, MatchRules};

/// A list of validators, as read from one configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSetConfig {
    pub string_format: Vec<ValidatorConfig>,

    /// Directory relative `filePath`s are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ValidatorSetConfig {
    /// Parse a configuration document. Relative paths stay relative to the
    /// working directory.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file. Relative paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| VocabError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_json_str(&json)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Build every validator and register it under its format tag.
    pub fn build_registry(&self) -> Result<FormatRegistry> {
        let mut registry = FormatRegistry::new();
        for config in &self.string_format {
            let validator = config.build(self.base_dir.as_deref())?;
            registry.register(Box::new(validator))?;
        }
        info!(formats = registry.len(), "Built format registry");
        Ok(registry)
    }
}

/// One validator entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    pub format_tag: String,
    pub file_path: PathBuf,
    pub table_format: FormatConfig,
    pub rules: RulesConfig,

    /// Load the dataset into memory instead of scanning it per value.
    #[serde(default)]
    pub load_table_into_memory: bool,
}

impl ValidatorConfig {
    /// Resolve the dataset path against `base_dir`.
    pub fn resolved_path(&self, base_dir: Option<&Path>) -> PathBuf {
        match base_dir {
            Some(dir) if self.file_path.is_relative() => dir.join(&self.file_path),
            _ => self.file_path.clone(),
        }
    }

    /// Check the entry and construct its validator.
    pub fn build(&self, base_dir: Option<&Path>) -> Result<EnumLookupValidator> {
        let format = self.table_format.to_line_format()?;
        let rules = self.rules.to_rules()?;
        let path = self.resolved_path(base_dir);

        if self.load_table_into_memory {
            EnumLookupValidator::load(&self.format_tag, &path, format, rules)
        } else {
            EnumLookupValidator::streaming(&self.format_tag, path, format, rules)
        }
    }
}

/// Column and entry delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatConfig {
    /// Delimiter between each pair of adjacent columns.
    pub format: Vec<String>,

    /// Per-column sub-delimiter; `null` for single-valued columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_format: Option<Vec<Option<String>>>,
}

impl FormatConfig {
    pub fn to_line_format(&self) -> Result<LineFormat> {
        let mut format = LineFormat::new(self.format.iter().cloned())?;
        let Some(entries) = &self.entry_format else {
            return Ok(format);
        };
        if entries.len() != format.column_count() {
            return Err(VocabError::Config(format!(
                "entryFormat has {} entries but the format describes {} columns",
                entries.len(),
                format.column_count()
            )));
        }
        for (index, sub) in entries.iter().enumerate() {
            if let Some(sub) = sub {
                format = format.with_sub_delimiter(index, sub.as_str())?;
            }
        }
        Ok(format)
    }
}

/// Column lists for [`MatchRules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub correct: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl RulesConfig {
    pub fn to_rules(&self) -> Result<MatchRules> {
        let rules = MatchRules::new()
            .add_correct_columns(self.correct.iter().cloned())?
            .add_suggested_columns(self.suggestions.iter().cloned())?;
        rules.ensure_correct()?;
        Ok(rules)
    }
}
