use serde::Deserialize;

use crate::error::AgreementError;
use crate::model::Annotator;

pub const DEFAULT_REPORT_PATH: &str = "annotator_differences.txt";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgreementConfig {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Which markup carries the tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Element name of one token, matched anywhere in the tree.
    pub token_element: String,
    /// Attribute holding the token id, compared by its raw (prefixed) name.
    pub id_attribute: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            token_element: "token".into(),
            id_attribute: "xml:id".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: String,
    pub label_a: String,
    pub label_b: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_REPORT_PATH.into(),
            label_a: "Annotator 1".into(),
            label_b: "Annotator 2".into(),
        }
    }
}

impl ReportConfig {
    pub fn label(&self, annotator: Annotator) -> &str {
        match annotator {
            Annotator::A => &self.label_a,
            Annotator::B => &self.label_b,
        }
    }
}

impl AgreementConfig {
    pub fn from_toml(input: &str) -> Result<Self, AgreementError> {
        let config: AgreementConfig =
            toml::from_str(input).map_err(|e| AgreementError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AgreementError> {
        if self.reader.token_element.trim().is_empty() {
            return Err(AgreementError::ConfigValidation(
                "reader.token_element must not be empty".into(),
            ));
        }
        if self.reader.id_attribute.trim().is_empty() {
            return Err(AgreementError::ConfigValidation(
                "reader.id_attribute must not be empty".into(),
            ));
        }
        if self.report.path.trim().is_empty() {
            return Err(AgreementError::ConfigValidation(
                "report.path must not be empty".into(),
            ));
        }
        if self.report.label_a == self.report.label_b {
            return Err(AgreementError::ConfigValidation(format!(
                "report labels must differ, both are '{}'",
                self.report.label_a
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AgreementConfig::from_toml("").unwrap();
        assert_eq!(config.reader.token_element, "token");
        assert_eq!(config.reader.id_attribute, "xml:id");
        assert_eq!(config.report.path, DEFAULT_REPORT_PATH);
        assert_eq!(config.report.label_a, "Annotator 1");
    }

    #[test]
    fn parse_partial_sections() {
        let config = AgreementConfig::from_toml(
            r#"
[reader]
id_attribute = "id"

[report]
label_a = "Anna"
label_b = "Bela"
"#,
        )
        .unwrap();
        assert_eq!(config.reader.token_element, "token");
        assert_eq!(config.reader.id_attribute, "id");
        assert_eq!(config.report.path, DEFAULT_REPORT_PATH);
        assert_eq!(config.report.label_b, "Bela");
    }

    #[test]
    fn reject_identical_labels() {
        let err = AgreementConfig::from_toml(
            r#"
[report]
label_a = "X"
label_b = "X"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, AgreementError::ConfigValidation(_)));
    }

    #[test]
    fn reject_empty_token_element() {
        let err = AgreementConfig::from_toml("[reader]\ntoken_element = \"\"\n").unwrap_err();
        assert!(matches!(err, AgreementError::ConfigValidation(_)));
    }

    #[test]
    fn reject_bad_toml() {
        let err = AgreementConfig::from_toml("[report\npath = 1").unwrap_err();
        assert!(matches!(err, AgreementError::ConfigParse(_)));
    }
}
