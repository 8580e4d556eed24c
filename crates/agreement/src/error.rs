use std::fmt;

use crate::model::{Annotator, Category};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgreementError {
    /// An annotation source cannot be turned into token records.
    MalformedInput {
        source_label: String,
        token_id: Option<String>,
        message: String,
    },
    /// A comparable token has no analysis marked correct for one annotator.
    MissingSelection { token_id: String, annotator: Annotator },
    /// Chance agreement saturates (or there is nothing to compare) and kappa is undefined.
    DegenerateAgreement { category: Category, message: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty element name, duplicate labels, etc.).
    ConfigValidation(String),
}

impl fmt::Display for AgreementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput { source_label, token_id: Some(id), message } => {
                write!(f, "malformed input '{source_label}', token '{id}': {message}")
            }
            Self::MalformedInput { source_label, token_id: None, message } => {
                write!(f, "malformed input '{source_label}': {message}")
            }
            Self::MissingSelection { token_id, annotator } => {
                write!(f, "token '{token_id}': annotator {annotator} has no analysis marked correct")
            }
            Self::DegenerateAgreement { category, message } => {
                write!(f, "degenerate agreement for {category}: {message}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for AgreementError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_token() {
        let err = AgreementError::MissingSelection {
            token_id: "t9".into(),
            annotator: Annotator::B,
        };
        assert_eq!(err.to_string(), "token 't9': annotator B has no analysis marked correct");

        let err = AgreementError::MalformedInput {
            source_label: "a.xml".into(),
            token_id: Some("t1".into()),
            message: "missing <form>".into(),
        };
        assert!(err.to_string().contains("'t1'"));
        assert!(err.to_string().contains("a.xml"));
    }
}
