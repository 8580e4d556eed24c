use std::collections::BTreeMap;

use crate::error::AgreementError;
use crate::model::{
    Annotator, CategoryMatches, ComparableToken, Selection, TokenAnswers, TokenRecord,
};

/// The analysis an annotator marked correct.
///
/// When several candidates are marked, the last one in document order wins.
pub fn select(record: &TokenRecord, annotator: Annotator) -> Result<Selection, AgreementError> {
    let marked: Vec<_> = record
        .candidate_analyses
        .iter()
        .filter(|c| c.is_correct)
        .collect();

    let chosen = marked.last().ok_or_else(|| AgreementError::MissingSelection {
        token_id: record.id.clone(),
        annotator,
    })?;

    if marked.len() > 1 {
        log::warn!(
            "token '{}': annotator {} marked {} analyses correct, using the last one",
            record.id,
            annotator,
            marked.len()
        );
    }

    Ok(Selection {
        lemma: chosen.lemma.clone(),
        detailed_tag: chosen.detailed_tag.clone(),
        simple_tag: chosen.simple_tag.clone(),
        is_modified: chosen.is_modified,
    })
}

/// Extract both annotators' answers and compare them per category.
pub fn extract(token: &ComparableToken) -> Result<TokenAnswers, AgreementError> {
    let a = select(&token.a, Annotator::A)?;
    let b = select(&token.b, Annotator::B)?;

    let matches = CategoryMatches {
        lemma: a.lemma == b.lemma,
        detailed: a.detailed_tag == b.detailed_tag,
        simple: a.simple_tag == b.simple_tag,
    };

    Ok(TokenAnswers {
        id: token.id.clone(),
        a,
        b,
        matches,
    })
}

/// Extract every comparable token in ascending id order. Stops at the first error.
pub fn extract_all(
    comparable: &BTreeMap<String, ComparableToken>,
) -> Result<Vec<TokenAnswers>, AgreementError> {
    comparable.values().map(extract).collect()
}
