use std::collections::BTreeSet;

use crate::model::{Alignment, ComparableToken, ExcludedToken, ExclusionReason, TokenMap, TokenRecord};

/// Join two annotators' tokens by id and split them into comparable and excluded.
///
/// Single pass over the union of ids; every id lands in exactly one side.
/// Neither input is modified.
pub fn align(a: &TokenMap, b: &TokenMap) -> Alignment {
    let ids: BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    let mut alignment = Alignment::default();

    for id in ids {
        match (a.get(id), b.get(id)) {
            (Some(token_a), Some(token_b)) => match edit_conflict(token_a, token_b) {
                None => {
                    alignment.comparable.insert(
                        id.clone(),
                        ComparableToken {
                            id: id.clone(),
                            a: token_a.clone(),
                            b: token_b.clone(),
                        },
                    );
                }
                Some(reason) => {
                    alignment.excluded.insert(
                        id.clone(),
                        ExcludedToken {
                            id: id.clone(),
                            a: Some(token_a.clone()),
                            b: Some(token_b.clone()),
                            reason,
                        },
                    );
                }
            },
            (Some(token_a), None) => {
                alignment.excluded.insert(
                    id.clone(),
                    ExcludedToken {
                        id: id.clone(),
                        a: Some(token_a.clone()),
                        b: None,
                        reason: ExclusionReason::OnlyInA,
                    },
                );
            }
            (None, Some(token_b)) => {
                alignment.excluded.insert(
                    id.clone(),
                    ExcludedToken {
                        id: id.clone(),
                        a: None,
                        b: Some(token_b.clone()),
                        reason: ExclusionReason::OnlyInB,
                    },
                );
            }
            // The id came from one of the two maps.
            (None, None) => {}
        }
    }

    log::debug!(
        "aligned {} token id(s): {} comparable, {} excluded",
        alignment.comparable.len() + alignment.excluded.len(),
        alignment.comparable.len(),
        alignment.excluded.len(),
    );

    alignment
}

/// Why two records of the same id cannot be compared, if they cannot.
///
/// A form edited on one side only is treated like a tokenization
/// disagreement, not an annotation disagreement.
fn edit_conflict(a: &TokenRecord, b: &TokenRecord) -> Option<ExclusionReason> {
    match (a.modified_text(), b.modified_text()) {
        (Some(text_a), Some(text_b)) if text_a != text_b => Some(ExclusionReason::ConflictingEdits),
        (Some(_), None) | (None, Some(_)) => Some(ExclusionReason::OneSidedEdit),
        _ => None,
    }
}
