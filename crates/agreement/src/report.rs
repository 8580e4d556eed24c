use std::collections::{BTreeMap, BTreeSet};

use crate::config::ReportConfig;
use crate::model::{
    AgreementStats, Annotator, Category, ExcludedToken, ExclusionReason, ReportEntry, Selection,
    TokenAnswers,
};

const MISSING: &str = "-";

/// Collect one entry per implicated token id, sorted ascending by id.
///
/// Implicated ids are every excluded id plus every id in any category's
/// disagreement set. A token that disagrees on several categories gets a
/// single entry listing all of them.
pub fn collect_entries(
    excluded: &BTreeMap<String, ExcludedToken>,
    answers: &[TokenAnswers],
    stats: &AgreementStats,
) -> Vec<ReportEntry> {
    let by_id: BTreeMap<&str, &TokenAnswers> =
        answers.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut ids: BTreeSet<&str> = excluded.keys().map(String::as_str).collect();
    for category in Category::ALL {
        ids.extend(stats.get(category).disagreements.iter().map(String::as_str));
    }

    ids.into_iter()
        .filter_map(|id| {
            if let Some(token) = excluded.get(id) {
                return Some(ReportEntry::DifferingToken {
                    id: id.to_string(),
                    reason: token.reason,
                    form_a: token.a.as_ref().map(|t| t.form.clone()),
                    form_b: token.b.as_ref().map(|t| t.form.clone()),
                });
            }
            let token = by_id.get(id)?;
            let categories = Category::ALL
                .into_iter()
                .filter(|c| stats.get(*c).disagreements.contains(id))
                .collect();
            Some(ReportEntry::DifferingAnalysis {
                id: id.to_string(),
                a: token.a.clone(),
                b: token.b.clone(),
                categories,
            })
        })
        .collect()
}

/// Render entries as the plain-text difference report.
pub fn render(entries: &[ReportEntry], labels: &ReportConfig) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            ReportEntry::DifferingToken { id, reason, form_a, form_b } => {
                out.push_str(&format!("Token: {id}\tdiffering tokens ({})\n", reason_text(*reason, labels)));
                out.push_str(&format!("{}: {}\n", labels.label_a, form_a.as_deref().unwrap_or(MISSING)));
                out.push_str(&format!("{}: {}\n", labels.label_b, form_b.as_deref().unwrap_or(MISSING)));
            }
            ReportEntry::DifferingAnalysis { id, a, b, categories } => {
                let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
                out.push_str(&format!("Token: {id}\tdiffering analysis ({})\n", names.join(", ")));
                out.push_str(&analysis_line(&labels.label_a, a));
                out.push_str(&analysis_line(&labels.label_b, b));
            }
        }
        out.push('\n');
    }
    out
}

fn reason_text(reason: ExclusionReason, labels: &ReportConfig) -> String {
    match reason {
        ExclusionReason::OnlyInA => format!("only in {}", labels.label(Annotator::A)),
        ExclusionReason::OnlyInB => format!("only in {}", labels.label(Annotator::B)),
        ExclusionReason::ConflictingEdits => "conflicting form edits".into(),
        ExclusionReason::OneSidedEdit => "form edited by one annotator".into(),
    }
}

fn analysis_line(label: &str, selection: &Selection) -> String {
    format!(
        "{label}:\tana modified={}\t(lemma: {} | detailed: {} | simple: {})\n",
        selection.is_modified, selection.lemma, selection.detailed_tag, selection.simple_tag
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::calculate;
    use crate::model::{CategoryMatches, TokenRecord};

    fn sel(lemma: &str, simple: &str) -> Selection {
        Selection {
            lemma: lemma.into(),
            detailed_tag: "[/N][Nom]".into(),
            simple_tag: simple.into(),
            is_modified: false,
        }
    }

    fn answers(id: &str, a: Selection, b: Selection) -> TokenAnswers {
        let matches = CategoryMatches {
            lemma: a.lemma == b.lemma,
            detailed: a.detailed_tag == b.detailed_tag,
            simple: a.simple_tag == b.simple_tag,
        };
        TokenAnswers { id: id.into(), a, b, matches }
    }

    fn only_in_a(id: &str, form: &str) -> (String, ExcludedToken) {
        let token = ExcludedToken {
            id: id.into(),
            a: Some(TokenRecord {
                id: id.into(),
                form: form.into(),
                is_modified: false,
                candidate_analyses: Vec::new(),
            }),
            b: None,
            reason: ExclusionReason::OnlyInA,
        };
        (id.to_string(), token)
    }

    #[test]
    fn entries_are_sorted_and_unique() {
        let tokens = vec![
            answers("t1", sel("house", "N"), sel("house", "N")),
            answers("t2", sel("house", "N"), sel("house", "NProp")),
            answers("t3", sel("go", "V"), sel("went", "N")),
        ];
        let stats = calculate(&tokens).unwrap();
        let excluded: BTreeMap<_, _> = [only_in_a("t5", "ház"), only_in_a("t0", "a")].into();

        let entries = collect_entries(&excluded, &tokens, &stats);
        let ids: Vec<&str> = entries.iter().map(ReportEntry::id).collect();
        assert_eq!(ids, vec!["t0", "t2", "t3", "t5"]);

        match &entries[2] {
            ReportEntry::DifferingAnalysis { categories, .. } => {
                assert_eq!(categories, &vec![Category::Lemma, Category::Simple]);
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn render_differing_analysis() {
        let tokens = vec![
            answers("t1", sel("house", "N"), sel("house", "N")),
            answers("t2", sel("house", "N"), sel("house", "NProp")),
        ];
        let stats = calculate(&tokens).unwrap();
        let entries = collect_entries(&BTreeMap::new(), &tokens, &stats);
        let text = render(&entries, &ReportConfig::default());
        assert_eq!(
            text,
            "Token: t2\tdiffering analysis (simple)\n\
             Annotator 1:\tana modified=false\t(lemma: house | detailed: [/N][Nom] | simple: N)\n\
             Annotator 2:\tana modified=false\t(lemma: house | detailed: [/N][Nom] | simple: NProp)\n\
             \n"
        );
    }

    #[test]
    fn render_differing_token() {
        let entries = vec![ReportEntry::DifferingToken {
            id: "t5".into(),
            reason: ExclusionReason::OnlyInA,
            form_a: Some("ház".into()),
            form_b: None,
        }];
        let labels = ReportConfig {
            label_a: "Anna".into(),
            label_b: "Bela".into(),
            ..ReportConfig::default()
        };
        assert_eq!(
            render(&entries, &labels),
            "Token: t5\tdiffering tokens (only in Anna)\nAnna: ház\nBela: -\n\n"
        );
    }

    #[test]
    fn nothing_to_report() {
        let s = sel("house", "N");
        let tokens = vec![answers("t1", s.clone(), s)];
        let stats = calculate(&tokens).unwrap();
        let entries = collect_entries(&BTreeMap::new(), &tokens, &stats);
        assert!(entries.is_empty());
        assert_eq!(render(&entries, &ReportConfig::default()), "");
    }
}
