use crate::model::{AgreementResult, Category};

/// Human-readable console summary: token counts and `p_o`, `p_e`, `kappa`
/// per category. Fixed precision so repeated runs print identical text.
pub fn render_summary(result: &AgreementResult) -> String {
    let counts = &result.counts;
    let mut out = String::new();

    out.push_str(&format!(
        "tokens: {} in {}, {} in {}, {} comparable, {} excluded, {} with differing analysis\n\n",
        counts.tokens_a,
        result.meta.label_a,
        counts.tokens_b,
        result.meta.label_b,
        counts.comparable,
        counts.excluded,
        counts.disagreeing,
    ));

    out.push_str(&format!("{:<10} {:>10} {:>10} {:>10}\n", "category", "p_o", "p_e", "kappa"));
    for category in Category::ALL {
        let stats = result.stats.get(category);
        out.push_str(&format!(
            "{:<10} {:>10.6} {:>10.6} {:>10.6}\n",
            category.as_str(),
            stats.po,
            stats.pe,
            stats.kappa
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgreementConfig;
    use crate::engine::run;
    use crate::model::{AgreementInput, AnalysisCandidate, TokenRecord};

    fn token(id: &str, lemma: &str, simple: &str) -> TokenRecord {
        TokenRecord {
            id: id.into(),
            form: lemma.into(),
            is_modified: false,
            candidate_analyses: vec![AnalysisCandidate {
                lemma: lemma.into(),
                detailed_tag: "[/N][Nom]".into(),
                simple_tag: simple.into(),
                is_correct: true,
                is_modified: false,
            }],
        }
    }

    #[test]
    fn summary_table() {
        let mut input = AgreementInput::default();
        for (id, lemma, sa, sb) in [("t1", "ház", "N", "N"), ("t2", "kert", "N", "NProp")] {
            input.a.insert(id.into(), token(id, lemma, sa));
            input.b.insert(id.into(), token(id, lemma, sb));
        }
        let result = run(&AgreementConfig::default(), &input).unwrap();
        let text = render_summary(&result);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "tokens: 2 in Annotator 1, 2 in Annotator 2, 2 comparable, 0 excluded, 1 with differing analysis"
        );
        assert_eq!(lines[2], "category          p_o        p_e      kappa");
        assert_eq!(lines[3], "lemma        1.000000   0.500000   1.000000");
        assert_eq!(lines[4], "detailed     1.000000   1.000000   1.000000");
        // simple: po = 0.5, pe = (2/2)(1/2) = 0.5, kappa = 0
        assert_eq!(lines[5], "simple       0.500000   0.500000   0.000000");
    }
}
