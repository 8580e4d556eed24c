//! Observed agreement, chance agreement and Cohen's kappa per category.
//!
//! With `N` comparable tokens, `agree` matching tokens and `a_v`/`b_v` the
//! number of tokens where annotator A/B selected value `v`:
//!
//! - `po = agree / N`
//! - `pe = Σ_v (a_v / N) * (b_v / N)`
//! - `kappa = (po - pe) / (1 - pe)`
//!
//! Everything is accumulated as integers and kappa is taken as
//! `(agree*N - Σ a_v*b_v) / (N² - Σ a_v*b_v)`, so `pe == 1` and `po == 1`
//! are exact comparisons.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::AgreementError;
use crate::model::{AgreementStats, Category, CategoryStats, Marginal, TokenAnswers, ValueShare};

/// Running counts for one category.
#[derive(Debug, Clone, Default)]
pub struct AgreementTally {
    pub agree_count: usize,
    pub disagree_count: usize,
    pub marginals: BTreeMap<String, Marginal>,
    pub disagreements: BTreeSet<String>,
}

impl AgreementTally {
    pub fn record(&mut self, token_id: &str, matched: bool, value_a: &str, value_b: &str) {
        if matched {
            self.agree_count += 1;
        } else {
            self.disagree_count += 1;
            self.disagreements.insert(token_id.to_string());
        }
        self.marginals.entry(value_a.to_string()).or_default().count_a += 1;
        self.marginals.entry(value_b.to_string()).or_default().count_b += 1;
    }

    pub fn total(&self) -> usize {
        self.agree_count + self.disagree_count
    }

    /// Compute `(po, pe, kappa)` and the per-value table.
    pub fn finish(&self, category: Category) -> Result<CategoryStats, AgreementError> {
        let n = self.total() as u64;
        if n == 0 {
            return Err(AgreementError::DegenerateAgreement {
                category,
                message: "no comparable tokens".into(),
            });
        }

        let n_sq = n * n;
        let chance: u64 = self
            .marginals
            .values()
            .map(|m| m.count_a as u64 * m.count_b as u64)
            .sum();
        let agree = self.agree_count as u64;

        let po = agree as f64 / n as f64;
        let pe = chance as f64 / n_sq as f64;

        let kappa = if chance == n_sq {
            if agree != n {
                return Err(AgreementError::DegenerateAgreement {
                    category,
                    message: format!(
                        "chance agreement is 1 but observed agreement is {po} ({agree}/{n})"
                    ),
                });
            }
            1.0
        } else {
            (agree as i128 * n as i128 - chance as i128) as f64 / (n_sq - chance) as f64
        };

        let values = self
            .marginals
            .iter()
            .map(|(value, m)| {
                let share = ValueShare {
                    count_a: m.count_a,
                    count_b: m.count_b,
                    p: (m.count_a as f64 / n as f64) * (m.count_b as f64 / n as f64),
                };
                (value.clone(), share)
            })
            .collect();

        Ok(CategoryStats {
            category,
            po,
            pe,
            kappa,
            agree_count: self.agree_count,
            disagree_count: self.disagree_count,
            values,
            disagreements: self.disagreements.clone(),
        })
    }
}

/// One tally per category, fixed at compile time.
#[derive(Debug, Clone, Default)]
pub struct CategoryTallies {
    pub lemma: AgreementTally,
    pub detailed: AgreementTally,
    pub simple: AgreementTally,
}

impl CategoryTallies {
    pub fn get_mut(&mut self, category: Category) -> &mut AgreementTally {
        match category {
            Category::Lemma => &mut self.lemma,
            Category::Detailed => &mut self.detailed,
            Category::Simple => &mut self.simple,
        }
    }

    pub fn record(&mut self, answers: &TokenAnswers) {
        for category in Category::ALL {
            self.get_mut(category).record(
                &answers.id,
                answers.matches.get(category),
                answers.a.value(category),
                answers.b.value(category),
            );
        }
    }
}

/// Aggregate all comparable tokens' answers into per-category statistics.
pub fn calculate(answers: &[TokenAnswers]) -> Result<AgreementStats, AgreementError> {
    let mut tallies = CategoryTallies::default();
    for token in answers {
        tallies.record(token);
    }

    Ok(AgreementStats {
        total: answers.len(),
        lemma: tallies.lemma.finish(Category::Lemma)?,
        detailed: tallies.detailed.finish(Category::Detailed)?,
        simple: tallies.simple.finish(Category::Simple)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryMatches, Selection};

    fn sel(lemma: &str, detailed: &str, simple: &str) -> Selection {
        Selection {
            lemma: lemma.into(),
            detailed_tag: detailed.into(),
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

    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-12
    }

    #[test]
    fn full_agreement_on_ten_tokens() {
        let tokens: Vec<_> = (0..10)
            .map(|i| {
                let s = sel(&format!("l{}", i % 4), &format!("d{}", i % 3), &format!("s{}", i % 2));
                answers(&format!("t{i:02}"), s.clone(), s)
            })
            .collect();
        let stats = calculate(&tokens).unwrap();
        assert_eq!(stats.total, 10);
        for category in Category::ALL {
            let c = stats.get(category);
            assert_eq!(c.po, 1.0);
            assert_eq!(c.kappa, 1.0);
            assert!(c.pe < 1.0);
            assert!(c.disagreements.is_empty());
        }
    }

    #[test]
    fn textbook_kappa() {
        // 2x2 table: yes/yes 20, yes/no 5, no/yes 10, no/no 15 (N = 50)
        // po = 0.7, pe = 0.5*0.6 + 0.5*0.4 = 0.5, kappa = 0.4
        let mut tokens = Vec::new();
        let cells = [("yes", "yes", 20), ("yes", "no", 5), ("no", "yes", 10), ("no", "no", 15)];
        let mut i = 0;
        for (va, vb, count) in cells {
            for _ in 0..count {
                tokens.push(answers(&format!("t{i:03}"), sel(va, "d", "s"), sel(vb, "d", "s")));
                i += 1;
            }
        }
        let stats = calculate(&tokens).unwrap();
        let lemma = &stats.lemma;
        assert!(close(lemma.po, 0.7));
        assert!(close(lemma.pe, 0.5));
        assert!(close(lemma.kappa, 0.4));
        assert_eq!(lemma.agree_count, 35);
        assert_eq!(lemma.disagree_count, 15);
        assert_eq!(lemma.disagreements.len(), 15);
        assert_eq!(lemma.values["yes"].count_a, 25);
        assert_eq!(lemma.values["yes"].count_b, 30);
        assert!(close(lemma.values["yes"].p, 0.3));
    }

    #[test]
    fn marginals_count_each_annotator_independently() {
        let tokens = vec![
            answers("t1", sel("a", "d", "s"), sel("b", "d", "s")),
            answers("t2", sel("b", "d", "s"), sel("b", "d", "s")),
        ];
        let stats = calculate(&tokens).unwrap();
        let lemma = &stats.lemma;
        assert_eq!(lemma.values["a"].count_a, 1);
        assert_eq!(lemma.values["a"].count_b, 0);
        assert_eq!(lemma.values["b"].count_a, 1);
        assert_eq!(lemma.values["b"].count_b, 2);
        // pe = (1/2)(0/2) + (1/2)(2/2) = 0.5, po = 0.5 → kappa 0
        assert!(close(lemma.pe, 0.5));
        assert!(close(lemma.kappa, 0.0));
        assert_eq!(lemma.disagreements.iter().collect::<Vec<_>>(), vec!["t1"]);
    }

    #[test]
    fn single_shared_value_is_perfect_agreement() {
        // pe saturates at 1 and po is 1 → kappa defined as 1.
        let tokens = vec![
            answers("t1", sel("x", "d", "s"), sel("x", "d", "s")),
            answers("t2", sel("x", "d", "s"), sel("x", "d", "s")),
        ];
        let stats = calculate(&tokens).unwrap();
        for category in Category::ALL {
            assert_eq!(stats.get(category).pe, 1.0);
            assert_eq!(stats.get(category).kappa, 1.0);
        }
    }

    #[test]
    fn total_disagreement_is_negative_kappa() {
        let tokens = vec![
            answers("t1", sel("a", "d", "s"), sel("b", "d", "s")),
            answers("t2", sel("b", "d", "s"), sel("a", "d", "s")),
        ];
        let stats = calculate(&tokens).unwrap();
        assert_eq!(stats.lemma.po, 0.0);
        assert!(close(stats.lemma.pe, 0.5));
        assert!(close(stats.lemma.kappa, -1.0));
    }

    #[test]
    fn saturated_chance_without_agreement_is_degenerate() {
        let mut tally = AgreementTally::default();
        // Inconsistent on purpose: a match flag that contradicts the values.
        tally.record("t1", false, "x", "x");
        let err = tally.finish(Category::Simple).unwrap_err();
        assert!(matches!(
            err,
            AgreementError::DegenerateAgreement { category: Category::Simple, .. }
        ));
    }

    #[test]
    fn empty_comparable_set_is_degenerate() {
        let err = calculate(&[]).unwrap_err();
        assert!(matches!(
            err,
            AgreementError::DegenerateAgreement { category: Category::Lemma, .. }
        ));
    }
}
