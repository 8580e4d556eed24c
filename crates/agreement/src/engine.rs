use crate::align::align;
use crate::calculate::calculate;
use crate::config::AgreementConfig;
use crate::error::AgreementError;
use crate::extract::extract_all;
use crate::model::{AgreementInput, AgreementMeta, AgreementResult, ReportEntry, TokenCounts};
use crate::report::{collect_entries, render};

pub use crate::reader::parse_tokens;

/// Run the agreement pipeline: align, extract, calculate, report.
///
/// Fails on the first error; no partial result is returned.
pub fn run(config: &AgreementConfig, input: &AgreementInput) -> Result<AgreementResult, AgreementError> {
    let alignment = align(&input.a, &input.b);
    let answers = extract_all(&alignment.comparable)?;
    let stats = calculate(&answers)?;

    let entries = collect_entries(&alignment.excluded, &answers, &stats);
    let report = render(&entries, &config.report);

    let disagreeing = entries
        .iter()
        .filter(|e| matches!(e, ReportEntry::DifferingAnalysis { .. }))
        .count();

    let counts = TokenCounts {
        tokens_a: input.a.len(),
        tokens_b: input.b.len(),
        union: alignment.comparable.len() + alignment.excluded.len(),
        comparable: alignment.comparable.len(),
        excluded: alignment.excluded.len(),
        disagreeing,
    };

    log::debug!(
        "kappa lemma={:.6} detailed={:.6} simple={:.6} over {} token(s)",
        stats.lemma.kappa,
        stats.detailed.kappa,
        stats.simple.kappa,
        stats.total
    );

    Ok(AgreementResult {
        meta: AgreementMeta {
            label_a: config.report.label_a.clone(),
            label_b: config.report.label_b.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        counts,
        stats,
        exclusions: alignment
            .excluded
            .iter()
            .map(|(id, token)| (id.clone(), token.reason))
            .collect(),
        entries,
        report,
    })
}
