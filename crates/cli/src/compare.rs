use std::path::{Path, PathBuf};

use iaa_agreement::config::AgreementConfig;
use iaa_agreement::engine::{parse_tokens, run};
use iaa_agreement::model::AgreementInput;
use iaa_agreement::summary::render_summary;

use crate::CliError;

pub struct CompareArgs {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Read both files, compute agreement, print it, then write the report.
///
/// The report is only written once everything else succeeded, so a failed
/// run never leaves a partial report behind.
pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AgreementConfig::default(),
    };

    let input = AgreementInput {
        a: read_tokens(&args.file_a, &config)?,
        b: read_tokens(&args.file_b, &config)?,
    };

    let result = run(&config, &input)?;

    let stdout = if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        format!("{json}\n")
    } else {
        render_summary(&result)
    };

    let report_path = report_path(&args, &config);
    std::fs::write(&report_path, &result.report)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", report_path.display())))?;

    print!("{stdout}");
    log::info!(
        "wrote {} ({} entr{})",
        report_path.display(),
        result.entries.len(),
        if result.entries.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<AgreementConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let config = AgreementConfig::from_toml(&text)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn read_tokens(path: &Path, config: &AgreementConfig) -> Result<iaa_agreement::TokenMap, CliError> {
    let xml = std::fs::read_to_string(path).map_err(|e| {
        CliError::io(format!("cannot read {}: {e}", path.display()))
            .with_hint("both arguments must be readable UTF-8 XML files")
    })?;
    Ok(parse_tokens(&path.display().to_string(), &xml, &config.reader)?)
}

/// `--output` wins; a path from the config file is relative to that file.
fn report_path(args: &CompareArgs, config: &AgreementConfig) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    match &args.config {
        Some(config_path) => {
            let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
            base_dir.join(&config.report.path)
        }
        None => PathBuf::from(&config.report.path),
    }
}
