// iaa - inter-annotator agreement for morphologically annotated corpora

mod compare;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use exit_codes::{error_exit_code, EXIT_SUCCESS};
use iaa_agreement::AgreementError;

#[derive(Parser)]
#[command(name = "iaa")]
#[command(about = "Cohen's kappa between two annotators' lemma and tag choices")]
#[command(version)]
#[command(after_help = "\
Examples:
  iaa anna.xml bence.xml
  iaa anna.xml bence.xml -o diffs.txt --json
  iaa anna.xml bence.xml --config iaa.toml")]
struct Cli {
    /// First annotator's XML file
    file_a: PathBuf,

    /// Second annotator's XML file
    file_b: PathBuf,

    /// Where to write the difference report [default: annotator_differences.txt]
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// TOML config (markup names, report path, annotator labels)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the full result as JSON instead of the summary table
    #[arg(long)]
    json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = compare::cmd_compare(compare::CompareArgs {
        file_a: cli.file_a,
        file_b: cli.file_b,
        output: cli.output,
        config: cli.config,
        json: cli.json,
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_logging(quiet: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    let default = if quiet {
        "iaa=warn,iaa_agreement=warn"
    } else {
        "iaa=info,iaa_agreement=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: exit_codes::EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<AgreementError> for CliError {
    fn from(err: AgreementError) -> Self {
        let hint = match &err {
            AgreementError::MissingSelection { .. } => {
                Some("every token present in both files needs one <ana correct=\"True\">".to_string())
            }
            AgreementError::DegenerateAgreement { .. } => {
                Some("check that both files annotate the same token ids".to_string())
            }
            _ => None,
        };
        Self { code: error_exit_code(&err), message: err.to_string(), hint }
    }
}
