use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsform_forge::cli;
use xlsform_forge::error::XlsFormResult;

#[derive(Parser)]
#[command(name = "xlsform")]
#[command(about = "Survey form trees ↔ XLSForm spreadsheets.")]
#[command(long_about = "XLSForm Forge - survey form documents ↔ XLSForm workbooks

Forms are authored as YAML/JSON trees (questions, groups, repeats, choice
lists, settings, multi-language labels) and exported to the flat
survey / choices / settings spreadsheet convention.

COMMANDS:
  export    - Document (YAML/JSON) to Excel (.xlsx)
  import    - Excel (.xlsx) to document (YAML)
  validate  - Check documents for structural problems
  inspect   - Show flattened survey rows and their node ids
  init      - Create a starter document

EXAMPLES:
  xlsform init survey.yaml --form-id field_survey -l 'English (en)' -l 'Spanish (es)'
  xlsform export survey.yaml survey.xlsx
  xlsform import survey.xlsx survey.yaml
  xlsform validate forms/*.yaml

LOGGING:
  RUST_LOG or --log-level (env XLSFORM_LOG) control diagnostic output on stderr.")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "XLSFORM_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export a form document to an XLSForm .xlsx workbook.

Sheets are written in this order:
  survey    - one row per question, begin_/end_ rows around groups and repeats
  choices   - one row per choice (omitted when there are no choices)
  settings  - exactly one row

Localized labels, hints and constraint messages become one column per
declared language: label::English (en), label::Spanish (es), ...

The document is validated first; errors abort the export, warnings are shown.

EXAMPLE:
  xlsform export field_survey.yaml field_survey.xlsx")]
    /// Export a form document to Excel .xlsx
    Export {
        /// Path to the form document (YAML or JSON)
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Import an XLSForm .xlsx workbook as a form document.

begin_/end_ rows are rebuilt into nested groups and repeats, 'select_one list'
types are split back into type and listName, and label::Language columns
become localized values. Languages are taken from the column names.
Unknown columns are kept as extra fields.

EXAMPLE:
  xlsform import field_survey.xlsx field_survey.yaml")]
    /// Import an Excel .xlsx workbook as a YAML document
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Output YAML file path
        output: PathBuf,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate one or more form documents
    Validate {
        /// Path to document file(s) to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the flattened survey rows with their originating node ids
    Inspect {
        /// Path to the form document
        file: PathBuf,
    },

    /// Create a starter form document
    Init {
        /// Output YAML file path
        output: PathBuf,

        /// Form identifier (settings.formId)
        #[arg(long)]
        form_id: String,

        /// Form title (defaults to the form id)
        #[arg(short, long)]
        title: Option<String>,

        /// Declared language, repeatable; the first one becomes the default
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> XlsFormResult<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level);

    match args.command {
        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),

        Commands::Import {
            input,
            output,
            verbose,
        } => cli::import(input, output, verbose),

        Commands::Validate { files } => cli::validate(files),

        Commands::Inspect { file } => cli::inspect(file),

        Commands::Init {
            output,
            form_id,
            title,
            languages,
            force,
        } => cli::init(output, form_id, title, languages, force),
    }
}
