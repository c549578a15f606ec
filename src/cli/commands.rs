use crate::core::{validate_document, Diagnostic};
use crate::error::{XlsFormError, XlsFormResult};
use crate::excel::{flatten_tree, rows_to_sheet, XlsFormExporter, XlsFormImporter};
use crate::parser;
use crate::types::{FormSettings, LocalizedString, QuestionType, SurveyNode, XlsFormDocument};
use crate::writer;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Print diagnostics, errors first. Returns the number of errors.
fn print_diagnostics(diagnostics: &[Diagnostic]) -> usize {
    let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) =
        diagnostics.iter().partition(|d| d.is_error());

    for diagnostic in &errors {
        println!("   {} {}", "❌".red(), diagnostic.to_string().red());
    }
    for diagnostic in &warnings {
        println!("   {} {}", "⚠️ ".yellow(), diagnostic.to_string().yellow());
    }
    errors.len()
}

/// Parse a document and refuse it when validation reports errors
fn load_checked(file: &Path, verbose: bool) -> XlsFormResult<XlsFormDocument> {
    let document = parser::parse_document(file)?;
    if verbose {
        println!(
            "   Found {} nodes, {} choice lists, {} languages\n",
            document.node_count(),
            document.choices.len(),
            document.languages.len()
        );
    }

    let errors = print_diagnostics(&validate_document(&document));
    if errors > 0 {
        return Err(XlsFormError::Validation(format!(
            "{} has {} error(s)",
            file.display(),
            errors
        )));
    }
    Ok(document)
}

/// Execute the export command
pub fn export(input: PathBuf, output: PathBuf, verbose: bool) -> XlsFormResult<()> {
    println!("{}", "📋 XLSForm - Excel Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Parsing document...".cyan());
    }
    let document = load_checked(&input, verbose)?;

    if verbose {
        println!("{}", "📊 Exporting to Excel...".cyan());
        for named in XlsFormExporter::new(&document).build_sheets() {
            println!(
                "   📄 Sheet: {} ({} columns, {} rows)",
                named.name.bright_blue(),
                named.sheet.headers.len(),
                named.sheet.row_count()
            );
        }
        println!();
    }

    XlsFormExporter::new(&document).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the import command
pub fn import(input: PathBuf, output: PathBuf, verbose: bool) -> XlsFormResult<()> {
    println!("{}", "📋 XLSForm - Excel Import".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let document = XlsFormImporter::from_path(&input)?.import()?;

    if verbose {
        println!("   Form: {}", document.settings.form_id.bright_blue());
        println!("   Found {} nodes", document.node_count());
        println!("   Found {} choice lists", document.choices.len());
        if !document.languages.is_empty() {
            println!("   Languages: {}", document.languages.join(", "));
        }
        println!();
        println!("{}", "💾 Writing YAML file...".cyan());
    }

    writer::write_document(&output, &document)?;

    println!("{}", "✅ Import Complete!".bold().green());
    println!("   YAML file: {}\n", output.display());
    Ok(())
}

/// Execute the validate command over one or more documents
pub fn validate(files: Vec<PathBuf>) -> XlsFormResult<()> {
    let mut failed = 0;

    for file in &files {
        println!("{}", "✅ Validating document".bold().green());
        println!("   File: {}", file.display());

        let document = match parser::parse_document(file) {
            Ok(document) => document,
            Err(e) => {
                println!("   {}\n", format!("❌ {}", e).bold().red());
                failed += 1;
                continue;
            }
        };

        let diagnostics = validate_document(&document);
        let errors = print_diagnostics(&diagnostics);
        if errors > 0 {
            failed += 1;
            println!("{}\n", format!("❌ {} error(s)", errors).bold().red());
        } else if diagnostics.is_empty() {
            println!("{}\n", "✅ Document is valid!".bold().green());
        } else {
            println!(
                "{}\n",
                format!("✅ Document is valid ({} warning(s))", diagnostics.len())
                    .bold()
                    .green()
            );
        }
    }

    if failed > 0 {
        return Err(XlsFormError::Validation(format!(
            "{} of {} file(s) failed validation",
            failed,
            files.len()
        )));
    }
    Ok(())
}

/// Execute the inspect command: flattened survey rows with their node ids
pub fn inspect(file: PathBuf) -> XlsFormResult<()> {
    let document = parser::parse_document(&file)?;
    let flattened = flatten_tree(&document.survey, &document.languages);
    let sheet = rows_to_sheet(&flattened.rows);

    println!("{}", "🔎 XLSForm - Survey rows".bold().green());
    println!("   File: {}", file.display());
    println!("   Columns: {}\n", sheet.headers.join(", "));

    for (row, cells) in sheet.data.iter().enumerate() {
        let node = flattened
            .node_at(row)
            .map_or_else(|| "-".dimmed().to_string(), |id| id.bright_blue().to_string());
        let rendered: Vec<String> = sheet
            .headers
            .iter()
            .zip(cells)
            .filter_map(|(header, cell)| cell.as_ref().map(|v| format!("{}={}", header, v)))
            .collect();
        println!("   {:>4}  {:<38}  {}", row + 1, node, rendered.join(" | "));
    }
    println!();
    Ok(())
}

/// Build a starter document with one note and the given languages
fn starter_document(
    form_id: &str,
    title: Option<String>,
    languages: Vec<String>,
    version: String,
) -> XlsFormDocument {
    let title = title.unwrap_or_else(|| form_id.to_string());
    let mut settings = FormSettings::new(title.clone(), form_id);
    settings.version = Some(version);
    settings.default_language = languages.first().cloned();

    let label = if languages.is_empty() {
        LocalizedString::Plain(title)
    } else {
        LocalizedString::localized(languages.iter().map(|l| (l.clone(), title.clone())))
    };

    let mut document = XlsFormDocument::new(settings);
    document.languages = languages;
    document.survey = vec![SurveyNode::new(
        crate::types::new_node_id(),
        QuestionType::Note,
        "intro",
        label,
    )];
    document
}

/// Today's date as a form version, `YYYY-MM-DD`
fn today_version() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Execute the init command
pub fn init(
    output: PathBuf,
    form_id: String,
    title: Option<String>,
    languages: Vec<String>,
    force: bool,
) -> XlsFormResult<()> {
    if output.exists() && !force {
        return Err(XlsFormError::Validation(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )));
    }

    let document = starter_document(&form_id, title, languages, today_version());
    writer::write_document(&output, &document)?;

    println!("{}", "✅ Created starter form".bold().green());
    println!("   Form id: {}", form_id.bright_blue());
    println!("   File:    {}\n", output.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
