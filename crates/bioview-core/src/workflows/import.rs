use crate::core::io::error::ParseError;
use crate::core::io::pdb::PdbFormat;
use crate::core::io::traits::{FileFormat, file_identity};
use crate::core::io::xyz::XyzFormat;
use crate::core::models::file::ProteinFile;
use crate::engine::config::{ConnectivityConfig, ParserConfig};
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use crate::engine::tasks::{block_parse, connectivity::ConnectivityGenerator};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Settings for one import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub parser: ParserConfig,
    /// When set, bonds are generated for every model after parsing.
    pub connectivity: Option<ConnectivityConfig>,
}

/// Parses in-memory text whose format is given by `file_extension`.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedFormat`] for an unknown extension,
/// [`ParseError::EmptyAtomCount`] if no atoms were found, and
/// [`ParseError::Cancelled`] if parsing was cancelled. Cancelling during bond
/// generation is not an error: the file is returned without bonds.
#[instrument(skip_all, name = "import_workflow", fields(file = file_name))]
pub fn import_text(
    text: &str,
    file_name: &str,
    file_extension: &str,
    options: &ImportOptions,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ProteinFile, ParseError> {
    let format = FileFormat::from_extension(file_extension)?;
    info!(format = format.name(), bytes = text.len(), "Importing structure.");

    let parsed = match format {
        FileFormat::Pdb => block_parse::run::<PdbFormat>(text, &options.parser, reporter, cancel)?,
        FileFormat::Xyz => block_parse::run::<XyzFormat>(text, &options.parser, reporter, cancel)?,
    };
    let mut file = parsed.into_file(file_name, file_extension, text.len());

    if let Some(config) = options.connectivity {
        compute_connectivity(&mut file, config, reporter, cancel);
    }
    Ok(file)
}

/// Reads and imports a structure file, detecting its format from the extension.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, plus every error of
/// [`import_text`].
pub fn import_path(
    path: &Path,
    options: &ImportOptions,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ProteinFile, ParseError> {
    let (file_name, file_extension) = file_identity(path);
    FileFormat::from_extension(&file_extension)?;
    let text = fs::read_to_string(path)?;
    import_text(&text, &file_name, &file_extension, options, reporter, cancel)
}

/// Generates and attaches bonds for every model of `file`.
///
/// Returns `false` if cancelled. Models finished before the cancellation keep
/// their new bonds; the interrupted model and those after it are unchanged.
pub fn compute_connectivity(
    file: &mut ProteinFile,
    config: ConnectivityConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> bool {
    let generator = ConnectivityGenerator::new(config);
    for (index, model) in file.models.iter_mut().enumerate() {
        if !generator.generate_and_attach(model, reporter, cancel) {
            info!(model = index, "Bond generation stopped early.");
            reporter.report(Progress::Message(format!(
                "Bonds were not generated for model {}",
                index + 1
            )));
            return false;
        }
    }
    true
}
