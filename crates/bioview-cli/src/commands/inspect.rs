use crate::cli::InspectArgs;
use crate::config::PartialInspectConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use bioview::core::models::file::ProteinFile;
use bioview::core::models::protein::Protein;
use bioview::engine::progress::{CancellationToken, ProgressReporter};
use bioview::workflows::import;
use std::fmt::{self, Write};
use tracing::{info, warn};

pub fn run(args: InspectArgs, quiet: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialInspectConfig::from_file(path)?,
        None => PartialInspectConfig::default(),
    };
    let options = partial_config.merge_with_cli(&args)?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Importing structure from {:?}", &args.input);
    let file = import::import_path(&args.input, &options, &reporter, &CancellationToken::new())
        .map_err(|source| CliError::Import {
            path: args.input.clone(),
            source,
        })?;

    if !file.warnings().is_empty() {
        warn!(
            count = file.warnings().len(),
            "Structure imported with recoverable problems."
        );
    }

    let summary = render_summary(&file, args.max_warnings).map_err(anyhow::Error::from)?;
    print!("{}", summary);
    Ok(())
}

/// Formats a human-readable report of an imported file.
pub fn render_summary(
    file: &ProteinFile,
    max_warnings: usize,
) -> std::result::Result<String, fmt::Error> {
    let mut out = String::new();
    let info = &file.file_info;

    writeln!(
        out,
        "{}.{} ({} bytes, {})",
        file.file_name, file.file_extension, file.byte_size, file.file_type()
    )?;
    if let Some(id) = &info.pdb_id {
        writeln!(out, "  ID:          {}", id)?;
    }
    if let Some(description) = &info.description {
        writeln!(out, "  Title:       {}", description)?;
    }
    let authors = info.author_list();
    if !authors.is_empty() {
        writeln!(out, "  Authors:     {}", authors.join("; "))?;
    }
    writeln!(out, "  Models:      {}", file.models.len())?;

    for (index, model) in file.models.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Model {}", index + 1)?;
        render_model(&mut out, model)?;
    }

    let warnings = file.warnings();
    if !warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings ({}):", warnings.len())?;
        for warning in warnings.iter().take(max_warnings) {
            writeln!(out, "  {}", warning)?;
        }
        if warnings.len() > max_warnings {
            writeln!(out, "  ... and {} more", warnings.len() - max_warnings)?;
        }
    }
    Ok(out)
}

fn render_model(out: &mut String, model: &Protein) -> fmt::Result {
    writeln!(
        out,
        "  Atoms:          {} per configuration",
        model.atom_count()
    )?;
    writeln!(out, "  Configurations: {}", model.configuration_count())?;

    if let Some(energies) = model.configuration_energies() {
        let known: Vec<f32> = energies.iter().flatten().copied().collect();
        if let (Some(min), Some(max)) = (
            known.iter().copied().reduce(f32::min),
            known.iter().copied().reduce(f32::max),
        ) {
            writeln!(
                out,
                "  Energies:       {} of {} frames, {:.4} to {:.4}",
                known.len(),
                energies.len(),
                min,
                max
            )?;
        }
    }

    let composition = model.element_composition();
    let elements: Vec<String> = composition
        .iter()
        .map(|(element, count)| format!("{}:{}", element.symbol(), count))
        .collect();
    writeln!(out, "  Elements:       {}", elements.join(" "))?;

    let subunits: Vec<String> = model
        .subunits()
        .iter()
        .map(|s| format!("{} ({})", s.display_name(), s.atom_count))
        .collect();
    writeln!(out, "  Subunits:       {}", subunits.join(", "))?;

    if let Some(sequence) = model.sequence() {
        writeln!(out, "  Residues:       {}", sequence.len())?;
    }

    let bounds = model.bounding_volume();
    let extent = bounds.bounds.extent();
    writeln!(
        out,
        "  Extent:         {:.2} x {:.2} x {:.2} Å",
        extent.x, extent.y, extent.z
    )?;
    writeln!(out, "  Bounding radius: {:.2} Å", bounds.sphere.radius)?;

    match model.connectivity() {
        Some(connectivity) => {
            writeln!(out, "  Bonds:          {}", connectivity.len())?;
            if model.is_trajectory() {
                let per_configuration: Vec<String> = connectivity
                    .layout()
                    .bonds_per_configuration
                    .iter()
                    .map(usize::to_string)
                    .collect();
                writeln!(out, "  Bonds/frame:    {}", per_configuration.join(" "))?;
            }
        }
        None => writeln!(out, "  Bonds:          not computed")?,
    }
    Ok(())
}
