use crate::core::io::error::ParseError;
use crate::core::io::traits::{LineRecord, ParsedStructure, StructureFormat};
use crate::engine::config::ParserConfig;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The classified records of one fixed-size block of lines.
#[derive(Debug)]
struct ParsedBlock<R> {
    index: usize,
    records: Vec<LineRecord<R>>,
}

fn classify_block<F: StructureFormat>(
    index: usize,
    lines: &[&str],
    block_size: usize,
) -> ParsedBlock<F::Record> {
    let first_line = index * block_size + 1;
    let records = lines
        .iter()
        .enumerate()
        .filter_map(|(offset, line)| {
            F::classify_line(line).map(|record| LineRecord::new(first_line + offset, record))
        })
        .collect();
    ParsedBlock { index, records }
}

/// Concatenates block results in block order, whatever order they finished in.
fn merge_blocks<R>(mut blocks: Vec<ParsedBlock<R>>) -> Vec<LineRecord<R>> {
    blocks.sort_unstable_by_key(|block| block.index);
    blocks.into_iter().flat_map(|block| block.records).collect()
}

/// Parses `text` as format `F`, classifying lines in parallel blocks.
///
/// Lines are split into blocks of `config.block_size`, each block is classified
/// independently, and the results are merged back into line order before a single
/// sequential assembly pass. The block size never changes the result.
///
/// Cancellation is checked before each block is classified and once more before
/// assembly. Each recovered line problem is also emitted as a
/// [`Progress::Warning`] after assembly.
///
/// # Errors
///
/// Returns [`ParseError::Cancelled`] if `cancel` fires, or
/// [`ParseError::EmptyAtomCount`] if the text holds no usable atoms.
#[instrument(skip_all, name = "block_parse_task", fields(format = F::NAME))]
pub fn run<F: StructureFormat>(
    text: &str,
    config: &ParserConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ParsedStructure, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let block_size = config.block_size.max(1);
    let total_steps = config.record_count_hint.unwrap_or(lines.len()) as u64;

    reporter.report(Progress::PhaseStart { name: F::NAME });
    reporter.report(Progress::TaskStart { total_steps });
    debug!(
        lines = lines.len(),
        blocks = lines.len().div_ceil(block_size),
        block_size,
        "Classifying lines."
    );

    #[cfg(not(feature = "parallel"))]
    let iterator = lines.chunks(block_size).enumerate();

    #[cfg(feature = "parallel")]
    let iterator = lines.par_chunks(block_size).enumerate();

    let blocks: Option<Vec<ParsedBlock<F::Record>>> = iterator
        .map(|(index, chunk)| {
            if cancel.is_cancelled() {
                return None;
            }
            let block = classify_block::<F>(index, chunk, block_size);
            reporter.report(Progress::TaskIncrement {
                amount: chunk.len() as u64,
            });
            Some(block)
        })
        .collect();

    let blocks = match blocks {
        Some(blocks) if !cancel.is_cancelled() => blocks,
        _ => {
            info!("Parsing cancelled.");
            return Err(ParseError::Cancelled);
        }
    };
    reporter.report(Progress::TaskFinish);

    let records = merge_blocks(blocks);
    let parsed = F::assemble(records, &lines, config.prior_info.clone())?;

    let warnings = &parsed.file_info.warnings;
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "Parsed with recoverable line problems.");
    }
    for warning in warnings {
        reporter.report(Progress::Warning {
            line: warning.line,
            message: warning.message(),
        });
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        models = parsed.models.len(),
        atoms = parsed.models.iter().map(|m| m.atom_count()).sum::<usize>(),
        warnings = warnings.len(),
        "Parsing complete."
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFormat;
    use crate::core::io::xyz::XyzFormat;
    use crate::engine::progress::fraction_callback;
    use std::sync::{Arc, Mutex};

    fn atom_line(res_name: &str, res_seq: &str, x: f32, y: f32, z: f32, element: &str) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            1, "CA", res_name, "A", res_seq, x, y, z, 1.0, 0.0, element
        )
    }

    fn sample_pdb() -> String {
        let mut lines = vec![format!("HEADER    SAMPLE{:>50}", "1XYZ")];
        let residues = ["ALA", "GLY", "HOH", "SER", "LYS", "XYZ", "CYS"];
        let elements = ["C", "N", "O", "H", "S", "FE"];
        for (i, residue) in residues.iter().enumerate() {
            for (k, element) in elements.iter().enumerate() {
                let x = i as f32 * 3.0 + k as f32 * 0.5;
                lines.push(atom_line(residue, &(i + 1).to_string(), x, 1.0, 2.0, element));
            }
            if i == 3 {
                lines.push("TER".to_string());
            }
        }
        lines.push("ATOM  too short".to_string());
        lines.push("END".to_string());
        lines.join("\n")
    }

    fn config(block_size: usize) -> ParserConfig {
        ParserConfig {
            block_size,
            ..ParserConfig::default()
        }
    }

    #[test]
    fn block_size_never_changes_the_result() {
        let text = sample_pdb();
        let serial = PdbFormat::parse_serial(&text, None).unwrap();
        for block_size in [1, 2, 3, 7, 1024] {
            let parsed = run::<PdbFormat>(
                &text,
                &config(block_size),
                &ProgressReporter::new(),
                &CancellationToken::new(),
            )
            .unwrap();
            assert_eq!(parsed, serial, "block size {block_size}");
        }
    }

    #[test]
    fn xyz_block_size_never_changes_the_result() {
        let text = "C 0 0 0\nO 1 0 0\nH 0 1 0\n\nC 0 0 1\nO 1 0 1\nH 0 1 1\n";
        let serial = XyzFormat::parse_serial(text, None).unwrap();
        for block_size in [1, 2, 3, 7, 1024] {
            let parsed = run::<XyzFormat>(
                text,
                &config(block_size),
                &ProgressReporter::new(),
                &CancellationToken::new(),
            )
            .unwrap();
            assert_eq!(parsed, serial);
        }
    }

    #[test]
    fn merge_restores_block_order() {
        let blocks = vec![
            ParsedBlock {
                index: 2,
                records: vec![LineRecord::new(5, 'c')],
            },
            ParsedBlock {
                index: 0,
                records: vec![LineRecord::new(1, 'a'), LineRecord::new(2, 'b')],
            },
            ParsedBlock {
                index: 1,
                records: Vec::new(),
            },
        ];
        let merged: Vec<usize> = merge_blocks(blocks).iter().map(|r| r.line).collect();
        assert_eq!(merged, vec![1, 2, 5]);
    }

    #[test]
    fn classify_block_numbers_lines_from_the_block_start() {
        let lines = ["C 0 0 0", "", "O 1 1 1"];
        let block = classify_block::<XyzFormat>(2, &lines, 3);
        let numbers: Vec<usize> = block.records.iter().map(|r| r.line).collect();
        assert_eq!(numbers, vec![7, 8, 9]);
    }

    #[test]
    fn cancelled_parse_returns_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run::<PdbFormat>(&sample_pdb(), &config(2), &ProgressReporter::new(), &cancel)
            .unwrap_err();
        assert!(matches!(err, ParseError::Cancelled));
    }

    #[test]
    fn cancelling_after_the_first_block_stops_the_parse() {
        let text = vec![sample_pdb(); 40].join("\n");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if matches!(event, Progress::TaskIncrement { .. }) {
                trigger.cancel();
            }
            sink.lock().unwrap().push(event);
        }));

        let err = run::<PdbFormat>(&text, &config(2), &reporter, &cancel).unwrap_err();

        assert!(matches!(err, ParseError::Cancelled));
        let events = events.lock().unwrap();
        let blocks = text.lines().count().div_ceil(2);
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement { .. }))
            .count();
        assert!(increments >= 1 && increments < blocks);
        assert!(!events.iter().any(|e| matches!(
            e,
            Progress::Warning { .. } | Progress::TaskFinish | Progress::PhaseFinish
        )));
    }

    #[test]
    fn warnings_are_forwarded_and_progress_completes() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter =
            ProgressReporter::with_callback(Box::new(move |p| sink.lock().unwrap().push(p)));

        let text = sample_pdb();
        let parsed =
            run::<PdbFormat>(&text, &config(4), &reporter, &CancellationToken::new()).unwrap();

        let events = events.lock().unwrap();
        let forwarded: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                Progress::Warning { line, .. } => Some(*line),
                _ => None,
            })
            .collect();
        assert_eq!(forwarded, parsed.file_info.warning_indices());
        assert!(!forwarded.is_empty());

        let incremented: u64 = events
            .iter()
            .filter_map(|e| match e {
                Progress::TaskIncrement { amount } => Some(*amount),
                _ => None,
            })
            .sum();
        assert_eq!(incremented, text.lines().count() as u64);
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn fraction_reaches_one_after_a_parse() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = values.clone();
        let reporter = ProgressReporter::with_callback(fraction_callback(move |f| {
            sink.lock().unwrap().push(f)
        }));
        run::<PdbFormat>(&sample_pdb(), &config(3), &reporter, &CancellationToken::new()).unwrap();

        let values = values.lock().unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.last().copied(), Some(1.0));
    }

    #[test]
    fn empty_text_is_an_empty_atom_count_error() {
        let err = run::<XyzFormat>(
            "",
            &config(8),
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::EmptyAtomCount));
    }
}
