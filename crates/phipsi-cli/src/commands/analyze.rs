use crate::cli::AnalyzeArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use phipsi::{
    core::io::{pdb::PdbFile, traits::MolecularFile},
    core::models::ids::ResidueId,
    core::models::structure::Structure,
    engine::progress::ProgressReporter,
    report::{csv_export, plot::RamachandranPlot},
    workflows::{self, analyze::AnalysisResult},
};
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args)?;

    info!("Loading input structure from {:?}", &app_config.input_path);
    let (mut structure, _metadata) =
        PdbFile::read_from_path(&app_config.input_path).map_err(|e| CliError::FileParsing {
            path: app_config.input_path.clone(),
            source: e.into(),
        })?;
    info!(
        "Loaded '{}': {} residue(s), {} atom(s).",
        structure.name,
        structure.residue_count(),
        structure.atom_count()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let result = workflows::analyze::run(&mut structure, &app_config.core_config, &reporter)?;

    if result.dihedrals.is_empty() {
        warn!("No peptide segment was found in the selected scope.");
        println!("No peptide residues found.");
    } else {
        for line in residue_lines(&structure, &result) {
            println!("{}", line);
        }
    }

    if let Some(target) = result.target_residue {
        println!();
        println!("{}", target_report(&structure, &result, target));
    }

    if app_config.summary {
        println!();
        print!("{}", result.summary);
    }

    if let Some(path) = &app_config.csv_output {
        info!("Writing dihedral table to {:?}", path);
        csv_export::write_dihedrals_to_path(&structure, &result.dihedrals, path)?;
        println!("✓ Dihedral angles written to: {}", path.display());
    }

    if let Some(path) = &app_config.plot_output {
        let mut plot = RamachandranPlot::from_record(&result.dihedrals)?;
        if let Some(title) = &app_config.plot_title {
            plot = plot.with_title(title.as_str());
        }
        info!(
            "Rendering Ramachandran plot of {} point(s) to {:?}",
            plot.points().len(),
            path
        );
        plot.save(path)?;
        println!("✓ Ramachandran plot written to: {}", path.display());
    }

    Ok(())
}

fn format_angle(angle: Option<f64>) -> String {
    angle.map_or_else(|| "-".to_string(), |value| format!("{:.2}", value))
}

/// One `name number label phi psi` line per residue, in segment order.
fn residue_lines(structure: &Structure, result: &AnalysisResult) -> Vec<String> {
    result
        .segments
        .iter()
        .flat_map(|analysis| {
            analysis.dihedrals.iter().filter_map(|(residue_id, torsions)| {
                let residue = structure.residue(residue_id)?;
                let label = analysis.secondary_structure.get(residue_id)?;
                Some(format!(
                    "{:<4} {:>5}{} {:<6} {:>8} {:>8}",
                    residue.name,
                    residue.residue_number,
                    residue.insertion_code.unwrap_or(' '),
                    label,
                    format_angle(torsions.phi),
                    format_angle(torsions.psi)
                ))
            })
        })
        .collect()
}

fn target_report(structure: &Structure, result: &AnalysisResult, target: ResidueId) -> String {
    let Some(residue) = structure.residue(target) else {
        return "Target residue: <unavailable>".to_string();
    };
    let chain = structure.chain_id_of(target).unwrap_or("?");
    match (result.dihedrals.get(target), result.secondary_structure(target)) {
        (Some(torsions), Some(label)) => format!(
            "Target residue {} (chain {}): phi = {}, psi = {}, secondary structure = {}",
            residue,
            chain,
            format_angle(torsions.phi),
            format_angle(torsions.psi),
            label
        ),
        _ => format!(
            "Target residue {} (chain {}) is not part of any analyzed peptide segment.",
            residue, chain
        ),
    }
}
