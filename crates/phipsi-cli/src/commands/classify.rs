use crate::cli::ClassifyArgs;
use crate::config::builder::resolve_rules;
use crate::config::file::FileConfig;
use crate::error::Result;
use phipsi::engine::secondary::{SecondaryStructure, SecondaryStructureRules};
use tracing::info;

pub fn run(args: ClassifyArgs) -> Result<()> {
    let label = classify(&args)?;
    info!(phi = args.phi, psi = args.psi, %label, "Classified torsion pair.");
    println!("{}", label);
    Ok(())
}

fn load_rules(args: &ClassifyArgs) -> Result<SecondaryStructureRules> {
    let mut file_config = FileConfig::from_optional_file(args.config.as_deref())?;
    let rules_file = file_config
        .analysis
        .take()
        .and_then(|analysis| analysis.rules_file);
    resolve_rules(args.rules.as_deref(), rules_file.as_deref(), file_config.rules)
}

fn classify(args: &ClassifyArgs) -> Result<SecondaryStructure> {
    Ok(load_rules(args)?.classify(Some(args.phi), Some(args.psi)))
}
