use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use phipsi::engine::config::{AnalysisConfigBuilder, LookupScope, SegmentationConfig};
use phipsi::engine::secondary::SecondaryStructureRules;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Merges defaults, the optional config file, `--set` overrides and explicit flags, in
/// increasing order of precedence.
pub fn build_config(args: &AnalyzeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = FileConfig::from_optional_file(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let chain_id = args
        .chain
        .clone()
        .or(analysis_file.chain)
        .unwrap_or(defaults.chain);
    let residue_number = args.residue.or(analysis_file.residue);
    let all_chains = args.all_chains || analysis_file.all_chains.unwrap_or(false);
    let lookup_scope = args
        .lookup_scope
        .or(analysis_file.lookup_scope)
        .unwrap_or(defaults.lookup_scope);

    let segmentation_file = file_config.segmentation.take().unwrap_or_default();
    let segmentation = SegmentationConfig {
        peptide_bond_cutoff: segmentation_file
            .peptide_bond_cutoff
            .unwrap_or(defaults.peptide_bond_cutoff),
        amino_acid_only: segmentation_file
            .amino_acid_only
            .unwrap_or(defaults.amino_acid_only),
    };

    let rules = resolve_rules(
        args.rules.as_deref(),
        analysis_file.rules_file.as_deref(),
        file_config.rules,
    )?;

    let output_file = file_config.output.take().unwrap_or_default();
    let plot_requested = args.plot
        || args.plot_output.is_some()
        || output_file.plot.unwrap_or(false)
        || output_file.plot_output.is_some();
    let plot_output = plot_requested.then(|| {
        args.plot_output
            .clone()
            .or(output_file.plot_output)
            .unwrap_or_else(|| PathBuf::from(&defaults.plot_output))
    });

    let core_config = AnalysisConfigBuilder::new()
        .chain_id(chain_id)
        .residue_number(residue_number)
        .all_chains(all_chains)
        .segmentation(segmentation)
        .lookup_scope(lookup_scope)
        .rules(rules)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Resolved analysis configuration: {:?}", core_config);

    Ok(AppConfig {
        input_path: args.input.clone(),
        plot_output,
        plot_title: args.plot_title.clone().or(output_file.plot_title),
        csv_output: args.csv.clone().or(output_file.csv),
        summary: args.summary || output_file.summary.unwrap_or(false),
        core_config,
    })
}

/// Picks the classifier thresholds: an explicit rules file first, then the rules file named
/// in the config, then its inline `[rules]` table, then the standard windows.
///
/// The chosen rules must have finite, non-inverted intervals.
pub fn resolve_rules(
    cli_rules: Option<&Path>,
    file_rules_path: Option<&Path>,
    inline_rules: Option<SecondaryStructureRules>,
) -> Result<SecondaryStructureRules> {
    let rules = match cli_rules.or(file_rules_path) {
        Some(path) => {
            debug!("Loading secondary-structure rules from {:?}", path);
            SecondaryStructureRules::load(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?
        }
        None => inline_rules.unwrap_or_default(),
    };
    rules
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(rules)
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "analysis.chain" => {
                config.analysis.get_or_insert_with(Default::default).chain =
                    Some(value_str.trim().to_string());
            }
            "analysis.residue" => {
                config.analysis.get_or_insert_with(Default::default).residue =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "analysis.all-chains" => {
                config.analysis.get_or_insert_with(Default::default).all_chains =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "analysis.lookup-scope" => {
                config.analysis.get_or_insert_with(Default::default).lookup_scope = Some(
                    value_str
                        .parse::<LookupScope>()
                        .map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "analysis.rules-file" => {
                config.analysis.get_or_insert_with(Default::default).rules_file =
                    Some(PathBuf::from(value_str.trim()));
            }
            "segmentation.peptide-bond-cutoff" => {
                config
                    .segmentation
                    .get_or_insert_with(Default::default)
                    .peptide_bond_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "segmentation.amino-acid-only" => {
                config
                    .segmentation
                    .get_or_insert_with(Default::default)
                    .amino_acid_only = Some(parse_value(key, value_str, "boolean")?);
            }
            "output.plot-output" => {
                config.output.get_or_insert_with(Default::default).plot_output =
                    Some(PathBuf::from(value_str.trim()));
            }
            "output.summary" => {
                config.output.get_or_insert_with(Default::default).summary =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
