use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::structure::Structure;
use crate::engine::config::AnalysisConfig;
use crate::engine::dihedral::{DihedralRecord, annotate_structure, compute_dihedrals};
use crate::engine::error::EngineError;
use crate::engine::lookup::find_residue;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::secondary::{SecondaryStructure, SecondaryStructureAssignment, classify_record};
use crate::engine::segment::{Entity, PeptideSegment, build_peptides};
use crate::report::summary::SecondaryStructureSummary;
use tracing::{debug, info, instrument};

/// Torsions and labels of one peptide segment.
#[derive(Debug, Clone)]
pub struct SegmentAnalysis {
    pub segment: PeptideSegment,
    pub dihedrals: DihedralRecord,
    pub secondary_structure: SecondaryStructureAssignment,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Per-segment results, in chain and sequence order.
    pub segments: Vec<SegmentAnalysis>,
    /// The residue resolved from `AnalysisConfig::residue_number`, if one was requested.
    pub target_residue: Option<ResidueId>,
    /// All segment records concatenated.
    pub dihedrals: DihedralRecord,
    /// All segment labels concatenated.
    pub labels: SecondaryStructureAssignment,
    pub summary: SecondaryStructureSummary,
}

impl AnalysisResult {
    pub fn secondary_structure(&self, residue_id: ResidueId) -> Option<SecondaryStructure> {
        self.labels.get(residue_id)
    }

    pub fn residue_count(&self) -> usize {
        self.dihedrals.len()
    }
}

/// Runs the backbone analysis described by `config` on `structure`.
///
/// The target residue, when requested, is resolved before any computation so that lookup
/// failures abort the run early. The structure is only modified when
/// `config.annotate_residues` is set.
///
/// # Errors
///
/// Propagates [`EngineError`] from residue lookup, chain resolution and segmentation.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(
    structure: &mut Structure,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<AnalysisResult, EngineError> {
    // === Phase 1: Resolve target residue and segmentation scope ===
    reporter.report(Progress::PhaseStart {
        name: "Resolving Targets",
    });
    let target_residue = match config.residue_number {
        Some(number) => Some(find_residue(
            structure,
            &config.chain_id,
            number,
            config.lookup_scope,
        )?),
        None => None,
    };
    let entity = resolve_entity(structure, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Peptide segmentation ===
    reporter.report(Progress::PhaseStart {
        name: "Segmenting Chains",
    });
    let segments = build_peptides(structure, entity, &config.segmentation)?;
    info!(segments = segments.len(), "Peptide segmentation complete.");
    for chain_id in chains_in_scope(structure, entity) {
        if !segments.iter().any(|segment| segment.chain_id() == chain_id) {
            let label = structure.chain(chain_id).map_or("?", |chain| chain.id.as_str());
            reporter.report(Progress::Message(format!(
                "Chain {} yielded no peptide segment.",
                label
            )));
        }
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Torsions and classification ===
    reporter.report(Progress::PhaseStart {
        name: "Computing Torsions",
    });
    reporter.report(Progress::TaskStart {
        total_steps: segments.len() as u64,
    });
    let mut analyses = Vec::with_capacity(segments.len());
    let mut dihedrals = DihedralRecord::new();
    let mut labels = SecondaryStructureAssignment::new();
    let mut summary = SecondaryStructureSummary::new();
    for segment in segments {
        let record = compute_dihedrals(structure, &segment);
        let assignment = classify_record(&record, &config.rules);
        debug!(
            residues = segment.len(),
            defined_pairs = record.complete_pairs().count(),
            "Analyzed segment."
        );

        summary.add_assignment(&assignment);
        labels.extend(&assignment);
        dihedrals.extend(record.clone());
        analyses.push(SegmentAnalysis {
            segment,
            dihedrals: record,
            secondary_structure: assignment,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Optional residue annotation ===
    if config.annotate_residues {
        let annotated = annotate_structure(structure, &dihedrals);
        debug!(annotated, "Attached torsions to residues.");
    }

    info!(
        residues = dihedrals.len(),
        "Analysis complete. {} residue(s) in {} segment(s).",
        dihedrals.len(),
        analyses.len()
    );
    Ok(AnalysisResult {
        segments: analyses,
        target_residue,
        dihedrals,
        labels,
        summary,
    })
}

fn chains_in_scope(structure: &Structure, entity: Entity) -> Vec<ChainId> {
    match entity {
        Entity::Structure => structure.chains_in_model(0).map(|(id, _)| id).collect(),
        Entity::Model(index) => structure.chains_in_model(index).map(|(id, _)| id).collect(),
        Entity::Chain(chain_id) => vec![chain_id],
    }
}

fn resolve_entity(structure: &Structure, config: &AnalysisConfig) -> Result<Entity, EngineError> {
    if config.all_chains {
        return Ok(Entity::Structure);
    }
    structure
        .first_model()
        .and(structure.find_chain_by_id(0, &config.chain_id))
        .map(Entity::Chain)
        .ok_or_else(|| EngineError::ChainNotFound {
            chain_id: config.chain_id.clone(),
        })
}
