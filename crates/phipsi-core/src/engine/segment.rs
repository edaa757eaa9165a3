use super::config::SegmentationConfig;
use super::error::EngineError;
use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::distance;
use crate::core::utils::identifiers::{
    ALPHA_CARBON, BACKBONE_NITROGEN, CARBONYL_CARBON, is_modified_amino_acid,
};
use tracing::{debug, instrument, warn};

/// The level of the structure hierarchy handed to [`build_peptides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// Every chain of the first model.
    Structure,
    /// Every chain of the model at this 0-based position.
    Model(usize),
    /// A single chain.
    Chain(ChainId),
}

/// A maximal run of consecutive, peptide-bonded residues of one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptideSegment {
    chain_id: ChainId,
    residues: Vec<ResidueId>,
}

impl PeptideSegment {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Splits the chains of `entity` into peptide segments.
///
/// Residues are walked in sequence order. Leading residues that fail the admission filter
/// are skipped; afterwards every admitted and bonded `(prev, next)` pair extends the current
/// segment, and any other pair closes it. Only runs of two or more residues are emitted.
///
/// # Errors
///
/// * [`EngineError::NoModels`] if `entity` is [`Entity::Structure`] and the structure is empty.
/// * [`EngineError::InvalidEntity`] if a model position or chain handle does not resolve in
///   `structure`. Handles are plain arena keys, so a key taken from another structure is
///   only caught when it has no slot here.
#[instrument(skip_all, name = "peptide_segmentation")]
pub fn build_peptides(
    structure: &Structure,
    entity: Entity,
    config: &SegmentationConfig,
) -> Result<Vec<PeptideSegment>, EngineError> {
    let chains: Vec<ChainId> = match entity {
        Entity::Structure => {
            if structure.first_model().is_none() {
                return Err(EngineError::NoModels);
            }
            structure.chains_in_model(0).map(|(id, _)| id).collect()
        }
        Entity::Model(index) => {
            if structure.model(index).is_none() {
                return Err(EngineError::InvalidEntity(format!(
                    "model {} does not exist (structure has {} model(s))",
                    index,
                    structure.models().len()
                )));
            }
            structure.chains_in_model(index).map(|(id, _)| id).collect()
        }
        Entity::Chain(chain_id) => {
            if structure.chain(chain_id).is_none() {
                return Err(EngineError::InvalidEntity(
                    "chain handle does not resolve in this structure".to_string(),
                ));
            }
            vec![chain_id]
        }
    };

    let mut segments = Vec::new();
    for chain_id in chains {
        let before = segments.len();
        segment_chain(structure, chain_id, config, &mut segments);
        debug!(
            chain = structure.chain(chain_id).map_or("", |c| c.id.as_str()),
            segments = segments.len() - before,
            "Segmented chain."
        );
    }
    Ok(segments)
}

fn segment_chain(
    structure: &Structure,
    chain_id: ChainId,
    config: &SegmentationConfig,
    segments: &mut Vec<PeptideSegment>,
) {
    let residues: Vec<(ResidueId, bool)> = structure
        .residues_in_chain(chain_id)
        .map(|(id, residue)| (id, is_admitted(structure, id, residue, config)))
        .collect();

    let Some(start) = residues.iter().position(|&(_, admitted)| admitted) else {
        return;
    };

    let mut current: Option<Vec<ResidueId>> = None;
    for pair in residues[start..].windows(2) {
        let [(prev, prev_admitted), (next, next_admitted)] = [pair[0], pair[1]];
        if prev_admitted
            && next_admitted
            && is_connected(structure, prev, next, config.peptide_bond_cutoff)
        {
            current.get_or_insert_with(|| vec![prev]).push(next);
        } else if let Some(run) = current.take() {
            segments.push(PeptideSegment {
                chain_id,
                residues: run,
            });
        }
    }
    if let Some(run) = current {
        segments.push(PeptideSegment {
            chain_id,
            residues: run,
        });
    }
}

fn is_admitted(
    structure: &Structure,
    residue_id: ResidueId,
    residue: &Residue,
    config: &SegmentationConfig,
) -> bool {
    if residue.is_standard_amino_acid() {
        return true;
    }
    if config.amino_acid_only || structure.residue_atom(residue_id, ALPHA_CARBON).is_none() {
        return false;
    }
    if !is_modified_amino_acid(&residue.name) {
        warn!(
            residue = %residue,
            "Assuming residue {} is an unknown modified amino acid.",
            residue.name
        );
    }
    true
}

/// Whether the carbonyl carbon of `prev` and the amide nitrogen of `next` are close enough
/// to form a peptide bond. A missing atom means the residues are not connected.
pub fn is_connected(
    structure: &Structure,
    prev: ResidueId,
    next: ResidueId,
    cutoff: f64,
) -> bool {
    match (
        structure.atom_position(prev, CARBONYL_CARBON),
        structure.atom_position(next, BACKBONE_NITROGEN),
    ) {
        (Some(c), Some(n)) => distance(&c, &n) < cutoff,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use crate::test_utils::{add_backbone_residues, backbone_positions, ideal_chain};
    use nalgebra::{Point3, Vector3};

    fn extended(n: usize) -> Vec<(f64, f64)> {
        vec![(-120.0, 130.0); n]
    }

    fn config() -> SegmentationConfig {
        SegmentationConfig::default()
    }

    fn segment_lengths(segments: &[PeptideSegment]) -> Vec<usize> {
        segments.iter().map(PeptideSegment::len).collect()
    }

    #[test]
    fn unbroken_chain_yields_one_segment_of_full_length() {
        let residues: Vec<_> = ["ALA"; 6].iter().map(|&n| (n, -60.0, -45.0)).collect();
        let structure = ideal_chain("A", &residues);
        let segments = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert_eq!(segment_lengths(&segments), vec![6]);

        let chain_id = structure.find_chain_by_id(0, "A").unwrap();
        assert_eq!(segments[0].chain_id(), chain_id);
        assert_eq!(segments[0].residues(), structure.chain(chain_id).unwrap().residues());
    }

    #[test]
    fn gap_in_chain_splits_into_two_segments() {
        let mut positions = backbone_positions(&extended(7));
        let shift = Vector3::new(0.0, 0.0, 25.0);
        for atoms in positions.iter_mut().skip(4) {
            for atom in atoms.iter_mut() {
                *atom += shift;
            }
        }
        let mut builder = StructureBuilder::new("gap");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["GLY"; 7], &positions, &[]);
        let structure = builder.build();

        let segments = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert_eq!(segment_lengths(&segments), vec![4, 3]);
    }

    #[test]
    fn non_admitted_residue_breaks_segment_and_is_excluded() {
        let positions = backbone_positions(&extended(7));
        let mut builder = StructureBuilder::new("ligand");
        builder.start_chain("A");
        add_backbone_residues(
            &mut builder,
            1,
            &["ALA", "ALA", "ALA", "UNK", "ALA", "ALA", "ALA"],
            &positions,
            &[],
        );
        let structure = builder.build();

        let segments = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert_eq!(segment_lengths(&segments), vec![3, 3]);
        let total: usize = segments.iter().map(PeptideSegment::len).sum();
        assert!(total <= 7);
    }

    #[test]
    fn leading_non_admitted_residues_are_skipped() {
        let positions = backbone_positions(&extended(4));
        let mut builder = StructureBuilder::new("leading");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["ACE", "GLY", "GLY", "GLY"], &positions, &[]);
        let structure = builder.build();

        let segments = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert_eq!(segment_lengths(&segments), vec![3]);
        let first = structure.residue(segments[0].residues()[0]).unwrap();
        assert_eq!(first.residue_number, 2);
    }

    #[test]
    fn modified_residues_are_admitted_when_not_restricted_to_amino_acids() {
        let positions = backbone_positions(&extended(5));
        let mut builder = StructureBuilder::new("modified");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["ALA", "MSE", "ALA", "XYZ", "ALA"], &positions, &[]);
        let structure = builder.build();

        let strict = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert!(strict.is_empty());

        let relaxed = SegmentationConfig {
            amino_acid_only: false,
            ..config()
        };
        let segments = build_peptides(&structure, Entity::Structure, &relaxed).unwrap();
        assert_eq!(segment_lengths(&segments), vec![5]);
    }

    #[test]
    fn residue_without_alpha_carbon_is_never_admitted_as_non_standard() {
        let positions = backbone_positions(&extended(3));
        let mut builder = StructureBuilder::new("no-ca");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["ALA", "MSE", "ALA"], &positions, &[(1, "CA")]);
        let structure = builder.build();

        let relaxed = SegmentationConfig {
            amino_acid_only: false,
            ..config()
        };
        assert!(build_peptides(&structure, Entity::Structure, &relaxed).unwrap().is_empty());
    }

    #[test]
    fn missing_carbonyl_carbon_breaks_connectivity() {
        let positions = backbone_positions(&extended(4));
        let mut builder = StructureBuilder::new("no-c");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["GLY"; 4], &positions, &[(1, "C")]);
        let structure = builder.build();

        let segments = build_peptides(&structure, Entity::Structure, &config()).unwrap();
        assert_eq!(segment_lengths(&segments), vec![2, 2]);
    }

    #[test]
    fn cutoff_is_strict() {
        let positions = backbone_positions(&extended(2));
        let mut builder = StructureBuilder::new("cutoff");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["GLY"; 2], &positions, &[]);
        let structure = builder.build();
        let chain_id = structure.find_chain_by_id(0, "A").unwrap();
        let residues = structure.chain(chain_id).unwrap().residues().to_vec();

        let bond = distance(&positions[0][2], &positions[1][0]);
        assert!(is_connected(&structure, residues[0], residues[1], bond + 1e-6));
        assert!(!is_connected(&structure, residues[0], residues[1], bond));
        assert!(!is_connected(&structure, residues[1], residues[0], 1.8));
    }

    #[test]
    fn empty_chain_and_single_residue_yield_no_segments() {
        let mut builder = StructureBuilder::new("sparse");
        builder.start_chain("A");
        builder.start_chain("B");
        builder.start_residue(1, None, "ALA", false).unwrap();
        builder.add_atom(1, "N", Point3::origin()).unwrap();
        let structure = builder.build();

        assert!(build_peptides(&structure, Entity::Structure, &config()).unwrap().is_empty());
    }

    #[test]
    fn structure_without_models_is_an_error() {
        let structure = Structure::new("empty");
        assert_eq!(
            build_peptides(&structure, Entity::Structure, &config()),
            Err(EngineError::NoModels)
        );
    }

    #[test]
    fn unresolvable_entities_are_invalid() {
        let structure = ideal_chain("A", &[("GLY", 0.0, 0.0), ("GLY", 0.0, 0.0)]);
        assert!(matches!(
            build_peptides(&structure, Entity::Model(1), &config()),
            Err(EngineError::InvalidEntity(_))
        ));

        let other = ideal_chain("B", &[("GLY", 0.0, 0.0)]);
        let foreign_chain = other.find_chain_by_id(0, "B").unwrap();
        let mut empty = Structure::new("empty");
        empty.add_model(1);
        let err = build_peptides(&empty, Entity::Chain(foreign_chain), &config()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidEntity("chain handle does not resolve in this structure".to_string())
        );
    }

    #[test]
    fn model_and_chain_entities_select_their_chains() {
        let positions = backbone_positions(&extended(3));
        let mut builder = StructureBuilder::new("two-chains");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["ALA"; 3], &positions, &[]);
        builder.start_chain("B");
        add_backbone_residues(&mut builder, 1, &["GLY"; 3], &positions, &[]);
        let structure = builder.build();

        let all = build_peptides(&structure, Entity::Model(0), &config()).unwrap();
        assert_eq!(segment_lengths(&all), vec![3, 3]);

        let chain_b = structure.find_chain_by_id(0, "B").unwrap();
        let only_b = build_peptides(&structure, Entity::Chain(chain_b), &config()).unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].chain_id(), chain_b);
    }
}
