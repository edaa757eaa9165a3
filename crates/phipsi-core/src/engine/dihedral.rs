use super::segment::PeptideSegment;
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::BackboneTorsions;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{dihedral_degrees, normalize_angle};
use crate::core::utils::identifiers::{ALPHA_CARBON, BACKBONE_NITROGEN, CARBONYL_CARBON};
use std::collections::HashMap;
use tracing::trace;

/// Ordered mapping from residue to its backbone `(phi, psi)` torsions in degrees.
///
/// Entries keep the order in which residues were added, which for a record built from
/// segments is sequence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DihedralRecord {
    entries: Vec<(ResidueId, BackboneTorsions)>,
    index: HashMap<ResidueId, usize>,
}

impl DihedralRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the torsions of a residue. A replaced entry keeps its position.
    pub fn insert(&mut self, residue_id: ResidueId, torsions: BackboneTorsions) {
        match self.index.get(&residue_id) {
            Some(&position) => self.entries[position].1 = torsions,
            None => {
                self.index.insert(residue_id, self.entries.len());
                self.entries.push((residue_id, torsions));
            }
        }
    }

    /// Appends every entry of `other`, in order.
    pub fn extend(&mut self, other: DihedralRecord) {
        for (residue_id, torsions) in other.entries {
            self.insert(residue_id, torsions);
        }
    }

    pub fn get(&self, residue_id: ResidueId) -> Option<BackboneTorsions> {
        self.index
            .get(&residue_id)
            .map(|&position| self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResidueId, BackboneTorsions)> + '_ {
        self.entries.iter().copied()
    }

    /// Pairs where both angles are defined, in record order.
    pub fn complete_pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|(_, torsions)| Some((torsions.phi?, torsions.psi?)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Computes phi and psi for every residue of a segment.
///
/// A residue missing any of N, CA or C gets no angles. Otherwise phi needs the carbonyl
/// carbon of the previous residue and psi the amide nitrogen of the next one; angles whose
/// neighbor atom is absent (or that fall off the ends of the segment) stay undefined.
pub fn compute_dihedrals(structure: &Structure, segment: &PeptideSegment) -> DihedralRecord {
    let residues = segment.residues();
    let mut record = DihedralRecord::new();

    for (i, &residue_id) in residues.iter().enumerate() {
        let backbone = (
            structure.atom_position(residue_id, BACKBONE_NITROGEN),
            structure.atom_position(residue_id, ALPHA_CARBON),
            structure.atom_position(residue_id, CARBONYL_CARBON),
        );
        let (Some(n), Some(ca), Some(c)) = backbone else {
            trace!(?residue_id, "Residue lacks backbone atoms; torsions undefined.");
            record.insert(residue_id, BackboneTorsions::default());
            continue;
        };

        let phi = i
            .checked_sub(1)
            .and_then(|prev| structure.atom_position(residues[prev], CARBONYL_CARBON))
            .map(|prev_c| normalize_angle(dihedral_degrees(&prev_c, &n, &ca, &c)));
        let psi = residues
            .get(i + 1)
            .and_then(|&next| structure.atom_position(next, BACKBONE_NITROGEN))
            .map(|next_n| normalize_angle(dihedral_degrees(&n, &ca, &c, &next_n)));

        record.insert(residue_id, BackboneTorsions { phi, psi });
    }
    record
}

/// Copies every entry of `record` onto the matching residue's `backbone_torsions`.
///
/// Returns the number of residues annotated; entries whose residue is not part of
/// `structure` are ignored.
pub fn annotate_structure(structure: &mut Structure, record: &DihedralRecord) -> usize {
    let mut annotated = 0;
    for (residue_id, torsions) in record.iter() {
        if let Some(residue) = structure.residue_mut(residue_id) {
            residue.backbone_torsions = Some(torsions);
            annotated += 1;
        }
    }
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use crate::engine::config::SegmentationConfig;
    use crate::engine::segment::{Entity, build_peptides};
    use crate::test_utils::{add_backbone_residues, backbone_positions, ideal_chain};

    const TOLERANCE: f64 = 1e-6;

    fn single_segment(structure: &Structure) -> PeptideSegment {
        let mut segments =
            build_peptides(structure, Entity::Structure, &SegmentationConfig::default()).unwrap();
        assert_eq!(segments.len(), 1);
        segments.remove(0)
    }

    #[test]
    fn computes_known_torsions_with_undefined_ends() {
        let requested = [
            ("ALA", 0.0, -47.0),
            ("ALA", -57.0, -47.0),
            ("GLY", 80.0, 10.0),
            ("SER", -139.0, 0.0),
        ];
        let structure = ideal_chain("A", &requested);
        let segment = single_segment(&structure);
        let record = compute_dihedrals(&structure, &segment);

        assert_eq!(record.len(), 4);
        let torsions: Vec<_> = record.iter().map(|(_, t)| t).collect();
        assert!(torsions[0].phi.is_none());
        assert!(torsions[3].psi.is_none());
        for (i, t) in torsions.iter().enumerate() {
            if i > 0 {
                assert!((t.phi.unwrap() - requested[i].1).abs() < TOLERANCE);
            }
            if i < 3 {
                assert!((t.psi.unwrap() - requested[i].2).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn angles_are_normalized() {
        let structure = ideal_chain("A", &[("ALA", 0.0, 180.0), ("ALA", 180.0, 0.0)]);
        let record = compute_dihedrals(&structure, &single_segment(&structure));
        for (_, t) in record.iter() {
            for angle in [t.phi, t.psi].into_iter().flatten() {
                assert!(angle > -180.0 && angle <= 180.0, "{angle}");
            }
        }
    }

    #[test]
    fn residue_missing_alpha_carbon_does_not_propagate() {
        let positions = backbone_positions(&[(-60.0, -45.0); 5]);
        let mut builder = StructureBuilder::new("missing-ca");
        builder.start_chain("A");
        add_backbone_residues(&mut builder, 1, &["ALA"; 5], &positions, &[(2, "CA")]);
        let structure = builder.build();

        let segment = single_segment(&structure);
        assert_eq!(segment.len(), 5);
        let record = compute_dihedrals(&structure, &segment);
        let torsions: Vec<_> = record.iter().map(|(_, t)| t).collect();

        assert_eq!(torsions[2], BackboneTorsions::default());
        // Neighbors still have both angles; they only use the N or C of residue 2.
        assert!(torsions[1].phi.is_some() && torsions[1].psi.is_some());
        assert!(torsions[3].phi.is_some() && torsions[3].psi.is_some());
        assert!((torsions[1].psi.unwrap() + 45.0).abs() < TOLERANCE);
        assert!((torsions[3].phi.unwrap() + 60.0).abs() < TOLERANCE);
    }

    #[test]
    fn record_insert_replaces_in_place() {
        let structure = ideal_chain("A", &[("ALA", 0.0, 0.0), ("GLY", 0.0, 0.0)]);
        let ids: Vec<_> = structure.residues_in_order().map(|(id, _)| id).collect();

        let mut record = DihedralRecord::new();
        record.insert(ids[0], BackboneTorsions { phi: None, psi: Some(1.0) });
        record.insert(ids[1], BackboneTorsions { phi: Some(2.0), psi: None });
        record.insert(ids[0], BackboneTorsions { phi: None, psi: Some(3.0) });

        assert_eq!(record.len(), 2);
        assert_eq!(record.iter().next().unwrap().0, ids[0]);
        assert_eq!(record.get(ids[0]).unwrap().psi, Some(3.0));
        assert_eq!(record.complete_pairs().count(), 0);
    }

    #[test]
    fn annotate_structure_mirrors_record() {
        let mut structure = ideal_chain("A", &[("ALA", 0.0, -47.0), ("ALA", -57.0, -47.0), ("ALA", -57.0, 0.0)]);
        let record = compute_dihedrals(&structure, &single_segment(&structure));

        assert_eq!(annotate_structure(&mut structure, &record), 3);
        for (residue_id, torsions) in record.iter() {
            assert_eq!(structure.residue(residue_id).unwrap().backbone_torsions, Some(torsions));
        }
    }
}
