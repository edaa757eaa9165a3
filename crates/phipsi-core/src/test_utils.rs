//! Synthetic backbones with known torsion angles for tests.

use crate::core::models::builder::StructureBuilder;
use crate::core::models::structure::Structure;
use nalgebra::{Point3, Vector3};

const N_CA_LENGTH: f64 = 1.458;
const CA_C_LENGTH: f64 = 1.525;
const C_N_LENGTH: f64 = 1.329;
const N_CA_C_ANGLE: f64 = 111.2;
const CA_C_N_ANGLE: f64 = 116.2;
const C_N_CA_ANGLE: f64 = 121.7;
const OMEGA: f64 = 180.0;

/// Places atom `d` so that |cd| = `length`, angle bcd = `angle` and torsion abcd = `torsion`.
pub fn place_atom(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    length: f64,
    angle_degrees: f64,
    torsion_degrees: f64,
) -> Point3<f64> {
    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);
    let (angle, torsion) = (angle_degrees.to_radians(), torsion_degrees.to_radians());
    c + bc * (-length * angle.cos())
        + m * (length * angle.sin() * torsion.cos())
        + n * (length * angle.sin() * torsion.sin())
}

/// N, CA and C positions of an ideal trans-peptide backbone.
///
/// `torsions[i]` is `(phi, psi)` of residue i; the phi of the first residue and the psi
/// of the last one have no geometric meaning and are ignored.
pub fn backbone_positions(torsions: &[(f64, f64)]) -> Vec<[Point3<f64>; 3]> {
    let mut positions: Vec<[Point3<f64>; 3]> = Vec::with_capacity(torsions.len());
    if torsions.is_empty() {
        return positions;
    }

    let n = Point3::origin();
    let ca = Point3::new(N_CA_LENGTH, 0.0, 0.0);
    let opening = (180.0 - N_CA_C_ANGLE).to_radians();
    let c = ca + Vector3::new(opening.cos(), opening.sin(), 0.0) * CA_C_LENGTH;
    positions.push([n, ca, c]);

    for i in 1..torsions.len() {
        let [prev_n, prev_ca, prev_c] = positions[i - 1];
        let psi_prev = torsions[i - 1].1;
        let phi = torsions[i].0;

        let n = place_atom(&prev_n, &prev_ca, &prev_c, C_N_LENGTH, CA_C_N_ANGLE, psi_prev);
        let ca = place_atom(&prev_ca, &prev_c, &n, N_CA_LENGTH, C_N_CA_ANGLE, OMEGA);
        let c = place_atom(&prev_c, &n, &ca, CA_C_LENGTH, N_CA_C_ANGLE, phi);
        positions.push([n, ca, c]);
    }
    positions
}

/// Adds residues numbered from `first_number` with the given backbone atoms to the
/// builder's current chain, leaving out the `(residue offset, atom name)` pairs listed in
/// `skip_atoms`.
pub fn add_backbone_residues(
    builder: &mut StructureBuilder,
    first_number: isize,
    names: &[&str],
    positions: &[[Point3<f64>; 3]],
    skip_atoms: &[(usize, &str)],
) {
    let mut serial = 1;
    for (offset, (name, atoms)) in names.iter().zip(positions).enumerate() {
        builder
            .start_residue(first_number + offset as isize, None, name, false)
            .unwrap();
        for (atom_name, position) in ["N", "CA", "C"].into_iter().zip(atoms) {
            if skip_atoms.contains(&(offset, atom_name)) {
                continue;
            }
            builder.add_atom(serial, atom_name, *position).unwrap();
            serial += 1;
        }
    }
}

/// A single-chain structure with ideal geometry for the given residue names and torsions.
pub fn ideal_chain(chain_id: &str, residues: &[(&str, f64, f64)]) -> Structure {
    let names: Vec<&str> = residues.iter().map(|(name, _, _)| *name).collect();
    let torsions: Vec<(f64, f64)> = residues.iter().map(|&(_, phi, psi)| (phi, psi)).collect();
    let positions = backbone_positions(&torsions);

    let mut builder = StructureBuilder::new("ideal");
    builder.start_chain(chain_id);
    add_backbone_residues(&mut builder, 1, &names, &positions, &[]);
    builder.build()
}

/// Nine standard residues forming a connected chain: an alpha helix followed by an
/// extended stretch.
pub fn nine_residue_chain() -> Structure {
    ideal_chain(
        "A",
        &[
            ("MET", -60.0, -45.0),
            ("ALA", -60.0, -45.0),
            ("GLU", -60.0, -45.0),
            ("LEU", -60.0, -45.0),
            ("LYS", -60.0, -45.0),
            ("VAL", -150.0, 150.0),
            ("THR", -140.0, 135.0),
            ("ILE", -120.0, 115.0),
            ("SER", -120.0, 130.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::geometry::{dihedral_degrees, distance};

    #[test]
    fn placed_backbone_reproduces_requested_torsions() {
        let torsions = [(0.0, -47.0), (-57.0, -47.0), (-139.0, 135.0), (75.0, 0.0)];
        let positions = backbone_positions(&torsions);

        for i in 1..torsions.len() {
            let phi = dihedral_degrees(
                &positions[i - 1][2],
                &positions[i][0],
                &positions[i][1],
                &positions[i][2],
            );
            assert!((phi - torsions[i].0).abs() < 1e-6, "phi {} vs {}", phi, torsions[i].0);
        }
        for i in 0..torsions.len() - 1 {
            let psi = dihedral_degrees(
                &positions[i][0],
                &positions[i][1],
                &positions[i][2],
                &positions[i + 1][0],
            );
            assert!((psi - torsions[i].1).abs() < 1e-6, "psi {} vs {}", psi, torsions[i].1);
        }
    }

    #[test]
    fn placed_backbone_has_peptide_bond_lengths() {
        let positions = backbone_positions(&[(0.0, 120.0), (-90.0, 0.0)]);
        assert!((distance(&positions[0][2], &positions[1][0]) - C_N_LENGTH).abs() < 1e-9);
        assert!((distance(&positions[1][0], &positions[1][1]) - N_CA_LENGTH).abs() < 1e-9);
        assert!((distance(&positions[0][1], &positions[0][2]) - CA_C_LENGTH).abs() < 1e-9);
    }
}
