use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a parsed structure with its coordinates and record metadata.
///
/// Atoms are owned by a [`Structure`](super::structure::Structure) arena and referenced
/// through [`AtomId`](super::ids::AtomId) keys. Only the position is consumed by the
/// torsion analysis; the remaining fields are carried so that structures survive a
/// read/write round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom within its residue (e.g., "CA", "N", "C").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Isotropic temperature factor.
    pub temperature_factor: f64,
    /// Element symbol, if the source file provided one.
    pub element: Option<String>,
}

impl Atom {
    /// Creates a new `Atom` with default record metadata.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            residue_id,
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
            element: None,
        }
    }
}
