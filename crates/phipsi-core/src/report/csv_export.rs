use super::ReportError;
use crate::core::models::structure::Structure;
use crate::engine::dihedral::DihedralRecord;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct DihedralRow<'a> {
    residue_id: isize,
    residue_name: &'a str,
    phi: Option<f64>,
    psi: Option<f64>,
}

/// Writes `residue_id,residue_name,phi,psi` rows for every entry of `record`.
///
/// `residue_id` is the residue sequence number. Undefined angles are written as empty
/// fields. Entries whose residue is not part of `structure` are skipped.
pub fn write_dihedrals<W: Write>(
    structure: &Structure,
    record: &DihedralRecord,
    writer: W,
) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0usize;
    for (residue_id, torsions) in record.iter() {
        let Some(residue) = structure.residue(residue_id) else {
            continue;
        };
        csv_writer.serialize(DihedralRow {
            residue_id: residue.residue_number,
            residue_name: &residue.name,
            phi: torsions.phi,
            psi: torsions.psi,
        })?;
        rows += 1;
    }
    if rows == 0 {
        csv_writer.write_record(["residue_id", "residue_name", "phi", "psi"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_dihedrals_to_path(
    structure: &Structure,
    record: &DihedralRecord,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_dihedrals(structure, record, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::BackboneTorsions;
    use crate::test_utils::ideal_chain;

    fn render(structure: &Structure, record: &DihedralRecord) -> String {
        let mut buffer = Vec::new();
        write_dihedrals(structure, record, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn writes_header_and_rows_with_empty_missing_angles() {
        let structure = ideal_chain("A", &[("MET", 0.0, 0.0), ("GLY", 0.0, 0.0)]);
        let ids: Vec<_> = structure.residues_in_order().map(|(id, _)| id).collect();
        let mut record = DihedralRecord::new();
        record.insert(ids[0], BackboneTorsions { phi: None, psi: Some(-47.5) });
        record.insert(ids[1], BackboneTorsions { phi: Some(-57.0), psi: None });

        assert_eq!(
            render(&structure, &record),
            "residue_id,residue_name,phi,psi\n1,MET,,-47.5\n2,GLY,-57.0,\n"
        );
    }

    #[test]
    fn empty_record_still_writes_header() {
        let structure = ideal_chain("A", &[("MET", 0.0, 0.0)]);
        assert_eq!(
            render(&structure, &DihedralRecord::new()),
            "residue_id,residue_name,phi,psi\n"
        );
    }

    #[test]
    fn writes_to_path() {
        let structure = ideal_chain("A", &[("MET", 0.0, 0.0)]);
        let (id, _) = structure.residues_in_order().next().unwrap();
        let mut record = DihedralRecord::new();
        record.insert(id, BackboneTorsions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angles.csv");
        write_dihedrals_to_path(&structure, &record, &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "residue_id,residue_name,phi,psi\n1,MET,,\n"
        );
    }
}
