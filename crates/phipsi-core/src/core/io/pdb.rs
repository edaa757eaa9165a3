use crate::core::io::traits::MolecularFile;
use crate::core::models::builder::{BuildError, StructureBuilder};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Header records preserved from a PDB file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbMetadata {
    /// The four character entry code from the `HEADER` record, if any.
    pub id_code: Option<String>,
    /// Raw header lines (`HEADER`, `TITLE`, `REMARK`, ...) seen before the first coordinate.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data on line {line}: {source}")]
    Inconsistency {
        line: usize,
        #[source]
        source: BuildError,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

const MIN_COORDINATE_LINE_LEN: usize = 54;

const HEADER_RECORDS: &[&str] = &[
    "HEADER", "OBSLTE", "TITLE", "SPLIT", "CAVEAT", "COMPND", "SOURCE", "KEYWDS", "EXPDTA",
    "NUMMDL", "MDLTYP", "AUTHOR", "REVDAT", "SPRSDE", "JRNL", "REMARK",
];

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    make_kind: fn(String, String) -> PdbParseErrorKind,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: make_kind(format!("{}-{}", start + 1, end), value.to_string()),
    })
}

fn invalid_int(columns: String, value: String) -> PdbParseErrorKind {
    PdbParseErrorKind::InvalidInt { columns, value }
}

fn invalid_float(columns: String, value: String) -> PdbParseErrorKind {
    PdbParseErrorKind::InvalidFloat { columns, value }
}

fn parse_optional_float(line: &str, line_num: usize, start: usize, end: usize, default: f64) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_field(line, line_num, start, end, invalid_float)
    }
}

fn optional_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

type ResidueKey = (isize, Option<char>, String, bool);

/// Reader and writer for the fixed-column Protein Data Bank format.
///
/// Only the records needed to rebuild the model hierarchy are interpreted: `MODEL`,
/// `ENDMDL`, `ATOM`, `HETATM`, `TER` and `END`. Header records are kept verbatim in
/// [`PdbMetadata`]; everything else is skipped.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut builder = StructureBuilder::new("");
        let mut metadata = PdbMetadata::default();
        let mut atom_count = 0usize;

        let mut current_chain: Option<String> = None;
        let mut current_residue: Option<ResidueKey> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let serial: usize = parse_field(&line, line_num, 6, 11, invalid_int)?;
                    let residue_name = slice_and_trim(&line, 17, 20);
                    let chain_id = slice_and_trim(&line, 21, 22);
                    let residue_number: isize = parse_field(&line, line_num, 22, 26, invalid_int)?;
                    let insertion_code = optional_char(&line, 26);
                    let x: f64 = parse_field(&line, line_num, 30, 38, invalid_float)?;
                    let y: f64 = parse_field(&line, line_num, 38, 46, invalid_float)?;
                    let z: f64 = parse_field(&line, line_num, 46, 54, invalid_float)?;
                    let occupancy = parse_optional_float(&line, line_num, 54, 60, 1.0)?;
                    let temperature_factor = parse_optional_float(&line, line_num, 60, 66, 0.0)?;
                    let element = Some(slice_and_trim(&line, 76, 78)).filter(|e| !e.is_empty());

                    if current_chain.as_deref() != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain = Some(chain_id.to_string());
                        current_residue = None;
                    }

                    let is_hetero = record_type == "HETATM";
                    let residue_key = (
                        residue_number,
                        insertion_code,
                        residue_name.to_string(),
                        is_hetero,
                    );
                    if current_residue.as_ref() != Some(&residue_key) {
                        builder
                            .start_residue(residue_number, insertion_code, residue_name, is_hetero)
                            .map_err(|source| PdbError::Inconsistency {
                                line: line_num,
                                source,
                            })?;
                        current_residue = Some(residue_key);
                    }

                    builder
                        .add_atom_detailed(
                            serial,
                            name,
                            Point3::new(x, y, z),
                            occupancy,
                            temperature_factor,
                            element,
                        )
                        .map_err(|source| PdbError::Inconsistency {
                            line: line_num,
                            source,
                        })?;
                    atom_count += 1;
                }
                "MODEL" => {
                    let serial = match parse_field::<usize>(&line, line_num, 10, 14, invalid_int) {
                        Ok(serial) => serial,
                        Err(e) => {
                            let fallback = builder.model_count() + 1;
                            warn!("{}; numbering the model {}.", e, fallback);
                            fallback
                        }
                    };
                    builder.start_model(serial);
                    current_chain = None;
                    current_residue = None;
                }
                "ENDMDL" | "TER" => {
                    current_chain = None;
                    current_residue = None;
                }
                "END" => break,
                header if HEADER_RECORDS.contains(&header) && atom_count == 0 => {
                    if header == "HEADER" {
                        let id_code = slice_and_trim(&line, 62, 66);
                        if !id_code.is_empty() {
                            metadata.id_code = Some(id_code.to_string());
                        }
                    }
                    metadata.header_lines.push(line.clone());
                }
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        let mut structure = builder.build();
        if let Some(id_code) = &metadata.id_code {
            structure.name = id_code.clone();
        }
        debug!(
            models = structure.models().len(),
            residues = structure.residue_count(),
            atoms = structure.atom_count(),
            "Parsed PDB structure."
        );
        Ok((structure, metadata))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        let multi_model = structure.models().len() > 1;
        for (model_index, model) in structure.models().iter().enumerate() {
            if multi_model {
                writeln!(writer, "MODEL     {:>4}", model.serial)?;
            }
            let mut serial = 0usize;
            for (chain_id, chain) in structure.chains_in_model(model_index) {
                let chain_char = chain.id.chars().next().unwrap_or(' ');
                if chain.id.chars().count() > 1 {
                    warn!(
                        "Chain id '{}' does not fit the PDB chain column; writing '{}'.",
                        chain.id, chain_char
                    );
                }
                let mut last_residue = None;
                for (residue_id, residue) in structure.residues_in_chain(chain_id) {
                    let record_type = if residue.is_hetero { "HETATM" } else { "ATOM" };
                    for atom in residue
                        .atoms()
                        .iter()
                        .filter_map(|&atom_id| structure.atom(atom_id))
                    {
                        serial += 1;
                        let name_field = if atom.name.len() >= 4 {
                            atom.name.clone()
                        } else {
                            format!(" {:<3}", atom.name)
                        };
                        writeln!(
                            writer,
                            "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                            record_type,
                            serial,
                            name_field,
                            ' ',
                            residue.name,
                            chain_char,
                            residue.residue_number,
                            residue.insertion_code.unwrap_or(' '),
                            atom.position.x,
                            atom.position.y,
                            atom.position.z,
                            atom.occupancy,
                            atom.temperature_factor,
                            atom.element.as_deref().unwrap_or(""),
                        )?;
                    }
                    if !residue.is_hetero {
                        last_residue = Some(residue_id);
                    }
                }
                if let Some(residue) = last_residue.and_then(|id| structure.residue(id)) {
                    serial += 1;
                    writeln!(
                        writer,
                        "TER   {:>5}      {:>3} {}{:>4}{}",
                        serial,
                        residue.name,
                        chain_char,
                        residue.residue_number,
                        residue.insertion_code.unwrap_or(' '),
                    )?;
                }
            }
            if multi_model {
                writeln!(writer, "ENDMDL")?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_structure_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let metadata = PdbMetadata {
            id_code: None,
            header_lines: vec!["REMARK   1 GENERATED BY PHIPSI".to_string()],
        };
        Self::write_to(structure, &metadata, writer)
    }
}
