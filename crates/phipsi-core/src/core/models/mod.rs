//! # Structure Models
//!
//! Arena-backed representation of a parsed protein structure.
//!
//! A [`structure::Structure`] owns every atom, residue and chain in slot maps and hands out
//! typed keys ([`ids::AtomId`], [`ids::ResidueId`], [`ids::ChainId`]). Models are kept as an
//! ordered list of chain keys, so the usual hierarchy
//! `Structure -> Model -> Chain -> Residue -> Atom` can be walked in file order while every
//! level stays addressable by a stable identifier.
//!
//! ```ignore
//! use phipsi::core::models::builder::StructureBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = StructureBuilder::new("example");
//! builder.start_chain("A");
//! builder.start_residue(1, None, "ALA", false)?;
//! builder.add_atom(1, "CA", Point3::new(0.0, 0.0, 0.0))?;
//! let structure = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
