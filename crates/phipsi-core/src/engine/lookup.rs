use super::config::LookupScope;
use super::error::EngineError;
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Structure;
use tracing::debug;

/// Finds a residue by chain identifier and sequence number.
///
/// The chain must exist in the first model. With [`LookupScope::Structure`] the residue is
/// then searched across every residue of the structure in file order, so a matching
/// number in an earlier chain wins over the requested chain. [`LookupScope::Chain`] limits
/// the search to the requested chain.
///
/// # Errors
///
/// * [`EngineError::ChainNotFound`] if the first model has no chain `chain_id`.
/// * [`EngineError::ResidueNotFound`] if no searched residue has `residue_number`.
pub fn find_residue(
    structure: &Structure,
    chain_id: &str,
    residue_number: isize,
    scope: LookupScope,
) -> Result<ResidueId, EngineError> {
    let chain = structure
        .first_model()
        .and(structure.find_chain_by_id(0, chain_id))
        .ok_or_else(|| EngineError::ChainNotFound {
            chain_id: chain_id.to_string(),
        })?;

    let found = match scope {
        LookupScope::Structure => structure
            .residues_in_order()
            .find(|(_, residue)| residue.residue_number == residue_number),
        LookupScope::Chain => structure
            .residues_in_chain(chain)
            .find(|(_, residue)| residue.residue_number == residue_number),
    };

    let (residue_id, residue) = found.ok_or_else(|| EngineError::ResidueNotFound {
        chain_id: chain_id.to_string(),
        residue_number,
    })?;
    if residue.chain_id != chain {
        debug!(
            requested_chain = chain_id,
            found_chain = structure.chain_id_of(residue_id).unwrap_or(""),
            residue = %residue,
            "Residue number matched outside the requested chain."
        );
    }
    Ok(residue_id)
}
