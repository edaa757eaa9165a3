use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

type ResidueKey = (ChainId, isize, Option<char>, bool);

/// One model (conformer set) of a structure: an ordered list of chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// The model serial number (`MODEL` record), 1 when the file has none.
    pub serial: usize,
    pub(crate) chains: Vec<ChainId>,
}

impl Model {
    pub(crate) fn new(serial: usize) -> Self {
        Self {
            serial,
            chains: Vec::new(),
        }
    }

    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }
}

/// Represents a complete parsed structure with models, chains, residues and atoms.
///
/// This struct is the read-only input of every analysis in the crate. Components are
/// stored in slot maps for stable identifiers, while models and chains keep ordered key
/// lists so iteration always follows file order.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Identifier of the structure (usually the file stem or PDB code).
    pub name: String,
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Models in file order.
    models: Vec<Model>,
    /// Lookup map for finding chains by model position and identifier.
    chain_id_map: HashMap<(usize, String), ChainId>,
    /// Lookup map for finding residues by chain, sequence number, insertion code and
    /// hetero flag.
    residue_id_map: HashMap<ResidueKey, ResidueId>,
}

impl Structure {
    /// Creates a new, empty structure without models.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifier of the structure.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in the structure.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves a mutable reference to a residue by its ID.
    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns all models in file order.
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Returns the model at the given 0-based position.
    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    /// Returns the first model, which is what single-model analyses operate on.
    pub fn first_model(&self) -> Option<&Model> {
        self.models.first()
    }

    /// Returns an iterator over the chains of one model, in file order.
    ///
    /// # Arguments
    ///
    /// * `model_index` - The 0-based position of the model.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs; empty if the model does not exist.
    pub fn chains_in_model(&self, model_index: usize) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.models
            .get(model_index)
            .map(|model| model.chains.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Returns an iterator over the residues of one chain, in sequence order.
    pub fn residues_in_chain(&self, chain_id: ChainId) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.chains
            .get(chain_id)
            .map(|chain| chain.residues.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    /// Returns an iterator over every residue of every model, in file order.
    pub fn residues_in_order(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.models
            .iter()
            .flat_map(|model| model.chains.iter())
            .flat_map(|&chain_id| self.residues_in_chain(chain_id))
    }

    /// Finds a chain ID by its identifier within one model.
    ///
    /// # Arguments
    ///
    /// * `model_index` - The 0-based position of the model.
    /// * `id` - The chain identifier.
    ///
    /// # Return
    ///
    /// Returns `Some(ChainId)` if the chain exists in that model, otherwise `None`.
    pub fn find_chain_by_id(&self, model_index: usize, id: &str) -> Option<ChainId> {
        self.chain_id_map.get(&(model_index, id.to_string())).copied()
    }

    /// Finds a residue ID by its chain, sequence number and insertion code.
    ///
    /// When a polymer residue and a hetero group share the number, the polymer residue is
    /// returned.
    pub fn find_residue(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number, insertion_code, false))
            .or_else(|| {
                self.residue_id_map
                    .get(&(chain_id, residue_number, insertion_code, true))
            })
            .copied()
    }

    /// Looks up an atom of a residue by name.
    pub fn residue_atom(&self, residue_id: ResidueId, name: &str) -> Option<&Atom> {
        self.residues
            .get(residue_id)?
            .get_atom_id_by_name(name)
            .and_then(|atom_id| self.atoms.get(atom_id))
    }

    /// Returns the position of a named atom of a residue, if both exist.
    pub fn atom_position(&self, residue_id: ResidueId, name: &str) -> Option<Point3<f64>> {
        self.residue_atom(residue_id, name).map(|atom| atom.position)
    }

    /// Returns the chain identifier of a residue.
    pub fn chain_id_of(&self, residue_id: ResidueId) -> Option<&str> {
        let residue = self.residues.get(residue_id)?;
        self.chains.get(residue.chain_id).map(|chain| chain.id.as_str())
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Appends a new model and returns its 0-based position.
    pub fn add_model(&mut self, serial: usize) -> usize {
        self.models.push(Model::new(serial));
        self.models.len() - 1
    }

    /// Adds a new chain to a model or returns the existing one.
    ///
    /// This method is idempotent; a chain identifier that reappears later in the same model
    /// (e.g., HETATM records after other chains) maps to the same chain.
    ///
    /// # Return
    ///
    /// Returns `Some(ChainId)` if the model exists, otherwise `None`.
    pub fn add_chain(&mut self, model_index: usize, id: &str) -> Option<ChainId> {
        let model = self.models.get_mut(model_index)?;
        let chains = &mut self.chains;
        let chain_id = *self
            .chain_id_map
            .entry((model_index, id.to_string()))
            .or_insert_with(|| {
                let chain_id = chains.insert(Chain::new(id, model_index));
                model.chains.push(chain_id);
                chain_id
            });
        Some(chain_id)
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// This method is idempotent on `(chain, residue_number, insertion_code, is_hetero)`, so a
    /// HETATM group numbered like an ATOM residue of the same chain stays a separate residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let residues = &mut self.residues;
        let residue_id = *self
            .residue_id_map
            .entry((chain_id, residue_number, insertion_code, is_hetero))
            .or_insert_with(|| {
                let mut residue = Residue::new(residue_number, insertion_code, name, chain_id);
                residue.is_hetero = is_hetero;
                let residue_id = residues.insert(residue);
                chain.residues.push(residue_id);
                residue_id
            });
        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (e.g., if residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        residue.add_atom(&name, atom_id);
        Some(atom_id)
    }
}
