use super::atom::AtomRecord;
use nalgebra::Point3;
use thiserror::Error;

/// Error returned when the parallel arrays of a bundle disagree in length.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "parallel structure arrays disagree in length (coordinates: {coordinates}, atom names: {atom_names}, residue ids: {residue_ids}, residue names: {residue_names})"
)]
pub struct ArrayLengthMismatch {
    pub coordinates: usize,
    pub atom_names: usize,
    pub residue_ids: usize,
    pub residue_names: usize,
}

/// The per-sequence structure payload in column-oriented form.
///
/// A bundle holds the same information as a list of [`AtomRecord`]s, but split
/// into four parallel arrays indexed by atom. This is the shape in which
/// structures are persisted: one coordinate array of `(N, 3)` single-precision
/// floats plus three flat arrays for names and residue ids.
///
/// All four arrays must have the same length; [`StructureBundle::validate`]
/// checks this for bundles assembled from untrusted input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureBundle {
    /// Atom positions, one `(x, y, z)` point per atom.
    pub coordinates: Vec<Point3<f32>>,
    /// Atom names, parallel to `coordinates`.
    pub atom_names: Vec<String>,
    /// One-based residue index for each atom, non-decreasing along the chain.
    pub residue_ids: Vec<i32>,
    /// Residue name for each atom.
    pub residue_names: Vec<String>,
}

impl StructureBundle {
    /// Splits a list of atom records into parallel arrays.
    pub fn from_atoms(atoms: &[AtomRecord]) -> Self {
        let mut bundle = Self {
            coordinates: Vec::with_capacity(atoms.len()),
            atom_names: Vec::with_capacity(atoms.len()),
            residue_ids: Vec::with_capacity(atoms.len()),
            residue_names: Vec::with_capacity(atoms.len()),
        };
        for atom in atoms {
            bundle.coordinates.push(atom.position);
            bundle.atom_names.push(atom.name.clone());
            bundle.residue_ids.push(atom.residue_id);
            bundle.residue_names.push(atom.residue_name.clone());
        }
        bundle
    }

    /// Recombines the parallel arrays into atom records, in stored order.
    ///
    /// Fails if the arrays disagree in length, which can only happen for
    /// bundles assembled by hand or read from a damaged container.
    pub fn atom_records(&self) -> Result<Vec<AtomRecord>, ArrayLengthMismatch> {
        self.validate()?;
        let mut atoms = Vec::with_capacity(self.coordinates.len());
        for i in 0..self.coordinates.len() {
            atoms.push(AtomRecord {
                name: self.atom_names[i].clone(),
                residue_id: self.residue_ids[i],
                residue_name: self.residue_names[i].clone(),
                position: self.coordinates[i],
            });
        }
        Ok(atoms)
    }

    /// Checks that all four arrays have the same length.
    pub fn validate(&self) -> Result<(), ArrayLengthMismatch> {
        let n = self.coordinates.len();
        if self.atom_names.len() == n && self.residue_ids.len() == n && self.residue_names.len() == n
        {
            Ok(())
        } else {
            Err(ArrayLengthMismatch {
                coordinates: n,
                atom_names: self.atom_names.len(),
                residue_ids: self.residue_ids.len(),
                residue_names: self.residue_names.len(),
            })
        }
    }

    /// Number of atoms in the bundle, taken from the coordinate array.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns `true` if the bundle holds no atoms.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}
