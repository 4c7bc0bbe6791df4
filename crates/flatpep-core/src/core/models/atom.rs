use nalgebra::Point3;

/// Represents a single atom of a generated peptide structure.
///
/// This is the unit of exchange between structure generators, the container
/// codec, and the PDB writer: a name, the residue it belongs to, and a
/// Cartesian position in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Atom name as reported by the generator (e.g. "CA", "HB1").
    pub name: String,
    /// One-based index of the residue this atom belongs to.
    pub residue_id: i32,
    /// Residue name, conventionally a three-letter code (e.g. "ALA").
    pub residue_name: String,
    /// Position in Cartesian space, single precision.
    pub position: Point3<f32>,
}

impl AtomRecord {
    /// Creates a new atom record.
    pub fn new(name: &str, residue_id: i32, residue_name: &str, position: Point3<f32>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            residue_name: residue_name.to_string(),
            position,
        }
    }
}
