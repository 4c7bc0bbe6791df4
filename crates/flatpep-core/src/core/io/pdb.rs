//! PDB writer for generated structures.
//!
//! Emits the fixed-column `ATOM` record layout: serial in columns 7-11, atom
//! name centered in 13-16, residue name in 18-20, chain identifier in column
//! 22, residue sequence number in 23-26 and coordinates in 31-54 with three
//! decimals. Occupancy and temperature factor are fixed at `1.00` and `0.00`.
//! Every line is exactly 80 characters; the record list is closed by `END`.
//!
//! The element symbol (columns 77-78) is approximated from the first letter
//! of the atom name, falling back to carbon for empty names. Two-letter
//! elements and digit-prefixed hydrogen names are misread by this rule; the
//! approximation is part of the format contract and is kept as is.

use crate::core::models::atom::AtomRecord;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Width of every emitted record line.
pub const LINE_WIDTH: usize = 80;

/// Chain identifier used when the caller has no preference.
pub const DEFAULT_CHAIN_ID: char = 'A';

/// Renders `atoms` as PDB text, one `ATOM` record per atom in input order.
///
/// Serials are assigned 1-based from the input order. Atom names longer than
/// four characters and residue names longer than three are truncated to fit
/// their columns.
pub fn encode(atoms: &[AtomRecord], chain_id: char) -> String {
    let mut text = String::with_capacity((atoms.len() + 1) * (LINE_WIDTH + 1));
    for (index, atom) in atoms.iter().enumerate() {
        text.push_str(&atom_line(atom, index + 1, chain_id));
        text.push('\n');
    }
    text.push_str("END\n");
    text
}

/// Writes the PDB rendition of `atoms` to `writer`.
pub fn write_atoms<W: Write>(writer: &mut W, atoms: &[AtomRecord], chain_id: char) -> io::Result<()> {
    writer.write_all(encode(atoms, chain_id).as_bytes())
}

/// Writes the PDB rendition of `atoms` to a new file at `path`.
pub fn write_atoms_to_path<P: AsRef<Path>>(
    path: P,
    atoms: &[AtomRecord],
    chain_id: char,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_atoms(&mut writer, atoms, chain_id)?;
    writer.flush()
}

fn atom_line(atom: &AtomRecord, serial: usize, chain_id: char) -> String {
    let name = truncated(&atom.name, 4);
    let residue_name = truncated(&atom.residue_name, 3);
    let element = atom
        .name
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('C');
    format!(
        "{:<6}{:>5} {:^4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{}{}          {:>2}  ",
        "ATOM",
        serial,
        name,
        residue_name,
        chain_id,
        atom.residue_id,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        "  1.00",
        "  0.00",
        element,
    )
}

fn truncated(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}
