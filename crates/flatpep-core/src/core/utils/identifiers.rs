use phf::phf_map;

/// Maps one-letter amino-acid codes to their three-letter residue names.
///
/// Covers the twenty standard proteinogenic amino acids. Lookup is
/// case-sensitive; sequence letters are conventionally upper case.
static THREE_LETTER_CODES: phf::Map<u8, &'static str> = phf_map! {
    b'A' => "ALA",
    b'R' => "ARG",
    b'N' => "ASN",
    b'D' => "ASP",
    b'C' => "CYS",
    b'Q' => "GLN",
    b'E' => "GLU",
    b'G' => "GLY",
    b'H' => "HIS",
    b'I' => "ILE",
    b'L' => "LEU",
    b'K' => "LYS",
    b'M' => "MET",
    b'F' => "PHE",
    b'P' => "PRO",
    b'S' => "SER",
    b'T' => "THR",
    b'W' => "TRP",
    b'Y' => "TYR",
    b'V' => "VAL",
};

/// Returns the three-letter residue name for a one-letter code, if standard.
pub fn three_letter_code(one_letter: char) -> Option<&'static str> {
    if !one_letter.is_ascii() {
        return None;
    }
    THREE_LETTER_CODES.get(&(one_letter as u8)).copied()
}

/// Returns the distinct letters of `sequence` that are not standard
/// amino-acid codes, in order of first appearance.
pub fn nonstandard_letters(sequence: &str) -> Vec<char> {
    let mut seen = Vec::new();
    for letter in sequence.chars() {
        if three_letter_code(letter).is_none() && !seen.contains(&letter) {
            seen.push(letter);
        }
    }
    seen
}

/// Returns `true` if every letter of `sequence` is a standard amino-acid code.
pub fn is_standard_sequence(sequence: &str) -> bool {
    sequence.chars().all(|letter| three_letter_code(letter).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_letters_map_to_residue_names() {
        assert_eq!(three_letter_code('A'), Some("ALA"));
        assert_eq!(three_letter_code('K'), Some("LYS"));
        assert_eq!(three_letter_code('W'), Some("TRP"));
    }

    #[test]
    fn unknown_letters_have_no_code() {
        assert_eq!(three_letter_code('B'), None);
        assert_eq!(three_letter_code('a'), None);
        assert_eq!(three_letter_code('é'), None);
    }

    #[test]
    fn nonstandard_letters_are_reported_once_in_order() {
        assert_eq!(nonstandard_letters("AXAZXB"), vec!['X', 'Z', 'B']);
        assert!(nonstandard_letters("ACDEFGHIKLMNPQRSTVWY").is_empty());
    }

    #[test]
    fn standard_sequence_check_covers_whole_string() {
        assert!(is_standard_sequence("AAK"));
        assert!(!is_standard_sequence("AAX"));
        assert!(is_standard_sequence(""));
    }
}
