//! Global pairwise alignment of amino-acid sequences.
//!
//! Needleman-Wunsch with affine gaps in the three-matrix (Gotoh) form, scored
//! with BLOSUM62. Letters outside the matrix alphabet score as `X`.

use super::error::EngineError;
use std::fmt;

const ALPHABET: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

/// NCBI BLOSUM62, rows and columns in [`ALPHABET`] order.
#[rustfmt::skip]
const BLOSUM62: [[i32; 24]; 24] = [
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4],
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4],
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4],
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4],
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4],
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4],
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4],
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4],
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4],
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4],
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4],
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4],
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4],
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4],
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4],
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4],
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4],
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4],
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4],
    [-2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4],
    [-1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
    [ 0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4],
    [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1],
];

const X_INDEX: usize = 22;
const GAP: char = '-';

fn residue_index(residue: char) -> usize {
    let upper = residue.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&c| c as char == upper)
        .unwrap_or(X_INDEX)
}

/// BLOSUM62 score of a residue pair.
pub fn substitution_score(a: char, b: char) -> i32 {
    BLOSUM62[residue_index(a)][residue_index(b)]
}

/// Affine gap penalties: a gap of length `n` costs `open + (n - 1) * extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapPenalties {
    pub open: i32,
    pub extend: i32,
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self {
            open: -8,
            extend: -2,
        }
    }
}

/// Two gapped sequences of equal length and the score of their alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAlignment {
    pub first: String,
    pub second: String,
    pub score: i32,
}

impl SequenceAlignment {
    /// Positions `(i, j)` in the ungapped sequences that were aligned to each
    /// other, in increasing order.
    pub fn aligned_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        let (mut i, mut j) = (0, 0);
        for (a, b) in self.first.chars().zip(self.second.chars()) {
            match (a == GAP, b == GAP) {
                (false, false) => {
                    pairs.push((i, j));
                    i += 1;
                    j += 1;
                }
                (false, true) => i += 1,
                (true, false) => j += 1,
                (true, true) => {}
            }
        }
        pairs
    }

    /// Fraction of aligned pairs with identical residues, 0 when nothing is
    /// aligned.
    pub fn identity(&self) -> f64 {
        let pairs = self
            .first
            .chars()
            .zip(self.second.chars())
            .filter(|(a, b)| *a != GAP && *b != GAP);
        let (mut total, mut same) = (0usize, 0usize);
        for (a, b) in pairs {
            total += 1;
            if a.eq_ignore_ascii_case(&b) {
                same += 1;
            }
        }
        if total == 0 { 0.0 } else { same as f64 / total as f64 }
    }

    /// The match line: `*` identical, `|` positive or zero substitution score,
    /// blank otherwise.
    pub fn match_line(&self) -> String {
        self.first
            .chars()
            .zip(self.second.chars())
            .map(|(a, b)| {
                if a == GAP || b == GAP {
                    ' '
                } else if a.eq_ignore_ascii_case(&b) {
                    '*'
                } else if substitution_score(a, b) >= 0 {
                    '|'
                } else {
                    ' '
                }
            })
            .collect()
    }
}

impl fmt::Display for SequenceAlignment {
    /// Blocks of 80 columns: first sequence, match line, second sequence.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 80;
        let rows: [Vec<char>; 3] = [
            self.first.chars().collect(),
            self.match_line().chars().collect(),
            self.second.chars().collect(),
        ];
        for start in (0..rows[0].len()).step_by(WIDTH) {
            for row in &rows {
                let end = (start + WIDTH).min(row.len());
                writeln!(f, "{}", row[start..end].iter().collect::<String>())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Diagonal,
    GapInFirst,
    GapInSecond,
}

/// Globally aligns two one-letter amino-acid sequences.
///
/// # Errors
///
/// Returns [`EngineError::EmptySequence`] if either sequence is empty.
pub fn align_sequences(
    first: &str,
    second: &str,
    gaps: GapPenalties,
) -> Result<SequenceAlignment, EngineError> {
    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();
    if a.is_empty() || b.is_empty() {
        return Err(EngineError::EmptySequence);
    }

    let (m, n) = (a.len(), b.len());
    let cols = n + 1;
    let at = |i: usize, j: usize| i * cols + j;
    let floor = i32::MIN / 2;

    // h: best score at (i, j); e: ending in a gap in `first`; f: ending in a
    // gap in `second`.
    let mut h = vec![floor; (m + 1) * cols];
    let mut e = vec![floor; (m + 1) * cols];
    let mut f = vec![floor; (m + 1) * cols];
    h[at(0, 0)] = 0;
    for i in 1..=m {
        h[at(i, 0)] = gaps.open + (i as i32 - 1) * gaps.extend;
        f[at(i, 0)] = h[at(i, 0)];
    }
    for j in 1..=n {
        h[at(0, j)] = gaps.open + (j as i32 - 1) * gaps.extend;
        e[at(0, j)] = h[at(0, j)];
    }

    for i in 1..=m {
        for j in 1..=n {
            e[at(i, j)] = (h[at(i, j - 1)] + gaps.open).max(e[at(i, j - 1)] + gaps.extend);
            f[at(i, j)] = (h[at(i - 1, j)] + gaps.open).max(f[at(i - 1, j)] + gaps.extend);
            let diagonal = h[at(i - 1, j - 1)] + substitution_score(a[i - 1], b[j - 1]);
            h[at(i, j)] = diagonal.max(e[at(i, j)]).max(f[at(i, j)]);
        }
    }

    let mut aligned_first = Vec::with_capacity(m + n);
    let mut aligned_second = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    let mut state = State::Diagonal;
    while i > 0 || j > 0 {
        match state {
            State::Diagonal if i > 0 && j > 0 => {
                let diagonal = h[at(i - 1, j - 1)] + substitution_score(a[i - 1], b[j - 1]);
                if h[at(i, j)] == diagonal {
                    aligned_first.push(a[i - 1]);
                    aligned_second.push(b[j - 1]);
                    i -= 1;
                    j -= 1;
                } else if h[at(i, j)] == e[at(i, j)] {
                    state = State::GapInFirst;
                } else {
                    state = State::GapInSecond;
                }
            }
            State::Diagonal => {
                state = if j > 0 {
                    State::GapInFirst
                } else {
                    State::GapInSecond
                };
            }
            State::GapInFirst => {
                aligned_first.push(GAP);
                aligned_second.push(b[j - 1]);
                if i == 0 || e[at(i, j)] == h[at(i, j - 1)] + gaps.open {
                    state = State::Diagonal;
                }
                j -= 1;
            }
            State::GapInSecond => {
                aligned_first.push(a[i - 1]);
                aligned_second.push(GAP);
                if j == 0 || f[at(i, j)] == h[at(i - 1, j)] + gaps.open {
                    state = State::Diagonal;
                }
                i -= 1;
            }
        }
    }

    Ok(SequenceAlignment {
        first: aligned_first.into_iter().rev().collect(),
        second: aligned_second.into_iter().rev().collect(),
        score: h[at(m, n)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(a: &str, b: &str) -> SequenceAlignment {
        align_sequences(a, b, GapPenalties::default()).unwrap()
    }

    #[test]
    fn blosum62_lookups() {
        assert_eq!(substitution_score('W', 'W'), 11);
        assert_eq!(substitution_score('A', 'R'), -1);
        assert_eq!(substitution_score('r', 'A'), -1);
        assert_eq!(substitution_score('I', 'V'), 3);
        assert_eq!(substitution_score('U', 'A'), 0);
    }

    #[test]
    fn identical_sequences_align_without_gaps() {
        let alignment = align("MKTAYIAK", "MKTAYIAK");
        assert_eq!(alignment.first, "MKTAYIAK");
        assert_eq!(alignment.second, "MKTAYIAK");
        assert_eq!(alignment.identity(), 1.0);
        let pairs = alignment.aligned_pairs();
        assert_eq!(pairs.len(), 8);
        assert!(pairs.iter().all(|(i, j)| i == j));
    }

    #[test]
    fn missing_residues_become_one_gap() {
        let alignment = align("WCHKWWCHKW", "WCHKCHKW");
        assert_eq!(alignment.first, "WCHKWWCHKW");
        assert_eq!(alignment.first.len(), alignment.second.len());
        assert_eq!(alignment.second.matches('-').count(), 2);
        assert!(alignment.second.contains("--"));

        let pairs = alignment.aligned_pairs();
        assert_eq!(pairs.len(), 8);
        assert_eq!(pairs[0], (0, 0));
        assert_eq!(*pairs.last().unwrap(), (9, 7));
    }

    #[test]
    fn terminal_extension_is_a_leading_gap() {
        let alignment = align("GGGWCHKW", "WCHKW");
        assert_eq!(alignment.second, "---WCHKW");
        assert_eq!(alignment.aligned_pairs()[0], (3, 0));
        // 11 + 9 + 8 + 5 + 11 for the matches, -8 - 2 - 2 for the gap.
        assert_eq!(alignment.score, 32);
    }

    #[test]
    fn match_line_marks_identity_and_similarity() {
        let alignment = SequenceAlignment {
            first: "AIW-".into(),
            second: "AVC-".into(),
            score: 0,
        };
        assert_eq!(alignment.match_line(), "*|  ");
        assert_eq!(alignment.to_string(), "AIW-\n*|  \nAVC-\n\n");
    }

    #[test]
    fn empty_sequence_is_an_error() {
        assert_eq!(
            align_sequences("", "ACD", GapPenalties::default()),
            Err(EngineError::EmptySequence)
        );
    }
}
