use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Zero-based base offset within a read or reference.
pub type Position = usize;

/// An immutable nucleotide sequence.
///
/// Bytes are stored as given (usually upper-case IUPAC symbols); no alphabet
/// check is performed so that ambiguous calls such as `N` survive trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Sequence(Vec<u8>);

impl Sequence {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the half-open range `[range.start, range.end)`.
    ///
    /// Panics if the range is out of bounds, like slice indexing.
    pub fn slice(&self, range: Range<Position>) -> Self {
        Self(self.0[range].to_vec())
    }

    pub fn reverse_complement(&self) -> Self {
        let data = self
            .0
            .iter()
            .rev()
            .map(|&base| match base {
                b'A' => b'T',
                b'T' => b'A',
                b'G' => b'C',
                b'C' => b'G',
                b'a' => b't',
                b't' => b'a',
                b'g' => b'c',
                b'c' => b'g',
                _ => base, // N and other ambiguity codes stay as-is
            })
            .collect();
        Self(data)
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Sequence {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Sequence {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Sequence> for String {
    fn from(seq: Sequence) -> Self {
        String::from_utf8_lossy(&seq.0).into_owned()
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// A parsed sequencing record as produced by a FASTA/FASTQ reader.
///
/// `quality` holds decoded Phred scores and is `None` for FASTA input.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Sequence,
    pub quality: Option<Vec<f64>>,
}

impl SequenceRecord {
    pub fn new(id: String, sequence: Sequence) -> Self {
        Self {
            id,
            description: None,
            sequence,
            quality: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_quality(mut self, quality: Vec<f64>) -> Self {
        self.quality = Some(quality);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        let seq = Sequence::from("ACGT");
        assert_eq!(seq.reverse_complement(), seq); // Palindrome

        let seq2 = Sequence::from("AACN");
        assert_eq!(seq2.reverse_complement().as_bytes(), b"NGTT");
    }

    #[test]
    fn test_slice_is_half_open() {
        let seq = Sequence::from("ACGTACGT");
        assert_eq!(seq.slice(3..6).to_string(), "TAC");
        assert!(seq.slice(4..4).is_empty());
    }

    #[test]
    fn test_sequence_serializes_as_string() {
        let seq = Sequence::from("GATTACA");
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "\"GATTACA\"");
        let back: Sequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn test_strand_display() {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }
}
