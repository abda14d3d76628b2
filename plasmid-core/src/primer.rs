//! Sequencing primer model.

use crate::error::{PlasmidError, Result};
use crate::types::{Sequence, SequenceRecord};
use serde::{Deserialize, Serialize};

/// A sequencing primer: an identifier and its DNA sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPrimer")]
pub struct Primer {
    identifier: String,
    sequence: Sequence,
}

#[derive(Deserialize)]
struct RawPrimer {
    identifier: String,
    sequence: Sequence,
}

impl TryFrom<RawPrimer> for Primer {
    type Error = PlasmidError;

    fn try_from(raw: RawPrimer) -> Result<Self> {
        Self::new(raw.identifier, raw.sequence)
    }
}

impl Primer {
    pub fn new<S: Into<String>>(identifier: S, sequence: Sequence) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(PlasmidError::validation("primer identifier must not be empty"));
        }
        if sequence.is_empty() {
            return Err(PlasmidError::validation(format!(
                "primer '{}' has an empty sequence",
                identifier
            )));
        }
        Ok(Self { identifier, sequence })
    }

    /// Build a primer from a parsed FASTA/FASTQ record; qualities are ignored.
    pub fn from_record(record: &SequenceRecord) -> Result<Self> {
        Self::new(record.id.clone(), record.sequence.clone())
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// A validated primer is never empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primer_length_matches_sequence() {
        let primer = Primer::new("M13F", Sequence::from("GTAAAACGACGGCCAGT")).unwrap();
        assert_eq!(primer.identifier(), "M13F");
        assert_eq!(primer.len(), 17);
        assert_eq!(primer.len(), primer.sequence().len());
    }

    #[test]
    fn test_primer_from_record() {
        let record = SequenceRecord::new("T7".to_string(), Sequence::from("TAATACGACTCACTATAGGG"))
            .with_description("T7 promoter".to_string());
        let primer = Primer::from_record(&record).unwrap();
        assert_eq!(primer.identifier(), "T7");
        assert_eq!(primer.sequence().to_string(), "TAATACGACTCACTATAGGG");
    }

    #[test]
    fn test_primer_rejects_empty_fields() {
        assert!(Primer::new("", Sequence::from("ACGT")).unwrap_err().is_validation());
        assert!(Primer::new("p1", Sequence::default()).unwrap_err().is_validation());
    }

    #[test]
    fn test_deserialization_validates() {
        let primer: Primer = serde_json::from_str(r#"{"identifier":"M13R","sequence":"CAGGAAACAGCTATGAC"}"#).unwrap();
        assert_eq!(primer.len(), 17);

        assert!(serde_json::from_str::<Primer>(r#"{"identifier":"","sequence":"ACGT"}"#).is_err());
        assert!(serde_json::from_str::<Primer>(r#"{"identifier":"p1","sequence":""}"#).is_err());
    }
}
