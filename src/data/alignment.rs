// alignment.rs - In-memory multiple alignment

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use bio::io::fasta;
use crate::data::nucleotide::is_gap;
use crate::error::{DistError, Result};

/// A named aligned sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.as_ref().to_vec(),
        }
    }
}

/// Ordered collection of equal-length sequences. Symbols are stored upper-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    records: Vec<SequenceRecord>,
    length: usize,
}

impl Alignment {
    /// Build an alignment, checking that all sequences share one length
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self> {
        let length = records.first().map(|r| r.sequence.len()).unwrap_or(0);

        let mut records = records;
        for record in records.iter_mut() {
            if record.sequence.len() != length {
                return Err(DistError::alignment(format!(
                    "sequence '{}' has length {} but the alignment length is {}",
                    record.name,
                    record.sequence.len(),
                    length
                )));
            }
            record.sequence.make_ascii_uppercase();
        }

        Ok(Self { records, length })
    }

    /// Convenience constructor from (name, sequence) pairs
    pub fn from_pairs<N, S>(pairs: impl IntoIterator<Item = (N, S)>) -> Result<Self>
    where
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, seq)| SequenceRecord::new(name, seq))
                .collect(),
        )
    }

    /// Load an aligned FASTA file
    pub fn from_fasta(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            DistError::alignment(format!("Failed to open FASTA file {}: {}", path.display(), e))
        })?;
        Self::from_fasta_reader(BufReader::new(file))
    }

    /// Read aligned FASTA records from any reader
    pub fn from_fasta_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = fasta::Reader::new(reader);
        let mut records = Vec::new();

        for record_result in reader.records() {
            let record = record_result
                .map_err(|e| DistError::alignment(format!("Invalid FASTA record: {}", e)))?;
            records.push(SequenceRecord::new(record.id(), record.seq()));
        }

        Self::new(records)
    }

    /// Number of sequences
    pub fn n_sequences(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.records.get(index).map(|r| r.name.as_str())
    }

    pub fn sequence(&self, index: usize) -> Option<&[u8]> {
        self.records.get(index).map(|r| r.sequence.as_slice())
    }

    /// Symbol of sequence `index` at column `site`
    pub fn symbol(&self, index: usize, site: usize) -> Option<u8> {
        self.sequence(index)?.get(site).copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    /// True when any sequence has a gap at `site`
    pub fn column_has_gap(&self, site: usize) -> bool {
        self.records
            .iter()
            .any(|r| r.sequence.get(site).copied().is_some_and(is_gap))
    }
}
