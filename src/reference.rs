//! Transcript models and genome changes.
//!
//! A [`TranscriptModel`] is an immutable record describing one transcript on
//! the genome: exon structure, CDS bounds, and the spliced mRNA sequence in
//! transcription order.  Models are built once at startup, shared read-only,
//! and never mutated by annotation.

use crate::common::Strand;

/// Error type for transcript model consistency checks.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("transcript {0} has no exons")]
    NoExons(String),
    #[error("transcript {0} has unsorted or overlapping exons")]
    ExonsNotSorted(String),
    #[error("transcript {0} has exons outside of its transcript bounds")]
    ExonsOutsideBounds(String),
    #[error("transcript {0} has a CDS endpoint outside of any exon")]
    CdsOutsideExons(String),
    #[error("transcript {0} declares an mRNA length of {1} but its exons span {2} bases")]
    MrnaLengthMismatch(String, usize, i32),
}

/// One exon as a 1-based inclusive genomic interval.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exon {
    /// 1-based inclusive genomic start position.
    pub start: i32,
    /// 1-based inclusive genomic end position.
    pub end: i32,
}

impl Exon {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Number of bases in the exon.
    pub fn len(&self) -> i32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether the 1-based genomic position lies within the exon.
    pub fn contains(&self, pos: i32) -> bool {
        pos >= self.start && pos <= self.end
    }
}

/// Immutable description of one transcript.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptModel {
    /// Stable identifier, e.g. `NM_000138.4`.
    pub accession: String,
    /// Numeric chromosome id (1..=22, 23=X, 24=Y, 25=MT).
    pub chromosome: u8,
    /// Strand the transcript is transcribed from.
    pub strand: Strand,
    /// 1-based inclusive genomic start of the transcribed region.
    pub tx_start: i32,
    /// 1-based inclusive genomic end of the transcribed region.
    pub tx_end: i32,
    /// 1-based inclusive genomic start of the coding region; for non-coding
    /// transcripts both CDS bounds equal `tx_end`.
    pub cds_start: i32,
    /// 1-based inclusive genomic end of the coding region.
    pub cds_end: i32,
    /// Exons sorted by genomic coordinate, regardless of strand.
    pub exons: Vec<Exon>,
    /// Spliced sequence in transcription order (reverse-complemented for
    /// minus-strand transcripts).
    pub mrna_sequence: String,
    /// 1-based offset of the first coding base within `mrna_sequence`.
    pub ref_cds_start: i32,
}

impl TranscriptModel {
    /// Whether the transcript has a coding region.
    pub fn is_coding(&self) -> bool {
        self.cds_start < self.cds_end
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    /// Length of exon `k` (genomic order).
    pub fn exon_len(&self, k: usize) -> i32 {
        self.exons[k].len()
    }

    /// Length of the intron preceding exon `k` in genomic order.
    ///
    /// `k` must be at least 1.
    pub fn intron_len(&self, k: usize) -> i32 {
        self.exons[k].start - self.exons[k - 1].end - 1
    }

    /// Declared length of the spliced mRNA sequence.
    pub fn mrna_len(&self) -> usize {
        self.mrna_sequence.len()
    }

    /// Total number of exonic bases.
    pub fn total_exon_len(&self) -> i32 {
        self.exons.iter().map(|e| e.len()).sum()
    }

    /// Number of coding bases in the spliced transcript.
    pub fn cds_len(&self) -> i32 {
        if !self.is_coding() {
            return 0;
        }
        self.exons
            .iter()
            .map(|e| {
                let lo = e.start.max(self.cds_start);
                let hi = e.end.min(self.cds_end);
                (hi - lo + 1).max(0)
            })
            .sum()
    }

    /// The wild-type codon covering the 1-based mRNA position `refvarstart`
    /// whose reading frame offset is `frame_start` (0..=2).
    ///
    /// Returns `None` when the codon is not fully contained in the declared
    /// mRNA sequence, which indicates a transcript database inconsistency.
    pub fn wt_codon(&self, refvarstart: i32, frame_start: i32) -> Option<&str> {
        let begin = refvarstart - frame_start - 1;
        if begin < 0 {
            return None;
        }
        self.mrna_sequence
            .get(begin as usize..(begin + 3) as usize)
    }

    /// The wild-type codon immediately following the one returned by
    /// [`TranscriptModel::wt_codon`]; used for changes that run past a codon
    /// boundary.
    pub fn wt_codon_after(&self, refvarstart: i32, frame_start: i32) -> Option<&str> {
        let begin = refvarstart - frame_start + 2;
        if begin < 0 {
            return None;
        }
        self.mrna_sequence
            .get(begin as usize..(begin + 3) as usize)
    }

    /// Check the structural invariants of the model.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        if self.exons.is_empty() {
            return Err(ReferenceError::NoExons(self.accession.clone()));
        }
        for pair in self.exons.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(ReferenceError::ExonsNotSorted(self.accession.clone()));
            }
        }
        let first = self.exons.first().expect("at least one exon");
        let last = self.exons.last().expect("at least one exon");
        if self.tx_start > first.start || self.tx_end < last.end {
            return Err(ReferenceError::ExonsOutsideBounds(self.accession.clone()));
        }
        if self.is_coding() {
            let contained = |pos| self.exons.iter().any(|e: &Exon| e.contains(pos));
            if self.cds_start < self.tx_start
                || self.cds_end > self.tx_end
                || !contained(self.cds_start)
                || !contained(self.cds_end)
            {
                return Err(ReferenceError::CdsOutsideExons(self.accession.clone()));
            }
        }
        if self.mrna_len() != self.total_exon_len() as usize {
            return Err(ReferenceError::MrnaLengthMismatch(
                self.accession.clone(),
                self.mrna_len(),
                self.total_exon_len(),
            ));
        }
        Ok(())
    }
}

/// Shape of a genome change, derived from its alleles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeShape {
    /// Single reference base replaced by a single alternative base.
    Snv,
    /// Zero reference bases, one or more inserted bases.
    Insertion,
    /// One or more deleted bases, zero inserted bases.
    Deletion,
    /// Multi-base replacement (including length-preserving substitutions).
    BlockSubstitution,
}

/// A change on the genome in VCF-like notation with `"-"` sentinels.
///
/// `reference == "-"` denotes a pure insertion anchored between
/// `position - 1` and `position`; `alternative == "-"` denotes a pure
/// deletion.  The spanned genomic interval is
/// `[position, position + ref_len - 1]` and empty for pure insertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeChange {
    /// Numeric chromosome id.
    pub chromosome: u8,
    /// 1-based genomic position of the first reference base (anchor base for
    /// insertions).
    pub position: i32,
    /// Reference allele or `"-"`.
    pub reference: String,
    /// Alternative allele or `"-"`.
    pub alternative: String,
}

impl GenomeChange {
    pub fn new(chromosome: u8, position: i32, reference: &str, alternative: &str) -> Self {
        Self {
            chromosome,
            position,
            reference: reference.to_string(),
            alternative: alternative.to_string(),
        }
    }

    /// Number of reference bases affected (0 for pure insertions).
    pub fn ref_len(&self) -> usize {
        if self.reference == "-" {
            0
        } else {
            self.reference.len()
        }
    }

    /// Number of alternative bases (0 for pure deletions).
    pub fn alt_len(&self) -> usize {
        if self.alternative == "-" {
            0
        } else {
            self.alternative.len()
        }
    }

    /// 1-based genomic begin position of the spanned interval.
    pub fn begin(&self) -> i32 {
        self.position
    }

    /// 1-based genomic end position of the spanned interval; one less than
    /// `begin()` for pure insertions.
    pub fn end(&self) -> i32 {
        self.position + self.ref_len() as i32 - 1
    }

    pub fn is_insertion(&self) -> bool {
        self.ref_len() == 0
    }

    pub fn is_deletion(&self) -> bool {
        self.alt_len() == 0
    }

    pub fn shape(&self) -> ChangeShape {
        if self.is_insertion() {
            ChangeShape::Insertion
        } else if self.is_deletion() {
            ChangeShape::Deletion
        } else if self.ref_len() == 1 && self.alt_len() == 1 {
            ChangeShape::Snv
        } else {
            ChangeShape::BlockSubstitution
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::Strand;

    fn example_tx() -> TranscriptModel {
        TranscriptModel {
            accession: String::from("TX_EX.1"),
            chromosome: 1,
            strand: Strand::Plus,
            tx_start: 100,
            tx_end: 400,
            cds_start: 150,
            cds_end: 350,
            exons: vec![Exon::new(100, 199), Exon::new(300, 400)],
            mrna_sequence: "A".repeat(201),
            ref_cds_start: 51,
        }
    }

    #[test]
    fn exon_accessors() {
        let tx = example_tx();
        assert_eq!(tx.exon_count(), 2);
        assert_eq!(tx.exon_len(0), 100);
        assert_eq!(tx.exon_len(1), 101);
        assert_eq!(tx.intron_len(1), 100);
        assert_eq!(tx.total_exon_len(), 201);
        assert!(tx.is_coding());
    }

    #[test]
    fn cds_len_spans_intron() {
        let tx = example_tx();
        // 150..=199 in the first exon plus 300..=350 in the second.
        assert_eq!(tx.cds_len(), 50 + 51);
    }

    #[test]
    fn wt_codon_windows() {
        let mut tx = example_tx();
        tx.mrna_sequence = String::from("ATGCCCGGGTTT");
        assert_eq!(tx.wt_codon(1, 0), Some("ATG"));
        assert_eq!(tx.wt_codon(5, 1), Some("CCC"));
        assert_eq!(tx.wt_codon_after(5, 1), Some("GGG"));
        assert_eq!(tx.wt_codon(12, 2), Some("TTT"));
        assert_eq!(tx.wt_codon(13, 0), None);
    }

    #[test]
    fn validate_accepts_consistent_model() {
        assert_eq!(example_tx().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unsorted_exons() {
        let mut tx = example_tx();
        tx.exons.reverse();
        assert_eq!(
            tx.validate(),
            Err(ReferenceError::ExonsNotSorted(String::from("TX_EX.1")))
        );
    }

    #[test]
    fn validate_rejects_mrna_length_mismatch() {
        let mut tx = example_tx();
        tx.mrna_sequence.push('A');
        assert!(matches!(
            tx.validate(),
            Err(ReferenceError::MrnaLengthMismatch(_, 202, 201))
        ));
    }

    #[test]
    fn change_shapes() {
        let ins = GenomeChange::new(1, 10, "-", "ACG");
        assert_eq!(ins.shape(), ChangeShape::Insertion);
        assert_eq!(ins.ref_len(), 0);
        assert_eq!(ins.end(), 9);

        let del = GenomeChange::new(1, 10, "ACG", "-");
        assert_eq!(del.shape(), ChangeShape::Deletion);
        assert_eq!(del.end(), 12);

        let snv = GenomeChange::new(1, 10, "A", "G");
        assert_eq!(snv.shape(), ChangeShape::Snv);
        assert_eq!(snv.end(), 10);

        let block = GenomeChange::new(1, 10, "ACG", "TT");
        assert_eq!(block.shape(), ChangeShape::BlockSubstitution);
    }
}
