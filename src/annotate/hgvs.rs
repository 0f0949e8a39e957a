//! Construction of HGVS-style location and DNA change strings.

use std::fmt;

use crate::annotate::projection::TranscriptProjector;
use crate::common::{revcomp, Strand};
use crate::reference::{ChangeShape, GenomeChange, TranscriptModel};

/// Whether a cDNA position counts from the CDS start or from the CDS end
/// (positions 3' of the stop codon, rendered with a `*` prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdsFrom {
    Start,
    End,
}

/// A cDNA position: base anchor in the discontinuous c./n. numbering plus an
/// optional signed intron offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdnaPos {
    /// Base position; negative values lie 5' of the CDS.
    pub base: i32,
    /// Signed offset for intronic positions, counted from the nearest exonic
    /// anchor.
    pub offset: Option<i32>,
    /// Whether the position counts from the CDS start or end.
    pub cds_from: CdsFrom,
}

impl CdnaPos {
    pub fn new(base: i32, offset: Option<i32>, cds_from: CdsFrom) -> Self {
        Self {
            base,
            offset,
            cds_from,
        }
    }

    /// The same anchor with a signed intron offset attached.
    pub fn with_offset(self, offset: i32) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }
}

impl fmt::Display for CdnaPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cds_from == CdsFrom::End {
            write!(f, "*")?;
        }
        write!(f, "{}", self.base)?;
        if let Some(offset) = self.offset {
            if offset > 0 {
                write!(f, "+")?;
            }
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

/// An allele written on the transcript strand; the `"-"` sentinel passes
/// through unchanged.
pub fn allele_on_strand(allele: &str, strand: Strand) -> String {
    if allele == "-" || strand == Strand::Plus {
        allele.to_string()
    } else {
        revcomp(allele)
    }
}

/// Transcription-order exon number (1-based) for a genomic-order exon index.
pub fn exon_number(tx: &TranscriptModel, exon_index: usize) -> usize {
    match tx.strand {
        Strand::Plus => exon_index + 1,
        Strand::Minus => tx.exon_count() - exon_index,
    }
}

fn cdna_str(projector: &TranscriptProjector<'_>, g: i32) -> String {
    let tx = projector.transcript();
    let first = tx.exons.first().expect("transcripts have at least one exon");
    let last = tx.exons.last().expect("transcripts have at least one exon");
    let clamped = g.clamp(first.start, last.end);
    let pos = projector
        .genome_to_cdna_pos(clamped)
        .expect("Bug: clamped position must lie within the transcript");
    format!("{}", pos)
}

/// Transcription-ordered genomic endpoints of a change; for insertions these
/// are the two flanking bases.
fn ordered_endpoints(tx: &TranscriptModel, change: &GenomeChange) -> (i32, i32) {
    let (begin, end) = if change.is_insertion() {
        (change.position - 1, change.position)
    } else {
        (change.begin(), change.end())
    };
    match tx.strand {
        Strand::Plus => (begin, end),
        Strand::Minus => (end, begin),
    }
}

/// Build the HGVS location string: `"<accession>:exon<K>"` when the change
/// is confined to a single exon, plain `"<accession>"` otherwise.
pub fn loc_anno(projector: &TranscriptProjector<'_>, change: &GenomeChange) -> String {
    let tx = projector.transcript();

    let (first, last) = if change.is_insertion() {
        (change.position - 1, change.position)
    } else {
        (change.begin(), change.end())
    };

    let located = (projector.locate_exon(first), projector.locate_exon(last));
    match located {
        (Ok(a), Ok(b)) if !a.is_intronic && !b.is_intronic && a.exon_index == b.exon_index => {
            format!("{}:exon{}", tx.accession, exon_number(tx, a.exon_index))
        }
        _ => tx.accession.clone(),
    }
}

/// Build the HGVS DNA change string with `c.`/`n.` prefix, transcript-strand
/// alleles, and the edit suffix appropriate for the change shape.
pub fn dna_anno(projector: &TranscriptProjector<'_>, change: &GenomeChange) -> String {
    let tx = projector.transcript();
    let prefix = if tx.is_coding() { 'c' } else { 'n' };
    let (g5, g3) = ordered_endpoints(tx, change);
    let reference = allele_on_strand(&change.reference, tx.strand);
    let alternative = allele_on_strand(&change.alternative, tx.strand);

    match change.shape() {
        ChangeShape::Insertion => format!(
            "{}.{}_{}ins{}",
            prefix,
            cdna_str(projector, g5),
            cdna_str(projector, g3),
            alternative
        ),
        ChangeShape::Snv => format!(
            "{}.{}{}>{}",
            prefix,
            cdna_str(projector, g5),
            reference,
            alternative
        ),
        ChangeShape::Deletion => {
            if change.begin() == change.end() {
                format!("{}.{}del", prefix, cdna_str(projector, g5))
            } else {
                format!(
                    "{}.{}_{}del",
                    prefix,
                    cdna_str(projector, g5),
                    cdna_str(projector, g3)
                )
            }
        }
        ChangeShape::BlockSubstitution => {
            if change.begin() == change.end() {
                format!(
                    "{}.{}delins{}",
                    prefix,
                    cdna_str(projector, g5),
                    alternative
                )
            } else {
                format!(
                    "{}.{}_{}delins{}",
                    prefix,
                    cdna_str(projector, g5),
                    cdna_str(projector, g3),
                    alternative
                )
            }
        }
    }
}

/// Full annotation text, location and DNA parts joined.
pub fn full_anno(projector: &TranscriptProjector<'_>, change: &GenomeChange) -> String {
    format!(
        "{}:{}",
        loc_anno(projector, change),
        dna_anno(projector, change)
    )
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::Strand;
    use crate::reference::Exon;

    fn plus_tx() -> TranscriptModel {
        TranscriptModel {
            accession: String::from("TX_PLUS.1"),
            chromosome: 1,
            strand: Strand::Plus,
            tx_start: 1_000,
            tx_end: 1_399,
            cds_start: 1_050,
            cds_end: 1_330,
            exons: vec![Exon::new(1_000, 1_099), Exon::new(1_300, 1_399)],
            mrna_sequence: "A".repeat(200),
            ref_cds_start: 51,
        }
    }

    fn minus_tx() -> TranscriptModel {
        TranscriptModel {
            accession: String::from("TX_MINUS.1"),
            chromosome: 1,
            strand: Strand::Minus,
            tx_start: 1_000,
            tx_end: 1_399,
            cds_start: 1_050,
            cds_end: 1_330,
            exons: vec![Exon::new(1_000, 1_099), Exon::new(1_300, 1_399)],
            mrna_sequence: "A".repeat(200),
            ref_cds_start: 70,
        }
    }

    #[test]
    fn cdna_pos_display() {
        assert_eq!(format!("{}", CdnaPos::new(123, None, CdsFrom::Start)), "123");
        assert_eq!(format!("{}", CdnaPos::new(-5, None, CdsFrom::Start)), "-5");
        assert_eq!(format!("{}", CdnaPos::new(10, None, CdsFrom::End)), "*10");
        assert_eq!(
            format!("{}", CdnaPos::new(123, Some(4), CdsFrom::Start)),
            "123+4"
        );
        assert_eq!(
            format!("{}", CdnaPos::new(10, Some(-2), CdsFrom::End)),
            "*10-2"
        );
    }

    #[test]
    fn loc_anno_single_exon() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_060, "A", "G");
        assert_eq!(loc_anno(&projector, &change), "TX_PLUS.1:exon1");
        let change = GenomeChange::new(1, 1_310, "AC", "-");
        assert_eq!(loc_anno(&projector, &change), "TX_PLUS.1:exon2");
    }

    #[test]
    fn loc_anno_falls_back_to_accession() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        // Spans the intron between both exons.
        let change = GenomeChange::new(1, 1_090, &"A".repeat(220), "-");
        assert_eq!(loc_anno(&projector, &change), "TX_PLUS.1");
        // Intronic SNV.
        let change = GenomeChange::new(1, 1_200, "A", "G");
        assert_eq!(loc_anno(&projector, &change), "TX_PLUS.1");
    }

    #[test]
    fn loc_anno_counts_exons_in_transcription_order() {
        let tx = minus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_350, "A", "G");
        assert_eq!(loc_anno(&projector, &change), "TX_MINUS.1:exon1");
        let change = GenomeChange::new(1, 1_060, "A", "G");
        assert_eq!(loc_anno(&projector, &change), "TX_MINUS.1:exon2");
    }

    #[test]
    fn dna_anno_snv() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_050, "A", "G");
        assert_eq!(dna_anno(&projector, &change), "c.1A>G");
    }

    #[test]
    fn dna_anno_snv_minus_strand_reverse_complements() {
        let tx = minus_tx();
        let projector = TranscriptProjector::new(&tx);
        // ref_cds_start = 70: c.1 is at genomic 1330 on the minus strand.
        let change = GenomeChange::new(1, 1_330, "C", "T");
        assert_eq!(dna_anno(&projector, &change), "c.1G>A");
    }

    #[test]
    fn dna_anno_deletion() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_052, "ACG", "-");
        assert_eq!(dna_anno(&projector, &change), "c.3_5del");
        let change = GenomeChange::new(1, 1_052, "A", "-");
        assert_eq!(dna_anno(&projector, &change), "c.3del");
    }

    #[test]
    fn dna_anno_insertion_renders_flanks_in_transcription_order() {
        let plus = plus_tx();
        let projector = TranscriptProjector::new(&plus);
        let change = GenomeChange::new(1, 1_052, "-", "TT");
        assert_eq!(dna_anno(&projector, &change), "c.2_3insTT");

        let minus = minus_tx();
        let projector = TranscriptProjector::new(&minus);
        // Between genomic 1329 and 1330, i.e. between c.1 and c.2 on the
        // minus strand.
        let change = GenomeChange::new(1, 1_330, "-", "TT");
        assert_eq!(dna_anno(&projector, &change), "c.1_2insAA");
    }

    #[test]
    fn dna_anno_block_substitution() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_052, "ACG", "TT");
        assert_eq!(dna_anno(&projector, &change), "c.3_5delinsTT");
    }

    #[test]
    fn dna_anno_uses_n_prefix_for_noncoding() {
        let mut tx = plus_tx();
        tx.cds_start = tx.tx_end;
        tx.cds_end = tx.tx_end;
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_000, "A", "G");
        assert_eq!(dna_anno(&projector, &change), "n.1A>G");
    }

    #[test]
    fn dna_anno_intronic_offsets() {
        let tx = plus_tx();
        let projector = TranscriptProjector::new(&tx);
        let change = GenomeChange::new(1, 1_101, "A", "G");
        assert_eq!(dna_anno(&projector, &change), "c.50+2A>G");
    }
}
