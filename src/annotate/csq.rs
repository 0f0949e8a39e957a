//! Compute annotations of sequence variants on transcript models.
//!
//! The [`Annotator`] is the per-variant dispatcher: it gathers candidate
//! transcripts from the interval index, normalizes the change per transcript,
//! walks the exon structure in transcription order, and routes the change to
//! the splicing, UTR, intronic, exonic, or structural annotation path.

use std::sync::Arc;

use crate::annotate::ann::{Annotation, Consequence};
use crate::annotate::builders::{CodonEffectBuilder, ExonicAnnotationBuilder};
use crate::annotate::hgvs::{allele_on_strand, full_anno};
use crate::annotate::normalize::normalize_change;
use crate::annotate::projection::TranscriptProjector;
use crate::annotate::region::RegionClassifier;
use crate::annotate::{AnnotatorConfig, Error};
use crate::common::{chromosome_name, revcomp, Strand};
use crate::index::TranscriptIndex;
use crate::reference::{ChangeShape, GenomeChange, TranscriptModel};

/// Placeholder accession for structural variants without a transcript.
const INTERGENIC_LABEL: &str = "INTERGENIC";

/// Transcription-order view of a transcript's exon structure.
///
/// All coordinates are "primed": 0-based offsets into the genomic span of
/// the transcript, counted in the direction of transcription.  This view
/// lets a single exon walker serve both strands.
struct StrandedView<'a> {
    tx: &'a TranscriptModel,
}

impl<'a> StrandedView<'a> {
    fn new(tx: &'a TranscriptModel) -> Self {
        Self { tx }
    }

    fn prime(&self, g: i32) -> i32 {
        match self.tx.strand {
            Strand::Plus => g - self.tx.tx_start,
            Strand::Minus => self.tx.tx_end - g,
        }
    }

    /// Genomic-order exon index for transcription-order index `j`.
    fn genomic_index(&self, j: usize) -> usize {
        match self.tx.strand {
            Strand::Plus => j,
            Strand::Minus => self.tx.exon_count() - 1 - j,
        }
    }

    /// Primed coordinate of the first base of exon `j`.
    fn exon_begin(&self, j: usize) -> i32 {
        let exon = &self.tx.exons[self.genomic_index(j)];
        match self.tx.strand {
            Strand::Plus => self.prime(exon.start),
            Strand::Minus => self.prime(exon.end),
        }
    }

    /// Primed coordinate of the last base of exon `j`.
    fn exon_end(&self, j: usize) -> i32 {
        let exon = &self.tx.exons[self.genomic_index(j)];
        match self.tx.strand {
            Strand::Plus => self.prime(exon.end),
            Strand::Minus => self.prime(exon.start),
        }
    }

    /// Length of the intron preceding exon `j` in transcription order;
    /// `j` must be at least 1.
    fn intron_len(&self, j: usize) -> i32 {
        self.exon_begin(j) - self.exon_end(j - 1) - 1
    }

    /// Primed coordinate of the first coding base.
    fn cds_begin(&self) -> i32 {
        match self.tx.strand {
            Strand::Plus => self.prime(self.tx.cds_start),
            Strand::Minus => self.prime(self.tx.cds_end),
        }
    }

    /// Primed coordinate of the last coding base.
    fn cds_end(&self) -> i32 {
        match self.tx.strand {
            Strand::Plus => self.prime(self.tx.cds_end),
            Strand::Minus => self.prime(self.tx.cds_start),
        }
    }
}

/// Annotation engine for sequence variants.
pub struct Annotator {
    index: Arc<dyn TranscriptIndex + Send + Sync>,
    exonic_builder: Arc<dyn ExonicAnnotationBuilder + Send + Sync>,
    config: AnnotatorConfig,
}

impl Annotator {
    pub fn new(index: Arc<dyn TranscriptIndex + Send + Sync>, config: AnnotatorConfig) -> Self {
        Self {
            index,
            exonic_builder: Arc::new(CodonEffectBuilder),
            config,
        }
    }

    /// Replace the builder used for exonic CDS changes.
    pub fn with_exonic_builder(
        mut self,
        builder: Arc<dyn ExonicAnnotationBuilder + Send + Sync>,
    ) -> Self {
        self.exonic_builder = builder;
        self
    }

    /// Annotate one variant, producing one annotation per overlapping
    /// transcript (or the appropriate upstream/downstream/intergenic or
    /// structural annotations when none overlaps).
    pub fn annotate(
        &self,
        chromosome: u8,
        position: i32,
        reference: &str,
        alternative: &str,
    ) -> Result<Vec<Annotation>, Error> {
        if !self.index.contains_chromosome(chromosome) {
            return Err(Error::ChromosomeUnknown(chromosome));
        }
        let change = GenomeChange::new(chromosome, position, reference, alternative);

        // Insertions have an empty interval; for searching we cover the
        // anchor base.
        let start = change.begin();
        let end = change.end().max(start);

        let is_structural = change.ref_len() >= self.config.structural_variant_threshold
            || change.alt_len() >= self.config.structural_variant_threshold;

        let mut candidates = self.index.search(chromosome, start, end);
        if is_structural {
            for tx in self.index.search_large(chromosome, start, end) {
                if !candidates.iter().any(|c| c.accession == tx.accession) {
                    candidates.push(tx);
                }
            }
        }

        if candidates.is_empty() {
            let mut annotations = Vec::new();
            if is_structural {
                annotations.push(self.structural_annotation(&change, None));
            } else {
                self.intergenic_annotations(&change, start, end, &mut annotations);
            }
            return Ok(annotations);
        }

        let mut annotations = Vec::with_capacity(candidates.len());
        for tx in &candidates {
            if is_structural {
                annotations.push(self.structural_annotation(&change, Some(tx)));
            } else if let Some(ann) = self.annotate_transcript(&change, tx) {
                annotations.push(ann);
            }
        }

        if annotations.is_empty() {
            return Err(Error::AnnotationEmpty {
                chromosome,
                position,
                reference: reference.to_string(),
                alternative: alternative.to_string(),
            });
        }
        Ok(annotations)
    }

    /// Structural variant annotation for one transcript (or none).
    fn structural_annotation(
        &self,
        change: &GenomeChange,
        tx: Option<&Arc<TranscriptModel>>,
    ) -> Annotation {
        let position = change.position;
        let ref_len = change.ref_len() as i32;
        let label = match tx {
            Some(tx) => chromosome_name(tx.chromosome),
            None => INTERGENIC_LABEL.to_string(),
        };

        if change.ref_len() == change.alt_len() && change.alternative == revcomp(&change.reference)
        {
            return match tx {
                Some(tx) => Annotation::new(
                    Some(tx.clone()),
                    format!("{}:g.{}_{}inv", tx.accession, position, position + ref_len),
                    Consequence::SvInversion,
                ),
                None => Annotation::new(
                    None,
                    format!(
                        "no transcript for inversion g.{}_{}inv",
                        position,
                        position + ref_len
                    ),
                    Consequence::Error,
                ),
            };
        }

        let (text, consequence) = if change.ref_len() <= 1 {
            (
                format!(
                    "{}:g.{}_{}ins{}",
                    label,
                    position,
                    position + 1,
                    abbreviated_allele(&change.alternative)
                ),
                Consequence::SvInsertion,
            )
        } else if change.alt_len() <= 1 {
            (
                format!("{}:g.{}_{}del", label, position, position + ref_len),
                Consequence::SvDeletion,
            )
        } else {
            (
                format!(
                    "{}:g.{}_{}delins{}",
                    label,
                    position,
                    position + ref_len,
                    abbreviated_allele(&change.alternative)
                ),
                Consequence::SvSubstitution,
            )
        };

        match tx {
            Some(tx) => Annotation::new(Some(tx.clone()), text, consequence),
            None => Annotation::new(None, text, Consequence::Intergenic),
        }
    }

    /// Upstream/downstream/intergenic annotations for variants without an
    /// overlapping transcript.
    fn intergenic_annotations(
        &self,
        change: &GenomeChange,
        start: i32,
        end: i32,
        out: &mut Vec<Annotation>,
    ) {
        let left = self.index.left_neighbor(change.chromosome, start);
        let right = self.index.right_neighbor(change.chromosome, end);

        if let Some(tx) = &left {
            let dist = start - tx.tx_end;
            if dist <= self.config.near_gene_distance {
                // The variant lies on the genomic right of this neighbor.
                let consequence = match tx.strand {
                    Strand::Plus => Consequence::Downstream,
                    Strand::Minus => Consequence::Upstream,
                };
                out.push(Annotation::new(
                    Some(tx.clone()),
                    format!("{}(dist={})", tx.accession, dist),
                    consequence,
                ));
            }
        }
        if let Some(tx) = &right {
            let dist = tx.tx_start - end;
            if dist <= self.config.near_gene_distance {
                let consequence = match tx.strand {
                    Strand::Plus => Consequence::Upstream,
                    Strand::Minus => Consequence::Downstream,
                };
                out.push(Annotation::new(
                    Some(tx.clone()),
                    format!("{}(dist={})", tx.accession, dist),
                    consequence,
                ));
            }
        }

        if out.is_empty() {
            let side = |tx: &Option<Arc<TranscriptModel>>, dist: i32| match tx {
                Some(tx) => format!("{}(dist={})", tx.accession, dist),
                None => String::from("NONE"),
            };
            let text = format!(
                "{},{}",
                side(&left, left.as_ref().map(|tx| start - tx.tx_end).unwrap_or(0)),
                side(
                    &right,
                    right.as_ref().map(|tx| tx.tx_start - end).unwrap_or(0)
                ),
            );
            out.push(Annotation::new(None, text, Consequence::Intergenic));
        }
    }

    /// Annotate the change against one transcript.
    fn annotate_transcript(
        &self,
        change: &GenomeChange,
        tx: &Arc<TranscriptModel>,
    ) -> Option<Annotation> {
        let projector = TranscriptProjector::new(tx);
        let classifier = RegionClassifier::new(tx, &self.config);
        let change = normalize_change(&projector, change);
        self.walk_exons(&change, tx, &projector, &classifier)
    }

    /// Walk the exons in transcription order and classify the change.
    fn walk_exons(
        &self,
        change: &GenomeChange,
        tx: &Arc<TranscriptModel>,
        projector: &TranscriptProjector<'_>,
        classifier: &RegionClassifier<'_>,
    ) -> Option<Annotation> {
        let view = StrandedView::new(tx);
        let exon_count = tx.exon_count();

        // Primed change interval; insertions count as their anchor base.
        let gstart = change.begin();
        let gend = change.end().max(gstart);
        let (vstart, vend) = match tx.strand {
            Strand::Plus => (view.prime(gstart), view.prime(gend)),
            Strand::Minus => (view.prime(gend), view.prime(gstart)),
        };

        let mut cumlenintron = 0;
        for j in 0..exon_count {
            if j > 0 {
                cumlenintron += view.intron_len(j);
            }
            let exon_begin = view.exon_begin(j);
            let exon_end = view.exon_end(j);

            // Splice disruption dominates every other classification.
            if classifier.change_disrupts_splice_windows_of_exon(change, view.genomic_index(j)) {
                let consequence = if tx.is_coding() {
                    Consequence::Splicing
                } else {
                    Consequence::NcrnaSplicing
                };
                return Some(Annotation::new(
                    Some(tx.clone()),
                    full_anno(projector, change),
                    consequence,
                ));
            }

            if vstart < exon_begin {
                if vend >= exon_begin {
                    // Starts 5' of exon j and reaches into it.
                    let rvarstart = exon_begin - cumlenintron + 1;
                    let rvarend = self
                        .search_rvarend(&view, j, cumlenintron, vend)
                        .unwrap_or_else(|| tx.total_exon_len());
                    return Some(self.classify_exonic(
                        change, tx, projector, &view, vstart, vend, rvarstart, rvarend, j,
                    ));
                } else if j > 0 && vstart > view.exon_end(j - 1) {
                    // Strictly inside the intron preceding exon j.
                    let consequence = if tx.is_coding() {
                        Consequence::Intronic
                    } else {
                        Consequence::NcrnaIntronic
                    };
                    return Some(Annotation::new(
                        Some(tx.clone()),
                        full_anno(projector, change),
                        consequence,
                    ));
                }
            } else if vstart <= exon_end {
                // Starts within exon j.
                let rvarstart = vstart - cumlenintron + 1;
                let rvarend = self
                    .search_rvarend(&view, j, cumlenintron, vend)
                    .unwrap_or_else(|| tx.total_exon_len());
                return Some(self.classify_exonic(
                    change, tx, projector, &view, vstart, vend, rvarstart, rvarend, j,
                ));
            }
        }
        None
    }

    /// Find the 1-based mRNA position of the change's last base, scanning
    /// forward from exon `j`; `None` when the change runs past the last
    /// exon.
    fn search_rvarend(
        &self,
        view: &StrandedView<'_>,
        j: usize,
        cumlenintron: i32,
        vend: i32,
    ) -> Option<i32> {
        let mut cum = cumlenintron;
        for m in j..view.tx.exon_count() {
            if m > j {
                cum += view.intron_len(m);
            }
            if vend < view.exon_begin(m) {
                // Ends in the intron preceding exon m; clamp to the last
                // base of the previous exon.
                return Some(view.exon_end(m - 1) - (cum - view.intron_len(m)) + 1);
            } else if vend <= view.exon_end(m) {
                return Some(vend - cum + 1);
            }
        }
        None
    }

    /// Classify a change whose start lies in (or whose span reaches) exon
    /// `j` as non-coding exonic, UTR, or CDS-exonic.
    #[allow(clippy::too_many_arguments)]
    fn classify_exonic(
        &self,
        change: &GenomeChange,
        tx: &Arc<TranscriptModel>,
        projector: &TranscriptProjector<'_>,
        view: &StrandedView<'_>,
        vstart: i32,
        vend: i32,
        rvarstart: i32,
        rvarend: i32,
        j: usize,
    ) -> Annotation {
        if !tx.is_coding() {
            return Annotation::new(
                Some(tx.clone()),
                full_anno(projector, change),
                Consequence::NcrnaExonic,
            );
        }
        if vend < view.cds_begin() {
            return Annotation::new(
                Some(tx.clone()),
                full_anno(projector, change),
                Consequence::Utr5,
            );
        }
        if vstart > view.cds_end() {
            return Annotation::new(
                Some(tx.clone()),
                full_anno(projector, change),
                Consequence::Utr3,
            );
        }
        self.exonic_cds_annotation(change, tx, rvarstart, rvarend, j)
    }

    /// Delegate a CDS-exonic change to the exonic builders, recovering
    /// transcript database inconsistencies as `ERROR` annotations.
    fn exonic_cds_annotation(
        &self,
        change: &GenomeChange,
        tx: &Arc<TranscriptModel>,
        rvarstart: i32,
        rvarend: i32,
        j: usize,
    ) -> Annotation {
        let exon_number = j + 1;

        // Only block substitutions can begin before the transcript itself.
        if change.begin() < tx.tx_start {
            let from = change.begin() - tx.tx_start;
            let to = change.ref_len() as i32 + from;
            let hgvs = if change.is_deletion() {
                format!("{}:exon{}:c.{}_{}del", tx.accession, exon_number, from, to)
            } else {
                format!(
                    "{}:exon{}:c.{}_{}delins{}",
                    tx.accession, exon_number, from, to, change.alternative
                )
            };
            let consequence = if change.ref_len() == change.alt_len() {
                Consequence::NonFsSubstitution
            } else {
                Consequence::FsSubstitution
            };
            return Annotation::new(Some(tx.clone()), hgvs, consequence);
        }

        let frame_start = (rvarstart - tx.ref_cds_start).rem_euclid(3);

        if rvarstart - frame_start - 1 > tx.mrna_len() as i32 {
            let diagnostic = format!(
                "{}: mRNA position {} (frame {}) lies beyond the declared sequence length {}",
                tx.accession,
                rvarstart,
                frame_start,
                tx.mrna_len()
            );
            tracing::warn!("{}", diagnostic);
            return Annotation::new(Some(tx.clone()), diagnostic, Consequence::Error);
        }

        let Some(wt_codon) = tx.wt_codon(rvarstart, frame_start) else {
            let diagnostic = format!(
                "{}: discrepancy between the declared mRNA length {} and the genome annotation \
                 (variant at mRNA pos. {})",
                tx.accession,
                tx.mrna_len(),
                rvarstart
            );
            tracing::warn!("{}", diagnostic);
            return Annotation::new(Some(tx.clone()), diagnostic, Consequence::Error);
        };
        let wt_codon_after = tx.wt_codon_after(rvarstart, frame_start);

        let reference = allele_on_strand(&change.reference, tx.strand);
        let alternative = allele_on_strand(&change.alternative, tx.strand);

        match change.shape() {
            ChangeShape::Insertion => self.exonic_builder.insertion(
                tx,
                frame_start,
                wt_codon,
                wt_codon_after,
                &reference,
                &alternative,
                rvarstart,
                exon_number,
            ),
            ChangeShape::Snv => self.exonic_builder.snv(
                tx,
                frame_start,
                wt_codon,
                &reference,
                &alternative,
                rvarstart,
                exon_number,
            ),
            ChangeShape::Deletion if change.ref_len() == 1 => self.exonic_builder.deletion_single(
                tx,
                frame_start,
                wt_codon,
                wt_codon_after,
                &reference,
                &alternative,
                rvarstart,
                exon_number,
            ),
            ChangeShape::Deletion => self.exonic_builder.deletion_multi(
                tx,
                frame_start,
                wt_codon,
                wt_codon_after,
                &reference,
                &alternative,
                rvarstart,
                rvarend,
                exon_number,
            ),
            ChangeShape::BlockSubstitution => self.exonic_builder.block_substitution(
                tx,
                frame_start,
                wt_codon,
                &reference,
                &alternative,
                rvarstart,
                rvarend,
                exon_number,
            ),
        }
    }
}

/// Abbreviate a long allele to its first and last two bases.
fn abbreviated_allele(alt: &str) -> String {
    if alt.len() >= 2 {
        format!("{}..{}", &alt[..2], &alt[alt.len() - 2..])
    } else {
        alt.to_string()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::index::TranscriptDatabase;
    use crate::reference::Exon;

    /// Plus-strand coding transcript with a real spliced sequence.
    ///
    /// Exons 1000..=1014 and 1100..=1114; the CDS 1006..=1108 codes for
    /// `ATG AAA CCC GGG TTT TAA` with six bases of UTR on either side.
    fn plus_tx() -> TranscriptModel {
        TranscriptModel {
            accession: String::from("TX_ONE.1"),
            chromosome: 1,
            strand: Strand::Plus,
            tx_start: 1_000,
            tx_end: 1_114,
            cds_start: 1_006,
            cds_end: 1_108,
            exons: vec![Exon::new(1_000, 1_014), Exon::new(1_100, 1_114)],
            mrna_sequence: String::from("GGGGGGATGAAACCCGGGTTTTAACCCCCC"),
            ref_cds_start: 7,
        }
    }

    /// The minus-strand transcript used for the coordinate seed mappings.
    fn minus_tx() -> TranscriptModel {
        let mut mrna = "A".repeat(7_540);
        // Frame-0 codons GTA at c.7339 (mRNA offset 7438) and at c.1000
        // (offset 1099).
        mrna.replace_range(7_438..7_441, "GTA");
        mrna.replace_range(1_099..1_102, "GTA");
        TranscriptModel {
            accession: String::from("TX_MINUS.1"),
            chromosome: 1,
            strand: Strand::Minus,
            tx_start: 203_086,
            tx_end: 437_066,
            cds_start: 217_680,
            cds_end: 436_966,
            exons: vec![
                Exon::new(203_086, 203_186),
                Exon::new(217_680, 217_680),
                Exon::new(220_000, 227_237),
                Exon::new(436_867, 437_066),
            ],
            mrna_sequence: mrna,
            ref_cds_start: 101,
        }
    }

    fn annotator() -> Annotator {
        let db = TranscriptDatabase::new(vec![plus_tx(), minus_tx()]);
        Annotator::new(Arc::new(db), AnnotatorConfig::default())
    }

    fn single(annotations: Vec<Annotation>) -> Annotation {
        assert_eq!(annotations.len(), 1, "expected exactly one annotation");
        annotations.into_iter().next().unwrap()
    }

    #[test]
    fn unknown_chromosome_is_an_error() {
        let annotator = annotator();
        assert_eq!(
            annotator.annotate(9, 1_000, "A", "G"),
            Err(Error::ChromosomeUnknown(9))
        );
    }

    #[test]
    fn snv_missense() -> Result<(), anyhow::Error> {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 1_007, "T", "C")?);
        assert_eq!(ann.consequence, Consequence::Missense);
        assert_eq!(ann.hgvs, "TX_ONE.1:exon1:c.2T>C");
        Ok(())
    }

    #[test]
    fn snv_stopgain() {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 1_009, "A", "T").unwrap());
        assert_eq!(ann.consequence, Consequence::Stopgain);
        assert_eq!(ann.hgvs, "TX_ONE.1:exon1:c.4A>T");
    }

    #[test]
    fn snv_synonymous() {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 1_011, "A", "G").unwrap());
        assert_eq!(ann.consequence, Consequence::Synonymous);
        assert_eq!(ann.hgvs, "TX_ONE.1:exon1:c.6A>G");
    }

    #[test]
    fn utr_classification() {
        let annotator = annotator();
        let utr5 = single(annotator.annotate(1, 1_002, "G", "A").unwrap());
        assert_eq!(utr5.consequence, Consequence::Utr5);
        assert_eq!(utr5.hgvs, "TX_ONE.1:exon1:c.-4G>A");

        let utr3 = single(annotator.annotate(1, 1_110, "C", "T").unwrap());
        assert_eq!(utr3.consequence, Consequence::Utr3);
        assert_eq!(utr3.hgvs, "TX_ONE.1:exon2:c.*2C>T");
    }

    #[test]
    fn intronic_snv() {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 1_050, "A", "G").unwrap());
        assert_eq!(ann.consequence, Consequence::Intronic);
        assert_eq!(ann.hgvs, "TX_ONE.1:c.9+36A>G");
    }

    #[test]
    fn splice_donor_straddle_beats_intronic() {
        let annotator = annotator();
        // Deletion 1014..=1016 reaches across the donor dinucleotide.
        let ann = single(annotator.annotate(1, 1_014, "CGT", "-").unwrap());
        assert_eq!(ann.consequence, Consequence::Splicing);
        assert_eq!(ann.hgvs, "TX_ONE.1:c.9_9+2del");
    }

    #[test]
    fn exonic_insertion_left_normalizes_on_transcript_strand() {
        let annotator = annotator();
        // Inserted A after the AAA run is equivalent to an insertion before
        // it; the annotation shows the left-aligned form.
        let ann = single(annotator.annotate(1, 1_012, "-", "A").unwrap());
        assert_eq!(ann.consequence, Consequence::FsInsertion);
        assert_eq!(ann.hgvs, "TX_ONE.1:exon1:c.3_4insA");
    }

    #[test]
    fn exonic_deletion_classification() {
        let annotator = annotator();
        let non_fs = single(annotator.annotate(1, 1_009, "AAA", "-").unwrap());
        assert_eq!(non_fs.consequence, Consequence::NonFsDeletion);
        let fs = single(annotator.annotate(1, 1_104, "TT", "-").unwrap());
        assert_eq!(fs.consequence, Consequence::FsDeletion);
        // The deletion left-aligned within the T run before annotation.
        assert_eq!(fs.hgvs, "TX_ONE.1:exon2:c.13_14del");
    }

    #[test]
    fn minus_strand_exonic_snv() -> Result<(), anyhow::Error> {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 226_338, "C", "T")?);
        assert_eq!(ann.consequence, Consequence::Missense);
        assert_eq!(ann.hgvs, "TX_MINUS.1:exon2:c.1000G>A");
        Ok(())
    }

    #[test]
    fn minus_strand_splice_positions() {
        let annotator = annotator();
        // One base into the intron 3' (in transcription order) of the
        // single-base exon.
        let donor = single(annotator.annotate(1, 217_679, "C", "T").unwrap());
        assert_eq!(donor.consequence, Consequence::Splicing);
        assert_eq!(donor.hgvs, "TX_MINUS.1:c.7339+1G>A");

        let acceptor = single(annotator.annotate(1, 217_681, "C", "T").unwrap());
        assert_eq!(acceptor.consequence, Consequence::Splicing);
        assert_eq!(acceptor.hgvs, "TX_MINUS.1:c.7339-1G>A");
    }

    #[test]
    fn minus_strand_utr_positions() {
        let annotator = annotator();
        let utr5 = single(annotator.annotate(1, 436_967, "C", "T").unwrap());
        assert_eq!(utr5.consequence, Consequence::Utr5);
        assert_eq!(utr5.hgvs, "TX_MINUS.1:exon1:c.-1G>A");

        let utr3 = single(annotator.annotate(1, 203_180, "T", "C").unwrap());
        assert_eq!(utr3.consequence, Consequence::Utr3);
        assert_eq!(utr3.hgvs, "TX_MINUS.1:exon4:c.*7A>G");
    }

    #[test]
    fn upstream_and_downstream_neighbors() {
        let annotator = annotator();
        let upstream = single(annotator.annotate(1, 980, "A", "G").unwrap());
        assert_eq!(upstream.consequence, Consequence::Upstream);
        assert_eq!(upstream.hgvs, "TX_ONE.1(dist=20)");

        let downstream = single(annotator.annotate(1, 1_120, "A", "G").unwrap());
        assert_eq!(downstream.consequence, Consequence::Downstream);
        assert_eq!(downstream.hgvs, "TX_ONE.1(dist=6)");
    }

    #[test]
    fn intergenic_between_far_neighbors() {
        let annotator = annotator();
        let ann = single(annotator.annotate(1, 100_000, "A", "G").unwrap());
        assert_eq!(ann.consequence, Consequence::Intergenic);
        assert_eq!(ann.transcript, None);
        assert_eq!(ann.hgvs, "TX_ONE.1(dist=98886),TX_MINUS.1(dist=103086)");
    }

    #[test]
    fn structural_deletion_without_transcript() {
        let annotator = annotator();
        let reference = "A".repeat(1_500);
        let ann = single(annotator.annotate(1, 500_000, &reference, "-").unwrap());
        assert_eq!(ann.consequence, Consequence::Intergenic);
        assert_eq!(ann.hgvs, "INTERGENIC:g.500000_501500del");
    }

    #[test]
    fn structural_deletion_on_transcript() {
        let annotator = annotator();
        let reference = "A".repeat(1_500);
        let anns = annotator.annotate(1, 1_000, &reference, "-").unwrap();
        let ann = anns
            .iter()
            .find(|ann| {
                ann.transcript.as_ref().map(|tx| tx.accession.as_str()) == Some("TX_ONE.1")
            })
            .unwrap();
        assert_eq!(ann.consequence, Consequence::SvDeletion);
        assert_eq!(ann.hgvs, "1:g.1000_2500del");
    }

    #[test]
    fn structural_insertion_abbreviates_allele() {
        let annotator = annotator();
        let alternative = format!("AC{}GT", "N".repeat(1_000));
        let ann = single(annotator.annotate(1, 50_000, "A", &alternative).unwrap());
        assert_eq!(ann.consequence, Consequence::Intergenic);
        assert_eq!(ann.hgvs, "INTERGENIC:g.50000_50001insAC..GT");
    }

    #[test]
    fn structural_inversion_on_transcript() {
        let annotator = annotator();
        let reference = "A".repeat(1_000);
        let alternative = revcomp(&reference);
        let anns = annotator.annotate(1, 1_000, &reference, &alternative).unwrap();
        let ann = anns
            .iter()
            .find(|ann| {
                ann.transcript.as_ref().map(|tx| tx.accession.as_str()) == Some("TX_ONE.1")
            })
            .unwrap();
        assert_eq!(ann.consequence, Consequence::SvInversion);
        assert_eq!(ann.hgvs, "TX_ONE.1:g.1000_2000inv");
    }

    #[test]
    fn structural_annotations_only_carry_sv_or_near_gene_tags() {
        let annotator = annotator();
        let reference = "A".repeat(1_200);
        for position in [1_000, 200_000, 500_000] {
            for annotation in annotator.annotate(1, position, &reference, "-").unwrap() {
                assert!(matches!(
                    annotation.consequence,
                    Consequence::SvInversion
                        | Consequence::SvInsertion
                        | Consequence::SvDeletion
                        | Consequence::SvSubstitution
                        | Consequence::Upstream
                        | Consequence::Downstream
                        | Consequence::Intergenic
                ));
            }
        }
    }

    #[test]
    fn noncoding_transcript_tags() {
        let mut tx = plus_tx();
        tx.accession = String::from("TX_NC.1");
        tx.cds_start = tx.tx_end;
        tx.cds_end = tx.tx_end;
        let db = TranscriptDatabase::new(vec![tx]);
        let annotator = Annotator::new(Arc::new(db), AnnotatorConfig::default());

        let exonic = single(annotator.annotate(1, 1_007, "T", "C").unwrap());
        assert_eq!(exonic.consequence, Consequence::NcrnaExonic);
        assert_eq!(exonic.hgvs, "TX_NC.1:exon1:n.8T>C");

        let intronic = single(annotator.annotate(1, 1_050, "A", "G").unwrap());
        assert_eq!(intronic.consequence, Consequence::NcrnaIntronic);

        let splicing = single(annotator.annotate(1, 1_015, "C", "T").unwrap());
        assert_eq!(splicing.consequence, Consequence::NcrnaSplicing);
    }

    #[test]
    fn database_inconsistency_recovered_as_error_annotation() {
        let mut tx = plus_tx();
        // Truncate the declared sequence so the codon lookup fails.
        tx.mrna_sequence.truncate(8);
        let db = TranscriptDatabase::new(vec![tx]);
        let annotator = Annotator::new(Arc::new(db), AnnotatorConfig::default());

        let ann = single(annotator.annotate(1, 1_009, "A", "T").unwrap());
        assert_eq!(ann.consequence, Consequence::Error);
        assert!(ann.hgvs.contains("TX_ONE.1"));
    }
}
