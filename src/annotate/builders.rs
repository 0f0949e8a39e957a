//! Exonic annotation builders.
//!
//! Changes that fall into the coding sequence are delegated to an
//! [`ExonicAnnotationBuilder`], one method per change shape.  The builder
//! receives the normalized cDNA coordinates, the reading frame, and the
//! wild-type codons and produces the final annotation.
//! [`CodonEffectBuilder`] is the built-in implementation classifying effects
//! through codon translation.

use std::sync::Arc;

use crate::annotate::ann::{Annotation, Consequence};
use crate::common::translate_codon;
use crate::reference::TranscriptModel;

/// Builder interface for exonic CDS changes.
///
/// `rvarstart`/`rvarend` are 1-based positions within the spliced mRNA
/// sequence; `frame_start` is the reading frame offset (0..=2) of
/// `rvarstart`; `exon_number` is the 1-based exon number in transcription
/// order.  Alleles arrive on the transcript strand.
pub trait ExonicAnnotationBuilder {
    /// Single-nucleotide substitution.
    #[allow(clippy::too_many_arguments)]
    fn snv(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation;

    /// Insertion between `rvarstart` and the neighboring base.
    #[allow(clippy::too_many_arguments)]
    fn insertion(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        wt_codon_after: Option<&str>,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation;

    /// Deletion of a single base.
    #[allow(clippy::too_many_arguments)]
    fn deletion_single(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        wt_codon_after: Option<&str>,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation;

    /// Deletion of `rvarstart..=rvarend`.
    #[allow(clippy::too_many_arguments)]
    fn deletion_multi(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        wt_codon_after: Option<&str>,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        rvarend: i32,
        exon_number: usize,
    ) -> Annotation;

    /// Block substitution of `rvarstart..=rvarend`.
    #[allow(clippy::too_many_arguments)]
    fn block_substitution(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        rvarend: i32,
        exon_number: usize,
    ) -> Annotation;
}

/// Default exonic builder classifying effects through codon translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodonEffectBuilder;

/// 1-based CDS position of a 1-based mRNA position.
fn cds_pos(tx: &TranscriptModel, rvarstart: i32) -> i32 {
    rvarstart - tx.ref_cds_start + 1
}

fn allele_len(allele: &str) -> i32 {
    if allele == "-" {
        0
    } else {
        allele.len() as i32
    }
}

impl ExonicAnnotationBuilder for CodonEffectBuilder {
    fn snv(
        &self,
        tx: &Arc<TranscriptModel>,
        frame_start: i32,
        wt_codon: &str,
        reference: &str,
        alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation {
        let codon_base = wt_codon.as_bytes()[frame_start as usize] as char;
        if reference.len() != 1 || !reference.starts_with(codon_base) {
            let diagnostic = format!(
                "{}: transcript sequence has {} where the reference allele claims {} (mRNA pos. {})",
                tx.accession, codon_base, reference, rvarstart
            );
            return Annotation::new(Some(tx.clone()), diagnostic, Consequence::Error);
        }

        let mut var_codon = wt_codon.as_bytes().to_vec();
        var_codon[frame_start as usize] = alternative.as_bytes()[0];
        let var_codon = std::str::from_utf8(&var_codon).expect("codon bytes stay valid UTF-8");

        let wt_aa = translate_codon(wt_codon);
        let var_aa = translate_codon(var_codon);
        let consequence = if wt_aa == var_aa {
            Consequence::Synonymous
        } else if var_aa == '*' {
            Consequence::Stopgain
        } else if wt_aa == '*' {
            Consequence::Stoploss
        } else {
            Consequence::Missense
        };

        let hgvs = format!(
            "{}:exon{}:c.{}{}>{}",
            tx.accession,
            exon_number,
            cds_pos(tx, rvarstart),
            reference,
            alternative
        );
        Annotation::new(Some(tx.clone()), hgvs, consequence)
    }

    fn insertion(
        &self,
        tx: &Arc<TranscriptModel>,
        _frame_start: i32,
        _wt_codon: &str,
        _wt_codon_after: Option<&str>,
        _reference: &str,
        alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation {
        // `rvarstart` names the anchor base; the insertion point sits on its
        // transcription-3' side for plus-strand transcripts and on its
        // transcription-5' side otherwise.
        let pos = cds_pos(tx, rvarstart);
        let (left, right) = match tx.strand {
            crate::common::Strand::Plus => (pos - 1, pos),
            crate::common::Strand::Minus => (pos, pos + 1),
        };
        let consequence = if allele_len(alternative) % 3 == 0 {
            Consequence::NonFsInsertion
        } else {
            Consequence::FsInsertion
        };
        let hgvs = format!(
            "{}:exon{}:c.{}_{}ins{}",
            tx.accession, exon_number, left, right, alternative
        );
        Annotation::new(Some(tx.clone()), hgvs, consequence)
    }

    fn deletion_single(
        &self,
        tx: &Arc<TranscriptModel>,
        _frame_start: i32,
        _wt_codon: &str,
        _wt_codon_after: Option<&str>,
        _reference: &str,
        _alternative: &str,
        rvarstart: i32,
        exon_number: usize,
    ) -> Annotation {
        let hgvs = format!(
            "{}:exon{}:c.{}del",
            tx.accession,
            exon_number,
            cds_pos(tx, rvarstart)
        );
        Annotation::new(Some(tx.clone()), hgvs, Consequence::FsDeletion)
    }

    fn deletion_multi(
        &self,
        tx: &Arc<TranscriptModel>,
        _frame_start: i32,
        _wt_codon: &str,
        _wt_codon_after: Option<&str>,
        _reference: &str,
        _alternative: &str,
        rvarstart: i32,
        rvarend: i32,
        exon_number: usize,
    ) -> Annotation {
        let consequence = if (rvarend - rvarstart + 1) % 3 == 0 {
            Consequence::NonFsDeletion
        } else {
            Consequence::FsDeletion
        };
        let hgvs = format!(
            "{}:exon{}:c.{}_{}del",
            tx.accession,
            exon_number,
            cds_pos(tx, rvarstart),
            cds_pos(tx, rvarend)
        );
        Annotation::new(Some(tx.clone()), hgvs, consequence)
    }

    fn block_substitution(
        &self,
        tx: &Arc<TranscriptModel>,
        _frame_start: i32,
        _wt_codon: &str,
        _reference: &str,
        alternative: &str,
        rvarstart: i32,
        rvarend: i32,
        exon_number: usize,
    ) -> Annotation {
        let consequence = if (rvarend - rvarstart + 1 - allele_len(alternative)) % 3 == 0 {
            Consequence::NonFsSubstitution
        } else {
            Consequence::FsSubstitution
        };
        let hgvs = format!(
            "{}:exon{}:c.{}_{}delins{}",
            tx.accession,
            exon_number,
            cds_pos(tx, rvarstart),
            cds_pos(tx, rvarend),
            alternative
        );
        Annotation::new(Some(tx.clone()), hgvs, consequence)
    }
}
