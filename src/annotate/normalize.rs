//! Left-shift normalization of ambiguous indels.
//!
//! Insertions and deletions inside a single exon are shifted as far 5' (in
//! the transcript's direction of transcription) as the spliced sequence
//! permits, so that equivalent representations collapse to one canonical
//! form.  All other change shapes pass through unchanged.

use crate::annotate::projection::TranscriptProjector;
use crate::common::{revcomp, Strand};
use crate::reference::{ChangeShape, GenomeChange};

/// Normalize `change` relative to the transcript of `projector`.
///
/// The operation is idempotent and preserves the alternate haplotype
/// sequence.
pub fn normalize_change(projector: &TranscriptProjector<'_>, change: &GenomeChange) -> GenomeChange {
    match change.shape() {
        ChangeShape::Insertion => {
            normalize_insertion(projector, change).unwrap_or_else(|| change.clone())
        }
        ChangeShape::Deletion => {
            normalize_deletion(projector, change).unwrap_or_else(|| change.clone())
        }
        ChangeShape::Snv | ChangeShape::BlockSubstitution => change.clone(),
    }
}

/// Transcript offsets of a single exon in transcription order, as an
/// inclusive `(lo, hi)` pair; `None` when the positions do not fall into one
/// common exon.
fn common_exon_bounds(
    projector: &TranscriptProjector<'_>,
    first: i32,
    last: i32,
) -> Option<(i32, i32)> {
    let a = projector.locate_exon(first).ok()?;
    let b = projector.locate_exon(last).ok()?;
    if a.is_intronic || b.is_intronic || a.exon_index != b.exon_index {
        return None;
    }
    let tx = projector.transcript();
    let exon = &tx.exons[a.exon_index];
    let lo = projector
        .genome_to_tx_offset(exon.start)
        .expect("Bug: exon bound must project onto the transcript");
    let hi = projector
        .genome_to_tx_offset(exon.end)
        .expect("Bug: exon bound must project onto the transcript");
    Some((lo.min(hi), lo.max(hi)))
}

fn normalize_insertion(
    projector: &TranscriptProjector<'_>,
    change: &GenomeChange,
) -> Option<GenomeChange> {
    let tx = projector.transcript();
    let (left, right) = (change.position - 1, change.position);
    let (exon_lo, _) = common_exon_bounds(projector, left, right)?;

    // Insertion point in transcript space: the insertion sits before offset
    // `p`, regardless of strand.
    let mut p = projector
        .genome_to_tx_offset(left)
        .ok()?
        .max(projector.genome_to_tx_offset(right).ok()?);

    let seq = tx.mrna_sequence.as_bytes();
    let mut allele = match tx.strand {
        Strand::Plus => change.alternative.clone().into_bytes(),
        Strand::Minus => revcomp(&change.alternative).into_bytes(),
    };

    let mut shifted = false;
    while p > exon_lo {
        let prev = *seq.get(p as usize - 1)?;
        if prev != *allele.last()? {
            break;
        }
        allele.rotate_right(1);
        p -= 1;
        shifted = true;
    }
    if !shifted {
        return None;
    }

    let anchor = projector
        .tx_offset_to_genome(p)
        .expect("Bug: shifted insertion point must stay on the transcript");
    let position = match tx.strand {
        Strand::Plus => anchor,
        Strand::Minus => anchor + 1,
    };
    let allele = String::from_utf8(allele).expect("allele bytes stay valid UTF-8");
    let alternative = match tx.strand {
        Strand::Plus => allele,
        Strand::Minus => revcomp(&allele),
    };
    Some(GenomeChange::new(
        change.chromosome,
        position,
        "-",
        &alternative,
    ))
}

fn normalize_deletion(
    projector: &TranscriptProjector<'_>,
    change: &GenomeChange,
) -> Option<GenomeChange> {
    let tx = projector.transcript();
    let (exon_lo, _) = common_exon_bounds(projector, change.begin(), change.end())?;

    let off_begin = projector.genome_to_tx_offset(change.begin()).ok()?;
    let off_end = projector.genome_to_tx_offset(change.end()).ok()?;
    let (mut a, mut b) = (off_begin.min(off_end), off_begin.max(off_end));

    let seq = tx.mrna_sequence.as_bytes();
    let mut shifted = false;
    while a > exon_lo {
        let prev = *seq.get(a as usize - 1)?;
        if prev != *seq.get(b as usize)? {
            break;
        }
        a -= 1;
        b -= 1;
        shifted = true;
    }
    if !shifted {
        return None;
    }

    let deleted = std::str::from_utf8(&seq[a as usize..=b as usize])
        .expect("mRNA sequence slices stay valid UTF-8");
    let (position, reference) = match tx.strand {
        Strand::Plus => (
            projector
                .tx_offset_to_genome(a)
                .expect("Bug: shifted deletion must stay on the transcript"),
            deleted.to_string(),
        ),
        Strand::Minus => (
            projector
                .tx_offset_to_genome(b)
                .expect("Bug: shifted deletion must stay on the transcript"),
            revcomp(deleted),
        ),
    };
    Some(GenomeChange::new(
        change.chromosome,
        position,
        &reference,
        "-",
    ))
}
