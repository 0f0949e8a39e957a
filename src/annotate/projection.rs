//! Coordinate projection between genome and transcript space.
//!
//! Implementation note re: "no-zero correction": HGVS has no position 0,
//! counting runs -2, -1, 1, 2 across the CDS start.  The projector therefore
//! works on plain 0-based transcript offsets internally and converts to the
//! discontinuous c./n. numbering only at the [`CdnaPos`] boundary.

use crate::annotate::hgvs::{CdnaPos, CdsFrom};
use crate::common::Strand;
use crate::reference::TranscriptModel;

/// Error type for coordinate projection.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("position {0} lies outside of the transcript region")]
    OutsideTranscript(i32),
    #[error("position {0} lies in an intron")]
    NonExonicPosition(i32),
}

/// Result of locating a genomic position relative to a transcript's exons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExonLocation {
    /// Genomic-order index of the containing exon, or of the closer flanking
    /// exon for intronic positions.
    pub exon_index: usize,
    /// Whether the position lies in an intron.
    pub is_intronic: bool,
}

/// Fine-grained position of a genomic base relative to the exon structure.
enum Located {
    Exonic {
        exon_index: usize,
    },
    Intronic {
        /// Genomic-order index of the exon 5' (genomically left) of the
        /// intron.
        left_exon: usize,
        /// Distance to the last base of the left exon.
        dist_left: i32,
        /// Distance to the first base of the right exon.
        dist_right: i32,
    },
}

/// Bidirectional mapper between genomic positions and transcript/cDNA
/// positions of one transcript.
///
/// Precomputes the cumulative exon lengths once; all queries are O(exon
/// count) or better.
pub struct TranscriptProjector<'a> {
    tx: &'a TranscriptModel,
    /// `cum_exon[k]` is the number of exonic bases genomically left of exon
    /// `k`.
    cum_exon: Vec<i32>,
    total_exon_len: i32,
    /// 0-based transcript offset of the first coding base; `None` for
    /// non-coding transcripts.
    cds_begin_off: Option<i32>,
    /// 0-based transcript offset of the last coding base.
    cds_end_off: Option<i32>,
}

impl<'a> TranscriptProjector<'a> {
    pub fn new(tx: &'a TranscriptModel) -> Self {
        let mut cum_exon = Vec::with_capacity(tx.exon_count());
        let mut total = 0;
        for exon in &tx.exons {
            cum_exon.push(total);
            total += exon.len();
        }

        let (cds_begin_off, cds_end_off) = if tx.is_coding() {
            let begin = tx.ref_cds_start - 1;
            (Some(begin), Some(begin + tx.cds_len() - 1))
        } else {
            (None, None)
        };

        Self {
            tx,
            cum_exon,
            total_exon_len: total,
            cds_begin_off,
            cds_end_off,
        }
    }

    pub fn transcript(&self) -> &TranscriptModel {
        self.tx
    }

    fn locate(&self, g: i32) -> Result<Located, ProjectionError> {
        if g < self.tx.tx_start || g > self.tx.tx_end {
            return Err(ProjectionError::OutsideTranscript(g));
        }
        for (k, exon) in self.tx.exons.iter().enumerate() {
            if exon.contains(g) {
                return Ok(Located::Exonic { exon_index: k });
            }
            if g < exon.start {
                // Between exon k-1 and exon k; tx bounds guarantee k > 0.
                assert!(k > 0, "Bug: position before first exon must be outside");
                return Ok(Located::Intronic {
                    left_exon: k - 1,
                    dist_left: g - self.tx.exons[k - 1].end,
                    dist_right: exon.start - g,
                });
            }
        }
        Err(ProjectionError::OutsideTranscript(g))
    }

    /// Map a genomic base to its 0-based offset within the spliced
    /// transcript, counted in transcription order.
    pub fn genome_to_tx_offset(&self, g: i32) -> Result<i32, ProjectionError> {
        match self.locate(g)? {
            Located::Exonic { exon_index } => {
                let fwd = self.cum_exon[exon_index] + (g - self.tx.exons[exon_index].start);
                Ok(match self.tx.strand {
                    Strand::Plus => fwd,
                    Strand::Minus => self.total_exon_len - 1 - fwd,
                })
            }
            Located::Intronic { .. } => Err(ProjectionError::NonExonicPosition(g)),
        }
    }

    /// Map a 0-based transcript offset back to its genomic base.
    pub fn tx_offset_to_genome(&self, off: i32) -> Result<i32, ProjectionError> {
        if off < 0 || off >= self.total_exon_len {
            return Err(ProjectionError::OutsideTranscript(off));
        }
        let fwd = match self.tx.strand {
            Strand::Plus => off,
            Strand::Minus => self.total_exon_len - 1 - off,
        };
        let k = self.cum_exon.partition_point(|&cum| cum <= fwd) - 1;
        Ok(self.tx.exons[k].start + (fwd - self.cum_exon[k]))
    }

    /// Identify the exon containing `g`, or the closer flanking exon for
    /// intronic positions (ties resolve toward the transcription-upstream
    /// exon).
    pub fn locate_exon(&self, g: i32) -> Result<ExonLocation, ProjectionError> {
        match self.locate(g)? {
            Located::Exonic { exon_index } => Ok(ExonLocation {
                exon_index,
                is_intronic: false,
            }),
            Located::Intronic {
                left_exon,
                dist_left,
                dist_right,
            } => {
                let exon_index = match self.tx.strand {
                    Strand::Plus if dist_left <= dist_right => left_exon,
                    Strand::Plus => left_exon + 1,
                    Strand::Minus if dist_right <= dist_left => left_exon + 1,
                    Strand::Minus => left_exon,
                };
                Ok(ExonLocation {
                    exon_index,
                    is_intronic: true,
                })
            }
        }
    }

    /// Convert a 0-based transcript offset into the discontinuous c./n.
    /// numbering.
    pub fn tx_offset_to_cdna_pos(&self, off: i32) -> CdnaPos {
        match (self.cds_begin_off, self.cds_end_off) {
            (Some(begin), Some(end)) => {
                if off < begin {
                    CdnaPos::new(off - begin, None, CdsFrom::Start)
                } else if off <= end {
                    CdnaPos::new(off - begin + 1, None, CdsFrom::Start)
                } else {
                    CdnaPos::new(off - end, None, CdsFrom::End)
                }
            }
            _ => CdnaPos::new(off + 1, None, CdsFrom::Start),
        }
    }

    /// Convert a genomic base into a c./n. position; intronic positions
    /// carry a signed offset relative to the nearest exonic anchor.
    pub fn genome_to_cdna_pos(&self, g: i32) -> Result<CdnaPos, ProjectionError> {
        match self.locate(g)? {
            Located::Exonic { .. } => {
                let off = self
                    .genome_to_tx_offset(g)
                    .expect("Bug: exonic position must project onto the transcript");
                Ok(self.tx_offset_to_cdna_pos(off))
            }
            Located::Intronic {
                left_exon,
                dist_left,
                dist_right,
            } => {
                let (anchor, offset) = match self.tx.strand {
                    Strand::Plus if dist_left <= dist_right => {
                        (self.tx.exons[left_exon].end, dist_left)
                    }
                    Strand::Plus => (self.tx.exons[left_exon + 1].start, -dist_right),
                    Strand::Minus if dist_right <= dist_left => {
                        (self.tx.exons[left_exon + 1].start, dist_right)
                    }
                    Strand::Minus => (self.tx.exons[left_exon].end, -dist_left),
                };
                let off = self
                    .genome_to_tx_offset(anchor)
                    .expect("Bug: exonic anchor must project onto the transcript");
                Ok(self.tx_offset_to_cdna_pos(off).with_offset(offset))
            }
        }
    }
}
