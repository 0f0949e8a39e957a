//! Region predicates over transcript models.
//!
//! Pure classification of genomic positions and intervals relative to one
//! transcript: exon, CDS, UTRs, splice windows, and the near-gene
//! upstream/downstream regions.  All positions are 1-based inclusive and all
//! predicates are strand-aware.

use crate::annotate::AnnotatorConfig;
use crate::common::Strand;
use crate::reference::{GenomeChange, TranscriptModel};

/// Inclusive genomic window; empty windows are represented as `None` by the
/// producers below.
type Window = (i32, i32);

fn window_contains(w: Window, pos: i32) -> bool {
    pos >= w.0 && pos <= w.1
}

fn window_overlaps(w: Window, begin: i32, end: i32) -> bool {
    begin <= w.1 && w.0 <= end
}

/// Classifier for regions of one transcript.
pub struct RegionClassifier<'a> {
    tx: &'a TranscriptModel,
    config: &'a AnnotatorConfig,
}

impl<'a> RegionClassifier<'a> {
    pub fn new(tx: &'a TranscriptModel, config: &'a AnnotatorConfig) -> Self {
        Self { tx, config }
    }

    /// Splice donor window of exon `k`: the intronic bases immediately 3' of
    /// the exon on the transcript strand.
    pub fn donor_window(&self, k: usize) -> Option<Window> {
        let exon = &self.tx.exons[k];
        match self.tx.strand {
            Strand::Plus if k + 1 < self.tx.exon_count() => {
                Some((exon.end + 1, exon.end + self.config.splice_donor_len))
            }
            Strand::Minus if k > 0 => {
                Some((exon.start - self.config.splice_donor_len, exon.start - 1))
            }
            _ => None,
        }
    }

    /// Splice acceptor window of exon `k`: the intronic bases immediately 5'
    /// of the exon on the transcript strand.
    pub fn acceptor_window(&self, k: usize) -> Option<Window> {
        let exon = &self.tx.exons[k];
        match self.tx.strand {
            Strand::Plus if k > 0 => {
                Some((exon.start - self.config.splice_acceptor_len, exon.start - 1))
            }
            Strand::Minus if k + 1 < self.tx.exon_count() => {
                Some((exon.end + 1, exon.end + self.config.splice_acceptor_len))
            }
            _ => None,
        }
    }

    /// Splice region windows of exon `k`: the exonic bases at each
    /// intron-adjacent boundary plus the intronic bases beyond the
    /// donor/acceptor dinucleotide.
    pub fn splice_region_windows(&self, k: usize) -> Vec<Window> {
        let exon = &self.tx.exons[k];
        let n = self.tx.exon_count();
        let exonic = self.config.splice_region_exonic_len;
        let intronic = self.config.splice_region_intronic_len;
        // Widths of the dinucleotide windows genomically left/right of the
        // exon, which the splice region excludes.
        let (left_site, right_site) = match self.tx.strand {
            Strand::Plus => (self.config.splice_acceptor_len, self.config.splice_donor_len),
            Strand::Minus => (self.config.splice_donor_len, self.config.splice_acceptor_len),
        };

        let mut windows = Vec::with_capacity(4);
        if k > 0 {
            windows.push((exon.start, (exon.start + exonic - 1).min(exon.end)));
            if intronic > left_site {
                windows.push((exon.start - intronic, exon.start - 1 - left_site));
            }
        }
        if k + 1 < n {
            windows.push(((exon.end - exonic + 1).max(exon.start), exon.end));
            if intronic > right_site {
                windows.push((exon.end + 1 + right_site, exon.end + intronic));
            }
        }
        windows
    }

    pub fn lies_in_exon(&self, pos: i32) -> bool {
        self.tx.exons.iter().any(|e| e.contains(pos))
    }

    pub fn lies_in_cds(&self, pos: i32) -> bool {
        self.tx.is_coding()
            && pos >= self.tx.cds_start
            && pos <= self.tx.cds_end
            && self.lies_in_exon(pos)
    }

    pub fn lies_in_five_prime_utr(&self, pos: i32) -> bool {
        self.tx.is_coding()
            && self.lies_in_exon(pos)
            && match self.tx.strand {
                Strand::Plus => pos < self.tx.cds_start,
                Strand::Minus => pos > self.tx.cds_end,
            }
    }

    pub fn lies_in_three_prime_utr(&self, pos: i32) -> bool {
        self.tx.is_coding()
            && self.lies_in_exon(pos)
            && match self.tx.strand {
                Strand::Plus => pos > self.tx.cds_end,
                Strand::Minus => pos < self.tx.cds_start,
            }
    }

    pub fn lies_in_splice_donor(&self, pos: i32) -> bool {
        (0..self.tx.exon_count())
            .filter_map(|k| self.donor_window(k))
            .any(|w| window_contains(w, pos))
    }

    pub fn lies_in_splice_acceptor(&self, pos: i32) -> bool {
        (0..self.tx.exon_count())
            .filter_map(|k| self.acceptor_window(k))
            .any(|w| window_contains(w, pos))
    }

    pub fn lies_in_splice_region(&self, pos: i32) -> bool {
        (0..self.tx.exon_count())
            .flat_map(|k| self.splice_region_windows(k))
            .any(|w| window_contains(w, pos))
    }

    pub fn lies_in_upstream(&self, pos: i32) -> bool {
        let near = self.config.near_gene_distance;
        match self.tx.strand {
            Strand::Plus => pos < self.tx.tx_start && pos >= self.tx.tx_start - near,
            Strand::Minus => pos > self.tx.tx_end && pos <= self.tx.tx_end + near,
        }
    }

    pub fn lies_in_downstream(&self, pos: i32) -> bool {
        let near = self.config.near_gene_distance;
        match self.tx.strand {
            Strand::Plus => pos > self.tx.tx_end && pos <= self.tx.tx_end + near,
            Strand::Minus => pos < self.tx.tx_start && pos >= self.tx.tx_start - near,
        }
    }

    pub fn overlaps_with_exon(&self, begin: i32, end: i32) -> bool {
        self.tx
            .exons
            .iter()
            .any(|e| window_overlaps((e.start, e.end), begin, end))
    }

    pub fn overlaps_with_cds(&self, begin: i32, end: i32) -> bool {
        self.tx.is_coding()
            && self.tx.exons.iter().any(|e| {
                let lo = e.start.max(self.tx.cds_start);
                let hi = e.end.min(self.tx.cds_end);
                lo <= hi && window_overlaps((lo, hi), begin, end)
            })
    }

    pub fn overlaps_with_five_prime_utr(&self, begin: i32, end: i32) -> bool {
        self.utr_overlap(begin, end, true)
    }

    pub fn overlaps_with_three_prime_utr(&self, begin: i32, end: i32) -> bool {
        self.utr_overlap(begin, end, false)
    }

    fn utr_overlap(&self, begin: i32, end: i32, five_prime: bool) -> bool {
        if !self.tx.is_coding() {
            return false;
        }
        // The genomically-left UTR is 5' on the plus strand and 3' on the
        // minus strand.
        let left_of_cds = five_prime == (self.tx.strand == Strand::Plus);
        self.tx.exons.iter().any(|e| {
            let (lo, hi) = if left_of_cds {
                (e.start, e.end.min(self.tx.cds_start - 1))
            } else {
                (e.start.max(self.tx.cds_end + 1), e.end)
            };
            lo <= hi && window_overlaps((lo, hi), begin, end)
        })
    }

    pub fn overlaps_with_splice_donor(&self, begin: i32, end: i32) -> bool {
        (0..self.tx.exon_count())
            .filter_map(|k| self.donor_window(k))
            .any(|w| window_overlaps(w, begin, end))
    }

    pub fn overlaps_with_splice_acceptor(&self, begin: i32, end: i32) -> bool {
        (0..self.tx.exon_count())
            .filter_map(|k| self.acceptor_window(k))
            .any(|w| window_overlaps(w, begin, end))
    }

    pub fn overlaps_with_splice_region(&self, begin: i32, end: i32) -> bool {
        (0..self.tx.exon_count())
            .flat_map(|k| self.splice_region_windows(k))
            .any(|w| window_overlaps(w, begin, end))
    }

    pub fn overlaps_with_upstream(&self, begin: i32, end: i32) -> bool {
        let near = self.config.near_gene_distance;
        let w = match self.tx.strand {
            Strand::Plus => (self.tx.tx_start - near, self.tx.tx_start - 1),
            Strand::Minus => (self.tx.tx_end + 1, self.tx.tx_end + near),
        };
        window_overlaps(w, begin, end)
    }

    pub fn overlaps_with_downstream(&self, begin: i32, end: i32) -> bool {
        let near = self.config.near_gene_distance;
        let w = match self.tx.strand {
            Strand::Plus => (self.tx.tx_end + 1, self.tx.tx_end + near),
            Strand::Minus => (self.tx.tx_start - near, self.tx.tx_start - 1),
        };
        window_overlaps(w, begin, end)
    }

    /// Whether the change disrupts a splice window adjacent to exon `k`.
    ///
    /// Changes with a non-empty interval overlap a window if any base does;
    /// an insertion disrupts a window only if it is inserted inside of it,
    /// i.e. both flanking bases lie in the same window type.
    pub fn change_disrupts_splice_windows_of_exon(&self, change: &GenomeChange, k: usize) -> bool {
        let donor = self.donor_window(k);
        let acceptor = self.acceptor_window(k);
        let regions = self.splice_region_windows(k);

        if change.is_insertion() {
            let (l, r) = (change.position - 1, change.position);
            let both_in = |w: Option<Window>| {
                w.map(|w| window_contains(w, l) && window_contains(w, r))
                    .unwrap_or(false)
            };
            both_in(donor)
                || both_in(acceptor)
                || regions
                    .iter()
                    .any(|&w| window_contains(w, l) && window_contains(w, r))
        } else {
            let (begin, end) = (change.begin(), change.end());
            let hits = |w: Option<Window>| w.map(|w| window_overlaps(w, begin, end)).unwrap_or(false);
            hits(donor)
                || hits(acceptor)
                || regions.iter().any(|&w| window_overlaps(w, begin, end))
        }
    }
}
