//! Genome-wide transcript lookup.
//!
//! The annotation engine consumes the [`TranscriptIndex`] interface to find
//! candidate transcripts for a variant.  [`TranscriptDatabase`] is the
//! built-in implementation backed by one interval tree per chromosome.

use std::collections::HashMap;
use std::sync::Arc;

use bio::data_structures::interval_tree::ArrayBackedIntervalTree;

use crate::reference::TranscriptModel;

/// Lookup interface for transcripts overlapping or flanking a genomic
/// interval.
///
/// All positions are 1-based inclusive.  Implementations must return
/// transcripts in a stable order; the annotation engine emits annotations in
/// the order candidates are returned.
pub trait TranscriptIndex {
    /// Whether any transcript is known for the chromosome.
    fn contains_chromosome(&self, chromosome: u8) -> bool;

    /// All transcripts overlapping `[start, end]`.
    fn search(&self, chromosome: u8, start: i32, end: i32) -> Vec<Arc<TranscriptModel>>;

    /// Large-interval bucket query used for structural variants; exhaustive
    /// with respect to overlap.
    fn search_large(&self, chromosome: u8, start: i32, end: i32) -> Vec<Arc<TranscriptModel>>;

    /// The transcript lying entirely 5' (genomically left) of `pos` that ends
    /// closest to it.
    fn left_neighbor(&self, chromosome: u8, pos: i32) -> Option<Arc<TranscriptModel>>;

    /// The transcript lying entirely 3' (genomically right) of `pos` that
    /// starts closest to it.
    fn right_neighbor(&self, chromosome: u8, pos: i32) -> Option<Arc<TranscriptModel>>;
}

/// Per-chromosome search structures.
struct ChromosomeIndex {
    /// Transcripts in insertion order; tree and neighbor arrays index into
    /// this.
    transcripts: Vec<Arc<TranscriptModel>>,
    /// Interval tree over `[tx_start - 1, tx_end)` half-open 0-based spans.
    tree: ArrayBackedIntervalTree<i32, usize>,
    /// `(tx_end, index)` sorted ascending, for left-neighbor queries.
    by_end: Vec<(i32, usize)>,
    /// `(tx_start, index)` sorted ascending, for right-neighbor queries.
    by_start: Vec<(i32, usize)>,
}

impl ChromosomeIndex {
    fn new(transcripts: Vec<Arc<TranscriptModel>>) -> Self {
        let mut tree = ArrayBackedIntervalTree::new();
        for (idx, tx) in transcripts.iter().enumerate() {
            tree.insert((tx.tx_start - 1)..tx.tx_end, idx);
        }
        tree.index();

        let mut by_end = transcripts
            .iter()
            .enumerate()
            .map(|(idx, tx)| (tx.tx_end, idx))
            .collect::<Vec<_>>();
        by_end.sort();
        let mut by_start = transcripts
            .iter()
            .enumerate()
            .map(|(idx, tx)| (tx.tx_start, idx))
            .collect::<Vec<_>>();
        by_start.sort();

        Self {
            transcripts,
            tree,
            by_end,
            by_start,
        }
    }
}

/// In-memory transcript database with interval-tree lookup.
pub struct TranscriptDatabase {
    chromosomes: HashMap<u8, ChromosomeIndex>,
}

impl TranscriptDatabase {
    /// Build the database from a set of transcript models.
    pub fn new(transcripts: Vec<TranscriptModel>) -> Self {
        let mut by_chrom: HashMap<u8, Vec<Arc<TranscriptModel>>> = HashMap::new();
        let count = transcripts.len();
        for tx in transcripts {
            by_chrom
                .entry(tx.chromosome)
                .or_default()
                .push(Arc::new(tx));
        }

        let chromosomes = by_chrom
            .into_iter()
            .map(|(chrom, txs)| (chrom, ChromosomeIndex::new(txs)))
            .collect::<HashMap<_, _>>();
        tracing::debug!(
            "indexed {} transcripts on {} chromosomes",
            count,
            chromosomes.len()
        );

        Self { chromosomes }
    }
}

impl TranscriptIndex for TranscriptDatabase {
    fn contains_chromosome(&self, chromosome: u8) -> bool {
        self.chromosomes.contains_key(&chromosome)
    }

    fn search(&self, chromosome: u8, start: i32, end: i32) -> Vec<Arc<TranscriptModel>> {
        let Some(chrom) = self.chromosomes.get(&chromosome) else {
            return Vec::new();
        };
        let query = (start - 1)..end.max(start);
        chrom
            .tree
            .find(query)
            .iter()
            .map(|entry| chrom.transcripts[*entry.data()].clone())
            .collect()
    }

    fn search_large(&self, chromosome: u8, start: i32, end: i32) -> Vec<Arc<TranscriptModel>> {
        let Some(chrom) = self.chromosomes.get(&chromosome) else {
            return Vec::new();
        };
        chrom
            .transcripts
            .iter()
            .filter(|tx| tx.tx_start <= end && tx.tx_end >= start)
            .cloned()
            .collect()
    }

    fn left_neighbor(&self, chromosome: u8, pos: i32) -> Option<Arc<TranscriptModel>> {
        let chrom = self.chromosomes.get(&chromosome)?;
        let idx = chrom.by_end.partition_point(|(end, _)| *end < pos);
        idx.checked_sub(1)
            .map(|i| chrom.transcripts[chrom.by_end[i].1].clone())
    }

    fn right_neighbor(&self, chromosome: u8, pos: i32) -> Option<Arc<TranscriptModel>> {
        let chrom = self.chromosomes.get(&chromosome)?;
        let idx = chrom.by_start.partition_point(|(start, _)| *start <= pos);
        chrom
            .by_start
            .get(idx)
            .map(|(_, i)| chrom.transcripts[*i].clone())
    }
}
