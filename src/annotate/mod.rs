//! Annotation of sequence variants against transcript models.

pub mod ann;
pub mod builders;
pub mod csq;
pub mod hgvs;
pub mod normalize;
pub mod projection;
pub mod region;

/// Top-level annotation errors.
///
/// Per-candidate problems (transcript database inconsistencies) never abort
/// annotation; they are surfaced as [`ann::Consequence::Error`] annotations
/// in the output list instead.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The chromosome of the variant is not covered by the transcript index.
    #[error("could not identify chromosome {0}")]
    ChromosomeUnknown(u8),
    /// Candidate transcripts existed but no annotation was produced; this
    /// indicates a bug in the dispatch logic.
    #[error("no annotations produced for {chromosome}:g.{position}{reference}>{alternative}")]
    AnnotationEmpty {
        chromosome: u8,
        position: i32,
        reference: String,
        alternative: String,
    },
}

/// Configuration for the annotation engine.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnnotatorConfig {
    /// Distance in bases within which a variant outside a transcript is
    /// called upstream/downstream rather than intergenic.
    pub near_gene_distance: i32,
    /// Number of intronic bases forming the splice donor site.
    pub splice_donor_len: i32,
    /// Number of intronic bases forming the splice acceptor site.
    pub splice_acceptor_len: i32,
    /// Number of exonic bases at an intron-adjacent exon boundary counted as
    /// splice region.
    pub splice_region_exonic_len: i32,
    /// Outer edge, in bases from the exon boundary, of the intronic splice
    /// region window.
    pub splice_region_intronic_len: i32,
    /// Allele length from which a variant is handled as structural.
    pub structural_variant_threshold: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            near_gene_distance: 1_000,
            splice_donor_len: 2,
            splice_acceptor_len: 2,
            splice_region_exonic_len: 3,
            splice_region_intronic_len: 8,
            structural_variant_threshold: 1_000,
        }
    }
}
