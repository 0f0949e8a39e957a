//! Annotation records and consequence types.

use std::sync::Arc;

use parse_display::{Display, FromStr};

use crate::reference::TranscriptModel;

/// Molecular consequence of a variant on one transcript.
///
/// The variants are grouped by the annotation path that produces them:
/// protein-level effects come from the exonic builders, the remaining tags
/// from the dispatcher itself.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    Display,
    FromStr,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[display(style = "SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consequence {
    // exonic, produced by the builders
    Snv,
    FsInsertion,
    FsDeletion,
    FsSubstitution,
    NonFsInsertion,
    NonFsDeletion,
    NonFsSubstitution,
    Stopgain,
    Stoploss,
    Synonymous,
    Missense,
    // non-coding regions of coding transcripts
    Intronic,
    Utr5,
    Utr3,
    Splicing,
    // outside of transcripts
    Upstream,
    Downstream,
    Intergenic,
    // non-coding transcripts
    NcrnaExonic,
    NcrnaIntronic,
    NcrnaSplicing,
    // structural variants
    SvInversion,
    SvInsertion,
    SvDeletion,
    SvSubstitution,
    // transcript database inconsistency, recovered per candidate
    Error,
}

impl Consequence {
    /// Rank used by downstream prioritization; lower values are more
    /// deleterious.
    pub fn priority(self) -> u8 {
        match self {
            Consequence::Snv
            | Consequence::FsInsertion
            | Consequence::FsDeletion
            | Consequence::FsSubstitution
            | Consequence::NonFsInsertion
            | Consequence::NonFsDeletion
            | Consequence::NonFsSubstitution
            | Consequence::Stopgain
            | Consequence::Stoploss
            | Consequence::Missense
            | Consequence::Splicing
            | Consequence::SvInversion
            | Consequence::SvInsertion
            | Consequence::SvDeletion
            | Consequence::SvSubstitution => 1,
            Consequence::NcrnaExonic | Consequence::NcrnaSplicing => 2,
            Consequence::Utr3 => 3,
            Consequence::Utr5 => 4,
            Consequence::Synonymous => 5,
            Consequence::Intronic => 6,
            Consequence::NcrnaIntronic => 7,
            Consequence::Upstream | Consequence::Downstream => 8,
            Consequence::Intergenic => 9,
            Consequence::Error => 10,
        }
    }
}

/// One annotation of a variant against one transcript.
///
/// The transcript reference is `None` for intergenic annotations and for
/// structural variants without an overlapping transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The annotated transcript, if any.
    pub transcript: Option<Arc<TranscriptModel>>,
    /// Textual descriptor, e.g. `NM_000138.4:exon12:c.1234A>G`.
    pub hgvs: String,
    /// Molecular consequence tag.
    pub consequence: Consequence,
}

impl Annotation {
    pub fn new(
        transcript: Option<Arc<TranscriptModel>>,
        hgvs: String,
        consequence: Consequence,
    ) -> Self {
        Self {
            transcript,
            hgvs,
            consequence,
        }
    }
}
