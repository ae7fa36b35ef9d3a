//! Data model shared by the outline and ranking pipelines.
//!
//! Layout types come out of the layout adapter; outline, section and ranking
//! types are what the pipelines produce and what gets serialized.

mod layout;
mod outline;
mod ranking;
mod section;

pub use layout::{
    normalize_whitespace, Block, LayoutDocument, LayoutPage, Line, PageText, Span, Style,
};
pub use outline::{HeadingLevel, OutlineEntry, OutlineResult};
pub use ranking::{
    ChallengeInfo, DocumentRef, ExtractedSection, JobToBeDone, Persona, RankingMetadata,
    RankingRequest, RankingResult, SubsectionAnalysis,
};
pub use section::{ScoredSection, Section};
