//! Ranking request and response documents.

use serde::{Deserialize, Serialize};

/// A ranking request as read from the request file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRequest {
    /// Optional challenge bookkeeping, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_info: Option<ChallengeInfo>,
    /// Documents to rank
    pub documents: Vec<DocumentRef>,
    /// Who is reading
    pub persona: Persona,
    /// What they are trying to do
    pub job_to_be_done: JobToBeDone,
}

impl RankingRequest {
    /// Parse and validate a request from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let request: Self = serde_json::from_str(json)
            .map_err(|e| crate::Error::MalformedRequest(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Check the fields serde cannot check on its own.
    pub fn validate(&self) -> crate::Result<()> {
        if self.documents.is_empty() {
            return Err(crate::Error::MalformedRequest(
                "`documents` must list at least one file".to_string(),
            ));
        }
        if let Some(i) = self
            .documents
            .iter()
            .position(|d| d.filename.trim().is_empty())
        {
            return Err(crate::Error::MalformedRequest(format!(
                "documents[{}].filename is empty",
                i
            )));
        }
        Ok(())
    }

    /// File names in request order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

/// Challenge bookkeeping block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    #[serde(default)]
    pub challenge_id: String,
    #[serde(default)]
    pub test_case_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A document listed in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name, resolved against the documents directory
    pub filename: String,
    /// Optional human title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DocumentRef {
    /// Create a reference to a file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// Full ranking response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResult {
    pub metadata: RankingMetadata,
    /// Ranked sections, best first
    pub extracted_sections: Vec<ExtractedSection>,
    /// Summaries, parallel to `extracted_sections`
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// RFC 3339 timestamp
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    /// 1-based rank, contiguous
    pub importance_rank: u32,
    pub page_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}
