//! Directory and request-file orchestration.
//!
//! Per-document failures are logged and turned into empty results; only
//! run-level failures (unreadable input directory, unwritable output
//! location, malformed request) are returned as errors.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::model::{RankingRequest, RankingResult};
use crate::outline::OutlineExtractor;
use crate::parser::{file_name, LayoutSource};
use crate::ranking::{DocumentText, Ranker};
use crate::render::{write_json, JsonFormat};

/// One processed document of an outline batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub headings: usize,
}

/// PDF files directly inside `dir`, sorted by name.
pub fn list_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Output file for an input: same base name with a `.json` extension.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(Path::new(&file_name(input)).with_extension("json"))
}

/// Extract the outline of every PDF in `input_dir` into `output_dir`.
///
/// `progress` is called once per finished document, possibly from several
/// threads. Items are returned in input order.
pub fn outline_directory<S, F>(
    input_dir: &Path,
    output_dir: &Path,
    extractor: &OutlineExtractor,
    source: &S,
    parallel: bool,
    format: JsonFormat,
    progress: F,
) -> Result<Vec<BatchItem>>
where
    S: LayoutSource + ?Sized,
    F: Fn(&BatchItem) + Sync,
{
    let inputs = list_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!("{} PDF files in {}", inputs.len(), input_dir.display());

    let process = |input: &PathBuf| -> Result<BatchItem> {
        let result = extractor.extract_from(source, input);
        let output = output_path_for(input, output_dir);
        write_json(&output, &result, format)?;

        let item = BatchItem {
            input: input.clone(),
            output,
            title: result.title,
            headings: result.outline.len(),
        };
        log::info!("{} -> {} headings", item.input.display(), item.headings);
        progress(&item);
        Ok(item)
    };

    if parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    }
}

/// Read and validate a ranking request file.
pub fn read_request<P: AsRef<Path>>(path: P) -> Result<RankingRequest> {
    RankingRequest::from_json(&fs::read_to_string(path)?)
}

/// Directory the request's documents are resolved against when none is given.
pub fn default_docs_dir(request_path: &Path) -> PathBuf {
    request_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read the page text of every requested document.
///
/// A document that cannot be read yields no pages and is logged.
pub fn load_documents<S>(
    source: &S,
    request: &RankingRequest,
    docs_dir: &Path,
    parallel: bool,
) -> Vec<DocumentText>
where
    S: LayoutSource + ?Sized,
{
    let load = |filename: &String| {
        let path = docs_dir.join(filename);
        let pages = source.page_texts(&path).unwrap_or_else(|e| {
            if e.is_document_local() {
                log::warn!("{}: {}", path.display(), e);
            } else {
                log::error!("{}: {}", path.display(), e);
            }
            Vec::new()
        });
        DocumentText::new(filename.clone(), pages)
    };

    let filenames = request.filenames();
    if parallel {
        filenames.par_iter().map(load).collect()
    } else {
        filenames.iter().map(load).collect()
    }
}

/// Run a ranking request file end to end.
pub fn rank_request<S>(
    request_path: &Path,
    docs_dir: Option<&Path>,
    ranker: &Ranker,
    source: &S,
    parallel: bool,
) -> Result<RankingResult>
where
    S: LayoutSource + ?Sized,
{
    let request = read_request(request_path)?;
    let docs_dir = docs_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_docs_dir(request_path));

    let documents = load_documents(source, &request, &docs_dir, parallel);
    Ok(ranker.rank(&request, &documents))
}
