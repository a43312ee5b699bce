use std::num::ParseIntError;

use crate::selectors::CompiledSelectors;
use crate::types::{ProblemId, ScrapeResult};

use scraper::{ElementRef, Html, Selector};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("Invalid problem id '{text}': {source}")]
    InvalidProblemId { text: String, source: ParseIntError },
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Extracts the solved and wrong-answer problem ids from a profile page.
///
/// Selectors that match nothing produce empty lists. A single non-numeric
/// entry fails the whole page.
pub fn parse_profile(
    html: &str,
    selectors: &CompiledSelectors,
) -> Result<ScrapeResult, ParseError> {
    let document = Html::parse_document(html);

    let solved = parse_problem_ids(&document, selectors.solved(), "solved")?;
    let wrong = parse_problem_ids(&document, selectors.wrong(), "wrong")?;

    Ok(ScrapeResult::new(solved, wrong))
}

fn parse_problem_ids(
    document: &Html,
    selector: &Selector,
    label: &str,
) -> Result<Vec<ProblemId>, ParseError> {
    let ids = document
        .select(selector)
        .map(|e| parse_problem_id(&elem_text(e)))
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        log::debug!("No {} entries matched", label);
    }

    Ok(ids)
}

fn parse_problem_id(text: &str) -> Result<ProblemId, ParseError> {
    text.trim()
        .parse()
        .map_err(|source| ParseError::InvalidProblemId {
            text: text.to_string(),
            source,
        })
}
