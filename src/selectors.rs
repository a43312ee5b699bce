use std::fs;
use std::path::Path;

use crate::parser::ParseError;
use crate::scraper::ScraperError;

use scraper::Selector;
use serde::{Deserialize, Serialize};

const SOLVED_SELECTOR: &str = "body > div.wrapper > div.container.content > div.row > div:nth-child(2) > div > div.col-md-9 > div:nth-child(2) > div.panel-body > div > a";
const WRONG_SELECTOR: &str = "body > div.wrapper > div.container.content > div.row > div:nth-child(2) > div > div.col-md-9 > div:nth-child(3) > div.panel-body > div > a";

/// CSS selectors locating the problem links on a profile page.
///
/// The defaults follow the judge's current markup. A layout change makes them
/// match nothing, so they can be overridden from a JSON file:
///
/// ```json
/// { "solved": "div.solved a", "wrong": "div.wrong a" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSelectors {
    pub solved: String,
    pub wrong: String,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            solved: SOLVED_SELECTOR.to_string(),
            wrong: WRONG_SELECTOR.to_string(),
        }
    }
}

impl ProfileSelectors {
    pub fn new(solved: impl Into<String>, wrong: impl Into<String>) -> Self {
        Self {
            solved: solved.into(),
            wrong: wrong.into(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScraperError> {
        let path = path.as_ref();
        log::debug!("Loading selectors from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn compile(&self) -> Result<CompiledSelectors, ParseError> {
        Ok(CompiledSelectors {
            solved: compile_one(&self.solved)?,
            wrong: compile_one(&self.wrong)?,
        })
    }
}

fn compile_one(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub(crate) solved: Selector,
    pub(crate) wrong: Selector,
}

impl CompiledSelectors {
    pub fn solved(&self) -> &Selector {
        &self.solved
    }

    pub fn wrong(&self) -> &Selector {
        &self.wrong
    }
}
