pub mod json;
pub mod md;

use crate::error::KycError;
use crate::types::progress::Checklist;
use crate::types::report::{CatalogSummary, GoalRanking, ProjectionReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub trait Markdown {
    fn to_markdown(&self) -> String;
}

impl Markdown for GoalRanking {
    fn to_markdown(&self) -> String {
        md::ranking_to_markdown(self)
    }
}

impl Markdown for Checklist {
    fn to_markdown(&self) -> String {
        md::checklist_to_markdown(self)
    }
}

impl Markdown for ProjectionReport {
    fn to_markdown(&self) -> String {
        md::report_to_markdown(self)
    }
}

impl Markdown for CatalogSummary {
    fn to_markdown(&self) -> String {
        md::catalog_to_markdown(self)
    }
}

pub fn render<T>(value: &T, format: OutputFormat) -> Result<String, KycError>
where
    T: Serialize + Markdown,
{
    match format {
        OutputFormat::Json => json::to_json(value).map_err(KycError::Json),
        OutputFormat::Md => Ok(value.to_markdown()),
    }
}
