use thiserror::Error;

use crate::model::{IngestError, PrizeError, ProgressError, SectionCatalogError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] SectionCatalogError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Prize(#[from] PrizeError),
}
