//! Backend commands queued from UI to backend worker.

use client_core::LoadTicket;

pub enum BackendCommand {
    FetchCatalog { ticket: LoadTicket },
    FetchImage { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchCatalog { .. } => "fetch_catalog",
            BackendCommand::FetchImage { .. } => "fetch_image",
        }
    }
}
