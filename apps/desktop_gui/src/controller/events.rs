//! UI/backend events, UI intents and error modeling for the catalog GUI controller.

use shared::{domain::Product, error::CatalogError};

use crate::ui::images::PreviewImage;

/// Backend worker → UI thread.
pub enum UiEvent {
    Error(UiError),
    CatalogSettled {
        generation: u64,
        result: Result<Vec<Product>, CatalogError>,
    },
    ImageLoaded {
        url: String,
        image: PreviewImage,
    },
    ImageFailed {
        url: String,
        reason: String,
    },
}

/// Intents collected while drawing a frame and applied once no view is borrowed.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectProduct(Product),
    RetryLoad,
    /// The modal already tore itself down; only `selected` needs clearing.
    ModalClosed,
    RequestImage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CatalogLoad,
    ImageFetch,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("shape")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("api error")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
            || message_lower.contains("startup")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short prefix for banners, e.g. `Transport error`.
    pub fn headline(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Transport => "Transport error",
            UiErrorCategory::Validation => "Validation error",
            UiErrorCategory::Unknown => "Unexpected error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_command_processor_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.headline(), "Transport error");
    }

    #[test]
    fn classifies_worker_runtime_build_failure_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: Too many open files",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.headline(), "Transport error");
    }

    #[test]
    fn classifies_catalog_errors_by_their_text() {
        let shape = UiError::from_message(
            UiErrorContext::CatalogLoad,
            CatalogError::Shape("missing `record` field".into()).to_string(),
        );
        assert_eq!(shape.category(), UiErrorCategory::Validation);

        let status = UiError::from_message(
            UiErrorContext::CatalogLoad,
            CatalogError::Status { status: 502 }.to_string(),
        );
        assert_eq!(status.category(), UiErrorCategory::Transport);
        assert_eq!(status.context(), UiErrorContext::CatalogLoad);
        assert_eq!(status.message(), "API error (502)");
    }

    #[test]
    fn unmatched_text_is_unknown() {
        let err = UiError::from_message(UiErrorContext::BackendStartup, "something odd");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
    }
}
