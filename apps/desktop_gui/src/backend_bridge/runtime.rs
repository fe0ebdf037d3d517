//! Backend worker thread: owns the tokio runtime and turns commands into UI events.

use std::thread;

use client_core::{CatalogClient, CatalogSource};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::images::decode_preview_image;

pub fn launch(client: CatalogClient, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                send_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        tracing::info!(endpoint = %client.endpoint(), "backend worker ready");
        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::FetchCatalog { ticket } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let result = client.fetch_catalog(ticket.signal).await;
                            send_settled_event(
                                &ui_tx,
                                UiEvent::CatalogSettled {
                                    generation: ticket.generation,
                                    result,
                                },
                            );
                        });
                    }
                    BackendCommand::FetchImage { url } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.fetch_image(&url).await {
                                Ok(bytes) => match decode_preview_image(&bytes) {
                                    Ok(image) => UiEvent::ImageLoaded { url, image },
                                    Err(reason) => UiEvent::ImageFailed { url, reason },
                                },
                                Err(err) => UiEvent::ImageFailed {
                                    url,
                                    reason: err.to_string(),
                                },
                            };
                            send_event(&ui_tx, event);
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.try_send(event).is_err() {
        tracing::warn!("backend->ui event queue unavailable; dropping event");
    }
}

/// Catalog outcomes are never dropped on a full queue: the UI stays in `Loading` until one
/// arrives. Waits for room instead, off the async workers.
fn send_settled_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!("backend->ui event queue closed; dropping catalog outcome");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };
    tracing::debug!("backend->ui event queue full; waiting to deliver catalog outcome");
    if tokio::task::block_in_place(|| ui_tx.send(event)).is_err() {
        tracing::warn!("backend->ui event queue closed; dropping catalog outcome");
    }
}
