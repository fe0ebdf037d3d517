use super::*;

use client_core::{AppStatePatch, LoadController};
use crossbeam_channel::bounded;
use shared::error::CatalogError;

use crate::ui::modal::{OrderRequest, OrderSink};
use crate::ui::scroll_lock::ScrollLock;
use crate::ui::widgets::dismiss::DismissBroker;

fn product(name: &str, abv: f64, ibu: u32) -> Product {
    Product {
        name: name.to_string(),
        abv,
        ibu,
        description: String::new(),
        image_url: String::new(),
    }
}

struct Harness {
    store: Store<AppState>,
    modal: Rc<RefCell<ModalController>>,
    broker: DismissBroker,
    lock: ScrollLock,
    orchestrator: RenderOrchestrator,
}

fn harness() -> Harness {
    let store = Store::new(AppState::default());
    let broker = DismissBroker::new();
    let lock = ScrollLock::new();
    let sink: OrderSink = Rc::new(|_: OrderRequest| {});
    let modal = Rc::new(RefCell::new(ModalController::new(
        broker.clone(),
        lock.clone(),
        sink,
    )));
    let orchestrator = RenderOrchestrator::attach(&store, Rc::clone(&modal));
    Harness {
        store,
        modal,
        broker,
        lock,
        orchestrator,
    }
}

#[test]
fn attaching_renders_the_current_snapshot() {
    let h = harness();

    let views = h.orchestrator.views();
    assert_eq!(views.renders, 1);
    assert!(views.status.is_empty());
    assert!(views.cards.is_empty());
    assert!(!views.overlay_visible);
    assert!(!h.modal.borrow().is_mounted());
}

#[test]
fn cards_follow_items_in_server_order() {
    let h = harness();

    h.store.set(AppStatePatch::default().items(vec![
        product("Pils", 4.84, 20),
        product("Double IPA", 8.0, 90),
    ]));

    let views = h.orchestrator.views();
    let names: Vec<_> = views.cards.iter().map(|c| c.product.name.as_str()).collect();
    assert_eq!(names, ["Pils", "Double IPA"]);
    assert_eq!(views.cards[0].abv, "4.8%");
    assert_eq!(views.cards[0].theme, IbuTheme::Low);
    assert_eq!(views.cards[1].theme, IbuTheme::Extreme);
}

#[test]
fn overlay_is_visible_only_while_loading() {
    let h = harness();
    let mut loader = LoadController::new();

    let ticket = loader.load(&h.store);
    {
        let views = h.orchestrator.views();
        assert!(views.overlay_visible);
        assert!(views.status.is_empty());
    }

    loader.settle(ticket.generation, Ok(vec![product("Pils", 4.8, 20)]), &h.store);
    let views = h.orchestrator.views();
    assert!(!views.overlay_visible);
    assert_eq!(views.cards.len(), 1);
}

#[test]
fn failed_load_shows_error_and_retry_clears_it() {
    let h = harness();
    let mut loader = LoadController::new();

    let ticket = loader.load(&h.store);
    loader.settle(
        ticket.generation,
        Err(CatalogError::Status { status: 404 }),
        &h.store,
    );
    assert_eq!(
        h.orchestrator.views().status.error.as_deref(),
        Some("API error (404)")
    );

    loader.load(&h.store);
    let views = h.orchestrator.views();
    assert!(views.status.is_empty());
    assert!(views.overlay_visible);
}

#[test]
fn selection_mounts_and_clearing_unmounts_the_dialog() {
    let h = harness();
    let pils = product("Pils", 4.8, 20);

    h.store
        .set(AppStatePatch::default().selected(Some(pils.clone())));
    assert_eq!(h.modal.borrow().product(), Some(&pils));
    assert_eq!(h.broker.active_count(), 1);
    assert!(h.lock.is_locked());

    h.store.set(AppStatePatch::default().selected(None));
    assert!(!h.modal.borrow().is_mounted());
    assert_eq!(h.broker.active_count(), 0);
    assert!(!h.lock.is_locked());
}

#[test]
fn every_snapshot_rebuilds_every_view() {
    let h = harness();
    h.store
        .set(AppStatePatch::default().selected(Some(product("Pils", 4.8, 20))));
    let before = h.modal.borrow().surface_id();

    h.store.set(AppStatePatch::default().phase(LoadPhase::Ready));

    assert_eq!(h.orchestrator.views().renders, 3);
    assert_ne!(h.modal.borrow().surface_id(), before);
    assert_eq!(h.broker.active_count(), 1);
}

#[test]
fn detached_orchestrator_stops_rendering() {
    let h = harness();
    let views = Rc::clone(&h.orchestrator.views);

    h.orchestrator.detach();
    h.store
        .set(AppStatePatch::default().selected(Some(product("Pils", 4.8, 20))));

    assert_eq!(views.borrow().renders, 1);
    assert!(!h.modal.borrow().is_mounted());
}

#[test]
fn dispatch_reports_full_and_disconnected_queues() {
    let (tx, rx) = bounded::<BackendCommand>(1);
    let mut status = String::new();

    let queued = |url: &str, status: &mut String| {
        dispatch_backend_command(&tx, BackendCommand::FetchImage { url: url.into() }, status)
    };

    assert!(queued("a", &mut status));
    assert!(status.is_empty());

    assert!(!queued("b", &mut status));
    assert_eq!(status, "UI command queue is full; please retry");

    drop(rx);
    assert!(!queued("c", &mut status));
    assert!(status.starts_with("Backend command processor disconnected"));
}
