use std::{cell::RefCell, rc::Rc, time::Duration};

use client_core::{AppState, AppStatePatch, LoadController, Store};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::error::CatalogError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiAction, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::{
    dispatch_backend_command, CardView, RenderOrchestrator, RenderedViews, StatusView,
    STATUS_HEADLINE,
};
use crate::ui::images::{ImageCache, ImageSlot};
use crate::ui::modal::{ModalController, OrderRequest};
use crate::ui::scroll_lock::ScrollLock;
use crate::ui::theme::{card_fill, ibu_accent};
use crate::ui::widgets::dismiss::{DismissBroker, DismissEvent};

const CARD_WIDTH: f32 = 220.0;
const THUMBNAIL_HEIGHT: f32 = 120.0;
const CARD_TEXT: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct CatalogApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    store: Store<AppState>,
    orchestrator: RenderOrchestrator,
    modal: Rc<RefCell<ModalController>>,
    loader: LoadController,
    broker: DismissBroker,
    scroll_lock: ScrollLock,
    images: ImageCache,
    orders: Rc<RefCell<Vec<OrderRequest>>>,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl CatalogApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let store = Store::new(AppState::default());
        let broker = DismissBroker::new();
        let scroll_lock = ScrollLock::new();
        let orders = Rc::new(RefCell::new(Vec::new()));

        let order_log = Rc::clone(&orders);
        let modal = Rc::new(RefCell::new(ModalController::new(
            broker.clone(),
            scroll_lock.clone(),
            Rc::new(move |order: OrderRequest| order_log.borrow_mut().push(order)),
        )));
        let orchestrator = RenderOrchestrator::attach(&store, Rc::clone(&modal));

        let mut app = Self {
            cmd_tx,
            ui_rx,
            store,
            orchestrator,
            modal,
            loader: LoadController::new(),
            broker,
            scroll_lock,
            images: ImageCache::default(),
            orders,
            status: "Starting".to_string(),
            status_banner: None,
        };
        app.start_load();
        app
    }

    fn start_load(&mut self) {
        let ticket = self.loader.load(&self.store);
        let generation = ticket.generation;
        self.status = "Loading catalog".to_string();
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchCatalog { ticket },
            &mut self.status,
        ) {
            let reason = CatalogError::Network(self.status.clone());
            self.loader.settle(generation, Err(reason), &self.store);
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Error(err) => {
                    self.status = format!("{}: {}", err.headline(), err.message());
                    if err.context() == UiErrorContext::BackendStartup {
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Error,
                            message: self.status.clone(),
                        });
                        // Queued loads will never be answered once the worker is gone.
                        if self.loader.is_in_flight() {
                            let reason = CatalogError::Network(err.message().to_string());
                            self.loader
                                .settle(self.loader.generation(), Err(reason), &self.store);
                        }
                    }
                }
                UiEvent::CatalogSettled { generation, result } => {
                    let summary = match &result {
                        Ok(items) => format!("Loaded {} products", items.len()),
                        Err(err) => {
                            let err =
                                UiError::from_message(UiErrorContext::CatalogLoad, err.to_string());
                            format!("{}: {}", err.headline(), err.message())
                        }
                    };
                    if self.loader.settle(generation, result, &self.store) {
                        self.status = summary;
                    }
                }
                UiEvent::ImageLoaded { url, image } => {
                    self.images.store(ctx, url, image);
                }
                UiEvent::ImageFailed { url, reason } => {
                    let err = UiError::from_message(UiErrorContext::ImageFetch, reason);
                    tracing::warn!(%url, category = ?err.category(), "image fetch failed: {}", err.message());
                    self.images.fail(url, err.message().to_string());
                }
            }
        }
    }

    /// Routes Escape and pointer presses against the bounds recorded on the previous frame,
    /// before anything is drawn.
    fn route_dismissals(&mut self, ctx: &egui::Context) {
        if self.broker.topmost().is_none() {
            return;
        }
        let (escape, press) = ctx.input(|i| {
            let press = if i.pointer.primary_pressed() {
                i.pointer.interact_pos()
            } else {
                None
            };
            (i.key_pressed(egui::Key::Escape), press)
        });

        let events = escape
            .then_some(DismissEvent::Escape)
            .into_iter()
            .chain(press.map(DismissEvent::Pointer));
        self.dismiss_with(events);
    }

    fn dismiss_with(&mut self, events: impl IntoIterator<Item = DismissEvent>) {
        for event in events {
            let Some(target) = self.broker.route(event) else {
                continue;
            };
            let closed = self.modal.borrow_mut().dismiss(target, event);
            if closed {
                self.apply(UiAction::ModalClosed);
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SelectProduct(product) => {
                tracing::debug!(product = %product.name, "product selected");
                self.store
                    .set(AppStatePatch::default().selected(Some(product)));
            }
            UiAction::RetryLoad => self.start_load(),
            UiAction::ModalClosed => {
                self.store.set(AppStatePatch::default().selected(None));
            }
            UiAction::RequestImage(url) => {
                if self.images.begin(&url)
                    && !dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::FetchImage { url: url.clone() },
                        &mut self.status,
                    )
                {
                    self.images.fail(url, self.status.clone());
                }
            }
        }
    }

    fn show_top_bar(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("catalog_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Catalog");
                if ui.button("Reload").clicked() {
                    actions.push(UiAction::RetryLoad);
                }
                ui.separator();
                ui.label(&self.status);
                if let Some(order) = self.orders.borrow().last() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Last order: {} × {} of {}",
                            order.pack, order.quantity, order.product
                        ));
                    });
                }
            });
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_catalog(&mut self, ctx: &egui::Context, views: &RenderedViews, actions: &mut Vec<UiAction>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            show_status_view(ui, &views.status, actions);

            egui::ScrollArea::vertical()
                .enable_scrolling(!self.scroll_lock.is_locked())
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);
                        for (index, card) in views.cards.iter().enumerate() {
                            show_card(ui, index, card, &self.images, actions);
                        }
                    });
                });
        });
    }
}

fn show_status_view(ui: &mut egui::Ui, status: &StatusView, actions: &mut Vec<UiAction>) {
    let Some(message) = &status.error else {
        return;
    };

    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(250, 228, 226))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(196, 88, 48)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(STATUS_HEADLINE).strong().color(CARD_TEXT));
                    ui.label(egui::RichText::new(message).color(CARD_TEXT));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Retry").clicked() {
                        actions.push(UiAction::RetryLoad);
                    }
                });
            });
        });
    ui.add_space(8.0);
}

fn show_card(
    ui: &mut egui::Ui,
    index: usize,
    card: &CardView,
    images: &ImageCache,
    actions: &mut Vec<UiAction>,
) {
    let product = &card.product;
    let frame = egui::Frame::NONE
        .fill(card_fill(card.theme))
        .stroke(egui::Stroke::new(1.0, ibu_accent(card.theme)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            match images.slot(&product.image_url) {
                Some(ImageSlot::Ready(texture)) => {
                    ui.add(
                        egui::Image::from_texture(texture)
                            .max_width(CARD_WIDTH)
                            .max_height(THUMBNAIL_HEIGHT),
                    );
                }
                Some(ImageSlot::Pending) => {
                    ui.spinner();
                }
                Some(ImageSlot::Failed(_)) => {}
                None => {
                    if images.needs_fetch(&product.image_url) {
                        actions.push(UiAction::RequestImage(product.image_url.clone()));
                    }
                }
            }
            ui.label(
                egui::RichText::new(&product.name)
                    .strong()
                    .size(16.0)
                    .color(CARD_TEXT),
            );
            ui.label(egui::RichText::new(format!("ABV {}", card.abv)).color(CARD_TEXT));
            ui.label(
                egui::RichText::new(format!("IBU {} · {}", product.ibu, card.theme.slug()))
                    .color(ibu_accent(card.theme)),
            );
        });

    let response = ui
        .interact(
            frame.response.rect,
            ui.id().with(("product_card", index)),
            egui::Sense::click(),
        )
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        actions.push(UiAction::SelectProduct(product.clone()));
    }
}

fn show_loading_overlay(ctx: &egui::Context) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("catalog_loading_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(120));
            ui.allocate_rect(screen, egui::Sense::click());
            let spinner = egui::Rect::from_center_size(screen.center(), egui::vec2(48.0, 48.0));
            ui.put(spinner, egui::Spinner::new().size(48.0));
        });
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.route_dismissals(ctx);

        let views = self.orchestrator.views().clone();
        let mut actions = Vec::new();
        self.show_top_bar(ctx, &mut actions);
        self.show_catalog(ctx, &views, &mut actions);
        self.modal
            .borrow_mut()
            .show(ctx, &self.images, &mut actions);
        if views.overlay_visible {
            show_loading_overlay(ctx);
        }

        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
