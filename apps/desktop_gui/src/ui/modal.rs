//! Product details dialog. Every mount builds a fresh order dropdown, holds a dismissal
//! registration for the dialog and freezes the catalog scroll area until it is torn down.

use std::rc::Rc;

use eframe::egui;
use shared::domain::Product;

use crate::controller::events::UiAction;
use crate::ui::images::{ImageCache, ImageSlot};
use crate::ui::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::ui::theme::ibu_accent;
use crate::ui::widgets::dismiss::{DismissBroker, DismissEvent, DismissRegistration, SurfaceId};
use crate::ui::widgets::dropdown::{
    DropdownConfig, DropdownEvent, DropdownGroup, DropdownOption, DropdownSelection,
    TwoLevelDropdown,
};
use crate::ui::widgets::dropdown_view;

const PACKS: [&str; 3] = ["Glass", "Can", "Box"];
const QUANTITIES: [&str; 3] = ["1", "2", "3"];
const DIALOG_WIDTH: f32 = 420.0;
const PREVIEW_MAX_HEIGHT: f32 = 220.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub product: String,
    pub pack: String,
    pub quantity: u32,
}

pub type OrderSink = Rc<dyn Fn(OrderRequest)>;

pub fn order_dropdown_config() -> DropdownConfig {
    DropdownConfig {
        groups: PACKS
            .iter()
            .map(|pack| DropdownGroup {
                label: pack.to_string(),
                value: pack.to_string(),
                children: QUANTITIES
                    .iter()
                    .map(|qty| DropdownOption::new(*qty, *qty))
                    .collect(),
            })
            .collect(),
    }
}

pub fn order_label(pack: &str, quantity: &str) -> String {
    format!("{pack} × {quantity}")
}

struct MountedModal {
    product: Product,
    dropdown: TwoLevelDropdown,
    registration: DismissRegistration,
    _scroll_guard: ScrollLockGuard,
}

pub struct ModalController {
    broker: DismissBroker,
    scroll_lock: ScrollLock,
    on_order: OrderSink,
    mounted: Option<MountedModal>,
}

impl ModalController {
    pub fn new(broker: DismissBroker, scroll_lock: ScrollLock, on_order: OrderSink) -> Self {
        Self {
            broker,
            scroll_lock,
            on_order,
            mounted: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn product(&self) -> Option<&Product> {
        self.mounted.as_ref().map(|modal| &modal.product)
    }

    pub fn dropdown(&self) -> Option<&TwoLevelDropdown> {
        self.mounted.as_ref().map(|modal| &modal.dropdown)
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.mounted.as_ref().map(|modal| modal.registration.id())
    }

    /// Tears down whatever is mounted, then mounts `product` if there is one.
    pub fn render(&mut self, product: Option<&Product>) {
        self.teardown();
        if let Some(product) = product {
            self.mount(product.clone());
        }
    }

    /// Returns `true` if a dialog was mounted and is now gone.
    pub fn close(&mut self) -> bool {
        self.teardown()
    }

    /// Applies a dismissal the broker routed to `target`. Returns `true` when the dialog
    /// itself closed; a dismissal aimed at the open dropdown only closes the dropdown.
    pub fn dismiss(&mut self, target: SurfaceId, event: DismissEvent) -> bool {
        let Some(modal) = self.mounted.as_mut() else {
            return false;
        };

        if modal.dropdown.surface_id() == Some(target) {
            modal.dropdown.handle(match event {
                DismissEvent::Escape => DropdownEvent::Escape,
                DismissEvent::Pointer(_) => DropdownEvent::OutsidePointer,
            });
            return false;
        }
        if modal.registration.id() == target {
            return self.close();
        }
        false
    }

    pub fn handle_dropdown(&mut self, event: DropdownEvent) -> Option<DropdownSelection> {
        let modal = self.mounted.as_mut()?;
        let selection = modal.dropdown.handle(event)?;
        modal
            .dropdown
            .set_label(order_label(&selection.group_value, &selection.child_value));
        Some(selection)
    }

    fn mount(&mut self, product: Product) {
        let registration = self.broker.register();
        let scroll_guard = self.scroll_lock.acquire();

        let sink = Rc::clone(&self.on_order);
        let product_name = product.name.clone();
        let dropdown = TwoLevelDropdown::new(
            order_dropdown_config(),
            self.broker.clone(),
            Box::new(move |pack, quantity| match quantity.parse::<u32>() {
                Ok(quantity) => {
                    tracing::info!(product = %product_name, pack, quantity, "order selected");
                    sink(OrderRequest {
                        product: product_name.clone(),
                        pack: pack.to_string(),
                        quantity,
                    });
                }
                Err(err) => {
                    tracing::warn!(pack, quantity, "ignoring order with bad quantity: {err}");
                }
            }),
        );

        tracing::debug!(product = %product.name, "details dialog mounted");
        self.mounted = Some(MountedModal {
            product,
            dropdown,
            registration,
            _scroll_guard: scroll_guard,
        });
    }

    fn teardown(&mut self) -> bool {
        let Some(mut modal) = self.mounted.take() else {
            return false;
        };
        modal.dropdown.destroy();
        tracing::debug!(product = %modal.product.name, "details dialog torn down");
        true
    }

    /// Draws the backdrop and dialog. Close-button clicks tear the dialog down here and push
    /// [`UiAction::ModalClosed`]; dismissal by Escape or backdrop click arrives via
    /// [`ModalController::dismiss`].
    pub fn show(&mut self, ctx: &egui::Context, images: &ImageCache, actions: &mut Vec<UiAction>) {
        let Some(modal) = self.mounted.as_mut() else {
            return;
        };

        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("details_modal_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(140));
                ui.allocate_rect(screen, egui::Sense::click());
            });

        let mut close_clicked = false;
        let mut dropdown_events = Vec::new();
        let dialog = egui::Area::new(egui::Id::new("details_modal_dialog"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Frame::window(ui.style())
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_width(DIALOG_WIDTH);
                        let product = &modal.product;
                        ui.horizontal(|ui| {
                            let theme = product.theme();
                            ui.colored_label(
                                ibu_accent(theme),
                                format!("IBU {} · {}", product.ibu, theme.slug()),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("✕").on_hover_text("Close").clicked() {
                                    close_clicked = true;
                                }
                            });
                        });

                        ui.add_space(8.0);
                        show_preview(ui, images, &product.image_url, actions);
                        ui.add_space(8.0);

                        ui.label(egui::RichText::new(product.abv_label()).weak());
                        ui.heading(&product.name);
                        ui.label(&product.description);
                        ui.add_space(12.0);

                        dropdown_events = dropdown_view::show(ui, &mut modal.dropdown);
                    });
            });
        modal.registration.set_bounds(dialog.response.rect);

        for event in dropdown_events {
            self.handle_dropdown(event);
        }
        if close_clicked && self.close() {
            actions.push(UiAction::ModalClosed);
        }
    }
}

fn show_preview(ui: &mut egui::Ui, images: &ImageCache, url: &str, actions: &mut Vec<UiAction>) {
    match images.slot(url) {
        Some(ImageSlot::Ready(texture)) => {
            ui.add(
                egui::Image::from_texture(texture)
                    .max_width(DIALOG_WIDTH)
                    .max_height(PREVIEW_MAX_HEIGHT),
            );
        }
        Some(ImageSlot::Pending) => {
            ui.spinner();
        }
        Some(ImageSlot::Failed(reason)) => {
            ui.label(egui::RichText::new(format!("Image unavailable: {reason}")).weak());
        }
        None => {
            if images.needs_fetch(url) {
                actions.push(UiAction::RequestImage(url.to_string()));
            }
        }
    }
}

impl Drop for ModalController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/modal_tests.rs"]
mod tests;
