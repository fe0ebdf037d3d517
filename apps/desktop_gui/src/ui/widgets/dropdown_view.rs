//! egui adapter for [`TwoLevelDropdown`].

use eframe::egui;

use super::dropdown::{DropdownEvent, PanelLayout, TwoLevelDropdown};

const POPOVER_GAP: f32 = 4.0;
const PANEL_WIDTH: f32 = 120.0;

/// Draws the trigger and, while open, the popover. Returns the input collected this frame;
/// the owner applies it with [`TwoLevelDropdown::handle`].
pub fn show(ui: &mut egui::Ui, dropdown: &mut TwoLevelDropdown) -> Vec<DropdownEvent> {
    let mut events = Vec::new();

    let trigger = ui.button(format!("{}  ⏷", dropdown.label()));
    if trigger.clicked() {
        events.push(DropdownEvent::Trigger);
    }

    let mut root = trigger.rect;
    if dropdown.is_open() {
        let popover = show_popover(ui, dropdown, trigger.rect, &mut events);
        root = root.union(popover);
    }
    dropdown.set_bounds(root);

    events
}

fn show_popover(
    ui: &egui::Ui,
    dropdown: &mut TwoLevelDropdown,
    anchor: egui::Rect,
    events: &mut Vec<DropdownEvent>,
) -> egui::Rect {
    let mut layout = PanelLayout::default();
    let area = egui::Area::new(ui.id().with("two_level_dropdown_popover"))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor.left_bottom() + egui::vec2(0.0, POPOVER_GAP))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                layout.popover_top = Some(ui.max_rect().top());
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(PANEL_WIDTH);
                        for (index, group) in dropdown.config().groups.iter().enumerate() {
                            let item = ui.selectable_label(
                                dropdown.is_group_active(index),
                                format!("{}  ›", group.label),
                            );
                            layout.group_tops.push(item.rect.top());
                            if item.clicked() {
                                events.push(DropdownEvent::Group(index));
                            }
                        }
                    });

                    if let Some(panel) = dropdown.right_panel() {
                        ui.separator();
                        ui.vertical(|ui| {
                            ui.set_width(PANEL_WIDTH);
                            ui.add_space(panel.offset.max(0.0));
                            for (index, child) in panel.children.iter().enumerate() {
                                if ui.button(&child.label).clicked() {
                                    events.push(DropdownEvent::Child(index));
                                }
                            }
                        });
                    }
                });
            });
        });

    dropdown.record_layout(layout);
    area.response.rect
}
