//! Headless two-level dropdown: a trigger, a left panel of groups and a right panel with
//! the children of the active group.
//!
//! The widget never draws anything. A render adapter (see `dropdown_view`) reports measured
//! positions through [`TwoLevelDropdown::record_layout`] and [`TwoLevelDropdown::set_bounds`]
//! and feeds user input back as [`DropdownEvent`]s.

use egui::Rect;

use super::dismiss::{DismissBroker, DismissRegistration, SurfaceId};

pub const DEFAULT_TRIGGER_LABEL: &str = "Order";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownGroup {
    pub label: String,
    pub value: String,
    pub children: Vec<DropdownOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownConfig {
    pub groups: Vec<DropdownGroup>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropdownState {
    pub open: bool,
    pub active_group_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownPhase {
    Closed,
    OpenCollapsed,
    OpenExpanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownEvent {
    Trigger,
    Group(usize),
    /// Index into the right panel, i.e. the children of the active group.
    Child(usize),
    OutsidePointer,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownSelection {
    pub group_value: String,
    pub child_value: String,
}

/// Screen positions measured by the render adapter on the last frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelLayout {
    pub popover_top: Option<f32>,
    pub group_tops: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RightPanel {
    pub group_index: usize,
    pub children: Vec<DropdownOption>,
    /// Vertical offset of the panel inside the popover, aligned with the active group item.
    pub offset: f32,
}

pub type SelectHandler = Box<dyn FnMut(&str, &str)>;

pub struct TwoLevelDropdown {
    config: DropdownConfig,
    label: String,
    state: DropdownState,
    right_panel: Option<RightPanel>,
    layout: PanelLayout,
    bounds: Option<Rect>,
    broker: DismissBroker,
    registration: Option<DismissRegistration>,
    on_select: SelectHandler,
}

impl TwoLevelDropdown {
    pub fn new(config: DropdownConfig, broker: DismissBroker, on_select: SelectHandler) -> Self {
        Self {
            config,
            label: DEFAULT_TRIGGER_LABEL.to_string(),
            state: DropdownState::default(),
            right_panel: None,
            layout: PanelLayout::default(),
            bounds: None,
            broker,
            registration: None,
            on_select,
        }
    }

    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the trigger text. Does not touch open/active state.
    pub fn set_label(&mut self, text: impl Into<String>) {
        self.label = text.into();
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn phase(&self) -> DropdownPhase {
        match (self.state.open, &self.right_panel) {
            (false, _) => DropdownPhase::Closed,
            (true, None) => DropdownPhase::OpenCollapsed,
            (true, Some(_)) => DropdownPhase::OpenExpanded,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn right_panel(&self) -> Option<&RightPanel> {
        self.right_panel.as_ref()
    }

    /// Whether group `index` should render as the active item. Nothing is highlighted until a
    /// group has been activated since the last open.
    pub fn is_group_active(&self, index: usize) -> bool {
        self.right_panel
            .as_ref()
            .is_some_and(|panel| panel.group_index == index)
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.registration.as_ref().map(DismissRegistration::id)
    }

    pub fn record_layout(&mut self, layout: PanelLayout) {
        self.layout = layout;
    }

    /// Records the widget root (trigger plus popover) used to tell inside from outside presses.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        if let Some(registration) = &self.registration {
            registration.set_bounds(bounds);
        }
    }

    pub fn handle(&mut self, event: DropdownEvent) -> Option<DropdownSelection> {
        match event {
            DropdownEvent::Trigger => {
                self.toggle();
                None
            }
            DropdownEvent::Group(index) => {
                self.activate_group(index);
                None
            }
            DropdownEvent::Child(index) => self.activate_child(index),
            DropdownEvent::OutsidePointer | DropdownEvent::Escape => {
                self.close();
                None
            }
        }
    }

    pub fn open(&mut self) {
        if self.state.open {
            return;
        }
        self.state.open = true;

        let registration = self.broker.register();
        if let Some(bounds) = self.bounds {
            registration.set_bounds(bounds);
        }
        self.registration = Some(registration);
        tracing::debug!(label = %self.label, "dropdown opened");
    }

    pub fn close(&mut self) {
        if !self.state.open {
            return;
        }
        self.state.open = false;
        self.right_panel = None;
        self.registration = None;
        tracing::debug!(label = %self.label, "dropdown closed");
    }

    pub fn toggle(&mut self) {
        if self.state.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Releases the dismissal registration no matter what state the widget is in.
    pub fn destroy(&mut self) {
        self.state.open = false;
        self.right_panel = None;
        self.registration = None;
    }

    fn activate_group(&mut self, index: usize) {
        if !self.state.open {
            return;
        }
        let Some(group) = self.config.groups.get(index) else {
            return;
        };

        self.state.active_group_index = index;
        let previous_offset = self.right_panel.as_ref().map_or(0.0, |panel| panel.offset);
        let offset = match (self.layout.group_tops.get(index), self.layout.popover_top) {
            (Some(item_top), Some(popover_top)) => item_top - popover_top,
            _ => previous_offset,
        };

        self.right_panel = Some(RightPanel {
            group_index: index,
            children: group.children.clone(),
            offset,
        });
    }

    fn activate_child(&mut self, index: usize) -> Option<DropdownSelection> {
        if !self.state.open {
            return None;
        }
        let panel = self.right_panel.as_ref()?;
        let child = panel.children.get(index)?;
        let group = self.config.groups.get(panel.group_index)?;

        let selection = DropdownSelection {
            group_value: group.value.clone(),
            child_value: child.value.clone(),
        };
        (self.on_select)(&selection.group_value, &selection.child_value);
        self.close();
        Some(selection)
    }
}

#[cfg(test)]
#[path = "tests/dropdown_tests.rs"]
mod tests;
