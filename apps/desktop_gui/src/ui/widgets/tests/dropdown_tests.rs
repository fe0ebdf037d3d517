use super::*;

use std::{cell::RefCell, rc::Rc};

use egui::{pos2, vec2};

use crate::ui::widgets::dismiss::DismissEvent;

type Calls = Rc<RefCell<Vec<(String, String)>>>;

fn group(value: &str, children: &[&str]) -> DropdownGroup {
    DropdownGroup {
        label: value.to_string(),
        value: value.to_string(),
        children: children
            .iter()
            .map(|child| DropdownOption::new(*child, *child))
            .collect(),
    }
}

fn packs() -> DropdownConfig {
    DropdownConfig {
        groups: vec![
            group("Glass", &["1", "2", "3"]),
            group("Can", &["1", "2", "3"]),
            group("Box", &["1", "2", "3"]),
        ],
    }
}

fn dropdown(config: DropdownConfig, broker: &DismissBroker) -> (TwoLevelDropdown, Calls) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let widget = TwoLevelDropdown::new(
        config,
        broker.clone(),
        Box::new(move |group, child| {
            sink.borrow_mut()
                .push((group.to_string(), child.to_string()))
        }),
    );
    (widget, calls)
}

#[test]
fn starts_closed_without_dismissal_registration() {
    let broker = DismissBroker::new();
    let (widget, _) = dropdown(packs(), &broker);

    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert_eq!(widget.state(), DropdownState::default());
    assert_eq!(widget.label(), DEFAULT_TRIGGER_LABEL);
    assert_eq!(broker.active_count(), 0);
    assert!(!(0..3).any(|index| widget.is_group_active(index)));
}

#[test]
fn opening_twice_binds_once() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);

    widget.open();
    let first = widget.surface_id();
    widget.open();

    assert_eq!(widget.phase(), DropdownPhase::OpenCollapsed);
    assert_eq!(widget.surface_id(), first);
    assert_eq!(broker.active_count(), 1);
}

#[test]
fn opening_an_expanded_widget_keeps_it_expanded() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.open();
    widget.handle(DropdownEvent::Group(1));

    widget.open();

    assert_eq!(widget.phase(), DropdownPhase::OpenExpanded);
    assert!(widget.is_group_active(1));
}

#[test]
fn closing_twice_is_harmless() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.open();

    widget.close();
    widget.close();

    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert_eq!(broker.active_count(), 0);
}

#[test]
fn trigger_toggles_and_clears_right_panel() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);

    widget.handle(DropdownEvent::Trigger);
    widget.handle(DropdownEvent::Group(2));
    assert_eq!(widget.phase(), DropdownPhase::OpenExpanded);

    widget.handle(DropdownEvent::Trigger);
    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert!(widget.right_panel().is_none());
    assert_eq!(broker.active_count(), 0);

    widget.handle(DropdownEvent::Trigger);
    assert_eq!(widget.phase(), DropdownPhase::OpenCollapsed);
    assert_eq!(widget.state().active_group_index, 2);
    assert!(!widget.is_group_active(2));
}

#[test]
fn group_activation_populates_and_positions_right_panel() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.record_layout(PanelLayout {
        popover_top: Some(100.0),
        group_tops: vec![108.0, 136.0, 164.0],
    });
    widget.open();

    widget.handle(DropdownEvent::Group(1));

    let panel = widget.right_panel().expect("expanded");
    assert_eq!(panel.group_index, 1);
    assert_eq!(panel.offset, 36.0);
    let labels: Vec<_> = panel.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["1", "2", "3"]);
    assert!(widget.is_group_active(1));
    assert!(!widget.is_group_active(0));
    assert_eq!(widget.state().active_group_index, 1);
}

#[test]
fn missing_layout_keeps_previous_offset() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.record_layout(PanelLayout {
        popover_top: Some(0.0),
        group_tops: vec![4.0],
    });
    widget.open();
    widget.handle(DropdownEvent::Group(0));

    widget.handle(DropdownEvent::Group(2));

    assert_eq!(widget.right_panel().map(|p| p.offset), Some(4.0));
    assert!(widget.is_group_active(2));
}

#[test]
fn group_activation_requires_open_widget_and_valid_index() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);

    widget.handle(DropdownEvent::Group(0));
    assert_eq!(widget.phase(), DropdownPhase::Closed);

    widget.open();
    widget.handle(DropdownEvent::Group(7));
    assert_eq!(widget.phase(), DropdownPhase::OpenCollapsed);
}

#[test]
fn selecting_a_child_reports_values_and_closes() {
    let broker = DismissBroker::new();
    let (mut widget, calls) = dropdown(
        DropdownConfig {
            groups: vec![group("Glass", &["2"])],
        },
        &broker,
    );

    widget.handle(DropdownEvent::Trigger);
    widget.handle(DropdownEvent::Group(0));
    let selection = widget.handle(DropdownEvent::Child(0));

    assert_eq!(
        selection,
        Some(DropdownSelection {
            group_value: "Glass".into(),
            child_value: "2".into(),
        })
    );
    assert_eq!(*calls.borrow(), vec![("Glass".to_string(), "2".to_string())]);
    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert_eq!(broker.active_count(), 0);
}

#[test]
fn child_selection_uses_active_group_values() {
    let broker = DismissBroker::new();
    let (mut widget, calls) = dropdown(packs(), &broker);
    widget.open();
    widget.handle(DropdownEvent::Group(0));
    widget.handle(DropdownEvent::Group(2));

    widget.handle(DropdownEvent::Child(2));

    assert_eq!(*calls.borrow(), vec![("Box".to_string(), "3".to_string())]);
}

#[test]
fn child_events_while_collapsed_or_closed_are_ignored() {
    let broker = DismissBroker::new();
    let (mut widget, calls) = dropdown(packs(), &broker);

    assert_eq!(widget.handle(DropdownEvent::Child(0)), None);
    widget.open();
    assert_eq!(widget.handle(DropdownEvent::Child(0)), None);

    assert!(calls.borrow().is_empty());
    assert_eq!(widget.phase(), DropdownPhase::OpenCollapsed);
}

#[test]
fn outside_pointer_routed_by_broker_closes_expanded_widget() {
    let broker = DismissBroker::new();
    let (mut widget, calls) = dropdown(packs(), &broker);
    widget.set_bounds(Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 120.0)));
    widget.open();
    widget.handle(DropdownEvent::Group(0));
    assert_eq!(widget.phase(), DropdownPhase::OpenExpanded);

    let routed = broker.route(DismissEvent::Pointer(pos2(400.0, 400.0)));
    assert_eq!(routed, widget.surface_id());
    widget.handle(DropdownEvent::OutsidePointer);

    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert!(widget.right_panel().is_none());
    assert!(calls.borrow().is_empty());
    assert_eq!(broker.active_count(), 0);
}

#[test]
fn pointer_inside_widget_root_does_not_dismiss() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.set_bounds(Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 120.0)));
    widget.open();

    assert_eq!(broker.route(DismissEvent::Pointer(pos2(50.0, 60.0))), None);
    assert!(widget.is_open());
}

#[test]
fn escape_closes_open_widget() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.open();

    assert_eq!(broker.route(DismissEvent::Escape), widget.surface_id());
    widget.handle(DropdownEvent::Escape);

    assert_eq!(widget.phase(), DropdownPhase::Closed);
}

#[test]
fn only_topmost_of_two_open_widgets_receives_escape() {
    let broker = DismissBroker::new();
    let (mut lower, _) = dropdown(packs(), &broker);
    let (mut upper, _) = dropdown(packs(), &broker);
    lower.open();
    upper.open();

    assert_eq!(broker.route(DismissEvent::Escape), upper.surface_id());
}

#[test]
fn destroy_is_safe_in_any_state() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);

    widget.destroy();
    assert_eq!(broker.active_count(), 0);

    widget.open();
    widget.handle(DropdownEvent::Group(0));
    widget.destroy();
    assert_eq!(broker.active_count(), 0);
    assert_eq!(widget.phase(), DropdownPhase::Closed);

    widget.close();
    widget.destroy();
    assert_eq!(broker.active_count(), 0);
}

#[test]
fn dropping_open_widget_releases_registration() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.open();

    drop(widget);

    assert_eq!(broker.active_count(), 0);
}

#[test]
fn any_operation_sequence_ending_closed_leaves_nothing_bound() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    let script = [
        DropdownEvent::Trigger,
        DropdownEvent::Trigger,
        DropdownEvent::Trigger,
        DropdownEvent::Group(1),
        DropdownEvent::Escape,
        DropdownEvent::Escape,
        DropdownEvent::Trigger,
        DropdownEvent::Group(0),
        DropdownEvent::Child(1),
        DropdownEvent::Trigger,
        DropdownEvent::OutsidePointer,
    ];

    for event in script {
        widget.handle(event);
        assert_eq!(broker.active_count(), usize::from(widget.is_open()));
    }

    assert_eq!(widget.phase(), DropdownPhase::Closed);
    assert_eq!(broker.active_count(), 0);
}

#[test]
fn set_label_leaves_state_untouched() {
    let broker = DismissBroker::new();
    let (mut widget, _) = dropdown(packs(), &broker);
    widget.open();
    widget.handle(DropdownEvent::Group(1));

    widget.set_label("Can × 2");

    assert_eq!(widget.label(), "Can × 2");
    assert_eq!(widget.phase(), DropdownPhase::OpenExpanded);
}
