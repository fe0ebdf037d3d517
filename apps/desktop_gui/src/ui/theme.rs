use eframe::egui;
use shared::domain::IbuTheme;

pub fn ibu_accent(theme: IbuTheme) -> egui::Color32 {
    match theme {
        IbuTheme::Low => egui::Color32::from_rgb(241, 196, 83),
        IbuTheme::Mid => egui::Color32::from_rgb(230, 145, 56),
        IbuTheme::High => egui::Color32::from_rgb(196, 88, 48),
        IbuTheme::Extreme => egui::Color32::from_rgb(128, 45, 40),
    }
}

/// Card background: the accent mixed towards white.
pub fn card_fill(theme: IbuTheme) -> egui::Color32 {
    lighten_color(ibu_accent(theme), 0.78)
}

pub fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round() as u8
    };
    egui::Color32::from_rgb(mix(c.r()), mix(c.g()), mix(c.b()))
}
