//! Top-bar controls and the filter panel's market selector.

use egui::Ui;

use crate::map::BaseStyle;
use crate::overlays::markets::MarketOverlay;

/// Actions triggered from the top bar.
pub enum ControlAction {
    /// Switch the base style.
    SetStyle(BaseStyle),
    /// Show/hide the filter panel.
    ToggleFilters,
    /// No action.
    None,
}

/// Show the top bar. Returns the action triggered (if any).
pub fn show_top_bar(ui: &mut Ui, current: BaseStyle, filters_visible: bool) -> ControlAction {
    let mut action = ControlAction::None;

    ui.horizontal(|ui| {
        ui.heading("Propmap");
        ui.separator();

        // Style switcher; the active button highlight follows the
        // current style, its siblings reset.
        for style in BaseStyle::ALL {
            if ui
                .selectable_label(style == current, style.label())
                .clicked()
            {
                action = ControlAction::SetStyle(style);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.selectable_label(filters_visible, "Filters").clicked() {
                action = ControlAction::ToggleFilters;
            }
        });
    });

    action
}

/// Show the market selector row. Highlight state is derived from the
/// overlay's active id each frame. Returns the clicked market id.
pub fn show_market_buttons(ui: &mut Ui, markets: &MarketOverlay) -> Option<&'static str> {
    let mut clicked = None;

    ui.horizontal_wrapped(|ui| {
        ui.label("Markets:");
        for market in markets.table().iter() {
            let selected = markets.is_active(market.id);
            let response = ui.selectable_label(selected, market.name);
            if response.clicked() {
                clicked = Some(market.id);
            }
        }
    });

    clicked
}
