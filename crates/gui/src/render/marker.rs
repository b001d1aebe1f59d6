//! The property marker pin and its tooltip popup.

use egui::{Align2, Color32, FontId, Pos2, Rect, Response, RichText, Sense, Stroke, Ui, Vec2};
use walkers::{lon_lat, MapMemory, Plugin, Projector};

use propmap_core::{PropertyInfo, TooltipInfo};

const PIN_COLOR: Color32 = Color32::from_rgb(0x06, 0x4A, 0x4B);
const PIN_ACCENT: Color32 = Color32::from_rgb(0x23, 0xF1, 0xE0);

const PIN_HEAD_RADIUS: f32 = 9.0;
const PIN_HEIGHT: f32 = 22.0;
const POPUP_OFFSET: f32 = 28.0;

/// Plugin drawing the pin at the property position; clicking it toggles
/// the tooltip popup, clicking anywhere else closes it.
pub struct PropertyMarker<'a> {
    pub info: &'a PropertyInfo,
    pub open: &'a mut bool,
}

impl Plugin for PropertyMarker<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let position = self.info.position;
        let projected = projector.project(lon_lat(position.lon, position.lat));
        // The pin's tip sits on the coordinate (bottom anchor).
        let tip = egui::pos2(projected.x, projected.y);
        let head = tip - egui::vec2(0.0, PIN_HEIGHT - PIN_HEAD_RADIUS / 2.0);

        draw_pin(ui, tip, head);

        let hit = Rect::from_center_size(
            tip - egui::vec2(0.0, PIN_HEIGHT / 2.0),
            Vec2::new(PIN_HEAD_RADIUS * 2.0 + 8.0, PIN_HEIGHT + 10.0),
        );
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                *self.open = if hit.contains(pointer) {
                    !*self.open
                } else {
                    false
                };
            }
        }

        if *self.open {
            show_tooltip(ui, tip, self.info);
        }
    }
}

fn draw_pin(ui: &mut Ui, tip: Pos2, head: Pos2) {
    let painter = ui.painter();

    painter.add(egui::Shape::convex_polygon(
        vec![
            head + egui::vec2(-PIN_HEAD_RADIUS * 0.7, 3.0),
            head + egui::vec2(PIN_HEAD_RADIUS * 0.7, 3.0),
            tip,
        ],
        PIN_COLOR,
        Stroke::NONE,
    ));
    painter.circle_filled(head, PIN_HEAD_RADIUS, PIN_COLOR);
    painter.circle_stroke(head, PIN_HEAD_RADIUS, Stroke::new(1.5, Color32::WHITE));
    painter.circle_filled(head, PIN_HEAD_RADIUS * 0.4, PIN_ACCENT);
}

fn show_tooltip(ui: &Ui, tip: Pos2, info: &PropertyInfo) {
    egui::Area::new(egui::Id::new("property-tooltip"))
        .order(egui::Order::Foreground)
        .pivot(Align2::CENTER_BOTTOM)
        .fixed_pos(tip - egui::vec2(0.0, POPUP_OFFSET))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(320.0);
                ui.horizontal_top(|ui| {
                    tooltip_media(ui, &info.tooltip);
                    tooltip_text(ui, &info.tooltip);
                });
            });
        });
}

/// Image block with the badge overlay; skipped entirely without an image.
fn tooltip_media(ui: &mut Ui, tooltip: &TooltipInfo) {
    let Some(_image) = &tooltip.image else {
        return;
    };

    let (rect, _) = ui.allocate_exact_size(Vec2::splat(72.0), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 6.0, Color32::from_gray(55));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "🏢",
        FontId::proportional(28.0),
        Color32::from_gray(160),
    );

    if let Some(badge) = &tooltip.badge {
        let badge_pos = rect.left_top() + egui::vec2(4.0, 4.0);
        let galley = painter.layout_no_wrap(
            badge.clone(),
            FontId::proportional(10.0),
            Color32::BLACK,
        );
        let badge_rect = Rect::from_min_size(badge_pos, galley.size() + egui::vec2(8.0, 4.0));
        painter.rect_filled(badge_rect, 3.0, PIN_ACCENT);
        painter.galley(badge_pos + egui::vec2(4.0, 2.0), galley, Color32::BLACK);
    }
}

fn tooltip_text(ui: &mut Ui, tooltip: &TooltipInfo) {
    ui.vertical(|ui| {
        if let Some(kicker) = &tooltip.kicker {
            ui.label(RichText::new(kicker).size(11.0).weak());
        }

        if let Some(metric) = &tooltip.metric {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                ui.label(RichText::new(metric).size(20.0).strong());
                if let Some(unit) = &tooltip.unit {
                    ui.label(RichText::new(unit).size(12.0).weak());
                }
            });
        }

        if let Some(title) = &tooltip.title {
            ui.label(RichText::new(title).strong());
        }

        if let Some(description) = &tooltip.description {
            for line in description.lines() {
                ui.label(RichText::new(line).size(11.0).weak());
            }
        }
    });
}
