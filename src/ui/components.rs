// Reusable UI components
// Message rows, the thinking placeholder, and the floating controls

use eframe::egui;

use crate::state::{Message, Role};

/// Text shown in the transient placeholder while a send is outstanding
pub const THINKING_TEXT: &str = "Thinking…";

/// Avatar glyph for bot messages
const BOT_AVATAR: &str = "🤖";

/// Avatar glyph for user messages
const USER_AVATAR: &str = "🧑";

/// Render one chat message with its role-appropriate avatar placement:
/// avatar on the left for bot messages, on the right for user messages
pub fn message_row(ui: &mut egui::Ui, message: &Message) {
    match message.role {
        Role::Bot => {
            ui.horizontal_top(|ui| {
                avatar(ui, BOT_AVATAR);
                bubble(ui, &message.content);
            });
        }
        Role::User => {
            // Right-to-left so the avatar hugs the right edge.
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                avatar(ui, USER_AVATAR);
                bubble(ui, &message.content);
            });
        }
    }
}

/// Render the transient placeholder on the bot side of the view
pub fn thinking_row(ui: &mut egui::Ui) {
    ui.horizontal_top(|ui| {
        avatar(ui, BOT_AVATAR);
        ui.label(egui::RichText::new(THINKING_TEXT).italics().weak());
    });
}

/// Render the session badge; returns the response so the caller can
/// open the history view on click
pub fn session_badge(ui: &mut egui::Ui, session_id: &str) -> egui::Response {
    let text = egui::RichText::new(format!("sid: {}", session_id))
        .monospace()
        .size(12.0)
        .color(egui::Color32::from_rgb(0, 200, 0));
    ui.add(
        egui::Button::new(text)
            .fill(egui::Color32::from_rgb(34, 34, 34))
            .rounding(egui::Rounding::same(6.0)),
    )
    .on_hover_text("Open the session history in your browser")
}

/// Render the floating theme-toggle button
pub fn theme_button(ui: &mut egui::Ui) -> egui::Response {
    ui.button("🌓").on_hover_text("Toggle light/dark theme")
}

fn avatar(ui: &mut egui::Ui, glyph: &str) {
    ui.label(egui::RichText::new(glyph).size(20.0));
}

fn bubble(ui: &mut egui::Ui, content: &str) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(egui::Margin::symmetric(8.0, 6.0))
        .show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.8);
            ui.label(content);
        });
}
