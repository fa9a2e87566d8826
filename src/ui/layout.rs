// Main application layout
// Renders the message list, input bar, and floating controls, and
// reports user intents back to the app as actions

use eframe::egui;

use crate::state::ChatState;
use crate::ui::components::*;

/// Data for the floating session badge
pub struct BadgeView {
    /// Session identifier shown on the badge
    pub session_id: String,
    /// Diagnostic history URL opened when the badge is clicked
    pub history_url: String,
}

/// Everything the layout needs to render one frame
pub struct ChatView<'a> {
    /// Chat view model
    pub state: &'a ChatState,
    /// Draft text bound to the input field
    pub input: &'a mut String,
    /// Session badge, once a session identifier is known
    pub badge: Option<BadgeView>,
    /// Whether an IME composition touched this frame (suppresses Enter)
    pub ime_active: bool,
    /// Messages rendered last frame, used to auto-scroll on growth
    pub last_message_count: &'a mut usize,
}

/// User intents gathered during one frame, applied by the caller
#[derive(Default)]
pub struct ChatActions {
    /// The user asked to send the current input
    pub send_requested: bool,
    /// The user clicked the theme toggle
    pub theme_toggled: bool,
}

/// Render the full chat layout and collect the frame's actions
pub fn render_app_layout(ctx: &egui::Context, mut view: ChatView<'_>) -> ChatActions {
    let mut actions = ChatActions::default();

    render_input_bar(ctx, &mut view, &mut actions);
    render_message_list(ctx, &mut view);
    render_theme_toggle(ctx, &mut actions);
    render_session_badge(ctx, &view);

    actions
}

/// Render the bottom input bar with the send button
///
/// Enter without Shift sends; Shift+Enter falls through to the text
/// edit as a newline. The Enter key is ignored entirely while an IME
/// composition is active, so confirming a composition never sends.
fn render_input_bar(ctx: &egui::Context, view: &mut ChatView<'_>, actions: &mut ChatActions) {
    egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let input_id = egui::Id::new("chat_input");
            let had_focus = ctx.memory(|m| m.has_focus(input_id));

            // Claim the Enter key before the text edit sees it, so a
            // send does not also insert a newline. Shift+Enter is left
            // alone and becomes a newline.
            let enter_pressed = had_focus
                && !view.ime_active
                && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

            let send_enabled = !view.state.in_flight;
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let send_clicked = ui
                    .add_enabled(send_enabled, egui::Button::new("Send"))
                    .clicked();

                let response = ui.add_sized(
                    ui.available_size(),
                    egui::TextEdit::multiline(view.input)
                        .id(input_id)
                        .desired_rows(1)
                        .hint_text("Type a message"),
                );

                if enter_pressed || send_clicked {
                    actions.send_requested = true;
                    response.request_focus();
                }
            });
        });
        ui.add_space(6.0);
    });
}

/// Render the scrollable message list, auto-scrolling to the newest
/// entry whenever a message is appended
fn render_message_list(ctx: &egui::Context, view: &mut ChatView<'_>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .id_source("chat_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(4.0);
                for message in &view.state.messages {
                    message_row(ui, message);
                    ui.add_space(6.0);
                }
                if view.state.thinking {
                    thinking_row(ui);
                    ui.add_space(6.0);
                }

                // Track the message count, not the placeholder: when a
                // reply replaces the placeholder the row total stays
                // the same, but the new message must still be brought
                // into view.
                let count = view.state.messages.len();
                if count != *view.last_message_count {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    *view.last_message_count = count;
                }
            });
    });
}

/// Render the floating theme toggle in the top-right corner
fn render_theme_toggle(ctx: &egui::Context, actions: &mut ChatActions) {
    egui::Area::new(egui::Id::new("theme_toggle"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            if theme_button(ui).clicked() {
                actions.theme_toggled = true;
            }
        });
}

/// Render the floating session badge in the bottom-right corner
fn render_session_badge(ctx: &egui::Context, view: &ChatView<'_>) {
    let Some(badge) = &view.badge else {
        return;
    };

    egui::Area::new(egui::Id::new("session_badge"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
        .show(ctx, |ui| {
            if session_badge(ui, &badge.session_id).clicked() {
                ctx.output_mut(|o| {
                    o.open_url = Some(egui::OpenUrl::new_tab(&badge.history_url));
                });
            }
        });
}
