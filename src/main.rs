// Chatbox GUI - Main Entry Point
// Native chat client for the chatbox backend

mod net;
mod state;
mod ui;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use net::ChatClient;
use state::{ChatState, SendOutcome, ThemePreference};
use ui::{BadgeView, ChatView};

/// Key under which the theme preference is persisted
const THEME_STORAGE_KEY: &str = "chat_theme";

/// Default backend address, overridable via `CHATBOX_SERVER_URL`
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

fn main() -> eframe::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Chatbox")
            .with_inner_size([480.0, 640.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Chatbox",
        options,
        Box::new(|cc| Box::new(ChatApp::new(cc))),
    )
}

/// Main application struct
///
/// Owns the chat view model, the input draft, and the transport. The
/// network call runs on a background tokio task; its outcome comes back
/// over `pending`, which the update loop polls, so the UI thread never
/// blocks on the request.
struct ChatApp {
    /// Chat view model
    state: ChatState,
    /// Draft text in the input field
    input: String,
    /// Current theme preference
    theme: ThemePreference,
    /// Whether an IME composition is in progress
    ime_composing: bool,
    /// HTTP client shared with background send tasks
    client: Arc<ChatClient>,
    /// Async runtime driving the network calls
    runtime: tokio::runtime::Runtime,
    /// Receiver for the outcome of the outstanding send, if any
    pending: Option<mpsc::Receiver<SendOutcome>>,
    /// Messages rendered last frame, used by the layout to auto-scroll
    last_message_count: usize,
}

impl ChatApp {
    /// Create the application, restoring the persisted theme preference
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = cc
            .storage
            .and_then(|storage| eframe::get_value::<ThemePreference>(storage, THEME_STORAGE_KEY))
            .unwrap_or_default();
        cc.egui_ctx.set_visuals(theme.visuals());

        let server_url =
            std::env::var("CHATBOX_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        tracing::info!(server_url = %server_url, "Starting Chatbox");

        let client = ChatClient::new(server_url).expect("failed to build HTTP client");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to start async runtime");

        Self {
            state: ChatState::new(),
            input: String::new(),
            theme,
            ime_composing: false,
            client: Arc::new(client),
            runtime,
            pending: None,
            last_message_count: 0,
        }
    }

    /// Track IME composition state from this frame's input events
    ///
    /// Returns whether the Enter key belongs to the IME this frame:
    /// while a composition is in progress, and on the frame that
    /// confirms one, where the confirming Enter can arrive together
    /// with the composition end event. Neither may trigger a send.
    fn track_ime(&mut self, ctx: &egui::Context) -> bool {
        let mut ended_this_frame = false;
        ctx.input(|input| {
            for event in &input.events {
                match event {
                    egui::Event::CompositionStart | egui::Event::CompositionUpdate(_) => {
                        self.ime_composing = true;
                    }
                    egui::Event::CompositionEnd(_) => {
                        self.ime_composing = false;
                        ended_this_frame = true;
                    }
                    _ => {}
                }
            }
        });
        self.ime_composing || ended_this_frame
    }

    /// Poll the outstanding send, if any
    ///
    /// Every way the background task can end funnels into
    /// `finish_send`: a delivered outcome, or a dropped channel if the
    /// task died before sending one. Either way the in-flight flag is
    /// cleared and the send control re-enabled.
    fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.pending else {
            return;
        };

        match receiver.try_recv() {
            Ok(outcome) => {
                self.state.finish_send(outcome);
                self.pending = None;
            }
            Err(mpsc::TryRecvError::Empty) => {
                // Keep repainting while we wait for the response.
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.state.finish_send(SendOutcome::Failed {
                    message: "response channel closed".to_string(),
                });
                self.pending = None;
            }
        }
    }

    /// Start a send for the current input, if the guard allows one
    fn trigger_send(&mut self, ctx: &egui::Context) {
        let Some(text) = self.state.begin_send(&self.input) else {
            return;
        };
        self.input.clear();

        let (sender, receiver) = mpsc::channel();
        self.pending = Some(receiver);

        let client = Arc::clone(&self.client);
        let repaint_ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = client.send_message_outcome(&text).await;
            let _ = sender.send(outcome);
            repaint_ctx.request_repaint();
        });
    }

    /// Flip the theme, apply it, and persist the new preference
    fn toggle_theme(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.theme = self.theme.toggled();
        ctx.set_visuals(self.theme.visuals());

        if let Some(storage) = frame.storage_mut() {
            eframe::set_value(storage, THEME_STORAGE_KEY, &self.theme);
            storage.flush();
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let ime_active = self.track_ime(ctx);
        self.poll_pending(ctx);

        let badge = self.state.session_id.as_ref().map(|sid| BadgeView {
            session_id: sid.clone(),
            history_url: self.client.history_url(sid),
        });

        let actions = ui::render_app_layout(
            ctx,
            ChatView {
                state: &self.state,
                input: &mut self.input,
                badge,
                ime_active,
                last_message_count: &mut self.last_message_count,
            },
        );

        if actions.send_requested {
            self.trigger_send(ctx);
        }
        if actions.theme_toggled {
            self.toggle_theme(ctx, frame);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, THEME_STORAGE_KEY, &self.theme);
    }
}
