use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, DrawingArea, FileChooserNative,
    Frame, Label, Orientation, PolicyType, ScrolledWindow, TextBuffer, TextView, WrapMode,
};

mod dialogs;
mod render;
mod session;

pub use session::GeneratorSession;

use crate::config::{self, PersistedConfig, WindowGeometry, WindowState, DEFAULT_GEOMETRY};
use crate::error::AppResult;
use crate::generate::GenerateError;
use crate::notification;
use crate::preview;
use crate::ui::LAYOUT_TOKENS;

const APP_ID: &str = "com.github.qrsmith";
const WINDOW_TITLE: &str = "QR Code Generator";
const WINDOW_ICON_NAME: &str = "qrsmith";
const FALLBACK_POSITION: (i32, i32) = (80, 60);

pub struct App {
    config: PersistedConfig,
}

impl App {
    /// Loads persisted settings eagerly: the initial window geometry
    /// depends on them.
    pub fn new() -> Self {
        Self {
            config: config::load(),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let startup = self.config.clone();
        tracing::info!(
            options = ?startup.options,
            maximized = startup.window.maximized,
            "starting gtk runtime"
        );

        let application = Application::new(Some(APP_ID), gtk4::gio::ApplicationFlags::NON_UNIQUE);
        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            build_main_window(app, &startup);
        });

        let no_args: [&str; 0] = [];
        application.run_with_args(&no_args);
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn build_main_window(app: &Application, startup: &PersistedConfig) {
    let tokens = LAYOUT_TOKENS;
    let session = Rc::new(RefCell::new(GeneratorSession::new(startup.options)));

    let window = ApplicationWindow::new(app);
    window.set_title(Some(WINDOW_TITLE));
    // Theme lookup; silently absent when the icon is not installed.
    window.set_icon_name(Some(WINDOW_ICON_NAME));
    window.set_size_request(tokens.window_min_width, tokens.window_min_height);

    let geometry = startup
        .window
        .geometry
        .as_deref()
        .and_then(WindowGeometry::parse)
        .or_else(|| WindowGeometry::parse(DEFAULT_GEOMETRY));
    if let Some(geometry) = geometry {
        window.set_default_size(geometry.width, geometry.height);
    }
    // GTK4 cannot reposition windows; the position half of the descriptor
    // is carried through to the next save unchanged.
    let stored_position = geometry
        .map(|geometry| (geometry.x, geometry.y))
        .unwrap_or(FALLBACK_POSITION);

    let header = Label::new(None);
    header.set_markup("<b>Text \u{2192} QR code</b>");
    header.set_halign(Align::Start);
    header.set_xalign(0.0);

    let text_view = TextView::new();
    text_view.set_wrap_mode(WrapMode::Word);
    let text_scroll = ScrolledWindow::new();
    text_scroll.set_policy(PolicyType::Automatic, PolicyType::Automatic);
    text_scroll.set_min_content_height(tokens.text_input_min_height);
    text_scroll.set_child(Some(&text_view));

    let generate_button = Button::with_label("Generate");
    let save_button = Button::with_label("Save\u{2026}");
    save_button.set_sensitive(false);
    let options_button = Button::with_label("Options\u{2026}");
    let button_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    button_row.append(&generate_button);
    button_row.append(&save_button);
    button_row.append(&options_button);

    let preview_area = DrawingArea::new();
    preview_area.set_hexpand(true);
    preview_area.set_vexpand(true);
    let preview_frame = Frame::new(Some("Preview"));
    preview_frame.set_vexpand(true);
    preview_frame.set_child(Some(&preview_area));

    let root = GtkBox::new(Orientation::Vertical, tokens.spacing_12);
    root.set_margin_top(tokens.spacing_12);
    root.set_margin_bottom(tokens.spacing_12);
    root.set_margin_start(tokens.spacing_12);
    root.set_margin_end(tokens.spacing_12);
    root.append(&header);
    root.append(&text_scroll);
    root.append(&button_row);
    root.append(&preview_frame);
    window.set_child(Some(&root));

    // The preview is recomputed from the live artifact on every draw, and
    // GTK redraws on every resize, so there is no cached preview image to
    // invalidate.
    {
        let session = session.clone();
        preview_area.set_draw_func(move |_, context, width, height| {
            let session = session.borrow();
            let Some(artifact) = session.artifact() else {
                return;
            };
            let preview = preview::scale(artifact, width, height);
            render::draw_preview(context, width, height, &preview);
        });
    }

    {
        let session = session.clone();
        let window = window.clone();
        let save_button = save_button.clone();
        let preview_area = preview_area.clone();
        let buffer = text_view.buffer();
        generate_button.connect_clicked(move |_| {
            run_generation(
                &session,
                &window,
                &save_button,
                &preview_area,
                &buffer_text(&buffer),
            );
        });
    }

    let save_dialog_holder: Rc<RefCell<Option<FileChooserNative>>> = Rc::new(RefCell::new(None));
    {
        let session = session.clone();
        let window = window.clone();
        let save_dialog_holder = save_dialog_holder.clone();
        save_button.connect_clicked(move |_| {
            let session = session.clone();
            let window_for_result = window.clone();
            let chooser = dialogs::open_save_dialog(&window, move |path| {
                match session.borrow().export(&path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "exported artifact");
                        notification::send(format!("QR code saved to {}", path.display()));
                    }
                    Err(err) => {
                        dialogs::alert(&window_for_result, "Save failed", &err.to_string());
                    }
                }
            });
            save_dialog_holder.replace(Some(chooser));
        });
    }

    {
        let session = session.clone();
        let window = window.clone();
        let save_button = save_button.clone();
        let preview_area = preview_area.clone();
        let buffer = text_view.buffer();
        options_button.connect_clicked(move |_| {
            let current = *session.borrow().options();
            let session = session.clone();
            let window_for_apply = window.clone();
            let save_button = save_button.clone();
            let preview_area = preview_area.clone();
            let buffer = buffer.clone();
            dialogs::open_options_dialog(&window, current, move |raw| {
                let applied = session.borrow_mut().apply_options(&raw);
                tracing::info!(?applied, "applied options");
                // An existing artifact is regenerated under the new options
                // right away, exactly like pressing Generate again.
                if session.borrow().has_artifact() {
                    run_generation(
                        &session,
                        &window_for_apply,
                        &save_button,
                        &preview_area,
                        &buffer_text(&buffer),
                    );
                }
            });
        });
    }

    {
        let window_for_keys = window.clone();
        let key_controller = gtk4::EventControllerKey::new();
        key_controller.connect_key_pressed(move |_, key, _, _| {
            if key == gtk4::gdk::Key::F11 {
                if window_for_keys.is_maximized() {
                    window_for_keys.unmaximize();
                } else {
                    window_for_keys.maximize();
                }
                return gtk4::glib::Propagation::Stop;
            }
            if key == gtk4::gdk::Key::Escape && window_for_keys.is_maximized() {
                window_for_keys.unmaximize();
                return gtk4::glib::Propagation::Stop;
            }
            gtk4::glib::Propagation::Proceed
        });
        window.add_controller(key_controller);
    }

    if startup.window.maximized {
        window.maximize();
    }

    // Settings are written exactly once, from the live state at close.
    {
        let session = session.clone();
        window.connect_close_request(move |window| {
            let maximized = window.is_maximized();
            let (width, height) = window.default_size();
            let geometry = WindowGeometry {
                width,
                height,
                x: stored_position.0,
                y: stored_position.1,
            };
            config::save(&PersistedConfig {
                window: WindowState {
                    maximized,
                    geometry: (!maximized).then(|| geometry.to_string()),
                },
                options: *session.borrow().options(),
            });
            tracing::info!(maximized, "persisted settings on shutdown");
            gtk4::glib::Propagation::Proceed
        });
    }

    window.present();
}

fn buffer_text(buffer: &TextBuffer) -> String {
    buffer
        .text(&buffer.start_iter(), &buffer.end_iter(), false)
        .to_string()
}

fn run_generation(
    session: &Rc<RefCell<GeneratorSession>>,
    window: &ApplicationWindow,
    save_button: &Button,
    preview_area: &DrawingArea,
    text: &str,
) {
    let outcome = session
        .borrow_mut()
        .generate(text)
        .map(|artifact| (artifact.width(), artifact.height()));

    match outcome {
        Ok((width, height)) => {
            tracing::info!(width, height, "generated artifact");
            save_button.set_sensitive(true);
            preview_area.queue_draw();
        }
        Err(GenerateError::EmptyInput) => {
            dialogs::alert(
                window,
                "Nothing to encode",
                "Type the text that should go into the QR code first.",
            );
        }
        Err(err) => {
            dialogs::alert(window, "Generation failed", &err.to_string());
        }
    }
}
