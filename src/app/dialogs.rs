use std::path::PathBuf;

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, ComboBoxText, Dialog, FileChooserAction, FileChooserNative, FileFilter,
    Grid, Label, Orientation, ResponseType, SpinButton, Window,
};

use crate::options::{EcLevel, OptionsRecord, RawOptions};
use crate::ui::LAYOUT_TOKENS;

/// Modal notice at the point of a failing action. Blocks the parent
/// window until dismissed.
pub(super) fn alert(parent: &impl IsA<Window>, title: &str, body: &str) {
    let tokens = LAYOUT_TOKENS;
    let dialog = Dialog::new();
    dialog.set_title(Some(title));
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_resizable(false);
    dialog.add_button("OK", ResponseType::Close);
    dialog.set_default_response(ResponseType::Close);

    let label = Label::new(Some(body));
    label.set_wrap(true);
    label.set_xalign(0.0);
    label.set_max_width_chars(56);

    let content = GtkBox::new(Orientation::Vertical, 0);
    content.set_margin_top(tokens.spacing_12);
    content.set_margin_bottom(tokens.spacing_12);
    content.set_margin_start(tokens.spacing_12);
    content.set_margin_end(tokens.spacing_12);
    content.append(&label);
    dialog.content_area().append(&content);

    dialog.connect_response(|dialog, _| dialog.close());
    install_confirm_cancel_keys(&dialog);
    dialog.present();
}

/// Options editor exposing the four encoding fields. `on_apply` receives
/// the raw record exactly as submitted; clamping happens in the session.
pub(super) fn open_options_dialog<F>(parent: &impl IsA<Window>, current: OptionsRecord, on_apply: F)
where
    F: Fn(RawOptions) + 'static,
{
    let tokens = LAYOUT_TOKENS;
    let dialog = Dialog::new();
    dialog.set_title(Some("QR options"));
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_resizable(false);
    dialog.add_button("Cancel", ResponseType::Cancel);
    dialog.add_button("Apply", ResponseType::Accept);
    dialog.set_default_response(ResponseType::Accept);

    let grid = Grid::new();
    grid.set_row_spacing(tokens.spacing_8 as u32);
    grid.set_column_spacing(tokens.spacing_8 as u32);
    grid.set_margin_top(tokens.spacing_12);
    grid.set_margin_bottom(tokens.spacing_12);
    grid.set_margin_start(tokens.spacing_12);
    grid.set_margin_end(tokens.spacing_12);

    let version_spin = SpinButton::with_range(0.0, 40.0, 1.0);
    version_spin.set_value(f64::from(current.version));
    version_spin.set_width_chars(tokens.spin_input_width_chars);
    version_spin.set_tooltip_text(Some(
        "0 picks the smallest version that fits the text.\n\
         Higher versions hold more data but produce a larger grid.",
    ));
    attach_option_row(&grid, 0, "Version (1\u{2013}40, 0 = auto):", &version_spin);

    let level_combo = ComboBoxText::new();
    for level in EcLevel::ALL {
        level_combo.append_text(level.as_str());
    }
    let active = EcLevel::ALL
        .iter()
        .position(|level| *level == current.error_correction)
        .unwrap_or(1);
    level_combo.set_active(Some(active as u32));
    level_combo.set_tooltip_text(Some(
        "Redundancy: L \u{2248} 7%, M \u{2248} 15%, Q \u{2248} 25%, H \u{2248} 30%.\n\
         Higher survives more damage but needs a denser code.",
    ));
    attach_option_row(&grid, 1, "Error correction:", &level_combo);

    let module_spin = SpinButton::with_range(1.0, 100.0, 1.0);
    module_spin.set_value(f64::from(current.module_size));
    module_spin.set_width_chars(tokens.spin_input_width_chars);
    module_spin.set_tooltip_text(Some(
        "Pixels per module. Larger means a higher resolution image.",
    ));
    attach_option_row(&grid, 2, "Module size (px):", &module_spin);

    let border_spin = SpinButton::with_range(0.0, 20.0, 1.0);
    border_spin.set_value(f64::from(current.border));
    border_spin.set_width_chars(tokens.spin_input_width_chars);
    border_spin.set_tooltip_text(Some(
        "Quiet-zone modules around the code.\n\
         4 is the usual recommendation for reliable scanning.",
    ));
    attach_option_row(&grid, 3, "Border (modules):", &border_spin);

    dialog.content_area().append(&grid);

    dialog.connect_response(move |dialog, response| {
        if response == ResponseType::Accept {
            on_apply(RawOptions {
                version: Some(i64::from(version_spin.value_as_int())),
                error_correction: level_combo.active_text().map(|text| text.to_string()),
                module_size: Some(i64::from(module_spin.value_as_int())),
                border: Some(i64::from(border_spin.value_as_int())),
            });
        }
        dialog.close();
    });
    install_confirm_cancel_keys(&dialog);
    dialog.present();
}

/// Native save-as dialog for the PNG export. The returned handle must be
/// kept alive by the caller until the dialog responds.
pub(super) fn open_save_dialog<F>(parent: &impl IsA<Window>, on_choose: F) -> FileChooserNative
where
    F: Fn(PathBuf) + 'static,
{
    let chooser = FileChooserNative::new(
        Some("Save QR code"),
        Some(parent),
        FileChooserAction::Save,
        Some("Save"),
        Some("Cancel"),
    );
    chooser.set_modal(true);
    chooser.set_current_name("qr-code.png");

    let png_filter = FileFilter::new();
    png_filter.set_name(Some("PNG image"));
    png_filter.add_pattern("*.png");
    chooser.add_filter(&png_filter);

    let all_filter = FileFilter::new();
    all_filter.set_name(Some("All files"));
    all_filter.add_pattern("*");
    chooser.add_filter(&all_filter);

    chooser.connect_response(move |chooser, response| {
        if response != ResponseType::Accept {
            return;
        }
        if let Some(path) = chooser.file().and_then(|file| file.path()) {
            on_choose(path);
        }
    });
    chooser.show();
    chooser
}

fn attach_option_row(grid: &Grid, row: i32, caption: &str, input: &impl IsA<gtk4::Widget>) {
    let label = Label::new(Some(caption));
    label.set_halign(Align::Start);
    label.set_xalign(0.0);
    grid.attach(&label, 0, row, 1, 1);
    input.set_halign(Align::Start);
    grid.attach(input, 1, row, 1, 1);
}

fn install_confirm_cancel_keys(dialog: &Dialog) {
    let dialog_for_keys = dialog.clone();
    let key_controller = gtk4::EventControllerKey::new();
    key_controller.connect_key_pressed(move |_, key, _, _| {
        if key == gtk4::gdk::Key::Return || key == gtk4::gdk::Key::KP_Enter {
            dialog_for_keys.response(ResponseType::Accept);
            return gtk4::glib::Propagation::Stop;
        }
        if key == gtk4::gdk::Key::Escape {
            dialog_for_keys.response(ResponseType::Cancel);
            return gtk4::glib::Propagation::Stop;
        }
        gtk4::glib::Propagation::Proceed
    });
    dialog.add_controller(key_controller);
}
