//! The pdf2clip window.

use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::AppConfig;
use crate::state::{Controller, CopyError};
use eframe::egui;
use pdf2clip_render::{PageRenderer, PdfiumRenderer};
use std::time::Instant;

/// Error dialog state
struct ErrorDialogState {
    title: String,
    message: String,
}

impl From<&CopyError> for ErrorDialogState {
    fn from(error: &CopyError) -> Self {
        Self { title: error.title().to_string(), message: error.to_string() }
    }
}

pub struct Pdf2ClipApp<R = PdfiumRenderer, C = SystemClipboard> {
    config: AppConfig,
    controller: Controller<R, C>,

    // When set, the copy button reads "copied!" and is disabled until this instant
    flash_until: Option<Instant>,

    error_dialog: Option<ErrorDialogState>,
}

impl Pdf2ClipApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let tooltip_delay = config.tooltip_delay.as_secs_f32();
        cc.egui_ctx.style_mut(|style| style.interaction.tooltip_delay = tooltip_delay);

        Self::with_backends(config, PdfiumRenderer::new(), SystemClipboard::new())
    }
}

impl<R: PageRenderer, C: ClipboardSink> Pdf2ClipApp<R, C> {
    pub fn with_backends(config: AppConfig, renderer: R, clipboard: C) -> Self {
        Self {
            config,
            controller: Controller::new(renderer, clipboard),
            flash_until: None,
            error_dialog: None,
        }
    }

    fn show_error(&mut self, error: &CopyError) {
        log::warn!("{}: {}", error.title(), error);
        self.error_dialog = Some(ErrorDialogState::from(error));
    }

    /// Open a PDF file using the file picker
    fn choose_pdf(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("open PDF")
            .add_filter("PDF files", &["pdf"])
            .add_filter("all files", &["*"])
            .pick_file()
        else {
            return;
        };

        if let Err(e) = self.controller.open_document(&path) {
            self.show_error(&e);
        }
    }

    fn copy_page(&mut self) {
        match self.controller.copy_current_page() {
            Ok(_) => self.flash_until = Some(Instant::now() + self.config.flash_duration),
            Err(e) => self.show_error(&e),
        }
    }

    fn is_flashing(&mut self, ctx: &egui::Context) -> bool {
        let Some(until) = self.flash_until else {
            return false;
        };

        let now = Instant::now();
        if now >= until {
            self.flash_until = None;
            return false;
        }

        ctx.request_repaint_after(until - now);
        true
    }
}

impl<R: PageRenderer, C: ClipboardSink> eframe::App for Pdf2ClipApp<R, C> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.draw_main_panel(ctx);
        self.draw_error_dialog(ctx);
    }
}

impl<R: PageRenderer, C: ClipboardSink> Pdf2ClipApp<R, C> {
    fn draw_main_panel(&mut self, ctx: &egui::Context) {
        let flashing = self.is_flashing(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            // Block interaction underneath the modal error window
            ui.add_enabled_ui(self.error_dialog.is_none(), |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(6.0);
                    if ui.button("select PDF…").clicked() {
                        self.choose_pdf();
                    }

                    let path_text = self
                        .controller
                        .document()
                        .map(|d| d.path.display().to_string())
                        .unwrap_or_default();
                    ui.scope(|ui| {
                        ui.set_max_width(self.config.path_wrap_width);
                        ui.add(egui::Label::new(path_text).wrap());
                    });

                    ui.add_space(8.0);
                    self.draw_page_row(ui);
                    ui.label(self.controller.selector().label());

                    ui.add_space(4.0);
                    self.draw_copy_button(ui, flashing);
                });
            });
        });
    }

    fn draw_page_row(&mut self, ui: &mut egui::Ui) {
        // Roughly the width of "–", the entry and "+" side by side
        const ROW_WIDTH: f32 = 110.0;

        ui.allocate_ui_with_layout(
            egui::vec2(ROW_WIDTH, ui.spacing().interact_size.y),
            egui::Layout::left_to_right(egui::Align::Center),
            |ui| {
                if ui.add(egui::Button::new("–").min_size(egui::vec2(22.0, 0.0))).clicked() {
                    self.controller.selector_mut().decrement();
                }

                ui.add(
                    egui::TextEdit::singleline(self.controller.selector_mut().text_mut())
                        .desired_width(48.0)
                        .horizontal_align(egui::Align::Center),
                );

                if ui.add(egui::Button::new("+").min_size(egui::vec2(22.0, 0.0))).clicked() {
                    self.controller.selector_mut().increment();
                }
            },
        );
    }

    fn draw_copy_button(&mut self, ui: &mut egui::Ui, flashing: bool) {
        let text = if flashing { "copied!" } else { "copy page to clipboard" };
        let response = ui
            .add_enabled(!flashing, egui::Button::new(text))
            .on_hover_text(self.controller.last_copied_tooltip())
            .on_disabled_hover_text(self.controller.last_copied_tooltip());

        if response.clicked() {
            self.copy_page();
        }
    }

    fn draw_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(error) = &self.error_dialog else {
            return;
        };

        let title = error.title.clone();
        let message = error.message.clone();

        let mut should_close = ctx.input(|i| {
            i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)
        });

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(12.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.error_dialog = None;
        }
    }
}
