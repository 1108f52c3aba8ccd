use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use image::ImageReader;
use question_reader_common::capture::{ANSWER_HEADING, LOADING_TEXT, TITLE};
use question_reader_common::Outcome;

use crate::io::{ask_via_cli, resolve_cli_binary, IMAGE_EXTENSIONS};
use crate::model::AppState;

const PREVIEW_SIZE: (u32, u32) = (480, 360);

pub struct DesktopApp {
    state: AppState,
    status: String,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
    preview: Option<egui::TextureHandle>,
    preview_for: Option<String>,
    pending_preview: Option<PreviewData>,
}

enum UiMessage {
    AnalyzeDone { outcome: Outcome },
    Preview(PreviewData),
}

struct PreviewData {
    path: String,
    size: [usize; 2],
    pixels: Vec<u8>,
}

impl DesktopApp {
    fn pick_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.run_analyze(path);
    }

    fn run_analyze(&mut self, path: PathBuf) {
        if !self.state.start(path.clone()) {
            return;
        }
        self.status.clear();
        self.preview = None;
        self.preview_for = Some(path.to_string_lossy().into_owned());
        self.request_preview(path.clone());

        let cli = resolve_cli_binary();
        let tx = self.tx.clone();
        tracing::debug!(cli = %cli.display(), image = %path.display(), "starting analysis");

        std::thread::spawn(move || {
            let outcome = match ask_via_cli(&cli, &path) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(error = %err, "cli invocation failed");
                    Outcome::TransportError(err.to_string())
                }
            };
            let _ = tx.send(UiMessage::AnalyzeDone { outcome });
        });
    }

    fn request_preview(&self, path: PathBuf) {
        let sender = self.tx.clone();
        std::thread::spawn(move || {
            let image = ImageReader::open(&path)
                .ok()
                .and_then(|r| r.with_guessed_format().ok())
                .and_then(|r| r.decode().ok());
            let Some(image) = image else {
                return;
            };
            let thumb = image.thumbnail(PREVIEW_SIZE.0, PREVIEW_SIZE.1);
            let size = [thumb.width() as usize, thumb.height() as usize];
            let pixels = thumb.to_rgba8().into_raw();
            let _ = sender.send(UiMessage::Preview(PreviewData {
                path: path.to_string_lossy().into_owned(),
                size,
                pixels,
            }));
        });
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::AnalyzeDone { outcome } => {
                    if let Outcome::DecodeError(detail) | Outcome::TransportError(detail) = &outcome {
                        self.status = format!("{}: {}", outcome.kind(), detail);
                    }
                    self.state.complete(outcome);
                }
                UiMessage::Preview(data) => self.pending_preview = Some(data),
            }
        }
    }

    fn process_pending_preview(&mut self, ctx: &egui::Context) {
        let Some(data) = self.pending_preview.take() else {
            return;
        };
        if data.size[0] == 0 || data.size[1] == 0 {
            return;
        }
        // 別の画像へ切り替わっていたら捨てる
        if self.preview_for.as_deref() != Some(data.path.as_str()) {
            return;
        }
        let color_image = egui::ColorImage::from_rgba_unmultiplied(data.size, &data.pixels);
        self.preview = Some(ctx.load_texture(&data.path, color_image, egui::TextureOptions::default()));
    }

    fn render_answer(&self, ui: &mut egui::Ui) {
        let Some(answer) = self.state.session.answer() else {
            return;
        };
        let frame = egui::Frame::none()
            .fill(Color32::from_rgb(24, 28, 40))
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(40)))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(12.0));

        frame.show(ui, |ui| {
            ui.set_max_width(560.0);
            ui.label(RichText::new(ANSWER_HEADING).strong().size(18.0));
            ui.add_space(6.0);
            // 改行をそのまま残す
            ui.add(egui::Label::new(RichText::new(answer).monospace()).wrap(true));
        });
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("cjk_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("cjk_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .push("cjk_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            status: String::new(),
            tx,
            rx,
            preview: None,
            preview_for: None,
            pending_preview: None,
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.session.is_loading() || self.pending_preview.is_some() {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.process_pending_preview(ctx);

        if !self.status.is_empty() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.heading(TITLE);
                    ui.add_space(16.0);

                    let label = self.state.device.action_label();
                    let button = egui::Button::new(RichText::new(label).size(16.0));
                    if ui.add_enabled(self.state.can_capture(), button).clicked() {
                        self.pick_image();
                    }

                    if let Some(texture) = &self.preview {
                        ui.add_space(12.0);
                        ui.add(egui::Image::new(texture).max_size(egui::vec2(
                            PREVIEW_SIZE.0 as f32,
                            PREVIEW_SIZE.1 as f32,
                        )));
                    }

                    if self.state.session.is_loading() {
                        ui.add_space(12.0);
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(LOADING_TEXT);
                        });
                    }

                    ui.add_space(20.0);
                    self.render_answer(ui);
                });
            });
        });
    }
}
