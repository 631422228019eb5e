use super::preview;
use super::{InsuraUploader, Notice};
use crate::config::ViewerMode;
use crate::report::{Block, FraudRisk, ReportModel, ReportSection};
use crate::upload::ProcessingStatus;
use crate::utils::color::{self, palette, risk_color, status_color};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align, Color32, Layout, RichText};
use rfd::FileDialog;
use tracing::warn;

enum FileAction {
    Select(String),
    Remove(String),
}

impl InsuraUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| self.render_header(ui));
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.render_footer(ui));
        egui::SidePanel::left("files_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.render_files(ui));
        if self.session.viewer.is_panel_open() {
            egui::SidePanel::right("report_panel")
                .resizable(true)
                .default_width(440.0)
                .show(ctx, |ui| self.render_report_panel(ui));
        }
        egui::CentralPanel::default().show(ctx, |ui| self.render_preview(ui));
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("InsuraGenie");
            ui.label(
                RichText::new("Claim document validation and fraud screening")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let label = if self.session.viewer.is_panel_open() {
                    "Hide Report"
                } else {
                    "📋 Show Report"
                };
                if ui.button(label).clicked() {
                    self.session.viewer.toggle_panel();
                }
                ui.label(RichText::new(self.session.upload_url()).small().weak());
            });
        });
        ui.add_space(8.0);
    }

    fn render_files(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("📄 Add Files").clicked() {
                self.pick_files();
            }
            if ui.button("📁 Add Folder").clicked() {
                self.pick_folder();
            }
        });

        let accepted: Vec<String> = self
            .session
            .policy()
            .allowed_extensions()
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect();
        ui.label(
            RichText::new(format!("{}. Drag and drop works too.", accepted.join(", ")))
                .small()
                .weak(),
        );
        ui.add_space(8.0);

        let selected = self.session.viewer.selected_file_id().map(str::to_string);
        let mut action = None;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 180.0).max(120.0))
            .show(ui, |ui| {
                if self.session.registry.is_empty() {
                    ui.label(RichText::new("No documents selected").weak());
                }
                for entry in self.session.registry.entries() {
                    ui.horizontal(|ui| {
                        status_badge(ui, entry.status);
                        let is_selected = selected.as_deref() == Some(entry.id.as_str());
                        if ui
                            .selectable_label(is_selected, &entry.file.name)
                            .on_hover_text(format_size(entry.file.size()))
                            .clicked()
                        {
                            action = Some(FileAction::Select(entry.id.clone()));
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let remove = egui::Button::new("✕").small();
                            if ui
                                .add_enabled(!entry.status.is_in_flight(), remove)
                                .on_hover_text("Remove")
                                .clicked()
                            {
                                action = Some(FileAction::Remove(entry.id.clone()));
                            }
                        });
                    });
                }
            });

        match action {
            Some(FileAction::Select(id)) => self.session.select_file(&id),
            Some(FileAction::Remove(id)) => self.session.remove_file(&id),
            None => {}
        }

        ui.separator();
        let summary = self.session.registry.summary();
        ui.vertical_centered(|ui| {
            if self.session.is_uploading() {
                let button = egui::Button::new("⏹ Cancel Upload").min_size(egui::vec2(200.0, 36.0));
                if ui.add(button).clicked() {
                    self.session.cancel_upload();
                }
            } else {
                ui.add_enabled_ui(self.session.can_upload(), |ui| {
                    let label = if summary.finished() > 0 {
                        "🔄 Process Again"
                    } else {
                        "📤 Process Documents"
                    };
                    let button = egui::Button::new(label).min_size(egui::vec2(200.0, 36.0));
                    if ui.add(button).clicked() {
                        self.session.start_upload();
                    }
                });
            }
        });

        if summary.total > 0 {
            ui.add_space(6.0);
            let progress_bar = egui::ProgressBar::new(summary.progress_fraction())
                .show_percentage()
                .animate(self.session.is_uploading())
                .fill(palette(color::PURPLE));
            ui.add(progress_bar);
            ui.label(RichText::new(summary.status_text()).small());
        }

        self.render_selection_errors(ui);
    }

    fn render_selection_errors(&mut self, ui: &mut egui::Ui) {
        if self.session.selection_errors.is_empty() {
            return;
        }
        ui.separator();
        let count = self.session.selection_errors.len();
        ui.horizontal(|ui| {
            ui.colored_label(palette(color::ORANGE), format!("{} not added", count));
            let label = if self.show_selection_errors {
                "Hide Details"
            } else {
                "Show Details"
            };
            if ui.small_button(label).clicked() {
                self.show_selection_errors = !self.show_selection_errors;
            }
            if ui.small_button("Dismiss").clicked() {
                self.session.selection_errors.clear();
            }
        });

        if self.show_selection_errors {
            for error in &self.session.selection_errors {
                ui.label(RichText::new(format!("⏩ {}", error)).small());
            }
        }
    }

    fn render_report_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("Validation Report");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").clicked() {
                    self.session.viewer.close_panel();
                }
            });
        });
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| render_report(ui, &self.session.report));
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let entry = self
            .session
            .viewer
            .selected_entry(&self.session.registry)
            .filter(|_| self.session.viewer.preview_visible());
        let Some(entry) = entry else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Select a document to preview it, or drop files here to add them")
                        .weak(),
                );
            });
            return;
        };

        let mut close = false;
        ui.horizontal(|ui| {
            ui.heading(&entry.file.name);
            status_badge(ui, entry.status);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close preview").clicked() {
                    close = true;
                }
                if ui.button("Open externally").clicked() {
                    if let Err(e) = open::that(&entry.file.path) {
                        warn!(path = %entry.file.path.display(), error = %e, "Could not open document");
                    }
                }
            });
        });
        ui.label(
            RichText::new(format!("{} · {}", entry.file.mime, format_size(entry.file.size())))
                .small()
                .weak(),
        );
        ui.separator();

        let ctx = ui.ctx().clone();
        match self
            .previews
            .get_or_acquire(&entry.id, || preview::load_texture(&ctx, &entry.file))
        {
            Some(texture) => {
                ui.add(egui::Image::from_texture(texture).shrink_to_fit());
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("No inline preview for this document type. Use \"Open externally\" to view it.");
                });
            }
        }

        if close {
            match self.session.viewer.mode() {
                ViewerMode::Combined => self.session.viewer.close_panel(),
                ViewerMode::Split => self.session.viewer.clear_selection(),
            }
            self.previews.release();
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        match &self.session.notice {
            Some(Notice::Error(message)) => {
                ui.colored_label(palette(color::RED), message);
            }
            Some(Notice::Info(message)) => {
                ui.colored_label(palette(color::GREEN), message);
            }
            None if self.session.is_uploading() => {
                ui.label("📤 Uploading and analyzing documents...");
            }
            None => {
                ui.label(RichText::new("Ready").weak());
            }
        }
        ui.add_space(4.0);
    }

    fn pick_files(&mut self) {
        let extensions: Vec<&str> = self
            .session
            .policy()
            .allowed_extensions()
            .iter()
            .map(String::as_str)
            .collect();
        if let Some(paths) = FileDialog::new()
            .add_filter("Documents", &extensions)
            .pick_files()
        {
            self.session.add_paths(&paths);
        }
    }

    fn pick_folder(&mut self) {
        if let Some(folder) = FileDialog::new().pick_folder() {
            self.session.add_folder(&folder);
        }
    }
}

fn status_badge(ui: &mut egui::Ui, status: ProcessingStatus) {
    ui.label(
        RichText::new(format!(" {} ", status.label()))
            .small()
            .color(Color32::BLACK)
            .background_color(status_color(status)),
    );
}

fn render_report(ui: &mut egui::Ui, report: &ReportModel) {
    let sections = report.sections();
    if sections.is_empty() {
        let text = if report.has_report() {
            "The analysis returned no report sections."
        } else {
            "No report yet. Add documents and process them to see the analysis."
        };
        ui.label(RichText::new(text).weak());
        return;
    }

    for section in sections {
        match section {
            ReportSection::Text { title, blocks } => {
                ui.label(RichText::new(title).strong().size(16.0));
                section_frame(ui, |ui| render_blocks(ui, blocks));
            }
            ReportSection::FraudRisk(fraud) => {
                ui.label(RichText::new("Fraud Risk Assessment").strong().size(16.0));
                section_frame(ui, |ui| render_fraud_risk(ui, fraud));
            }
        }
        ui.add_space(12.0);
    }
}

fn section_frame(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(10.0)
        .rounding(6.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn render_blocks(ui: &mut egui::Ui, blocks: impl Iterator<Item = Block>) {
    for block in blocks {
        match block {
            Block::Subheading(text) => {
                ui.add_space(6.0);
                ui.label(RichText::new(text).strong().size(15.0));
            }
            Block::Paragraph(spans) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    if spans.is_empty() {
                        ui.label("");
                    }
                    for span in spans {
                        let text = RichText::new(span.text).monospace();
                        ui.label(if span.emphasis { text.strong() } else { text });
                    }
                });
            }
        }
    }
}

fn render_fraud_risk(ui: &mut egui::Ui, fraud: &FraudRisk) {
    let (level, derived) = fraud.effective_risk();
    ui.horizontal(|ui| {
        ui.label("Risk Level:");
        ui.label(RichText::new(level.to_string()).strong().color(risk_color(&level)));
        if derived {
            ui.label(
                RichText::new(format!("(derived, service sent \"{}\")", fraud.combined_risk))
                    .small()
                    .weak(),
            );
        }
    });
    ui.horizontal(|ui| {
        ui.label("Document Similarity:");
        ui.label(RichText::new(fraud.similarity_percent()).strong());
    });

    let text_risk = &fraud.text_analysis.fraud_risk;
    ui.horizontal(|ui| {
        ui.label("Text Analysis:");
        ui.label(RichText::new(text_risk.to_string()).color(risk_color(text_risk)));
    });

    if fraud.text_analysis.verification_needed {
        ui.colored_label(palette(color::ORANGE), "⚠ Manual verification recommended");
    }

    let reasons = &fraud.text_analysis.reasons;
    if !reasons.is_empty() {
        ui.add_space(4.0);
        ui.label("Reasons:");
        for reason in reasons {
            ui.label(format!("  • {}", reason));
        }
    }
}
