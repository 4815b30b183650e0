use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use egui::RichText;

use crate::engine::ConversionEngine;
use crate::types::{ConversionJob, JobPhase, ProgressMessage};

pub struct HeicConverterApp {
    folder: Option<PathBuf>,
    reduce_to_1080p: bool,

    // Job state
    phase: JobPhase,
    progress_rx: Option<Receiver<ProgressMessage>>,
    percent: u8,
    current_file: String,
}

impl HeicConverterApp {
    pub fn new() -> Self {
        Self {
            folder: None,
            reduce_to_1080p: false,
            phase: JobPhase::Idle,
            progress_rx: None,
            percent: 0,
            current_file: String::new(),
        }
    }

    fn start_conversion(&mut self) {
        let Some(folder) = self.folder.clone() else {
            return;
        };
        if self.phase == JobPhase::Running {
            return;
        }

        self.phase = JobPhase::Running;
        self.percent = 0;
        self.current_file.clear();

        let (tx, rx) = channel();
        self.progress_rx = Some(rx);

        let job = ConversionJob {
            folder,
            reduce_to_1080p: self.reduce_to_1080p,
        };

        thread::spawn(move || {
            let engine = ConversionEngine::new();
            engine.convert_batch(job, tx);
        });
    }

    fn process_progress_messages(&mut self) {
        // Collect all messages first to avoid borrow checker issues
        let mut messages = Vec::new();
        if let Some(rx) = &self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }

        for msg in messages {
            match msg {
                ProgressMessage::Progress { percent, file } => {
                    self.percent = percent;
                    self.current_file = file;
                }
                ProgressMessage::Completed => {
                    self.phase = JobPhase::Completed;
                    self.progress_rx = None;
                    self.current_file.clear();
                }
            }
        }
    }

    fn render_folder_section(&mut self, ui: &mut egui::Ui) {
        let running = self.phase == JobPhase::Running;

        if ui
            .add_enabled(!running, egui::Button::new("📂 Select Folder"))
            .clicked()
        {
            if let Some(folder) = rfd::FileDialog::new()
                .set_title("Select Folder")
                .pick_folder()
            {
                self.folder = Some(folder);
                self.phase = JobPhase::Idle;
            }
        }

        ui.add_space(5.0);

        let label = match (&self.folder, self.phase) {
            (_, JobPhase::Completed) => "Conversion complete!".to_string(),
            (Some(folder), _) => format!("Selected folder: {}", folder.display()),
            (None, _) => "No folder selected".to_string(),
        };
        ui.label(label);
    }

    fn render_options_section(&mut self, ui: &mut egui::Ui) {
        let running = self.phase == JobPhase::Running;
        ui.add_enabled(
            !running,
            egui::Checkbox::new(&mut self.reduce_to_1080p, "Reduce to 1080p"),
        );
    }

    fn render_controls_section(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::ProgressBar::new(self.percent as f32 / 100.0)
                .text(format!("{}%", self.percent)),
        );

        if !self.current_file.is_empty() {
            ui.label(RichText::new(&self.current_file).small().italics());
        }

        ui.add_space(10.0);

        let can_start = self.phase != JobPhase::Running && self.folder.is_some();
        if ui
            .add_enabled(can_start, egui::Button::new("▶ Convert"))
            .clicked()
        {
            self.start_conversion();
        }
    }
}

impl eframe::App for HeicConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_progress_messages();

        // Request repaint while the worker runs
        if self.phase == JobPhase::Running {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);

            ui.group(|ui| {
                self.render_folder_section(ui);
            });

            ui.add_space(10.0);

            ui.group(|ui| {
                self.render_options_section(ui);
            });

            ui.add_space(10.0);

            ui.group(|ui| {
                self.render_controls_section(ui);
            });
        });
    }
}
