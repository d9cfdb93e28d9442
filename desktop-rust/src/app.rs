use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use tracing::{info, warn};

use kensa_sheet_common::{Error, FileSession, FileWorker, Record, WorkerMessage};

const TABLE_HEADERS: [&str; 6] = ["Name", "Distance", "Angle", "Width", "Height", "IsDefect"];

pub struct DesktopApp {
    session: FileSession,
    worker: FileWorker,
    busy: bool,
    status: String,
    status_is_error: bool,
    selected: Option<usize>,
    dirty: Rc<Cell<bool>>,
}

impl DesktopApp {
    fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = message.into();
        self.status_is_error = is_error;
    }

    fn title_line(&self) -> String {
        let name = self
            .session
            .current_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.dirty.get() {
            format!("{name} *")
        } else {
            name
        }
    }

    fn new_sheet(&mut self) {
        self.session.new_sheet();
        self.dirty.set(false);
        self.selected = None;
        self.set_status("New sheet", false);
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            self.busy = true;
            self.set_status(format!("Loading {}...", path.display()), false);
            self.worker.submit_load(path);
        }
    }

    fn save_file(&mut self) {
        if self.session.records().is_empty() {
            warn!("Save requested with no records");
            self.set_status(Error::NoData.to_string(), true);
            return;
        }
        match self.session.current_path() {
            Some(path) => {
                let path = path.to_path_buf();
                self.submit_save(path);
            }
            None => self.save_file_as(),
        }
    }

    fn save_file_as(&mut self) {
        if self.session.records().is_empty() {
            warn!("Save requested with no records");
            self.set_status(Error::NoData.to_string(), true);
            return;
        }
        let default_name = self
            .session
            .current_path()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("records.csv")
            .to_string();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .add_filter("CSV", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            self.submit_save(path);
        }
    }

    fn submit_save(&mut self, path: PathBuf) {
        self.busy = true;
        self.set_status(format!("Saving {}...", path.display()), false);
        self.worker.submit_save(path, self.session.records().to_vec());
    }

    fn add_row(&mut self) {
        let index = match self.selected {
            Some(index) => index + 1,
            None => self.session.records().len(),
        };
        self.session.records_mut().insert(index, Record::default());
        self.selected = Some(index);
    }

    fn delete_row(&mut self) {
        let Some(index) = self.selected else {
            self.set_status("No row selected", true);
            return;
        };
        if self.session.records_mut().remove(index).is_some() {
            let len = self.session.records().len();
            self.selected = if len == 0 { None } else { Some(index.min(len - 1)) };
        }
    }

    fn poll_messages(&mut self) {
        while let Some(message) = self.worker.try_recv() {
            match message {
                WorkerMessage::LoadDone { path, result } => {
                    self.busy = false;
                    match result {
                        Ok(records) => {
                            self.session.apply_loaded(&path, records);
                            self.dirty.set(false);
                            self.selected = if self.session.records().is_empty() {
                                None
                            } else {
                                Some(0)
                            };
                            self.set_status(format!("Loaded {}", path.display()), false);
                        }
                        Err(err) => self.set_status(format!("Load failed: {err}"), true),
                    }
                }
                WorkerMessage::SaveDone { path, result } => {
                    self.busy = false;
                    match result {
                        Ok(()) => {
                            self.session.confirm_saved(&path);
                            self.dirty.set(false);
                            self.set_status(format!("Saved {}", path.display()), false);
                        }
                        Err(err) => self.set_status(format!("Save failed: {err}"), true),
                    }
                }
            }
        }
    }

    fn render_table(&mut self, ui: &mut egui::Ui) {
        if self.session.records().is_empty() {
            ui.label("No records. Open a file or add a row.");
            return;
        }

        egui::Grid::new("record_table")
            .striped(true)
            .min_col_width(60.0)
            .show(ui, |ui| {
                ui.label(RichText::new("#").strong());
                for header in TABLE_HEADERS {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                let count = self.session.records().len();
                for index in 0..count {
                    let mut record = match self.session.records().get(index) {
                        Some(record) => record.clone(),
                        None => continue,
                    };
                    let is_selected = self.selected == Some(index);
                    if ui
                        .selectable_label(is_selected, format!("{}", index + 1))
                        .clicked()
                    {
                        self.selected = Some(index);
                    }

                    let mut changed = false;
                    changed |= ui.text_edit_singleline(&mut record.name).changed();
                    changed |= ui.text_edit_singleline(&mut record.distance).changed();
                    changed |= ui.text_edit_singleline(&mut record.angle).changed();
                    changed |= ui
                        .add(egui::DragValue::new(&mut record.width).speed(0.1))
                        .changed();
                    changed |= ui
                        .add(egui::DragValue::new(&mut record.height).speed(0.1))
                        .changed();
                    changed |= ui.text_edit_singleline(&mut record.is_defect).changed();
                    ui.end_row();

                    if changed {
                        self.selected = Some(index);
                        self.session
                            .records_mut()
                            .update(index, move |target| *target = record);
                    }
                }
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
            fonts.font_data.insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let mut session = FileSession::new();
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        session.records_mut().subscribe(move |_| flag.set(true));
        Self {
            session,
            worker: FileWorker::spawn(),
            busy: false,
            status: String::new(),
            status_is_error: false,
            selected: None,
            dirty,
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.busy {
            ctx.request_repaint();
        }
        self.poll_messages();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!self.busy, egui::Button::new("New")).clicked() {
                        self.new_sheet();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!self.busy, egui::Button::new("Open...")).clicked() {
                        self.open_file();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!self.busy, egui::Button::new("Save")).clicked() {
                        self.save_file();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!self.busy, egui::Button::new("Save As...")).clicked() {
                        self.save_file_as();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Row", |ui| {
                    if ui.add_enabled(!self.busy, egui::Button::new("Add Row")).clicked() {
                        self.add_row();
                        ui.close_menu();
                    }
                    let can_delete = !self.busy && self.selected.is_some();
                    if ui.add_enabled(can_delete, egui::Button::new("Delete Row")).clicked() {
                        self.delete_row();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.label(self.title_line());
                if !self.status.is_empty() {
                    let color = if self.status_is_error {
                        Color32::from_rgb(235, 110, 110)
                    } else {
                        Color32::from_gray(170)
                    };
                    ui.label(RichText::new(&self.status).color(color));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Records");
            ui.label(format!("{} items", self.session.records().len()));
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_table(ui);
                });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Kensa Sheet exiting");
    }
}
