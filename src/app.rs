use std::path::PathBuf;

use crate::event::{EditorEvent, EventLog};
use crate::import::{DemoKeywordDetector, ImageRasterizer, ImportSource, RequestQueue};
use crate::input::{InputHandler, PointerRouter};
use crate::notebook::{Library, PageRef};
use crate::page::{Background, Page};
use crate::persistence::{
    self, KeyValueStore, NOTEBOOKS_KEY, PersistenceResult, SETTINGS_KEY, load_notebooks, load_settings,
};
use crate::renderer::Renderer;
use crate::session::CanvasSession;
use crate::tape::TapeColor;
use crate::tools::{HIGHLIGHTER_COLORS, PEN_COLORS, ToolKind, ToolSettings};

/// Adapts eframe's storage to the persistence layer.
struct EframeStore<'a>(&'a mut dyn eframe::Storage);

impl KeyValueStore for EframeStore<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        self.0.set_string(key, value);
        Ok(())
    }
}

pub struct TapeNoteApp {
    library: Library,
    session: CanvasSession,
    events: EventLog,
    requests: RequestQueue,
    rasterizer: ImageRasterizer,
    keywords: DemoKeywordDetector,
    renderer: Renderer,
    input: InputHandler,
    router: PointerRouter,
    /// Committed changes not yet written to storage
    dirty: bool,
    notice: Option<String>,
    title_buffer: String,
    notebook_title_buffer: String,
}

impl TapeNoteApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (notebooks, settings) = match cc.storage {
            Some(storage) => (
                load_notebooks(storage.get_string(NOTEBOOKS_KEY)),
                load_settings(storage.get_string(SETTINGS_KEY)),
            ),
            None => (load_notebooks(None), ToolSettings::default()),
        };
        Self::with_library(Library::new(notebooks), settings, default_cache_dir())
    }

    /// Builds the app around `library`, opening its first page.
    pub fn with_library(mut library: Library, settings: ToolSettings, cache_dir: PathBuf) -> Self {
        let first = PageRef { notebook: 0, page: 0 };
        let page = match library.checkout(first) {
            Some(page) => page,
            None => {
                let at = library.new_notebook();
                library.checkout(at).unwrap_or_else(|| Page::new("Page 1"))
            }
        };

        let session = CanvasSession::new(page, settings);
        let events = EventLog::new();
        session.subscribe(Box::new(events.clone()));

        let title_buffer = session.page().title.clone();
        let notebook_title_buffer = notebook_title(&library);
        Self {
            library,
            session,
            events,
            requests: RequestQueue::new(),
            rasterizer: ImageRasterizer::new(cache_dir),
            keywords: DemoKeywordDetector,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            router: PointerRouter::new(),
            dirty: false,
            notice: None,
            title_buffer,
            notebook_title_buffer,
        }
    }

    pub fn session(&self) -> &CanvasSession {
        &self.session
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    fn open_page(&mut self, at: PageRef) {
        if self.router.is_busy() {
            return;
        }
        let Some(page) = self.library.checkout(at) else {
            return;
        };
        let outgoing = self.session.replace_page(page);
        self.library.checkin(outgoing);
        self.title_buffer = self.session.page().title.clone();
        self.notebook_title_buffer = notebook_title(&self.library);
        self.dirty = true;
    }

    fn persist(&mut self, store: &mut dyn KeyValueStore) {
        let notebooks = self.library.snapshot(self.session.page());
        if let Err(e) = persistence::save_notebooks(store, &notebooks) {
            log::error!("Failed to save notebooks: {e}");
            return;
        }
        if let Err(e) = persistence::save_settings(store, self.session.settings()) {
            log::error!("Failed to save settings: {e}");
        }
        self.dirty = false;
    }

    /// Reacts to what the session reported since the last frame.
    fn drain_events(&mut self) {
        for event in self.events.drain() {
            match event {
                EditorEvent::PageCommitted { .. } => self.dirty = true,
                EditorEvent::ImportFailed { message, .. } => {
                    self.notice = Some(format!("Import failed: {message}"));
                }
                EditorEvent::QuizCompleted { total, .. } => {
                    self.notice = Some(format!("Quiz complete! All {total} strips revealed."));
                }
                EditorEvent::ToolChanged { .. }
                | EditorEvent::GestureChanged { .. }
                | EditorEvent::SelectionChanged { .. }
                | EditorEvent::QuizStarted { .. }
                | EditorEvent::QuizProgressed(_)
                | EditorEvent::QuizEnded { .. } => {}
            }
        }
    }

    fn poll_requests(&mut self, ctx: &egui::Context) {
        for resolution in self.requests.poll() {
            self.session.apply_resolution(resolution);
        }
        if self.requests.pending() > 0 {
            ctx.request_repaint();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let bytes = match (&file.bytes, &file.path) {
                (Some(bytes), _) => bytes.to_vec(),
                (None, Some(path)) => match std::fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        self.notice = Some(format!("Could not read {}: {e}", path.display()));
                        continue;
                    }
                },
                (None, None) => continue,
            };
            let name = match (&file.path, file.name.is_empty()) {
                (Some(path), true) => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                _ => file.name.clone(),
            };
            let page_id = self.session.page().id.clone();
            self.requests
                .import(page_id, &self.rasterizer, ImportSource::from_file_name(name, bytes));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, delete) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::Z),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            )
        });
        if undo {
            self.session.undo();
        }
        if delete {
            self.session.delete_selected();
        }
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        for tool in ToolKind::ALL {
            let selected = self.session.tool() == tool;
            if ui.selectable_label(selected, tool.name()).clicked() {
                log::info!("Tool selected from UI: {}", tool.name());
                self.session.set_tool(tool);
            }
        }
        ui.separator();

        match self.session.tool() {
            ToolKind::Select | ToolKind::Lasso => self.selection_controls(ui),
            tool => tool_settings(ui, tool, self.session.settings_mut()),
        }
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.session.page().strokes().is_empty(), egui::Button::new("Undo"))
                .clicked()
            {
                self.session.undo();
            }
            if ui.button("Clear page").clicked() {
                self.session.clear_page();
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Reveal all").clicked() {
                self.session.set_all_revealed(true);
            }
            if ui.button("Hide all").clicked() {
                self.session.set_all_revealed(false);
            }
        });
        if ui.button("Smart tape").clicked() {
            let page = self.session.page();
            self.requests
                .detect_keywords(page.id.clone(), &self.keywords, page.title.clone());
        }
        ui.separator();

        ui.heading("Quiz");
        if self.session.quiz().is_active() {
            let progress = self.session.quiz_progress();
            ui.add(
                egui::ProgressBar::new(progress.fraction())
                    .text(format!("{} / {}", progress.current, progress.total)),
            );
            if ui.button("End quiz").clicked() {
                self.session.end_quiz();
            }
        } else if ui
            .add_enabled(!self.session.page().tapes().is_empty(), egui::Button::new("Start quiz"))
            .clicked()
        {
            self.session.start_quiz();
        }
        ui.separator();

        ui.heading("Page");
        let mut background = self.session.page().background;
        egui::ComboBox::from_label("Background")
            .selected_text(background.name())
            .show_ui(ui, |ui| {
                for option in Background::ALL {
                    ui.selectable_value(&mut background, option, option.name());
                }
            });
        self.session.set_background(background);
        if ui.button(format!("Orientation: {:?}", self.session.page().orientation)).clicked() {
            self.session.toggle_orientation();
        }
        if self.session.page().background_image.is_some() && ui.button("Remove image").clicked() {
            self.session
                .apply_page_update(crate::command::Command::SetBackgroundImage(None));
        }
        ui.small("Drop an image onto the window to use it as the page background.");
    }

    fn selection_controls(&mut self, ui: &mut egui::Ui) {
        let selected = self.session.selection().ids();
        ui.label(format!("{} selected", selected.len()));
        if ui
            .add_enabled(!selected.is_empty(), egui::Button::new("Delete selected"))
            .clicked()
        {
            self.session.delete_selected();
        }
        if let [only] = selected.as_slice() {
            if ui.button("Lock / unlock").clicked() {
                self.session.toggle_lock(only);
            }
        }
    }

    fn notebooks_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Notebooks");
        let current = self.library.checked_out();
        let mut open = None;
        let mut add_page = None;
        let mut favorite = None;
        let mut rename = None;

        for (index, notebook) in self.library.notebooks().iter().enumerate() {
            let star = if notebook.is_favorite { "★" } else { "☆" };
            egui::CollapsingHeader::new(&notebook.title)
                .id_salt(("notebook", index))
                .default_open(current.is_some_and(|c| c.notebook == index))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button(star).clicked() {
                            favorite = Some(index);
                        }
                        if !notebook.tags.is_empty() {
                            ui.small(notebook.tags.join(", "));
                        }
                    });
                    if current.is_some_and(|c| c.notebook == index) {
                        let response = ui.text_edit_singleline(&mut self.notebook_title_buffer);
                        if response.lost_focus() && self.notebook_title_buffer != notebook.title {
                            rename = Some(index);
                        }
                    }
                    for (page_index, page) in notebook.pages.iter().enumerate() {
                        let at = PageRef { notebook: index, page: page_index };
                        let is_current = current == Some(at);
                        let title = if is_current { &self.session.page().title } else { &page.title };
                        if ui.selectable_label(is_current, title).clicked() {
                            open = Some(at);
                        }
                    }
                    if ui.small_button("+ Page").clicked() {
                        add_page = Some(index);
                    }
                });
        }
        if ui.button("New notebook").clicked() {
            open = Some(self.library.new_notebook());
            self.dirty = true;
        }

        if let Some(index) = favorite {
            self.library.toggle_favorite(index);
            self.dirty = true;
        }
        if let Some(index) = rename {
            let title = self.notebook_title_buffer.trim();
            if title.is_empty() {
                self.notebook_title_buffer = notebook_title(&self.library);
            } else if self.library.rename_notebook(index, title) {
                self.dirty = true;
            }
        }
        if let Some(index) = add_page {
            open = self.library.add_page(index).or(open);
            self.dirty = true;
        }
        if let Some(at) = open {
            self.open_page(at);
        }
    }

    fn page_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.title_buffer);
            if response.lost_focus() && self.title_buffer != self.session.page().title {
                self.session.rename(self.title_buffer.clone());
            }
            if let Some(notice) = &self.notice {
                ui.colored_label(egui::Color32::from_rgb(0xb9, 0x1c, 0x1c), notice);
                if ui.small_button("✕").clicked() {
                    self.notice = None;
                }
            }
        });
    }
}

/// Title of the notebook holding the checked-out page.
fn notebook_title(library: &Library) -> String {
    library
        .checked_out()
        .and_then(|at| library.notebook(at.notebook))
        .map(|nb| nb.title.clone())
        .unwrap_or_default()
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("tapenote")
}

fn tool_settings(ui: &mut egui::Ui, tool: ToolKind, settings: &mut ToolSettings) {
    match tool {
        ToolKind::Pen => {
            swatches(ui, &PEN_COLORS, &mut settings.pen_color);
            ui.add(egui::Slider::new(&mut settings.pen_width, 1.0..=12.0).text("Width"));
        }
        ToolKind::Highlighter => {
            swatches(ui, &HIGHLIGHTER_COLORS, &mut settings.highlighter_color);
            ui.add(egui::Slider::new(&mut settings.highlighter_width, 8.0..=40.0).text("Width"));
        }
        ToolKind::Eraser => {
            ui.add(egui::Slider::new(&mut settings.eraser_width, 4.0..=60.0).text("Width"));
            ui.checkbox(&mut settings.eraser_sweep, "Erase whole strokes while dragging");
        }
        ToolKind::Tape => {
            egui::ComboBox::from_label("Tape color")
                .selected_text(settings.tape_color.name())
                .show_ui(ui, |ui| {
                    for color in TapeColor::ALL {
                        ui.selectable_value(&mut settings.tape_color, color, color.name());
                    }
                });
            ui.add(egui::Slider::new(&mut settings.tape_height, 16.0..=120.0).text("Height"));
        }
        ToolKind::Select | ToolKind::Lasso => {}
    }
}

fn swatches(ui: &mut egui::Ui, palette: &[(&str, egui::Color32)], current: &mut egui::Color32) {
    ui.horizontal(|ui| {
        for (name, color) in palette {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(20.0, 20.0), egui::Sense::click());
            ui.painter().circle_filled(rect.center(), 8.0, *color);
            if *current == *color {
                ui.painter()
                    .circle_stroke(rect.center(), 10.0, egui::Stroke::new(2.0, egui::Color32::GRAY));
            }
            if response.on_hover_text(*name).clicked() {
                *current = *color;
            }
        }
    });
}

impl eframe::App for TapeNoteApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(&mut EframeStore(storage));
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.poll_requests(ctx);
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        egui::SidePanel::left("tools_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| self.tools_panel(ui));

        egui::SidePanel::right("notebooks_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| self.notebooks_panel(ui));

        egui::TopBottomPanel::top("page_bar").show(ctx, |ui| self.page_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas = response.rect;

            self.input.set_canvas_rect(canvas);
            for event in self.input.process_input(ctx) {
                self.router.route(&event, &mut self.session);
            }

            self.renderer.render(ctx, &painter, canvas, &self.session);
        });

        self.drain_events();
        if self.dirty {
            if let Some(storage) = frame.storage_mut() {
                self.persist(&mut EframeStore(storage));
            }
        }
    }
}
