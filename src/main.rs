use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::spawn;

use anyhow::Result;
use eframe::{App, AppCreator, CreationContext};
use egui::{Color32, Context, Event, Key, RichText, Spinner, ViewportCommand, Visuals};

use bookmarks::{Preferences, ResultEntry, Session};

enum LauncherState {
    Loading,
    Loaded(LoadedState),
}

struct LoadedState {
    session: Session,
    results: Option<Vec<ResultEntry>>,
    selected: usize,
}

impl LoadedState {
    fn update_results(&mut self, query: &str) {
        let argument = self.session.preferences().argument(query);
        let results = self.session.results(argument);

        if !results.is_empty() {
            self.selected = self.selected.min(results.len() - 1);
        } else {
            self.selected = 0;
        }

        self.results = Some(results);
    }
}

struct Launcher {
    query: String,
    state: Arc<Mutex<LauncherState>>,
    preferences_path: Option<PathBuf>,
}

impl Launcher {
    pub fn new(preferences_path: Option<PathBuf>) -> Self {
        Self {
            query: String::new(),
            state: Arc::new(LauncherState::Loading.into()),
            preferences_path,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LauncherState> {
        // the loader thread only ever replaces the state, a poisoned lock still holds a valid one
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn launch(&self, url: &str) {
        log::info!("opening {url}");

        let err = Command::new("xdg-open")
            .arg(url)
            .exec();

        log::error!("failed to launch xdg-open: {err}");
    }

    fn reload_preferences(&self, session: &mut Session) {
        let preferences = match &self.preferences_path {
            Some(path) => Preferences::load(path),
            None => Ok(Preferences::default()),
        };

        match preferences {
            Ok(preferences) => session.set_preferences(preferences),
            Err(err) => log::warn!("keeping current preferences: {err}"),
        }
    }

    fn handle_events(&mut self, ctx: &Context) {
        let mut require_update = false;

        let mut move_steps: i32 = 0;
        let mut launch = false;
        let mut reload = false;

        for event in ctx.input(|input| input.events.clone()) {
            match event {
                Event::Text(t) => {
                    self.query += &t;
                    require_update = true;
                }

                Event::Key { key: Key::Backspace, pressed: true, .. } => {
                    if let Some((pos, _)) = self.query.char_indices().last() {
                        self.query.remove(pos);
                        require_update = true;
                    }
                }

                Event::Key { key: Key::W, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    match self.query.trim_end().rfind(' ') {
                        Some(pos) => self.query.truncate(pos + 1),
                        None => self.query.clear(),
                    }
                    require_update = true;
                }

                Event::Key { key: Key::R, pressed: true, modifiers, .. } if modifiers.ctrl => {
                    reload = true;
                }

                Event::Key { key: Key::Escape, pressed: true, .. } => {
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }

                Event::Key { key: Key::Enter, pressed: true, .. } => {
                    launch = true;
                }

                Event::Key { key: Key::ArrowUp, pressed: true, .. } => {
                    move_steps -= 1;
                }

                Event::Key { key: Key::ArrowDown, pressed: true, .. } => {
                    move_steps += 1;
                }

                _ => (),
            }
        }

        let mut guard = self.lock();
        let LauncherState::Loaded(state) = &mut *guard else {
            return;
        };

        if reload {
            self.reload_preferences(&mut state.session);
            require_update = true;
        }

        if require_update || state.results.is_none() {
            state.update_results(&self.query);
        }

        let Some(results) = state.results.as_ref() else {
            return;
        };

        if !results.is_empty() {
            state.selected = (state.selected as i32 + move_steps).rem_euclid(results.len() as _) as _;
        }

        if launch {
            if let Some(url) = results.get(state.selected).and_then(ResultEntry::url) {
                let url = url.to_owned();
                drop(guard);
                self.launch(&url);
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        }
    }

    fn paint(&mut self, ctx: &Context) {
        let state = self.lock();

        egui::CentralPanel::default().show(ctx, |ui| {
            // make it all monospaced
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);

            // and let no text wrap
            ui.style_mut().wrap = Some(false);

            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.set_height(32.0);
                    ui.label(RichText::new(format!("> {}", self.query)).color(Color32::GOLD));
                });

                ui.separator();

                match &*state {
                    LauncherState::Loaded(state) => {
                        for (idx, entry) in state.results.iter().flatten().enumerate() {
                            let selected = state.selected == idx;
                            let color = if selected { Color32::WHITE } else { Color32::GRAY };

                            ui.horizontal(|ui| {
                                ui.set_height(24.0);

                                match entry {
                                    ResultEntry::Bookmark { name, url } => {
                                        ui.label(RichText::new(name).color(color));
                                        ui.label(RichText::new(url).color(Color32::DARK_GRAY));
                                    }

                                    ResultEntry::Error { message, description } => {
                                        ui.label(RichText::new(message).color(Color32::LIGHT_RED));
                                        ui.label(RichText::new(description).color(Color32::GRAY));
                                    }
                                }
                            });
                        }
                    }

                    LauncherState::Loading => {
                        ui.centered_and_justified(|ui| {
                            ui.add(Spinner::new().size(32.0));
                        });
                    }
                }
            })
        });
    }
}

impl App for Launcher {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_events(ctx);
        self.paint(ctx);
    }
}

fn create_app(cc: &CreationContext<'_>, app: Launcher, preferences: Preferences) -> Box<dyn App> {
    cc.egui_ctx.set_visuals(Visuals::dark());

    let ctx = cc.egui_ctx.clone();
    let state_arc = Arc::clone(&app.state);

    spawn(move || {
        let session = Session::new(preferences);

        let mut state = state_arc.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        *state = LauncherState::Loaded(
            LoadedState {
                session,
                results: None,
                selected: 0,
            }
        );

        drop(state);

        ctx.request_repaint();
    });

    Box::new(app)
}

fn main() -> Result<()> {
    env_logger::init();

    let preferences_path = Preferences::default_path();
    let preferences = match &preferences_path {
        Some(path) => Preferences::load(path)?,
        None => Preferences::default(),
    };

    log::debug!("preferences: {preferences:?}");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_always_on_top()
            .with_resizable(false)
            .with_transparent(false)
            .with_decorations(false),
        ..Default::default()
    };

    let app = Launcher::new(preferences_path);
    let app_name = "bookmarks";
    let app_creator: AppCreator = Box::new(|ctx| create_app(ctx, app, preferences));

    eframe::run_native(app_name, native_options, app_creator)
        .map_err(|err| anyhow::anyhow!("failed to run the launcher window: {err}"))
}
