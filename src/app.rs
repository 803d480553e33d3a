use crossbeam_channel::Receiver;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swipe_pager::indicators;
use swipe_pager::input::PointerDrag;
use swipe_pager::{Config, FocusWatcher, Frame, GestureSample, Pager};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Characters in the progress track drawn into the window title.
const TRACK_CELLS: usize = 16;

enum NavAction {
    Next,
    Prev,
    First,
    Last,
    None,
}

fn handle_key_event(event: &KeyEvent) -> NavAction {
    if event.state != ElementState::Pressed {
        return NavAction::None;
    }
    match &event.logical_key {
        Key::Named(NamedKey::ArrowRight | NamedKey::ArrowDown | NamedKey::PageDown) => NavAction::Next,
        Key::Named(NamedKey::ArrowLeft | NamedKey::ArrowUp | NamedKey::PageUp) => NavAction::Prev,
        Key::Named(NamedKey::Home) => NavAction::First,
        Key::Named(NamedKey::End) => NavAction::Last,
        _ => NavAction::None,
    }
}

struct WindowState {
    window: Arc<Window>,
    pager: Pager,
    drag: PointerDrag,
    cursor_pos: (f32, f32),
    focus: Vec<FocusWatcher>,
    config_rx: Option<Receiver<()>>,
    _config_watcher: Option<RecommendedWatcher>,
    last_frame: Instant,
    title: String,
}

impl WindowState {
    /// Gesture samples go to the pager as they arrive so that a press, a few
    /// moves and a release landing between two redraws are not collapsed.
    fn feed(&mut self, sample: Option<GestureSample>) {
        if let Some(sample) = sample {
            let frame = self.pager.frame(Some(sample), 0.0);
            self.report(&frame);
        }
    }

    fn report(&mut self, frame: &Frame) {
        if let Some(index) = frame.settled {
            log::debug!("settled on page {}", index);
        }
        let reader = self.pager.reader();
        for (index, watcher) in self.focus.iter_mut().enumerate() {
            if watcher.poll(&reader) {
                log::debug!("page {} focused", index);
            }
        }
    }

    fn navigate(&mut self, action: NavAction) {
        let count = self.pager.page_count();
        if count == 0 {
            return;
        }
        let next = self.pager.next_index();
        let looping = self.pager.reader().snapshot().looping;
        match action {
            NavAction::Next if looping => self.pager.scroll_to((next + 1) % count),
            NavAction::Next => self.pager.scroll_to(next + 1),
            NavAction::Prev if looping => self.pager.scroll_to((next + count - 1) % count),
            NavAction::Prev => self.pager.scroll_to(next.saturating_sub(1)),
            NavAction::First => self.pager.jump_to(0),
            NavAction::Last => self.pager.scroll_to(count - 1),
            NavAction::None => return,
        };
    }

    fn update_title(&mut self) {
        let count = self.pager.page_count();
        let position = self.pager.position();
        let filled = indicators::progress_width(position, count, TRACK_CELLS as f32)
            .round()
            .clamp(0.0, TRACK_CELLS as f32) as usize;
        let title = format!(
            "swipe pager  {}/{}  {}{}  {:.2}",
            self.pager.active_index() + 1,
            count,
            "█".repeat(filled),
            "░".repeat(TRACK_CELLS - filled),
            position,
        );
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }
    }
}

pub struct App {
    state: Option<WindowState>,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { state: None, config }
    }

    fn create_window_state(event_loop: &ActiveEventLoop, config: &Config) -> Option<WindowState> {
        let attrs = WindowAttributes::default()
            .with_title("swipe pager")
            .with_inner_size(winit::dpi::LogicalSize::new(config.demo.width, config.demo.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                return None;
            }
        };

        let page_count = config.demo.page_count;
        let mut pager = Pager::new(config, page_count);
        pager.on_change(|index| log::info!("page changed to {}", index));
        let size = window.inner_size();
        pager.set_layout(size.width as f32, size.height as f32);

        // Set up config file watcher for hot-reload
        let config_path = Config::config_path();
        let (tx, rx) = crossbeam_channel::bounded::<()>(1);
        let watch_path = config_path.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    if (event.kind.is_modify() || event.kind.is_create())
                        && event.paths.iter().any(|p| p == &watch_path)
                    {
                        let _ = tx.try_send(());
                    }
                }
            })
            .ok();
        if let Some(ref mut w) = watcher {
            if let Some(dir) = config_path.parent() {
                if let Err(e) = w.watch(dir, RecursiveMode::NonRecursive) {
                    log::warn!("config hot reload disabled: {e}");
                }
            }
        }

        Some(WindowState {
            window,
            pager,
            drag: PointerDrag::new(),
            cursor_pos: (0.0, 0.0),
            focus: (0..page_count).map(FocusWatcher::new).collect(),
            config_rx: Some(rx),
            _config_watcher: watcher,
            last_frame: Instant::now(),
            title: String::new(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match Self::create_window_state(event_loop, &self.config) {
            Some(state) => self.state = Some(state),
            None => event_loop.exit(),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let fps = self.config.demo.target_fps.max(1) as u64;
        let frame_interval = Duration::from_millis(1000 / fps);
        if let Some(state) = &self.state {
            if state.last_frame.elapsed() >= frame_interval {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.state = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                state.pager.set_layout(new_size.width as f32, new_size.height as f32);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = handle_key_event(&event);
                state.navigate(action);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                state.cursor_pos = (x, y);
                let sample = state.drag.moved(x, y);
                state.feed(sample);
            }

            WindowEvent::MouseInput { state: button_state, button: MouseButton::Left, .. } => {
                let sample = match button_state {
                    ElementState::Pressed => {
                        let (x, y) = state.cursor_pos;
                        Some(state.drag.press(x, y))
                    }
                    ElementState::Released => state.drag.release(),
                };
                state.feed(sample);
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                let sample = state.drag.cancel();
                state.feed(sample);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(state.last_frame).as_secs_f32().min(0.05);
                state.last_frame = now;

                // Hot-reload config if file changed
                if state.config_rx.as_ref().is_some_and(|rx| rx.try_recv().is_ok()) {
                    let new_config = Config::load_or_default();
                    state.pager.apply_config(&new_config);
                    state.pager.set_page_count(new_config.demo.page_count);
                    state.focus = (0..new_config.demo.page_count).map(FocusWatcher::new).collect();
                    self.config = new_config;
                    log::info!("config reloaded");
                }

                let frame = state.pager.frame(None, dt);
                state.report(&frame);

                for page in state.pager.pages() {
                    log::trace!(
                        "page {} offset {:.3} x {:.1} z {} style {:?}",
                        page.index,
                        page.offset,
                        page.translation,
                        page.z_index,
                        page.style
                    );
                }
                state.update_title();
            }

            _ => {}
        }
    }
}
