use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::coords::{Vec2, Viewport};
use crate::data::{PointSet, SetDataOptions};
use crate::error::ScatterError;
use crate::input::{Gesture, GestureTracker, WheelDelta};
use crate::plot::{PlotConfig, Scatterplot};

/// Window/viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub plot: PlotConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "scatter".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            plot: PlotConfig::default(),
        }
    }
}

/// Points plus attributes loaded once the window exists.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub points: PointSet,
    pub options: SetDataOptions,
}

impl Dataset {
    pub fn new(points: impl Into<PointSet>, options: SetDataOptions) -> Self {
        Self {
            points: points.into(),
            options,
        }
    }
}

/// Entry point for the viewer.
pub struct Viewer;

impl Viewer {
    /// Opens one window, plots `dataset` and blocks until the window closes.
    pub fn run(config: ViewerConfig, dataset: Dataset) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = ViewerState::new(config, dataset);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct PlotWindow {
    tracker: GestureTracker,

    window: Window,

    #[borrows(window)]
    #[covariant]
    plot: Scatterplot<'this>,
}

struct ViewerState {
    config: ViewerConfig,
    dataset: Option<Dataset>,
    entry: Option<PlotWindow>,
    fatal: Option<anyhow::Error>,
}

impl ViewerState {
    fn new(config: ViewerConfig, dataset: Dataset) -> Self {
        Self {
            config,
            dataset: Some(dataset),
            entry: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.entry = None;
        event_loop.exit();
    }

    fn create_plot_window(&mut self, event_loop: &ActiveEventLoop) -> Result<PlotWindow> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        let viewport = Viewport::new(size.width as f32, size.height as f32);
        let plot_config = self.config.plot.clone();
        let dataset = self.dataset.take();

        PlotWindowTryBuilder {
            tracker: GestureTracker::new(viewport),
            window,
            plot_builder: |w| open_plot(w, plot_config, dataset),
        }
        .try_build()
    }

    /// Routes one gesture to the plot. Rejected gestures are logged and
    /// dropped; anything else is fatal.
    fn dispatch(plot: &mut Scatterplot<'_>, gesture: Gesture) -> std::result::Result<(), ScatterError> {
        match plot.handle_gesture(gesture) {
            Ok(status) => {
                log::trace!("{gesture:?}: {status:?}");
                Ok(())
            }
            Err(ScatterError::InvalidGesture(msg)) => {
                log::warn!("ignored gesture: {msg}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl ApplicationHandler for ViewerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.fatal.is_some() {
            return;
        }

        match self.create_plot_window(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => self.fail(event_loop, e.context("failed to create plot window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Redraws are driven by gestures, resizes and the OS.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        let outcome: std::result::Result<(), ScatterError> = entry.with_mut(|fields| {
            let tracker = fields.tracker;
            let plot = fields.plot;

            match event {
                WindowEvent::CloseRequested => {
                    event_loop.exit();
                    Ok(())
                }

                WindowEvent::Resized(size) => {
                    plot.resize(size)?;
                    tracker.set_viewport(plot.viewport());
                    fields.window.request_redraw();
                    Ok(())
                }

                WindowEvent::ScaleFactorChanged { .. } => {
                    plot.resize(fields.window.inner_size())?;
                    tracker.set_viewport(plot.viewport());
                    fields.window.request_redraw();
                    Ok(())
                }

                WindowEvent::CursorMoved { position, .. } => match tracker.pointer_moved(to_vec2(position)) {
                    Some(g) => Self::dispatch(plot, g),
                    None => Ok(()),
                },

                WindowEvent::CursorLeft { .. } => {
                    tracker.pointer_left();
                    Ok(())
                }

                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    tracker.primary_button(state == ElementState::Pressed);
                    Ok(())
                }

                WindowEvent::MouseWheel { delta, .. } => match tracker.wheel(wheel_delta(delta)) {
                    Some(g) => Self::dispatch(plot, g),
                    None => Ok(()),
                },

                WindowEvent::KeyboardInput { event, .. }
                    if event.state == ElementState::Pressed
                        && !event.repeat
                        && is_reset_key(event.physical_key) =>
                {
                    Self::dispatch(plot, Gesture::Reset)
                }

                WindowEvent::RedrawRequested => plot.render().map(|_| ()),

                _ => Ok(()),
            }
        });

        if let Err(err) = outcome {
            self.fail(event_loop, anyhow::Error::new(err).context("plot failed"));
        }
    }
}

/// Builds the plot for `window` and loads the initial dataset, if any.
fn open_plot(window: &Window, config: PlotConfig, dataset: Option<Dataset>) -> Result<Scatterplot<'_>> {
    let size = window.inner_size();
    let mut plot = pollster::block_on(Scatterplot::new(window, size, config))
        .context("GPU initialization failed for window")?;

    if let Some(Dataset { points, options }) = dataset {
        plot.set_data(points, &options)
            .context("failed to load dataset")?;
    }
    Ok(plot)
}

fn to_vec2(pos: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(pos.x as f32, pos.y as f32)
}

/// Positive values zoom in.
fn wheel_delta(delta: MouseScrollDelta) -> WheelDelta {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => WheelDelta::Lines(y),
        MouseScrollDelta::PixelDelta(p) => WheelDelta::Pixels(p.y as f32),
    }
}

fn is_reset_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::KeyR | KeyCode::Escape))
}
