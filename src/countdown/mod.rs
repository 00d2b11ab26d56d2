//! Countdown pie widget.
//!
//! The widget owns a drawing surface and shows the remaining time as a pie
//! that shrinks clockwise from 12 o'clock. Once the time is up the surface is
//! cleared and the completion callback runs, exactly once.
//!
//! The tick loop follows the usual bubbletea-rs pattern: [`Model::start`]
//! draws the first frame and returns a command that delivers a [`TickMsg`]
//! 40 ms later. Each tick forwarded to [`Model::update`] redraws the pie and
//! returns the command for the next tick, until the countdown expires and a
//! [`CompleteMsg`] is emitted instead.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::new;
//! use bubbletea_countdown::config::{with_border_width, with_color, with_size};
//!
//! let mut timer = new(&[
//!     with_size(120),
//!     with_color("rgba(125, 70, 70, .3)"),
//!     with_border_width(10.0),
//! ]);
//! assert!(timer.id().starts_with("timer_"));
//!
//! let cmd = timer.start_with_callback(30.0, |t| println!("{} is done!", t.id()));
//! assert!(cmd.is_some());
//! assert!(timer.running());
//!
//! // A second start while running changes nothing.
//! assert!(timer.start(5.0).is_none());
//! assert_eq!(timer.total_duration_ms(), Some(30_000.0));
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_countdown::countdown::{new, CompleteMsg, Model};
//!
//! struct App {
//!     timer: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = new(&[]);
//!         let cmd = timer.start(10.0);
//!         (Self { timer, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(complete) = msg.downcast_ref::<CompleteMsg>() {
//!             if complete.id == self.timer.id() {
//!                 self.done = true;
//!             }
//!             return None;
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::{merge, Config, ConfigError, CountdownOption, Options, DEFAULTS};
use crate::geometry::arc_for_ratio;
use crate::id::{next_instance, rand_id, DEFAULT_ID_LEN};
use crate::raster::PixelSurface;
use crate::surface::{LineJoin, Surface};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};


/// Delay between two ticks (25 frames per second).
pub const CADENCE: Duration = Duration::from_millis(40);

/// Default width of [`Model::view`], in terminal columns.
pub const DEFAULT_VIEW_WIDTH: u32 = 24;

/// Prefix of generated widget ids.
const ID_KEY: &str = "timer";

/// Message delivered on every tick of a running countdown.
///
/// Ticks carry the widget's instance key and the generation tag of the run
/// that scheduled them. Widgets ignore ticks addressed to another instance
/// or to an earlier run, so a restarted countdown never ticks twice as fast.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Instance key of the widget that scheduled this tick.
    pub instance: i64,
    tag: i64,
}

/// Message emitted once a countdown has run out.
///
/// Sent after the completion callback has run, for applications that prefer
/// handling completion in their own `update`.
#[derive(Debug, Clone)]
pub struct CompleteMsg {
    /// Id of the widget that completed.
    pub id: String,
}

/// Completion callback. Receives the widget that just completed.
pub type Callback<S> = Box<dyn FnOnce(&Model<S>) + Send>;

/// A countdown pie drawn on a surface of type `S`.
///
/// Build one with [`new`] (pixel surface, system clock) or with
/// [`Model::with_surface`] to bring your own surface and clock. The visual
/// settings are fixed at construction; only the countdown state changes.
pub struct Model<S: Surface = PixelSurface> {
    /// Width of [`Model::view`] in terminal columns.
    pub view_width: u32,

    config: Config,
    id: String,
    surface: S,
    clock: Arc<dyn Clock>,
    instance: i64,
    tag: i64,
    running: bool,
    total_duration_ms: f64,
    target_end_time: f64,
    on_complete: Option<Callback<S>>,
}

/// Creates a widget from a list of options, drawing on a [`PixelSurface`].
///
/// Options that are not given take their value from
/// [`DEFAULTS`](crate::config::DEFAULTS). Nothing is validated; see
/// [`try_new`] for the checked variant.
pub fn new(opts: &[CountdownOption]) -> Model {
    new_with_options(&Options::from_opts(opts))
}

/// Creates a widget from an [`Options`] value, without validation.
pub fn new_with_options(options: &Options) -> Model {
    Model::with_surface(
        merge(options, &DEFAULTS),
        PixelSurface::default(),
        Arc::new(SystemClock),
    )
}

/// Like [`new`], but rejects configurations that cannot produce a pie.
///
/// ```rust
/// use bubbletea_countdown::config::{with_size, ConfigError};
/// use bubbletea_countdown::countdown::try_new;
///
/// assert!(try_new(&[with_size(64)]).is_ok());
/// assert!(matches!(try_new(&[with_size(0)]), Err(ConfigError::ZeroSize)));
/// ```
pub fn try_new(opts: &[CountdownOption]) -> Result<Model, ConfigError> {
    try_new_with_options(&Options::from_opts(opts))
}

/// Like [`new_with_options`], but validates the merged configuration.
pub fn try_new_with_options(options: &Options) -> Result<Model, ConfigError> {
    let config = merge(options, &DEFAULTS);
    config.validate()?;
    Ok(Model::with_surface(
        config,
        PixelSurface::default(),
        Arc::new(SystemClock),
    ))
}

impl<S: Surface> Model<S> {
    /// Creates a widget drawing on `surface` and reading time from `clock`.
    ///
    /// The surface is resized to `size`×`size`, styled, and the idle pie is
    /// drawn right away.
    pub fn with_surface(config: Config, mut surface: S, clock: Arc<dyn Clock>) -> Self {
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| rand_id(ID_KEY, DEFAULT_ID_LEN));

        surface.set_dimensions(config.size, config.size);
        surface.set_fill_style(&config.color);
        surface.set_stroke_style(&config.border_color);
        surface.set_line_width(config.border_width);
        surface.set_line_join(LineJoin::Round);

        let mut model = Self {
            view_width: DEFAULT_VIEW_WIDTH,
            config,
            id,
            surface,
            clock,
            instance: next_instance(),
            tag: 0,
            running: false,
            total_duration_ms: 0.0,
            target_end_time: 0.0,
            on_complete: None,
        };
        model.draw_timer(0.0);

        debug!(id = %model.id, size = model.config.size, "countdown created");
        model
    }

    /// The widget's label, generated as `timer_XXXX` unless configured.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Class name reported to embedding hosts.
    pub fn class_name(&self) -> &str {
        &self.config.class_name
    }

    /// Side length of the square surface, in pixels.
    pub fn size(&self) -> u32 {
        self.config.size
    }

    /// Fill color of the pie.
    pub fn color(&self) -> &str {
        &self.config.color
    }

    /// Outline color of the pie.
    pub fn border_color(&self) -> &str {
        &self.config.border_color
    }

    /// Outline width of the pie.
    pub fn border_width(&self) -> f64 {
        self.config.border_width
    }

    /// The configuration the widget was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The owned drawing surface, for hosts that display it.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a countdown is in progress.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Length of the current countdown in milliseconds, while running.
    pub fn total_duration_ms(&self) -> Option<f64> {
        self.running.then_some(self.total_duration_ms)
    }

    /// Fraction of the current countdown still left, clamped to `[0, 1]`.
    pub fn remaining_ratio(&self) -> Option<f64> {
        if !self.running {
            return None;
        }
        let ratio = (self.target_end_time - self.now()) / self.total_duration_ms;
        Some(if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) })
    }

    /// Starts a countdown of `seconds` with no completion callback.
    ///
    /// See [`start_with_callback`](Model::start_with_callback).
    pub fn start(&mut self, seconds: f64) -> Option<Cmd> {
        self.start_inner(seconds, None)
    }

    /// Starts a countdown of `seconds` and runs `callback` when it expires.
    ///
    /// Does nothing and returns `None` when a countdown is already running;
    /// the running one keeps its duration and callback. Otherwise the first
    /// frame is drawn immediately and the command driving the next tick is
    /// returned. Zero, negative or NaN durations complete right away.
    pub fn start_with_callback<F>(&mut self, seconds: f64, callback: F) -> Option<Cmd>
    where
        F: FnOnce(&Model<S>) + Send + 'static,
    {
        self.start_inner(seconds, Some(Box::new(callback)))
    }

    /// Cancels the running countdown without calling its callback.
    ///
    /// The surface is cleared and ticks already in flight are ignored.
    /// Returns whether a countdown was cancelled.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.tag += 1;
        self.on_complete = None;
        self.clear();
        debug!(id = %self.id, "countdown cancelled");
        true
    }

    /// Handles a message, advancing the countdown on its own ticks.
    ///
    /// Returns the next tick command while time remains, the
    /// [`CompleteMsg`] command on expiry, and `None` for anything else.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.instance != self.instance || tick_msg.tag != self.tag {
                return None;
            }
            return self.frame();
        }
        None
    }

    fn start_inner(&mut self, seconds: f64, callback: Option<Callback<S>>) -> Option<Cmd> {
        if self.running {
            debug!(id = %self.id, "countdown already running, start ignored");
            return None;
        }

        self.total_duration_ms = seconds * 1000.0;
        self.target_end_time = self.now() + self.total_duration_ms;
        self.running = true;
        self.on_complete = callback;
        self.tag += 1;

        debug!(
            id = %self.id,
            duration_ms = self.total_duration_ms,
            "countdown started"
        );
        self.frame()
    }

    // One step of the loop: redraw and reschedule, or finish.
    fn frame(&mut self) -> Option<Cmd> {
        if !self.running {
            return None;
        }

        let delta = self.target_end_time - self.now();
        if delta > 0.0 {
            let ratio = delta / self.total_duration_ms;
            trace!(id = %self.id, ratio, "tick");
            self.draw_timer(ratio);
            return Some(self.tick());
        }

        self.clear();
        self.running = false;
        debug!(id = %self.id, "countdown complete");
        if let Some(callback) = self.on_complete.take() {
            callback(&*self);
        }
        Some(self.complete_cmd())
    }

    fn draw_timer(&mut self, ratio: f64) {
        let size = f64::from(self.config.size);
        let arc = arc_for_ratio(ratio, self.config.size, self.config.border_width);
        let (cx, cy) = arc.center;

        let ctx = &mut self.surface;
        ctx.clear_rect(0.0, 0.0, size, size);
        ctx.begin_path();
        ctx.move_to(cx, cy);
        ctx.arc(
            cx,
            cy,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
            arc.anticlockwise,
        );
        ctx.close_path();
        ctx.fill();
        ctx.stroke();
    }

    fn clear(&mut self) {
        let size = f64::from(self.config.size);
        self.surface.clear_rect(0.0, 0.0, size, size);
    }

    fn now(&self) -> f64 {
        self.clock.now_ms() as f64
    }

    fn tick(&self) -> Cmd {
        let instance = self.instance;
        let tag = self.tag;
        bubbletea_tick(CADENCE, move |_| Box::new(TickMsg { instance, tag }) as Msg)
    }

    fn complete_cmd(&self) -> Cmd {
        let id = self.id.clone();
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CompleteMsg { id: id.clone() }) as Msg
        })
    }
}

impl Model<PixelSurface> {
    /// Renders the surface as coloured half blocks, `view_width` columns wide.
    pub fn view(&self) -> String {
        self.surface.render_blocks(self.view_width)
    }
}

impl<S: Surface> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("instance", &self.instance)
            .field("running", &self.running)
            .field("total_duration_ms", &self.total_duration_ms)
            .field("view_width", &self.view_width)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Model::default();
        let cmd = model.start(60.0);
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
