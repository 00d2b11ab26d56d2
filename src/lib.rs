#![warn(missing_docs)]

//! # bubbletea-countdown
//!
//! A countdown widget that shows the remaining time as a shrinking pie, for
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications and
//! anything else that can drive a tick loop.
//!
//! ## Overview
//!
//! Give the widget a duration and it redraws a pie 25 times a second, from a
//! full disc at 12 o'clock shrinking clockwise to nothing. When the time is
//! up the drawing is cleared and the completion callback runs once. The
//! widget can be started again as often as you like, but only one countdown
//! runs at a time: starting a running widget does nothing.
//!
//! The widget follows the Elm Architecture like other bubbletea-rs
//! components: `start()` and `update()` return commands, `view()` returns a
//! string.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`countdown`] | The widget, its messages and the tick loop |
//! | [`config`] | Defaults, options and validation |
//! | [`geometry`] | Arc angles for a given remaining ratio |
//! | [`surface`] | The `Surface` drawing trait and a recording implementation |
//! | [`raster`] | A pixel surface and its terminal rendering |
//! | [`clock`] | Time sources |
//! | [`id`] | Random widget ids |
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//!
//! let mut timer = countdown_new(&[with_size(64), with_color("#0f0")]);
//! let _cmd = timer.start_with_callback(3.0, |t| println!("{} done", t.id()));
//! assert!(timer.running());
//! ```
//!
//! ## Drawing elsewhere
//!
//! The pie is drawn through the [`surface::Surface`] trait. Implement it for
//! your own 2D context and build the widget with
//! [`countdown::Model::with_surface`]:
//!
//! ```rust
//! use bubbletea_countdown::clock::SystemClock;
//! use bubbletea_countdown::config::Config;
//! use bubbletea_countdown::countdown::Model;
//! use bubbletea_countdown::surface::RecordingSurface;
//! use std::sync::Arc;
//!
//! let timer = Model::with_surface(Config::default(), RecordingSurface::new(), Arc::new(SystemClock));
//! assert!(!timer.surface().ops().is_empty());
//! ```

pub mod clock;
pub mod config;
pub mod countdown;
pub mod geometry;
pub mod id;
pub mod raster;
pub mod surface;

pub use config::{Config, ConfigError, CountdownOption, Options};
pub use countdown::{
    new as countdown_new, try_new as countdown_try_new, CompleteMsg as CountdownCompleteMsg,
    Model as Countdown, TickMsg as CountdownTickMsg,
};
pub use raster::PixelSurface;
pub use surface::{LineJoin, Surface};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let timer: Countdown = countdown_new(&[with_border_width(1.0)]);
/// assert_eq!(timer.border_width(), 1.0);
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{
        with_border_color, with_border_width, with_class_name, with_color, with_id, with_size,
        Config, ConfigError, CountdownOption, Options,
    };
    pub use crate::countdown::{
        new as countdown_new, try_new as countdown_try_new, CompleteMsg as CountdownCompleteMsg,
        Model as Countdown, TickMsg as CountdownTickMsg,
    };
    pub use crate::raster::PixelSurface;
    pub use crate::surface::{DrawOp, LineJoin, RecordingSurface, Surface};
}
