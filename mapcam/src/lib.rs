//! Mapcam is a camera animation engine for interactive maps. It eases the camera between positions, flies
//! it along the "optimal path" that zooms out in the middle of long flights, and continues pan gestures by
//! inertia.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use mapcam::camera::{CameraOptions, CameraState};
//! use mapcam::mapcam_types::cartesian::Size;
//! use mapcam::mapcam_types::latlon;
//! use mapcam::{CameraAnimationsManager, Map};
//!
//! let map = Map::new(CameraState::default(), Size::new(800.0, 600.0), None);
//! let mut manager = CameraAnimationsManager::new(map);
//!
//! manager
//!     .fly_to(
//!         CameraOptions::default()
//!             .with_center(latlon!(52.52, 13.405))
//!             .with_zoom(12.0),
//!         None,
//!         None,
//!         None,
//!     )
//!     .expect("flight path is valid");
//!
//! // On every frame:
//! manager.update();
//! ```
//!
//! # Main components
//!
//! * A [`MapEngine`] is the map whose camera is animated. The crate provides an in-memory [`Map`], but any
//!   type that can report and change its camera can be used.
//! * [`animator`]s compute the camera on every frame and write it into the engine. Each of them goes
//!   through the `Initial -> Running <-> Paused -> Final` state machine.
//! * [`CameraAnimatorsRunner`] owns all animators, updates the running ones and releases finished ones.
//!   Callers keep an [`AnimatorHandle`] to control an animator after giving it to the runner.
//! * [`CameraAnimationsManager`] ties all of the above together and provides the high level API.
//!
//! Time is read through a [`Clock`](clock::Clock), so animations can be driven deterministically with a
//! [`ManualClock`](clock::ManualClock).

pub mod animator;
pub mod camera;
pub mod clock;
pub mod engine;
pub mod error;
mod factory;
pub mod interpolation;
mod manager;
mod map;
mod messenger;
pub mod runner;
pub mod timing;

pub use engine::MapEngine;
pub use factory::CameraAnimatorsFactory;
pub use manager::{CameraAnimationsConfiguration, CameraAnimationsManager};
pub use map::Map;
pub use messenger::Messenger;
pub use runner::{AnimatorHandle, AnimatorId, CameraAnimatorsRunner};

// Reexport mapcam_types
pub use mapcam_types;
