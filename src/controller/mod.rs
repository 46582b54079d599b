//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates between the model and the external resources (camera,
//! backend). It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `flow`: Screen flow operations (camera lifecycle, backend calls)

mod input;
mod flow;

use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::camera::CameraSession;
use crate::config::Config;
use crate::model::AppModel;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    // std mutex: held only inside spawn_blocking while grabbing frames, or
    // for quick slot swaps; never across an await point
    pub(crate) camera: Arc<StdMutex<Option<CameraSession>>>,
    pub(crate) config: Config,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, config: Config) -> Self {
        Self {
            model,
            camera: Arc::new(StdMutex::new(None)),
            config,
        }
    }

    /// Release the camera if one is held. Idempotent; every path that leaves
    /// the capture screen funnels through here.
    pub(crate) fn release_camera(&self) {
        let session = match self.camera.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(mut session) = session {
            session.release();
        }
    }

    /// Final cleanup before the terminal is restored
    pub async fn shutdown(&self) {
        self.release_camera();
    }
}
