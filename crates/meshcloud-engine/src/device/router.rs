use crate::backend::{BackendFactory, GraphicsBackend};

use super::{DeviceEvent, GraphicsApi, HostGraphics, RouterError};

/// Owns the active backend and moves it through the device lifecycle.
///
/// States:
/// - no device: `api() == GraphicsApi::Null`, no backend
/// - device active: `api()` is the host's API; a backend exists unless the
///   factory does not support that API
///
/// Initialize creates the backend and forwards the event so it can build its
/// GPU objects. Shutdown is forwarded first, then the backend is dropped and
/// the router returns to the no-device state. The cycle may repeat any number
/// of times over the process lifetime.
pub struct DeviceRouter<F> {
    factory: F,
    backend: Option<Box<dyn GraphicsBackend>>,
    api: GraphicsApi,
}

impl<F: BackendFactory> DeviceRouter<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            backend: None,
            api: GraphicsApi::Null,
        }
    }

    /// Handles one device lifecycle event.
    ///
    /// Initialize while a backend is alive is a caller bug and is reported as
    /// [`RouterError::AlreadyInitialized`] without touching the live backend.
    /// A backend whose Initialize fails is discarded, so later render events
    /// degrade to no-ops.
    pub fn on_device_event(
        &mut self,
        event: DeviceEvent,
        host: &dyn HostGraphics,
    ) -> Result<(), RouterError> {
        if event == DeviceEvent::Initialize {
            if self.backend.is_some() {
                return Err(RouterError::AlreadyInitialized { api: self.api });
            }

            self.api = host.renderer();
            self.backend = self.factory.create(self.api);

            match &self.backend {
                Some(_) => log::info!("device initialized; {:?} backend created", self.api),
                None => log::info!(
                    "device initialized; no backend for {:?}, GPU work disabled",
                    self.api
                ),
            }
        }

        let forwarded = match self.backend.as_mut() {
            Some(backend) => backend.process_device_event(event, host),
            None => Ok(()),
        };

        if event == DeviceEvent::Shutdown {
            if self.backend.take().is_some() {
                log::info!("device shut down; {:?} backend released", self.api);
            }
            self.api = GraphicsApi::Null;
        } else if event == DeviceEvent::Initialize && forwarded.is_err() {
            self.backend = None;
        }

        forwarded.map_err(RouterError::from)
    }

    /// API of the active device, `GraphicsApi::Null` when there is none.
    pub fn api(&self) -> GraphicsApi {
        self.api
    }

    /// Returns `true` while a backend exists.
    pub fn is_active(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_mut(&mut self) -> Option<&mut (dyn GraphicsBackend + 'static)> {
        self.backend.as_deref_mut()
    }
}
