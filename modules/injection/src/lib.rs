// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Mock location injection core
//!
//! Provides the [`SourceRegistrar`](registrar::SourceRegistrar) that makes
//! the synthetic source visible to the location subsystem, the
//! [`MockLocationInjector`](injector::MockLocationInjector) that drives
//! fixes through it and the [`MockLocationModule`] that hosts both on the
//! event bus.

use async_trait::async_trait;
use common::position::Position;
use injector::{InjectionConfig, MockLocationInjector};
use location_service::LocationService;
use module_core::{EventKind, Module, ModuleCtx};
use registrar::SourceRegistrar;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

pub mod injector;
pub mod registrar;

/// The fixed name of the synthetic location source.
///
/// Distinct from any real provider name, so consumers can tell the
/// source apart and the registrar can reconcile a stale registration
/// after an unclean exit.
pub const MOCK_SOURCE_NAME: &str = "mockloc";

/// The default pause between two injected fixes.
pub const INJECTION_INTERVAL: Duration = Duration::from_millis(250);

/// The service shell owning the registrar and the injector.
///
/// Registers the mock source when it starts, (re)targets the injector
/// for the initial coordinate and for every
/// [`MockPositionEvent`](EventKind::MockPositionEvent), and tears the
/// injector and the registration down on
/// [`QuitEvent`](EventKind::QuitEvent). All registrar and injector calls
/// go through this module, which keeps them serialized.
pub struct MockLocationModule {
    ctx: ModuleCtx,
    registrar: SourceRegistrar,
    injector: MockLocationInjector,
    initial_position: Option<Position>,
}

impl MockLocationModule {
    /// Creates the module.
    ///
    /// # Arguments
    ///
    /// * `ctx` – The event bus context of this module.
    /// * `service` – The location subsystem to register with and inject into.
    /// * `config` – Cadence and optional iteration cap for injection runs.
    /// * `initial_position` – A coordinate to start injecting as soon as
    ///   the module runs, before any event arrives.
    pub fn new(
        ctx: ModuleCtx,
        service: Arc<dyn LocationService>,
        config: InjectionConfig,
        initial_position: Option<Position>,
    ) -> Self {
        let registrar = SourceRegistrar::new(service.clone());
        let injector = MockLocationInjector::new(service, ctx.sender.clone(), config);
        MockLocationModule {
            ctx,
            registrar,
            injector,
            initial_position,
        }
    }
}

#[async_trait]
impl Module for MockLocationModule {
    async fn run(&mut self) -> Result<(), ()> {
        self.registrar.register();
        if let Some(position) = self.initial_position.take() {
            self.injector.start(position).await;
        }
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => match event.kind {
                            EventKind::QuitEvent => run = false,
                            EventKind::MockPositionEvent(position) => {
                                self.injector.start(*position).await;
                            }
                            _ => {}
                        },
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => run = false,
                        Err(e) => error!("Failed to receive event. Error: {}", e),
                    }
                }
            }
        }
        self.injector.stop().await;
        self.registrar.unregister();
        info!("Mock location module stopped");
        Ok(())
    }
}
