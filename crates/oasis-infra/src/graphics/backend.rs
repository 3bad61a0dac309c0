// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Graphics backend selection with fallback support.
//!
//! The requested backend from [`GraphicsSettings`] is tried first. If it cannot be
//! created and the settings allow it, the headless device is used instead, so
//! tools and tests keep working on machines without a GL context.

use anyhow::{anyhow, Result};

use oasis_core::renderer::{GraphicsBackendType, GraphicsDevice, GraphicsSettings};

use super::gl::GlDevice;
use super::headless::HeadlessDevice;

/// Returns a human-readable name for a backend.
pub fn backend_name(backend: GraphicsBackendType) -> &'static str {
    match backend {
        GraphicsBackendType::OpenGl => "OpenGL",
        GraphicsBackendType::Headless => "Headless",
    }
}

/// Creates the device described by `settings`.
///
/// # Arguments
///
/// * `settings` - The requested backend and fallback policy.
/// * `gl` - A `glow` context current on the calling thread, if the caller has one.
///   The OpenGL backend is unavailable without it.
pub fn create_device(
    settings: &GraphicsSettings,
    gl: Option<glow::Context>,
) -> Result<Box<dyn GraphicsDevice>> {
    log::info!(
        "Creating graphics device (requested backend: {}).",
        backend_name(settings.backend)
    );

    match try_backend(settings.backend, gl) {
        Ok(device) => Ok(device),
        Err(e) if settings.fallback_to_headless && settings.backend != GraphicsBackendType::Headless => {
            log::warn!(
                "Failed to initialize {} backend: {e}. Falling back to headless.",
                backend_name(settings.backend)
            );
            try_backend(GraphicsBackendType::Headless, None)
        }
        Err(e) => Err(e),
    }
}

fn try_backend(
    backend: GraphicsBackendType,
    gl: Option<glow::Context>,
) -> Result<Box<dyn GraphicsDevice>> {
    let device: Box<dyn GraphicsDevice> = match backend {
        GraphicsBackendType::OpenGl => {
            let gl = gl.ok_or_else(|| anyhow!("no OpenGL context was provided"))?;
            Box::new(GlDevice::new(gl))
        }
        GraphicsBackendType::Headless => Box::new(HeadlessDevice::new()),
    };

    let info = device.info();
    log::info!(
        "Selected {} backend with device: \"{}\" ({})",
        backend_name(info.backend_type),
        info.name,
        info.version
    );
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_is_created_directly() {
        let settings = GraphicsSettings {
            backend: GraphicsBackendType::Headless,
            ..Default::default()
        };
        let device = create_device(&settings, None).unwrap();
        assert_eq!(device.info().backend_type, GraphicsBackendType::Headless);
    }

    #[test]
    fn missing_context_falls_back_to_headless() {
        let device = create_device(&GraphicsSettings::default(), None).unwrap();
        assert_eq!(device.info().backend_type, GraphicsBackendType::Headless);
    }

    #[test]
    fn missing_context_without_fallback_fails() {
        let settings = GraphicsSettings {
            fallback_to_headless: false,
            ..Default::default()
        };
        let err = create_device(&settings, None).unwrap_err();
        assert!(err.to_string().contains("no OpenGL context"));
    }
}
