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

//! Provides the public, backend-agnostic resource contracts for the Oasis engine.
//!
//! This module defines the "common language" for GPU resource management. It contains
//! the abstract [`GraphicsDevice`] trait, the host-side resource wrappers (staging
//! buffers, textures, framebuffers) and the error types shared by every backend.
//!
//! The 'how' lives in the `oasis-infra` crate, which implements [`GraphicsDevice`]
//! for OpenGL and for an in-memory headless device.

pub mod api;
pub mod error;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::ResourceError;
pub use self::traits::GraphicsDevice;
