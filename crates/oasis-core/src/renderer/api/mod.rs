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

//! Backend-agnostic resource API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`device`]**: Device information, statistics and settings.
//! - **[`resource`]**: Native handles and the host-side resource wrappers
//!   (staging buffers, textures, framebuffers, meshes).
//! - **[`util`]**: Engine-level enumerations and vertex layouts.

pub mod device;
pub mod resource;
pub mod util;

pub use self::device::{DeviceInfo, DeviceStats, GraphicsBackendType, GraphicsSettings};
pub use self::resource::{
    Framebuffer, FramebufferDescriptor, FramebufferStatus, HostRegion, IndexBuffer, Mesh,
    MeshData, ResourceHandle, ResourceKind, StagingBuffer, Texture2d, TextureParams,
    VertexBuffer,
};
pub use self::util::{
    Attribute, BufferTarget, BufferUsage, MagFilter, MinFilter, Primitive, TextureFormat,
    VertexFormat,
};
