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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The capability a backend exposes to the resource layer.
///
/// Every call must be made from the thread that owns the device context; devices
/// take `&mut self` and perform no internal locking. Native objects are created
/// empty and configured by follow-up calls, and implementations restore whatever
/// object was bound before they configured a new one.
pub trait GraphicsDevice: Debug {
    /// Get the information describing this device.
    fn info(&self) -> DeviceInfo;

    /// Returns a snapshot of the resources the device currently owns.
    fn stats(&self) -> DeviceStats;

    /// Allocates a zero-filled host region.
    /// ## Arguments
    /// * `bytes` - The size of the region in bytes. Zero is allowed.
    /// ## Returns
    /// The new region; ownership passes to the caller until it is handed back with
    /// [`GraphicsDevice::free_host_memory`].
    fn allocate_host_memory(&mut self, bytes: usize) -> HostRegion;

    /// Returns a host region previously obtained from [`GraphicsDevice::allocate_host_memory`].
    /// ## Arguments
    /// * `region` - The region to release.
    fn free_host_memory(&mut self, region: HostRegion);

    /// Creates a new, empty GPU buffer.
    /// ## Arguments
    /// * `target` - The binding point the buffer's data is destined for.
    /// ## Returns
    /// A `Result` containing the handle of the created buffer or an error if the creation fails.
    fn create_buffer(&mut self, target: BufferTarget) -> Result<ResourceHandle, ResourceError>;

    /// Replaces the whole contents of a GPU buffer.
    /// ## Arguments
    /// * `handle` - The buffer to write to.
    /// * `target` - The binding point used while configuring the buffer.
    /// * `data` - The new contents; the buffer is resized to `data.len()` bytes.
    /// * `usage` - The usage hint passed to the driver.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn upload_buffer(
        &mut self,
        handle: ResourceHandle,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer.
    /// ## Arguments
    /// * `handle` - The buffer to be destroyed.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;

    /// Creates a new, empty 2D texture.
    /// ## Returns
    /// A `Result` containing the handle of the created texture or an error if the creation fails.
    fn create_texture(&mut self) -> Result<ResourceHandle, ResourceError>;

    /// Defines the storage of a texture and fills it with host pixels.
    /// ## Arguments
    /// * `handle` - The texture to write to.
    /// * `format` - The internal storage format.
    /// * `width` - The width in pixels.
    /// * `height` - The height in pixels.
    /// * `pixels` - `width * height * format.input_bytes_per_pixel()` bytes of host pixels.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn upload_texture(
        &mut self,
        handle: ResourceHandle,
        format: TextureFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), ResourceError>;

    /// Applies sampling parameters to a texture.
    /// ## Arguments
    /// * `handle` - The texture to configure.
    /// * `params` - Filters and mip level count.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn set_texture_params(
        &mut self,
        handle: ResourceHandle,
        params: &TextureParams,
    ) -> Result<(), ResourceError>;

    /// Destroys a texture.
    /// ## Arguments
    /// * `handle` - The texture to be destroyed.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_texture(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;

    /// Creates a renderbuffer with storage of the given format and size.
    /// ## Returns
    /// A `Result` containing the handle of the created renderbuffer or an error if the creation fails.
    fn create_renderbuffer(
        &mut self,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Destroys a renderbuffer.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_renderbuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;

    /// Creates a framebuffer with no attachments.
    /// ## Returns
    /// A `Result` containing the handle of the created framebuffer or an error if the creation fails.
    fn create_framebuffer(&mut self) -> Result<ResourceHandle, ResourceError>;

    /// Attaches a texture as the first color attachment of a framebuffer.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn attach_color_texture(
        &mut self,
        framebuffer: ResourceHandle,
        texture: ResourceHandle,
    ) -> Result<(), ResourceError>;

    /// Attaches a renderbuffer as the depth attachment of a framebuffer.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn attach_depth_renderbuffer(
        &mut self,
        framebuffer: ResourceHandle,
        renderbuffer: ResourceHandle,
    ) -> Result<(), ResourceError>;

    /// Validates that a framebuffer's attachments form a usable render target.
    /// ## Returns
    /// The completeness status reported by the device. An incomplete framebuffer is
    /// not an error; only an invalid handle or a backend failure is.
    fn check_framebuffer_status(
        &mut self,
        framebuffer: ResourceHandle,
    ) -> Result<FramebufferStatus, ResourceError>;

    /// Destroys a framebuffer. Its attachments are not destroyed.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_framebuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
}
