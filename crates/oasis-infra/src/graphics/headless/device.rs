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

use std::collections::HashMap;

use oasis_core::renderer::{
    BufferTarget, BufferUsage, DeviceInfo, DeviceStats, FramebufferStatus, GraphicsBackendType,
    GraphicsDevice, HostRegion, ResourceError, ResourceHandle, ResourceKind, TextureFormat,
    TextureParams,
};

#[derive(Debug)]
struct BufferEntry {
    target: BufferTarget,
    usage: Option<BufferUsage>,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct TextureEntry {
    format: Option<TextureFormat>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    params: Option<TextureParams>,
}

#[derive(Debug)]
struct RenderbufferEntry {
    format: TextureFormat,
}

#[derive(Debug, Default)]
struct FramebufferEntry {
    color: Option<ResourceHandle>,
    depth: Option<ResourceHandle>,
}

/// A [`GraphicsDevice`] without a GPU.
///
/// Uploaded contents are kept in host memory and can be inspected, which makes the
/// device suitable for tests and tools. Framebuffer completeness follows the GL
/// rules that can be checked without a driver.
#[derive(Debug)]
pub struct HeadlessDevice {
    next_id: u32,
    buffers: HashMap<ResourceHandle, BufferEntry>,
    textures: HashMap<ResourceHandle, TextureEntry>,
    renderbuffers: HashMap<ResourceHandle, RenderbufferEntry>,
    framebuffers: HashMap<ResourceHandle, FramebufferEntry>,
    stats: DeviceStats,
}

impl HeadlessDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        log::info!("HeadlessDevice: Created.");
        Self {
            next_id: 1,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            renderbuffers: HashMap::new(),
            framebuffers: HashMap::new(),
            stats: DeviceStats::default(),
        }
    }

    /// The bytes last uploaded to a buffer, or `None` for an unknown handle.
    pub fn buffer_contents(&self, handle: ResourceHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(|b| b.data.as_slice())
    }

    /// The usage hint of the last upload to a buffer.
    pub fn buffer_usage(&self, handle: ResourceHandle) -> Option<BufferUsage> {
        self.buffers.get(&handle).and_then(|b| b.usage)
    }

    /// The binding point a buffer was created for.
    pub fn buffer_target(&self, handle: ResourceHandle) -> Option<BufferTarget> {
        self.buffers.get(&handle).map(|b| b.target)
    }

    /// The pixels last uploaded to a texture.
    pub fn texture_pixels(&self, handle: ResourceHandle) -> Option<&[u8]> {
        self.textures.get(&handle).map(|t| t.pixels.as_slice())
    }

    /// The dimensions of a texture's storage, `(0, 0)` before the first upload.
    pub fn texture_size(&self, handle: ResourceHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle).map(|t| (t.width, t.height))
    }

    /// The sampling parameters last applied to a texture.
    pub fn texture_params(&self, handle: ResourceHandle) -> Option<TextureParams> {
        self.textures.get(&handle).and_then(|t| t.params)
    }

    /// Returns `true` if the handle refers to a live object.
    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        match handle.kind() {
            ResourceKind::Buffer => self.buffers.contains_key(&handle),
            ResourceKind::Texture => self.textures.contains_key(&handle),
            ResourceKind::Renderbuffer => self.renderbuffers.contains_key(&handle),
            ResourceKind::Framebuffer => self.framebuffers.contains_key(&handle),
        }
    }

    fn next_handle(&mut self, kind: ResourceKind) -> Result<ResourceHandle, ResourceError> {
        let handle = ResourceHandle::new(self.next_id, kind)
            .ok_or_else(|| ResourceError::BackendError("object names exhausted".to_string()))?;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| ResourceError::BackendError("object names exhausted".to_string()))?;
        self.stats.record_created(kind);
        log::debug!("HeadlessDevice: Created {handle}.");
        Ok(handle)
    }

    fn destroyed(&mut self, handle: ResourceHandle) {
        self.stats.record_destroyed(handle.kind());
        log::debug!("HeadlessDevice: Destroyed {handle}.");
    }

    fn framebuffer_status(&self, entry: &FramebufferEntry) -> FramebufferStatus {
        if entry.color.is_none() && entry.depth.is_none() {
            return FramebufferStatus::MissingAttachment;
        }
        if let Some(color) = entry.color {
            match self.textures.get(&color) {
                Some(TextureEntry {
                    format: Some(format),
                    ..
                }) if !format.is_depth_format() => {}
                _ => return FramebufferStatus::IncompleteAttachment,
            }
        }
        if let Some(depth) = entry.depth {
            match self.renderbuffers.get(&depth) {
                Some(rb) if rb.format.is_depth_format() => {}
                _ => return FramebufferStatus::IncompleteAttachment,
            }
        }
        FramebufferStatus::Complete
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Headless Device".to_string(),
            backend_type: GraphicsBackendType::Headless,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn allocate_host_memory(&mut self, bytes: usize) -> HostRegion {
        self.stats.record_host_alloc(bytes);
        HostRegion::zeroed(bytes)
    }

    fn free_host_memory(&mut self, region: HostRegion) {
        self.stats.record_host_free(region.len());
    }

    fn create_buffer(&mut self, target: BufferTarget) -> Result<ResourceHandle, ResourceError> {
        let handle = self.next_handle(ResourceKind::Buffer)?;
        self.buffers.insert(
            handle,
            BufferEntry {
                target,
                usage: None,
                data: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn upload_buffer(
        &mut self,
        handle: ResourceHandle,
        _target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        let entry = self
            .buffers
            .get_mut(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        entry.data.clear();
        entry.data.extend_from_slice(data);
        entry.usage = Some(usage);
        self.stats.uploads += 1;
        log::trace!("HeadlessDevice: Uploaded {} bytes to {handle}.", data.len());
        Ok(())
    }

    fn destroy_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.buffers
            .remove(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        self.destroyed(handle);
        Ok(())
    }

    fn create_texture(&mut self) -> Result<ResourceHandle, ResourceError> {
        let handle = self.next_handle(ResourceKind::Texture)?;
        self.textures.insert(handle, TextureEntry::default());
        Ok(handle)
    }

    fn upload_texture(
        &mut self,
        handle: ResourceHandle,
        format: TextureFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), ResourceError> {
        let expected = format.input_image_bytes(width, height).ok_or_else(|| {
            ResourceError::InvalidDescriptor(format!("texture of {width}x{height} is too large"))
        })?;
        ResourceError::check_range(0, expected, pixels.len())?;
        let entry = self
            .textures
            .get_mut(&handle)
            .ok_or(ResourceError::InvalidHandle)?;

        entry.format = Some(format);
        entry.width = width;
        entry.height = height;
        entry.pixels.clear();
        entry.pixels.extend_from_slice(&pixels[..expected]);
        self.stats.uploads += 1;
        Ok(())
    }

    fn set_texture_params(
        &mut self,
        handle: ResourceHandle,
        params: &TextureParams,
    ) -> Result<(), ResourceError> {
        let entry = self
            .textures
            .get_mut(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        entry.params = Some(*params);
        Ok(())
    }

    fn destroy_texture(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.textures
            .remove(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        self.destroyed(handle);
        Ok(())
    }

    fn create_renderbuffer(
        &mut self,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<ResourceHandle, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::InvalidDescriptor(format!(
                "renderbuffer dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let handle = self.next_handle(ResourceKind::Renderbuffer)?;
        self.renderbuffers
            .insert(handle, RenderbufferEntry { format });
        Ok(handle)
    }

    fn destroy_renderbuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.renderbuffers
            .remove(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        self.destroyed(handle);
        Ok(())
    }

    fn create_framebuffer(&mut self) -> Result<ResourceHandle, ResourceError> {
        let handle = self.next_handle(ResourceKind::Framebuffer)?;
        self.framebuffers.insert(handle, FramebufferEntry::default());
        Ok(handle)
    }

    fn attach_color_texture(
        &mut self,
        framebuffer: ResourceHandle,
        texture: ResourceHandle,
    ) -> Result<(), ResourceError> {
        if !self.textures.contains_key(&texture) {
            return Err(ResourceError::InvalidHandle);
        }
        let entry = self
            .framebuffers
            .get_mut(&framebuffer)
            .ok_or(ResourceError::InvalidHandle)?;
        entry.color = Some(texture);
        Ok(())
    }

    fn attach_depth_renderbuffer(
        &mut self,
        framebuffer: ResourceHandle,
        renderbuffer: ResourceHandle,
    ) -> Result<(), ResourceError> {
        if !self.renderbuffers.contains_key(&renderbuffer) {
            return Err(ResourceError::InvalidHandle);
        }
        let entry = self
            .framebuffers
            .get_mut(&framebuffer)
            .ok_or(ResourceError::InvalidHandle)?;
        entry.depth = Some(renderbuffer);
        Ok(())
    }

    fn check_framebuffer_status(
        &mut self,
        framebuffer: ResourceHandle,
    ) -> Result<FramebufferStatus, ResourceError> {
        let entry = self
            .framebuffers
            .get(&framebuffer)
            .ok_or(ResourceError::InvalidHandle)?;
        Ok(self.framebuffer_status(entry))
    }

    fn destroy_framebuffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.framebuffers
            .remove(&handle)
            .ok_or(ResourceError::InvalidHandle)?;
        self.destroyed(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_non_zero() {
        let mut device = HeadlessDevice::new();
        let a = device.create_buffer(BufferTarget::Vertex).unwrap();
        let b = device.create_texture().unwrap();
        assert_ne!(a.native_id(), 0);
        assert_ne!(a.native_id(), b.native_id());
    }

    #[test]
    fn wrong_kind_is_an_invalid_handle() {
        let mut device = HeadlessDevice::new();
        let texture = device.create_texture().unwrap();
        assert_eq!(device.destroy_buffer(texture), Err(ResourceError::InvalidHandle));
        assert!(device.is_live(texture));
    }

    #[test]
    fn destroying_twice_fails() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_buffer(BufferTarget::Index).unwrap();
        device.destroy_buffer(buffer).unwrap();
        assert_eq!(device.destroy_buffer(buffer), Err(ResourceError::InvalidHandle));
        assert_eq!(device.stats().live_buffers, 0);
    }

    #[test]
    fn empty_framebuffer_is_missing_attachments() {
        let mut device = HeadlessDevice::new();
        let framebuffer = device.create_framebuffer().unwrap();
        assert_eq!(
            device.check_framebuffer_status(framebuffer),
            Ok(FramebufferStatus::MissingAttachment)
        );
    }

    #[test]
    fn unuploaded_color_texture_is_incomplete() {
        let mut device = HeadlessDevice::new();
        let framebuffer = device.create_framebuffer().unwrap();
        let texture = device.create_texture().unwrap();
        device.attach_color_texture(framebuffer, texture).unwrap();

        assert_eq!(
            device.check_framebuffer_status(framebuffer),
            Ok(FramebufferStatus::IncompleteAttachment)
        );

        device
            .upload_texture(texture, TextureFormat::Rgba8, 1, 1, &[0; 4])
            .unwrap();
        assert_eq!(
            device.check_framebuffer_status(framebuffer),
            Ok(FramebufferStatus::Complete)
        );
    }

    #[test]
    fn color_renderbuffer_as_depth_is_incomplete() {
        let mut device = HeadlessDevice::new();
        let framebuffer = device.create_framebuffer().unwrap();
        let renderbuffer = device
            .create_renderbuffer(TextureFormat::Rgba8, 4, 4)
            .unwrap();
        device
            .attach_depth_renderbuffer(framebuffer, renderbuffer)
            .unwrap();

        assert_eq!(
            device.check_framebuffer_status(framebuffer),
            Ok(FramebufferStatus::IncompleteAttachment)
        );
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        let mut device = HeadlessDevice::new();
        let texture = device.create_texture().unwrap();
        assert!(matches!(
            device.upload_texture(texture, TextureFormat::Rgba, 2, 2, &[0; 8]),
            Err(ResourceError::OutOfBounds { .. })
        ));
        assert_eq!(device.texture_size(texture), Some((0, 0)));
    }

    #[test]
    fn oversized_texture_is_rejected() {
        let mut device = HeadlessDevice::new();
        let texture = device.create_texture().unwrap();
        if usize::BITS == 64 {
            assert!(matches!(
                device.upload_texture(texture, TextureFormat::Rgba8, u32::MAX, u32::MAX, &[]),
                Err(ResourceError::InvalidDescriptor(_))
            ));
        }
        assert_eq!(device.texture_size(texture), Some((0, 0)));
    }
}
