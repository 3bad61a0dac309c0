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

//! 2D textures with deferred pixel and parameter uploads.

use super::handle::ResourceHandle;
use super::host::HostRegion;
use crate::renderer::api::util::enums::{MagFilter, MinFilter, TextureFormat};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// Sampling parameters of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// The minification filter.
    pub min_filter: MinFilter,
    /// The magnification filter.
    pub mag_filter: MagFilter,
    /// The number of mip levels, at least 1.
    pub mip_levels: u32,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            min_filter: MinFilter::Linear,
            mag_filter: MagFilter::Linear,
            mip_levels: 1,
        }
    }
}

/// A 2D texture whose pixels are staged in host memory.
///
/// Pixel edits and parameter edits are tracked separately, so changing a filter
/// never re-sends the pixels.
#[derive(Debug)]
pub struct Texture2d {
    handle: Option<ResourceHandle>,
    format: TextureFormat,
    width: u32,
    height: u32,
    pixels: HostRegion,
    params: TextureParams,
    dirty: bool,
    dirty_params: bool,
}

impl Texture2d {
    /// Creates a zero-filled texture of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidDescriptor`] if either dimension is zero.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, ResourceError> {
        let bytes = Self::bytes_for(format, width, height)?;
        let handle = device.create_texture()?;
        let pixels = device.allocate_host_memory(bytes);
        log::debug!("Created texture {handle} ({width}x{height} {format:?})");

        Ok(Self {
            handle: Some(handle),
            format,
            width,
            height,
            pixels,
            params: TextureParams::default(),
            dirty: true,
            dirty_params: true,
        })
    }

    /// The GPU handle, or `None` once released.
    pub fn handle(&self) -> Option<ResourceHandle> {
        self.handle
    }

    /// Returns `true` once the texture has been released.
    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// The storage format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// The width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The current sampling parameters.
    pub fn params(&self) -> TextureParams {
        self.params
    }

    /// Returns `true` if the pixels need an upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if the sampling parameters need an upload.
    pub fn params_dirty(&self) -> bool {
        self.dirty_params
    }

    /// Writes a `width` x `height` block of host pixels at (`x`, `y`).
    ///
    /// `pixels` holds the block row by row, tightly packed.
    pub fn set_data(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), ResourceError> {
        self.live_handle()?;
        let row_bytes = self.check_rect(x, y, width, height, pixels.len())?;
        let stride = self.width as usize * self.format.input_bytes_per_pixel();
        let origin = x as usize * self.format.input_bytes_per_pixel();

        let dst = self.pixels.as_bytes_mut();
        for (row, src) in pixels.chunks_exact(row_bytes.max(1)).take(height as usize).enumerate() {
            let begin = (y as usize + row) * stride + origin;
            dst[begin..begin + row_bytes].copy_from_slice(&src[..row_bytes]);
        }
        self.dirty = true;
        Ok(())
    }

    /// Reads a `width` x `height` block of host pixels at (`x`, `y`) into `out`.
    pub fn get_data(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> Result<(), ResourceError> {
        self.live_handle()?;
        let row_bytes = self.check_rect(x, y, width, height, out.len())?;
        let stride = self.width as usize * self.format.input_bytes_per_pixel();
        let origin = x as usize * self.format.input_bytes_per_pixel();

        let src = self.pixels.as_bytes();
        for (row, dst) in out.chunks_exact_mut(row_bytes.max(1)).take(height as usize).enumerate() {
            let begin = (y as usize + row) * stride + origin;
            dst[..row_bytes].copy_from_slice(&src[begin..begin + row_bytes]);
        }
        Ok(())
    }

    /// Changes the texture's dimensions, discarding its pixels.
    pub fn resize(
        &mut self,
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError> {
        self.live_handle()?;
        if width == self.width && height == self.height {
            return Ok(());
        }

        let bytes = Self::bytes_for(self.format, width, height)?;
        let old = std::mem::take(&mut self.pixels);
        device.free_host_memory(old);
        self.pixels = device.allocate_host_memory(bytes);
        self.width = width;
        self.height = height;
        self.dirty = true;
        Ok(())
    }

    /// Sets the minification and magnification filters.
    pub fn set_filters(&mut self, min_filter: MinFilter, mag_filter: MagFilter) {
        if self.params.min_filter != min_filter || self.params.mag_filter != mag_filter {
            self.params.min_filter = min_filter;
            self.params.mag_filter = mag_filter;
            self.dirty_params = true;
        }
    }

    /// Sets the number of mip levels. Zero is treated as one.
    pub fn set_mipmaps(&mut self, levels: u32) {
        let levels = levels.max(1);
        if self.params.mip_levels != levels {
            self.params.mip_levels = levels;
            self.dirty_params = true;
        }
    }

    /// Sends dirty pixels, then dirty parameters, to the GPU.
    ///
    /// Returns `true` if any device work was performed.
    pub fn upload(&mut self, device: &mut dyn GraphicsDevice) -> Result<bool, ResourceError> {
        let handle = self.live_handle()?;
        let mut uploaded = false;

        if self.dirty {
            device.upload_texture(
                handle,
                self.format,
                self.width,
                self.height,
                self.pixels.as_bytes(),
            )?;
            self.dirty = false;
            uploaded = true;
        }
        if self.dirty_params {
            device.set_texture_params(handle, &self.params)?;
            self.dirty_params = false;
            uploaded = true;
        }
        Ok(uploaded)
    }

    /// Destroys the GPU texture and returns the host pixels to the device.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        let handle = self.live_handle()?;
        device.destroy_texture(handle)?;
        self.handle = None;

        let pixels = std::mem::take(&mut self.pixels);
        device.free_host_memory(pixels);
        self.dirty = true;
        self.dirty_params = true;
        log::debug!("Released texture {handle}");
        Ok(())
    }

    fn live_handle(&self) -> Result<ResourceHandle, ResourceError> {
        self.handle.ok_or(ResourceError::Released)
    }

    // Returns the byte length of one block row.
    fn check_rect(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        available: usize,
    ) -> Result<usize, ResourceError> {
        ResourceError::check_range(x as usize, width as usize, self.width as usize)?;
        ResourceError::check_range(y as usize, height as usize, self.height as usize)?;
        let row_bytes = width as usize * self.format.input_bytes_per_pixel();
        ResourceError::check_range(0, row_bytes * height as usize, available)?;
        Ok(row_bytes)
    }

    fn bytes_for(format: TextureFormat, width: u32, height: u32) -> Result<usize, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::InvalidDescriptor(format!(
                "texture dimensions must be non-zero, got {width}x{height}"
            )));
        }
        format.input_image_bytes(width, height).ok_or_else(|| {
            ResourceError::InvalidDescriptor(format!("texture of {width}x{height} is too large"))
        })
    }
}

impl Drop for Texture2d {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            log::warn!("Texture {handle} dropped without release; the native object leaks");
        }
    }
}
