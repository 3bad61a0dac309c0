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

//! Host-side staging buffers with dirty tracking.
//!
//! A [`StagingBuffer`] mirrors the contents of a GPU buffer in host memory. Writes only
//! touch the host copy and mark the buffer dirty; [`StagingBuffer::upload`] pushes the
//! logical window to the device at most once per batch of writes.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use super::handle::ResourceHandle;
use super::host::HostRegion;
use crate::renderer::api::util::enums::{BufferTarget, BufferUsage};
use crate::renderer::api::util::vertex::VertexFormat;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// A typed host-side mirror of a GPU buffer.
///
/// The buffer has a `capacity` (elements backed by host memory) and a logical length
/// `len <= capacity` that bounds every read, write and upload. Once released, every
/// operation fails with [`ResourceError::Released`].
#[derive(Debug)]
pub struct StagingBuffer<T: Pod> {
    handle: Option<ResourceHandle>,
    target: BufferTarget,
    usage: BufferUsage,
    region: HostRegion,
    capacity: usize,
    len: usize,
    dirty: bool,
    _element: PhantomData<T>,
}

/// A staging buffer of 16-bit element indices.
pub type IndexBuffer = StagingBuffer<u16>;

impl<T: Pod> StagingBuffer<T> {
    /// The size of one element in bytes.
    pub const ELEMENT_WIDTH: usize = std::mem::size_of::<T>();

    /// Creates a buffer of `capacity` elements and registers its GPU handle.
    ///
    /// The buffer starts with `len == capacity` and needs an upload. A capacity of zero
    /// is legal and yields a zero-length resource.
    ///
    /// # Arguments
    ///
    /// * `device` - The graphics device to use.
    /// * `target` - The binding point the data is destined for.
    /// * `capacity` - The number of elements.
    /// * `usage` - The usage hint passed on upload.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        target: BufferTarget,
        capacity: usize,
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let bytes = Self::bytes_for(capacity)?;
        let handle = device.create_buffer(target)?;
        let region = device.allocate_host_memory(bytes);
        log::debug!("Created {target:?} buffer {handle} ({capacity} elements, {usage:?})");

        Ok(Self {
            handle: Some(handle),
            target,
            usage,
            region,
            capacity,
            len: capacity,
            dirty: true,
            _element: PhantomData,
        })
    }

    /// The GPU handle, or `None` once released.
    pub fn handle(&self) -> Option<ResourceHandle> {
        self.handle
    }

    /// The native id, or [`ResourceHandle::NULL_ID`] once released.
    pub fn native_id(&self) -> u32 {
        self.handle
            .map_or(ResourceHandle::NULL_ID, |h| h.native_id())
    }

    /// Returns `true` once [`StagingBuffer::release`] has succeeded.
    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// The binding point the data is destined for.
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// The usage hint passed on upload.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Changes the usage hint. The next upload re-specifies the buffer with it.
    pub fn set_usage(&mut self, usage: BufferUsage) {
        if self.usage != usage {
            self.usage = usage;
            self.dirty = true;
        }
    }

    /// The number of elements backed by host memory.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The logical number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical window is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The size of one element in bytes.
    pub fn element_width(&self) -> usize {
        Self::ELEMENT_WIDTH
    }

    /// The size of the logical window in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.len * Self::ELEMENT_WIDTH
    }

    /// Returns `true` if the host copy differs from the device copy.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Copies `count` elements of `src`, starting at `src_offset`, to logical position `start`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OutOfBounds`] if `start + count > len` or
    /// `src_offset + count > src.len()`. Nothing is written in that case.
    pub fn write(
        &mut self,
        start: usize,
        count: usize,
        src: &[T],
        src_offset: usize,
    ) -> Result<(), ResourceError> {
        self.live_handle()?;
        ResourceError::check_range(start, count, self.len)?;
        ResourceError::check_range(src_offset, count, src.len())?;

        let bytes: &[u8] = bytemuck::cast_slice(&src[src_offset..src_offset + count]);
        let begin = start * Self::ELEMENT_WIDTH;
        self.region.as_bytes_mut()[begin..begin + bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }

    /// Copies `count` elements from logical position `start` into `dst` at `dst_offset`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OutOfBounds`] if `start + count > len` or
    /// `dst_offset + count > dst.len()`.
    pub fn read(
        &self,
        start: usize,
        count: usize,
        dst: &mut [T],
        dst_offset: usize,
    ) -> Result<(), ResourceError> {
        self.live_handle()?;
        ResourceError::check_range(start, count, self.len)?;
        ResourceError::check_range(dst_offset, count, dst.len())?;

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut dst[dst_offset..dst_offset + count]);
        let begin = start * Self::ELEMENT_WIDTH;
        bytes.copy_from_slice(&self.region.as_bytes()[begin..begin + bytes.len()]);
        Ok(())
    }

    /// Copies the whole logical window into a new vector.
    pub fn to_vec(&self) -> Result<Vec<T>, ResourceError> {
        let mut out = vec![T::zeroed(); self.len];
        self.read(0, self.len, &mut out, 0)?;
        Ok(out)
    }

    /// Sets the logical length to `new_len`.
    ///
    /// Growing past the capacity returns the old host region to the device and
    /// allocates a zeroed region of exactly `new_len` elements: previous contents are
    /// discarded and must be rewritten. Shrinking never reallocates; elements past the
    /// new length stay in host memory but are unaddressable until a later grow.
    pub fn resize(
        &mut self,
        device: &mut dyn GraphicsDevice,
        new_len: usize,
    ) -> Result<(), ResourceError> {
        let handle = self.live_handle()?;

        if new_len > self.capacity {
            let bytes = Self::bytes_for(new_len)?;
            let old = std::mem::take(&mut self.region);
            device.free_host_memory(old);
            self.region = device.allocate_host_memory(bytes);
            self.capacity = new_len;
            log::trace!("Buffer {handle} grew to {new_len} elements, contents discarded");
        }

        if new_len != self.len {
            self.len = new_len;
            self.dirty = true;
        }
        Ok(())
    }

    /// Resizes the buffer to `data.len()` elements and writes `data` from the start.
    pub fn replace(
        &mut self,
        device: &mut dyn GraphicsDevice,
        data: &[T],
    ) -> Result<(), ResourceError> {
        self.resize(device, data.len())?;
        self.write(0, data.len(), data, 0)
    }

    /// Pushes the logical window to the GPU if the host copy is dirty.
    ///
    /// Returns `true` if device work was performed. Repeated calls without an
    /// intervening write are no-ops. If the device rejects the upload, the buffer
    /// stays dirty.
    pub fn upload(&mut self, device: &mut dyn GraphicsDevice) -> Result<bool, ResourceError> {
        let handle = self.live_handle()?;
        if !self.dirty {
            return Ok(false);
        }

        let bytes = &self.region.as_bytes()[..self.size_in_bytes()];
        device.upload_buffer(handle, self.target, bytes, self.usage)?;
        self.dirty = false;
        log::trace!("Uploaded {} bytes to buffer {handle}", bytes.len());
        Ok(true)
    }

    /// Destroys the GPU handle and returns the host region to the device.
    ///
    /// Afterwards every operation, including a second release, fails with
    /// [`ResourceError::Released`].
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        let handle = self.live_handle()?;
        device.destroy_buffer(handle)?;
        self.handle = None;

        let region = std::mem::take(&mut self.region);
        device.free_host_memory(region);
        self.capacity = 0;
        self.len = 0;
        self.dirty = true;
        log::debug!("Released buffer {handle}");
        Ok(())
    }

    fn live_handle(&self) -> Result<ResourceHandle, ResourceError> {
        self.handle.ok_or(ResourceError::Released)
    }

    fn bytes_for(elements: usize) -> Result<usize, ResourceError> {
        elements.checked_mul(Self::ELEMENT_WIDTH).ok_or_else(|| {
            ResourceError::InvalidDescriptor(format!("{elements} elements overflow the address space"))
        })
    }
}

impl IndexBuffer {
    /// Creates an index buffer of `indices` elements.
    pub fn new_index(
        device: &mut dyn GraphicsDevice,
        indices: usize,
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        Self::new(device, BufferTarget::Index, indices, usage)
    }
}

impl<T: Pod> Drop for StagingBuffer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            log::warn!("Buffer {handle} dropped without release; the native object leaks");
        }
    }
}

/// A staging buffer of interleaved vertices described by a [`VertexFormat`].
///
/// The vertex type `V` must be exactly one stride of the format in size. All buffer
/// operations are available through `Deref` to the underlying [`StagingBuffer`].
#[derive(Debug)]
pub struct VertexBuffer<V: Pod> {
    format: VertexFormat,
    buffer: StagingBuffer<V>,
}

impl<V: Pod> VertexBuffer<V> {
    /// Creates a vertex buffer of `vertices` elements.
    ///
    /// # Errors
    ///
    /// [`ResourceError::VertexLayoutMismatch`] if `size_of::<V>()` differs from the
    /// format's stride. No device call is made in that case.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        format: VertexFormat,
        vertices: usize,
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let actual = std::mem::size_of::<V>();
        if actual != format.stride() {
            return Err(ResourceError::VertexLayoutMismatch {
                expected: format.stride(),
                actual,
            });
        }

        let buffer = StagingBuffer::new(device, BufferTarget::Vertex, vertices, usage)?;
        Ok(Self { format, buffer })
    }

    /// The layout of one vertex.
    pub fn format(&self) -> &VertexFormat {
        &self.format
    }
}

impl<V: Pod> Deref for VertexBuffer<V> {
    type Target = StagingBuffer<V>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl<V: Pod> DerefMut for VertexBuffer<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}
