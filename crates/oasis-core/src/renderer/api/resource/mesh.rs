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

//! Indexed meshes built from CPU-side mesh data.

use bytemuck::Pod;

use super::buffer::{IndexBuffer, VertexBuffer};
use crate::renderer::api::util::enums::{BufferUsage, Primitive};
use crate::renderer::api::util::vertex::VertexFormat;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;

/// Vertices, indices and topology produced on the CPU.
///
/// `MeshData` holds no device resources and is `Send` whenever `V` is, so it can be
/// built on a worker thread and applied to a [`Mesh`] on the device thread.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData<V> {
    /// The interleaved vertices.
    pub vertices: Vec<V>,
    /// Indices into `vertices`.
    pub indices: Vec<u16>,
    /// How the indices are assembled into primitives.
    pub primitive: Primitive,
}

impl<V> MeshData<V> {
    /// Bundles vertices and indices.
    pub fn new(vertices: Vec<V>, indices: Vec<u16>, primitive: Primitive) -> Self {
        Self {
            vertices,
            indices,
            primitive,
        }
    }

    /// Checks that every index addresses an existing vertex.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let len = self.vertices.len();
        match self.indices.iter().find(|&&i| i as usize >= len) {
            Some(&index) => Err(ResourceError::OutOfBounds {
                start: index as usize,
                count: 1,
                len,
            }),
            None => Ok(()),
        }
    }
}

/// A GPU mesh: a vertex buffer, an index buffer and a primitive type.
#[derive(Debug)]
pub struct Mesh<V: Pod> {
    vertices: VertexBuffer<V>,
    indices: IndexBuffer,
    primitive: Primitive,
}

impl<V: Pod> Mesh<V> {
    /// Creates an empty mesh with the given vertex layout.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        format: VertexFormat,
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let vertices = VertexBuffer::new(device, format, 0, usage)?;
        let indices = match IndexBuffer::new_index(device, 0, usage) {
            Ok(indices) => indices,
            Err(err) => {
                let mut vertices = vertices;
                vertices.release(device)?;
                return Err(err);
            }
        };

        Ok(Self {
            vertices,
            indices,
            primitive: Primitive::TriangleList,
        })
    }

    /// Creates a mesh and stages `data` into it.
    pub fn from_data(
        device: &mut dyn GraphicsDevice,
        format: VertexFormat,
        usage: BufferUsage,
        data: &MeshData<V>,
    ) -> Result<Self, ResourceError> {
        let mut mesh = Self::new(device, format, usage)?;
        if let Err(err) = mesh.apply(device, data) {
            mesh.release(device)?;
            return Err(err);
        }
        Ok(mesh)
    }

    /// Replaces the mesh's host contents with `data`. The next upload sends them.
    ///
    /// Indices are validated first, and a dangling index leaves the mesh unchanged.
    /// A device error while staging may leave the vertex buffer already rewritten.
    pub fn apply(
        &mut self,
        device: &mut dyn GraphicsDevice,
        data: &MeshData<V>,
    ) -> Result<(), ResourceError> {
        data.validate()?;
        self.vertices.replace(device, &data.vertices)?;
        self.indices.replace(device, &data.indices)?;
        self.primitive = data.primitive;
        Ok(())
    }

    /// Uploads whichever buffers are dirty. Returns `true` if either was sent.
    pub fn upload(&mut self, device: &mut dyn GraphicsDevice) -> Result<bool, ResourceError> {
        let vertices = self.vertices.upload(device)?;
        let indices = self.indices.upload(device)?;
        Ok(vertices || indices)
    }

    /// Releases both buffers.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), ResourceError> {
        let vertices = self.vertices.release(device);
        let indices = self.indices.release(device);
        vertices.and(indices)
    }

    /// The vertex buffer.
    pub fn vertex_buffer(&self) -> &VertexBuffer<V> {
        &self.vertices
    }

    /// The index buffer.
    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.indices
    }

    /// The primitive topology.
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// The number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of indices to draw.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
