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

// Oasis Sandbox
// Builds a mesh on a worker thread, uploads it, renders nothing and cleans up.

use std::time::Duration;

use anyhow::{Context, Result};
use oasis_core::renderer::{
    Attribute, Framebuffer, FramebufferDescriptor, GraphicsDevice, GraphicsSettings, Mesh,
    MeshData, Primitive, VertexFormat,
};
use oasis_core::BackgroundTask;

const MAX_FRAMES: usize = 1000;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    tex_coord: [f32; 2],
}

impl Vertex {
    fn format() -> VertexFormat {
        VertexFormat::new(&[Attribute::Position, Attribute::TexCoord])
    }
}

/// A flat grid of `cells` x `cells` quads in the XZ plane.
fn build_grid(cells: u16) -> MeshData<Vertex> {
    let side = cells + 1;
    let mut vertices = Vec::with_capacity(side as usize * side as usize);
    for z in 0..side {
        for x in 0..side {
            let (u, v) = (x as f32 / cells as f32, z as f32 / cells as f32);
            vertices.push(Vertex {
                position: [u - 0.5, 0.0, v - 0.5],
                tex_coord: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity(cells as usize * cells as usize * 6);
    for z in 0..cells {
        for x in 0..cells {
            let i = z * side + x;
            indices.extend_from_slice(&[i, i + side, i + 1, i + 1, i + side, i + side + 1]);
        }
    }
    MeshData::new(vertices, indices, Primitive::TriangleList)
}

fn load_settings() -> Result<GraphicsSettings> {
    match std::env::args().nth(1) {
        Some(path) => GraphicsSettings::load(&path)
            .with_context(|| format!("failed to load graphics settings from '{path}'")),
        None => Ok(GraphicsSettings::default()),
    }
}

/// Polls `task` once per frame, giving up after `max_frames`.
fn poll_frames<T: Send + 'static>(
    task: &mut BackgroundTask<T>,
    max_frames: usize,
) -> Result<Option<(usize, T)>> {
    for frame in 0..max_frames {
        if let Some(result) = task.try_take()? {
            return Ok(Some((frame, result)));
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    log::warn!(
        "Background task '{}' did not finish within {max_frames} frames.",
        task.name()
    );
    Ok(None)
}

fn run(device: &mut dyn GraphicsDevice, settings: &GraphicsSettings) -> Result<()> {
    let mut mesh = Mesh::new(device, Vertex::format(), settings.default_buffer_usage)?;
    let mut task = BackgroundTask::spawn("grid-builder", || build_grid(32))?;

    if let Some((frame, data)) = poll_frames(&mut task, MAX_FRAMES)? {
        mesh.apply(device, &data)?;
        mesh.upload(device)?;
        log::info!(
            "Frame {frame}: uploaded grid mesh ({} vertices, {} indices).",
            mesh.vertex_count(),
            mesh.index_count()
        );
    }

    let descriptor = FramebufferDescriptor::from_settings(settings, 640, 360, true, true);
    let mut target = Framebuffer::new(device, &descriptor)?;
    log::info!(
        "Render target {}x{} is {}.",
        target.width(),
        target.height(),
        target.status()
    );

    let in_use = device.stats();
    log::info!(
        "Live: {} buffers, {} textures, {} renderbuffers, {} framebuffers, {} host bytes.",
        in_use.live_buffers,
        in_use.live_textures,
        in_use.live_renderbuffers,
        in_use.live_framebuffers,
        in_use.host_bytes_allocated
    );

    target.dispose(device)?;
    mesh.release(device)?;

    let after = device.stats();
    log::info!(
        "After cleanup: {} host bytes, {} uploads performed.",
        after.host_bytes_allocated,
        after.uploads
    );
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut device = oasis_infra::create_device(&settings, None)?;
    run(device.as_mut(), &settings)
}
