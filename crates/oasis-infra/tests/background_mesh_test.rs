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

use std::time::Duration;

use oasis_core::renderer::{
    Attribute, BufferUsage, GraphicsDevice, Mesh, MeshData, Primitive, VertexFormat,
};
use oasis_core::{BackgroundTask, TaskError};
use oasis_infra::HeadlessDevice;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

fn triangle_fan(segments: u16) -> MeshData<Vertex> {
    let mut vertices = vec![Vertex {
        position: [0.0; 3],
        color: [1.0; 4],
    }];
    let mut indices = Vec::new();
    for i in 0..segments {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        vertices.push(Vertex {
            position: [angle.cos(), angle.sin(), 0.0],
            color: [0.5, 0.5, 1.0, 1.0],
        });
        indices.extend_from_slice(&[0, i + 1, (i + 1) % segments + 1]);
    }
    MeshData::new(vertices, indices, Primitive::TriangleList)
}

#[test]
fn test_mesh_built_in_background_is_applied_on_device_thread() {
    let _ = env_logger::builder().is_test(true).try_init();

    // --- 1. ARRANGE ---
    let mut device = HeadlessDevice::new();
    let format = VertexFormat::new(&[Attribute::Position, Attribute::Color]);
    let mut mesh = Mesh::<Vertex>::new(&mut device, format, BufferUsage::Static).unwrap();
    let mut task = BackgroundTask::spawn("mesh-builder", || triangle_fan(16)).unwrap();

    // --- 2. ACT ---
    // Poll once per simulated frame, as an update loop would.
    let mut applied = false;
    for _frame in 0..400 {
        if let Some(data) = task.try_take().unwrap() {
            mesh.apply(&mut device, &data).unwrap();
            applied = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    let uploaded = mesh.upload(&mut device).unwrap();

    // --- 3. ASSERT ---
    assert!(applied, "The background mesh should arrive within the frame budget");
    assert!(uploaded);
    assert_eq!(mesh.vertex_count(), 17);
    assert_eq!(mesh.index_count(), 48);

    let expected = triangle_fan(16);
    let vertex_handle = mesh.vertex_buffer().handle().unwrap();
    let index_handle = mesh.index_buffer().handle().unwrap();
    assert_eq!(
        device.buffer_contents(vertex_handle),
        Some(bytemuck::cast_slice::<Vertex, u8>(&expected.vertices))
    );
    assert_eq!(
        device.buffer_contents(index_handle),
        Some(bytemuck::cast_slice::<u16, u8>(&expected.indices))
    );
    assert_eq!(task.try_take(), Err(TaskError::AlreadyTaken));

    mesh.release(&mut device).unwrap();
    assert_eq!(device.stats().live_buffers, 0);
}
