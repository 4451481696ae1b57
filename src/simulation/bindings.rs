//! Bind group layout shared by the kernel and the render routine
//!
//! | binding | resource            | visible to                 |
//! |---------|---------------------|----------------------------|
//! | 0       | `GridParams`        | compute, vertex, fragment  |
//! | 1       | read-only state     | compute, vertex            |
//! | 2       | read-write state    | compute                    |
//!
//! One bind group exists per read slot. Group `s` binds slot `s` at binding 1
//! and the other slot at binding 2, so the kernel dispatched with group `s`
//! reads `s` and writes its partner, and a draw with group `s` renders `s`.

use super::grid::{GridStore, Slot};
use super::uniforms::GridParams;
use crate::wgpu_utils::{entry, storage_buffer_read_only, storage_buffer_read_write, uniform};

pub const BINDING_GRID_PARAMS: u32 = 0;
pub const BINDING_STATE_IN: u32 = 1;
pub const BINDING_STATE_OUT: u32 = 2;

pub struct GridBindings {
    layout: wgpu::BindGroupLayout,
    groups: [wgpu::BindGroup; 2],
}

impl GridBindings {
    pub fn new(device: &wgpu::Device, params: &GridParams, store: &GridStore) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cell Bind Group Layout"),
            entries: &[
                entry(
                    BINDING_GRID_PARAMS,
                    wgpu::ShaderStages::COMPUTE
                        | wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    uniform(),
                ),
                entry(
                    BINDING_STATE_IN,
                    wgpu::ShaderStages::COMPUTE | wgpu::ShaderStages::VERTEX,
                    storage_buffer_read_only(),
                ),
                entry(
                    BINDING_STATE_OUT,
                    wgpu::ShaderStages::COMPUTE,
                    storage_buffer_read_write(),
                ),
            ],
        });

        let groups = Slot::ALL.map(|read| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(match read {
                    Slot::A => "Cell Bind Group A->B",
                    Slot::B => "Cell Bind Group B->A",
                }),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: BINDING_GRID_PARAMS,
                        resource: params.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: BINDING_STATE_IN,
                        resource: store.get(read).binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: BINDING_STATE_OUT,
                        resource: store.get(read.other()).binding_resource(),
                    },
                ],
            })
        });

        Self { layout, groups }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Group whose binding 1 is `slot`
    pub fn reading(&self, slot: Slot) -> &wgpu::BindGroup {
        &self.groups[slot.index()]
    }
}
