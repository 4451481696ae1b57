// src/wgpu_utils/buffers.rs - Typed uniform and storage buffers
use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// Failure while copying a GPU buffer back to the host
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    #[error("Buffer mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("Waiting for the device failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("Buffer map callback was dropped before it ran")]
    CallbackDropped,
}

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

/// Uniform buffer holding a single `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM,
            mapped_at_creation: true,
        });

        let mapped_memory = buffer.slice(..);
        mapped_memory
            .get_mapped_range_mut()
            .clone_from_slice(bytemuck::bytes_of(initial_content));
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
        }
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

/// Fixed-length storage array usable as compute input, compute output and
/// copy source for readback
pub struct StorageArray<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    len: usize,
}

impl<Content: bytemuck::Pod> StorageArray<Content> {
    /// Create array buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, label: &str, data: &[Content]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });

        StorageArray {
            buffer,
            content_type: PhantomData,
            len: data.len(),
        }
    }

    /// Overwrite the whole array. `data` must have exactly `len` elements.
    pub fn write(&self, queue: &wgpu::Queue, data: &[Content]) {
        debug_assert_eq!(data.len(), self.len, "StorageArray length is fixed");
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
    }

    /// Copies the array into a staging buffer and blocks until it is mapped.
    ///
    /// Everything already submitted to `queue` completes first.
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<Content>, ReadbackError> {
        let size = self.size_bytes();
        let staging_buffer = staging_buffer::<Content>(device, size);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging_buffer, 0, size);
        queue.submit(std::iter::once(encoder.finish()));

        map_read(device, &staging_buffer)
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Size in bytes
    pub fn size_bytes(&self) -> u64 {
        (self.len * std::mem::size_of::<Content>()) as u64
    }
}

/// Copies an RGBA8 texture to the host, returning tightly packed rows from
/// top to bottom. The texture needs `COPY_SRC` usage.
pub fn read_texture_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<Vec<[u8; 4]>, ReadbackError> {
    let wgpu::Extent3d { width, height, .. } = texture.size();
    let row_bytes = width * 4;
    let padded_row_bytes = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let staging_buffer = staging_buffer::<[u8; 4]>(device, padded_row_bytes as u64 * height as u64);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Texture Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row_bytes),
                rows_per_image: Some(height),
            },
        },
        texture.size(),
    );
    queue.submit(std::iter::once(encoder.finish()));

    let padded: Vec<u8> = map_read(device, &staging_buffer)?;
    Ok(padded
        .chunks_exact(padded_row_bytes as usize)
        .flat_map(|row| row[..row_bytes as usize].chunks_exact(4))
        .map(|texel| [texel[0], texel[1], texel[2], texel[3]])
        .collect())
}

fn staging_buffer<Content>(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("StagingBuffer<{}>", short_type_name::<Content>())),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    })
}

/// Maps `staging_buffer` for reading, waits for the device and copies the
/// contents out.
fn map_read<Content: bytemuck::Pod>(
    device: &wgpu::Device,
    staging_buffer: &wgpu::Buffer,
) -> Result<Vec<Content>, ReadbackError> {
    let slice = staging_buffer.slice(..);
    let (tx, rx) = futures::channel::oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    // A failed wait leaves the callback pending, so blocking on it would hang.
    device.poll(wgpu::PollType::Wait)?;

    match futures::executor::block_on(rx) {
        Ok(Ok(())) => {
            let mapped = slice.get_mapped_range();
            let result: Vec<Content> = bytemuck::cast_slice(&mapped).to_vec();
            drop(mapped);
            staging_buffer.unmap();
            Ok(result)
        }
        Ok(Err(err)) => Err(ReadbackError::Map(err)),
        Err(_) => Err(ReadbackError::CallbackDropped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name_strips_path() {
        assert_eq!(short_type_name::<u32>(), "u32");
        assert_eq!(short_type_name::<ReadbackError>(), "ReadbackError");
    }

    #[test]
    fn test_poll_failure_becomes_readback_error() {
        let err = ReadbackError::from(wgpu::PollError::Timeout);
        assert!(matches!(err, ReadbackError::Poll(wgpu::PollError::Timeout)));
        assert!(err.to_string().starts_with("Waiting for the device failed"));
    }
}
