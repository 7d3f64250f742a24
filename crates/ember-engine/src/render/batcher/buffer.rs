use crate::render::upload::{copy_size, record_upload};

/// Smallest GPU allocation made for staged data.
const MIN_BUFFER_SIZE: u64 = 256;

/// GPU buffer that is reused across flushes and grows on demand.
///
/// Capacity follows the next power of two of the largest upload seen, so a
/// steady workload stops reallocating after the first few frames.
pub(super) struct GrowableBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl GrowableBuffer {
    pub(super) fn new(label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            buffer: None,
            capacity: 0,
        }
    }

    /// Records a copy of `bytes` into the buffer on `encoder`, growing it first
    /// if needed.
    ///
    /// Passes recorded on `encoder` before this call keep reading the old
    /// contents; a grown buffer is a new allocation, so they keep theirs too.
    pub(super) fn upload(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        bytes: &[u8],
    ) -> &wgpu::Buffer {
        let size = copy_size(bytes.len());
        if size > self.capacity {
            self.buffer = None;
        }

        let (label, usage, capacity) = (self.label, self.usage, &mut self.capacity);
        let buffer = self.buffer.get_or_insert_with(|| {
            let new_capacity = grown_capacity(size);
            log::debug!("{label}: allocating {new_capacity} bytes");
            *capacity = new_capacity;
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: new_capacity,
                usage,
                mapped_at_creation: false,
            })
        });

        record_upload(device, encoder, buffer, bytes);
        buffer
    }
}

fn grown_capacity(required: u64) -> u64 {
    required.next_power_of_two().max(MIN_BUFFER_SIZE)
}
