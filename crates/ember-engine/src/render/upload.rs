use wgpu::util::DeviceExt;

/// Records a copy of `bytes` into the start of `target` on `encoder`.
///
/// The data is staged in a fresh `COPY_SRC` buffer, so the copy executes in
/// encoder order: passes recorded earlier still see the previous contents.
/// `target` must be at least `copy_size(bytes.len())` long and `COPY_DST`.
pub(crate) fn record_upload(
    device: &wgpu::Device,
    encoder: &mut wgpu::CommandEncoder,
    target: &wgpu::Buffer,
    bytes: &[u8],
) {
    if bytes.is_empty() {
        return;
    }

    let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("ember upload staging"),
        contents: bytes,
        usage: wgpu::BufferUsages::COPY_SRC,
    });
    encoder.copy_buffer_to_buffer(&staging, 0, target, 0, copy_size(bytes.len()));
}

/// Byte count actually copied for `len` bytes of data.
///
/// Buffer copies move whole 4-byte words; `create_buffer_init` pads its
/// buffer to the same alignment.
pub(crate) fn copy_size(len: usize) -> u64 {
    (len as u64).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}
