//! Headless device helpers for GPU-backed tests.

/// Create device and queue for testing (gracefully fails if no GPU).
///
/// Requests whichever of `features` the adapter supports.
pub(crate) fn create_device_queue(
    features: wgpu::Features,
) -> Option<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let instance = wgpu::Instance::default();
    let adapter = pollster::block_on(instance.request_adapter(
        &wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        },
    ))
    .ok()?;
    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("restir_resources_test_device"),
            required_features: adapter.features() & features,
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        },
    ))
    .ok()?;
    Some((adapter, device, queue))
}

/// Submit pending work and copy `buffer` back to the host.
pub(crate) fn read_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
) -> Vec<u8> {
    let size = buffer.size();
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback"),
        });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    let _ = queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device.poll(wgpu::PollType::Wait);
    receiver.recv().unwrap().unwrap();
    let data = slice.get_mapped_range().to_vec();
    staging.unmap();
    data
}
