//! Cache construction failures reach the configured log sinks.
//!
//! Lives in its own test binary: the global logger can be installed once per
//! process.

use ember_engine::device::HeadlessGpu;
use ember_engine::logging::{init_logging, LogSink, LoggingConfig};
use ember_engine::render::shader::{ShaderCache, ShaderKind};

#[test]
fn link_failure_is_written_to_the_file_sink() {
    let path = std::env::temp_dir().join(format!("ember_link_failure_{}.log", std::process::id()));
    init_logging(LoggingConfig {
        sinks: vec![LogSink::file(&path, "error")],
        ..LoggingConfig::default()
    });

    let gpu = match pollster::block_on(HeadlessGpu::new()) {
        Ok(gpu) => gpu,
        Err(e) => {
            eprintln!("skipping: no GPU adapter ({e:#})");
            return;
        }
    };

    let result = ShaderCache::new(
        gpu.device(),
        wgpu::TextureFormat::Rgba32Float,
        &[ShaderKind::AbsolutePositionWithSolidColor],
    );
    assert!(result.is_err());
    log::logger().flush();

    let contents = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(
        contents.contains("shader absolute_position_with_solid_color failed to link"),
        "log file was: {contents:?}"
    );
}
