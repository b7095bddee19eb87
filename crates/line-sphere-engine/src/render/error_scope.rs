use anyhow::Result;

/// Captures validation and out-of-memory errors raised by device calls made
/// while the scope is open, instead of handing them to the device's
/// uncaptured-error handler (which panics by default).
///
/// Dropping the scope without [`finish`](Self::finish) pops it and discards
/// whatever it caught.
pub struct GpuErrorScope {
    // Popped in reverse push order; field drop order matches.
    out_of_memory: wgpu::ErrorScopeGuard,
    validation: wgpu::ErrorScopeGuard,
}

impl GpuErrorScope {
    pub fn start(device: &wgpu::Device) -> Self {
        let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let out_of_memory = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        Self {
            out_of_memory,
            validation,
        }
    }

    /// Closes the scope and returns the first captured error, if any.
    pub fn finish(self) -> Result<()> {
        let Self {
            out_of_memory,
            validation,
        } = self;

        let oom = pollster::block_on(out_of_memory.pop());
        let invalid = pollster::block_on(validation.pop());

        match invalid.or(oom) {
            Some(err) => Err(anyhow::anyhow!("{err}")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> wgpu::Device {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default()).0
    }

    #[test]
    fn empty_scope_is_ok() {
        let device = device();
        let scope = GpuErrorScope::start(&device);
        assert!(scope.finish().is_ok());
    }

    #[test]
    fn invalid_call_is_captured_not_panicking() {
        let device = device();
        let scope = GpuErrorScope::start(&device);
        let _buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: None,
            size: 16,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::MAP_WRITE,
            mapped_at_creation: false,
        });
        assert!(scope.finish().is_err());
    }

    #[test]
    fn dropped_scope_discards_errors() {
        let device = device();
        {
            let _scope = GpuErrorScope::start(&device);
            let _buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: 16,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::MAP_WRITE,
                mapped_at_creation: false,
            });
        }
        let scope = GpuErrorScope::start(&device);
        assert!(scope.finish().is_ok());
    }
}
