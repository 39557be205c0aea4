use crate::gpu::WgpuRenderer;
use graphon_render::{RenderError, RendererFactory, RendererSettings};

const MSAA_SAMPLES: u32 = 4;

/// GPU resources acquired for one window, consumed by the first `create`.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

/// Builds a [`WgpuRenderer`] for a window surface.
///
/// Adapter and device are requested up front so failures surface before the
/// host starts initializing. The factory produces at most one renderer.
pub struct WgpuRendererFactory {
    context: Option<GpuContext>,
}

impl WgpuRendererFactory {
    pub fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
    ) -> Result<Self, RenderError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::AdapterNotFound)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("graphon_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            adapter = %adapter.get_info().name,
            "GPU device acquired"
        );

        Ok(Self {
            context: Some(GpuContext {
                surface,
                adapter,
                device,
                queue,
            }),
        })
    }
}

impl RendererFactory for WgpuRendererFactory {
    type Renderer = WgpuRenderer;

    fn create(&mut self, settings: &RendererSettings) -> Result<WgpuRenderer, RenderError> {
        let GpuContext {
            surface,
            adapter,
            device,
            queue,
        } = self.context.take().ok_or(RenderError::SurfaceUnavailable)?;

        let size = settings.size.clamped();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if !settings.antialias {
            1
        } else if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            tracing::warn!(?format, "{MSAA_SAMPLES}x MSAA unsupported, antialiasing disabled");
            1
        };

        tracing::debug!(?format, sample_count, "surface configured");
        Ok(WgpuRenderer::new(
            surface,
            device,
            queue,
            config,
            settings.clone(),
            sample_count,
        ))
    }
}
