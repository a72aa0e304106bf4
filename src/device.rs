use anyhow::{anyhow, Context, Result};
use log::warn;
use web_sys::HtmlCanvasElement;
use wgpu::Limits;

use crate::math::Color4;
use crate::render_loop::RenderEngine;
use crate::scene::Frame;

/// wgpu surface bound to the page canvas.
pub struct Device {
    canvas: HtmlCanvasElement,
    surface: wgpu::Surface,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Device {
    pub async fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface_from_canvas(canvas.clone())
            .map_err(|e| anyhow!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No WebGL2 adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    features: wgpu::Features::empty(),
                    // WebGL doesn't support all of wgpu's features
                    limits: Limits {
                        max_texture_dimension_2d: 4096,
                        ..Limits::downlevel_webgl2_defaults()
                    },
                },
                None,
            )
            .await?;

        let surface_config = {
            let caps = surface.get_capabilities(&adapter);
            let format = caps
                .formats
                .iter()
                .copied()
                .find(|f| f.is_srgb())
                .or_else(|| caps.formats.first().copied())
                .context("Surface reports no formats")?;

            wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: canvas.width().max(1),
                height: canvas.height().max(1),
                present_mode: caps.present_modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo),
                alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
                view_formats: vec![],
            }
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            canvas: canvas.clone(),
            surface,
            surface_config,
            device,
            queue,
        })
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn clear_value(&self, color: Color4) -> wgpu::Color {
        let channel = |c: f32| {
            let c = c as f64;
            // Scene colors are authored in sRGB
            if self.surface_config.format.is_srgb() { c.powf(2.2) } else { c }
        };
        wgpu::Color {
            r: channel(color.r),
            g: channel(color.g),
            b: channel(color.b),
            a: color.a as f64,
        }
    }
}

impl RenderEngine for Device {
    fn resize(&mut self) -> Result<(u32, u32)> {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        // Hidden canvases report zero
        if width > 0 && height > 0 {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
        }
        Ok(self.surface_size())
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_value(frame.clear_color)),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
