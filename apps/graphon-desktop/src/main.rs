mod demo;
mod window;

use anyhow::{Context, Result};
use clap::Parser;
use demo::PlayerDrift;
use graphon_common::ScreenSize;
use graphon_host::{GraphicsHost, HeadlessWindow, HostConfig, SharedPlayerState, WindowSizer};
use graphon_render::DebugTextFactory;
use graphon_render_wgpu::{WgpuRenderer, WgpuRendererFactory};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use window::WinitHostWindow;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "graphon-desktop", about = "Graphon graphics host demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file overriding the default host configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render with the debug text renderer instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Number of frames to render in headless mode
    #[arg(long, default_value = "3")]
    frames: u32,

    /// Initial window width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Everything that exists once the window is up.
struct Running {
    window: Arc<Window>,
    sizer: Rc<WindowSizer>,
    host: GraphicsHost<WgpuRenderer>,
}

struct GpuApp {
    config: HostConfig,
    initial_size: ScreenSize,
    player: Rc<SharedPlayerState>,
    drift: PlayerDrift,
    started: Instant,
    running: Option<Running>,
}

impl GpuApp {
    fn new(config: HostConfig, initial_size: ScreenSize) -> Self {
        Self {
            config,
            initial_size,
            player: Rc::new(SharedPlayerState::default()),
            drift: PlayerDrift::default(),
            started: Instant::now(),
            running: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title("Graphon")
            .with_inner_size(PhysicalSize::new(
                self.initial_size.width,
                self.initial_size.height,
            ))
            .with_visible(false);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;
        let mut factory = WgpuRendererFactory::new(&instance, surface)?;

        let size = window.inner_size();
        let sizer = Rc::new(WindowSizer::new(ScreenSize::new(size.width, size.height)));

        let mut host = GraphicsHost::new(
            WinitHostWindow::new(window.clone()),
            sizer.clone(),
            self.player.clone(),
            self.config.clone(),
        );
        host.initialize(&mut factory)?;
        demo::populate(&mut host)?;

        Ok(Running {
            window,
            sizer,
            host,
        })
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("failed to start graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                running
                    .sizer
                    .resize(ScreenSize::new(new_size.width, new_size.height));
            }
            WindowEvent::RedrawRequested => {
                let elapsed = self.started.elapsed().as_secs_f32();
                self.player.set(self.drift.position_at(elapsed));

                if let Err(e) = running.host.update() {
                    tracing::error!("frame failed: {e}");
                }
                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

/// Drive the host for a fixed number of frames with the debug text renderer.
fn run_headless(cli: &Cli, config: HostConfig) -> Result<()> {
    let sizer = Rc::new(WindowSizer::new(ScreenSize::new(cli.width, cli.height)));
    let player = Rc::new(SharedPlayerState::default());
    let mut host = GraphicsHost::new(HeadlessWindow::new(), sizer, player.clone(), config);
    host.initialize(&mut DebugTextFactory)?;
    demo::populate(&mut host)?;

    let drift = PlayerDrift::default();
    for frame in 0..cli.frames {
        player.set(drift.position_at(frame as f32 / 60.0));
        host.update()?;
    }

    let renderer = host.renderer()?;
    print!("{}", renderer.last_frame());
    println!("Frames rendered: {}", renderer.frame_count());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HostConfig::default(),
    };

    tracing::info!("graphon-desktop starting");

    if cli.headless {
        return run_headless(&cli, config);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, ScreenSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}
