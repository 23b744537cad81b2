/// Terminal front-end for plating a mesh on the work table
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use plater_core::Session;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{error, warn};

pub mod camera;
pub mod config;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod transport;

pub use camera::Camera;
pub use config::AppConfig;
pub use renderer::AsciiRenderer;
pub use transport::{ExportClient, ExportOutcome};

use input::Action;

/// Main application struct for terminal plating
pub struct TerminalApp {
    session: Session,
    exporter: ExportClient,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    notice: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(session: Session, exporter: ExportClient) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            session,
            exporter,
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            notice: String::from("Ready"),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.collect_export_outcomes();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => {
                if let Some(action) = input::action_for_key(code) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => {
                self.camera.resize(width as u32, height as u32);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    /// Dispatch one user action to the session
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SelectMode(mode) => {
                self.session.set_mode(mode);
                self.notice = format!("Mode: {}", mode);
            }
            Action::Drag { axis, sign } => {
                let delta = input::drag_delta(self.session.mode(), axis, sign);
                self.session.drag(delta);
            }
            Action::Reset => {
                self.session.reset_transform();
                self.notice = String::from("Transform reset");
            }
            Action::LowerToGround => {
                self.session.lower_to_ground();
                self.notice = String::from("Lowered to ground");
            }
            Action::Export => self.export(),
        }
    }

    fn export(&mut self) {
        match self.session.export() {
            Ok(Some(payload)) => {
                self.notice = format!(
                    "Sending {} triangles to {}...",
                    payload.triangles.len(),
                    self.exporter.endpoint()
                );
                if let Err(err) = self.exporter.submit(&payload) {
                    error!(error = %err, "export not sent");
                    self.notice = format!("Export failed: {}", err);
                }
            }
            Ok(None) => self.notice = String::from("No model loaded"),
            Err(err) => {
                error!(error = %err, "export aborted");
                self.notice = format!("Export failed: {}", err);
            }
        }
    }

    fn collect_export_outcomes(&mut self) {
        while let Some(outcome) = self.exporter.poll_outcome() {
            self.notice = match outcome {
                ExportOutcome::Delivered { status } => format!("Export delivered ({})", status),
                ExportOutcome::Failed { reason } => {
                    warn!(%reason, "export not delivered");
                    format!("Export failed: {}", reason)
                }
            };
        }
    }

    fn status_line(&self) -> String {
        match self.session.mesh() {
            Some(mesh) => {
                let t = &mesh.transform;
                format!(
                    "[{}] pos ({:.1}, {:.1}, {:.1}) scale ({:.2}, {:.2}, {:.2}) | {}",
                    self.session.mode(),
                    t.position.x,
                    t.position.y,
                    t.position.z,
                    t.scale.x,
                    t.scale.y,
                    t.scale.z,
                    self.notice
                )
            }
            None => format!("[{}] no model | {}", self.session.mode(), self.notice),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_table(&self.camera);
        if let Some(mesh) = self.session.mesh() {
            self.renderer.render_mesh(mesh, &self.camera);
        }
        if let Some(aabb) = self.session.bounding_box() {
            self.renderer.render_box(aabb, &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let (_, height) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Plater | FPS: {:.1} | T/R/S=Mode Arrows/PgUp/PgDn=Drag G=Ground X=Reset E=Export Q=Quit",
                self.fps
            )),
            cursor::MoveTo(0, height.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Axis;
    use plater_core::{Geometry, Mode};

    // Builds the app without touching the terminal
    fn app() -> TerminalApp {
        let mut session = Session::new();
        session.load(Geometry::cube(20.0)).unwrap();
        let exporter = ExportClient::new("http://127.0.0.1:1/upload", Duration::from_secs(1)).unwrap();

        TerminalApp {
            session,
            exporter,
            camera: Camera::new(80, 24),
            renderer: AsciiRenderer::new(80, 24),
            running: true,
            notice: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    #[test]
    fn test_mode_then_drag() {
        let mut app = app();
        app.apply(Action::SelectMode(Mode::Scale));
        app.apply(Action::Drag { axis: Axis::X, sign: 1.0 });

        let scale = app.session().mesh().unwrap().transform.scale;
        assert!((scale.x - 1.1).abs() < 1e-6);
        assert!(app.status_line().starts_with("[scale]"));
    }

    #[test]
    fn test_drag_down_stays_on_ground() {
        let mut app = app();
        for _ in 0..5 {
            app.apply(Action::Drag { axis: Axis::Y, sign: -1.0 });
        }
        assert!(app.session().bounding_box().unwrap().min.y >= -1e-5);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.apply(Action::Quit);
        assert!(!app.running);
    }

    #[test]
    fn test_export_reports_invalid_geometry() {
        let mut app = app();
        app.session.load(Geometry::new(vec![0.0, 1.0, 2.0, 3.0])).unwrap();
        app.apply(Action::Export);
        assert!(app.notice.starts_with("Export failed"));
    }
}
