//! Canvas 2D backend

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{DrawCommand, DrawOptions, build_draw_list};
use super::{RenderError, RenderFrame, RenderSink};
use crate::effects::ParticleField;
use crate::sim::SnakeState;

/// Replays draw lists on a `<canvas>` 2D context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    particles: Rc<RefCell<ParticleField>>,
    pub options: DrawOptions,
}

impl CanvasRenderer {
    /// Size the canvas to the playfield and grab its 2D context
    pub fn new(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        particles: Rc<RefCell<ParticleField>>,
    ) -> Result<Self, RenderError> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RenderError::Backend(format!("{:?}", e)))?
            .ok_or(RenderError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::ContextUnavailable)?;
        Ok(Self {
            ctx,
            particles,
            options: DrawOptions::default(),
        })
    }

    fn execute(&self, command: &DrawCommand, width: f64, height: f64) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear(color) => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCommand::Rect {
                pos,
                size,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                if *radius <= 0.0 {
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                } else {
                    rounded_rect_path(ctx, pos.x as f64, pos.y as f64, size.x as f64, size.y as f64, *radius as f64);
                    ctx.fill();
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )
                .map_err(|e| RenderError::Backend(format!("{:?}", e)))?;
                ctx.fill();
            }
        }
        Ok(())
    }
}

/// Trace a rounded rectangle with straight edges and quadratic corners
fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}

impl RenderSink<SnakeState> for CanvasRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_, SnakeState>) -> Result<(), RenderError> {
        let commands = {
            let mut particles = self.particles.borrow_mut();
            particles.update(frame.delta_ms);
            build_draw_list(
                frame.model,
                frame.state,
                frame.config,
                particles.particles(),
                self.options,
            )
        };

        let (width, height) = (frame.config.width() as f64, frame.config.height() as f64);
        for command in &commands {
            self.execute(command, width, height)?;
        }
        Ok(())
    }
}
