//! Draw list generation for Snake

use glam::Vec2;

use crate::config::{GameConfig, parse_hex_color};
use crate::effects::Particle;
use crate::game::GameState;
use crate::sim::SnakeState;

/// RGBA color, components in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_bytes(rgb: [u8; 3], a: f32) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
            a,
        }
    }

    /// Parse `#rrggbb`, falling back to black
    pub fn from_hex(s: &str) -> Self {
        parse_hex_color(s)
            .map(|rgb| Self::from_bytes(rgb, 1.0))
            .unwrap_or(colors::BLACK)
    }

    /// CSS `rgba(...)` string for canvas fill styles
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GRID_LINE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 0.05,
    };
    pub const SNAKE_HEAD: Color = Color::rgb(0.31, 0.80, 0.77);
    pub const SNAKE_BODY: Color = Color::rgb(0.27, 0.66, 0.64);
    pub const SNAKE_DEAD: Color = Color::rgb(0.45, 0.45, 0.5);
    pub const FOOD: Color = Color::rgb(1.0, 0.42, 0.42);
    pub const PAUSE_DIM: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.5,
    };
}

/// Backend-neutral drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        radius: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

/// Presentation toggles taken from settings
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawOptions {
    pub show_grid: bool,
}

/// Build the draw list for one Snake frame
pub fn build_draw_list(
    model: &SnakeState,
    state: &GameState,
    config: &GameConfig,
    particles: &[Particle],
    options: DrawOptions,
) -> Vec<DrawCommand> {
    let grid = config.grid_size() as f32;
    let (width, height) = (config.width() as f32, config.height() as f32);
    let mut commands = Vec::with_capacity(model.len() + particles.len() + 8);

    commands.push(DrawCommand::Clear(Color::from_hex(config.background_color())));

    if options.show_grid {
        for col in 1..config.columns() {
            let x = col as f32 * grid;
            commands.push(DrawCommand::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, height),
                width: 1.0,
                color: colors::GRID_LINE,
            });
        }
        for row in 1..config.rows() {
            let y = row as f32 * grid;
            commands.push(DrawCommand::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(width, y),
                width: 1.0,
                color: colors::GRID_LINE,
            });
        }
    }

    if let Some(food) = model.food {
        commands.push(DrawCommand::Circle {
            center: food.as_vec2() + Vec2::splat(grid / 2.0),
            radius: grid / 2.0 - 2.0,
            color: colors::FOOD,
        });
    }

    // Tail first so the head is drawn on top
    let alive = model.is_alive();
    for (i, segment) in model.segments.iter().enumerate().rev() {
        let color = match (alive, i) {
            (false, _) => colors::SNAKE_DEAD,
            (true, 0) => colors::SNAKE_HEAD,
            _ => colors::SNAKE_BODY,
        };
        commands.push(DrawCommand::Rect {
            pos: segment.as_vec2() + Vec2::ONE,
            size: Vec2::splat(grid - 2.0),
            radius: if i == 0 { grid * 0.3 } else { grid * 0.15 },
            color,
        });
    }

    for particle in particles {
        commands.push(DrawCommand::Circle {
            center: particle.pos,
            radius: particle.size,
            color: Color::from_bytes(particle.color, particle.life.clamp(0.0, 1.0)),
        });
    }

    if state.paused {
        commands.push(DrawCommand::Rect {
            pos: Vec2::ZERO,
            size: Vec2::new(width, height),
            radius: 0.0,
            color: colors::PAUSE_DIM,
        });
    }

    commands
}
