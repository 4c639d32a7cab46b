//! Draws the Flappy Bird world into a terminal frame.

use super::layout::{render_status, split_scene, stats_block};
use super::SceneView;
use crate::core::{GROUND_Y, NOSE_DIVE_TILT, WIN_HEIGHT, WIN_WIDTH};
use crate::game::Bird;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Width of one ground stripe in world pixels.
const GROUND_STRIPE: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Sky,
    Pipe,
    PipeLip,
    Ground(bool),
    Bird(char),
}

impl Cell {
    fn span(self) -> Span<'static> {
        match self {
            Cell::Sky => Span::raw(" "),
            Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
            Cell::PipeLip => Span::styled("▀", Style::default().fg(Color::LightGreen)),
            Cell::Ground(true) => Span::styled("▓", Style::default().fg(Color::Yellow)),
            Cell::Ground(false) => Span::styled("▒", Style::default().fg(Color::Rgb(170, 120, 40))),
            Cell::Bird(c) => Span::styled(
                c.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        }
    }
}

pub fn render_scene(frame: &mut Frame, area: Rect, scene: &SceneView<'_>) {
    let layout = split_scene(frame, area, scene.title);

    render_play_area(frame, layout.field, scene);
    render_status_line(frame, layout.status, scene);
    render_stats(frame, layout.stats, scene);
}

/// Nose up, level, or diving.
fn bird_glyph(bird: &Bird) -> char {
    if bird.tilt > 0.0 {
        '▲'
    } else if bird.tilt > NOSE_DIVE_TILT {
        '►'
    } else {
        '▼'
    }
}

/// Rasterise the world onto a `width` x `height` cell grid. Each cell shows
/// the world pixel at its centre; birds are drawn on top at the cell under
/// their centre.
fn rasterise(scene: &SceneView<'_>, width: usize, height: usize) -> Vec<Vec<Cell>> {
    let x_scale = width as f64 / WIN_WIDTH as f64;
    let y_scale = height as f64 / WIN_HEIGHT as f64;
    let pipe_width = scene.sprites.pipe_width();

    let mut grid = vec![vec![Cell::Sky; width]; height];
    for (row, line) in grid.iter_mut().enumerate() {
        let world_y = ((row as f64 + 0.5) / y_scale) as i32;
        for (col, cell) in line.iter_mut().enumerate() {
            let world_x = ((col as f64 + 0.5) / x_scale) as i32;

            if world_y >= GROUND_Y {
                let offset = (world_x - scene.base.x1).rem_euclid(scene.base.width.max(1));
                *cell = Cell::Ground((offset / GROUND_STRIPE) % 2 == 0);
                continue;
            }

            for pipe in scene.pipes {
                if world_x < pipe.x || world_x >= pipe.x + pipe_width {
                    continue;
                }
                if world_y < pipe.height || world_y >= pipe.bottom {
                    let lip_row_top = ((pipe.height as f64 * y_scale) as usize).saturating_sub(1);
                    let lip_row_bottom = (pipe.bottom as f64 * y_scale) as usize;
                    *cell = if row == lip_row_top || row == lip_row_bottom {
                        Cell::PipeLip
                    } else {
                        Cell::Pipe
                    };
                }
                break;
            }
        }
    }

    let half_w = scene.sprites.bird_width() as f64 / 2.0;
    let half_h = scene.sprites.bird_height() as f64 / 2.0;
    for bird in &scene.birds {
        let cx = (bird.x as f64 + half_w) * x_scale;
        let cy = (bird.y + half_h) * y_scale;
        if cx < 0.0 || cy < 0.0 {
            continue;
        }
        let (col, row) = (cx as usize, cy as usize);
        if row < height && col < width {
            grid[row][col] = Cell::Bird(bird_glyph(bird));
        }
    }
    grid
}

fn render_play_area(frame: &mut Frame, area: Rect, scene: &SceneView<'_>) {
    let width = area.width as usize;
    let height = area.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let lines: Vec<Line> = rasterise(scene, width, height)
        .into_iter()
        .map(|row| Line::from(row.into_iter().map(Cell::span).collect::<Vec<_>>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, scene: &SceneView<'_>) {
    let mut status = Vec::new();
    if let Some(generation) = scene.generation {
        status.push(format!("Gen: {generation}"));
    }
    if let Some(score) = scene.score {
        status.push(format!("Score: {score}"));
    }
    let text = if status.is_empty() {
        "Falling...".to_string()
    } else {
        status.join("   ")
    };
    render_status(frame, area, &text);
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_stats(frame: &mut Frame, area: Rect, scene: &SceneView<'_>) {
    let inner = stats_block(frame, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let mut lines = Vec::new();
    if let Some(generation) = scene.generation {
        lines.push(stat_line("Gen", generation.to_string(), Color::Cyan));
    }
    if let Some(score) = scene.score {
        lines.push(stat_line("Score", score.to_string(), Color::White));
    }
    lines.push(stat_line(
        "Alive",
        format!("{}/{}", scene.alive, scene.population),
        Color::Yellow,
    ));
    if let Some(best) = scene.best_fitness {
        lines.push(stat_line("Best", format!("{best:.1}"), Color::Green));
    }
    lines.push(stat_line("Ticks", scene.ticks.to_string(), Color::White));

    if let Some(bird) = scene.birds.first() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Lead bird",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(stat_line("y", format!("{:.0}", bird.y), Color::White));
        lines.push(stat_line("tilt", format!("{:.0}", bird.tilt), Color::White));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
