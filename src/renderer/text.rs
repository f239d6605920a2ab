//! ASCII renderer
//!
//! Rasterises the playfield into a character grid scaled from playfield
//! pixels, with a one-line HUD underneath.

use std::fmt::Write;
use std::ops::Range;

use super::{FrameView, Renderer};
use crate::settings::Settings;
use crate::sim::{Bounded, GamePhase, GameState, PowerUpKind, ProjectileTag, Rect};

const BACKGROUND: char = '.';
const EMPTY: char = ' ';
const PLAYER: char = '>';
const ENEMY: char = 'E';
const PROJECTILE: char = '-';
const PROJECTILE_POWERED: char = '=';

fn power_up_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Heal => 'H',
        PowerUpKind::SpeedBoost => 'S',
        PowerUpKind::PowerBoost => 'P',
    }
}

/// Renders frames to a `String` buffer
#[derive(Debug, Clone)]
pub struct TextRenderer {
    columns: usize,
    rows: usize,
    show_hud: bool,
    buffer: String,
    frames: u64,
}

impl TextRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            show_hud: true,
            buffer: String::new(),
            frames: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_hud: settings.show_hud,
            ..Self::new(settings.columns, settings.rows)
        }
    }

    /// Most recently rendered frame
    pub fn frame(&self) -> &str {
        &self.buffer
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn rasterise(&self, frame: &FrameView<'_>) -> Vec<Vec<char>> {
        let state = frame.state;
        let field = state.tuning.playfield;
        let sx = self.columns as f32 / field.width;
        let sy = self.rows as f32 / field.height;
        let alpha = frame.alpha as f32;

        let fill = if frame.assets.get("background").is_some() {
            BACKGROUND
        } else {
            EMPTY
        };
        let mut grid = vec![vec![fill; self.columns]; self.rows];

        let mut plot = |rect: Rect, glyph: char| {
            let Some(cols) = span(rect.left(), rect.right(), sx, self.columns) else {
                return;
            };
            let Some(rows) = span(rect.top(), rect.bottom(), sy, self.rows) else {
                return;
            };
            for row in rows {
                for col in cols.clone() {
                    grid[row][col] = glyph;
                }
            }
        };

        // Painter's order: pickups under enemies under shots under the ship
        for power_up in &state.store.power_ups {
            let rect = shifted(power_up.bounds(), -power_up.speed * alpha);
            plot(rect, power_up_glyph(power_up.kind));
        }
        for enemy in &state.store.enemies {
            plot(shifted(enemy.bounds(), -enemy.speed * alpha), ENEMY);
        }
        for projectile in &state.store.projectiles {
            let glyph = match projectile.tag {
                ProjectileTag::Standard => PROJECTILE,
                ProjectileTag::Powered => PROJECTILE_POWERED,
            };
            plot(shifted(projectile.bounds(), projectile.speed * alpha), glyph);
        }
        plot(state.player.bounds(), PLAYER);

        grid
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &FrameView<'_>) {
        let grid = self.rasterise(frame);

        self.buffer.clear();
        for row in grid {
            self.buffer.extend(row);
            self.buffer.push('\n');
        }
        if self.show_hud {
            self.buffer.push_str(&hud_line(frame.state));
            self.buffer.push('\n');
        }
        self.frames += 1;
    }
}

/// Extrapolate a horizontally moving rect by `dx` pixels
fn shifted(mut rect: Rect, dx: f32) -> Rect {
    rect.pos.x += dx;
    rect
}

/// Grid cells covered by the pixel interval `[lo, hi)`. Anything visible gets
/// at least one cell.
fn span(lo: f32, hi: f32, scale: f32, cells: usize) -> Option<Range<usize>> {
    let start = (lo * scale).floor();
    let end = (hi * scale).ceil();
    if end <= 0.0 || start >= cells as f32 {
        return None;
    }
    let start = start.max(0.0) as usize;
    let end = (end as usize).clamp(start + 1, cells);
    Some(start..end)
}

/// Health, score, bomb and phase summary
pub fn hud_line(state: &GameState) -> String {
    let player = &state.player;
    let mut line = format!(
        "Health: {}/{}  Score: {}  Bomb: {}",
        player.health,
        player.max_health,
        state.score,
        if player.has_bomb { "ready" } else { "used" },
    );
    if state.effects.speed_boosted() {
        let _ = write!(line, "  Speed+ {:.1}s", state.effects.speed_boost_ms / 1000.0);
    }
    if state.effects.power_boosted() {
        let _ = write!(line, "  Power+ {:.1}s", state.effects.power_boost_ms / 1000.0);
    }
    match state.phase {
        GamePhase::Running => {}
        GamePhase::Paused => line.push_str("  [PAUSED]"),
        GamePhase::GameOver => line.push_str("  GAME OVER (R to restart)"),
    }
    line
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::{Assets, MemoryAssets, REQUIRED_ASSETS};
    use crate::sim::{Enemy, PowerUp};
    use crate::tuning::Tuning;

    fn assets() -> Assets {
        Assets::load_all(&mut MemoryAssets::placeholders(), REQUIRED_ASSETS).unwrap()
    }

    fn render(state: &GameState, alpha: f64) -> TextRenderer {
        let assets = assets();
        let mut renderer = TextRenderer::new(80, 24);
        renderer.render(&FrameView {
            state,
            alpha,
            assets: &assets,
        });
        renderer
    }

    #[test]
    fn test_grid_dimensions() {
        let state = GameState::new(1, Tuning::default());
        let renderer = render(&state, 0.0);
        let lines: Vec<&str> = renderer.frame().lines().collect();
        assert_eq!(lines.len(), 25);
        assert!(lines[..24].iter().all(|l| l.chars().count() == 80));
        assert!(lines[24].starts_with("Health: 100/100"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn test_player_and_enemy_drawn() {
        let mut state = GameState::new(1, Tuning::default());
        state.store.enemies.push(Enemy {
            id: 1,
            pos: Vec2::new(400.0, 100.0),
            size: Vec2::new(40.0, 40.0),
            health: 20,
            speed: 2.0,
            attack_power: 5,
            last_attack_ms: None,
        });
        let renderer = render(&state, 0.0);
        let lines: Vec<&str> = renderer.frame().lines().collect();

        // Player at (50, 300) -> column 5, row 12
        assert_eq!(lines[12].chars().nth(5), Some(PLAYER));
        // Enemy at (400, 100) -> column 40, row 4
        assert_eq!(lines[4].chars().nth(40), Some(ENEMY));
    }

    #[test]
    fn test_offscreen_entities_skipped() {
        let mut state = GameState::new(1, Tuning::default());
        state.store.power_ups.push(PowerUp {
            id: 1,
            pos: Vec2::new(-100.0, 10.0),
            size: Vec2::new(30.0, 30.0),
            speed: 2.0,
            kind: PowerUpKind::Heal,
        });
        let renderer = render(&state, 0.5);
        let grid: Vec<&str> = renderer.frame().lines().take(24).collect();
        assert!(grid.iter().all(|line| !line.contains('H')));
    }

    #[test]
    fn test_hud_reports_phase() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Paused;
        assert!(hud_line(&state).ends_with("[PAUSED]"));
        state.phase = GamePhase::GameOver;
        state.player.has_bomb = false;
        let hud = hud_line(&state);
        assert!(hud.contains("Bomb: used"));
        assert!(hud.contains("GAME OVER"));
    }

    #[test]
    fn test_span_edges() {
        assert_eq!(span(0.0, 10.0, 0.1, 80), Some(0..1));
        assert_eq!(span(-20.0, 0.0, 0.1, 80), None);
        assert_eq!(span(800.0, 840.0, 0.1, 80), None);
        assert_eq!(span(790.0, 830.0, 0.1, 80), Some(79..80));
    }
}
