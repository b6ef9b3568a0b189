//! Rendering layer. All terminal output lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session. No game logic is performed; this module only translates state
//! into terminal commands. The logical playfield is scaled onto whatever
//! terminal size is current through a [`Viewport`].

use std::io::Write;

use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Attribute, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::assets::{AssetId, AssetProvider, Sprite, UiElement, POOP_BROWN};
use crate::entities::{Button, GameSession, GameState, Particle, Player, Rect};
use crate::text::{display_width, TextSet};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TEXT: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_GAME_OVER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_BUTTON_TEXT: Color = Color::Black;

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps logical playfield pixels to terminal cells and back.
///
/// Row 0 is the HUD, rows 1 and `term_rows - 2` are the border, the last row
/// is the controls hint. The playfield fills the cells in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub term_cols: u16,
    pub term_rows: u16,
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
    pub world_w: f32,
    pub world_h: f32,
}

impl Viewport {
    pub fn fit(term_cols: u16, term_rows: u16, world_w: f32, world_h: f32) -> Self {
        Self {
            term_cols,
            term_rows,
            left: 1,
            top: 2,
            cols: term_cols.saturating_sub(2).max(1),
            rows: term_rows.saturating_sub(4).max(1),
            world_w,
            world_h,
        }
    }

    /// Cell containing a logical point. May lie outside the playfield.
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let col = (x / self.world_w * f32::from(self.cols)).floor() as i32;
        let row = (y / self.world_h * f32::from(self.rows)).floor() as i32;
        (i32::from(self.left) + col, i32::from(self.top) + row)
    }

    /// Logical point at the centre of a cell, or `None` outside the playfield.
    pub fn to_world(&self, col: u16, row: u16) -> Option<(f32, f32)> {
        if !self.in_playfield(i32::from(col), i32::from(row)) {
            return None;
        }
        let fx = (f32::from(col - self.left) + 0.5) / f32::from(self.cols);
        let fy = (f32::from(row - self.top) + 0.5) / f32::from(self.rows);
        Some((fx * self.world_w, fy * self.world_h))
    }

    pub fn in_playfield(&self, col: i32, row: i32) -> bool {
        let left = i32::from(self.left);
        let top = i32::from(self.top);
        col >= left
            && col < left + i32::from(self.cols)
            && row >= top
            && row < top + i32::from(self.rows)
    }

    /// Inclusive cell range covered by a logical rect.
    fn cell_span(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        let (c0, r0) = self.to_cell(rect.x, rect.y);
        let (c1, r1) = self.to_cell(rect.right() - 0.001, rect.bottom() - 0.001);
        ((c0, r0), (c1.max(c0), r1.max(r0)))
    }
}

// ── Game screen ───────────────────────────────────────────────────────────────

/// Switch `out` to the game screen, run `body`, then put the screen back.
/// The restore runs even when setup or `body` fails. Raw mode is left to
/// the caller.
pub fn with_game_screen<W, T, E, F>(out: &mut W, body: F) -> Result<T, E>
where
    W: Write,
    E: From<std::io::Error>,
    F: FnOnce(&mut W) -> Result<T, E>,
{
    let setup = enter_game_screen(out);
    let keyboard_enhanced = *setup.as_ref().unwrap_or(&false);
    let result = match setup {
        Ok(_) => body(out),
        Err(e) => Err(E::from(e)),
    };
    leave_game_screen(out, keyboard_enhanced);
    result
}

/// Returns whether key-release reporting was switched on.
fn enter_game_screen<W: Write>(out: &mut W) -> std::io::Result<bool> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Kitty-protocol terminals report key releases; others ignore this.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(keyboard_enhanced)
}

/// Best effort: every step runs even if an earlier one fails.
fn leave_game_screen<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for the session's current state.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &Viewport,
    assets: &dyn AssetProvider,
    text: &TextSet,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_background(out, view, assets.sprite(AssetId::Ui(UiElement::Background)))?;

    match session.state {
        GameState::Menu => draw_menu(out, session, view, assets, text)?,
        GameState::Playing => draw_playing(out, session, view, assets, text)?,
        GameState::GameOver => draw_game_over(out, session, view, assets, text)?,
    }

    put(out, view, 1, i32::from(view.term_rows) - 1, text.controls_hint, C_HINT)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.term_rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Print `s` at a cell if the cell is on screen.
fn put<W: Write>(
    out: &mut W,
    view: &Viewport,
    col: i32,
    row: i32,
    s: &str,
    color: Color,
) -> std::io::Result<()> {
    if row < 0 || row >= i32::from(view.term_rows) || col >= i32::from(view.term_cols) {
        return Ok(());
    }
    out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(s))?;
    Ok(())
}

/// Horizontally centred text at a logical y.
fn put_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    y: f32,
    s: &str,
    color: Color,
) -> std::io::Result<()> {
    let (_, row) = view.to_cell(0.0, y);
    let mid = i32::from(view.left) + i32::from(view.cols) / 2;
    let col = mid - display_width(s) as i32 / 2;
    put(out, view, col, row, s, color)
}

/// Draw sprite art centred on a logical point, clipped to the playfield.
fn draw_sprite_at<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &Sprite,
    cx: f32,
    cy: f32,
    color: Color,
) -> std::io::Result<()> {
    let (col, row) = view.to_cell(cx, cy);
    let first_row = row - (sprite.art.len() as i32 - 1) / 2;
    for (i, line) in sprite.art.iter().enumerate() {
        let r = first_row + i as i32;
        let width = display_width(line) as i32;
        let max_col = i32::from(view.left) + i32::from(view.cols) - width;
        let c = (col - width / 2).clamp(i32::from(view.left), max_col.max(i32::from(view.left)));
        if view.in_playfield(c, r) {
            put(out, view, c, r, line, color)?;
        }
    }
    Ok(())
}

// ── Frame furniture ───────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.term_cols as usize;
    let h = view.term_rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.term_cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Grass along the bottom row of the playfield.
fn draw_background<W: Write>(out: &mut W, view: &Viewport, sprite: &Sprite) -> std::io::Result<()> {
    let Some(tile) = sprite.art.first() else {
        return Ok(());
    };
    let tile_width = display_width(tile).max(1);
    let row = i32::from(view.top) + i32::from(view.rows) - 1;
    let strip = tile.repeat(usize::from(view.cols) / tile_width);
    put(out, view, i32::from(view.left), row, &strip, rgb(sprite.color))
}

fn draw_button<W: Write>(
    out: &mut W,
    view: &Viewport,
    button: &Button,
    assets: &dyn AssetProvider,
) -> std::io::Result<()> {
    let sprite = assets.sprite(AssetId::Ui(button.element));
    let ((c0, r0), (c1, r1)) = view.cell_span(&button.rect);
    let fill = " ".repeat((c1 - c0 + 1).max(0) as usize);

    out.queue(style::SetBackgroundColor(rgb(sprite.color)))?;
    for row in r0..=r1 {
        if view.in_playfield(c0, row) {
            put(out, view, c0, row, &fill, C_BUTTON_TEXT)?;
        }
    }
    let label = sprite.art.first().map(String::as_str).unwrap_or_default();
    let mid_row = (r0 + r1) / 2;
    let col = (c0 + c1 + 1) / 2 - display_width(label) as i32 / 2;
    if view.in_playfield(col, mid_row) {
        out.queue(style::SetAttribute(Attribute::Bold))?;
        put(out, view, col, mid_row, label, C_BUTTON_TEXT)?;
        out.queue(style::SetAttribute(Attribute::Reset))?;
    }
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &Viewport,
    assets: &dyn AssetProvider,
    text: &TextSet,
) -> std::io::Result<()> {
    put_centered(out, view, session.height / 3.0, text.title, C_TEXT)?;
    if session.best_score > 0 {
        let best = text.best_score(session.best_score);
        put_centered(out, view, session.height / 3.0 + 40.0, &best, Color::Yellow)?;
    }
    draw_button(out, view, &session.start_button, assets)
}

fn draw_playing<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &Viewport,
    assets: &dyn AssetProvider,
    text: &TextSet,
) -> std::io::Result<()> {
    draw_player(out, view, &session.player, assets)?;

    for obstacle in &session.obstacles {
        let sprite = assets.sprite(AssetId::Obstacle(obstacle.size));
        draw_sprite_at(
            out,
            view,
            sprite,
            obstacle.rect.center_x(),
            obstacle.rect.center_y(),
            rgb(sprite.color),
        )?;
    }

    for particle in session.particles.iter().filter(|p| p.life > 0) {
        draw_particle(out, view, particle)?;
    }

    draw_hud(out, session, view, assets, text)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &Viewport,
    assets: &dyn AssetProvider,
    text: &TextSet,
) -> std::io::Result<()> {
    let h = session.height;
    out.queue(style::SetAttribute(Attribute::Bold))?;
    put_centered(out, view, h / 3.0, text.game_over, C_GAME_OVER)?;
    out.queue(style::SetAttribute(Attribute::Reset))?;
    put_centered(out, view, h / 2.0, &text.final_score(session.score), C_TEXT)?;

    let best_color = if session.score >= session.best_score && session.score > 0 {
        Color::Yellow
    } else {
        C_HINT
    };
    put_centered(out, view, h / 2.0 + 30.0, &text.best_score(session.best_score), best_color)?;

    draw_button(out, view, &session.restart_button, assets)
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    view: &Viewport,
    player: &Player,
    assets: &dyn AssetProvider,
) -> std::io::Result<()> {
    let sprite = assets.sprite(AssetId::Player(player.pose));
    let color = if player.tinted {
        rgb(POOP_BROWN)
    } else {
        rgb(sprite.color)
    };

    // Hidden half of the flicker is drawn dimmed rather than skipped.
    if !player.visible {
        out.queue(style::SetAttribute(Attribute::Dim))?;
    }
    draw_sprite_at(
        out,
        view,
        sprite,
        player.rect.center_x() + player.shake_offset,
        player.rect.center_y(),
        color,
    )?;
    if !player.visible {
        out.queue(style::SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn draw_particle<W: Write>(out: &mut W, view: &Viewport, p: &Particle) -> std::io::Result<()> {
    let (col, row) = view.to_cell(p.x, p.y);
    if !view.in_playfield(col, row) {
        return Ok(());
    }
    let glyph = if p.radius >= 3.0 {
        "O"
    } else if p.radius >= 1.5 {
        "o"
    } else {
        "."
    };
    put(out, view, col, row, glyph, rgb(POOP_BROWN))
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &Viewport,
    assets: &dyn AssetProvider,
    text: &TextSet,
) -> std::io::Result<()> {
    // Score, left
    let star = assets.sprite(AssetId::Ui(UiElement::ScoreIcon));
    let star_glyph = star.art.first().map(String::as_str).unwrap_or_default();
    put(out, view, 1, 0, star_glyph, rgb(star.color))?;
    let score = text.score(session.score);
    put(out, view, 2 + display_width(star_glyph) as i32, 0, &score, C_TEXT)?;

    // Lives, right: "HP: n" then one icon per life
    let heart = assets.sprite(AssetId::Ui(UiElement::LifeIcon));
    let heart_glyph = heart.art.first().map(String::as_str).unwrap_or_default();
    let icons = heart_glyph.repeat(session.player.lives as usize);
    let lives = text.lives(session.player.lives);
    let right_width = display_width(&lives) + 1 + display_width(&icons);
    let col = i32::from(view.term_cols) - right_width as i32 - 1;
    put(out, view, col, 0, &lives, C_HUD_LIVES)?;
    put(out, view, col + display_width(&lives) as i32 + 1, 0, &icons, rgb(heart.color))?;
    Ok(())
}
