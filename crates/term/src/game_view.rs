//! GameView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameOverReason, Position, RARE_LETTERS, VOWELS};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Draws the letter grid, the falling letter and the score panel.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 keeps cells roughly square in most terminal fonts
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Top-left corner of the grid frame
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Frame size in terminal cells, border included
    pub fn frame_size(&self, rows: u16, cols: u16) -> (u16, u16) {
        (cols * self.cell_w + 2, rows * self.cell_h + 2)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let rows = snap.grid.rows();
        let cols = snap.grid.cols();
        let (frame_w, frame_h) = self.frame_size(rows, cols);

        let origin = Origin {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            origin.x + 1,
            origin.y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG),
        );
        self.draw_border(fb, origin, frame_w, frame_h, border);

        for row in 0..rows {
            for col in 0..cols {
                let pos = Position::new(row as i16, col as i16);
                match snap.grid.get(pos).flatten() {
                    Some(placed) => {
                        let style = letter_style(placed.character);
                        self.draw_letter(fb, origin, row, col, placed.character, style);
                    }
                    None => self.draw_empty_cell(fb, origin, row, col),
                }
            }
        }

        if let Some(letter) = snap.falling {
            if let Some(landing) = snap.landing_row.filter(|&r| r > letter.row) {
                let ghost = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
                self.draw_letter(
                    fb,
                    origin,
                    landing as u16,
                    letter.col as u16,
                    letter.character.to_ascii_lowercase(),
                    ghost,
                );
            }
            if letter.row >= 0 && letter.col >= 0 {
                let active = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(70, 70, 120)).bold();
                let (row, col) = (letter.row as u16, letter.col as u16);
                self.draw_letter(fb, origin, row, col, letter.character, active);
            }
        }

        self.draw_side_panel(fb, snap, viewport, origin, frame_w);

        if snap.paused {
            self.draw_overlay_text(fb, origin, frame_w, frame_h / 2, "PAUSED");
        } else if let Some(reason) = snap.game_over {
            let mid = frame_h / 2;
            let title = match reason {
                GameOverReason::AllTargetsFound => "YOU WIN",
                _ => "GAME OVER",
            };
            self.draw_overlay_text(fb, origin, frame_w, mid.saturating_sub(1), title);
            self.draw_overlay_text(fb, origin, frame_w, mid, reason.message());
            self.draw_overlay_text(fb, origin, frame_w, mid + 1, "N: new game");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, o: Origin, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(o.x, o.y, '┌', style);
        fb.put_char(o.x + w - 1, o.y, '┐', style);
        fb.put_char(o.x, o.y + h - 1, '└', style);
        fb.put_char(o.x + w - 1, o.y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(o.x + dx, o.y, '─', style);
            fb.put_char(o.x + dx, o.y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(o.x, o.y + dy, '│', style);
            fb.put_char(o.x + w - 1, o.y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, o: Origin, row: u16, col: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.draw_letter(fb, o, row, col, '·', style);
    }

    /// Glyph in the first column of the cell, the rest padded with the same background
    fn draw_letter(
        &self,
        fb: &mut FrameBuffer,
        o: Origin,
        row: u16,
        col: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = o.x + 1 + col * self.cell_w;
        let py = o.y + 1 + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px, py, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        o: Origin,
        frame_w: u16,
    ) {
        let panel_x = o.x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let stats = &snap.stats;
        let mut y = o.y;
        for (name, number) in [
            ("SCORE", stats.score),
            ("BEST", stats.high_score),
            ("LEVEL", snap.level as u64),
            ("WORDS", stats.words_completed as u64),
            ("STREAK", stats.streak as u64),
            ("COMBO", stats.max_combo as u64),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u64(panel_x + 7, y, number, value);
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "NEXT", label);
        let mut x = panel_x + 7;
        for (i, &ch) in snap.next_letters.iter().enumerate() {
            let style = if i == 0 { letter_style(ch).bold() } else { dim };
            fb.put_char(x, y, ch, CellStyle { bg: PANEL_BG, ..style });
            x = x.saturating_add(2);
        }
        y = y.saturating_add(2);

        if snap.targets_total > 0 {
            fb.put_str(panel_x, y, "TARGETS", label);
            let x = fb.put_u64(panel_x + 8, y, snap.targets_found as u64, value);
            let x = fb.put_str(x, y, "/", value);
            fb.put_u64(x, y, snap.targets_total as u64, value);
            y = y.saturating_add(1);
        }

        if let Some(remaining) = snap.time_remaining_ms() {
            fb.put_str(panel_x, y, "TIME", label);
            put_clock(fb, panel_x + 7, y, remaining, value);
            y = y.saturating_add(1);
        }

        if snap.multiplier > 1.0 {
            let boost = CellStyle::new(Rgb::new(255, 200, 60), PANEL_BG).bold();
            fb.put_str(panel_x, y, "BOOST", label);
            let tenths = (snap.multiplier * 10.0).round() as u64;
            let x = fb.put_str(panel_x + 7, y, "x", boost);
            let x = fb.put_u64(x, y, tenths / 10, boost);
            let x = fb.put_str(x, y, ".", boost);
            let x = fb.put_u64(x, y, tenths % 10, boost);
            put_clock(fb, x + 1, y, snap.multiplier_remaining_ms, dim);
            y = y.saturating_add(1);
        }

        y = y.saturating_add(1);
        for (word, points) in snap.last_words.iter().take(3) {
            if y >= viewport.height {
                break;
            }
            let x = fb.put_str(panel_x, y, word, label);
            let x = fb.put_str(x + 1, y, "+", value);
            fb.put_u64(x, y, *points, value);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, o: Origin, frame_w: u16, dy: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let x = o.x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, o.y.saturating_add(dy), text, style);
    }
}

/// Vowels cyan, rare letters amber, the rest light grey
fn letter_style(ch: char) -> CellStyle {
    let fg = if VOWELS.contains(&ch) {
        Rgb::new(80, 220, 220)
    } else if RARE_LETTERS.contains(&ch) {
        Rgb::new(255, 165, 0)
    } else {
        Rgb::new(230, 230, 230)
    };
    CellStyle::new(fg, PLAY_BG)
}

/// `m:ss`
fn put_clock(fb: &mut FrameBuffer, x: u16, y: u16, ms: u64, style: CellStyle) -> u16 {
    let secs = ms.div_ceil(1000);
    let x = fb.put_u64(x, y, secs / 60, style);
    let x = fb.put_str(x, y, ":", style);
    if secs % 60 < 10 {
        fb.put_char(x, y, '0', style);
        fb.put_u64(x + 1, y, secs % 60, style)
    } else {
        fb.put_u64(x, y, secs % 60, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_clock_pads_seconds() {
        let mut fb = FrameBuffer::new(6, 1);
        put_clock(&mut fb, 0, 0, 65_000, CellStyle::default());
        assert_eq!(fb.row_text(0), "1:05  ");

        put_clock(&mut fb, 0, 0, 299_001, CellStyle::default());
        assert_eq!(fb.row_text(0), "5:00  ");
    }

    #[test]
    fn test_letter_style_groups() {
        assert_ne!(letter_style('A').fg, letter_style('T').fg);
        assert_ne!(letter_style('Q').fg, letter_style('T').fg);
        assert_eq!(letter_style('Y').fg, letter_style('E').fg);
    }

    #[test]
    fn test_frame_size() {
        assert_eq!(GameView::default().frame_size(14, 10), (22, 16));
        assert_eq!(GameView::new(1, 1).frame_size(3, 4), (6, 5));
    }
}
