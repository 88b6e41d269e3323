/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{COLS, ROWS};
use crate::domain::level::{MAJOR_PRIZE_LEVEL, MINOR_PRIZE_LEVEL};
use crate::ui::board::{Board, Button};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, so the terminal's own
    /// default never shows through between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real cell.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Layout ──

/// Each board cell is two terminal columns wide so it looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const BOARD_COL: usize = 6;
/// Screen row just below the board frame.
const BELOW_BOARD: usize = BOARD_ROW + ROWS + 2;

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const LIT: Color = Color::Rgb { r: 230, g: 40, b: 40 };
const UNLIT: Color = Color::Rgb { r: 45, g: 45, b: 60 };
const FRAME: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, board: &Board) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(board);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, b: &Board) {
        self.compose_hud(b);
        self.compose_board(b);
        self.compose_button(b);
        self.compose_help();
        if b.offer_open {
            self.compose_offer_overlay(b);
        }
    }

    fn compose_hud(&mut self, b: &Board) {
        let hud = match b.button {
            Button::Place => format!(
                " STACKER   Level {:>2}/{}   Width {}   Speed {:>2} ",
                b.level + 1, ROWS, b.width, b.speed,
            ),
            Button::Start => " STACKER ".to_string(),
        };
        let buf_w = self.front.width;
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::Black, GOLD));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::Black, GOLD);
    }

    /// Draw the grid with row 0 at the bottom, plus prize markers.
    fn compose_board(&mut self, b: &Board) {
        let inner_w = COLS * CELL_W;
        let top = BOARD_ROW;
        let left = BOARD_COL;

        let rule: String = "─".repeat(inner_w);
        self.front.put_str(left - 1, top, &format!("┌{rule}┐"), FRAME, Color::Reset);
        self.front.put_str(left - 1, top + ROWS + 1, &format!("└{rule}┘"), FRAME, Color::Reset);

        for y in 0..ROWS {
            let sy = top + 1 + (ROWS - 1 - y);
            let label = format!("{:>2}", y + 1);
            self.front.put_str(left - 4, sy, &label, Color::DarkGrey, Color::Reset);
            self.front.set(left - 1, sy, Cell::new('│', FRAME, Color::Reset));
            self.front.set(left + inner_w, sy, Cell::new('│', FRAME, Color::Reset));

            for x in 0..COLS {
                let (ch, fg) = if b.occupied(x, y) { ('█', LIT) } else { ('·', UNLIT) };
                for dx in 0..CELL_W {
                    let c = if dx == 0 || ch == '█' { ch } else { ' ' };
                    self.front.set(left + x * CELL_W + dx, sy, Cell::new(c, fg, Color::Reset));
                }
            }

            // Markers sit on the last row of each prize band.
            let marker = if y + 1 == MINOR_PRIZE_LEVEL {
                Some(("◂ MINOR PRIZE", Color::Rgb { r: 100, g: 200, b: 255 }))
            } else if y + 1 == MAJOR_PRIZE_LEVEL {
                Some(("◂ MAJOR PRIZE", GOLD))
            } else {
                None
            };
            if let Some((text, color)) = marker {
                self.front.put_str(left + inner_w + 2, sy, text, color, Color::Reset);
            }
        }
    }

    fn compose_button(&mut self, b: &Board) {
        let blink = (b.anim_tick / 30) % 2 == 0;
        let label = format!("[  {}  ]", b.button.label());
        let fg = match b.button {
            Button::Start if blink => GREEN,
            Button::Start => Color::White,
            Button::Place => GOLD,
        };
        let x = BOARD_COL + (COLS * CELL_W).saturating_sub(label.len()) / 2;
        self.front.put_str(x, BELOW_BOARD, &label, fg, Color::Reset);

        if !b.message.is_empty() {
            self.front.put_str(2, BELOW_BOARD + 2, &format!("◈ {}", b.message), Color::White, Color::Reset);
        }
    }

    fn compose_help(&mut self) {
        let row = BELOW_BOARD + 4;
        let dim = Color::DarkGrey;
        self.front.put_str(2, row, "SPACE/ENTER  Start / Place     S  Stop", dim, Color::Reset);
        self.front.put_str(2, row + 1, "Y / N        Prize answer      Q  Quit", dim, Color::Reset);
    }

    fn compose_offer_overlay(&mut self, b: &Board) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let blink = (b.anim_tick / 15) % 2 == 0;
        let box_w = 34;
        let box_h = 6;
        let box_x = BOARD_COL.saturating_sub(3);
        let box_y = BOARD_ROW + (ROWS + 2).saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::Reset, dim));
            }
        }

        let title = if blink { "▶  MINOR PRIZE  ◀" } else { "   MINOR PRIZE   " };
        self.front.put_str(box_x + 8, box_y + 1, title, GOLD, dim);
        self.front.put_str(box_x + 2, box_y + 3, "Stop here and claim it?", Color::White, dim);
        self.front.put_str(box_x + 2, box_y + 4, "[Y] Claim      [N] Keep going", Color::Rgb { r: 100, g: 200, b: 255 }, dim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::GameEvent;

    fn composed(board: &Board) -> FrameBuffer {
        let mut r = Renderer::new();
        r.front.resize(80, 40);
        r.compose(board);
        r.front
    }

    fn screen_row(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn ground_row_is_drawn_at_the_bottom() {
        let mut board = Board::new();
        board.apply(&GameEvent::TileChanged { x: 0, y: 0, occupied: true });
        let buf = composed(&board);
        let bottom = BOARD_ROW + ROWS;
        assert_eq!(buf.get(BOARD_COL, bottom).ch, '█');
        assert_eq!(buf.get(BOARD_COL, BOARD_ROW + 1).ch, '·');
    }

    #[test]
    fn button_label_follows_board() {
        let mut board = Board::new();
        assert!(screen_row(&composed(&board), BELOW_BOARD).contains("START"));
        board.apply(&GameEvent::GameStarted);
        assert!(screen_row(&composed(&board), BELOW_BOARD).contains("PLACE"));
    }

    #[test]
    fn offer_overlay_only_while_open() {
        let mut board = Board::new();
        board.apply(&GameEvent::GameStarted);
        let text = |b: &Board| {
            let buf = composed(b);
            (0..buf.height).map(|y| screen_row(&buf, y)).collect::<Vec<_>>().join("\n")
        };
        assert!(!text(&board).contains("Stop here and claim it?"));
        board.apply(&GameEvent::MinorPrizeOffer);
        assert!(text(&board).contains("Stop here and claim it?"));
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(2, 0, "abcdef", Color::White, Color::Reset);
        assert_eq!(buf.get(2, 0).ch, 'a');
        assert_eq!(buf.get(3, 0).ch, 'b');
    }
}
