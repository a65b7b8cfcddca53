use std::io::{self, Write};

use crossterm::{cursor, queue, terminal};

use emu8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8_core::FrameBuffer;

const PIXEL_ON: char = '█';
const PIXEL_OFF: char = ' ';

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// This draws them as text, one line per row, onto any writer.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
///
/// On a terminal the first frame switches to the alternate screen and hides the cursor,
/// and every frame is redrawn in place from the top left. `restore` undoes this.
pub struct Display<W: Write> {
    out: W,
    terminal: bool,
    entered: bool,
}

impl<W: Write> Display<W> {
    /// # Arguments
    /// * `out` where frames are written
    /// * `terminal` whether `out` is a terminal that should be redrawn in place
    pub fn new(out: W, terminal: bool) -> Self {
        Display {
            out,
            terminal,
            entered: false,
        }
    }

    /// Formats a Chip-8 FrameBuffer as DISPLAY_HEIGHT lines of DISPLAY_WIDTH characters.
    fn frame_to_text(frame: &FrameBuffer) -> String {
        let mut text = String::with_capacity(DISPLAY_HEIGHT * (DISPLAY_WIDTH * 3 + 1));
        for row in frame.iter() {
            text.extend(row.iter().map(|&on| if on { PIXEL_ON } else { PIXEL_OFF }));
            text.push('\n');
        }
        text
    }

    /// Writes the Chip-8 FrameBuffer out as text and flushes it.
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        if self.terminal {
            if !self.entered {
                queue!(
                    self.out,
                    terminal::EnterAlternateScreen,
                    cursor::Hide,
                    terminal::Clear(terminal::ClearType::All)
                )?;
                self.entered = true;
            }
            queue!(self.out, cursor::MoveTo(0, 0))?;
        }
        self.out.write_all(Self::frame_to_text(frame).as_bytes())?;
        self.out.flush()
    }

    /// Leaves the alternate screen if a frame ever entered it
    pub fn restore(&mut self) -> io::Result<()> {
        if self.entered {
            queue!(self.out, cursor::Show, terminal::LeaveAlternateScreen)?;
            self.entered = false;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> FrameBuffer {
        [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT]
    }

    #[test]
    fn test_frame_to_text() {
        let mut frame = blank();
        frame[0][1] = true;
        frame[1][0] = true;
        let text = Display::<Vec<u8>>::frame_to_text(&frame);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), DISPLAY_HEIGHT);
        assert!(lines.iter().all(|line| line.chars().count() == DISPLAY_WIDTH));
        assert!(lines[0].starts_with(" █ "));
        assert!(lines[1].starts_with("█ "));
        assert_eq!(lines[2].trim(), "");
    }

    #[test]
    fn test_render_writes_plain_text_off_terminal() {
        let frame = blank();
        let mut display = Display::new(Vec::new(), false);
        display.render(&frame).unwrap();
        display.restore().unwrap();
        assert_eq!(
            display.into_inner(),
            Display::<Vec<u8>>::frame_to_text(&frame).into_bytes()
        );
    }

    #[test]
    fn test_render_takes_over_terminal_then_restores() {
        let frame = blank();
        let text = Display::<Vec<u8>>::frame_to_text(&frame);

        let mut expected: Vec<u8> = Vec::new();
        queue!(
            expected,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )
        .unwrap();
        expected.extend_from_slice(text.as_bytes());
        queue!(expected, cursor::MoveTo(0, 0)).unwrap();
        expected.extend_from_slice(text.as_bytes());
        queue!(expected, cursor::Show, terminal::LeaveAlternateScreen).unwrap();

        let mut display = Display::new(Vec::new(), true);
        display.render(&frame).unwrap();
        display.render(&frame).unwrap();
        display.restore().unwrap();
        let written = display.into_inner();

        assert_eq!(written, expected);
        assert!(!written.starts_with(b"\x1b[H"));
    }
}
