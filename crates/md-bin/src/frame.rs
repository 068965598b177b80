//! Frame writer: turns a [`RenderSnapshot`] into terminal commands.
//!
//! Every refresh repaints the whole screen. Commands are collected first and
//! flushed once, so a frame never reaches the terminal half drawn.

use anyhow::Result;
use core_model::RenderSnapshot;
use crossterm::{
    cursor::{MoveTo, SetCursorStyle},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Bold(bool),
    Reverse(bool),
    /// Block cursor in Navigation mode, bar in Edit mode.
    CursorBar(bool),
}

#[derive(Debug, Default)]
pub struct Frame {
    cmds: Vec<Command>,
}

impl Frame {
    /// Lay out `snap` on a `width` x `height` terminal: text rows from the
    /// top, the status line on the last row, the cursor placed last.
    pub fn build(snap: &RenderSnapshot, width: u16, height: u16) -> Self {
        let mut frame = Frame::default();
        let width_units = usize::from(width);
        let text_rows = height.saturating_sub(1);
        for y in 0..text_rows {
            frame.push(Command::MoveTo(0, y));
            frame.push(Command::ClearLine);
            if let Some(row) = snap.rows.get(usize::from(y)) {
                let text: String = row.text.chars().take(width_units).collect();
                let heading = row.heading.is_some();
                if heading {
                    frame.push(Command::Bold(true));
                }
                frame.print(text);
                if heading {
                    frame.push(Command::Bold(false));
                }
            } else {
                frame.print("~");
            }
        }
        if height > 0 {
            let status: String = snap.status_line().chars().take(width_units).collect();
            frame.push(Command::MoveTo(0, height - 1));
            frame.push(Command::ClearLine);
            frame.push(Command::Reverse(true));
            frame.print(format!("{status:<width_units$}"));
            frame.push(Command::Reverse(false));
        }
        let x = snap.cursor.column.min(width_units.saturating_sub(1));
        let y = snap.cursor_screen_row().min(usize::from(text_rows.saturating_sub(1)));
        frame.push(Command::CursorBar(snap.mode == core_state::Mode::Edit));
        frame.push(Command::MoveTo(to_u16(x), to_u16(y)));
        frame
    }

    fn push(&mut self, cmd: Command) {
        self.cmds.push(cmd);
    }

    fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Bold(true) => queue!(out, SetAttribute(Attribute::Bold))?,
                Command::Bold(false) => queue!(out, SetAttribute(Attribute::NormalIntensity))?,
                Command::Reverse(true) => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reverse(false) => queue!(out, SetAttribute(Attribute::NoReverse))?,
                Command::CursorBar(true) => queue!(out, SetCursorStyle::SteadyBar)?,
                Command::CursorBar(false) => queue!(out, SetCursorStyle::SteadyBlock)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}
