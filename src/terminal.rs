use crate::screen::{CharGrid, Screen};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

/// The real terminal, owned for as long as this value lives.
///
/// Raw mode and the alternate screen are left again on drop, so the shell
/// comes back intact on every exit path.
pub struct Terminal {
    grid: CharGrid,
    stdout: Stdout,
}

impl Terminal {
    pub fn new(view_radius: f64) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        log::info!("Terminal is {cols}x{rows}");
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, DisableLineWrap)?;
        Ok(Self {
            grid: CharGrid::new(cols.into(), rows.into(), view_radius),
            stdout,
        })
    }

    fn follow_terminal_size(&mut self) {
        match terminal::size() {
            Ok((cols, rows)) => {
                let size = (usize::from(cols), usize::from(rows));
                if size != self.grid.size() {
                    log::info!("Terminal resized to {cols}x{rows}");
                    self.grid.resize(size.0, size.1);
                }
            }
            Err(err) => log::warn!("Could not query terminal size: {err}"),
        }
    }
}

impl Screen for Terminal {
    fn clear(&mut self) {
        self.follow_terminal_size();
        self.grid.clear();
    }
    fn set_viewport_center(&mut self, x: f64, y: f64) {
        self.grid.set_viewport_center(x, y);
    }
    fn plot_filled_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.grid.plot_filled_circle(x, y, radius);
    }
    fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.stdout, BeginSynchronizedUpdate)?;
        for (row, line) in self.grid.lines().enumerate() {
            let row = u16::try_from(row)?;
            queue!(self.stdout, MoveTo(0, row), Print(line))?;
        }
        queue!(self.stdout, EndSynchronizedUpdate)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restored = execute!(self.stdout, EnableLineWrap, Show, LeaveAlternateScreen)
            .and_then(|()| terminal::disable_raw_mode());
        if let Err(err) = restored {
            log::error!("Failed to restore terminal: {err}");
        }
    }
}

/// Drains pending terminal events, reporting whether Ctrl-C was among them.
///
/// A broken event source counts as an interrupt so the loop can't spin on
/// a dead terminal.
pub fn interrupt_requested() -> bool {
    let mut interrupted = false;
    loop {
        match event::poll(Duration::ZERO) {
            Ok(false) => return interrupted,
            Ok(true) => {}
            Err(err) => {
                log::error!("Polling terminal events failed: {err}");
                return true;
            }
        }
        match event::read() {
            Ok(Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) if modifiers.contains(KeyModifiers::CONTROL) => interrupted = true,
            Ok(_) => {}
            Err(err) => {
                log::error!("Reading terminal event failed: {err}");
                return true;
            }
        }
    }
}
