//! Redraw driver: the thread that turns refresh signals into terminal output.
//!
//! The compositor only records damage and pings a best-effort signal. The
//! driver waits on that signal, renders, diffs the frame against the last
//! one it presented and writes the result in one syscall.

use super::diff::{render_diff, render_full, DiffState, DiffStats};
use super::output::OutputBuffer;
use crate::buffer::Buffer;
use crate::compositor::{Compositor, Damage, Frame};
use crossbeam_channel::RecvTimeoutError;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Configuration for the redraw driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Minimum time between two presented frames.
    pub frame_interval: Duration,
    /// How long to wait for a refresh before re-checking shutdown.
    pub idle_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16), // ~60 FPS
            idle_timeout: Duration::from_millis(100),
        }
    }
}

/// Writes frames to a terminal, diffing against the previous one.
#[derive(Debug)]
pub struct Presenter<W: Write> {
    writer: W,
    previous: Option<Buffer>,
    state: DiffState,
    out: OutputBuffer,
    frames: u64,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter over `writer`. The first frame is always written in full.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            previous: None,
            state: DiffState::new(),
            out: OutputBuffer::new(),
            frames: 0,
        }
    }

    /// Write `frame`.
    ///
    /// A full redraw happens on [`Damage::Full`], on a size change, or when
    /// nothing was presented before. Otherwise only cells inside the
    /// damaged regions that differ from the previous frame are written.
    pub fn present(&mut self, frame: Frame) -> io::Result<DiffStats> {
        self.out.clear();
        let Frame { buffer, damage } = frame;
        let stats = match (&self.previous, &damage) {
            (Some(previous), Damage::Partial(rects))
                if previous.width() == buffer.width() && previous.height() == buffer.height() =>
            {
                render_diff(previous, &buffer, rects, &mut self.out, &mut self.state)
            }
            _ => render_full(&buffer, &mut self.out, &mut self.state),
        };
        if !self.out.is_empty() {
            if let Err(err) = self.out.flush_to(&mut self.writer) {
                // What reached the terminal is unknown now.
                self.invalidate();
                return Err(err);
            }
        }
        self.previous = Some(buffer);
        self.frames += 1;
        Ok(stats)
    }

    /// Force the next frame to be written in full.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.state.reset();
    }

    /// Number of frames presented so far.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Get a reference to the writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the presenter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Thread that renders the compositor whenever its refresh signal fires.
///
/// The driver should be the only caller of [`Compositor::render`]: each
/// frame's damage is relative to the previous render pass.
pub struct RedrawDriver {
    /// Handle to the redraw thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl RedrawDriver {
    /// Spawn the redraw thread writing to `writer`.
    ///
    /// An initial full frame is presented right away.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn<W>(compositor: Arc<Compositor>, writer: W, config: DriverConfig) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("weave-redraw".to_string())
            .spawn(move || Self::run_loop(&compositor, Presenter::new(writer), &shutdown_clone, &config))?;

        Ok(Self { handle: Some(handle), shutdown })
    }

    /// Signal the redraw thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the redraw thread to finish.
    pub fn join(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop<W: Write>(
        compositor: &Compositor,
        mut presenter: Presenter<W>,
        shutdown: &AtomicBool,
        config: &DriverConfig,
    ) {
        let signal = compositor.refresh_signal();
        let mut last_frame: Option<Instant> = None;
        let mut pending = true;

        while !shutdown.load(Ordering::Relaxed) {
            if !pending {
                match signal.recv_timeout(config.idle_timeout) {
                    Ok(()) => {}
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            pending = false;

            if let Some(last) = last_frame {
                let elapsed = last.elapsed();
                if elapsed < config.frame_interval {
                    thread::sleep(config.frame_interval - elapsed);
                }
            }
            // Whatever arrived while throttling is covered by this render.
            while signal.try_recv().is_ok() {}

            let frame = compositor.render();
            let full = frame.damage.is_full();
            match presenter.present(frame) {
                Ok(stats) => tracing::trace!(
                    full,
                    cells = stats.cells_changed,
                    moves = stats.cursor_moves,
                    styles = stats.style_changes,
                    "frame presented"
                ),
                Err(err) => tracing::error!(error = %err, "failed to present frame"),
            }
            last_frame = Some(Instant::now());
        }
        tracing::debug!(frames = presenter.frames(), "redraw driver stopped");
    }
}

impl Drop for RedrawDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;
    use crate::compositor::CompositorConfig;
    use crate::input::{KeyCode, KeyEvent};
    use crate::layout::Rect;
    use crate::widgets::TextInput;
    use std::sync::Mutex;

    fn frame(buffer: &Buffer, damage: Damage) -> Frame {
        Frame { buffer: buffer.clone(), damage }
    }

    #[test]
    fn test_first_frame_is_full() {
        let mut presenter = Presenter::new(Vec::new());
        let buffer = Buffer::new(4, 2);
        let stats = presenter.present(frame(&buffer, Damage::Partial(vec![]))).unwrap();
        assert_eq!(stats.cells_changed, 8);
        assert_eq!(presenter.frames(), 1);
    }

    #[test]
    fn test_partial_writes_only_changes() {
        let mut presenter = Presenter::new(Vec::new());
        let mut buffer = Buffer::new(10, 3);
        presenter.present(frame(&buffer, Damage::Full)).unwrap();
        let written = presenter.writer().len();

        buffer.set(0, 0, Cell::new('a'));
        buffer.set(5, 2, Cell::new('b'));
        let stats = presenter
            .present(frame(&buffer, Damage::Partial(vec![Rect::new(4, 2, 3, 1)])))
            .unwrap();
        assert_eq!(stats.cells_changed, 1);
        let tail = String::from_utf8_lossy(&presenter.writer()[written..]).into_owned();
        assert!(tail.contains('b'));
        assert!(!tail.contains('a'));
    }

    #[test]
    fn test_unchanged_partial_writes_nothing() {
        let mut presenter = Presenter::new(Vec::new());
        let buffer = Buffer::new(5, 5);
        presenter.present(frame(&buffer, Damage::Full)).unwrap();
        let written = presenter.writer().len();
        presenter.present(frame(&buffer, Damage::Partial(vec![buffer.area()]))).unwrap();
        assert_eq!(presenter.writer().len(), written);
    }

    #[test]
    fn test_size_change_forces_full() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(frame(&Buffer::new(2, 2), Damage::Full)).unwrap();
        let stats = presenter
            .present(frame(&Buffer::new(3, 2), Damage::Partial(vec![Rect::new(0, 0, 1, 1)])))
            .unwrap();
        assert_eq!(stats.cells_changed, 6);
    }

    #[test]
    fn test_invalidate_forces_full() {
        let mut presenter = Presenter::new(Vec::new());
        let buffer = Buffer::new(3, 1);
        presenter.present(frame(&buffer, Damage::Full)).unwrap();
        presenter.invalidate();
        let stats = presenter.present(frame(&buffer, Damage::Partial(vec![]))).unwrap();
        assert_eq!(stats.cells_changed, 3);
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn wait_for(sink: &SharedSink, needle: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if String::from_utf8_lossy(&sink.0.lock().unwrap()).contains(needle) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_driver_presents_on_refresh() {
        let compositor = Arc::new(Compositor::new(12, 3, CompositorConfig::default()));
        let id = compositor.add(TextInput::new(Rect::new(0, 0, 12, 1)));
        let sink = SharedSink::default();
        let config = DriverConfig {
            frame_interval: Duration::from_millis(1),
            idle_timeout: Duration::from_millis(5),
        };
        let driver = RedrawDriver::spawn(compositor.clone(), sink.clone(), config).unwrap();

        compositor.focus(id);
        compositor.handle_key(&KeyEvent::new(KeyCode::Char('q')));
        assert!(wait_for(&sink, "q"));

        driver.join();
    }
}
