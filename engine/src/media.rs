//! Audio and backdrop playback.
//!
//! Media are opaque side-effecting sinks: every call is an attempt, failures are
//! logged and dropped. Nothing in the stage sequence waits on or retries them.

use std::{
    fmt,
    io::{self, Write},
    time::Duration,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub trait MediaSink {
    fn name(&self) -> &'static str;
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;
}

/// Audio that rings the terminal bell on `play`.
pub struct TerminalBell {
    out: Box<dyn Write>,
}

impl TerminalBell {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    #[must_use]
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }
}

impl fmt::Debug for TerminalBell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalBell").finish_non_exhaustive()
    }
}

impl MediaSink for TerminalBell {
    fn name(&self) -> &'static str {
        "bell"
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> Result<(), MediaError> {
        Ok(())
    }
}

/// Audio sink for `chime = false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl MediaSink for Silence {
    fn name(&self) -> &'static str {
        "silence"
    }

    fn play(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> Result<(), MediaError> {
        Ok(())
    }
}

/// Looping animated background drawn behind the celebration.
#[derive(Debug, Default, Clone)]
pub struct Backdrop {
    visible: bool,
    playing: bool,
    position: Duration,
}

impl Backdrop {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playback position; the renderer derives the twinkle phase from it.
    #[must_use]
    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn advance(&mut self, delta: Duration) {
        if self.playing {
            self.position = self.position.saturating_add(delta);
        }
    }
}

impl MediaSink for Backdrop {
    fn name(&self) -> &'static str {
        "backdrop"
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.position = position;
        Ok(())
    }
}

fn attempt(sink: &'static str, op: &'static str, result: Result<(), MediaError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(sink, op, error = %err, "Media call failed; ignoring");
            false
        }
    }
}

/// Owns the audio and backdrop handles for the lifetime of the view.
///
/// Released on drop if [`MediaDeck::release`] was not called first.
pub struct MediaDeck {
    audio: Box<dyn MediaSink>,
    backdrop: Backdrop,
    released: bool,
}

impl fmt::Debug for MediaDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaDeck")
            .field("audio", &self.audio.name())
            .field("backdrop", &self.backdrop)
            .field("released", &self.released)
            .finish()
    }
}

impl MediaDeck {
    #[must_use]
    pub fn new(audio: Box<dyn MediaSink>) -> Self {
        Self {
            audio,
            backdrop: Backdrop::default(),
            released: false,
        }
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn advance(&mut self, delta: Duration) {
        self.backdrop.advance(delta);
    }

    /// Start the chime from the top and bring the backdrop up.
    pub fn swap_to_celebration(&mut self) {
        let name = self.audio.name();
        attempt(name, "seek", self.audio.seek(Duration::ZERO));
        if attempt(name, "play", self.audio.play()) {
            tracing::info!(sink = name, "Celebration audio started");
        }
        self.backdrop.set_visible(true);
        attempt("backdrop", "play", self.backdrop.play());
        self.released = false;
    }

    /// Stop and rewind everything. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        let name = self.audio.name();
        attempt(name, "pause", self.audio.pause());
        attempt(name, "seek", self.audio.seek(Duration::ZERO));
        attempt("backdrop", "pause", self.backdrop.pause());
        attempt("backdrop", "seek", self.backdrop.seek(Duration::ZERO));
        self.backdrop.set_visible(false);
        self.released = true;
    }
}

impl Drop for MediaDeck {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Backdrop, MediaDeck, MediaError, MediaSink, TerminalBell};
    use std::{
        cell::RefCell,
        io::{self, Write},
        rc::Rc,
        time::Duration,
    };

    /// Audio sink that rejects every play, like a browser blocking autoplay.
    #[derive(Default)]
    pub(crate) struct RejectingAudio {
        pub(crate) attempts: Rc<RefCell<u32>>,
    }

    impl MediaSink for RejectingAudio {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn play(&mut self) -> Result<(), MediaError> {
            *self.attempts.borrow_mut() += 1;
            Err(MediaError::Rejected("autoplay blocked".into()))
        }

        fn pause(&mut self) -> Result<(), MediaError> {
            Err(MediaError::Rejected("not playing".into()))
        }

        fn seek(&mut self, _position: Duration) -> Result<(), MediaError> {
            Err(MediaError::Io(io::Error::other("no device")))
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bell_writes_bel() {
        let buf = SharedBuf::default();
        let mut bell = TerminalBell::new(Box::new(buf.clone()));
        bell.play().unwrap();
        assert_eq!(buf.0.borrow().as_slice(), b"\x07");
    }

    #[test]
    fn swap_shows_and_plays_backdrop() {
        let buf = SharedBuf::default();
        let mut deck = MediaDeck::new(Box::new(TerminalBell::new(Box::new(buf.clone()))));
        assert!(!deck.backdrop().is_visible());
        deck.swap_to_celebration();
        assert!(deck.backdrop().is_visible());
        assert!(deck.backdrop().is_playing());
        assert_eq!(buf.0.borrow().len(), 1);

        deck.advance(Duration::from_millis(300));
        assert_eq!(deck.backdrop().position(), Duration::from_millis(300));
    }

    #[test]
    fn rejected_audio_is_ignored() {
        let audio = RejectingAudio::default();
        let attempts = Rc::clone(&audio.attempts);
        let mut deck = MediaDeck::new(Box::new(audio));
        deck.swap_to_celebration();
        assert_eq!(*attempts.borrow(), 1, "play attempted once, never retried");
        assert!(deck.backdrop().is_visible());
    }

    #[test]
    fn release_rewinds_and_hides() {
        let mut deck = MediaDeck::new(Box::new(super::Silence));
        deck.swap_to_celebration();
        deck.advance(Duration::from_secs(2));
        deck.release();
        assert!(!deck.backdrop().is_visible());
        assert!(!deck.backdrop().is_playing());
        assert_eq!(deck.backdrop().position(), Duration::ZERO);
    }

    #[test]
    fn paused_backdrop_holds_position() {
        let mut backdrop = Backdrop::default();
        backdrop.advance(Duration::from_secs(1));
        assert_eq!(backdrop.position(), Duration::ZERO);
    }
}
