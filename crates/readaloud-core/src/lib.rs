//! Playback sequencing for a read-aloud book reader.
//!
//! The core is a synchronous reducer ([`PlaybackController`]) plus the
//! pieces it is built from. Hosts feed it [`Message`]s and carry out the
//! [`Effect`]s it returns against a [`SpeechService`] and a
//! [`PositionSink`].

pub mod bindings;
pub mod book;
pub mod controller;
pub mod cursor;
pub mod effect;
pub mod loader;
pub mod player;
pub mod profile;
pub mod publisher;
pub mod speech;
pub mod splitter;
pub mod state;

pub use bindings::export_ts_bindings;
pub use book::{Book, Chapter, ParagraphUnit};
pub use controller::{MAX_SPEECH_RATE, MIN_SPEECH_RATE, PlaybackController, VoiceSettings};
pub use cursor::ParagraphCursor;
pub use effect::{Effect, Epoch, Message, Timer, TimerKind};
pub use loader::load_book;
pub use player::{UnitOutcome, UtterancePlayer};
pub use profile::{PlatformClass, PlaybackProfile, ProfileOverrides};
pub use publisher::{ChapterChangedEvent, PositionEvent, PositionSink, Progress, ReaderEvent};
pub use speech::{SpeechError, SpeechEvent, SpeechOutcome, SpeechService, Utterance, UtteranceTicket};
pub use splitter::split_units;
pub use state::{Direction, PlaybackPosition, PlaybackState};
