//! Single-threaded host loop around the playback reducer.
//!
//! Messages from every source (transport commands, the speech engine,
//! expired timers) arrive on one channel and are reduced in order, so the
//! controller never sees two callbacks at once.

use readaloud_core::{Effect, Message, PlaybackController, PositionSink, SpeechService};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, trace};

/// Out-of-band requests that end or wind down the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// No more commands will arrive; exit once playback is idle.
    InputClosed,
    /// Stop speaking and exit now.
    Shutdown,
}

pub struct EffectRuntime<S, P> {
    controller: PlaybackController,
    speech: S,
    sink: P,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    input_closed: bool,
}

pub fn message_channel() -> (UnboundedSender<Message>, UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

impl<S: SpeechService, P: PositionSink> EffectRuntime<S, P> {
    pub fn new(
        controller: PlaybackController,
        speech: S,
        sink: P,
        channel: (UnboundedSender<Message>, UnboundedReceiver<Message>),
    ) -> Self {
        let (tx, rx) = channel;
        Self {
            controller,
            speech,
            sink,
            tx,
            rx,
            input_closed: false,
        }
    }

    /// Reduce one message and carry out the resulting effects.
    pub fn dispatch(&mut self, message: Message) {
        trace!(?message, "Dispatching");
        for effect in self.controller.reduce(message) {
            self.run_effect(effect);
        }
    }

    /// Run until shut down, or until input has closed and playback is idle.
    pub async fn run(mut self, mut control: UnboundedReceiver<Control>) -> PlaybackController {
        let mut control_open = true;
        loop {
            tokio::select! {
                biased;
                message = self.rx.recv() => match message {
                    Some(message) => self.dispatch(message),
                    None => break,
                },
                request = control.recv(), if control_open => match request {
                    Some(Control::Shutdown) => {
                        info!("Shutdown requested");
                        self.dispatch(Message::Stop);
                        break;
                    }
                    Some(Control::InputClosed) => {
                        debug!("Command input closed");
                        self.input_closed = true;
                    }
                    None => control_open = false,
                },
            }

            if self.input_closed && !self.controller.state().is_playing() {
                info!("Playback idle with no further input; exiting");
                break;
            }
        }
        self.controller
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CancelSpeech => self.speech.cancel(),
            Effect::Submit(utterance) => self.speech.speak(utterance),
            Effect::ResumeSpeech => {
                if self.speech.is_paused() {
                    debug!("Resuming paused speech engine");
                    self.speech.resume();
                }
            }
            Effect::Schedule { delay, timer } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::TimerFired(timer));
                });
            }
            Effect::Publish(event) => self.sink.on_position(&event),
            Effect::ChapterChanged(event) => self.sink.on_chapter_changed(&event),
            Effect::StateChanged(state) => self.sink.on_state_changed(state),
            Effect::BookComplete => self.sink.on_book_complete(),
        }
    }
}
