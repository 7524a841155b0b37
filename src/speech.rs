//! Console stand-in for a platform speech engine.
//!
//! Nothing is synthesised. Each utterance is logged and "finishes" after a
//! duration estimated from its word count, so pacing behaves as it would
//! against a real engine.

use readaloud_core::{
    Message, SpeechError, SpeechEvent, SpeechService, Utterance, UtteranceTicket,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

pub struct SimulatedSpeech {
    events: UnboundedSender<Message>,
    words_per_minute: u32,
    active: Option<(UtteranceTicket, JoinHandle<()>)>,
}

impl SimulatedSpeech {
    pub fn new(events: UnboundedSender<Message>, words_per_minute: u32) -> Self {
        Self {
            events,
            words_per_minute: words_per_minute.max(1),
            active: None,
        }
    }

    pub fn estimate_duration(&self, utterance: &Utterance) -> Duration {
        let words = utterance.text.split_whitespace().count().max(1) as f64;
        let per_minute = f64::from(self.words_per_minute) * f64::from(utterance.rate.max(0.1));
        Duration::from_secs_f64(words * 60.0 / per_minute)
    }

    /// Report an interruption for whatever is still speaking.
    fn interrupt_active(&mut self) {
        let Some((ticket, handle)) = self.active.take() else {
            return;
        };
        if handle.is_finished() {
            return;
        }
        handle.abort();
        trace!(%ticket, "Interrupted simulated utterance");
        let _ = self
            .events
            .send(Message::Speech(SpeechEvent::error(ticket, SpeechError::Interrupted)));
    }
}

impl SpeechService for SimulatedSpeech {
    fn speak(&mut self, utterance: Utterance) {
        self.interrupt_active();
        let duration = self.estimate_duration(&utterance);
        info!(
            ticket = %utterance.ticket,
            voice = utterance.voice.as_deref().unwrap_or("default"),
            rate = utterance.rate,
            millis = duration.as_millis() as u64,
            "Speaking: {}",
            utterance.text
        );
        let ticket = utterance.ticket;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = events.send(Message::Speech(SpeechEvent::ended(ticket)));
        });
        self.active = Some((ticket, handle));
    }

    fn cancel(&mut self) {
        self.interrupt_active();
    }

    fn resume(&mut self) {
        debug!("Simulated engine never pauses; resume ignored");
    }

    fn is_paused(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readaloud_core::SpeechOutcome;
    use tokio::sync::mpsc;

    fn utterance(ticket: u64, text: &str, rate: f32) -> Utterance {
        Utterance {
            ticket: UtteranceTicket(ticket),
            text: text.to_string(),
            voice: None,
            rate,
        }
    }

    #[test]
    fn duration_scales_with_words_and_rate() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let speech = SimulatedSpeech::new(tx, 120);
        let slow = speech.estimate_duration(&utterance(1, "one two three four", 1.0));
        let fast = speech.estimate_duration(&utterance(1, "one two three four", 2.0));
        assert_eq!(slow, Duration::from_secs(2));
        assert_eq!(fast, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_estimated_duration() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut speech = SimulatedSpeech::new(tx, 60);
        speech.speak(utterance(7, "Hello.", 1.0));

        match rx.recv().await {
            Some(Message::Speech(event)) => {
                assert_eq!(event, SpeechEvent::ended(UtteranceTicket(7)));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn newer_utterance_interrupts_the_old_one() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut speech = SimulatedSpeech::new(tx, 60);
        speech.speak(utterance(1, "First.", 1.0));
        speech.speak(utterance(2, "Second.", 1.0));

        let first = rx.recv().await;
        let second = rx.recv().await;
        match (first, second) {
            (Some(Message::Speech(interrupted)), Some(Message::Speech(ended))) => {
                assert_eq!(interrupted.ticket, UtteranceTicket(1));
                assert_eq!(
                    interrupted.outcome,
                    SpeechOutcome::Error(SpeechError::Interrupted)
                );
                assert_eq!(ended, SpeechEvent::ended(UtteranceTicket(2)));
            }
            other => panic!("unexpected messages: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_when_idle_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut speech = SimulatedSpeech::new(tx, 60);
        speech.cancel();
        drop(speech);
        assert!(rx.recv().await.is_none());
    }
}
