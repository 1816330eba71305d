//! The async session driver.
//!
//! [`LiveSession::run`] wires a microphone, a live channel, and an audio
//! output together around a [`LiveAssistant`]: microphone frames are pumped
//! upstream in capture order, server events are folded through the state
//! machine, and the resulting commands are applied to the output. The loop
//! ends when the caller stops it, the channel fails, or the server closes.

use crate::assistant::{AudioCommand, LiveAssistant};
use crate::audio::{AudioChunk, AudioFormat};
use crate::config::LiveConfig;
use crate::error::LiveError;
use crate::events::{ServerMessage, SessionEvent};
use crate::playback::OutputClock;
use crate::transcript::TranscriptLine;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Opens live channels.
#[async_trait]
pub trait LiveConnector: Send + Sync {
    async fn connect(&self, config: &LiveConfig) -> Result<Box<dyn LiveChannel>, LiveError>;
}

/// A connected duplex channel: audio up, events down.
#[async_trait]
pub trait LiveChannel: Send {
    /// Send a capture chunk upstream.
    async fn send_audio(&mut self, chunk: &AudioChunk) -> Result<(), LiveError>;

    /// Wait for the next event. After a terminal event this must keep
    /// returning [`SessionEvent::Closed`].
    async fn next_event(&mut self) -> SessionEvent;

    /// Close the channel. Safe to call more than once.
    async fn close(&mut self);
}

/// A source of captured microphone frames.
#[async_trait]
pub trait MicSource: Send + 'static {
    /// Request capture access. Failing here leaves the session idle.
    async fn acquire(&mut self) -> Result<(), LiveError>;

    /// The next float frame, or `None` when capture ends.
    async fn next_frame(&mut self) -> Option<Vec<f32>>;
}

/// Applies playback commands.
pub trait AudioOutput: Send {
    fn apply(&mut self, command: AudioCommand);
}

/// Requests a running session to stop. Cheap to clone.
#[derive(Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Create a stop handle and the receiver the session watches.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    /// Request the session to stop. Idempotent.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Drives one live session from connect to teardown.
pub struct LiveSession;

impl LiveSession {
    /// Run a session until stopped or torn down by the channel.
    ///
    /// The microphone is acquired before any connection is attempted, so a
    /// permission denial costs nothing and leaves no session behind. The
    /// capture pump starts only once the channel reports it is open.
    #[tracing::instrument(skip_all, fields(model = %config.model))]
    pub async fn run<C, F>(
        connector: &dyn LiveConnector,
        mut mic: Box<dyn MicSource>,
        output: &mut dyn AudioOutput,
        config: LiveConfig,
        clock: C,
        mut stop: watch::Receiver<bool>,
        mut on_transcript: F,
    ) -> Result<(), LiveError>
    where
        C: OutputClock,
        F: FnMut(&[TranscriptLine]) + Send,
    {
        mic.acquire().await?;

        let mut assistant = LiveAssistant::new(clock);
        assistant.begin_connect();
        let mut channel = match connector.connect(&config).await {
            Ok(channel) => channel,
            Err(e) => {
                assistant.abort_connect();
                return Err(e);
            }
        };
        tracing::info!("live channel connected");

        let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<AudioChunk>();
        // Moved into the pump at spawn so recv() sees the queue close when
        // capture ends.
        let mut frame_tx = Some(frame_tx);
        let mut mic_slot = Some(mic);
        let mut pump: Option<JoinHandle<()>> = None;

        enum Step {
            Stop,
            Event(SessionEvent),
            Frame(Option<AudioChunk>),
        }

        loop {
            // The select resolves to a step first so the channel borrow is
            // released before the step is acted on.
            let step = tokio::select! {
                biased;
                _ = stop.changed() => Step::Stop,
                event = channel.next_event() => Step::Event(event),
                chunk = frame_rx.recv(), if pump.is_some() => Step::Frame(chunk),
            };

            match step {
                Step::Stop => {
                    tracing::debug!("stop requested");
                    for command in assistant.shutdown() {
                        output.apply(command);
                    }
                    channel.close().await;
                    break;
                }
                Step::Event(event) => {
                    let terminal = event.is_terminal();
                    let transcript_changed = matches!(
                        &event,
                        SessionEvent::Message(
                            ServerMessage::OutputTranscript(_) | ServerMessage::InputTranscript(_)
                        )
                    );
                    if matches!(event, SessionEvent::Opened) && pump.is_none() {
                        if let (Some(mic), Some(tx)) = (mic_slot.take(), frame_tx.take()) {
                            pump = Some(spawn_capture_pump(mic, tx));
                        }
                    }
                    for command in assistant.handle_event(event) {
                        output.apply(command);
                    }
                    if transcript_changed {
                        on_transcript(assistant.transcript().lines());
                    }
                    if terminal {
                        channel.close().await;
                        break;
                    }
                }
                Step::Frame(Some(chunk)) => {
                    if let Err(e) = channel.send_audio(&chunk).await {
                        tracing::warn!(error = %e, "failed to send capture chunk");
                        for command in assistant.shutdown() {
                            output.apply(command);
                        }
                        channel.close().await;
                        break;
                    }
                }
                // Capture ended on its own; stop polling the queue.
                Step::Frame(None) => pump = None,
            }
        }

        if let Some(pump) = pump {
            pump.abort();
        }
        Ok(())
    }
}

fn spawn_capture_pump(
    mut mic: Box<dyn MicSource>,
    tx: mpsc::UnboundedSender<AudioChunk>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = mic.next_frame().await {
            let chunk = AudioChunk::from_f32_frame(&frame, AudioFormat::pcm16_16khz());
            if tx.send(chunk).is_err() {
                break;
            }
        }
        tracing::debug!("capture pump finished");
    })
}
