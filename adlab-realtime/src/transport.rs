//! WebSocket transport for the Gemini Live API.
//!
//! Speaks the `BidiGenerateContent` protocol: a JSON setup message on
//! connect, base64 PCM chunks upstream, tagged JSON content frames
//! downstream. One inbound frame can carry several logical messages
//! (an interruption and a model turn, say), so the channel keeps a queue
//! and hands them out one [`SessionEvent`] at a time.

use crate::audio::AudioChunk;
use crate::config::LiveConfig;
use crate::error::LiveError;
use crate::events::{ServerMessage, SessionEvent};
use crate::session::{LiveChannel, LiveConnector};
use adlab_gemini::Credential;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;
use uuid::Uuid;

/// MIME type of upstream capture chunks.
pub const LIVE_AUDIO_MIME: &str = "audio/pcm;rate=16000";

const LIVE_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

// Outbound wire shapes.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupFrame<'a> {
    setup: Setup<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Setup<'a> {
    model: &'a str,
    generation_config: SetupGenerationConfig<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<TextContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_audio_transcription: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_audio_transcription: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupGenerationConfig<'a> {
    response_modalities: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Serialize)]
struct TextContent<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeInputFrame<'a> {
    realtime_input: RealtimeInput<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeInput<'a> {
    media_chunks: [MediaChunk<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MediaChunk<'a> {
    mime_type: &'a str,
    data: String,
}

// Inbound wire shapes.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerFrame {
    setup_complete: Option<serde_json::Value>,
    server_content: Option<ServerContent>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ServerContent {
    model_turn: Option<ModelTurn>,
    output_transcription: Option<Transcription>,
    input_transcription: Option<Transcription>,
    #[serde(default)]
    interrupted: bool,
    #[serde(default)]
    turn_complete: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelTurn {
    #[serde(default)]
    parts: Vec<ServerPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerPart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
}

#[derive(Deserialize)]
struct Transcription {
    text: Option<String>,
}

/// Opens [`GeminiLiveChannel`]s against the public live endpoint.
pub struct GeminiLiveConnector {
    credential: Credential,
    endpoint: String,
}

impl GeminiLiveConnector {
    pub fn new(credential: Credential) -> Self {
        Self { credential, endpoint: LIVE_ENDPOINT.to_string() }
    }

    /// Point the connector at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl LiveConnector for GeminiLiveConnector {
    async fn connect(&self, config: &LiveConfig) -> Result<Box<dyn LiveChannel>, LiveError> {
        let url =
            Url::parse_with_params(&self.endpoint, [("key", self.credential.expose())])
                .map_err(|e| LiveError::connection(format!("invalid live endpoint: {e}")))?;

        let (ws, _) = connect_async(url.as_str())
            .await
            .map_err(|e| LiveError::connection(format!("websocket handshake failed: {e}")))?;

        let mut channel = GeminiLiveChannel::new(ws);
        channel.send_setup(config).await?;
        Ok(Box::new(channel))
    }
}

/// One live WebSocket connection.
pub struct GeminiLiveChannel {
    id: Uuid,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<SessionEvent>,
    closed: bool,
}

impl GeminiLiveChannel {
    fn new(ws: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self { id: Uuid::new_v4(), ws, pending: VecDeque::new(), closed: false }
    }

    async fn send_setup(&mut self, config: &LiveConfig) -> Result<(), LiveError> {
        let frame = SetupFrame {
            setup: Setup {
                model: &config.model,
                generation_config: SetupGenerationConfig {
                    response_modalities: &config.modalities,
                    speech_config: config.voice.as_deref().map(|voice_name| SpeechConfig {
                        voice_config: VoiceConfig {
                            prebuilt_voice_config: PrebuiltVoiceConfig { voice_name },
                        },
                    }),
                },
                system_instruction: config
                    .instruction
                    .as_deref()
                    .map(|text| TextContent { parts: [TextPart { text }] }),
                output_audio_transcription: config
                    .output_transcription
                    .then(|| serde_json::json!({})),
                input_audio_transcription: config
                    .input_transcription
                    .then(|| serde_json::json!({})),
            },
        };
        self.send_json(&frame).await
    }

    async fn send_json<T: Serialize>(&mut self, frame: &T) -> Result<(), LiveError> {
        let text = serde_json::to_string(frame)?;
        self.ws
            .send(Message::Text(text))
            .await
            .map_err(|e| LiveError::connection(format!("websocket send failed: {e}")))
    }

    fn enqueue_frame(&mut self, raw: &str) {
        let frame: ServerFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "unparseable live frame");
                self.pending
                    .push_back(SessionEvent::Error(format!("unparseable server frame: {e}")));
                return;
            }
        };

        if frame.setup_complete.is_some() {
            self.pending.push_back(SessionEvent::Opened);
        }
        let Some(content) = frame.server_content else { return };

        if content.interrupted {
            self.pending.push_back(SessionEvent::Message(ServerMessage::Interrupted));
        }
        if let Some(text) = content.input_transcription.and_then(|t| t.text) {
            self.pending.push_back(SessionEvent::Message(ServerMessage::InputTranscript(text)));
        }
        if let Some(text) = content.output_transcription.and_then(|t| t.text) {
            self.pending.push_back(SessionEvent::Message(ServerMessage::OutputTranscript(text)));
        }
        if let Some(turn) = content.model_turn {
            for part in turn.parts {
                let Some(inline) = part.inline_data else { continue };
                match AudioChunk::from_base64(&inline.data, crate::AudioFormat::pcm16_24khz()) {
                    Ok(chunk) => self.pending.push_back(SessionEvent::Message(
                        ServerMessage::Audio(Bytes::from(chunk.data)),
                    )),
                    Err(e) => {
                        tracing::warn!(session = %self.id, error = %e, "bad audio payload")
                    }
                }
            }
        }
        if content.turn_complete {
            self.pending.push_back(SessionEvent::Message(ServerMessage::TurnComplete));
        }
    }
}

#[async_trait]
impl LiveChannel for GeminiLiveChannel {
    async fn send_audio(&mut self, chunk: &AudioChunk) -> Result<(), LiveError> {
        if self.closed {
            return Err(LiveError::Closed);
        }
        let frame = RealtimeInputFrame {
            realtime_input: RealtimeInput {
                media_chunks: [MediaChunk { mime_type: LIVE_AUDIO_MIME, data: chunk.to_base64() }],
            },
        };
        self.send_json(&frame).await
    }

    async fn next_event(&mut self) -> SessionEvent {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            if self.closed {
                return SessionEvent::Closed;
            }
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => self.enqueue_frame(&text),
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => self.enqueue_frame(text),
                    Err(_) => {
                        tracing::warn!(session = %self.id, "non-utf8 binary frame dropped")
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    self.closed = true;
                    return SessionEvent::Closed;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.closed = true;
                    return SessionEvent::Error(format!("websocket receive failed: {e}"));
                }
            }
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.ws.close(None).await {
                tracing::debug!(session = %self.id, error = %e, "error closing live channel");
            }
        }
    }
}
