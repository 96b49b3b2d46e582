//! Speech output for the simulator
//!
//! `SpeechService` consumes the events sent by the engine's `ChannelSink`,
//! prints each utterance with its simulated time and optionally hands the
//! text to an external TTS program running in a background task.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use guidance_core::{CueError, CuePlayer, SpeechEvent};

use crate::wording;

/// Default TTS program on Linux
pub const DEFAULT_TTS_PROGRAM: &str = "espeak";

/// Prints utterances and forwards them to the voice task
pub struct SpeechService {
    event_rx: mpsc::Receiver<SpeechEvent>,
    voice: Option<mpsc::UnboundedSender<VoiceCommand>>,
    start: NaiveDateTime,
    /// Rendered lines, kept for the repl's `history` command
    history: Vec<String>,
}

impl SpeechService {
    pub fn new(event_rx: mpsc::Receiver<SpeechEvent>, start: NaiveDateTime) -> Self {
        Self {
            event_rx,
            voice: None,
            start,
            history: Vec::new(),
        }
    }

    /// Speak through `program` in addition to printing. Returns the voice
    /// task, which ends once the service is dropped and the queue is spoken.
    pub fn with_voice(&mut self, program: &str) -> JoinHandle<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.voice = Some(tx);
        tokio::spawn(Voice::new(rx, program).run())
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Handle everything the engine has sent so far
    pub fn drain(&mut self, now: NaiveDateTime) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle(event, now);
        }
    }

    fn handle(&mut self, event: SpeechEvent, now: NaiveDateTime) {
        match event {
            SpeechEvent::Speak(utterance) => {
                let text = wording::render(&utterance);
                let elapsed = (now - self.start).num_seconds();
                let line = format!("[{elapsed:>5}s] {text}");
                println!("{line}");
                tracing::debug!(%utterance, "Utterance");
                self.history.push(line);
                self.send(VoiceCommand::Say(text));
            }
            SpeechEvent::Stop => self.send(VoiceCommand::Stop),
            SpeechEvent::Clear => self.send(VoiceCommand::Clear),
        }
    }

    fn send(&self, command: VoiceCommand) {
        if let Some(voice) = &self.voice
            && voice.send(command).is_err()
        {
            tracing::warn!("Voice task stopped");
        }
    }
}

#[derive(Debug)]
enum VoiceCommand {
    Say(String),
    Stop,
    Clear,
}

/// Runs the TTS program one utterance at a time
struct Voice {
    rx: mpsc::UnboundedReceiver<VoiceCommand>,
    program: String,
    queue: VecDeque<String>,
}

impl Voice {
    fn new(rx: mpsc::UnboundedReceiver<VoiceCommand>, program: &str) -> Self {
        Self {
            rx,
            program: program.to_string(),
            queue: VecDeque::new(),
        }
    }

    async fn run(mut self) {
        loop {
            let text = match self.queue.pop_front() {
                Some(text) => text,
                None => match self.rx.recv().await {
                    Some(VoiceCommand::Say(text)) => text,
                    Some(VoiceCommand::Stop | VoiceCommand::Clear) => continue,
                    None => return,
                },
            };
            if !self.speak(&text).await {
                return;
            }
        }
    }

    /// Speak one line. Returns false once the command channel is closed and
    /// nothing is left to say.
    async fn speak(&mut self, text: &str) -> bool {
        let mut child = match Command::new(&self.program)
            .arg(text)
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Failed to start TTS program");
                return true;
            }
        };

        let mut open = true;
        loop {
            tokio::select! {
                status = child.wait() => {
                    if let Err(e) = status {
                        tracing::warn!(error = %e, "TTS program failed");
                    }
                    break;
                }
                command = self.rx.recv(), if open => match command {
                    Some(VoiceCommand::Say(next)) => self.queue.push_back(next),
                    Some(VoiceCommand::Stop) => {
                        let _ = child.kill().await;
                        break;
                    }
                    Some(VoiceCommand::Clear) => {
                        let _ = child.kill().await;
                        self.queue.clear();
                        break;
                    }
                    None => open = false,
                },
            }
        }
        open || !self.queue.is_empty()
    }
}

/// Cue sound played by an external audio player
pub struct CommandCue {
    program: String,
    path: PathBuf,
}

impl CommandCue {
    pub fn new(program: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            path: path.into(),
        }
    }
}

impl CuePlayer for CommandCue {
    fn play_cue(&self) -> Result<(), CueError> {
        if !self.path.exists() {
            return Err(CueError::Missing {
                path: self.path.clone(),
            });
        }
        std::process::Command::new(&self.program)
            .arg(&self.path)
            .spawn()
            .map(drop)
            .map_err(CueError::Playback)
    }
}
