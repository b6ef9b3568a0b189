//! Sound cues
//!
//! Every handle is optional. A missing sound turns the matching cue into a
//! no-op, reported once in the log when the jukebox is built.

use std::io::Write;

use crate::entities::GameEvent;

/// One-shot sound effects the game asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Collision,
    GameOver,
}

pub trait Sound {
    fn play(&self);
}

pub trait Music {
    fn start(&self);
    fn stop(&self);
}

/// Optional sound handles plus the music on/off state.
pub struct Jukebox {
    collision: Option<Box<dyn Sound>>,
    game_over: Option<Box<dyn Sound>>,
    music: Option<Box<dyn Music>>,
    music_playing: bool,
}

impl Jukebox {
    pub fn new(
        collision: Option<Box<dyn Sound>>,
        game_over: Option<Box<dyn Sound>>,
        music: Option<Box<dyn Music>>,
    ) -> Self {
        if collision.is_none() {
            log::warn!("Collision sound unavailable");
        }
        if game_over.is_none() {
            log::warn!("Game over sound unavailable");
        }
        if music.is_none() {
            log::warn!("Background music unavailable");
        }
        Self {
            collision,
            game_over,
            music,
            music_playing: false,
        }
    }

    /// No handles at all.
    pub fn silent() -> Self {
        Self::new(None, None, None)
    }

    pub fn play(&self, cue: Cue) {
        let handle = match cue {
            Cue::Collision => &self.collision,
            Cue::GameOver => &self.game_over,
        };
        if let Some(sound) = handle {
            sound.play();
        }
    }

    pub fn start_music(&mut self) {
        if let Some(music) = &self.music {
            if self.music_playing {
                music.stop();
            }
            music.start();
        }
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if let Some(music) = &self.music {
            if self.music_playing {
                music.stop();
            }
        }
        self.music_playing = false;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Map a simulation event to its audio side effect.
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started => self.start_music(),
            GameEvent::Collision { .. } => self.play(Cue::Collision),
            GameEvent::GameOver { .. } => {
                self.stop_music();
                self.play(Cue::GameOver);
            }
            GameEvent::Spawned(_) | GameEvent::Dodged => {}
        }
    }
}

/// Rings the terminal bell. The only sound a plain terminal can make.
pub struct TerminalBell;

impl Sound for TerminalBell {
    fn play(&self) {
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::debug!("Bell failed: {}", e);
        }
    }
}

/// Jukebox for the terminal frontend: bell cues, no music.
pub fn terminal_jukebox(sound_enabled: bool) -> Jukebox {
    if !sound_enabled {
        log::info!("Sound disabled");
        return Jukebox::silent();
    }
    Jukebox::new(Some(Box::new(TerminalBell)), Some(Box::new(TerminalBell)), None)
}
