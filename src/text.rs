//! UI strings
//!
//! Korean is the preferred text set. Terminals whose locale cannot show
//! Hangul get the English set instead; the choice is made once at startup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextChoice {
    /// Korean if the locale looks UTF-8 capable, English otherwise.
    #[default]
    Auto,
    Korean,
    English,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TextSet {
    pub title: &'static str,
    pub score_label: &'static str,
    pub lives_label: &'static str,
    pub game_over: &'static str,
    pub final_score_label: &'static str,
    pub best_score_label: &'static str,
    pub start_label: &'static str,
    pub restart_label: &'static str,
    pub controls_hint: &'static str,
}

pub static KOREAN: TextSet = TextSet {
    title: "똥피하기 게임",
    score_label: "점수",
    lives_label: "HP",
    game_over: "게임 오버!",
    final_score_label: "최종 점수",
    best_score_label: "최고 점수",
    start_label: "시작",
    restart_label: "다시 시작",
    controls_hint: "← → : 이동   SPACE : 시작   ESC : 종료",
};

pub static ENGLISH: TextSet = TextSet {
    title: "Poop Dodge Game",
    score_label: "Score",
    lives_label: "HP",
    game_over: "Game Over!",
    final_score_label: "Final Score",
    best_score_label: "Best",
    start_label: "START",
    restart_label: "RESTART",
    controls_hint: "<- -> / A D : Move   SPACE : Start   ESC : Quit",
};

impl TextSet {
    pub fn score(&self, score: u32) -> String {
        format!("{}: {}", self.score_label, score)
    }

    pub fn lives(&self, lives: u32) -> String {
        format!("{}: {}", self.lives_label, lives)
    }

    pub fn final_score(&self, score: u32) -> String {
        format!("{}: {}", self.final_score_label, score)
    }

    pub fn best_score(&self, score: u32) -> String {
        format!("{}: {}", self.best_score_label, score)
    }
}

/// Whether the terminal locale can display Hangul, judged from the usual
/// locale variables in precedence order.
pub fn locale_supports_unicode<F>(var: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|name| var(name).filter(|v| !v.is_empty()))
        .next()
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("utf-8") || value.contains("utf8")
        })
        .unwrap_or(false)
}

/// Resolve the configured choice against what the terminal supports.
pub fn select(choice: TextChoice, unicode_ok: bool) -> &'static TextSet {
    match choice {
        TextChoice::English => &ENGLISH,
        TextChoice::Korean => &KOREAN,
        TextChoice::Auto if unicode_ok => &KOREAN,
        TextChoice::Auto => {
            log::warn!("Locale is not UTF-8; using English text instead of Korean");
            &ENGLISH
        }
    }
}

/// Terminal column width of `s`. Hangul and other wide CJK characters
/// take two columns.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F      // Hangul Jamo
        | 0x2E80..=0x303E    // CJK radicals, punctuation
        | 0x3041..=0x33FF    // Kana, compatibility Jamo
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3    // Hangul syllables
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}
