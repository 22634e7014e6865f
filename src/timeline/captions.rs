use crate::store::models::Language;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptionEntry {
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// English line.
    pub text_primary: &'static str,
    /// Bangla line.
    pub text_secondary: &'static str,
}

impl CaptionEntry {
    /// Half-open: the end boundary is not part of the caption.
    pub fn contains(&self, t: f64) -> bool {
        self.start_seconds <= t && t < self.end_seconds
    }

    pub fn text(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.text_primary,
            Language::Bn => self.text_secondary,
        }
    }
}

const CAPTIONS: [CaptionEntry; 5] = [
    CaptionEntry {
        start_seconds: 0.0,
        end_seconds: 4.0,
        text_primary: "Welcome to the GN AI Authority broadcast.",
        text_secondary: "জিএন এআই কর্তৃপক্ষের সম্প্রচারে স্বাগতম।",
    },
    CaptionEntry {
        start_seconds: 4.5,
        end_seconds: 8.0,
        text_primary: "Today, we discuss the new food safety reform.",
        text_secondary: "আজ, আমরা নতুন খাদ্য নিরাপত্তা সংস্কার নিয়ে আলোচনা করব।",
    },
    CaptionEntry {
        start_seconds: 8.5,
        end_seconds: 12.0,
        text_primary: "This civic action is crucial for public health.",
        text_secondary: "এই নাগরিক পদক্ষেপ জনস্বাস্থ্যের জন্য অত্যন্ত গুরুত্বপূর্ণ।",
    },
    CaptionEntry {
        start_seconds: 12.5,
        end_seconds: 16.0,
        text_primary: "Our diaspora justice program ensures transparency.",
        text_secondary: "আমাদের ডায়াস্পোরা বিচার কর্মসূচি স্বচ্ছতা নিশ্চিত করে।",
    },
    CaptionEntry {
        start_seconds: 16.5,
        end_seconds: 20.0,
        text_primary: "Engage with us to strengthen the reform.",
        text_secondary: "সংস্কারকে শক্তিশালী করতে আমাদের সাথে যুক্ত হন।",
    },
];

/// Non-overlapping, ordered by start.
pub fn caption_fixture() -> &'static [CaptionEntry] {
    &CAPTIONS
}

pub fn active_caption(entries: &[CaptionEntry], t: f64) -> Option<&CaptionEntry> {
    entries.iter().find(|entry| entry.contains(t))
}

fn srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_ms / 3_600_000,
        total_ms / 60_000 % 60,
        total_ms / 1000 % 60,
        total_ms % 1000
    )
}

/// SubRip text for one language track.
pub fn to_srt(entries: &[CaptionEntry], lang: Language) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            srt_timestamp(entry.start_seconds),
            srt_timestamp(entry.end_seconds),
            entry.text(lang)
        );
    }
    out
}
