//! The seven element themes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Electricity,
    Fire,
    Water,
    Nature,
    Wind,
    Ice,
    Shadow,
}

impl ThemeId {
    /// Switcher order. Keyboard navigation wraps around this list.
    pub const ALL: [ThemeId; 7] = [
        ThemeId::Electricity,
        ThemeId::Fire,
        ThemeId::Water,
        ThemeId::Nature,
        ThemeId::Wind,
        ThemeId::Ice,
        ThemeId::Shadow,
    ];

    pub const DEFAULT: ThemeId = ThemeId::Electricity;

    pub fn key(self) -> &'static str {
        match self {
            ThemeId::Electricity => "electricity",
            ThemeId::Fire => "fire",
            ThemeId::Water => "water",
            ThemeId::Nature => "nature",
            ThemeId::Wind => "wind",
            ThemeId::Ice => "ice",
            ThemeId::Shadow => "shadow",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> ThemeId {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> ThemeId {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }

    pub fn theme(self) -> &'static Theme {
        &THEMES[self.index()]
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ThemeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.key() == s)
            .ok_or_else(|| Error::UnknownTheme(s.to_owned()))
    }
}

/// Three-tone palette as CSS hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub main: &'static str,
    pub second: &'static str,
    pub third: &'static str,
}

impl Palette {
    /// Display variable names paired with their values.
    pub fn vars(&self) -> [(&'static str, &'static str); 3] {
        [
            ("--color-primary", self.main),
            ("--color-secondary", self.second),
            ("--color-tertiary", self.third),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    pub kanji: &'static str,
    pub picture: &'static str,
    pub background: &'static str,
    pub colors: Palette,
    pub title: &'static str,
    pub text: &'static str,
}

/// Parses `#rrggbb` into `[0, 1]` RGB channels.
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(digits.get(i..i + 2)?, 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub static THEMES: [Theme; 7] = [
    Theme {
        id: ThemeId::Electricity,
        name: "Thunder",
        kanji: "雷",
        picture: "img/elements/lightning.svg",
        background: "img/background/lightning_lion.png",
        colors: Palette {
            main: "#4FC3F7",
            second: "#8FAFC4",
            third: "#2E4A5C",
        },
        title: "雷の獅子 (Kaminari no Shishi) – Guardian of Storms",
        text: "The Thunder Lion embodies raw power and unmatched speed. With its crackling electric mane and glowing blue eyes, it represents the untamed force of storms. A celestial predator born from lightning, it symbolizes strength, energy, and fearless momentum.",
    },
    Theme {
        id: ThemeId::Fire,
        name: "Fire",
        kanji: "火",
        picture: "img/elements/fire.svg",
        background: "img/background/fire_lion.png",
        colors: Palette {
            main: "#E53935",
            second: "#F28B82",
            third: "#6A1B1A",
        },
        title: "炎の獅子 (Honō no Shishi) – Avatar of Flames",
        text: "The Fire Lion embodies fury, rebirth, and relentless intensity. Its burning gaze and blazing mane radiate destructive power and renewal. Born from eternal flames, it symbolizes passion, dominance, and the unstoppable will to rise from ashes.",
    },
    Theme {
        id: ThemeId::Water,
        name: "Water",
        kanji: "水",
        picture: "img/elements/water.svg",
        background: "img/background/water_lion.png",
        colors: Palette {
            main: "#29B6F6",
            second: "#81D4FA",
            third: "#1C3D5A",
        },
        title: "水の獅子 (Mizu no Shishi) – Sovereign of Tides",
        text: "The Water Lion flows with calm authority and hidden ferocity. Its luminous eyes mirror the depths of the ocean, concealing immense power. It symbolizes wisdom, adaptability, and overwhelming strength restrained beneath a tranquil surface.",
    },
    Theme {
        id: ThemeId::Nature,
        name: "Nature",
        kanji: "自然",
        picture: "img/elements/nature.svg",
        background: "img/background/earth_lion.png",
        colors: Palette {
            main: "#6FB98F",
            second: "#A8D5BA",
            third: "#3B5D4A",
        },
        title: "大地の獅子 (Daichi no Shishi) – Heart of the Wild",
        text: "The Nature Lion stands as the living bond between earth and life. Formed from stone, roots, and soil, its ancient gaze holds timeless wisdom. It represents balance, resilience, harmony, and the primal force of endless growth shaping the natural world.",
    },
    Theme {
        id: ThemeId::Wind,
        name: "Wind",
        kanji: "風",
        picture: "img/elements/wind.svg",
        background: "img/background/wind_lion.png",
        colors: Palette {
            main: "#A5E1DA",
            second: "#D6F3EE",
            third: "#4F7F7A",
        },
        title: "風の獅子 (Kaze no Shishi) – Spirit of Freedom",
        text: "The Wind Lion moves unseen across the skies, swift and untouchable. Its sharp eyes follow endless horizons, striking with flawless precision. It embodies freedom, speed, agility, and the invisible force that shapes motion, change, and destiny.",
    },
    Theme {
        id: ThemeId::Ice,
        name: "Ice",
        kanji: "氷",
        picture: "img/elements/ice.svg",
        background: "img/background/ice_lion.png",
        colors: Palette {
            main: "#9ADCF7",
            second: "#D8F1FB",
            third: "#355F7C",
        },
        title: "氷の獅子 (Kōri no Shishi) – Eternal Frost",
        text: "The Ice Lion rules with silent, unyielding authority. Its frozen gaze seems to halt time itself, radiating absolute calm and clarity. Born of eternal cold, it symbolizes discipline, endurance, patience, and perfect control beyond emotion.",
    },
    Theme {
        id: ThemeId::Shadow,
        name: "Shadow",
        kanji: "影",
        picture: "img/elements/shadow.svg",
        background: "img/background/shadow_lion.png",
        colors: Palette {
            main: "#9C8FDB",
            second: "#C6BFEF",
            third: "#3A355C",
        },
        title: "影の獅子 (Kage no Shishi) – Warden of the Void",
        text: "The Shadow Lion dwells between light and nothingness. Its glowing eyes pierce absolute darkness, commanding unseen and forbidden forces. It represents mystery, inner dominance, silent power, and mastery over fear, secrets, and the unknown.",
    },
];

/// Translations of "lion" cycled in the left corner.
pub const LION_TRANSLATIONS: [&str; 25] = [
    "lion",
    "león",
    "leão",
    "leone",
    "löwe",
    "leo",
    "λέων",
    "shīzi",
    "shishi",
    "raion",
    "saja",
    "simha",
    "사자",
    "panthera leo",
    "king of beasts",
    "solar beast",
    "guardian lion",
    "celestial lion",
    "primal sovereign",
    "crown of nature",
    "avatar of dominance",
    "eternal guardian",
    "embodiment of power",
    "beast of balance",
    "sentinel of the elements",
];

/// Glyphs cycled on the loading screen.
pub const LOADING_GLYPHS: [&str; 4] = ["獅子", "사자", "λέων", "♌\u{FE0E}"];
