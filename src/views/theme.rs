use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors used by the front-end for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Rgb,
    pub user: Rgb,
    pub assistant: Rgb,
    pub muted: Rgb,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                accent: Rgb(139, 92, 246),
                user: Rgb(96, 165, 250),
                assistant: Rgb(229, 231, 235),
                muted: Rgb(156, 163, 175),
            },
            Theme::Light => Palette {
                accent: Rgb(109, 40, 217),
                user: Rgb(29, 78, 216),
                assistant: Rgb(31, 41, 55),
                muted: Rgb(107, 114, 128),
            },
        }
    }
}
