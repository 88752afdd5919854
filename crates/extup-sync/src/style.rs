use console::{Color, Style};

use extup_core::config::{ColorName, Palette};
use extup_core::models::outcome::StatusKind;

/// Console styles resolved from a [`Palette`].
#[derive(Debug, Clone)]
pub struct Styles {
    pub updated: Style,
    pub up_to_date: Style,
    pub error: Style,
    /// Also used for the banner, report header and progress line.
    pub exception: Style,
    exception_color: ColorName,
}

impl Styles {
    pub fn new(palette: &Palette) -> Self {
        Self {
            updated: style_for(palette.updated),
            up_to_date: style_for(palette.up_to_date),
            error: style_for(palette.error),
            exception: style_for(palette.exception),
            exception_color: palette.exception,
        }
    }

    pub fn for_kind(&self, kind: StatusKind) -> &Style {
        match kind {
            StatusKind::Updated => &self.updated,
            StatusKind::UpToDate => &self.up_to_date,
            StatusKind::Error => &self.error,
            StatusKind::Exception => &self.exception,
        }
    }

    pub fn header(&self) -> &Style {
        &self.exception
    }

    /// Color name for indicatif templates.
    pub fn progress_color(&self) -> ColorName {
        self.exception_color
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new(&Palette::default())
    }
}

fn style_for(name: ColorName) -> Style {
    Style::new().fg(color_for(name))
}

fn color_for(name: ColorName) -> Color {
    match name {
        ColorName::Black => Color::Black,
        ColorName::Red => Color::Red,
        ColorName::Green => Color::Green,
        ColorName::Yellow => Color::Yellow,
        ColorName::Blue => Color::Blue,
        ColorName::Magenta => Color::Magenta,
        ColorName::Cyan => Color::Cyan,
        ColorName::White => Color::White,
    }
}
