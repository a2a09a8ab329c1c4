//! Background gradients chosen from the current weather and the theme mode.

use ratatui::style::palette::tailwind;
use ratatui::style::Color;

use crate::weather::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Default,
}

impl Category {
    pub fn from_icon(icon: Option<&str>) -> Self {
        match icon.map(Condition::from_icon) {
            Some(Condition::Clear) => Category::Clear,
            Some(Condition::PartlyCloudy) | Some(Condition::Overcast) => Category::Clouds,
            Some(Condition::Rain) => Category::Rain,
            Some(Condition::Thunderstorm) => Category::Thunderstorm,
            Some(Condition::Snow) => Category::Snow,
            Some(Condition::Mist) | Some(Condition::Unknown) | None => Category::Default,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Category::Clear => "clear",
            Category::Clouds => "clouds",
            Category::Rain => "rain",
            Category::Thunderstorm => "thunderstorm",
            Category::Snow => "snow",
            Category::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientId {
    pub category: Category,
    pub dark: bool,
}

impl GradientId {
    /// Symbolic name, e.g. `rain-dark` or `default-light`.
    pub fn name(&self) -> String {
        let mode = if self.dark { "dark" } else { "light" };
        format!("{}-{mode}", self.category.name())
    }

    /// From, via and to stops of the gradient.
    pub fn stops(&self) -> [Color; 3] {
        use tailwind::*;
        match (self.category, self.dark) {
            (Category::Clear, true) => [INDIGO.c900, PURPLE.c900, BLUE.c900],
            (Category::Clear, false) => [BLUE.c100, BLUE.c50, Color::White],
            (Category::Clouds, true) => [SLATE.c900, GRAY.c800, ZINC.c800],
            (Category::Clouds, false) => [GRAY.c100, GRAY.c50, Color::White],
            (Category::Rain, true) => [BLUE.c900, INDIGO.c900, SLATE.c900],
            (Category::Rain, false) => [BLUE.c100, BLUE.c50, GRAY.c100],
            (Category::Snow, true) => [SLATE.c800, GRAY.c900, ZINC.c900],
            (Category::Snow, false) => [BLUE.c50, GRAY.c50, Color::White],
            (Category::Thunderstorm, true) => [PURPLE.c900, INDIGO.c900, SLATE.c900],
            (Category::Thunderstorm, false) => [PURPLE.c100, BLUE.c50, GRAY.c100],
            (Category::Default, true) => [SLATE.c900, GRAY.c900, ZINC.c900],
            (Category::Default, false) => [BLUE.c50, INDIGO.c50, Color::White],
        }
    }

    pub fn background(&self) -> Color {
        self.stops()[1]
    }

    pub fn foreground(&self) -> Color {
        if self.dark {
            Color::White
        } else {
            tailwind::GRAY.c800
        }
    }

    pub fn muted(&self) -> Color {
        if self.dark {
            tailwind::GRAY.c300
        } else {
            tailwind::GRAY.c600
        }
    }

    pub fn accent(&self) -> Color {
        if self.dark {
            self.stops()[0]
        } else {
            tailwind::BLUE.c500
        }
    }
}

pub fn select_background(icon: Option<&str>, dark: bool) -> GradientId {
    GradientId {
        category: Category::from_icon(icon),
        dark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_background_categories() {
        let cases = [
            ("01d", Category::Clear),
            ("02d", Category::Clouds),
            ("03n", Category::Clouds),
            ("04d", Category::Clouds),
            ("09d", Category::Rain),
            ("10n", Category::Rain),
            ("11d", Category::Thunderstorm),
            ("13d", Category::Snow),
            ("50d", Category::Default),
            ("", Category::Default),
            ("zz", Category::Default),
        ];
        for (icon, category) in cases {
            assert_eq!(select_background(Some(icon), false).category, category, "{icon}");
        }
    }

    #[test]
    fn test_absent_icon_is_default_light() {
        let gradient = select_background(None, false);
        assert_eq!(gradient.name(), "default-light");
        assert_eq!(gradient.background(), tailwind::INDIGO.c50);
    }

    #[test]
    fn test_deterministic_and_mode_sensitive() {
        for icon in [None, Some("01d"), Some("10n"), Some("13d")] {
            assert_eq!(select_background(icon, true), select_background(icon, true));
            assert_ne!(
                select_background(icon, true).stops(),
                select_background(icon, false).stops()
            );
        }
        assert_eq!(select_background(Some("11d"), true).name(), "thunderstorm-dark");
    }
}
