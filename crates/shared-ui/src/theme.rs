use dioxus::prelude::*;

/// Colour scheme. The string keys match the `theme` value stored in a
/// user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

pub const ALL_THEMES: &[Theme] = &[Theme::Light, Theme::Dark];

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Parse a stored key, falling back to light.
    pub fn from_key(s: &str) -> Self {
        match s {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Current theme, provided as context so the header toggle and the settings
/// page stay in sync.
#[derive(Clone, Copy)]
pub struct ThemeState {
    pub theme: Signal<Theme>,
}

impl ThemeState {
    pub fn current(&self) -> Theme {
        *self.theme.read()
    }

    /// Switch to `theme` and apply it to the document.
    pub fn set(&mut self, theme: Theme) {
        self.theme.set(theme);
        set_theme(theme.as_str());
    }

    pub fn toggle(&mut self) {
        let next = self.current().toggled();
        self.set(next);
    }
}

/// Apply the theme from the `theme` cookie on startup. Render once near
/// the root of the app.
#[component]
pub fn ThemeSeed() -> Element {
    use_effect(|| {
        document::eval(
            r#"
            (function() {
                var match = document.cookie.match(/(?:^|;\s*)theme=([^;]*)/);
                var theme = match ? match[1] : 'light';
                document.documentElement.setAttribute('data-theme', theme);
            })();
            "#,
        );
    });

    rsx! {}
}

/// Persist the theme in a cookie and set `data-theme` on `<html>`.
pub fn set_theme(theme: &str) {
    let theme = Theme::from_key(theme).as_str();
    document::eval(&format!(
        r#"
        (function() {{
            document.cookie = 'theme={theme};path=/;max-age=31536000;SameSite=Lax';
            document.documentElement.setAttribute('data-theme', '{theme}');
        }})();
        "#,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn keys_round_trip() {
        for theme in ALL_THEMES {
            assert_eq!(Theme::from_key(theme.as_str()), *theme);
        }
    }

    #[test]
    fn unknown_key_falls_back_to_light() {
        assert_eq!(Theme::from_key("cyberpunk"), Theme::Light);
        assert_eq!(Theme::from_key(""), Theme::Light);
    }

    #[test]
    fn toggle_flips_between_modes() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Light.is_dark());
    }
}
