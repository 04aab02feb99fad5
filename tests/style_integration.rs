// SPDX-License-Identifier: MPL-2.0
//! Integration tests to validate style and design token coherence.

#[cfg(test)]
mod tests {
    use clipshelf::ui::design_tokens::{opacity, palette, sizing, spacing};
    use clipshelf::ui::styles::{button, container};
    use clipshelf::ui::theming::ThemeMode;
    use iced::Theme;

    #[test]
    fn all_button_styles_compile() {
        let theme = Theme::Dark;

        // Smoke-test all button styles compile and are callable
        let _ = button::primary(&theme, iced::widget::button::Status::Active);
        let _ = button::danger(&theme, iced::widget::button::Status::Hovered);
        let _ = button::secondary(&theme, iced::widget::button::Status::Disabled);
    }

    #[test]
    fn all_container_styles_compile() {
        let theme = Theme::Light;

        let _ = container::card(&theme);
        let _ = container::media(&theme);
        let _ = container::backdrop(&theme);
        let _ = container::dialog(&theme);
    }

    #[test]
    fn design_tokens_are_accessible() {
        // Palette
        let _ = palette::PRIMARY_500;
        let _ = palette::WHITE;

        // Spacing
        let _ = spacing::MD;

        // Opacity
        let _ = opacity::OVERLAY_STRONG;

        // Sizing
        let _ = sizing::CARD_WIDTH;
    }

    #[test]
    fn theme_modes_map_to_iced_themes() {
        assert!(matches!(ThemeMode::Light.theme(), Theme::Light));
        assert!(matches!(ThemeMode::Dark.theme(), Theme::Dark));
    }
}
