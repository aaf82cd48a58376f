use serde::Serialize;

use super::event::Category;

pub const DIARY_COLOR: &str = "#28a745";
pub const SCHEDULE_COLOR: &str = "#3174ad";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventStyle {
    pub background: &'static str,
    pub color: &'static str,
    pub opacity: f32,
    pub border_radius_px: u8,
}

impl EventStyle {
    /// Inline `style` attribute value.
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; color: {}; opacity: {}; border-radius: {}px; border: 0; display: block",
            self.background, self.color, self.opacity, self.border_radius_px
        )
    }
}

pub const fn style_for(category: Category) -> EventStyle {
    let background = match category {
        Category::Diary => DIARY_COLOR,
        Category::Schedule => SCHEDULE_COLOR,
    };

    EventStyle {
        background,
        color: "white",
        opacity: 0.8,
        border_radius_px: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_get_their_own_color() {
        assert_eq!(style_for(Category::Diary).background, DIARY_COLOR);
        assert_eq!(style_for(Category::Schedule).background, SCHEDULE_COLOR);
        assert_ne!(DIARY_COLOR, SCHEDULE_COLOR);
    }

    #[test]
    fn css_is_inline_ready() {
        let css = style_for(Category::Diary).css();
        assert_eq!(
            css,
            "background-color: #28a745; color: white; opacity: 0.8; border-radius: 5px; border: 0; display: block"
        );
    }
}
