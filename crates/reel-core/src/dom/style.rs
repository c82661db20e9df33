/// The `display` property, reduced to what layout needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    /// Laid out normally.
    #[default]
    Block,
    /// Removed from layout together with its subtree.
    None,
}

/// The `visibility` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Painted.
    #[default]
    Visible,
    /// Takes up space but is not painted.
    Hidden,
}

/// A set of declared style values. `None` means "not declared here".
///
/// Every element carries two of these: the sheet style (what a stylesheet
/// rule declares) and the inline style (what scripts set). Inline wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    pub display: Option<Display>,
    pub visibility: Option<Visibility>,
    /// Width in px. `None` is `auto`.
    pub width: Option<f32>,
    /// Height in px. `None` is `auto`.
    pub height: Option<f32>,
    pub margin_right: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub padding_left: Option<f32>,
    pub padding_right: Option<f32>,
    /// Horizontal `translateX` of the element's box, in px.
    pub translate_x: Option<f32>,
}

impl Style {
    /// Values declared in `self`, falling back to `base` for the rest.
    pub fn over(&self, base: &Style) -> Style {
        Style {
            display: self.display.or(base.display),
            visibility: self.visibility.or(base.visibility),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            margin_right: self.margin_right.or(base.margin_right),
            margin_bottom: self.margin_bottom.or(base.margin_bottom),
            padding_left: self.padding_left.or(base.padding_left),
            padding_right: self.padding_right.or(base.padding_right),
            translate_x: self.translate_x.or(base.translate_x),
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_margin_right(mut self, margin: f32) -> Self {
        self.margin_right = Some(margin);
        self
    }

    /// Same padding on both horizontal sides.
    pub fn with_padding_x(mut self, padding: f32) -> Self {
        self.padding_left = Some(padding);
        self.padding_right = Some(padding);
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// A fully resolved style: inline over sheet, then defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    /// Declared width; `None` is `auto`.
    pub width: Option<f32>,
    /// Declared height; `None` is `auto`.
    pub height: Option<f32>,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub padding_left: f32,
    pub padding_right: f32,
    pub translate_x: f32,
}

impl From<Style> for ComputedStyle {
    fn from(style: Style) -> Self {
        ComputedStyle {
            display: style.display.unwrap_or_default(),
            visibility: style.visibility.unwrap_or_default(),
            width: style.width,
            height: style.height,
            margin_right: style.margin_right.unwrap_or(0.0),
            margin_bottom: style.margin_bottom.unwrap_or(0.0),
            padding_left: style.padding_left.unwrap_or(0.0),
            padding_right: style.padding_right.unwrap_or(0.0),
            translate_x: style.translate_x.unwrap_or(0.0),
        }
    }
}

impl ComputedStyle {
    /// `display: none` or `visibility: hidden`.
    pub fn is_hidden(&self) -> bool {
        self.display == Display::None || self.visibility == Visibility::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_overrides_sheet() {
        let sheet = Style::default().with_width(120.0).with_margin_right(8.0);
        let inline = Style::default().with_width(96.5);
        let merged = ComputedStyle::from(inline.over(&sheet));
        assert_eq!(merged.width, Some(96.5));
        assert_eq!(merged.margin_right, 8.0);
        assert_eq!(merged.padding_left, 0.0);
        assert_eq!(merged.display, Display::Block);
    }

    #[test]
    fn hidden_covers_display_and_visibility() {
        let none = ComputedStyle::from(Style::default().with_display(Display::None));
        let invisible = ComputedStyle::from(Style::default().with_visibility(Visibility::Hidden));
        assert!(none.is_hidden());
        assert!(invisible.is_hidden());
        assert!(!ComputedStyle::default().is_hidden());
    }
}
