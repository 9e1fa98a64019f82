//! Rendering directives: the engine's only output.
//!
//! A directive says *what* the border should look like; the render sink
//! decides how to paint it.

/// How the border should be drawn right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderDirective {
    /// Stroke width in points, `>= 0`.
    pub width: f32,
    /// Current flash phase (always `true` outside Critical).
    pub visible: bool,
    /// Whether the full-screen warning text is requested.
    pub show_warning_text: bool,
}

impl RenderDirective {
    /// Nothing on screen.
    pub const HIDDEN: Self = Self {
        width: 0.0,
        visible: false,
        show_warning_text: false,
    };

    /// The warning text is only drawn while the border itself is drawn.
    pub fn warning_label_visible(&self) -> bool {
        self.show_warning_text && self.visible
    }

    /// Window stacking level for the overlay.
    pub fn overlay_level(&self) -> OverlayLevel {
        if self.show_warning_text {
            OverlayLevel::ScreenSaver
        } else {
            OverlayLevel::Floating
        }
    }
}

/// Stacking level of the overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLevel {
    /// Above normal windows, below system UI.
    Floating,
    /// Above everything, used while the warning text is up.
    ScreenSaver,
}

/// What the sink must do with the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Bring the overlay to front and paint this directive.
    Show(RenderDirective),
    /// Take the overlay off screen entirely.
    Hide,
}

impl RenderCommand {
    /// The directive carried by this command; [`RenderDirective::HIDDEN`]
    /// for [`RenderCommand::Hide`].
    pub fn directive(&self) -> RenderDirective {
        match self {
            Self::Show(d) => *d,
            Self::Hide => RenderDirective::HIDDEN,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hide)
    }
}
