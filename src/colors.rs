use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Shared color scheme state
#[derive(Clone, Copy)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme }
    }

    /// Handle color scheme key input. Returns true if key was handled.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: pink
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: gold
            KeyCode::Char('%') => self.scheme = 5,  // Shift+5: electric
            KeyCode::Char('&') => self.scheme = 7,  // Shift+7: mono
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: green
            _ => return false,
        }
        true
    }
}

/// Get color from scheme based on intensity (0-3)
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        1 => match intensity {  // Red/Yellow (fire)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, bold),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {  // Blue/Cyan (ice)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, bold),
            _ => (Color::Cyan, true),
        },
        3 => match intensity {  // Magenta/Pink (pink)
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),
        },
        4 => match intensity {  // Yellow/Gold (gold)
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, bold),
            _ => (Color::AnsiValue(11), true),
        },
        5 => match intensity {  // Cyan/Electric (electric)
            0 => (Color::DarkCyan, false),
            1 => (Color::Cyan, false),
            2 => (Color::Cyan, bold),
            _ => (Color::AnsiValue(14), true),
        },
        7 => match intensity {  // White/Grey (mono)
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, bold),
            _ => (Color::White, true),
        },
        _ => match intensity {  // Default: Green
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),
        },
    }
}

/// Status line color, semantic in mono mode and themed otherwise
pub fn status_to_scheme(scheme: u8, status: StatusColor) -> Color {
    if scheme == 7 {
        match status {
            StatusColor::Good => Color::Green,
            StatusColor::Critical => Color::Red,
            StatusColor::Muted => Color::DarkGrey,
        }
    } else {
        let intensity = match status {
            StatusColor::Muted => 0,
            StatusColor::Good => 2,
            StatusColor::Critical => 3,
        };
        scheme_color(scheme, intensity, false).0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Good,
    Critical,
    Muted,
}

/// HSL (hue in degrees, s and l in 0..=1) to 8-bit RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
    }

    #[test]
    fn hsl_bright_arc_color() {
        // 60% lightness keeps every hue bright
        let (r, g, b) = hsl_to_rgb(200.0, 1.0, 0.6);
        assert!(r.max(g).max(b) == 255);
        assert!(r.min(g).min(b) >= 50);
    }

    #[test]
    fn color_state_keys() {
        let mut state = ColorState::new(0);
        assert!(state.handle_key(KeyCode::Char('@')));
        assert_eq!(state.scheme, 2);
        assert!(!state.handle_key(KeyCode::Char('x')));
        assert_eq!(state.scheme, 2);
    }

    #[test]
    fn mono_status_is_semantic() {
        assert_eq!(status_to_scheme(7, StatusColor::Critical), Color::Red);
        assert_eq!(status_to_scheme(7, StatusColor::Good), Color::Green);
    }
}
